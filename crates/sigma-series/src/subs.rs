//! Substitution of symbols.

use crate::coefficient::Coefficient;
use crate::error::{Result, SeriesError};
use crate::key::{Key, PolyKey};
use crate::series::Series;

impl<C: Coefficient, K: Key> Series<C, K> {
    /// Replaces the symbol `name` with `value`.
    ///
    /// Every power `name**e` in a key becomes `value**e`; negative powers
    /// need an invertible `value`. Coefficients mentioning `name` are
    /// substituted when `value` is a constant. The symbol set is not
    /// trimmed afterwards.
    ///
    /// # Errors
    ///
    /// `InvalidArgument` when a key type cannot substitute the symbol or a
    /// coefficient needs a non-constant value; otherwise the failures of
    /// exponentiation and multiplication.
    pub fn subs(&self, name: &str, value: &Self) -> Result<Self> {
        let pos = self.symbols.index_of(name);
        let mut out = Self::new(self.symbols.clone());
        for (k, c) in self.terms.sorted() {
            let cf = subs_in_cf(c, name, value)?;
            let split = match pos {
                Some(p) => k.split_power(p, &self.symbols)?,
                None => None,
            };
            let term = match split {
                Some((e, rest)) => {
                    Self::from_terms(self.symbols.clone(), [(rest, cf)])?.mul(&value.pow(e)?)?
                }
                None => Self::from_terms(self.symbols.clone(), [(k.clone(), cf)])?,
            };
            out.add_assign(&term)?;
        }
        Ok(out)
    }

    /// Replaces the symbol `name` with the coefficient `value`.
    ///
    /// Powers of `name` in the keys are folded into the coefficients.
    ///
    /// # Errors
    ///
    /// `InvalidArgument` when a key type cannot substitute the symbol.
    pub fn subs_cf(&self, name: &str, value: &C) -> Result<Self> {
        let pos = self.symbols.index_of(name);
        let mut out = Self::new(self.symbols.clone());
        for (k, c) in self.terms.iter() {
            let cf = if c.depends_on(name) { c.subs(name, value)? } else { c.clone() };
            let split = match pos {
                Some(p) => k.split_power(p, &self.symbols)?,
                None => None,
            };
            match split {
                Some((e, rest)) => out.terms.insert(rest, cf.mul(&value.pow(e)?)?, &self.symbols)?,
                None => out.terms.insert(k.clone(), cf, &self.symbols)?,
            }
        }
        Ok(out)
    }
}

fn subs_in_cf<C: Coefficient, K: Key>(c: &C, name: &str, value: &Series<C, K>) -> Result<C> {
    if !c.depends_on(name) {
        return Ok(c.clone());
    }
    if value.is_zero() {
        return c.subs(name, &C::zero());
    }
    if value.is_single_cf() {
        return c.subs(name, &value.to_cf()?);
    }
    Err(SeriesError::invalid(format!(
        "unable to substitute '{name}' in the coefficients with a non-constant series"
    )))
}

impl<C: Coefficient, K: PolyKey> Series<C, K> {
    /// Replaces `name**n` with `value`.
    ///
    /// A power `name**e` with `e / n >= 1` becomes `value**q * name**r`,
    /// where `q` is the integral part of `e / n` and `r = e - q*n`. Powers
    /// with a smaller ratio, including every power whose sign differs from
    /// `n`, are kept as they are. Coefficients are left untouched.
    ///
    /// # Errors
    ///
    /// `InvalidArgument` when `n` is zero; otherwise the failures of
    /// exponentiation and multiplication.
    pub fn ipow_subs(&self, name: &str, n: i64, value: &Self) -> Result<Self> {
        if n == 0 {
            return Err(SeriesError::invalid(
                "invalid integral power for ipow_subs(): the power must be nonzero",
            ));
        }
        let Some(pos) = self.symbols.index_of(name) else {
            return Ok(self.clone());
        };
        let mut out = Self::new(self.symbols.clone());
        for (k, c) in self.terms.sorted() {
            let mut exps = k.exponents(&self.symbols);
            let e = i64::from(exps[pos]);
            // same signs and |e| >= |n|, so truncation is the floor
            let q = e / n;
            if q < 1 {
                out.add_assign(&Self::from_terms(self.symbols.clone(), [(k.clone(), c.clone())])?)?;
                continue;
            }
            let r = e - q * n;
            exps[pos] = i16::try_from(r).map_err(|_| SeriesError::overflow("exponent out of range"))?;
            let rest = K::from_exponents(&exps, &self.symbols)?;
            let term = Self::from_terms(self.symbols.clone(), [(rest, c.clone())])?.mul(&value.pow(q)?)?;
            out.add_assign(&term)?;
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kronecker::KroneckerMonomial;
    use crate::monomial::Monomial;
    use sigma_integers::Integer;
    use sigma_rings::{Q, Z};

    type P = Series<Q, Monomial>;

    fn var(n: &str) -> P {
        P::from_symbol(n).unwrap()
    }

    #[test]
    fn test_subs_symbol() {
        // x**2 + y with x -> y + 1 gives y**2 + 3y + 1
        let p = var("x").pow(2).unwrap().add(&var("y")).unwrap();
        let v = var("y").add(&P::from_integer(1)).unwrap();
        let r = p.subs("x", &v).unwrap();
        let expected = var("y")
            .pow(2)
            .unwrap()
            .add(&var("y").mul_cf(&Q::new(3, 1)).unwrap())
            .unwrap()
            .add(&P::from_integer(1))
            .unwrap();
        assert_eq!(r, expected);
        // the substituted symbol stays in the set
        assert!(r.symbols().contains("x"));
    }

    #[test]
    fn test_subs_absent_symbol() {
        let p = var("x").add(&P::from_integer(2)).unwrap();
        assert_eq!(p.subs("z", &var("y")).unwrap(), p);
    }

    #[test]
    fn test_subs_negative_power() {
        let p = var("x").pow(-1).unwrap();
        let r = p.subs("x", &P::from_integer(2)).unwrap();
        assert_eq!(r, P::from_cf(Q::new(1, 2)));
        let err = p.subs("x", &var("y").add(&P::from_integer(1)).unwrap()).unwrap_err();
        assert_eq!(err.kind(), crate::ErrorKind::Value);
    }

    #[test]
    fn test_subs_nested_coefficients() {
        type Outer = Series<P, Monomial>;
        let inner = Outer::from_cf(var("a"));
        let p = inner.mul(&Outer::from_symbol("x").unwrap()).unwrap();
        let r = p.subs("a", &Outer::from_integer(3)).unwrap();
        assert_eq!(r, Outer::from_symbol("x").unwrap().mul_integer(&Integer::new(3)).unwrap());
        let err = p.subs("a", &Outer::from_symbol("x").unwrap()).unwrap_err();
        assert_eq!(err.kind(), crate::ErrorKind::Value);
    }

    #[test]
    fn test_subs_cf() {
        let p = var("x").pow(3).unwrap().mul(&var("y")).unwrap();
        let r = p.subs_cf("x", &Q::new(1, 2)).unwrap();
        assert_eq!(r, var("y").mul_cf(&Q::new(1, 8)).unwrap());
    }

    #[test]
    fn test_ipow_subs() {
        type K = Series<Z, KroneckerMonomial>;
        let x = K::from_symbol("x").unwrap();
        let z = K::from_symbol("z").unwrap();
        // x**5 with x**2 -> z gives z**2 * x
        let p = x.pow(5).unwrap();
        let r = p.ipow_subs("x", 2, &z).unwrap();
        assert_eq!(r, z.pow(2).unwrap().mul(&x).unwrap());
        // exact multiple leaves no remainder
        assert_eq!(x.pow(4).unwrap().ipow_subs("x", 2, &z).unwrap(), z.pow(2).unwrap());
        // ratio below one
        assert_eq!(x.ipow_subs("x", 2, &z).unwrap(), x);
        assert_eq!(p.ipow_subs("x", 0, &z).unwrap_err().kind(), crate::ErrorKind::Value);
        assert_eq!(p.ipow_subs("y", 2, &z).unwrap(), p);
    }

    #[test]
    fn test_ipow_subs_sign_mismatch_keeps_term() {
        type P = Series<Q, Monomial>;
        let x = P::from_symbol("x").unwrap();
        let two = P::from_integer(2);
        let xm7 = x.pow(-7).unwrap();
        let x7 = x.pow(7).unwrap();
        assert_eq!(xm7.ipow_subs("x", 4, &two).unwrap(), xm7);
        assert_eq!(x7.ipow_subs("x", -4, &two).unwrap(), x7);
        // -7 / -4 = 1 with remainder x**-3
        let r = xm7.ipow_subs("x", -4, &two).unwrap();
        assert_eq!(r, x.pow(-3).unwrap().mul_cf(&Q::new(2, 1)).unwrap());
        // -3 / -2 truncates to one, -8 / -2 is four
        let mixed = x.pow(-3).unwrap().add(&x.pow(-8).unwrap()).unwrap();
        let expected = x
            .pow(-1)
            .unwrap()
            .mul_cf(&Q::new(2, 1))
            .unwrap()
            .add(&P::from_integer(16))
            .unwrap();
        assert_eq!(mixed.ipow_subs("x", -2, &two).unwrap(), expected);
    }

    #[test]
    fn test_ipow_subs_non_invertible_value() {
        type P = Series<Z, Monomial>;
        let x = P::from_symbol("x").unwrap();
        let y = P::from_symbol("y").unwrap();
        let value = y.add(&P::from_integer(1)).unwrap();
        // x**-3 with x**2 -> y + 1 never needs an inverse of y + 1
        let p = x.pow(-3).unwrap();
        assert_eq!(p.ipow_subs("x", 2, &value).unwrap(), p);
        let q = x.pow(-3).unwrap().add(&x.pow(3).unwrap()).unwrap();
        let expected = x.pow(-3).unwrap().add(&value.mul(&x).unwrap()).unwrap();
        assert_eq!(q.ipow_subs("x", 2, &value).unwrap(), expected);
    }
}

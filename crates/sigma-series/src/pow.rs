//! Integral and rational exponentiation.

use num_traits::Zero;
use sigma_integers::Rational;

use crate::coefficient::Coefficient;
use crate::error::{Result, SeriesError};
use crate::key::{Exponents, Key, PolyKey};
use crate::series::Series;

const NEGATIVE_EXPONENT: &str = "invalid argument for series exponentiation: negative integral value";

impl<C: Coefficient, K: Key> Series<C, K> {
    /// Raises the series to the integral power `n`.
    ///
    /// Non-negative powers are computed by successive multiplication and
    /// memoized in the pow cache of the series type. Negative powers need a
    /// single-term series whose key knows how to invert itself.
    ///
    /// # Errors
    ///
    /// `InvalidArgument` for a negative power of a non-invertible series,
    /// `ZeroDivision` for a negative power of zero, and the failures of
    /// multiplication.
    pub fn pow(&self, n: i64) -> Result<Self> {
        if n < 0 {
            return self.pow_negative(n);
        }
        match n {
            0 => return Ok(Self::from_cf(C::one())),
            1 => return Ok(self.clone()),
            _ => {}
        }
        let n = usize::try_from(n).map_err(|_| SeriesError::overflow("exponent too large"))?;
        let mut powers = self.cached_powers();
        if let Some(p) = powers.get(n) {
            return Ok(p.clone());
        }
        if powers.len() < 2 {
            powers = vec![Self::from_cf(C::one()), self.clone()];
        }
        while powers.len() <= n {
            let next = match powers.last() {
                Some(last) => last.mul(self)?,
                None => self.clone(),
            };
            powers.push(next);
        }
        let result = powers[n].clone();
        self.store_powers(powers);
        Ok(result)
    }

    fn pow_negative(&self, n: i64) -> Result<Self> {
        if self.is_zero() {
            return Err(SeriesError::zero_division(
                "negative power of a zero series",
            ));
        }
        let m = n
            .checked_neg()
            .ok_or_else(|| SeriesError::overflow("exponent too large"))?;
        if self.len() == 1 {
            if let Some((k, c)) = self.iter().next() {
                if let Some(inv) = k.invert_term(c, &self.symbols)? {
                    return inv.pow(m);
                }
            }
        }
        Err(SeriesError::invalid(NEGATIVE_EXPONENT))
    }
}

impl<C: Coefficient, K: PolyKey> Series<C, K> {
    /// Raises the series to a rational power.
    ///
    /// Integral values defer to [`Series::pow`]. Otherwise the series must
    /// be a single term with unit coefficient whose exponents all become
    /// integral.
    ///
    /// # Errors
    ///
    /// `Arithmetic` when the result would have non-integral exponents.
    pub fn pow_rational(&self, q: &Rational) -> Result<Self> {
        if let Some(n) = q.to_integer() {
            let n = n
                .to_i64()
                .ok_or_else(|| SeriesError::overflow("exponent too large"))?;
            return self.pow(n);
        }
        if self.is_zero() {
            return if q.is_negative() {
                Err(SeriesError::zero_division("negative power of a zero series"))
            } else {
                Ok(self.clone())
            };
        }
        let non_integral = || {
            SeriesError::arithmetic(format!(
                "invalid exponent {q}: the result would have a non-integral exponent"
            ))
        };
        if self.len() != 1 {
            return Err(non_integral());
        }
        let Some((k, c)) = self.iter().next() else {
            return Err(non_integral());
        };
        if !c.is_one() {
            return Err(non_integral());
        }
        let (num, den) = (q.numerator(), q.denominator());
        let mut exps = Exponents::new();
        for e in k.exponents(&self.symbols) {
            let scaled = sigma_integers::Integer::from(e) * &num;
            let (quot, rem) = scaled.div_rem(&den).ok_or_else(non_integral)?;
            if !rem.is_zero() {
                return Err(non_integral());
            }
            exps.push(quot.to_i16().ok_or_else(|| SeriesError::overflow("exponent out of range"))?);
        }
        Self::from_terms(self.symbols.clone(), [(K::from_exponents(&exps, &self.symbols)?, C::one())])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::monomial::Monomial;
    use crate::symbol_set::SymbolSet;
    use sigma_integers::Integer;
    use sigma_rings::{Q, Z};

    // dedicated types keep the pow cache of these tests private
    type P = Series<Z, Monomial>;
    type PQ = Series<Q, Monomial>;

    #[test]
    fn test_binomial_power() {
        let s = P::from_symbol("x").unwrap().add(&P::from_integer(1)).unwrap();
        let p = s.pow(10).unwrap();
        assert_eq!(p.len(), 11);
        assert_eq!(p.find_cf(&[5]).unwrap(), Z::new(252));
        assert_eq!(s.pow(0).unwrap(), P::from_integer(1));
        assert_eq!(s.pow(1).unwrap(), s);
        // cached powers are reused
        assert_eq!(s.pow(3).unwrap(), s.mul(&s).unwrap().mul(&s).unwrap());
    }

    #[test]
    fn test_negative_powers() {
        let x = PQ::from_symbol("x").unwrap().mul_cf(&Q::new(2, 1)).unwrap();
        let inv = x.pow(-2).unwrap();
        assert_eq!(inv.find_cf(&[-2]).unwrap(), Q::new(1, 4));

        let s = x.add(&PQ::from_integer(1)).unwrap();
        let err = s.pow(-1).unwrap_err();
        assert_eq!(err.message(), NEGATIVE_EXPONENT);

        assert_eq!(PQ::default().pow(-1).unwrap_err().kind(), crate::ErrorKind::ZeroDivision);
    }

    #[test]
    fn test_integer_cf_not_invertible() {
        let x = P::from_symbol("x").unwrap().mul_integer(&Integer::new(3)).unwrap();
        assert_eq!(x.pow(-1).unwrap_err().kind(), crate::ErrorKind::Arithmetic);
    }

    #[test]
    fn test_pow_rational() {
        let s = PQ::from_terms(
            SymbolSet::new(["x", "y"]).unwrap(),
            [(Monomial::new(&[4, 2]), Q::new(1, 1))],
        )
        .unwrap();
        let r = s.pow_rational(&Rational::from_i64(1, 2)).unwrap();
        assert_eq!(r.find_cf(&[2, 1]).unwrap(), Q::new(1, 1));
        let err = s.pow_rational(&Rational::from_i64(1, 3)).unwrap_err();
        assert_eq!(err.kind(), crate::ErrorKind::Arithmetic);
        assert_eq!(s.pow_rational(&Rational::from_i64(2, 1)).unwrap(), s.pow(2).unwrap());
    }
}

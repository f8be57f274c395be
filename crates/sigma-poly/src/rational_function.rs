//! Rational functions: quotients of polynomials kept in lowest terms.
//!
//! A [`RationalFunction`] holds a numerator and a denominator over
//! Kronecker-packed monomials. Every value is canonical:
//!
//! - numerator and denominator are coprime and have non-negative exponents,
//! - zero is `0/1`,
//! - the coefficients of both share no common factor, which over `Q` also
//!   clears the rational denominators,
//! - the denominator's leading coefficient (the coefficient of its greatest
//!   key) is positive.
//!
//! Canonical values compare with plain equality of numerator and
//! denominator.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use sigma_integers::Integer;
use sigma_rings::{Q, Z};
use sigma_series::{
    custom_derivative, Coefficient, EvalValue, KroneckerMonomial, PolyKey, Result, Series, SeriesError,
};
use tracing::trace;

use crate::content::{content, GcdCoefficient};
use crate::gcd::{gcd, GcdAlgorithm};

/// The polynomials a rational function is built from.
pub type Poly<C> = Series<C, KroneckerMonomial>;

/// A quotient of two coprime polynomials over the coefficient ring `C`.
#[derive(Clone, Debug, PartialEq)]
pub struct RationalFunction<C: GcdCoefficient = Z> {
    num: Poly<C>,
    den: Poly<C>,
}

fn one<C: GcdCoefficient>() -> Poly<C> {
    Poly::from_cf(C::one())
}

fn check_exponents<C: GcdCoefficient>(p: &Poly<C>) -> Result<()> {
    let negative = p
        .iter()
        .any(|(k, _)| k.exponents(p.symbols()).iter().any(|&e| e < 0));
    if negative {
        return Err(SeriesError::invalid(
            "negative exponents are not allowed in rational functions",
        ));
    }
    Ok(())
}

/// Negates both parts when the leading coefficient of `den` is negative.
fn fix_sign<C: GcdCoefficient>(num: Poly<C>, den: Poly<C>) -> (Poly<C>, Poly<C>) {
    if GcdCoefficient::is_negative(&den) {
        (num.neg(), den.neg())
    } else {
        (num, den)
    }
}

fn canonicalise<C: GcdCoefficient>(num: Poly<C>, den: Poly<C>) -> Result<(Poly<C>, Poly<C>)> {
    check_exponents(&num)?;
    check_exponents(&den)?;
    if den.is_zero() {
        return Err(SeriesError::zero_division("null denominator in rational function"));
    }
    if num.is_zero() {
        return Ok((Poly::default(), one()));
    }
    let (mut num, mut den) = if num.symbols() == den.symbols() {
        (num, den)
    } else {
        let (symbols, _, _) = num.symbols().merge(den.symbols());
        (num.extend_symbols(&symbols)?, den.extend_symbols(&symbols)?)
    };
    if !den.is_single_cf() && !num.is_single_cf() {
        let g = gcd(&num, &den, GcdAlgorithm::Automatic)?;
        if !g.is_single_cf() {
            trace!(terms = g.len(), "removing polynomial gcd from rational function");
            num = num.div(&g)?;
            den = den.div(&g)?;
        }
    }
    let c = content(&num)?.gcd(&content(&den)?)?;
    if !c.is_zero() && !c.is_one() {
        num = num.div_cf(&c)?;
        den = den.div_cf(&c)?;
    }
    Ok(fix_sign(num, den))
}

impl<C: GcdCoefficient> Default for RationalFunction<C> {
    fn default() -> Self {
        Self {
            num: Poly::default(),
            den: one(),
        }
    }
}

impl<C: GcdCoefficient> RationalFunction<C> {
    /// Builds `num / den` in canonical form.
    ///
    /// # Errors
    ///
    /// `ZeroDivision` for a zero denominator, `InvalidArgument` for negative
    /// exponents, and the failures of the polynomial gcd.
    pub fn new(num: Poly<C>, den: Poly<C>) -> Result<Self> {
        let (num, den) = canonicalise(num, den)?;
        Ok(Self { num, den })
    }

    /// The polynomial `p` as a rational function.
    ///
    /// # Errors
    ///
    /// `InvalidArgument` for negative exponents.
    pub fn from_polynomial(p: Poly<C>) -> Result<Self> {
        Self::new(p, one())
    }

    /// The constant `cf`.
    ///
    /// # Errors
    ///
    /// Propagates coefficient gcd failures.
    pub fn from_cf(cf: C) -> Result<Self> {
        Self::from_polynomial(Poly::from_cf(cf))
    }

    /// The constant `n`.
    #[must_use]
    pub fn from_integer(n: impl Into<Integer>) -> Self {
        Self {
            num: Poly::from_integer(n),
            den: one(),
        }
    }

    /// The symbol `name`.
    ///
    /// # Errors
    ///
    /// `InvalidArgument` for an empty name.
    pub fn from_symbol(name: &str) -> Result<Self> {
        Ok(Self {
            num: Poly::from_symbol(name)?,
            den: one(),
        })
    }

    /// The numerator.
    #[must_use]
    pub fn num(&self) -> &Poly<C> {
        &self.num
    }

    /// The denominator.
    #[must_use]
    pub fn den(&self) -> &Poly<C> {
        &self.den
    }

    /// Splits into numerator and denominator.
    #[must_use]
    pub fn into_parts(self) -> (Poly<C>, Poly<C>) {
        (self.num, self.den)
    }

    /// Returns true for `0/1`.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.num.is_zero()
    }

    /// Returns true when the denominator is one.
    #[must_use]
    pub fn is_polynomial(&self) -> bool {
        Coefficient::is_one(&self.den)
    }

    /// Additive inverse.
    #[must_use]
    pub fn neg(&self) -> Self {
        Self {
            num: self.num.neg(),
            den: self.den.clone(),
        }
    }

    /// Sum.
    ///
    /// # Errors
    ///
    /// Propagates polynomial arithmetic and gcd failures.
    pub fn add(&self, other: &Self) -> Result<Self> {
        if self.is_polynomial() && other.is_polynomial() {
            return Ok(Self {
                num: self.num.add(&other.num)?,
                den: one(),
            });
        }
        let num = self.num.mul(&other.den)?.add(&other.num.mul(&self.den)?)?;
        Self::new(num, self.den.mul(&other.den)?)
    }

    /// Difference.
    ///
    /// # Errors
    ///
    /// Propagates polynomial arithmetic and gcd failures.
    pub fn sub(&self, other: &Self) -> Result<Self> {
        self.add(&other.neg())
    }

    /// Product.
    ///
    /// # Errors
    ///
    /// Propagates polynomial arithmetic and gcd failures.
    pub fn mul(&self, other: &Self) -> Result<Self> {
        if self.is_polynomial() && other.is_polynomial() {
            return Ok(Self {
                num: self.num.mul(&other.num)?,
                den: one(),
            });
        }
        Self::new(self.num.mul(&other.num)?, self.den.mul(&other.den)?)
    }

    /// Quotient.
    ///
    /// # Errors
    ///
    /// `ZeroDivision` when `other` is zero; otherwise the failures of
    /// polynomial arithmetic and gcd.
    pub fn div(&self, other: &Self) -> Result<Self> {
        if other.is_zero() {
            return Err(SeriesError::zero_division("division of a rational function by zero"));
        }
        if self.is_polynomial() && Coefficient::is_one(&other.num) {
            return Ok(Self {
                num: self.num.mul(&other.den)?,
                den: one(),
            });
        }
        Self::new(self.num.mul(&other.den)?, self.den.mul(&other.num)?)
    }

    /// Integral power.
    ///
    /// Numerator and denominator are raised separately, so their pow caches
    /// are reused. A negative exponent swaps them.
    ///
    /// # Errors
    ///
    /// `ZeroDivision` for a negative power of zero, `Overflow` when the
    /// exponent has no positive counterpart.
    pub fn pow(&self, n: i64) -> Result<Self> {
        let m = i64::try_from(n.unsigned_abs()).map_err(|_| SeriesError::overflow("exponent too large"))?;
        let num = self.num.pow(m)?;
        let den = self.den.pow(m)?;
        if n >= 0 {
            return Ok(Self { num, den });
        }
        if num.is_zero() {
            return Err(SeriesError::zero_division(
                "zero denominator in rational function exponentiation",
            ));
        }
        let (num, den) = fix_sign(den, num);
        Ok(Self { num, den })
    }

    /// Total degree: the larger of the numerator and denominator degrees.
    #[must_use]
    pub fn degree(&self) -> i64 {
        self.num.degree().max(self.den.degree())
    }

    /// Degree in `names`: the larger of the two partial degrees.
    #[must_use]
    pub fn partial_degree<S: AsRef<str>>(&self, names: &[S]) -> i64 {
        self.num.partial_degree(names).max(self.den.partial_degree(names))
    }

    /// Returns true if numerator or denominator mention `name`.
    #[must_use]
    pub fn depends_on(&self, name: &str) -> bool {
        Coefficient::depends_on(&self.num, name) || Coefficient::depends_on(&self.den, name)
    }

    /// Drops the symbols numerator and denominator do not use.
    ///
    /// # Errors
    ///
    /// Propagates key trimming failures.
    pub fn trim(&self) -> Result<Self> {
        Ok(Self {
            num: self.num.trim()?,
            den: self.den.trim()?,
        })
    }

    /// Replaces the symbol `name` with `value` in both parts.
    ///
    /// # Errors
    ///
    /// `ZeroDivision` when the substituted denominator vanishes,
    /// `InvalidArgument` when a coefficient mentions `name` and `value` is
    /// not a constant.
    pub fn subs(&self, name: &str, value: &Self) -> Result<Self> {
        let num = subs_poly(&self.num, name, value, None)?;
        let den = subs_poly(&self.den, name, value, None)?;
        num.div(&den)
    }

    /// Replaces `name**n` with `value` in both parts.
    ///
    /// A power `name**e` with `e / n >= 1` becomes `value**q * name**r`
    /// with `q = floor(e / n)` and `r = e - q*n`; other powers are kept.
    ///
    /// # Errors
    ///
    /// `InvalidArgument` when `n` is zero, `ZeroDivision` when the
    /// substituted denominator vanishes.
    pub fn ipow_subs(&self, name: &str, n: i64, value: &Self) -> Result<Self> {
        if n == 0 {
            return Err(SeriesError::invalid(
                "invalid integral power for ipow_subs(): the power must be nonzero",
            ));
        }
        let num = subs_poly(&self.num, name, value, Some(n))?;
        let den = subs_poly(&self.den, name, value, Some(n))?;
        num.div(&den)
    }

    /// Derivative with respect to `name`, by the quotient rule unless a
    /// custom derivative is registered for this type.
    ///
    /// # Errors
    ///
    /// Propagates polynomial arithmetic and gcd failures.
    pub fn partial(&self, name: &str) -> Result<Self> {
        if let Some(f) = custom_derivative::<Self>(name) {
            return f(self);
        }
        let dn = self.num.partial(name)?;
        let dd = self.den.partial(name)?;
        if dd.is_zero() {
            return Self::new(dn, self.den.clone());
        }
        let num = dn.mul(&self.den)?.sub(&self.num.mul(&dd)?)?;
        Self::new(num, self.den.mul(&self.den)?)
    }

    /// Antiderivative with respect to `name`.
    ///
    /// Only the numerator is integrated. It is first scaled by the lcm of
    /// the `e + 1` divisors so the integration stays exact over `Z`.
    ///
    /// # Errors
    ///
    /// `InvalidArgument` when the denominator depends on `name`.
    pub fn integrate(&self, name: &str) -> Result<Self> {
        if Coefficient::depends_on(&self.den, name) {
            return Err(SeriesError::invalid(
                "cannot compute the integral of a rational function whose denominator depends on the integration variable",
            ));
        }
        let mut lcm = Integer::new(1);
        if let Some(pos) = self.num.symbols().index_of(name) {
            for (k, _) in self.num.iter() {
                let e = i64::from(k.exponent(pos, self.num.symbols()));
                lcm = lcm.lcm(&Integer::new(e + 1));
            }
        }
        let num = self.num.mul_integer(&lcm)?.integrate(name)?;
        Self::new(num, self.den.mul_integer(&lcm)?)
    }

    /// Evaluates numerator and denominator and divides.
    ///
    /// # Errors
    ///
    /// `InvalidArgument` for a missing symbol, `ZeroDivision` when the
    /// denominator evaluates to zero.
    pub fn evaluate<V: EvalValue>(&self, values: &HashMap<String, V>) -> Result<V> {
        let den = self.den.evaluate(values)?;
        if den.is_zero() {
            return Err(SeriesError::zero_division(
                "the denominator of the rational function evaluates to zero",
            ));
        }
        self.num.evaluate(values)?.div(&den)
    }

    fn constant(&self) -> Option<C> {
        if self.is_polynomial() && self.num.is_single_cf() {
            self.num.to_cf().ok()
        } else {
            None
        }
    }
}

/// Substitutes `value` into the polynomial `p`. With `Some(n)` only whole
/// multiples of `name**n` are replaced.
fn subs_poly<C: GcdCoefficient>(
    p: &Poly<C>,
    name: &str,
    value: &RationalFunction<C>,
    ipow: Option<i64>,
) -> Result<RationalFunction<C>> {
    let symbols = p.symbols();
    let pos = symbols.index_of(name);
    let mut out = RationalFunction::default();
    for (k, c) in p.sorted_terms() {
        let cf = if c.depends_on(name) {
            match value.constant() {
                Some(v) => c.subs(name, &v)?,
                None => {
                    return Err(SeriesError::invalid(format!(
                        "unable to substitute '{name}' in the coefficients with a non-constant rational function"
                    )))
                }
            }
        } else {
            c.clone()
        };
        let mut exps = k.exponents(symbols);
        let q = match (pos, ipow) {
            (None, _) => 0,
            (Some(i), None) => {
                let e = i64::from(exps[i]);
                exps[i] = 0;
                e
            }
            (Some(i), Some(n)) => {
                let e = i64::from(exps[i]);
                let q = e / n;
                if q < 1 {
                    0
                } else {
                    exps[i] = i16::try_from(e - q * n)
                        .map_err(|_| SeriesError::overflow("exponent out of range"))?;
                    q
                }
            }
        };
        let rest = KroneckerMonomial::from_exponents(&exps, symbols)?;
        let term = RationalFunction::from_polynomial(Poly::from_terms(symbols.clone(), [(rest, cf)])?)?;
        let term = if q == 0 { term } else { term.mul(&value.pow(q)?)? };
        out = out.add(&term)?;
    }
    Ok(out)
}

impl RationalFunction<Z> {
    /// Converts a polynomial over `Q`, clearing denominators with their lcm.
    ///
    /// # Errors
    ///
    /// Propagates the failures of the canonical form.
    pub fn from_rational_polynomial(p: &Poly<Q>) -> Result<Self> {
        let mut lcm = Integer::new(1);
        for (_, c) in p.iter() {
            lcm = lcm.lcm(&c.0.denominator());
        }
        let mut num = Poly::<Z>::new(p.symbols().clone());
        for (k, c) in p.iter() {
            let scale = lcm
                .div_exact(&c.0.denominator())
                .ok_or_else(|| SeriesError::arithmetic("inexact lcm of rational denominators"))?;
            num.insert(*k, Z(&c.0.numerator() * &scale))?;
        }
        Self::new(num, Poly::from_integer(lcm))
    }
}

impl<C: GcdCoefficient> fmt::Display for RationalFunction<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_polynomial() {
            return write!(f, "{}", self.num);
        }
        if self.num.len() > 1 {
            write!(f, "({})", self.num)?;
        } else {
            write!(f, "{}", self.num)?;
        }
        let bare = self.den.len() == 1 && (self.den.is_single_cf() || self.den.iter().all(|(_, c)| c.is_one()));
        if bare {
            write!(f, "/{}", self.den)
        } else {
            write!(f, "/({})", self.den)
        }
    }
}

#[derive(Serialize)]
struct RationalFunctionReprRef<'a, C: GcdCoefficient> {
    num: &'a Poly<C>,
    den: &'a Poly<C>,
}

#[derive(Deserialize)]
#[serde(bound = "C: GcdCoefficient")]
struct RationalFunctionRepr<C: GcdCoefficient> {
    num: Poly<C>,
    den: Poly<C>,
}

impl<C: GcdCoefficient> Serialize for RationalFunction<C> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        RationalFunctionReprRef {
            num: &self.num,
            den: &self.den,
        }
        .serialize(serializer)
    }
}

impl<'de, C: GcdCoefficient> Deserialize<'de> for RationalFunction<C> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let repr = RationalFunctionRepr::<C>::deserialize(deserializer)?;
        Self::new(repr.num, repr.den).map_err(serde::de::Error::custom)
    }
}

impl<C: GcdCoefficient> Coefficient for RationalFunction<C> {
    fn zero() -> Self {
        Self::default()
    }

    fn one() -> Self {
        Self::from_integer(1)
    }

    fn is_zero(&self) -> bool {
        self.num.is_zero()
    }

    fn is_one(&self) -> bool {
        self.is_polynomial() && Coefficient::is_one(&self.num)
    }

    fn from_integer(n: &Integer) -> Self {
        Self::from_integer(n.clone())
    }

    fn add_assign(&mut self, other: &Self) -> Result<()> {
        *self = RationalFunction::add(self, other)?;
        Ok(())
    }

    fn sub_assign(&mut self, other: &Self) -> Result<()> {
        *self = RationalFunction::sub(self, other)?;
        Ok(())
    }

    fn neg(&self) -> Self {
        RationalFunction::neg(self)
    }

    fn mul(&self, other: &Self) -> Result<Self> {
        RationalFunction::mul(self, other)
    }

    fn div_integer(&self, n: &Integer) -> Result<Self> {
        RationalFunction::div(self, &Self::from_integer(n.clone()))
    }

    fn div_exact(&self, other: &Self) -> Result<Self> {
        RationalFunction::div(self, other)
    }

    fn invert(&self) -> Result<Self> {
        RationalFunction::pow(self, -1)
    }

    fn pow(&self, n: i64) -> Result<Self> {
        RationalFunction::pow(self, n)
    }

    fn degree(&self, names: Option<&[String]>) -> i64 {
        match names {
            Some(n) => self.partial_degree(n),
            None => RationalFunction::degree(self),
        }
    }

    fn depends_on(&self, name: &str) -> bool {
        RationalFunction::depends_on(self, name)
    }

    fn partial(&self, name: &str) -> Result<Self> {
        RationalFunction::partial(self, name)
    }

    fn integrate(&self, name: &str) -> Result<Self> {
        RationalFunction::integrate(self, name)
    }

    fn subs(&self, name: &str, value: &Self) -> Result<Self> {
        RationalFunction::subs(self, name, value)
    }

    fn evaluate<V: EvalValue>(&self, values: &HashMap<String, V>) -> Result<V> {
        RationalFunction::evaluate(self, values)
    }

    fn integral_combination(&self) -> Result<Vec<(String, Integer)>> {
        if self.is_polynomial() {
            self.num.integral_combination()
        } else {
            Err(SeriesError::invalid(
                "a rational function with a non-unit denominator is not an integral linear combination of symbols",
            ))
        }
    }

    fn to_integer(&self) -> Option<Integer> {
        if self.is_polynomial() {
            self.num.to_integer()
        } else {
            None
        }
    }

    fn from_symbol(name: &str) -> Result<Self> {
        RationalFunction::from_symbol(name)
    }

    fn trim(&self) -> Result<Self> {
        RationalFunction::trim(self)
    }

    fn needs_brackets(&self) -> bool {
        !self.is_polynomial() || self.num.len() > 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sigma_integers::Rational;
    use sigma_series::{register_custom_derivative, unregister_all_custom_derivatives, ErrorKind, SymbolSet};

    type P = Poly<Z>;
    type RF = RationalFunction<Z>;

    fn var(n: &str) -> P {
        P::from_symbol(n).unwrap()
    }

    fn rf(n: &str) -> RF {
        RF::from_symbol(n).unwrap()
    }

    fn int(n: i64) -> RF {
        RF::from_integer(n)
    }

    #[test]
    fn test_canonical_form() {
        // (x^2 - 1) / (2x - 2) = (x + 1) / 2
        let x = var("x");
        let num = x.mul(&x).unwrap().sub(&P::from_integer(1)).unwrap();
        let den = x.mul_cf(&Z::new(2)).unwrap().sub(&P::from_integer(2)).unwrap();
        let r = RF::new(num, den).unwrap();
        assert_eq!(r.num(), &x.add(&P::from_integer(1)).unwrap());
        assert_eq!(r.den(), &P::from_integer(2));

        // 4 / -6 = -2 / 3
        let r = RF::new(P::from_integer(4), P::from_integer(-6)).unwrap();
        assert_eq!(r.num(), &P::from_integer(-2));
        assert_eq!(r.den(), &P::from_integer(3));

        // x / -y has a positive leading denominator coefficient
        let r = RF::new(var("x"), var("y").neg()).unwrap();
        assert_eq!(r.num(), &var("x").neg());
        assert_eq!(r.den(), &var("y"));

        let zero = RF::new(P::default(), var("y")).unwrap();
        assert!(zero.is_zero());
        assert_eq!(zero.den(), &P::from_integer(1));
    }

    #[test]
    fn test_construction_errors() {
        let err = RF::new(var("x"), P::default()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ZeroDivision);
        let inv = var("x").pow(-1).unwrap();
        assert_eq!(RF::from_polynomial(inv).unwrap_err().kind(), ErrorKind::Value);
    }

    #[test]
    fn test_rational_coefficients() {
        type RQ = RationalFunction<Q>;
        let x = Poly::<Q>::from_symbol("x").unwrap();
        // (x/2) / (x/3 + 1/3) = 3x / (2x + 2)
        let num = x.mul_cf(&Q::new(1, 2)).unwrap();
        let den = x.mul_cf(&Q::new(1, 3)).unwrap().add_cf(&Q::new(1, 3)).unwrap();
        let r = RQ::new(num, den).unwrap();
        assert_eq!(r.num(), &x.mul_cf(&Q::new(3, 1)).unwrap());
        assert_eq!(r.den(), &x.mul_cf(&Q::new(2, 1)).unwrap().add_cf(&Q::new(2, 1)).unwrap());
        let half = RQ::from_cf(Q::new(1, 2)).unwrap();
        assert_eq!(half.num(), &Poly::<Q>::from_integer(1));
        assert_eq!(half.den(), &Poly::<Q>::from_integer(2));
    }

    #[test]
    fn test_arithmetic() {
        let x = rf("x");
        let y = rf("y");
        // 1/x + 1/y = (x + y) / (x*y)
        let s = x.pow(-1).unwrap().add(&y.pow(-1).unwrap()).unwrap();
        assert_eq!(s.num(), &var("x").add(&var("y")).unwrap());
        assert_eq!(s.den(), &var("x").mul(&var("y")).unwrap());

        // (x/y) * (y/x) = 1
        let q = x.div(&y).unwrap();
        assert!(Coefficient::is_one(&q.mul(&y.div(&x).unwrap()).unwrap()));
        assert!(q.sub(&q).unwrap().is_zero());
        assert_eq!(x.div(&RF::default()).unwrap_err().kind(), ErrorKind::ZeroDivision);

        // polynomial fast paths keep the unit denominator
        let p = x.add(&int(1)).unwrap().mul(&x.sub(&int(1)).unwrap()).unwrap();
        assert!(p.is_polynomial());
        assert_eq!(p.num(), &var("x").pow(2).unwrap().sub(&P::from_integer(1)).unwrap());
        let d = p.div(&int(1).div(&y).unwrap()).unwrap();
        assert_eq!(d.num(), &p.num().mul(&var("y")).unwrap());
    }

    #[test]
    fn test_pow() {
        // (x / (x + 1))^-2 = (x + 1)^2 / x^2
        let r = rf("x").div(&rf("x").add(&int(1)).unwrap()).unwrap();
        let inv = r.pow(-2).unwrap();
        assert_eq!(inv.num(), &var("x").add(&P::from_integer(1)).unwrap().pow(2).unwrap());
        assert_eq!(inv.den(), &var("x").pow(2).unwrap());
        assert!(Coefficient::is_one(&inv.mul(&r.pow(2).unwrap()).unwrap()));
        assert!(Coefficient::is_one(&r.pow(0).unwrap()));

        // the sign moves back to the numerator
        let neg = int(-2).div(&rf("x")).unwrap().pow(-1).unwrap();
        assert_eq!(neg.num(), &var("x").neg());
        assert_eq!(neg.den(), &P::from_integer(2));

        let err = RF::default().pow(-1).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ZeroDivision);
        assert_eq!(rf("x").pow(i64::MIN).unwrap_err().kind(), ErrorKind::Overflow);
    }

    #[test]
    fn test_subs() {
        // (x + 1) / (x - 1) at x = 1/y is (1 + y) / (1 - y)
        let r = rf("x").add(&int(1)).unwrap().div(&rf("x").sub(&int(1)).unwrap()).unwrap();
        let v = int(1).div(&rf("y")).unwrap();
        let s = r.subs("x", &v).unwrap();
        let expected = int(1).add(&rf("y")).unwrap().div(&int(1).sub(&rf("y")).unwrap()).unwrap();
        assert_eq!(s, expected);
        // a vanishing denominator
        assert_eq!(r.subs("x", &int(1)).unwrap_err().kind(), ErrorKind::ZeroDivision);
        // an absent symbol leaves the value alone
        assert_eq!(r.subs("z", &v).unwrap(), r);
    }

    #[test]
    fn test_ipow_subs() {
        // x^5 / (x^2 + 1) with x^2 -> y gives y^2*x / (y + 1)
        let x = rf("x");
        let r = x.pow(5).unwrap().div(&x.pow(2).unwrap().add(&int(1)).unwrap()).unwrap();
        let s = r.ipow_subs("x", 2, &rf("y")).unwrap();
        let expected = rf("y").pow(2).unwrap().mul(&x).unwrap().div(&rf("y").add(&int(1)).unwrap()).unwrap();
        assert_eq!(s, expected);
        // x / y keeps x when n = 2
        let r = x.div(&rf("y")).unwrap();
        assert_eq!(r.ipow_subs("x", 2, &rf("z")).unwrap(), r);
        assert_eq!(r.ipow_subs("x", 0, &rf("z")).unwrap_err().kind(), ErrorKind::Value);
    }

    #[test]
    fn test_partial_and_integrate() {
        // d/dx 1/x = -1/x^2
        let inv = int(1).div(&rf("x")).unwrap();
        let d = inv.partial("x").unwrap();
        assert_eq!(d, int(-1).div(&rf("x").pow(2).unwrap()).unwrap());
        // d/dx x/y = 1/y
        let q = rf("x").div(&rf("y")).unwrap();
        assert_eq!(q.partial("x").unwrap(), int(1).div(&rf("y")).unwrap());

        // integral of x^2 / y is x^3 / (3y)
        let r = rf("x").pow(2).unwrap().div(&rf("y")).unwrap();
        let i = r.integrate("x").unwrap();
        assert_eq!(i.num(), &var("x").pow(3).unwrap());
        assert_eq!(i.den(), &var("y").mul_cf(&Z::new(3)).unwrap());
        assert_eq!(i.partial("x").unwrap(), r);
        let err = inv.integrate("x").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Value);
    }

    #[test]
    fn test_custom_derivative() {
        type RZ = RationalFunction<Z>;
        register_custom_derivative::<RZ, _>("t", |r: &RZ| r.partial("x"));
        let r = rf("x").pow(2).unwrap();
        assert_eq!(r.partial("t").unwrap(), rf("x").mul(&int(2)).unwrap());
        unregister_all_custom_derivatives::<RZ>();
        assert!(r.partial("t").unwrap().is_zero());
    }

    #[test]
    fn test_evaluate() {
        let r = rf("x").add(&int(1)).unwrap().div(&rf("y")).unwrap();
        let mut values = HashMap::new();
        values.insert("x".to_string(), Rational::from_i64(1, 1));
        values.insert("y".to_string(), Rational::from_i64(4, 1));
        assert_eq!(r.evaluate(&values).unwrap(), Rational::from_i64(1, 2));
        values.insert("y".to_string(), Rational::from_i64(0, 1));
        assert_eq!(r.evaluate(&values).unwrap_err().kind(), ErrorKind::ZeroDivision);
    }

    #[test]
    fn test_degree_and_trim() {
        let r = rf("x").div(&rf("y").pow(3).unwrap()).unwrap();
        assert_eq!(r.degree(), 3);
        assert_eq!(r.partial_degree(&["x"]), 1);
        let wide = RF::new(
            r.num().extend_symbols(&SymbolSet::new(["x", "y", "z"]).unwrap()).unwrap(),
            r.den().clone(),
        )
        .unwrap();
        assert_eq!(wide.num().symbols().len(), 3);
        assert_eq!(wide.trim().unwrap().num().symbols().names(), &["x"]);
    }

    #[test]
    fn test_from_rational_polynomial() {
        let x = Poly::<Q>::from_symbol("x").unwrap();
        // x/2 + 1/3 = (3x + 2) / 6
        let p = x.mul_cf(&Q::new(1, 2)).unwrap().add_cf(&Q::new(1, 3)).unwrap();
        let r = RF::from_rational_polynomial(&p).unwrap();
        assert_eq!(r.num(), &var("x").mul_cf(&Z::new(3)).unwrap().add(&P::from_integer(2)).unwrap());
        assert_eq!(r.den(), &P::from_integer(6));
    }

    #[test]
    fn test_display() {
        assert_eq!(rf("x").to_string(), "x");
        assert_eq!(rf("x").div(&rf("y")).unwrap().to_string(), "x/y");
        assert_eq!(int(1).div(&int(2)).unwrap().to_string(), "1/2");
        let r = rf("x").add(&int(1)).unwrap().div(&rf("y").mul(&int(2)).unwrap()).unwrap();
        assert_eq!(r.to_string(), "(x + 1)/(2*y)");
    }

    #[test]
    fn test_serde_recanonicalises() {
        let r = rf("x").div(&rf("y").add(&int(1)).unwrap()).unwrap();
        let json = serde_json::to_string(&r).unwrap();
        let back: RF = serde_json::from_str(&json).unwrap();
        assert_eq!(back, r);

        // a stored non-canonical pair comes back reduced
        let raw = RationalFunctionReprRef {
            num: &P::from_integer(4),
            den: &P::from_integer(-6),
        };
        let json = serde_json::to_string(&raw).unwrap();
        let back: RF = serde_json::from_str(&json).unwrap();
        assert_eq!(back, int(-2).div(&int(3)).unwrap());

        let raw = RationalFunctionReprRef {
            num: &P::from_integer(1),
            den: &P::default(),
        };
        assert!(serde_json::from_str::<RF>(&serde_json::to_string(&raw).unwrap()).is_err());
    }

    #[test]
    fn test_as_series_coefficient() {
        type S = Series<RF, sigma_series::Monomial>;
        // (1/y) * z + (x/y) * z = ((x + 1)/y) * z
        let z = S::from_symbol("z").unwrap();
        let a = z.mul_cf(&int(1).div(&rf("y")).unwrap()).unwrap();
        let b = z.mul_cf(&rf("x").div(&rf("y")).unwrap()).unwrap();
        let s = a.add(&b).unwrap();
        assert_eq!(s.len(), 1);
        let expected = rf("x").add(&int(1)).unwrap().div(&rf("y")).unwrap();
        assert_eq!(s.iter().next().unwrap().1, &expected);
    }
}

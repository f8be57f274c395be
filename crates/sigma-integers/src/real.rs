//! Arbitrary precision floating point numbers.
//!
//! `Real` wraps a decimal `dashu` float held at a fixed working precision,
//! which keeps arithmetic deterministic across platforms and lets the value
//! round-trip through its decimal string form.

use dashu::float::DBig;
use num_traits::{One, Zero};
use std::fmt;
use std::ops::{Add, Div, Mul, Neg, Sub};
use std::str::FromStr;

use crate::macros::serde_as_decimal;
use crate::{Integer, Rational};

/// Working precision of [`Real`], in decimal digits.
pub const REAL_PRECISION: usize = 50;

/// An arbitrary precision decimal floating point number.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct Real(DBig);

impl Real {
    fn normalized(value: DBig) -> Self {
        Self(value.with_precision(REAL_PRECISION).value())
    }

    /// Creates a real from an integer.
    #[must_use]
    pub fn from_integer(n: &Integer) -> Self {
        Self::normalized(DBig::from(n.as_inner().clone()))
    }

    /// Creates a real approximating a rational.
    #[must_use]
    pub fn from_rational(q: &Rational) -> Self {
        let num = Self::from_integer(&q.numerator());
        let den = Self::from_integer(&q.denominator());
        Self::normalized(num.0 / den.0)
    }

    /// Creates a real from an `f64`.
    ///
    /// Returns `None` for NaN and infinities.
    #[must_use]
    pub fn from_f64(value: f64) -> Option<Self> {
        if !value.is_finite() {
            return None;
        }
        format!("{value}").parse().ok()
    }

    /// Lossy conversion to `f64`.
    #[must_use]
    pub fn to_f64(&self) -> f64 {
        self.0.to_string().parse().unwrap_or(f64::NAN)
    }

    /// Checked division.
    #[must_use]
    pub fn checked_div(&self, other: &Self) -> Option<Self> {
        if other.is_zero() {
            None
        } else {
            Some(Self::normalized(&self.0 / &other.0))
        }
    }

    /// Integral power, negative exponents invert.
    ///
    /// Returns `None` when inverting zero.
    #[must_use]
    pub fn powi(&self, exp: i64) -> Option<Self> {
        let mut acc = Self::one();
        let mut base = self.clone();
        let mut n = exp.unsigned_abs();
        while n > 0 {
            if n & 1 == 1 {
                acc = &acc * &base;
            }
            base = &base * &base;
            n >>= 1;
        }
        if exp < 0 {
            Self::one().checked_div(&acc)
        } else {
            Some(acc)
        }
    }

    /// Cosine, evaluated in double precision.
    #[must_use]
    pub fn cos(&self) -> Option<Self> {
        Self::from_f64(self.to_f64().cos())
    }

    /// Sine, evaluated in double precision.
    #[must_use]
    pub fn sin(&self) -> Option<Self> {
        Self::from_f64(self.to_f64().sin())
    }

    /// Returns a reference to the inner `dashu` float.
    #[must_use]
    pub fn as_inner(&self) -> &DBig {
        &self.0
    }
}

impl Zero for Real {
    fn zero() -> Self {
        Self::normalized(DBig::ZERO)
    }

    fn is_zero(&self) -> bool {
        self.0 == DBig::ZERO
    }
}

impl One for Real {
    fn one() -> Self {
        Self::normalized(DBig::ONE)
    }

    fn is_one(&self) -> bool {
        self.0 == DBig::ONE
    }
}

impl Default for Real {
    fn default() -> Self {
        Self::zero()
    }
}

impl fmt::Debug for Real {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Real({})", self.0)
    }
}

impl fmt::Display for Real {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Real {
    type Err = dashu::base::error::ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DBig::from_str(s.trim()).map(Self::normalized)
    }
}

serde_as_decimal!(Real);

impl Add for &Real {
    type Output = Real;

    fn add(self, rhs: Self) -> Self::Output {
        Real::normalized(&self.0 + &rhs.0)
    }
}

impl Sub for &Real {
    type Output = Real;

    fn sub(self, rhs: Self) -> Self::Output {
        Real::normalized(&self.0 - &rhs.0)
    }
}

impl Mul for &Real {
    type Output = Real;

    fn mul(self, rhs: Self) -> Self::Output {
        Real::normalized(&self.0 * &rhs.0)
    }
}

/// # Panics
///
/// Panics on a zero divisor; use [`Real::checked_div`] otherwise.
impl Div for &Real {
    type Output = Real;

    fn div(self, rhs: Self) -> Self::Output {
        Real::normalized(&self.0 / &rhs.0)
    }
}

impl Add for Real {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        &self + &rhs
    }
}

impl Sub for Real {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        &self - &rhs
    }
}

impl Mul for Real {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self::Output {
        &self * &rhs
    }
}

impl Neg for Real {
    type Output = Self;

    fn neg(self) -> Self::Output {
        Self(-self.0)
    }
}

impl Neg for &Real {
    type Output = Real;

    fn neg(self) -> Self::Output {
        Real(-self.0.clone())
    }
}

impl From<i64> for Real {
    fn from(n: i64) -> Self {
        Self::from_integer(&Integer::new(n))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_integers() {
        let a = Real::from(6);
        let b = Real::from(7);
        assert_eq!(&a * &b, Real::from(42));
        assert_eq!(&a - &a, Real::zero());
        assert!(Real::from(1).is_one());
    }

    #[test]
    fn test_rational_approximation() {
        let third = Real::from_rational(&Rational::from_i64(1, 3));
        let sum = &(&third + &third) + &third;
        assert!((sum.to_f64() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_checked_division() {
        assert!(Real::from(1).checked_div(&Real::zero()).is_none());
        assert_eq!(Real::from(2).powi(-1).map(|r| r.to_f64()), Some(0.5));
        assert!(Real::zero().powi(-2).is_none());
    }

    #[test]
    fn test_parse_roundtrip() {
        let r: Real = "1.25".parse().unwrap();
        let back: Real = r.to_string().parse().unwrap();
        assert_eq!(r, back);
        assert_eq!(Real::from_f64(0.5).map(|r| r.to_f64()), Some(0.5));
        assert!(Real::from_f64(f64::NAN).is_none());
    }
}

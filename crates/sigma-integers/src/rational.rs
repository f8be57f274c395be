//! Arbitrary precision rationals.
//!
//! `Rational` wraps `dashu::RBig`, which keeps every value reduced with a
//! positive denominator, so structural equality is numeric equality.
//! Division by zero is reported through `Option` by every named method;
//! only the `/` operator panics.

use dashu::base::{Abs, Inverse, Signed as _, UnsignedAbs};
use dashu::integer::{IBig, UBig};
use dashu::rational::RBig;
use num_traits::{One, Zero};
use std::fmt;
use std::str::FromStr;

use crate::macros::{forward_binop, forward_neg, serde_as_decimal};
use crate::Integer;

/// An arbitrary precision rational number in lowest terms.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Rational(RBig);

/// The text that failed to parse as a [`Rational`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParseRationalError(String);

impl fmt::Display for ParseRationalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid rational literal: {}", self.0)
    }
}

impl std::error::Error for ParseRationalError {}

impl Rational {
    /// `numerator / denominator`, or `None` for a zero denominator.
    #[must_use]
    pub fn new(numerator: Integer, denominator: Integer) -> Option<Self> {
        if denominator.is_zero() {
            return None;
        }
        let flip = denominator.is_negative();
        let q = RBig::from_parts(numerator.into_inner(), denominator.into_inner().unsigned_abs());
        Some(Self(if flip { -q } else { q }))
    }

    /// `numerator / denominator` from machine integers.
    ///
    /// # Panics
    ///
    /// Panics if `denominator` is zero.
    #[must_use]
    pub fn from_i64(numerator: i64, denominator: i64) -> Self {
        assert_ne!(denominator, 0, "zero denominator in Rational::from_i64");
        let q = RBig::from_parts(IBig::from(numerator), UBig::from(denominator.unsigned_abs()));
        Self(if denominator < 0 { -q } else { q })
    }

    /// `n / 1`.
    #[must_use]
    pub fn from_integer(n: Integer) -> Self {
        Self(RBig::from(n.into_inner()))
    }

    /// The numerator, carrying the sign.
    #[must_use]
    pub fn numerator(&self) -> Integer {
        Integer::from(self.0.numerator().clone())
    }

    /// The denominator, always positive.
    #[must_use]
    pub fn denominator(&self) -> Integer {
        Integer::from(IBig::from(self.0.denominator().clone()))
    }

    /// Whether the denominator is one.
    #[must_use]
    pub fn is_integer(&self) -> bool {
        self.0.denominator().is_one()
    }

    /// The value as an [`Integer`] when it is one.
    #[must_use]
    pub fn to_integer(&self) -> Option<Integer> {
        self.is_integer().then(|| self.numerator())
    }

    /// The integer part, rounded toward zero.
    #[must_use]
    pub fn trunc(&self) -> Integer {
        self.numerator() / self.denominator()
    }

    /// `|self|`.
    #[must_use]
    pub fn abs(&self) -> Self {
        Self(self.0.clone().abs())
    }

    /// `1/self`, or `None` for zero.
    #[must_use]
    pub fn recip(&self) -> Option<Self> {
        (!self.is_zero()).then(|| Self(self.0.clone().inv()))
    }

    /// `self / other`, or `None` when `other` is zero.
    #[must_use]
    pub fn checked_div(&self, other: &Self) -> Option<Self> {
        (!other.is_zero()).then(|| self / other)
    }

    /// `self / n`, or `None` when `n` is zero.
    #[must_use]
    pub fn div_integer(&self, n: &Integer) -> Option<Self> {
        self.checked_div(&Self::from_integer(n.clone()))
    }

    /// `-1`, `0` or `1`.
    #[must_use]
    pub fn signum(&self) -> i8 {
        self.numerator().signum()
    }

    /// Whether `self < 0`.
    #[must_use]
    pub fn is_negative(&self) -> bool {
        self.0.is_negative()
    }

    /// Nearest `f64`, up to the rounding of both halves.
    #[must_use]
    pub fn to_f64(&self) -> f64 {
        self.numerator().to_f64() / self.denominator().to_f64()
    }

    /// `self^exp`.
    #[must_use]
    pub fn pow(&self, exp: u32) -> Self {
        Self(self.0.pow(exp as usize))
    }
}

impl Zero for Rational {
    fn zero() -> Self {
        Self(RBig::ZERO)
    }

    fn is_zero(&self) -> bool {
        self.0.is_zero()
    }
}

impl One for Rational {
    fn one() -> Self {
        Self(RBig::ONE)
    }

    fn is_one(&self) -> bool {
        self.0 == RBig::ONE
    }
}

impl fmt::Debug for Rational {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Rational({self})")
    }
}

/// `n` for integers, `n/d` otherwise.
impl fmt::Display for Rational {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (n, d) = (self.numerator(), self.denominator());
        if d.is_one() {
            write!(f, "{n}")
        } else {
            write!(f, "{n}/{d}")
        }
    }
}

impl FromStr for Rational {
    type Err = ParseRationalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseRationalError(s.to_string());
        let (num, den) = s.split_once('/').unwrap_or((s, "1"));
        let num: Integer = num.parse().map_err(|_| err())?;
        let den: Integer = den.parse().map_err(|_| err())?;
        Self::new(num, den).ok_or_else(err)
    }
}

serde_as_decimal!(Rational);

// `/` panics on a zero divisor; `checked_div` is the fallible form.
forward_binop!(Rational: Add::add, Sub::sub, Mul::mul, Div::div);
forward_neg!(Rational);

impl From<Integer> for Rational {
    fn from(n: Integer) -> Self {
        Self::from_integer(n)
    }
}

impl From<i64> for Rational {
    fn from(n: i64) -> Self {
        Self(RBig::from(IBig::from(n)))
    }
}

impl From<i32> for Rational {
    fn from(n: i32) -> Self {
        Self(RBig::from(IBig::from(n)))
    }
}

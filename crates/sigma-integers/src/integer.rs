//! Arbitrary precision integers.
//!
//! `Integer` wraps `dashu::IBig` and adds what coefficients and the GCD
//! engine need on top of ring arithmetic: truncating and exact division,
//! symmetric remainders, binomials and checked narrowing to exponent
//! widths.

use dashu::base::{Abs, BitTest, Gcd, Signed as _};
use dashu::integer::IBig;
use num_traits::{One, Zero};
use std::fmt;
use std::ops::{AddAssign, MulAssign, SubAssign};
use std::str::FromStr;

use crate::macros::{forward_binop, forward_neg, serde_as_decimal};

/// An arbitrary precision integer.
///
/// Values that fit in a machine word stay inline inside `IBig`, so small
/// exponents and multipliers cost no allocation.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Integer(IBig);

impl Integer {
    /// The integer `value`.
    #[must_use]
    pub fn new(value: i64) -> Self {
        Self(IBig::from(value))
    }

    /// Parses `s` in base `radix`.
    ///
    /// # Errors
    ///
    /// Fails on characters outside the radix or an empty string.
    pub fn from_str_radix(s: &str, radix: u32) -> Result<Self, dashu::base::error::ParseError> {
        IBig::from_str_radix(s, radix).map(Self)
    }

    /// `|self|`.
    #[must_use]
    pub fn abs(&self) -> Self {
        Self(self.0.clone().abs())
    }

    /// `-1`, `0` or `1`.
    #[must_use]
    pub fn signum(&self) -> i8 {
        if self.0.is_zero() {
            0
        } else if self.is_negative() {
            -1
        } else {
            1
        }
    }

    /// Whether `self < 0`.
    #[must_use]
    pub fn is_negative(&self) -> bool {
        self.0.is_negative()
    }

    /// Bits in the magnitude; zero for zero.
    #[must_use]
    pub fn bit_len(&self) -> usize {
        self.0.clone().abs().bit_len()
    }

    /// The non-negative gcd; `gcd(0, 0) = 0`.
    #[must_use]
    pub fn gcd(&self, other: &Self) -> Self {
        Self(IBig::from(self.0.clone().gcd(other.0.clone())))
    }

    /// The non-negative lcm; zero when either side is zero.
    #[must_use]
    pub fn lcm(&self, other: &Self) -> Self {
        if self.is_zero() || other.is_zero() {
            return Self::zero();
        }
        (self / &self.gcd(other) * other).abs()
    }

    /// `(q, r)` with `q` rounded toward zero and `r` carrying the sign of
    /// `self`, or `None` for a zero divisor.
    #[must_use]
    pub fn div_rem(&self, other: &Self) -> Option<(Self, Self)> {
        (!other.is_zero()).then(|| (self / other, self % other))
    }

    /// `q` with `q * other == self`, if there is one.
    #[must_use]
    pub fn div_exact(&self, other: &Self) -> Option<Self> {
        let (q, r) = self.div_rem(other)?;
        r.is_zero().then_some(q)
    }

    /// The representative of `self mod m` in `(-m/2, m/2]`, or `None`
    /// unless `m > 0`.
    #[must_use]
    pub fn symmetric_mod(&self, m: &Self) -> Option<Self> {
        if m.signum() <= 0 {
            return None;
        }
        let mut r = self % m;
        if r.is_negative() {
            r += m;
        }
        if &r + &r > *m {
            r -= m;
        }
        Some(r)
    }

    /// The wrapped `IBig`.
    #[must_use]
    pub fn into_inner(self) -> IBig {
        self.0
    }

    /// A reference to the wrapped `IBig`.
    #[must_use]
    pub fn as_inner(&self) -> &IBig {
        &self.0
    }

    /// `Some` when the value fits in an `i64`.
    #[must_use]
    pub fn to_i64(&self) -> Option<i64> {
        self.0.clone().try_into().ok()
    }

    /// `Some` when the value fits the `i16` exponent width of monomials.
    #[must_use]
    pub fn to_i16(&self) -> Option<i16> {
        self.0.clone().try_into().ok()
    }

    /// Nearest `f64`, through the decimal form for large magnitudes.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn to_f64(&self) -> f64 {
        self.to_i64()
            .map_or_else(|| self.to_string().parse().unwrap_or(f64::NAN), |v| v as f64)
    }

    /// `self^exp`.
    #[must_use]
    pub fn pow(&self, exp: u32) -> Self {
        Self(self.0.pow(exp as usize))
    }

    /// `C(n, k)`, zero for `k > n`.
    #[must_use]
    pub fn binomial(n: u32, k: u32) -> Self {
        if k > n {
            return Self::zero();
        }
        // each partial product C(n, i+1) is an integer
        (0..k.min(n - k)).fold(Self::one(), |acc, i| {
            acc * Self::from(u64::from(n - i)) / Self::from(u64::from(i + 1))
        })
    }
}

impl Zero for Integer {
    fn zero() -> Self {
        Self(IBig::ZERO)
    }

    fn is_zero(&self) -> bool {
        self.0.is_zero()
    }
}

impl One for Integer {
    fn one() -> Self {
        Self(IBig::ONE)
    }

    fn is_one(&self) -> bool {
        self.0 == IBig::ONE
    }
}

impl fmt::Debug for Integer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Integer({})", self.0)
    }
}

impl fmt::Display for Integer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl FromStr for Integer {
    type Err = dashu::base::error::ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_str_radix(s.trim(), 10)
    }
}

serde_as_decimal!(Integer);

// `/` and `%` truncate and panic on a zero divisor; `div_rem` is the
// checked form.
forward_binop!(Integer: Add::add, Sub::sub, Mul::mul, Div::div, Rem::rem);
forward_neg!(Integer);

impl AddAssign<&Integer> for Integer {
    fn add_assign(&mut self, rhs: &Integer) {
        self.0 += &rhs.0;
    }
}

impl SubAssign<&Integer> for Integer {
    fn sub_assign(&mut self, rhs: &Integer) {
        self.0 -= &rhs.0;
    }
}

impl MulAssign<&Integer> for Integer {
    fn mul_assign(&mut self, rhs: &Integer) {
        self.0 *= &rhs.0;
    }
}

impl From<i64> for Integer {
    fn from(value: i64) -> Self {
        Self::new(value)
    }
}

impl From<i32> for Integer {
    fn from(value: i32) -> Self {
        Self(IBig::from(value))
    }
}

impl From<i16> for Integer {
    fn from(value: i16) -> Self {
        Self(IBig::from(value))
    }
}

impl From<u64> for Integer {
    fn from(value: u64) -> Self {
        Self(IBig::from(value))
    }
}

impl From<IBig> for Integer {
    fn from(value: IBig) -> Self {
        Self(value)
    }
}

//! `Q`, the rationals.

use num_traits::{One, Zero};
use serde::{Deserialize, Serialize};
use sigma_integers::{Integer, Rational};

use crate::macros::newtype_ring_ops;
use crate::traits::{EuclideanDomain, Field, Ring};

/// Exact rational coefficients, always in lowest terms.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Q(pub Rational);

impl Q {
    /// `num/den` in lowest terms.
    ///
    /// # Panics
    ///
    /// Panics if `den` is zero.
    #[must_use]
    pub fn new(num: i64, den: i64) -> Self {
        Self(Rational::from_i64(num, den))
    }

    /// The integer `n` as a rational.
    #[must_use]
    pub fn from_integer(n: i64) -> Self {
        Self(Rational::from(n))
    }
}

newtype_ring_ops!(Q(Rational), i64 => Rational::from, Integer => Rational::from_integer);

impl Ring for Q {
    fn zero() -> Self {
        Self(Rational::zero())
    }

    fn one() -> Self {
        Self(Rational::one())
    }

    fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    fn is_one(&self) -> bool {
        self.0.is_one()
    }
}

impl EuclideanDomain for Q {
    /// Division in a field leaves no remainder.
    fn div_rem(&self, other: &Self) -> Option<(Self, Self)> {
        Some((self.field_div(other)?, Self::zero()))
    }

    /// `gcd(a/b, c/d) = gcd(a, c) / lcm(b, d)`, so the primitive part of
    /// `x/2 + y/3` is `3x + 2y`.
    fn gcd(&self, other: &Self) -> Self {
        let num = self.0.numerator().gcd(&other.0.numerator());
        let den = self.0.denominator().lcm(&other.0.denominator());
        Rational::new(num, den).map_or_else(Self::zero, Self)
    }
}

impl Field for Q {
    fn inv(&self) -> Option<Self> {
        self.0.recip().map(Self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lowest_terms() {
        assert_eq!(Q::new(4, -6), Q::new(-2, 3));
        assert_eq!(Q::new(2, 3) + Q::new(3, 4), Q::new(17, 12));
        assert_eq!(Q::new(2, 3) * Q::new(3, 4), Q::new(1, 2));
        assert_eq!(Q::from(Integer::new(5)), Q::from_integer(5));
        assert_eq!(Q::new(-1, 2).to_string(), "-1/2");
    }

    #[test]
    fn test_inverse_and_division() {
        let a = Q::new(3, 5);
        assert!((a.clone() * a.inv().unwrap()).is_one());
        assert!(Q::zero().inv().is_none());
        assert_eq!(Q::new(1, 2).field_div(&Q::new(1, 3)), Some(Q::new(3, 2)));
        assert_eq!(Q::new(1, 2).div_rem(&Q::new(1, 4)), Some((Q::from(2), Q::zero())));
        assert!(Q::new(1, 2).div_exact(&Q::zero()).is_none());
    }

    #[test]
    fn test_gcd_of_fractions() {
        assert_eq!(Q::new(1, 2).gcd(&Q::new(1, 3)), Q::new(1, 6));
        assert_eq!(Q::new(4, 3).gcd(&Q::new(6, 5)), Q::new(2, 15));
        assert_eq!(Q::zero().gcd(&Q::new(3, 7)), Q::new(3, 7));
        assert!(Q::zero().gcd(&Q::zero()).is_zero());
    }
}

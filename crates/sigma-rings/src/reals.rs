//! `R`, fixed-precision reals.

use num_traits::{One, Zero};
use serde::{Deserialize, Serialize};
use sigma_integers::{Integer, Rational, Real};

use crate::macros::newtype_ring_ops;
use crate::traits::{Field, Ring};

/// Real coefficients at the working precision of [`Real`].
///
/// Rounding makes exact division meaningless, so `R` is a [`Field`] but
/// not a [`EuclideanDomain`](crate::EuclideanDomain): series over `R` have
/// no content or gcd.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Debug, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct R(pub Real);

impl R {
    /// `R` from an `f64`; NaN and infinities become zero.
    #[must_use]
    pub fn from_f64(value: f64) -> Self {
        Self(Real::from_f64(value).unwrap_or_else(Real::zero))
    }
}

newtype_ring_ops!(
    R(Real),
    i64 => Real::from,
    Integer => |n: Integer| Real::from_integer(&n),
    Rational => |q: Rational| Real::from_rational(&q),
);

impl Ring for R {
    fn zero() -> Self {
        Self(Real::zero())
    }

    fn one() -> Self {
        Self(Real::one())
    }

    fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    fn is_one(&self) -> bool {
        self.0.is_one()
    }
}

impl Field for R {
    fn inv(&self) -> Option<Self> {
        Real::one().checked_div(&self.0).map(Self)
    }
}

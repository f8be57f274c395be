//! `Z`, the integers.

use num_traits::{One, Zero};
use serde::{Deserialize, Serialize};
use sigma_integers::Integer;

use crate::macros::newtype_ring_ops;
use crate::traits::{EuclideanDomain, Ring};

/// Exact integer coefficients.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Z(pub Integer);

impl Z {
    /// `Z` from a machine integer.
    #[must_use]
    pub fn new(value: i64) -> Self {
        Self(Integer::new(value))
    }
}

newtype_ring_ops!(Z(Integer), i64 => Integer::new);

impl Ring for Z {
    fn zero() -> Self {
        Self(Integer::zero())
    }

    fn one() -> Self {
        Self(Integer::one())
    }

    fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    fn is_one(&self) -> bool {
        self.0.is_one()
    }

    fn pow(&self, n: u32) -> Self {
        Self(self.0.pow(n))
    }
}

impl EuclideanDomain for Z {
    /// Truncating division: the remainder has the sign of `self`.
    fn div_rem(&self, other: &Self) -> Option<(Self, Self)> {
        let (q, r) = self.0.div_rem(&other.0)?;
        Some((Self(q), Self(r)))
    }

    fn div_exact(&self, other: &Self) -> Option<Self> {
        self.0.div_exact(&other.0).map(Self)
    }

    fn gcd(&self, other: &Self) -> Self {
        Self(self.0.gcd(&other.0))
    }
}

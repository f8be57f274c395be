//! The ring interface shared by `Z`, `Q` and `R`.
//!
//! Division never panics: a zero or non-dividing divisor gives `None`, and
//! the series layer turns that into an error.

use std::fmt::{Debug, Display};
use std::ops::{Add, Mul, Neg, Sub};

/// A commutative ring with unity.
///
/// The operators consume their operands; callers clone where they must.
pub trait Ring:
    Clone + Eq + Debug + Display + Add<Output = Self> + Sub<Output = Self> + Mul<Output = Self> + Neg<Output = Self>
{
    /// `0`.
    fn zero() -> Self;

    /// `1`.
    fn one() -> Self;

    /// Whether `self == 0`.
    fn is_zero(&self) -> bool;

    /// Whether `self == 1`.
    fn is_one(&self) -> bool;

    /// `self^n` by binary exponentiation.
    #[must_use]
    fn pow(&self, n: u32) -> Self {
        let mut acc = Self::one();
        let mut square = self.clone();
        let mut bits = n;
        while bits != 0 {
            if bits & 1 == 1 {
                acc = acc * square.clone();
            }
            bits >>= 1;
            if bits != 0 {
                square = square.clone() * square;
            }
        }
        acc
    }
}

/// Rings with a division algorithm.
pub trait EuclideanDomain: Ring {
    /// `(q, r)` with `self = q·other + r`, or `None` when `other` is zero.
    fn div_rem(&self, other: &Self) -> Option<(Self, Self)>;

    /// `self / other` when it leaves no remainder.
    fn div_exact(&self, other: &Self) -> Option<Self> {
        self.div_rem(other).and_then(|(q, r)| r.is_zero().then_some(q))
    }

    /// A greatest common divisor by Euclid's algorithm. `gcd(0, 0) = 0`.
    fn gcd(&self, other: &Self) -> Self {
        let mut a = self.clone();
        let mut b = other.clone();
        while !b.is_zero() {
            let Some((_, r)) = a.div_rem(&b) else {
                break;
            };
            a = std::mem::replace(&mut b, r);
        }
        a
    }
}

/// Rings in which every nonzero element is invertible.
pub trait Field: Ring {
    /// `1/self`, or `None` for zero.
    fn inv(&self) -> Option<Self>;

    /// `self/other`, or `None` when `other` is zero.
    fn field_div(&self, other: &Self) -> Option<Self> {
        Some(self.clone() * other.inv()?)
    }
}

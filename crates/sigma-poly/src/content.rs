//! Coefficient gcds, content and primitive part.

use sigma_rings::{EuclideanDomain, Q, Z};
use sigma_series::{Coefficient, Key, PolyKey, Result, Series, SeriesError};

use crate::gcd::{gcd, GcdAlgorithm};
use crate::heuristic;

/// Coefficient rings with a greatest common divisor.
///
/// Floating-point coefficients have no implementation, so `content` and
/// `gcd` are not available for them.
pub trait GcdCoefficient: Coefficient {
    /// A gcd of `self` and `other`, unique up to a unit.
    ///
    /// # Errors
    ///
    /// Propagates the failures of nested polynomial gcds.
    fn gcd(&self, other: &Self) -> Result<Self>;

    /// Returns true when the leading coefficient is negative. Numbers are
    /// their own leading coefficient; a series leads with the term of the
    /// greatest key.
    fn is_negative(&self) -> bool;

    /// Runs the heuristic gcd on polynomials over this ring, or returns
    /// `None` when the ring does not support it.
    fn heuristic_gcd<K: PolyKey>(_a: &Series<Self, K>, _b: &Series<Self, K>) -> Option<Result<Series<Self, K>>> {
        None
    }
}

impl GcdCoefficient for Z {
    fn gcd(&self, other: &Self) -> Result<Self> {
        Ok(Z(self.0.gcd(&other.0)))
    }

    fn is_negative(&self) -> bool {
        self.0.is_negative()
    }

    fn heuristic_gcd<K: PolyKey>(a: &Series<Self, K>, b: &Series<Self, K>) -> Option<Result<Series<Self, K>>> {
        Some(heuristic::gcdheu(a, b))
    }
}

impl GcdCoefficient for Q {
    fn gcd(&self, other: &Self) -> Result<Self> {
        Ok(EuclideanDomain::gcd(self, other))
    }

    fn is_negative(&self) -> bool {
        self.0.is_negative()
    }
}

impl<C: GcdCoefficient, K: PolyKey> GcdCoefficient for Series<C, K> {
    fn gcd(&self, other: &Self) -> Result<Self> {
        gcd(self, other, GcdAlgorithm::Automatic)
    }

    fn is_negative(&self) -> bool {
        self.iter()
            .max_by(|a, b| a.0.cmp(b.0))
            .is_some_and(|(_, c)| c.is_negative())
    }
}

/// The gcd of all coefficients; zero for the zero series.
///
/// # Errors
///
/// Propagates coefficient gcd failures.
pub fn content<C: GcdCoefficient, K: Key>(p: &Series<C, K>) -> Result<C> {
    let mut acc = C::zero();
    for (_, c) in p.sorted_terms() {
        acc = acc.gcd(c)?;
    }
    Ok(acc)
}

/// `p / content(p)`.
///
/// # Errors
///
/// `ZeroDivision` for the zero series.
pub fn primitive_part<C: GcdCoefficient, K: Key>(p: &Series<C, K>) -> Result<Series<C, K>> {
    let c = content(p)?;
    if c.is_zero() {
        return Err(SeriesError::zero_division(
            "the primitive part of a zero polynomial is undefined",
        ));
    }
    p.div_cf(&c)
}

//! # Sigma
//!
//! Sparse multivariate symbolic series algebra for celestial mechanics
//! and perturbation theory.
//!
//! A series is a map from keys (monomials, trigonometric monomials or
//! divisors) to coefficients, which may themselves be series. The crates
//! below build up from exact arithmetic to Poisson series:
//!
//! - **Integers**: arbitrary precision integers, rationals and reals
//! - **Rings**: the coefficient rings `Z`, `Q` and `R`
//! - **Series**: symbol sets, keys, the generic [`Series`](series::Series)
//!   container, parallel multiplication, truncation, calculus and
//!   serialization
//! - **Poly**: polynomial division, content and multivariate GCD
//! - **Poisson**: trigonometric and divisor series, time integration
//!
//! ## Quick Start
//!
//! ```rust
//! use sigma::prelude::*;
//!
//! let x = Polynomial::<Q>::from_symbol("x").unwrap();
//! let y = Polynomial::<Q>::from_symbol("y").unwrap();
//! let s = x.add(&y).unwrap().pow(2).unwrap();
//! assert_eq!(s.len(), 3);
//! assert_eq!(s.degree(), 2);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub use sigma_integers as integers;
pub use sigma_poisson as poisson;
pub use sigma_poly as poly;
pub use sigma_rings as rings;
pub use sigma_series as series;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use sigma_integers::{Integer, Rational, Real};
    pub use sigma_poisson::{invert, DivisorSeries, PoissonSeries, TimeIntegration, Trigonometric};
    pub use sigma_poly::{content, gcd, primitive_part, udivrem, GcdAlgorithm, RationalFunction};
    pub use sigma_rings::{Q, R, Z};
    pub use sigma_series::{
        Coefficient, Compression, ErrorKind, KPolynomial, Key, Polynomial, Result, SaveFormat, Series,
        SeriesError, SymbolSet, Truncation,
    };
}

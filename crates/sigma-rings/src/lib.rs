//! # sigma-rings
//!
//! The numeric rings series coefficients bottom out in.
//!
//! - [`Z`]: exact integers, a Euclidean domain
//! - [`Q`]: exact rationals, a field whose gcd is the fraction gcd
//! - [`R`]: fixed-precision reals, a field with no gcd
//!
//! ```text
//! Ring
//!  ├── EuclideanDomain   (Z, Q)
//!  └── Field             (Q, R)
//! ```
//!
//! Polynomial content and gcds need [`EuclideanDomain`], so they are
//! available over `Z` and `Q` only.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

mod macros;

pub mod integers;
pub mod rationals;
pub mod reals;
pub mod traits;

#[cfg(test)]
mod proptests;

pub use integers::Z;
pub use rationals::Q;
pub use reals::R;
pub use traits::{EuclideanDomain, Field, Ring};

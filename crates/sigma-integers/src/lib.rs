//! # sigma-integers
//!
//! Arbitrary precision numbers used as series coefficients and evaluation
//! values in sigma.
//!
//! This crate wraps `dashu` to provide:
//! - Arbitrary precision integers (`Integer`)
//! - Arbitrary precision rationals (`Rational`)
//! - Fixed-precision decimal floats (`Real`)
//!
//! All three serialize through `serde` as decimal strings, so persisted
//! series are byte-stable across architectures.
//!
//! Integers that fit in a machine word are stored inline, so the exponents
//! and multipliers that dominate series work do not allocate.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

mod macros;

pub mod integer;
pub mod rational;
pub mod real;

#[cfg(test)]
mod proptests;

pub use integer::Integer;
pub use rational::{ParseRationalError, Rational};
pub use real::{Real, REAL_PRECISION};

//! # sigma-poly
//!
//! Polynomial algorithms on top of sigma series.
//!
//! This crate provides:
//! - Univariate pseudo-division ([`udivrem`])
//! - Recursive representation ([`split`] / [`join`])
//! - Content and primitive part over rings with a gcd
//! - Multivariate GCD via the heuristic GCDHEU or the subresultant PRS
//! - Rational functions in lowest terms ([`RationalFunction`])
//!
//! Polynomials are any [`Series`](sigma_series::Series) whose key is a
//! [`PolyKey`](sigma_series::PolyKey).

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod content;
pub mod gcd;
mod heuristic;
pub mod rational_function;
pub mod split;
pub mod univariate;

#[cfg(test)]
mod proptests;

pub use content::{content, primitive_part, GcdCoefficient};
pub use gcd::{gcd, GcdAlgorithm};
pub use rational_function::RationalFunction;
pub use split::{join, split};
pub use univariate::udivrem;

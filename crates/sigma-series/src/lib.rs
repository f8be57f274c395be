//! # sigma-series
//!
//! Sparse multivariate series over generic coefficients and keys.
//!
//! This crate provides:
//! - Symbol sets and the [`Key`] abstraction, with dense ([`Monomial`]) and
//!   Kronecker-packed ([`KroneckerMonomial`]) polynomial keys
//! - The generic [`Series`] container and its arithmetic
//! - A parallel, truncation-aware multiplication engine
//! - Differentiation, integration, substitution and evaluation
//! - Archive persistence in portable and binary formats
//!
//! ## Nesting
//!
//! Every series is itself a [`Coefficient`], so nested series such as
//! `Series<Series<Q, Monomial>, KroneckerMonomial>` get the full algebra.
//!
//! ## Global state
//!
//! Thread count and output limits live in [`settings`]. Automatic
//! truncation, the pow cache and custom derivatives are configured per
//! series type.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod calculus;
pub mod coefficient;
pub mod division;
pub mod error;
pub mod key;
pub mod kronecker;
pub mod monomial;
pub mod multiplier;
pub mod pow;
pub mod s11n;
pub mod series;
pub mod settings;
pub mod subs;
pub mod symbol_set;
pub mod terms;
pub mod truncation;

#[cfg(test)]
mod proptests;

pub use calculus::{
    custom_derivative, custom_derivatives, register_custom_derivative,
    unregister_all_custom_derivatives, unregister_custom_derivative, CustomDerivative,
};
pub use coefficient::{Coefficient, EvalValue};
pub use error::{ErrorKind, Result, SeriesError};
pub use key::{Exponents, Key, KeyIntegral, PolyKey, ProductTerm, ProductTerms};
pub use kronecker::KroneckerMonomial;
pub use monomial::Monomial;
pub use multiplier::{multiply, multiply_with};
pub use s11n::{load, load_file, save, save_file, Compression, SaveFormat};
pub use series::Series;
pub use settings::Settings;
pub use symbol_set::{InsertionMap, SymbolSet};
pub use truncation::Truncation;

/// A polynomial with dense exponent vectors.
pub type Polynomial<C> = Series<C, Monomial>;

/// A polynomial with Kronecker-packed monomials.
pub type KPolynomial<C> = Series<C, KroneckerMonomial>;

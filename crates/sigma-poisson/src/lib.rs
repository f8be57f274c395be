//! # sigma-poisson
//!
//! Trigonometric and divisor series for perturbation theory.
//!
//! This crate provides:
//! - [`TrigMonomial`] keys, `cos`/`sin` of integral linear combinations
//! - [`Divisor`] keys, products of negative powers of linear forms
//! - [`PoissonSeries`] and [`DivisorSeries`] aliases over the generic
//!   [`Series`](sigma_series::Series)
//! - The [`Trigonometric`] extension trait: construction through `cos` and
//!   `sin`, trigonometric degrees and `t_subs`
//! - Time integration of Poisson series with divisor-series coefficients
//!
//! ## Example
//!
//! ```
//! use sigma_poisson::{PoissonSeries, Trigonometric};
//! use sigma_rings::Q;
//! use sigma_series::Polynomial;
//!
//! type PS = PoissonSeries<Polynomial<Q>>;
//!
//! let x = PS::from_symbol("x").unwrap();
//! let c = x.cos().unwrap();
//! let s = x.sin().unwrap();
//! let one = c.mul(&c).unwrap().add(&s.mul(&s).unwrap()).unwrap();
//! assert_eq!(one, PS::from_integer(1));
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod divisor;
pub mod divisor_series;
mod linear;
pub mod poisson;
pub mod trig;

#[cfg(test)]
mod proptests;

pub use divisor::Divisor;
pub use divisor_series::{invert, DivisorSeries};
pub use poisson::{PoissonSeries, TimeIntegration, Trigonometric};
pub use trig::TrigMonomial;

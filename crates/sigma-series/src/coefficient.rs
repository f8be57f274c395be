//! Coefficient rings and evaluation targets.
//!
//! [`Coefficient`] is the contract a term coefficient has to satisfy. It is
//! implemented for the numeric rings `Z`, `Q` and `R`, and for
//! [`Series`](crate::Series) itself, which is what makes nesting such as
//! `Series<Series<Q, Monomial>, TrigMonomial>` work.
//!
//! [`EvalValue`] is the value type a series is evaluated into.

use std::collections::HashMap;
use std::fmt::{Debug, Display};

use num_traits::{One, Zero};
use serde::de::DeserializeOwned;
use serde::Serialize;
use sigma_integers::{Integer, Rational, Real};
use sigma_rings::{Q, R, Z};

use crate::error::{Result, SeriesError};

/// A coefficient of a series term.
pub trait Coefficient:
    Clone + PartialEq + Debug + Display + Send + Sync + Serialize + DeserializeOwned + 'static
{
    /// Additive identity.
    fn zero() -> Self;

    /// Multiplicative identity.
    fn one() -> Self;

    /// Returns true for the additive identity.
    fn is_zero(&self) -> bool;

    /// Returns true for the multiplicative identity.
    fn is_one(&self) -> bool;

    /// Embeds an integer.
    fn from_integer(n: &Integer) -> Self;

    /// In-place addition.
    ///
    /// # Errors
    ///
    /// Fails when nested series cannot be merged.
    fn add_assign(&mut self, other: &Self) -> Result<()>;

    /// In-place subtraction.
    ///
    /// # Errors
    ///
    /// Fails when nested series cannot be merged.
    fn sub_assign(&mut self, other: &Self) -> Result<()>;

    /// Additive inverse.
    #[must_use]
    fn neg(&self) -> Self;

    /// Product.
    ///
    /// # Errors
    ///
    /// Fails on exponent overflow in nested series.
    fn mul(&self, other: &Self) -> Result<Self>;

    /// Product with an integer.
    ///
    /// # Errors
    ///
    /// Fails on exponent overflow in nested series.
    fn mul_integer(&self, n: &Integer) -> Result<Self> {
        self.mul(&Self::from_integer(n))
    }

    /// Division by a nonzero integer.
    ///
    /// # Errors
    ///
    /// `ZeroDivision` for a zero divisor, `Arithmetic` when the ring has no
    /// exact quotient.
    fn div_integer(&self, n: &Integer) -> Result<Self>;

    /// Exact quotient.
    ///
    /// # Errors
    ///
    /// `ZeroDivision` for a zero divisor, `Arithmetic` when not exact.
    fn div_exact(&self, other: &Self) -> Result<Self>;

    /// Multiplicative inverse.
    ///
    /// # Errors
    ///
    /// `ZeroDivision` for zero, `Arithmetic` when no inverse exists.
    fn invert(&self) -> Result<Self>;

    /// Integral power, negative exponents go through [`Coefficient::invert`].
    ///
    /// # Errors
    ///
    /// Propagates multiplication and inversion failures.
    fn pow(&self, n: i64) -> Result<Self> {
        let mut base = if n < 0 { self.invert()? } else { self.clone() };
        let mut acc = Self::one();
        let mut e = n.unsigned_abs();
        while e > 0 {
            if e & 1 == 1 {
                acc = acc.mul(&base)?;
            }
            e >>= 1;
            if e > 0 {
                base = base.mul(&base)?;
            }
        }
        Ok(acc)
    }

    /// Degree in `names` (all symbols when `None`).
    fn degree(&self, _names: Option<&[String]>) -> i64 {
        0
    }

    /// Low degree in `names` (all symbols when `None`).
    fn ldegree(&self, _names: Option<&[String]>) -> i64 {
        0
    }

    /// Drops every part of degree greater than `max`.
    ///
    /// # Errors
    ///
    /// Fails when nested series cannot be rebuilt.
    fn truncate_degree(&self, max: i64, _names: Option<&[String]>) -> Result<Self> {
        Ok(if max < 0 { Self::zero() } else { self.clone() })
    }

    /// Returns true if the coefficient mentions `name`.
    fn depends_on(&self, _name: &str) -> bool {
        false
    }

    /// Derivative with respect to `name`.
    ///
    /// # Errors
    ///
    /// Fails on overflow in nested series.
    fn partial(&self, _name: &str) -> Result<Self> {
        Ok(Self::zero())
    }

    /// Antiderivative with respect to `name`.
    ///
    /// # Errors
    ///
    /// Numeric coefficients cannot be integrated on their own.
    fn integrate(&self, name: &str) -> Result<Self> {
        Err(SeriesError::invalid(format!(
            "unable to integrate a numerical coefficient with respect to '{name}'"
        )))
    }

    /// Substitutes `value` for `name`.
    ///
    /// # Errors
    ///
    /// Fails when the substitution is not representable.
    fn subs(&self, _name: &str, _value: &Self) -> Result<Self> {
        Ok(self.clone())
    }

    /// Evaluates with the given symbol values.
    ///
    /// # Errors
    ///
    /// `InvalidArgument` for a missing symbol, `TypeMismatch` when the value
    /// type cannot represent the coefficient.
    fn evaluate<V: EvalValue>(&self, values: &HashMap<String, V>) -> Result<V>;

    /// Decomposes the coefficient as `Σ n_i · name_i` with integral `n_i`.
    ///
    /// # Errors
    ///
    /// `InvalidArgument` when the coefficient is not such a combination.
    fn integral_combination(&self) -> Result<Vec<(String, Integer)>> {
        if self.is_zero() {
            Ok(Vec::new())
        } else {
            Err(SeriesError::invalid(
                "the coefficient is not an integral linear combination of symbols",
            ))
        }
    }

    /// The coefficient as an integer, if it is one.
    fn to_integer(&self) -> Option<Integer>;

    /// The coefficient standing for a bare symbol.
    ///
    /// # Errors
    ///
    /// Numeric coefficients cannot represent symbols.
    fn from_symbol(name: &str) -> Result<Self> {
        Err(SeriesError::type_mismatch(format!(
            "a numerical coefficient cannot represent the symbol '{name}'"
        )))
    }

    /// Removes unused symbols from nested series.
    ///
    /// # Errors
    ///
    /// Fails when nested keys cannot be re-encoded.
    fn trim(&self) -> Result<Self> {
        Ok(self.clone())
    }

    /// Returns true if printing the coefficient as a factor needs brackets.
    fn needs_brackets(&self) -> bool {
        false
    }
}

/// A value a series can be evaluated into.
pub trait EvalValue: Clone + Debug + Send + Sync + 'static {
    /// Additive identity.
    fn zero() -> Self;

    /// Multiplicative identity.
    fn one() -> Self;

    /// Returns true for zero.
    fn is_zero(&self) -> bool;

    /// Sum.
    #[must_use]
    fn add(&self, other: &Self) -> Self;

    /// Product.
    #[must_use]
    fn mul(&self, other: &Self) -> Self;

    /// Additive inverse.
    #[must_use]
    fn neg(&self) -> Self;

    /// Quotient.
    ///
    /// # Errors
    ///
    /// `ZeroDivision` for a zero divisor.
    fn div(&self, other: &Self) -> Result<Self>;

    /// Integral power.
    ///
    /// # Errors
    ///
    /// `ZeroDivision` when a negative power of zero is requested.
    fn powi(&self, n: i64) -> Result<Self> {
        let mut acc = Self::one();
        let mut base = self.clone();
        let mut e = n.unsigned_abs();
        while e > 0 {
            if e & 1 == 1 {
                acc = acc.mul(&base);
            }
            base = base.mul(&base);
            e >>= 1;
        }
        if n < 0 {
            Self::one().div(&acc)
        } else {
            Ok(acc)
        }
    }

    /// Converts an integer.
    ///
    /// # Errors
    ///
    /// Fails when the value type cannot hold integers.
    fn from_integer(n: &Integer) -> Result<Self>;

    /// Converts a rational.
    ///
    /// # Errors
    ///
    /// Fails when the value type cannot hold rationals.
    fn from_rational(q: &Rational) -> Result<Self>;

    /// Converts a real.
    ///
    /// # Errors
    ///
    /// Fails when the value type cannot hold reals.
    fn from_real(r: &Real) -> Result<Self>;

    /// Cosine.
    ///
    /// # Errors
    ///
    /// Exact value types only know `cos(0) = 1`.
    fn cos(&self) -> Result<Self> {
        if self.is_zero() {
            Ok(Self::one())
        } else {
            Err(SeriesError::type_mismatch(
                "cosine of a nonzero value cannot be computed exactly",
            ))
        }
    }

    /// Sine.
    ///
    /// # Errors
    ///
    /// Exact value types only know `sin(0) = 0`.
    fn sin(&self) -> Result<Self> {
        if self.is_zero() {
            Ok(Self::zero())
        } else {
            Err(SeriesError::type_mismatch(
                "sine of a nonzero value cannot be computed exactly",
            ))
        }
    }
}

/// Looks up the value of every symbol in `names`.
///
/// # Errors
///
/// `InvalidArgument` if a symbol has no value.
pub fn lookup_values<V: EvalValue>(names: &[String], values: &HashMap<String, V>) -> Result<Vec<V>> {
    names
        .iter()
        .map(|n| {
            values.get(n).cloned().ok_or_else(|| {
                SeriesError::invalid(format!(
                    "the symbol '{n}' is missing from the dictionary used for evaluation"
                ))
            })
        })
        .collect()
}

fn zero_divisor() -> SeriesError {
    SeriesError::zero_division("division of a coefficient by zero")
}

impl Coefficient for Z {
    fn zero() -> Self {
        <Self as sigma_rings::Ring>::zero()
    }

    fn one() -> Self {
        <Self as sigma_rings::Ring>::one()
    }

    fn is_zero(&self) -> bool {
        sigma_rings::Ring::is_zero(self)
    }

    fn is_one(&self) -> bool {
        sigma_rings::Ring::is_one(self)
    }

    fn from_integer(n: &Integer) -> Self {
        Self(n.clone())
    }

    fn add_assign(&mut self, other: &Self) -> Result<()> {
        self.0 += &other.0;
        Ok(())
    }

    fn sub_assign(&mut self, other: &Self) -> Result<()> {
        self.0 -= &other.0;
        Ok(())
    }

    fn neg(&self) -> Self {
        Self(-&self.0)
    }

    fn mul(&self, other: &Self) -> Result<Self> {
        Ok(Self(&self.0 * &other.0))
    }

    fn div_integer(&self, n: &Integer) -> Result<Self> {
        if Zero::is_zero(n) {
            return Err(zero_divisor());
        }
        self.0.div_exact(n).map(Self).ok_or_else(|| {
            SeriesError::arithmetic(format!(
                "the integer {} is not divisible by {n}; use rational coefficients",
                self.0
            ))
        })
    }

    fn div_exact(&self, other: &Self) -> Result<Self> {
        self.div_integer(&other.0)
    }

    fn invert(&self) -> Result<Self> {
        if Zero::is_zero(&self.0) {
            return Err(zero_divisor());
        }
        if self.0.abs().is_one() {
            Ok(self.clone())
        } else {
            Err(SeriesError::arithmetic(format!(
                "the integer {} has no integral inverse",
                self.0
            )))
        }
    }

    fn evaluate<V: EvalValue>(&self, _values: &HashMap<String, V>) -> Result<V> {
        V::from_integer(&self.0)
    }

    fn integral_combination(&self) -> Result<Vec<(String, Integer)>> {
        if Zero::is_zero(&self.0) {
            Ok(Vec::new())
        } else {
            Err(SeriesError::invalid(
                "a linear combination of symbols must not have a constant term",
            ))
        }
    }

    fn to_integer(&self) -> Option<Integer> {
        Some(self.0.clone())
    }
}

impl Coefficient for Q {
    fn zero() -> Self {
        <Self as sigma_rings::Ring>::zero()
    }

    fn one() -> Self {
        <Self as sigma_rings::Ring>::one()
    }

    fn is_zero(&self) -> bool {
        sigma_rings::Ring::is_zero(self)
    }

    fn is_one(&self) -> bool {
        sigma_rings::Ring::is_one(self)
    }

    fn from_integer(n: &Integer) -> Self {
        Self(Rational::from_integer(n.clone()))
    }

    fn add_assign(&mut self, other: &Self) -> Result<()> {
        self.0 = &self.0 + &other.0;
        Ok(())
    }

    fn sub_assign(&mut self, other: &Self) -> Result<()> {
        self.0 = &self.0 - &other.0;
        Ok(())
    }

    fn neg(&self) -> Self {
        Self(-&self.0)
    }

    fn mul(&self, other: &Self) -> Result<Self> {
        Ok(Self(&self.0 * &other.0))
    }

    fn div_integer(&self, n: &Integer) -> Result<Self> {
        self.0.div_integer(n).map(Self).ok_or_else(zero_divisor)
    }

    fn div_exact(&self, other: &Self) -> Result<Self> {
        sigma_rings::Field::field_div(self, other).ok_or_else(zero_divisor)
    }

    fn invert(&self) -> Result<Self> {
        sigma_rings::Field::inv(self).ok_or_else(zero_divisor)
    }

    fn evaluate<V: EvalValue>(&self, _values: &HashMap<String, V>) -> Result<V> {
        V::from_rational(&self.0)
    }

    fn integral_combination(&self) -> Result<Vec<(String, Integer)>> {
        if Zero::is_zero(&self.0) {
            Ok(Vec::new())
        } else {
            Err(SeriesError::invalid(
                "a linear combination of symbols must not have a constant term",
            ))
        }
    }

    fn to_integer(&self) -> Option<Integer> {
        self.0.to_integer()
    }
}

impl Coefficient for R {
    fn zero() -> Self {
        <Self as sigma_rings::Ring>::zero()
    }

    fn one() -> Self {
        <Self as sigma_rings::Ring>::one()
    }

    fn is_zero(&self) -> bool {
        sigma_rings::Ring::is_zero(self)
    }

    fn is_one(&self) -> bool {
        sigma_rings::Ring::is_one(self)
    }

    fn from_integer(n: &Integer) -> Self {
        Self(Real::from_integer(n))
    }

    fn add_assign(&mut self, other: &Self) -> Result<()> {
        self.0 = &self.0 + &other.0;
        Ok(())
    }

    fn sub_assign(&mut self, other: &Self) -> Result<()> {
        self.0 = &self.0 - &other.0;
        Ok(())
    }

    fn neg(&self) -> Self {
        Self(-&self.0)
    }

    fn mul(&self, other: &Self) -> Result<Self> {
        Ok(Self(&self.0 * &other.0))
    }

    fn div_integer(&self, n: &Integer) -> Result<Self> {
        self.0
            .checked_div(&Real::from_integer(n))
            .map(Self)
            .ok_or_else(zero_divisor)
    }

    fn div_exact(&self, other: &Self) -> Result<Self> {
        sigma_rings::Field::field_div(self, other).ok_or_else(zero_divisor)
    }

    fn invert(&self) -> Result<Self> {
        sigma_rings::Field::inv(self).ok_or_else(zero_divisor)
    }

    fn evaluate<V: EvalValue>(&self, _values: &HashMap<String, V>) -> Result<V> {
        V::from_real(&self.0)
    }

    fn to_integer(&self) -> Option<Integer> {
        None
    }
}

impl EvalValue for Integer {
    fn zero() -> Self {
        Zero::zero()
    }

    fn one() -> Self {
        One::one()
    }

    fn is_zero(&self) -> bool {
        Zero::is_zero(self)
    }

    fn add(&self, other: &Self) -> Self {
        self + other
    }

    fn mul(&self, other: &Self) -> Self {
        self * other
    }

    fn neg(&self) -> Self {
        -self
    }

    /// Truncates toward zero.
    fn div(&self, other: &Self) -> Result<Self> {
        self.div_rem(other).map(|(q, _)| q).ok_or_else(zero_divisor)
    }

    fn from_integer(n: &Integer) -> Result<Self> {
        Ok(n.clone())
    }

    fn from_rational(q: &Rational) -> Result<Self> {
        Ok(q.trunc())
    }

    fn from_real(_r: &Real) -> Result<Self> {
        Err(SeriesError::type_mismatch(
            "a real coefficient cannot be evaluated with integer values",
        ))
    }
}

impl EvalValue for Rational {
    fn zero() -> Self {
        Zero::zero()
    }

    fn one() -> Self {
        One::one()
    }

    fn is_zero(&self) -> bool {
        Zero::is_zero(self)
    }

    fn add(&self, other: &Self) -> Self {
        self + other
    }

    fn mul(&self, other: &Self) -> Self {
        self * other
    }

    fn neg(&self) -> Self {
        -self
    }

    fn div(&self, other: &Self) -> Result<Self> {
        self.checked_div(other).ok_or_else(zero_divisor)
    }

    fn from_integer(n: &Integer) -> Result<Self> {
        Ok(Rational::from_integer(n.clone()))
    }

    fn from_rational(q: &Rational) -> Result<Self> {
        Ok(q.clone())
    }

    fn from_real(_r: &Real) -> Result<Self> {
        Err(SeriesError::type_mismatch(
            "a real coefficient cannot be evaluated with rational values",
        ))
    }
}

impl EvalValue for Real {
    fn zero() -> Self {
        Zero::zero()
    }

    fn one() -> Self {
        One::one()
    }

    fn is_zero(&self) -> bool {
        Zero::is_zero(self)
    }

    fn add(&self, other: &Self) -> Self {
        self + other
    }

    fn mul(&self, other: &Self) -> Self {
        self * other
    }

    fn neg(&self) -> Self {
        -self
    }

    fn div(&self, other: &Self) -> Result<Self> {
        self.checked_div(other).ok_or_else(zero_divisor)
    }

    fn powi(&self, n: i64) -> Result<Self> {
        Real::powi(self, n).ok_or_else(zero_divisor)
    }

    fn from_integer(n: &Integer) -> Result<Self> {
        Ok(Real::from_integer(n))
    }

    fn from_rational(q: &Rational) -> Result<Self> {
        Ok(Real::from_rational(q))
    }

    fn from_real(r: &Real) -> Result<Self> {
        Ok(r.clone())
    }

    fn cos(&self) -> Result<Self> {
        Real::cos(self).ok_or_else(|| SeriesError::arithmetic("cosine is not finite"))
    }

    fn sin(&self) -> Result<Self> {
        Real::sin(self).ok_or_else(|| SeriesError::arithmetic("sine is not finite"))
    }
}

impl EvalValue for f64 {
    fn zero() -> Self {
        0.0
    }

    fn one() -> Self {
        1.0
    }

    fn is_zero(&self) -> bool {
        *self == 0.0
    }

    fn add(&self, other: &Self) -> Self {
        self + other
    }

    fn mul(&self, other: &Self) -> Self {
        self * other
    }

    fn neg(&self) -> Self {
        -self
    }

    fn div(&self, other: &Self) -> Result<Self> {
        if *other == 0.0 {
            Err(zero_divisor())
        } else {
            Ok(self / other)
        }
    }

    fn powi(&self, n: i64) -> Result<Self> {
        if n < 0 && *self == 0.0 {
            return Err(zero_divisor());
        }
        Ok(match i32::try_from(n) {
            Ok(n) => f64::powi(*self, n),
            // i64 exponents beyond i32 are exact in f64
            #[allow(clippy::cast_precision_loss)]
            Err(_) => f64::powf(*self, n as f64),
        })
    }

    fn from_integer(n: &Integer) -> Result<Self> {
        Ok(n.to_f64())
    }

    fn from_rational(q: &Rational) -> Result<Self> {
        Ok(q.to_f64())
    }

    fn from_real(r: &Real) -> Result<Self> {
        Ok(r.to_f64())
    }

    fn cos(&self) -> Result<Self> {
        Ok(f64::cos(*self))
    }

    fn sin(&self) -> Result<Self> {
        Ok(f64::sin(*self))
    }
}

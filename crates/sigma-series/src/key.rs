//! The key abstraction: the non-coefficient part of a term.
//!
//! Keys are positional with respect to the owning series' [`SymbolSet`]:
//! every method receives the set so packed representations can decode
//! themselves.

use std::fmt::Debug;
use std::hash::Hash;

use serde::de::DeserializeOwned;
use serde::Serialize;
use sigma_integers::Integer;
use smallvec::SmallVec;

use crate::coefficient::{Coefficient, EvalValue};
use crate::error::Result;
use crate::series::Series;
use crate::symbol_set::{InsertionMap, SymbolSet};

/// Inline storage for exponent and multiplier vectors.
pub type Exponents = SmallVec<[i16; 8]>;

/// One term produced by multiplying two keys.
///
/// The coefficient of the product is multiplied by `-1` when `negate` is
/// set and divided by 2 when `halve` is set.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProductTerm<K> {
    /// The resulting key.
    pub key: K,
    /// Negate the coefficient product.
    pub negate: bool,
    /// Halve the coefficient product.
    pub halve: bool,
}

impl<K> ProductTerm<K> {
    /// A plain product with no coefficient adjustment.
    pub fn plain(key: K) -> Self {
        Self {
            key,
            negate: false,
            halve: false,
        }
    }
}

/// Products of two keys: one term for monomials, two for trigonometric keys.
pub type ProductTerms<K> = SmallVec<[ProductTerm<K>; 2]>;

/// Outcome of integrating a key with respect to one symbol.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum KeyIntegral<K> {
    /// The key does not depend on the symbol: the coefficient must be
    /// integrated instead.
    Independent,
    /// The antiderivative is `key / divisor`.
    Integrated {
        /// Integer the coefficient is divided by.
        divisor: Integer,
        /// The integrated key.
        key: K,
    },
}

/// The key of a term.
pub trait Key:
    Clone + Eq + Hash + Ord + Debug + Send + Sync + Serialize + DeserializeOwned + 'static
{
    /// The multiplicative identity over `symbols`.
    ///
    /// # Errors
    ///
    /// Fails if the key type cannot represent that many symbols.
    fn unit(symbols: &SymbolSet) -> Result<Self>;

    /// Returns true if this is the multiplicative identity.
    fn is_unit(&self, symbols: &SymbolSet) -> bool;

    /// Returns true if the key stands for zero (for example `sin(0)`).
    fn is_zero(&self, _symbols: &SymbolSet) -> bool {
        false
    }

    /// Returns true if the key is well formed for `symbols`.
    fn is_compatible(&self, symbols: &SymbolSet) -> bool;

    /// Key representing the single symbol of a one-symbol set, if the key
    /// type can express a bare symbol.
    fn variable(_symbols: &SymbolSet) -> Result<Option<Self>> {
        Ok(None)
    }

    /// Multiplies two keys over the same symbols.
    ///
    /// # Errors
    ///
    /// Fails with `Overflow` when an exponent leaves its range.
    fn multiply(&self, other: &Self, symbols: &SymbolSet) -> Result<ProductTerms<Self>>;

    /// Total degree.
    fn degree(&self, _symbols: &SymbolSet) -> i64 {
        0
    }

    /// Degree restricted to the symbols at `positions`.
    fn partial_degree(&self, _positions: &[usize], _symbols: &SymbolSet) -> i64 {
        0
    }

    /// Re-expresses the key over a larger symbol set.
    ///
    /// # Errors
    ///
    /// Fails with `Overflow` if the packed form cannot hold the new size.
    fn extend(&self, map: &InsertionMap, from: &SymbolSet, to: &SymbolSet) -> Result<Self>;

    /// Clears `mask[i]` for every symbol `i` the key depends on.
    fn trim_identify(&self, mask: &mut [bool], symbols: &SymbolSet);

    /// Removes the symbols flagged in `mask`.
    ///
    /// # Errors
    ///
    /// Fails if the key cannot be re-encoded.
    fn trim(&self, mask: &[bool], from: &SymbolSet, to: &SymbolSet) -> Result<Self>;

    /// Derivative with respect to the symbol at `pos`, as a list of
    /// (integer multiplier, key) pairs.
    ///
    /// # Errors
    ///
    /// Fails on exponent overflow.
    fn partial(&self, pos: usize, symbols: &SymbolSet) -> Result<SmallVec<[(Integer, Self); 2]>>;

    /// Antiderivative with respect to the symbol at `pos`.
    ///
    /// # Errors
    ///
    /// Fails when the key has no antiderivative in its own representation.
    fn integrate(&self, pos: usize, symbols: &SymbolSet) -> Result<KeyIntegral<Self>>;

    /// Returns true if the key depends on the symbol at `pos`.
    fn depends_on(&self, pos: usize, symbols: &SymbolSet) -> bool {
        let mut mask = vec![false; symbols.len()];
        if let Some(m) = mask.get_mut(pos) {
            *m = true;
        }
        self.trim_identify(&mut mask, symbols);
        !mask.get(pos).copied().unwrap_or(true)
    }

    /// Position of the symbol if the key is exactly that symbol to the
    /// first power.
    fn linear_position(&self, _symbols: &SymbolSet) -> Option<usize> {
        None
    }

    /// Splits off the power of the symbol at `pos`, returning the exponent
    /// and the key with that exponent cleared.
    ///
    /// Returns `Ok(None)` when the key does not depend on the symbol.
    ///
    /// # Errors
    ///
    /// Fails with `InvalidArgument` when the symbol appears in a form that
    /// is not a plain power.
    fn split_power(&self, pos: usize, symbols: &SymbolSet) -> Result<Option<(i64, Self)>> {
        if self.depends_on(pos, symbols) {
            Err(crate::error::SeriesError::invalid(format!(
                "the symbol '{}' cannot be substituted in a key of this type",
                symbols.get(pos).unwrap_or("?")
            )))
        } else {
            Ok(None)
        }
    }

    /// Inverts a single term `cf * self`.
    ///
    /// Returns `Ok(None)` when the term has no inverse in this key type.
    ///
    /// # Errors
    ///
    /// Propagates coefficient inversion failures.
    fn invert_term<C: Coefficient>(&self, cf: &C, symbols: &SymbolSet) -> Result<Option<Series<C, Self>>> {
        if self.is_unit(symbols) {
            let inv = cf.invert()?;
            Ok(Some(Series::from_terms(symbols.clone(), [(self.clone(), inv)])?))
        } else {
            Ok(None)
        }
    }

    /// Exact quotient `self / other` if it exists in this key type.
    ///
    /// # Errors
    ///
    /// Fails with `InvalidArgument` when exponents are negative.
    fn divide(&self, other: &Self, symbols: &SymbolSet) -> Result<Option<Self>> {
        Ok(other.is_unit(symbols).then(|| self.clone()))
    }

    /// Evaluates the key with `values[i]` standing for symbol `i`.
    ///
    /// # Errors
    ///
    /// Fails when the value type cannot represent the result.
    fn evaluate<V: EvalValue>(&self, values: &[V], symbols: &SymbolSet) -> Result<V>;

    /// Human-readable form, empty for the unit key.
    fn format(&self, symbols: &SymbolSet) -> String;
}

/// Keys that are plain monomials: an exponent per symbol.
pub trait PolyKey: Key {
    /// Builds a key from an exponent vector aligned with `symbols`.
    ///
    /// # Errors
    ///
    /// Fails if the length does not match or the exponents overflow.
    fn from_exponents(exponents: &[i16], symbols: &SymbolSet) -> Result<Self>;

    /// The exponent vector.
    fn exponents(&self, symbols: &SymbolSet) -> Exponents;

    /// Exponent of the symbol at `pos`.
    fn exponent(&self, pos: usize, symbols: &SymbolSet) -> i16 {
        self.exponents(symbols).get(pos).copied().unwrap_or(0)
    }
}

/// Formats `name**e`, with the exponent omitted when it is one.
#[must_use]
pub fn format_power(name: &str, e: i64) -> String {
    if e == 1 {
        name.to_string()
    } else {
        format!("{name}**{e}")
    }
}

//! Ordered sets of symbol names.
//!
//! Every key of a series is aligned positionally with the series'
//! [`SymbolSet`]. Sets are sorted, duplicate-free and shared through an
//! `Arc`, so cloning a series never copies its symbol names.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{Result, SeriesError};

/// A sorted set of unique symbol names.
#[derive(Clone, PartialEq, Eq, Hash, Default)]
pub struct SymbolSet(Arc<[String]>);

/// Position mapping produced when merging two symbol sets.
///
/// `positions[i]` is the index in the merged set of symbol `i` of the
/// original set.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InsertionMap {
    /// New index of each old symbol.
    pub positions: Vec<usize>,
    /// Size of the merged set.
    pub new_len: usize,
}

impl InsertionMap {
    /// Returns true if the mapping is the identity.
    #[must_use]
    pub fn is_identity(&self) -> bool {
        self.positions.len() == self.new_len && self.positions.iter().enumerate().all(|(i, &p)| i == p)
    }
}

impl SymbolSet {
    /// The empty set.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Builds a set from names, sorting them.
    ///
    /// # Errors
    ///
    /// Fails with `InvalidArgument` on duplicate or empty names.
    pub fn new<I, S>(names: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut names: Vec<String> = names.into_iter().map(Into::into).collect();
        if names.iter().any(String::is_empty) {
            return Err(SeriesError::invalid("symbol names must be non-empty"));
        }
        names.sort_unstable();
        if let Some(w) = names.windows(2).find(|w| w[0] == w[1]) {
            return Err(SeriesError::invalid(format!(
                "duplicate symbol '{}' in symbol list",
                w[0]
            )));
        }
        Ok(Self(names.into()))
    }

    /// A set with a single symbol.
    #[must_use]
    pub fn single(name: &str) -> Self {
        Self(vec![name.to_string()].into())
    }

    /// Number of symbols.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if the set has no symbols.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The sorted names.
    #[must_use]
    pub fn names(&self) -> &[String] {
        &self.0
    }

    /// Name at position `i`.
    #[must_use]
    pub fn get(&self, i: usize) -> Option<&str> {
        self.0.get(i).map(String::as_str)
    }

    /// Position of `name`, if present.
    #[must_use]
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.0.binary_search_by(|s| s.as_str().cmp(name)).ok()
    }

    /// Returns true if `name` belongs to the set.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.index_of(name).is_some()
    }

    /// Sorted positions of those `names` present in the set.
    #[must_use]
    pub fn positions_of<S: AsRef<str>>(&self, names: &[S]) -> Vec<usize> {
        let mut out: Vec<usize> = names.iter().filter_map(|n| self.index_of(n.as_ref())).collect();
        out.sort_unstable();
        out.dedup();
        out
    }

    /// Merges two sets, returning the union and the insertion maps of
    /// `self` and `other` into it.
    #[must_use]
    pub fn merge(&self, other: &Self) -> (Self, InsertionMap, InsertionMap) {
        if self == other {
            let id = Self::identity_map(self.len());
            return (self.clone(), id.clone(), id);
        }
        let mut merged: Vec<String> = Vec::with_capacity(self.len() + other.len());
        let (mut i, mut j) = (0, 0);
        while i < self.len() || j < other.len() {
            match (self.0.get(i), other.0.get(j)) {
                (Some(a), Some(b)) if a == b => {
                    merged.push(a.clone());
                    i += 1;
                    j += 1;
                }
                (Some(a), Some(b)) if a < b => {
                    merged.push(a.clone());
                    i += 1;
                }
                (Some(_), Some(b)) | (None, Some(b)) => {
                    merged.push(b.clone());
                    j += 1;
                }
                (Some(a), None) => {
                    merged.push(a.clone());
                    i += 1;
                }
                (None, None) => break,
            }
        }
        let merged = Self(merged.into());
        let map_self = merged.insertion_map_from(self);
        let map_other = merged.insertion_map_from(other);
        (merged, map_self, map_other)
    }

    /// Set obtained by adding `name`.
    #[must_use]
    pub fn with(&self, name: &str) -> (Self, InsertionMap) {
        let (merged, map, _) = self.merge(&Self::single(name));
        (merged, map)
    }

    /// Set without the positions flagged in `mask`.
    #[must_use]
    pub fn without_mask(&self, mask: &[bool]) -> Self {
        let kept: Vec<String> = self
            .0
            .iter()
            .zip(mask.iter().chain(std::iter::repeat(&false)))
            .filter(|(_, &m)| !m)
            .map(|(s, _)| s.clone())
            .collect();
        Self(kept.into())
    }

    fn insertion_map_from(&self, subset: &Self) -> InsertionMap {
        InsertionMap {
            positions: subset
                .0
                .iter()
                .filter_map(|s| self.index_of(s))
                .collect(),
            new_len: self.len(),
        }
    }

    fn identity_map(n: usize) -> InsertionMap {
        InsertionMap {
            positions: (0..n).collect(),
            new_len: n,
        }
    }
}

impl fmt::Debug for SymbolSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.0.iter()).finish()
    }
}

impl Serialize for SymbolSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.0.as_ref().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for SymbolSet {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let names = Vec::<String>::deserialize(deserializer)?;
        let set = Self::new(names.iter().cloned()).map_err(serde::de::Error::custom)?;
        if set.names() != names.as_slice() {
            return Err(serde::de::Error::custom("symbol set is not sorted"));
        }
        Ok(set)
    }
}

//! Hash-based term container.
//!
//! Terms are kept in an `FxHashMap` from key to coefficient. Insertion
//! merges equal keys and drops cancelled terms, so the container never
//! holds a zero coefficient.

use hashbrown::hash_map::Entry;
use hashbrown::HashMap;
use rustc_hash::FxBuildHasher;

use crate::coefficient::Coefficient;
use crate::error::Result;
use crate::key::Key;
use crate::symbol_set::SymbolSet;

/// A sparse set of `(key, coefficient)` terms.
#[derive(Clone, Debug)]
pub struct Terms<K, C> {
    map: HashMap<K, C, FxBuildHasher>,
}

impl<K: Key, C: Coefficient> Default for Terms<K, C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Key, C: Coefficient> Terms<K, C> {
    /// An empty container.
    #[must_use]
    pub fn new() -> Self {
        Self {
            map: HashMap::with_hasher(FxBuildHasher),
        }
    }

    /// An empty container with room for `n` terms.
    #[must_use]
    pub fn with_capacity(n: usize) -> Self {
        Self {
            map: HashMap::with_capacity_and_hasher(n, FxBuildHasher),
        }
    }

    /// Number of terms.
    #[must_use]
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// Returns true if there are no terms.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Coefficient of `key`.
    #[must_use]
    pub fn get(&self, key: &K) -> Option<&C> {
        self.map.get(key)
    }

    /// Iterates over the terms in unspecified order.
    pub fn iter(&self) -> impl Iterator<Item = (&K, &C)> {
        self.map.iter()
    }

    /// Adds `cf · key`, merging with an existing term.
    ///
    /// # Errors
    ///
    /// Propagates failures of nested coefficient addition.
    pub fn insert(&mut self, key: K, cf: C, symbols: &SymbolSet) -> Result<()> {
        if cf.is_zero() || key.is_zero(symbols) {
            return Ok(());
        }
        match self.map.entry(key) {
            Entry::Occupied(mut e) => {
                e.get_mut().add_assign(&cf)?;
                if e.get().is_zero() {
                    e.remove();
                }
            }
            Entry::Vacant(e) => {
                e.insert(cf);
            }
        }
        Ok(())
    }

    /// Subtracts `cf · key`.
    ///
    /// # Errors
    ///
    /// Propagates failures of nested coefficient subtraction.
    pub fn insert_neg(&mut self, key: K, cf: &C, symbols: &SymbolSet) -> Result<()> {
        if cf.is_zero() || key.is_zero(symbols) {
            return Ok(());
        }
        match self.map.entry(key) {
            Entry::Occupied(mut e) => {
                e.get_mut().sub_assign(cf)?;
                if e.get().is_zero() {
                    e.remove();
                }
            }
            Entry::Vacant(e) => {
                e.insert(cf.neg());
            }
        }
        Ok(())
    }

    /// Merges another container into this one.
    ///
    /// # Errors
    ///
    /// Propagates failures of nested coefficient addition.
    pub fn merge(&mut self, other: Self, symbols: &SymbolSet) -> Result<()> {
        if self.is_empty() {
            *self = other;
            return Ok(());
        }
        self.map.reserve(other.len());
        for (k, c) in other.map {
            self.insert(k, c, symbols)?;
        }
        Ok(())
    }

    /// Applies `f` to every coefficient, dropping results that are zero.
    ///
    /// # Errors
    ///
    /// Stops at the first failure of `f`.
    pub fn try_map_cf<F>(&self, mut f: F) -> Result<Self>
    where
        F: FnMut(&C) -> Result<C>,
    {
        let mut out = Self::with_capacity(self.len());
        for (k, c) in &self.map {
            let c = f(c)?;
            if !c.is_zero() {
                out.map.insert(k.clone(), c);
            }
        }
        Ok(out)
    }

    /// Keeps the terms for which `f` returns true.
    pub fn retain<F>(&mut self, mut f: F)
    where
        F: FnMut(&K, &C) -> bool,
    {
        self.map.retain(|k, c| f(k, c));
    }

    /// Terms sorted by key.
    #[must_use]
    pub fn sorted(&self) -> Vec<(&K, &C)> {
        let mut v: Vec<_> = self.map.iter().collect();
        v.sort_unstable_by(|a, b| a.0.cmp(b.0));
        v
    }

    /// Consumes the container into its terms.
    pub fn into_iter_terms(self) -> impl Iterator<Item = (K, C)> {
        self.map.into_iter()
    }
}

impl<K: Key, C: Coefficient> PartialEq for Terms<K, C> {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.map.iter().all(|(k, c)| other.map.get(k) == Some(c))
    }
}

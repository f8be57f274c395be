//! Per-type automatic truncation and the pow cache.
//!
//! Both are keyed by the `TypeId` of the series type, so
//! `Series<Q, Monomial>` and `Series<Z, Monomial>` are configured
//! independently. Changing the truncation of a type clears its pow cache,
//! since cached powers were computed under the old bound.

use std::any::{Any, TypeId};
use std::sync::OnceLock;

use parking_lot::RwLock;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::coefficient::Coefficient;
use crate::error::Result;
use crate::key::Key;
use crate::series::Series;

/// Automatic truncation policy applied to products.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Truncation {
    /// No truncation.
    #[default]
    Off,
    /// Drop terms of total degree greater than the bound.
    Total(i64),
    /// Drop terms whose degree in `names` is greater than `bound`.
    Partial {
        /// Maximum degree kept.
        bound: i64,
        /// Symbols the degree is measured in.
        names: Vec<String>,
    },
}

impl Truncation {
    /// The degree bound, if truncation is active.
    #[must_use]
    pub fn bound(&self) -> Option<i64> {
        match self {
            Self::Off => None,
            Self::Total(b) | Self::Partial { bound: b, .. } => Some(*b),
        }
    }

    /// The symbols of a partial truncation.
    #[must_use]
    pub fn names(&self) -> Option<&[String]> {
        match self {
            Self::Partial { names, .. } => Some(names),
            _ => None,
        }
    }
}

fn truncations() -> &'static RwLock<FxHashMap<TypeId, Truncation>> {
    static STATE: OnceLock<RwLock<FxHashMap<TypeId, Truncation>>> = OnceLock::new();
    STATE.get_or_init(|| RwLock::new(FxHashMap::default()))
}

type PowCaches = FxHashMap<TypeId, Box<dyn Any + Send + Sync>>;

fn pow_caches() -> &'static RwLock<PowCaches> {
    static CACHES: OnceLock<RwLock<PowCaches>> = OnceLock::new();
    CACHES.get_or_init(|| RwLock::new(FxHashMap::default()))
}

/// Cached powers of one base: `powers[i] == base^i`.
struct PowEntry<S> {
    base: S,
    powers: Vec<S>,
}

/// Current truncation policy of the series type `S`.
#[must_use]
pub fn auto_truncation<S: 'static>() -> Truncation {
    truncations()
        .read()
        .get(&TypeId::of::<S>())
        .cloned()
        .unwrap_or_default()
}

fn set_truncation<S: 'static>(t: Truncation) {
    debug!(series = std::any::type_name::<S>(), truncation = ?t, "auto-truncation changed");
    truncations().write().insert(TypeId::of::<S>(), t);
    pow_caches().write().remove(&TypeId::of::<S>());
}

impl<C: Coefficient, K: Key> Series<C, K> {
    /// Truncates every product of this series type to total degree `max`.
    pub fn set_auto_truncate_degree(max: i64) {
        set_truncation::<Self>(Truncation::Total(max));
    }

    /// Truncates every product of this series type to degree `max` in
    /// `names`.
    pub fn set_auto_truncate_partial_degree<S: AsRef<str>>(max: i64, names: &[S]) {
        let mut names: Vec<String> = names.iter().map(|s| s.as_ref().to_string()).collect();
        names.sort_unstable();
        names.dedup();
        set_truncation::<Self>(Truncation::Partial { bound: max, names });
    }

    /// Disables automatic truncation for this series type.
    pub fn unset_auto_truncate_degree() {
        set_truncation::<Self>(Truncation::Off);
    }

    /// The automatic truncation policy of this series type.
    #[must_use]
    pub fn auto_truncate_degree() -> Truncation {
        auto_truncation::<Self>()
    }

    /// Empties the pow cache of this series type.
    pub fn clear_pow_cache() {
        pow_caches().write().remove(&TypeId::of::<Self>());
    }

    /// Cached powers of `self` (`powers[i] == self^i`), possibly empty.
    pub(crate) fn cached_powers(&self) -> Vec<Self> {
        let caches = pow_caches().read();
        caches
            .get(&TypeId::of::<Self>())
            .and_then(|b| b.downcast_ref::<Vec<PowEntry<Self>>>())
            .and_then(|entries| entries.iter().find(|e| e.base.strict_eq(self)))
            .map(|e| e.powers.clone())
            .unwrap_or_default()
    }

    /// Records computed powers of `self`, keeping the longest list.
    pub(crate) fn store_powers(&self, powers: Vec<Self>) {
        let mut caches = pow_caches().write();
        let slot = caches
            .entry(TypeId::of::<Self>())
            .or_insert_with(|| Box::new(Vec::<PowEntry<Self>>::new()));
        let Some(entries) = slot.downcast_mut::<Vec<PowEntry<Self>>>() else {
            return;
        };
        match entries.iter_mut().find(|e| e.base.strict_eq(self)) {
            Some(e) if e.powers.len() < powers.len() => e.powers = powers,
            Some(_) => {}
            None => entries.push(PowEntry {
                base: self.clone(),
                powers,
            }),
        }
    }

    /// Number of bases in the pow cache of this series type.
    #[must_use]
    pub fn pow_cache_len() -> usize {
        pow_caches()
            .read()
            .get(&TypeId::of::<Self>())
            .and_then(|b| b.downcast_ref::<Vec<PowEntry<Self>>>())
            .map_or(0, Vec::len)
    }
}

/// Applies `t` to a series outside of a product.
///
/// # Errors
///
/// Fails when nested coefficients cannot be rebuilt.
pub fn apply<C: Coefficient, K: Key>(s: &Series<C, K>, t: &Truncation) -> Result<Series<C, K>> {
    match t {
        Truncation::Off => Ok(s.clone()),
        Truncation::Total(b) => s.truncate_degree(*b),
        Truncation::Partial { bound, names } => s.truncate_partial_degree(*bound, names),
    }
}

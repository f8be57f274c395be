//! Differentiation, integration and the custom derivative registry.

use std::any::{Any, TypeId};
use std::collections::BTreeMap;
use std::sync::{Arc, OnceLock};

use parking_lot::RwLock;
use rustc_hash::FxHashMap;
use sigma_integers::Integer;

use crate::coefficient::Coefficient;
use crate::error::{Result, SeriesError};
use crate::key::{Key, KeyIntegral};
use crate::series::Series;

/// A user-supplied partial derivative.
pub type CustomDerivative<S> = Arc<dyn Fn(&S) -> Result<S> + Send + Sync>;

type Registry = FxHashMap<TypeId, Box<dyn Any + Send + Sync>>;

fn registry() -> &'static RwLock<Registry> {
    static REGISTRY: OnceLock<RwLock<Registry>> = OnceLock::new();
    REGISTRY.get_or_init(|| RwLock::new(FxHashMap::default()))
}

/// Registers `f` as the derivative of the series type `S` with respect to
/// `name`, replacing any previous registration.
///
/// The closure owns whatever it captured at registration time.
pub fn register_custom_derivative<S, F>(name: &str, f: F)
where
    S: 'static,
    F: Fn(&S) -> Result<S> + Send + Sync + 'static,
{
    let mut reg = registry().write();
    let slot = reg
        .entry(TypeId::of::<S>())
        .or_insert_with(|| Box::new(FxHashMap::<String, CustomDerivative<S>>::default()));
    if let Some(map) = slot.downcast_mut::<FxHashMap<String, CustomDerivative<S>>>() {
        map.insert(name.to_string(), Arc::new(f));
    }
}

/// Removes the custom derivative of `S` with respect to `name`, if any.
pub fn unregister_custom_derivative<S: 'static>(name: &str) {
    let mut reg = registry().write();
    if let Some(map) = reg
        .get_mut(&TypeId::of::<S>())
        .and_then(|b| b.downcast_mut::<FxHashMap<String, CustomDerivative<S>>>())
    {
        map.remove(name);
    }
}

/// Removes every custom derivative of `S`.
pub fn unregister_all_custom_derivatives<S: 'static>() {
    registry().write().remove(&TypeId::of::<S>());
}

/// Snapshot of the custom derivatives of `S`, by symbol name.
#[must_use]
pub fn custom_derivatives<S: 'static>() -> BTreeMap<String, CustomDerivative<S>> {
    registry()
        .read()
        .get(&TypeId::of::<S>())
        .and_then(|b| b.downcast_ref::<FxHashMap<String, CustomDerivative<S>>>())
        .map(|m| m.iter().map(|(k, v)| (k.clone(), Arc::clone(v))).collect())
        .unwrap_or_default()
}

/// The custom derivative of `S` registered for `name`, if any.
#[must_use]
pub fn custom_derivative<S: 'static>(name: &str) -> Option<CustomDerivative<S>> {
    registry()
        .read()
        .get(&TypeId::of::<S>())
        .and_then(|b| b.downcast_ref::<FxHashMap<String, CustomDerivative<S>>>())
        .and_then(|m| m.get(name).cloned())
}

impl<C: Coefficient, K: Key> Series<C, K> {
    /// Partial derivative with respect to `name`, using a registered custom
    /// derivative when there is one.
    ///
    /// # Errors
    ///
    /// Propagates the failures of the custom derivative or of
    /// [`Series::raw_partial`].
    pub fn partial(&self, name: &str) -> Result<Self> {
        // the registry lock is released before the callback runs
        match custom_derivative::<Self>(name) {
            Some(f) => f(self),
            None => self.raw_partial(name),
        }
    }

    /// Term-by-term partial derivative, ignoring custom derivatives.
    ///
    /// # Errors
    ///
    /// Fails on exponent overflow.
    pub fn raw_partial(&self, name: &str) -> Result<Self> {
        let symbols = self.symbols.clone();
        let pos = symbols.index_of(name);
        let mut out = Self::new(symbols.clone());
        for (k, c) in self.terms.iter() {
            let dc = c.partial(name)?;
            out.terms.insert(k.clone(), dc, &symbols)?;
            if let Some(p) = pos {
                for (n, dk) in k.partial(p, &symbols)? {
                    out.terms.insert(dk, c.mul_integer(&n)?, &symbols)?;
                }
            }
        }
        Ok(out)
    }

    /// Registers a custom derivative for this series type.
    pub fn register_custom_derivative<F>(name: &str, f: F)
    where
        F: Fn(&Self) -> Result<Self> + Send + Sync + 'static,
    {
        register_custom_derivative::<Self, F>(name, f);
    }

    /// Removes the custom derivative of this series type for `name`.
    pub fn unregister_custom_derivative(name: &str) {
        unregister_custom_derivative::<Self>(name);
    }

    /// Removes every custom derivative of this series type.
    pub fn unregister_all_custom_derivatives() {
        unregister_all_custom_derivatives::<Self>();
    }

    /// Antiderivative with respect to `name`.
    ///
    /// Terms whose key does not depend on `name` integrate their
    /// coefficient. Otherwise the key is integrated, by parts while the
    /// coefficient still depends on `name`.
    ///
    /// # Errors
    ///
    /// `InvalidArgument` when a key or coefficient has no antiderivative
    /// (for example `x**-1`), `Arithmetic` when integer coefficients do not
    /// divide exactly.
    pub fn integrate(&self, name: &str) -> Result<Self> {
        if name.is_empty() {
            return Err(SeriesError::invalid("symbol names must be non-empty"));
        }
        let had = self.symbols.contains(name);
        let (symbols, map) = self.symbols.with(name);
        let ext = self.extended(&map, &symbols)?;
        let pos = symbols
            .index_of(name)
            .ok_or_else(|| SeriesError::invalid(format!("symbol '{name}' not found")))?;
        let mut out = Self::new(symbols.clone());
        for (k, c) in ext.terms.iter() {
            match k.integrate(pos, &symbols)? {
                KeyIntegral::Independent => {
                    out.terms.insert(k.clone(), c.integrate(name)?, &symbols)?;
                }
                KeyIntegral::Integrated { divisor, key } => {
                    integrate_by_parts(&mut out, c, divisor, key, pos, name)?;
                }
            }
        }
        if had {
            Ok(out)
        } else {
            out.drop_unused(pos)
        }
    }

    fn drop_unused(self, pos: usize) -> Result<Self> {
        let mut mask = vec![false; self.symbols.len()];
        mask[pos] = true;
        for (k, _) in self.terms.iter() {
            k.trim_identify(&mut mask, &self.symbols);
        }
        if !mask[pos] {
            return Ok(self);
        }
        let to = self.symbols.without_mask(&mask);
        let mut out = Self::new(to.clone());
        for (k, c) in self.terms.iter() {
            out.terms.insert(k.trim(&mask, &self.symbols, &to)?, c.clone(), &to)?;
        }
        Ok(out)
    }
}

/// Accumulates `∫ c · key dx` into `out`, starting from the first key
/// antiderivative `first_key / first_divisor`:
/// `c·K1/d1 - c'·K2/(d1·d2) + c''·K3/(d1·d2·d3) - ...`
fn integrate_by_parts<C: Coefficient, K: Key>(
    out: &mut Series<C, K>,
    c: &C,
    first_divisor: Integer,
    first_key: K,
    pos: usize,
    name: &str,
) -> Result<()> {
    let symbols = out.symbols.clone();
    let limit = c.degree(Some(&[name.to_string()])).max(0) + 1;
    let mut cf = c.clone();
    let mut key = first_key;
    let mut divisor = first_divisor;
    let mut negate = false;
    for step in 0..limit {
        let term = cf.div_integer(&divisor)?;
        out.terms.insert(key.clone(), if negate { term.neg() } else { term }, &symbols)?;
        cf = cf.partial(name)?;
        if cf.is_zero() {
            return Ok(());
        }
        if step + 1 == limit {
            break;
        }
        match key.integrate(pos, &symbols)? {
            KeyIntegral::Integrated { divisor: d, key: k } => {
                divisor = divisor * d;
                key = k;
            }
            KeyIntegral::Independent => {
                return Err(SeriesError::invalid(
                    "unable to integrate by parts: the key lost its dependency on the integration variable",
                ))
            }
        }
        negate = !negate;
    }
    Err(SeriesError::invalid(format!(
        "unable to integrate with respect to '{name}': the coefficient derivatives do not vanish"
    )))
}

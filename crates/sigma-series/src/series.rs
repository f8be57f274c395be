//! The generic sparse series.
//!
//! A [`Series`] is a symbol set plus a container of `(key, coefficient)`
//! terms. Binary operations first extend both operands to the union of
//! their symbol sets, so `x + y` and `y + z` can be added freely.

use std::borrow::Cow;
use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use sigma_integers::Integer;

use crate::coefficient::{lookup_values, Coefficient, EvalValue};
use crate::error::{Result, SeriesError};
use crate::key::{Key, PolyKey};
use crate::multiplier;
use crate::settings;
use crate::symbol_set::{InsertionMap, SymbolSet};
use crate::terms::Terms;

/// A sparse multivariate series with coefficients `C` and keys `K`.
#[derive(Clone)]
pub struct Series<C, K> {
    pub(crate) symbols: SymbolSet,
    pub(crate) terms: Terms<K, C>,
}

impl<C: Coefficient, K: Key> Default for Series<C, K> {
    fn default() -> Self {
        Self::new(SymbolSet::empty())
    }
}

impl<C: Coefficient, K: Key> Series<C, K> {
    /// The zero series over `symbols`.
    #[must_use]
    pub fn new(symbols: SymbolSet) -> Self {
        Self {
            symbols,
            terms: Terms::new(),
        }
    }

    /// The constant series `cf`.
    #[must_use]
    pub fn from_cf(cf: C) -> Self {
        let mut out = Self::default();
        // every key type has a unit over the empty set, and inserting into
        // an empty container cannot fail
        if let Ok(unit) = K::unit(&out.symbols) {
            let _ = out.terms.insert(unit, cf, &out.symbols);
        }
        out
    }

    /// The constant series `n`.
    #[must_use]
    pub fn from_integer(n: impl Into<Integer>) -> Self {
        Self::from_cf(C::from_integer(&n.into()))
    }

    /// The series consisting of the symbol `name`.
    ///
    /// Key types that cannot express a bare symbol (trigonometric keys, for
    /// instance) place the symbol in the coefficient instead.
    ///
    /// # Errors
    ///
    /// Fails if neither the key nor the coefficient can represent a symbol.
    pub fn from_symbol(name: &str) -> Result<Self> {
        if name.is_empty() {
            return Err(SeriesError::invalid("symbol names must be non-empty"));
        }
        let symbols = SymbolSet::single(name);
        if let Some(key) = K::variable(&symbols)? {
            return Self::from_terms(symbols, [(key, C::one())]);
        }
        Ok(Self::from_cf(C::from_symbol(name)?))
    }

    /// Builds a series from terms aligned with `symbols`.
    ///
    /// # Errors
    ///
    /// Fails with `InvalidArgument` if a key is incompatible with `symbols`.
    pub fn from_terms<I>(symbols: SymbolSet, terms: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, C)>,
    {
        let mut out = Self::new(symbols);
        for (k, c) in terms {
            out.insert(k, c)?;
        }
        Ok(out)
    }

    /// Adds the term `cf · key`.
    ///
    /// # Errors
    ///
    /// Fails with `InvalidArgument` if the key is incompatible with the
    /// symbol set.
    pub fn insert(&mut self, key: K, cf: C) -> Result<()> {
        if !key.is_compatible(&self.symbols) {
            return Err(SeriesError::invalid(format!(
                "key {key:?} is not compatible with the symbol set {:?}",
                self.symbols
            )));
        }
        self.terms.insert(key, cf, &self.symbols)
    }

    /// The symbol set.
    #[must_use]
    pub fn symbols(&self) -> &SymbolSet {
        &self.symbols
    }

    /// Number of terms.
    #[must_use]
    pub fn len(&self) -> usize {
        self.terms.len()
    }

    /// Returns true if the series has no terms.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Returns true for the zero series.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.terms.is_empty()
    }

    /// Iterates over the terms in unspecified order.
    pub fn iter(&self) -> impl Iterator<Item = (&K, &C)> {
        self.terms.iter()
    }

    /// Coefficient stored for `key`, if any.
    #[must_use]
    pub fn get(&self, key: &K) -> Option<&C> {
        self.terms.get(key)
    }

    /// Terms sorted by key.
    #[must_use]
    pub fn sorted_terms(&self) -> Vec<(&K, &C)> {
        self.terms.sorted()
    }

    /// Returns true if the series is zero or a single term with the unit key.
    #[must_use]
    pub fn is_single_cf(&self) -> bool {
        match self.terms.len() {
            0 => true,
            1 => self.terms.iter().all(|(k, _)| k.is_unit(&self.symbols)),
            _ => false,
        }
    }

    /// Converts a constant series into its coefficient.
    ///
    /// # Errors
    ///
    /// Fails with `TypeMismatch` if the series is not constant.
    pub fn to_cf(&self) -> Result<C> {
        if !self.is_single_cf() {
            return Err(SeriesError::type_mismatch(
                "cannot convert a non-constant series to a coefficient",
            ));
        }
        Ok(self.terms.iter().next().map_or_else(C::zero, |(_, c)| c.clone()))
    }

    /// Equality that also requires identical symbol sets.
    #[must_use]
    pub fn strict_eq(&self, other: &Self) -> bool {
        self.symbols == other.symbols && self.terms == other.terms
    }

    /// Re-expresses the series over the superset `to`.
    pub(crate) fn extended(&self, map: &InsertionMap, to: &SymbolSet) -> Result<Self> {
        if map.is_identity() {
            return Ok(Self {
                symbols: to.clone(),
                terms: self.terms.clone(),
            });
        }
        let mut out = Self::new(to.clone());
        for (k, c) in self.terms.iter() {
            let key = k.extend(map, &self.symbols, to)?;
            out.terms.insert(key, c.clone(), to)?;
        }
        Ok(out)
    }

    /// Extends the series with the symbols of `symbols` it lacks.
    ///
    /// # Errors
    ///
    /// Fails if a key cannot represent the larger set.
    pub fn extend_symbols(&self, symbols: &SymbolSet) -> Result<Self> {
        let (merged, map, _) = self.symbols.merge(symbols);
        self.extended(&map, &merged)
    }

    /// Brings two series onto a common symbol set.
    pub(crate) fn unify<'a>(a: &'a Self, b: &'a Self) -> Result<(Cow<'a, Self>, Cow<'a, Self>)> {
        if a.symbols == b.symbols {
            return Ok((Cow::Borrowed(a), Cow::Borrowed(b)));
        }
        let (merged, ma, mb) = a.symbols.merge(&b.symbols);
        let a = if ma.is_identity() {
            Cow::Borrowed(a)
        } else {
            Cow::Owned(a.extended(&ma, &merged)?)
        };
        let b = if mb.is_identity() {
            Cow::Borrowed(b)
        } else {
            Cow::Owned(b.extended(&mb, &merged)?)
        };
        Ok((a, b))
    }

    /// Sum.
    ///
    /// # Errors
    ///
    /// Fails when the symbol sets cannot be merged.
    pub fn add(&self, other: &Self) -> Result<Self> {
        let mut out = self.clone();
        out.add_assign(other)?;
        Ok(out)
    }

    /// Difference.
    ///
    /// # Errors
    ///
    /// Fails when the symbol sets cannot be merged.
    pub fn sub(&self, other: &Self) -> Result<Self> {
        let mut out = self.clone();
        out.sub_assign(other)?;
        Ok(out)
    }

    /// In-place sum.
    ///
    /// # Errors
    ///
    /// Fails when the symbol sets cannot be merged.
    pub fn add_assign(&mut self, other: &Self) -> Result<()> {
        let (merged, ma, mb) = self.symbols.merge(&other.symbols);
        if !ma.is_identity() {
            *self = self.extended(&ma, &merged)?;
        }
        let other = if mb.is_identity() {
            Cow::Borrowed(other)
        } else {
            Cow::Owned(other.extended(&mb, &merged)?)
        };
        for (k, c) in other.terms.iter() {
            self.terms.insert(k.clone(), c.clone(), &merged)?;
        }
        Ok(())
    }

    /// In-place difference.
    ///
    /// # Errors
    ///
    /// Fails when the symbol sets cannot be merged.
    pub fn sub_assign(&mut self, other: &Self) -> Result<()> {
        let (merged, ma, mb) = self.symbols.merge(&other.symbols);
        if !ma.is_identity() {
            *self = self.extended(&ma, &merged)?;
        }
        let other = if mb.is_identity() {
            Cow::Borrowed(other)
        } else {
            Cow::Owned(other.extended(&mb, &merged)?)
        };
        for (k, c) in other.terms.iter() {
            self.terms.insert_neg(k.clone(), c, &merged)?;
        }
        Ok(())
    }

    /// Negation.
    #[must_use]
    pub fn neg(&self) -> Self {
        Self {
            symbols: self.symbols.clone(),
            terms: self
                .terms
                .try_map_cf(|c| Ok(c.neg()))
                .unwrap_or_default(),
        }
    }

    /// Product, honouring the auto-truncation of this series type.
    ///
    /// # Errors
    ///
    /// Fails on exponent overflow.
    pub fn mul(&self, other: &Self) -> Result<Self> {
        multiplier::multiply(self, other)
    }

    /// In-place product.
    ///
    /// # Errors
    ///
    /// Fails on exponent overflow.
    pub fn mul_assign(&mut self, other: &Self) -> Result<()> {
        *self = self.mul(other)?;
        Ok(())
    }

    /// In-place exact quotient.
    ///
    /// # Errors
    ///
    /// See [`Series::div`].
    pub fn div_assign(&mut self, other: &Self) -> Result<()> {
        *self = self.div(other)?;
        Ok(())
    }

    /// Adds a coefficient.
    ///
    /// # Errors
    ///
    /// Fails when nested coefficients cannot be added.
    pub fn add_cf(&self, cf: &C) -> Result<Self> {
        self.add(&Self::from_cf(cf.clone()))
    }

    /// Multiplies every coefficient by `cf`.
    ///
    /// # Errors
    ///
    /// Fails when nested coefficients cannot be multiplied.
    pub fn mul_cf(&self, cf: &C) -> Result<Self> {
        Ok(Self {
            symbols: self.symbols.clone(),
            terms: self.terms.try_map_cf(|c| c.mul(cf))?,
        })
    }

    /// Multiplies every coefficient by the integer `n`.
    ///
    /// # Errors
    ///
    /// Fails when nested coefficients cannot be multiplied.
    pub fn mul_integer(&self, n: &Integer) -> Result<Self> {
        Ok(Self {
            symbols: self.symbols.clone(),
            terms: self.terms.try_map_cf(|c| c.mul_integer(n))?,
        })
    }

    /// Divides every coefficient exactly by `cf`.
    ///
    /// # Errors
    ///
    /// `ZeroDivision` for a zero `cf`, `Arithmetic` when a coefficient is
    /// not divisible.
    pub fn div_cf(&self, cf: &C) -> Result<Self> {
        if cf.is_zero() {
            return Err(SeriesError::zero_division("division of a series by a zero coefficient"));
        }
        Ok(Self {
            symbols: self.symbols.clone(),
            terms: self.terms.try_map_cf(|c| c.div_exact(cf))?,
        })
    }

    /// Divides every coefficient by the integer `n`.
    ///
    /// # Errors
    ///
    /// `ZeroDivision` for zero, `Arithmetic` when a coefficient is not
    /// divisible.
    pub fn div_integer(&self, n: &Integer) -> Result<Self> {
        Ok(Self {
            symbols: self.symbols.clone(),
            terms: self.terms.try_map_cf(|c| c.div_integer(n))?,
        })
    }

    /// Applies `f` to every coefficient.
    ///
    /// # Errors
    ///
    /// Stops at the first failure of `f`.
    pub fn map_cf<F>(&self, f: F) -> Result<Self>
    where
        F: FnMut(&C) -> Result<C>,
    {
        Ok(Self {
            symbols: self.symbols.clone(),
            terms: self.terms.try_map_cf(f)?,
        })
    }

    fn term_degree(&self, k: &K, c: &C, positions: Option<&[usize]>, names: Option<&[String]>, low: bool) -> i64 {
        let kd = match positions {
            Some(p) => k.partial_degree(p, &self.symbols),
            None => k.degree(&self.symbols),
        };
        kd + if low { c.ldegree(names) } else { c.degree(names) }
    }

    fn fold_degree(&self, names: Option<&[String]>, low: bool) -> i64 {
        let positions = names.map(|n| self.symbols.positions_of(n));
        let degrees = self
            .terms
            .iter()
            .map(|(k, c)| self.term_degree(k, c, positions.as_deref(), names, low));
        if low {
            degrees.min().unwrap_or(0)
        } else {
            degrees.max().unwrap_or(0)
        }
    }

    /// Total degree: the maximum over the terms of key degree plus
    /// coefficient degree. Zero for the zero series.
    #[must_use]
    pub fn degree(&self) -> i64 {
        self.fold_degree(None, false)
    }

    /// Total low degree.
    #[must_use]
    pub fn ldegree(&self) -> i64 {
        self.fold_degree(None, true)
    }

    /// Degree in the symbols `names`.
    #[must_use]
    pub fn partial_degree<S: AsRef<str>>(&self, names: &[S]) -> i64 {
        let names: Vec<String> = names.iter().map(|s| s.as_ref().to_string()).collect();
        self.fold_degree(Some(&names), false)
    }

    /// Low degree in the symbols `names`.
    #[must_use]
    pub fn partial_ldegree<S: AsRef<str>>(&self, names: &[S]) -> i64 {
        let names: Vec<String> = names.iter().map(|s| s.as_ref().to_string()).collect();
        self.fold_degree(Some(&names), true)
    }

    /// Removes the terms of total degree greater than `max`. Nested
    /// coefficients are truncated with the budget left by their key.
    ///
    /// # Errors
    ///
    /// Fails when nested coefficients cannot be rebuilt.
    pub fn truncate_degree(&self, max: i64) -> Result<Self> {
        self.truncate_impl(max, None)
    }

    /// Removes the terms whose degree in `names` is greater than `max`.
    ///
    /// # Errors
    ///
    /// Fails when nested coefficients cannot be rebuilt.
    pub fn truncate_partial_degree<S: AsRef<str>>(&self, max: i64, names: &[S]) -> Result<Self> {
        let names: Vec<String> = names.iter().map(|s| s.as_ref().to_string()).collect();
        self.truncate_impl(max, Some(&names))
    }

    pub(crate) fn truncate_impl(&self, max: i64, names: Option<&[String]>) -> Result<Self> {
        let positions = names.map(|n| self.symbols.positions_of(n));
        let mut out = Self::new(self.symbols.clone());
        for (k, c) in self.terms.iter() {
            let kd = match positions.as_deref() {
                Some(p) => k.partial_degree(p, &self.symbols),
                None => k.degree(&self.symbols),
            };
            let c = c.truncate_degree(max - kd, names)?;
            out.terms.insert(k.clone(), c, &self.symbols)?;
        }
        Ok(out)
    }

    /// Removes the symbols no term depends on.
    ///
    /// # Errors
    ///
    /// Fails if a key cannot be re-encoded.
    pub fn trim(&self) -> Result<Self> {
        let mut mask = vec![true; self.symbols.len()];
        for (k, _) in self.terms.iter() {
            k.trim_identify(&mut mask, &self.symbols);
        }
        let to = self.symbols.without_mask(&mask);
        let mut out = Self::new(to.clone());
        for (k, c) in self.terms.iter() {
            let key = if mask.iter().any(|&m| m) {
                k.trim(&mask, &self.symbols, &to)?
            } else {
                k.clone()
            };
            out.terms.insert(key, c.trim()?, &to)?;
        }
        Ok(out)
    }

    /// Evaluates the series with a value for every symbol.
    ///
    /// # Errors
    ///
    /// `InvalidArgument` for a missing symbol; otherwise the failures of the
    /// value type.
    pub fn evaluate<V: EvalValue>(&self, values: &HashMap<String, V>) -> Result<V> {
        let vals = lookup_values(self.symbols.names(), values)?;
        let mut acc = V::zero();
        for (k, c) in self.terms.sorted() {
            let term = c.evaluate(values)?.mul(&k.evaluate(&vals, &self.symbols)?);
            acc = acc.add(&term);
        }
        Ok(acc)
    }
}

impl<C: Coefficient, K: PolyKey> Series<C, K> {
    /// Coefficient of the monomial with the given exponents, zero if absent.
    ///
    /// # Errors
    ///
    /// Fails with `InvalidArgument` if the length does not match the symbol
    /// set.
    pub fn find_cf(&self, exponents: &[i16]) -> Result<C> {
        let key = K::from_exponents(exponents, &self.symbols)?;
        Ok(self.terms.get(&key).cloned().unwrap_or_else(C::zero))
    }
}

impl<C: Coefficient, K: Key> PartialEq for Series<C, K> {
    fn eq(&self, other: &Self) -> bool {
        if self.symbols == other.symbols {
            return self.terms == other.terms;
        }
        match Self::unify(self, other) {
            Ok((a, b)) => a.terms == b.terms,
            Err(_) => false,
        }
    }
}

impl<C: Coefficient, K: Key> fmt::Debug for Series<C, K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Series")
            .field("symbols", &self.symbols)
            .field("terms", &self.terms.sorted())
            .finish()
    }
}

fn format_term<C: Coefficient>(cf: &C, key: &str) -> String {
    if key.is_empty() {
        return cf.to_string();
    }
    if cf.is_one() {
        return key.to_string();
    }
    if cf.neg().is_one() {
        return format!("-{key}");
    }
    if cf.needs_brackets() {
        format!("({cf})*{key}")
    } else {
        format!("{cf}*{key}")
    }
}

impl<C: Coefficient, K: Key> fmt::Display for Series<C, K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_zero() {
            return write!(f, "0");
        }
        let limit = settings::max_term_output();
        let mut terms = self.terms.sorted();
        terms.reverse();
        for (i, (k, c)) in terms.iter().take(limit).enumerate() {
            let s = format_term(*c, &k.format(&self.symbols));
            match (i, s.strip_prefix('-')) {
                (0, _) => write!(f, "{s}")?,
                (_, Some(rest)) => write!(f, " - {rest}")?,
                (_, None) => write!(f, " + {s}")?,
            }
        }
        if terms.len() > limit {
            write!(f, " + ...")?;
        }
        Ok(())
    }
}

#[derive(Serialize)]
struct SeriesReprRef<'a, C, K> {
    symbols: &'a SymbolSet,
    terms: Vec<(&'a K, &'a C)>,
}

#[derive(Deserialize)]
struct SeriesRepr<C, K> {
    symbols: SymbolSet,
    terms: Vec<(K, C)>,
}

impl<C: Coefficient, K: Key> Serialize for Series<C, K> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        SeriesReprRef {
            symbols: &self.symbols,
            terms: self.terms.sorted(),
        }
        .serialize(serializer)
    }
}

impl<'de, C: Coefficient, K: Key> Deserialize<'de> for Series<C, K> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let repr = SeriesRepr::<C, K>::deserialize(deserializer)?;
        Self::from_terms(repr.symbols, repr.terms).map_err(serde::de::Error::custom)
    }
}

impl<C: Coefficient, K: Key> Coefficient for Series<C, K> {
    fn zero() -> Self {
        Self::default()
    }

    fn one() -> Self {
        Self::from_cf(C::one())
    }

    fn is_zero(&self) -> bool {
        self.terms.is_empty()
    }

    fn is_one(&self) -> bool {
        self.len() == 1 && self.is_single_cf() && self.terms.iter().all(|(_, c)| c.is_one())
    }

    fn from_integer(n: &Integer) -> Self {
        Self::from_cf(C::from_integer(n))
    }

    fn add_assign(&mut self, other: &Self) -> Result<()> {
        Series::add_assign(self, other)
    }

    fn sub_assign(&mut self, other: &Self) -> Result<()> {
        Series::sub_assign(self, other)
    }

    fn neg(&self) -> Self {
        Series::neg(self)
    }

    fn mul(&self, other: &Self) -> Result<Self> {
        Series::mul(self, other)
    }

    fn mul_integer(&self, n: &Integer) -> Result<Self> {
        Series::mul_integer(self, n)
    }

    fn div_integer(&self, n: &Integer) -> Result<Self> {
        Series::div_integer(self, n)
    }

    fn div_exact(&self, other: &Self) -> Result<Self> {
        Series::div(self, other)
    }

    fn invert(&self) -> Result<Self> {
        Series::pow(self, -1)
    }

    fn pow(&self, n: i64) -> Result<Self> {
        Series::pow(self, n)
    }

    fn degree(&self, names: Option<&[String]>) -> i64 {
        match names {
            Some(n) => self.partial_degree(n),
            None => Series::degree(self),
        }
    }

    fn ldegree(&self, names: Option<&[String]>) -> i64 {
        match names {
            Some(n) => self.partial_ldegree(n),
            None => Series::ldegree(self),
        }
    }

    fn truncate_degree(&self, max: i64, names: Option<&[String]>) -> Result<Self> {
        self.truncate_impl(max, names)
    }

    fn depends_on(&self, name: &str) -> bool {
        let pos = self.symbols.index_of(name);
        self.terms.iter().any(|(k, c)| {
            pos.is_some_and(|p| k.depends_on(p, &self.symbols)) || c.depends_on(name)
        })
    }

    fn partial(&self, name: &str) -> Result<Self> {
        Series::partial(self, name)
    }

    fn integrate(&self, name: &str) -> Result<Self> {
        Series::integrate(self, name)
    }

    fn subs(&self, name: &str, value: &Self) -> Result<Self> {
        Series::subs(self, name, value)
    }

    fn evaluate<V: EvalValue>(&self, values: &HashMap<String, V>) -> Result<V> {
        Series::evaluate(self, values)
    }

    fn integral_combination(&self) -> Result<Vec<(String, Integer)>> {
        let mut out: Vec<(String, Integer)> = Vec::new();
        for (k, c) in self.terms.iter() {
            if k.is_unit(&self.symbols) {
                out.extend(c.integral_combination()?);
                continue;
            }
            let pos = k.linear_position(&self.symbols);
            let n = c.to_integer();
            match (pos.and_then(|p| self.symbols.get(p)), n) {
                (Some(name), Some(n)) => out.push((name.to_string(), n)),
                _ => {
                    return Err(SeriesError::invalid(
                        "the series is not an integral linear combination of symbols",
                    ))
                }
            }
        }
        out.sort_by(|a, b| a.0.cmp(&b.0));
        Ok(out)
    }

    fn to_integer(&self) -> Option<Integer> {
        if self.is_zero() {
            return Some(Integer::from(0i64));
        }
        self.to_cf().ok()?.to_integer()
    }

    fn from_symbol(name: &str) -> Result<Self> {
        Series::from_symbol(name)
    }

    fn trim(&self) -> Result<Self> {
        Series::trim(self)
    }

    fn needs_brackets(&self) -> bool {
        self.len() > 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::monomial::Monomial;
    use sigma_rings::{Q, Z};

    type P = Series<Z, Monomial>;
    type PQ = Series<Q, Monomial>;

    fn x() -> P {
        P::from_symbol("x").unwrap()
    }

    fn y() -> P {
        P::from_symbol("y").unwrap()
    }

    #[test]
    fn test_from_symbol_and_constants() {
        let p = x();
        assert_eq!(p.len(), 1);
        assert_eq!(p.symbols().names(), &["x"]);
        assert!(!p.is_single_cf());
        let c = P::from_integer(5);
        assert!(c.is_single_cf());
        assert_eq!(c.to_cf().unwrap(), Z::new(5));
        assert!(p.to_cf().is_err());
        assert!(P::from_integer(0).is_zero());
    }

    #[test]
    fn test_add_merges_symbols() {
        let s = x().add(&y()).unwrap();
        assert_eq!(s.symbols().names(), &["x", "y"]);
        assert_eq!(s.len(), 2);
        let back = s.sub(&y()).unwrap();
        assert_eq!(back, x());
        // equality ignores unused symbols
        assert_eq!(back.symbols().len(), 2);
        assert!(!back.strict_eq(&x()));
    }

    #[test]
    fn test_cancellation_removes_terms() {
        let s = x().sub(&x()).unwrap();
        assert!(s.is_zero());
        assert_eq!(x().add(&x().neg()).unwrap().len(), 0);
    }

    #[test]
    fn test_degrees() {
        // x**5*y + x*y*z/4
        let s = SymbolSet::new(["x", "y", "z"]).unwrap();
        let p = PQ::from_terms(
            s,
            [
                (Monomial::new(&[5, 1, 0]), Q::new(1, 1)),
                (Monomial::new(&[1, 1, 1]), Q::new(1, 4)),
            ],
        )
        .unwrap();
        assert_eq!(p.degree(), 6);
        assert_eq!(p.ldegree(), 3);
        assert_eq!(p.partial_degree(&["x"]), 5);
        assert_eq!(p.partial_ldegree(&["z"]), 0);
        assert_eq!(PQ::default().degree(), 0);
    }

    #[test]
    fn test_truncate_degree() {
        let s = SymbolSet::new(["x", "y", "z"]).unwrap();
        let p = PQ::from_terms(
            s.clone(),
            [
                (Monomial::new(&[5, 1, 0]), Q::new(1, 1)),
                (Monomial::new(&[1, 1, 1]), Q::new(1, 4)),
            ],
        )
        .unwrap();
        let t = p.truncate_degree(3).unwrap();
        let expected = PQ::from_terms(s, [(Monomial::new(&[1, 1, 1]), Q::new(1, 4))]).unwrap();
        assert_eq!(t, expected);
        assert!(p.truncate_degree(2).unwrap().is_zero());
        let tp = p.truncate_partial_degree(1, &["x"]).unwrap();
        assert_eq!(tp, expected);
    }

    #[test]
    fn test_trim() {
        let s = x().add(&y()).unwrap().sub(&y()).unwrap();
        let t = s.trim().unwrap();
        assert_eq!(t.symbols().names(), &["x"]);
        assert!(t.strict_eq(&x()));
    }

    #[test]
    fn test_find_cf() {
        let p = x().mul_integer(&Integer::new(3)).unwrap().add(&y()).unwrap();
        assert_eq!(p.find_cf(&[1, 0]).unwrap(), Z::new(3));
        assert_eq!(p.find_cf(&[0, 0]).unwrap(), Z::new(0));
        assert!(p.find_cf(&[1]).is_err());
    }

    #[test]
    fn test_cf_operations() {
        let p = x().add_cf(&Z::new(2)).unwrap();
        assert_eq!(p.find_cf(&[0]).unwrap(), Z::new(2));
        let q = p.mul_cf(&Z::new(3)).unwrap();
        assert_eq!(q.find_cf(&[1]).unwrap(), Z::new(3));
        assert_eq!(q.div_cf(&Z::new(3)).unwrap(), p);
        assert_eq!(q.div_cf(&Z::new(2)).unwrap_err().kind(), crate::ErrorKind::Arithmetic);
        assert_eq!(q.div_cf(&Z::new(0)).unwrap_err().kind(), crate::ErrorKind::ZeroDivision);
    }

    #[test]
    fn test_evaluate() {
        let xy = x().mul(&y()).unwrap();
        let mut values = HashMap::new();
        values.insert("x".to_string(), Integer::new(2));
        values.insert("y".to_string(), Integer::new(1));
        assert_eq!(xy.evaluate(&values).unwrap(), Integer::new(2));

        values.remove("y");
        let err = xy.evaluate(&values).unwrap_err();
        assert_eq!(err.kind(), crate::ErrorKind::Value);
    }

    #[test]
    fn test_rational_evaluates_truncated_with_integers() {
        let p = PQ::from_symbol("x").unwrap().div_cf(&Q::new(4, 1)).unwrap();
        let mut values = HashMap::new();
        values.insert("x".to_string(), Integer::new(1));
        // 1/4 truncates to zero, times x
        assert_eq!(p.evaluate(&values).unwrap(), Integer::new(0));
    }

    #[test]
    fn test_display() {
        let p = x().mul_integer(&Integer::new(2)).unwrap().sub(&y()).unwrap();
        let s = p.to_string();
        assert!(s.contains("2*x"));
        assert!(s.contains("y"));
        assert_eq!(P::default().to_string(), "0");
    }

    #[test]
    fn test_serde_json_roundtrip() {
        let p = x().add(&y().mul_integer(&Integer::new(-3)).unwrap()).unwrap();
        let json = serde_json::to_string(&p).unwrap();
        let back: P = serde_json::from_str(&json).unwrap();
        assert!(back.strict_eq(&p));
    }

    #[test]
    fn test_nested_coefficients() {
        type Inner = Series<Q, Monomial>;
        type Outer = Series<Inner, Monomial>;
        let a = Inner::from_symbol("a").unwrap();
        let x = Outer::from_symbol("x").unwrap();
        let p = x.mul_cf(&a).unwrap();
        assert_eq!(Coefficient::degree(&p, None), 2);
        assert!(Coefficient::depends_on(&p, "a"));
        assert!(!Coefficient::depends_on(&p, "b"));
        assert!(p.to_string().contains('a'));
    }

    #[test]
    fn test_integral_combination() {
        let s = x().mul_integer(&Integer::new(2)).unwrap().sub(&y()).unwrap();
        let comb = Coefficient::integral_combination(&s).unwrap();
        assert_eq!(comb, vec![("x".to_string(), Integer::new(2)), ("y".to_string(), Integer::new(-1))]);
        assert!(Coefficient::integral_combination(&s.add_cf(&Z::new(1)).unwrap()).is_err());
        assert!(Coefficient::integral_combination(&x().mul(&x()).unwrap()).is_err());
    }
}

//! Divisor keys: products `1/(l_1)^k_1 · 1/(l_2)^k_2 · ...` of integral
//! linear forms.
//!
//! Every form is primitive (its coefficients have gcd 1) and its first
//! nonzero coefficient is positive, so equal divisors compare equal.

use serde::{Deserialize, Serialize};
use sigma_integers::Integer;
use sigma_series::{
    Coefficient, EvalValue, Exponents, InsertionMap, Key, KeyIntegral, ProductTerm, ProductTerms,
    Result, Series, SeriesError, SymbolSet,
};
use smallvec::{smallvec, SmallVec};

use crate::linear::{decompose, drop_masked, format_form, is_canonical, spread, to_form};

const NEGATIVE_EXPONENT: &str = "invalid argument for series exponentiation: negative integral value";

/// A product of negative powers of linear forms, sorted by form.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug, Default, Serialize, Deserialize)]
pub struct Divisor {
    factors: Vec<(Exponents, u16)>,
}

fn is_primitive(form: &[i16]) -> bool {
    form.iter()
        .fold(Integer::new(0), |g, &n| g.gcd(&Integer::from(n)))
        == Integer::new(1)
}

impl Divisor {
    /// Builds a divisor from `(form, exponent)` factors. Repeated forms have
    /// their exponents added.
    ///
    /// # Errors
    ///
    /// `InvalidArgument` for a form that is zero, not primitive or not in
    /// canonical form, or for a zero exponent; `Overflow` when exponents
    /// add past `u16::MAX`.
    pub fn new<I>(factors: I) -> Result<Self>
    where
        I: IntoIterator<Item = (Exponents, u16)>,
    {
        let mut out = Self::default();
        for (form, k) in factors {
            if k == 0 || !is_canonical(&form) || !is_primitive(&form) {
                return Err(SeriesError::invalid(format!(
                    "invalid divisor factor {form:?} with exponent {k}"
                )));
            }
            out.push(form, k)?;
        }
        Ok(out)
    }

    fn push(&mut self, form: Exponents, k: u16) -> Result<()> {
        match self.factors.binary_search_by(|(f, _)| f.cmp(&form)) {
            Ok(i) => {
                let e = &mut self.factors[i].1;
                *e = e
                    .checked_add(k)
                    .ok_or_else(|| SeriesError::overflow("divisor exponent overflow"))?;
            }
            Err(i) => self.factors.insert(i, (form, k)),
        }
        Ok(())
    }

    /// The factors as `(form, exponent)` pairs.
    #[must_use]
    pub fn factors(&self) -> &[(Exponents, u16)] {
        &self.factors
    }

    fn map_forms(&self, f: impl Fn(&[i16]) -> Exponents) -> Self {
        Self {
            factors: self.factors.iter().map(|(form, k)| (f(form), *k)).collect(),
        }
    }
}

impl Key for Divisor {
    fn unit(_symbols: &SymbolSet) -> Result<Self> {
        Ok(Self::default())
    }

    fn is_unit(&self, _symbols: &SymbolSet) -> bool {
        self.factors.is_empty()
    }

    fn is_compatible(&self, symbols: &SymbolSet) -> bool {
        self.factors.windows(2).all(|w| w[0].0 < w[1].0)
            && self.factors.iter().all(|(form, k)| {
                *k > 0 && form.len() == symbols.len() && is_canonical(form) && is_primitive(form)
            })
    }

    fn multiply(&self, other: &Self, _symbols: &SymbolSet) -> Result<ProductTerms<Self>> {
        let mut out = self.clone();
        for (form, k) in &other.factors {
            out.push(form.clone(), *k)?;
        }
        Ok(smallvec![ProductTerm::plain(out)])
    }

    fn extend(&self, map: &InsertionMap, _from: &SymbolSet, _to: &SymbolSet) -> Result<Self> {
        Ok(self.map_forms(|f| spread(f, &map.positions, map.new_len)))
    }

    fn trim_identify(&self, mask: &mut [bool], _symbols: &SymbolSet) {
        for (form, _) in &self.factors {
            for (m, &n) in mask.iter_mut().zip(form.iter()) {
                if n != 0 {
                    *m = false;
                }
            }
        }
    }

    fn trim(&self, mask: &[bool], _from: &SymbolSet, _to: &SymbolSet) -> Result<Self> {
        Ok(self.map_forms(|f| drop_masked(f, mask)))
    }

    /// Chain rule: `d/dx 1/l^k = -k·(dl/dx)·1/l^(k+1)`, summed over the
    /// factors.
    fn partial(&self, pos: usize, _symbols: &SymbolSet) -> Result<SmallVec<[(Integer, Self); 2]>> {
        let mut out = SmallVec::new();
        for (i, (form, k)) in self.factors.iter().enumerate() {
            let a = form.get(pos).copied().unwrap_or(0);
            if a == 0 {
                continue;
            }
            let mut key = self.clone();
            key.factors[i].1 = k
                .checked_add(1)
                .ok_or_else(|| SeriesError::overflow("divisor exponent overflow in differentiation"))?;
            out.push((-(Integer::new(i64::from(*k)) * Integer::from(a)), key));
        }
        Ok(out)
    }

    fn integrate(&self, pos: usize, symbols: &SymbolSet) -> Result<KeyIntegral<Self>> {
        if self.depends_on(pos, symbols) {
            return Err(SeriesError::invalid(
                "an integration variable was detected in a divisor",
            ));
        }
        Ok(KeyIntegral::Independent)
    }

    /// A unit-key term whose coefficient is `Σ n_i·x_i` becomes
    /// `1/cd · 1/(Σ (n_i/cd)·x_i)`, where `cd` is the gcd of the `n_i`
    /// carrying the sign of the first one.
    fn invert_term<C: Coefficient>(&self, cf: &C, symbols: &SymbolSet) -> Result<Option<Series<C, Self>>> {
        if !self.is_unit(symbols) {
            return Ok(None);
        }
        let (merged, form) = decompose(cf, symbols).map_err(|_| SeriesError::invalid(NEGATIVE_EXPONENT))?;
        let Some(first) = form.iter().find(|n| n.signum() != 0) else {
            return Err(SeriesError::invalid(NEGATIVE_EXPONENT));
        };
        let mut cd = form.iter().fold(Integer::new(0), |g, n| g.gcd(n));
        if first.is_negative() {
            cd = -cd;
        }
        let reduced = form
            .iter()
            .map(|n| n.div_exact(&cd).ok_or_else(|| SeriesError::arithmetic("inexact divisor reduction")))
            .collect::<Result<Vec<_>>>()?;
        let key = Self::new([(to_form(&reduced)?, 1)])?;
        let inv = C::one().div_integer(&cd)?;
        Ok(Some(Series::from_terms(merged, [(key, inv)])?))
    }

    fn evaluate<V: EvalValue>(&self, values: &[V], _symbols: &SymbolSet) -> Result<V> {
        let mut den = V::one();
        for (form, k) in &self.factors {
            let mut l = V::zero();
            for (v, &a) in values.iter().zip(form.iter()) {
                if a != 0 {
                    l = l.add(&V::from_integer(&Integer::from(a))?.mul(v));
                }
            }
            den = den.mul(&l.powi(i64::from(*k))?);
        }
        V::one().div(&den)
    }

    fn format(&self, symbols: &SymbolSet) -> String {
        if self.factors.is_empty() {
            return String::new();
        }
        let body = self
            .factors
            .iter()
            .map(|(form, k)| {
                let f = format!("({})", format_form(form, symbols));
                if *k == 1 {
                    f
                } else {
                    format!("{f}**{k}")
                }
            })
            .collect::<Vec<_>>()
            .join("*");
        format!("1/[{body}]")
    }
}

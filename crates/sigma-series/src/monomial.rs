//! Dense monomials: one signed 16-bit exponent per symbol.
//!
//! Exponent vectors live inline for up to eight symbols. All arithmetic is
//! checked, so an exponent leaving the `i16` range is an error rather than
//! a silent wraparound.

use serde::{Deserialize, Serialize};
use sigma_integers::Integer;
use smallvec::{smallvec, SmallVec};

use crate::coefficient::{Coefficient, EvalValue};
use crate::error::{Result, SeriesError};
use crate::key::{format_power, Exponents, Key, KeyIntegral, PolyKey, ProductTerm, ProductTerms};
use crate::series::Series;
use crate::symbol_set::{InsertionMap, SymbolSet};

/// A monomial stored as a dense exponent vector.
///
/// The derived ordering is lexicographic on the exponents, which is a
/// monomial order on non-negative exponent vectors.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug, Default, Serialize, Deserialize)]
pub struct Monomial(Exponents);

impl Monomial {
    /// Creates a monomial from exponents.
    #[must_use]
    pub fn new(exponents: &[i16]) -> Self {
        Self(SmallVec::from_slice(exponents))
    }

    /// Creates the monomial 1 over `n` symbols.
    #[must_use]
    pub fn one(n: usize) -> Self {
        Self(smallvec![0; n])
    }

    /// Creates the monomial `x_i` over `n` symbols.
    #[must_use]
    pub fn var(i: usize, n: usize) -> Self {
        let mut m = Self::one(n);
        if let Some(e) = m.0.get_mut(i) {
            *e = 1;
        }
        m
    }

    /// The exponent vector.
    #[must_use]
    pub fn as_slice(&self) -> &[i16] {
        &self.0
    }

    /// Number of symbols.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true for the monomial over zero symbols.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Multiplies two monomials (adds exponents).
    ///
    /// # Errors
    ///
    /// Fails with `Overflow` if an exponent leaves the `i16` range.
    pub fn mul(&self, other: &Self) -> Result<Self> {
        if self.0.len() != other.0.len() {
            return Err(SeriesError::invalid("monomials of different sizes cannot be multiplied"));
        }
        self.0
            .iter()
            .zip(other.0.iter())
            .map(|(a, b)| {
                a.checked_add(*b)
                    .ok_or_else(|| SeriesError::overflow("monomial exponent overflow in multiplication"))
            })
            .collect::<Result<Exponents>>()
            .map(Self)
    }

    /// Divides by another monomial if possible.
    ///
    /// Returns `Some(quotient)` if every exponent of `self` is at least the
    /// corresponding exponent of `other`.
    #[must_use]
    pub fn div(&self, other: &Self) -> Option<Self> {
        if self.0.len() != other.0.len() {
            return None;
        }
        self.0
            .iter()
            .zip(other.0.iter())
            .map(|(a, b)| if a >= b { Some(a - b) } else { None })
            .collect::<Option<Exponents>>()
            .map(Self)
    }

    /// Computes the total degree.
    #[must_use]
    pub fn total_degree(&self) -> i64 {
        self.0.iter().map(|&e| i64::from(e)).sum()
    }

    fn has_negative(&self) -> bool {
        self.0.iter().any(|&e| e < 0)
    }
}

impl Key for Monomial {
    fn unit(symbols: &SymbolSet) -> Result<Self> {
        Ok(Self::one(symbols.len()))
    }

    fn is_unit(&self, _symbols: &SymbolSet) -> bool {
        self.0.iter().all(|&e| e == 0)
    }

    fn is_compatible(&self, symbols: &SymbolSet) -> bool {
        self.0.len() == symbols.len()
    }

    fn variable(symbols: &SymbolSet) -> Result<Option<Self>> {
        Ok((symbols.len() == 1).then(|| Self::var(0, 1)))
    }

    fn multiply(&self, other: &Self, _symbols: &SymbolSet) -> Result<ProductTerms<Self>> {
        Ok(smallvec![ProductTerm::plain(self.mul(other)?)])
    }

    fn degree(&self, _symbols: &SymbolSet) -> i64 {
        self.total_degree()
    }

    fn partial_degree(&self, positions: &[usize], _symbols: &SymbolSet) -> i64 {
        positions
            .iter()
            .filter_map(|&p| self.0.get(p))
            .map(|&e| i64::from(e))
            .sum()
    }

    fn extend(&self, map: &InsertionMap, _from: &SymbolSet, _to: &SymbolSet) -> Result<Self> {
        let mut out: Exponents = smallvec![0; map.new_len];
        for (&e, &p) in self.0.iter().zip(map.positions.iter()) {
            out[p] = e;
        }
        Ok(Self(out))
    }

    fn trim_identify(&self, mask: &mut [bool], _symbols: &SymbolSet) {
        for (m, &e) in mask.iter_mut().zip(self.0.iter()) {
            if e != 0 {
                *m = false;
            }
        }
    }

    fn trim(&self, mask: &[bool], _from: &SymbolSet, _to: &SymbolSet) -> Result<Self> {
        Ok(Self(
            self.0
                .iter()
                .zip(mask.iter())
                .filter(|(_, &m)| !m)
                .map(|(&e, _)| e)
                .collect(),
        ))
    }

    fn partial(&self, pos: usize, _symbols: &SymbolSet) -> Result<SmallVec<[(Integer, Self); 2]>> {
        let e = self.0.get(pos).copied().unwrap_or(0);
        if e == 0 {
            return Ok(SmallVec::new());
        }
        let mut key = self.clone();
        key.0[pos] = e
            .checked_sub(1)
            .ok_or_else(|| SeriesError::overflow("monomial exponent overflow in differentiation"))?;
        Ok(smallvec![(Integer::from(e), key)])
    }

    fn integrate(&self, pos: usize, _symbols: &SymbolSet) -> Result<KeyIntegral<Self>> {
        let e = self.0.get(pos).copied().unwrap_or(0);
        if e == -1 {
            return Err(SeriesError::invalid(
                "unable to perform monomial integration: negative unitary exponent",
            ));
        }
        let next = e
            .checked_add(1)
            .ok_or_else(|| SeriesError::overflow("monomial exponent overflow in integration"))?;
        let mut key = self.clone();
        key.0[pos] = next;
        Ok(KeyIntegral::Integrated {
            divisor: Integer::from(next),
            key,
        })
    }

    fn linear_position(&self, _symbols: &SymbolSet) -> Option<usize> {
        let mut found = None;
        for (i, &e) in self.0.iter().enumerate() {
            match (e, found) {
                (0, _) => {}
                (1, None) => found = Some(i),
                _ => return None,
            }
        }
        found
    }

    fn split_power(&self, pos: usize, _symbols: &SymbolSet) -> Result<Option<(i64, Self)>> {
        match self.0.get(pos) {
            Some(&e) if e != 0 => {
                let mut key = self.clone();
                key.0[pos] = 0;
                Ok(Some((i64::from(e), key)))
            }
            _ => Ok(None),
        }
    }

    fn invert_term<C: Coefficient>(&self, cf: &C, symbols: &SymbolSet) -> Result<Option<Series<C, Self>>> {
        let inv_cf = cf.invert()?;
        let exps = self
            .0
            .iter()
            .map(|e| {
                e.checked_neg()
                    .ok_or_else(|| SeriesError::overflow("monomial exponent overflow in inversion"))
            })
            .collect::<Result<Exponents>>()?;
        Ok(Some(Series::from_terms(symbols.clone(), [(Self(exps), inv_cf)])?))
    }

    fn divide(&self, other: &Self, _symbols: &SymbolSet) -> Result<Option<Self>> {
        if self.has_negative() || other.has_negative() {
            return Err(SeriesError::invalid(
                "exact division requires monomials with non-negative exponents",
            ));
        }
        Ok(self.div(other))
    }

    fn evaluate<V: EvalValue>(&self, values: &[V], _symbols: &SymbolSet) -> Result<V> {
        let mut acc = V::one();
        for (v, &e) in values.iter().zip(self.0.iter()) {
            if e != 0 {
                acc = acc.mul(&v.powi(i64::from(e))?);
            }
        }
        Ok(acc)
    }

    fn format(&self, symbols: &SymbolSet) -> String {
        self.0
            .iter()
            .enumerate()
            .filter(|(_, &e)| e != 0)
            .map(|(i, &e)| format_power(symbols.get(i).unwrap_or("?"), i64::from(e)))
            .collect::<Vec<_>>()
            .join("*")
    }
}

impl PolyKey for Monomial {
    fn from_exponents(exponents: &[i16], symbols: &SymbolSet) -> Result<Self> {
        if exponents.len() != symbols.len() {
            return Err(SeriesError::invalid(format!(
                "exponent vector of size {} does not match {} symbols",
                exponents.len(),
                symbols.len()
            )));
        }
        Ok(Self::new(exponents))
    }

    fn exponents(&self, _symbols: &SymbolSet) -> Exponents {
        self.0.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn xyz() -> SymbolSet {
        SymbolSet::new(["x", "y", "z"]).unwrap()
    }

    #[test]
    fn test_mul() {
        let x = Monomial::var(0, 3);
        let y = Monomial::var(1, 3);

        let xy = x.mul(&y).unwrap();
        assert_eq!(xy.as_slice(), &[1, 1, 0]);

        let x2y = x.mul(&xy).unwrap();
        assert_eq!(x2y.as_slice(), &[2, 1, 0]);
    }

    #[test]
    fn test_mul_overflow_is_reported() {
        let a = Monomial::new(&[i16::MAX, 0]);
        let b = Monomial::new(&[1, 0]);
        let err = a.mul(&b).unwrap_err();
        assert_eq!(err.kind(), crate::ErrorKind::Overflow);
    }

    #[test]
    fn test_div() {
        let x2y = Monomial::new(&[2, 1, 0]);
        let xy = Monomial::new(&[1, 1, 0]);
        assert_eq!(x2y.div(&xy), Some(Monomial::var(0, 3)));
        assert_eq!(xy.div(&x2y), None);

        let neg = Monomial::new(&[-1, 0, 0]);
        assert!(Key::divide(&neg, &xy, &xyz()).is_err());
    }

    #[test]
    fn test_degrees() {
        let m = Monomial::new(&[2, -1, 3]);
        let s = xyz();
        assert_eq!(m.degree(&s), 4);
        assert_eq!(m.partial_degree(&[0, 2], &s), 5);
        assert_eq!(m.partial_degree(&[], &s), 0);
    }

    #[test]
    fn test_extend_and_trim() {
        let xz = SymbolSet::new(["x", "z"]).unwrap();
        let (merged, map, _) = xz.merge(&xyz());
        let m = Monomial::new(&[2, 5]);
        let ext = m.extend(&map, &xz, &merged).unwrap();
        assert_eq!(ext.as_slice(), &[2, 0, 5]);

        let mut mask = vec![true; 3];
        ext.trim_identify(&mut mask, &merged);
        assert_eq!(mask, vec![false, true, false]);
        assert_eq!(ext.trim(&mask, &merged, &xz).unwrap(), m);
    }

    #[test]
    fn test_partial_and_integrate() {
        let s = xyz();
        let m = Monomial::new(&[3, 1, 0]);
        let d = m.partial(0, &s).unwrap();
        assert_eq!(d.len(), 1);
        assert_eq!(d[0].0, Integer::new(3));
        assert_eq!(d[0].1.as_slice(), &[2, 1, 0]);
        assert!(m.partial(2, &s).unwrap().is_empty());

        match m.integrate(1, &s).unwrap() {
            KeyIntegral::Integrated { divisor, key } => {
                assert_eq!(divisor, Integer::new(2));
                assert_eq!(key.as_slice(), &[3, 2, 0]);
            }
            KeyIntegral::Independent => panic!("monomials always integrate"),
        }

        let inv = Monomial::new(&[-1, 0, 0]);
        let err = inv.integrate(0, &s).unwrap_err();
        assert!(err.message().contains("negative unitary exponent"));
    }

    #[test]
    fn test_format() {
        let s = xyz();
        assert_eq!(Monomial::new(&[2, 0, 1]).format(&s), "x**2*z");
        assert_eq!(Monomial::one(3).format(&s), "");
        assert_eq!(Monomial::new(&[0, -1, 0]).format(&s), "y**-1");
    }
}

//! Kronecker packing of exponent vectors into a single `i64`.
//!
//! A vector `e_0..e_{m-1}` is encoded as `Σ e_i · r^i` with radix
//! `r = 2·b + 1`, where every digit is balanced in `[-b, b]`. For a given
//! size `m` the bound `b` is the largest value with `r^m <= i64::MAX`, so
//! every admissible vector has a unique code and decoding is lossless.

use std::sync::OnceLock;

use serde::{Deserialize, Serialize};
use sigma_integers::Integer;
use smallvec::{smallvec, SmallVec};

use crate::coefficient::{Coefficient, EvalValue};
use crate::error::{Result, SeriesError};
use crate::key::{format_power, Exponents, Key, KeyIntegral, PolyKey, ProductTerm, ProductTerms};
use crate::series::Series;
use crate::symbol_set::{InsertionMap, SymbolSet};

/// Per-size digit bounds of the Kronecker codec.
#[derive(Debug)]
pub struct KroneckerLimits {
    bounds: Vec<i64>,
}

impl KroneckerLimits {
    fn compute() -> Self {
        // bounds[m] is the digit bound for vectors of size m (m >= 1)
        let mut bounds = vec![i64::MAX];
        for m in 1u32.. {
            let mut lo: i64 = 0;
            let mut hi: i64 = i64::MAX / 2;
            while lo < hi {
                let mid = lo + (hi - lo + 1) / 2;
                if (2 * i128::from(mid) + 1).checked_pow(m).is_some_and(|p| p <= i128::from(i64::MAX)) {
                    lo = mid;
                } else {
                    hi = mid - 1;
                }
            }
            if lo == 0 {
                break;
            }
            bounds.push(lo);
        }
        Self { bounds }
    }

    /// The shared limits table.
    pub fn get() -> &'static Self {
        static LIMITS: OnceLock<KroneckerLimits> = OnceLock::new();
        LIMITS.get_or_init(Self::compute)
    }

    /// Largest vector size the codec supports.
    #[must_use]
    pub fn max_size(&self) -> usize {
        self.bounds.len() - 1
    }

    /// Digit bound for vectors of size `m`.
    #[must_use]
    pub fn bound(&self, m: usize) -> Option<i64> {
        self.bounds.get(m).copied()
    }
}

fn bound_for(m: usize) -> Result<i64> {
    KroneckerLimits::get().bound(m).ok_or_else(|| {
        SeriesError::overflow(format!(
            "a vector of size {m} exceeds the maximum Kronecker size {}",
            KroneckerLimits::get().max_size()
        ))
    })
}

/// Encodes an exponent vector.
///
/// # Errors
///
/// Fails with `Overflow` if the vector is too long or a digit is out of range.
pub fn encode(exponents: &[i64]) -> Result<i64> {
    let m = exponents.len();
    if m == 0 {
        return Ok(0);
    }
    let b = bound_for(m)?;
    let r = i128::from(2 * b + 1);
    let mut code: i128 = 0;
    let mut power: i128 = 1;
    for &e in exponents {
        if e < -b || e > b {
            return Err(SeriesError::overflow(format!(
                "exponent {e} is outside the Kronecker range [-{b}, {b}] for size {m}"
            )));
        }
        code += i128::from(e) * power;
        power *= r;
    }
    i64::try_from(code).map_err(|_| SeriesError::overflow("Kronecker code out of range"))
}

/// Decodes a code into `m` balanced digits.
///
/// # Errors
///
/// Fails with `Overflow` if the code is not a valid code for size `m`.
pub fn decode(code: i64, m: usize) -> Result<SmallVec<[i64; 8]>> {
    if m == 0 {
        return if code == 0 {
            Ok(SmallVec::new())
        } else {
            Err(SeriesError::overflow("nonzero Kronecker code for an empty vector"))
        };
    }
    let b = i128::from(bound_for(m)?);
    let r = 2 * b + 1;
    let mut rest = i128::from(code);
    let mut out = SmallVec::with_capacity(m);
    for _ in 0..m {
        let mut d = rest.rem_euclid(r);
        if d > b {
            d -= r;
        }
        rest = (rest - d) / r;
        // |d| <= b <= i64::MAX / 2
        out.push(d as i64);
    }
    if rest != 0 {
        return Err(SeriesError::overflow(format!(
            "Kronecker code {code} is out of range for size {m}"
        )));
    }
    Ok(out)
}

fn to_exponents(digits: &[i64]) -> Result<Exponents> {
    digits
        .iter()
        .map(|&d| i16::try_from(d).map_err(|_| SeriesError::overflow("Kronecker exponent exceeds the i16 range")))
        .collect()
}

fn widen(exponents: &[i16]) -> SmallVec<[i64; 8]> {
    exponents.iter().map(|&e| i64::from(e)).collect()
}

/// A monomial packed into one Kronecker code.
///
/// The derived ordering compares codes, which orders vectors
/// lexicographically from the last symbol and is compatible with
/// multiplication.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Debug, Default, Serialize, Deserialize)]
pub struct KroneckerMonomial(i64);

impl KroneckerMonomial {
    /// The raw code.
    #[must_use]
    pub const fn code(self) -> i64 {
        self.0
    }

    /// Wraps a raw code after validating it for `m` symbols.
    ///
    /// # Errors
    ///
    /// Fails with `Overflow` on an invalid code.
    pub fn from_code(code: i64, m: usize) -> Result<Self> {
        decode(code, m)?;
        Ok(Self(code))
    }

    /// Digits for the infallible `Key` queries.
    ///
    /// Every stored code comes from `encode` or `from_code` against the
    /// owning symbol set, so decoding cannot fail for a key used with its
    /// own series. A foreign code is a caller bug: debug builds panic, release
    /// builds read it as the unit key.
    fn unpack(self, symbols: &SymbolSet) -> SmallVec<[i64; 8]> {
        let digits = decode(self.0, symbols.len());
        debug_assert!(
            digits.is_ok(),
            "Kronecker code {} is not valid for {} symbols",
            self.0,
            symbols.len()
        );
        digits.unwrap_or_else(|_| smallvec![0; symbols.len()])
    }

    /// Exponents of the key, as checked `i16` values.
    ///
    /// # Errors
    ///
    /// Fails with `Overflow` when the code is not valid for `symbols` or a
    /// digit leaves the `i16` range.
    pub fn try_exponents(self, symbols: &SymbolSet) -> Result<Exponents> {
        to_exponents(&decode(self.0, symbols.len())?)
    }

    fn pack(digits: &[i64]) -> Result<Self> {
        encode(digits).map(Self)
    }
}

impl Key for KroneckerMonomial {
    fn unit(symbols: &SymbolSet) -> Result<Self> {
        bound_for(symbols.len())?;
        Ok(Self(0))
    }

    fn is_unit(&self, _symbols: &SymbolSet) -> bool {
        self.0 == 0
    }

    fn is_compatible(&self, symbols: &SymbolSet) -> bool {
        decode(self.0, symbols.len()).is_ok_and(|d| to_exponents(&d).is_ok())
    }

    fn variable(symbols: &SymbolSet) -> Result<Option<Self>> {
        Ok((symbols.len() == 1).then_some(Self(1)))
    }

    fn multiply(&self, other: &Self, symbols: &SymbolSet) -> Result<ProductTerms<Self>> {
        let m = symbols.len();
        let a = decode(self.0, m)?;
        let b = decode(other.0, m)?;
        let sum: SmallVec<[i64; 8]> = a.iter().zip(b.iter()).map(|(x, y)| x + y).collect();
        to_exponents(&sum)?;
        Ok(smallvec![ProductTerm::plain(Self::pack(&sum)?)])
    }

    fn degree(&self, symbols: &SymbolSet) -> i64 {
        self.unpack(symbols).iter().sum()
    }

    fn partial_degree(&self, positions: &[usize], symbols: &SymbolSet) -> i64 {
        let d = self.unpack(symbols);
        positions.iter().filter_map(|&p| d.get(p)).sum()
    }

    fn extend(&self, map: &InsertionMap, from: &SymbolSet, _to: &SymbolSet) -> Result<Self> {
        let d = decode(self.0, from.len())?;
        let mut out: SmallVec<[i64; 8]> = smallvec![0; map.new_len];
        for (&e, &p) in d.iter().zip(map.positions.iter()) {
            out[p] = e;
        }
        Self::pack(&out)
    }

    fn trim_identify(&self, mask: &mut [bool], symbols: &SymbolSet) {
        for (m, &e) in mask.iter_mut().zip(self.unpack(symbols).iter()) {
            if e != 0 {
                *m = false;
            }
        }
    }

    fn trim(&self, mask: &[bool], from: &SymbolSet, _to: &SymbolSet) -> Result<Self> {
        let d = decode(self.0, from.len())?;
        let kept: SmallVec<[i64; 8]> = d
            .iter()
            .zip(mask.iter())
            .filter(|(_, &m)| !m)
            .map(|(&e, _)| e)
            .collect();
        Self::pack(&kept)
    }

    fn partial(&self, pos: usize, symbols: &SymbolSet) -> Result<SmallVec<[(Integer, Self); 2]>> {
        let mut d = decode(self.0, symbols.len())?;
        let Some(&e) = d.get(pos) else {
            return Ok(SmallVec::new());
        };
        if e == 0 {
            return Ok(SmallVec::new());
        }
        d[pos] = e - 1;
        to_exponents(&d)?;
        Ok(smallvec![(Integer::new(e), Self::pack(&d)?)])
    }

    fn integrate(&self, pos: usize, symbols: &SymbolSet) -> Result<KeyIntegral<Self>> {
        let mut d = decode(self.0, symbols.len())?;
        let e = d.get(pos).copied().unwrap_or(0);
        if e == -1 {
            return Err(SeriesError::invalid(
                "unable to perform monomial integration: negative unitary exponent",
            ));
        }
        d[pos] = e + 1;
        to_exponents(&d)?;
        Ok(KeyIntegral::Integrated {
            divisor: Integer::new(e + 1),
            key: Self::pack(&d)?,
        })
    }

    fn linear_position(&self, symbols: &SymbolSet) -> Option<usize> {
        let d = self.unpack(symbols);
        let mut found = None;
        for (i, &e) in d.iter().enumerate() {
            match (e, found) {
                (0, _) => {}
                (1, None) => found = Some(i),
                _ => return None,
            }
        }
        found
    }

    fn split_power(&self, pos: usize, symbols: &SymbolSet) -> Result<Option<(i64, Self)>> {
        let mut d = decode(self.0, symbols.len())?;
        match d.get(pos).copied() {
            Some(e) if e != 0 => {
                d[pos] = 0;
                Ok(Some((e, Self::pack(&d)?)))
            }
            _ => Ok(None),
        }
    }

    fn invert_term<C: Coefficient>(&self, cf: &C, symbols: &SymbolSet) -> Result<Option<Series<C, Self>>> {
        let inv_cf = cf.invert()?;
        let d: SmallVec<[i64; 8]> = decode(self.0, symbols.len())?.iter().map(|e| -e).collect();
        to_exponents(&d)?;
        let key = Self::pack(&d)?;
        Ok(Some(Series::from_terms(symbols.clone(), [(key, inv_cf)])?))
    }

    fn divide(&self, other: &Self, symbols: &SymbolSet) -> Result<Option<Self>> {
        let a = decode(self.0, symbols.len())?;
        let b = decode(other.0, symbols.len())?;
        if a.iter().chain(b.iter()).any(|&e| e < 0) {
            return Err(SeriesError::invalid(
                "exact division requires monomials with non-negative exponents",
            ));
        }
        if a.iter().zip(b.iter()).all(|(x, y)| x >= y) {
            Ok(Some(Self(self.0 - other.0)))
        } else {
            Ok(None)
        }
    }

    fn evaluate<V: EvalValue>(&self, values: &[V], symbols: &SymbolSet) -> Result<V> {
        let d = decode(self.0, symbols.len())?;
        let mut acc = V::one();
        for (v, &e) in values.iter().zip(d.iter()) {
            if e != 0 {
                acc = acc.mul(&v.powi(e)?);
            }
        }
        Ok(acc)
    }

    fn format(&self, symbols: &SymbolSet) -> String {
        self.unpack(symbols)
            .iter()
            .enumerate()
            .filter(|(_, &e)| e != 0)
            .map(|(i, &e)| format_power(symbols.get(i).unwrap_or("?"), e))
            .collect::<Vec<_>>()
            .join("*")
    }
}

impl PolyKey for KroneckerMonomial {
    fn from_exponents(exponents: &[i16], symbols: &SymbolSet) -> Result<Self> {
        if exponents.len() != symbols.len() {
            return Err(SeriesError::invalid(format!(
                "exponent vector of size {} does not match {} symbols",
                exponents.len(),
                symbols.len()
            )));
        }
        Self::pack(&widen(exponents))
    }

    fn exponents(&self, symbols: &SymbolSet) -> Exponents {
        let exps = self.try_exponents(symbols);
        debug_assert!(exps.is_ok(), "Kronecker code {} is not valid for {} symbols", self.0, symbols.len());
        exps.unwrap_or_else(|_| smallvec![0; symbols.len()])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_limits() {
        let limits = KroneckerLimits::get();
        assert_eq!(limits.bound(1), Some((i64::MAX - 1) / 2));
        // 3^39 < 2^63 <= 3^40
        assert_eq!(limits.max_size(), 39);
        assert_eq!(limits.bound(39), Some(1));
        assert_eq!(limits.bound(40), None);
        for m in 1..=limits.max_size() {
            let b = i128::from(limits.bound(m).unwrap());
            let r = 2 * b + 1;
            assert!(r.pow(m as u32) <= i128::from(i64::MAX));
            assert!((r + 2).checked_pow(m as u32).map_or(true, |p| p > i128::from(i64::MAX)));
        }
    }

    #[test]
    fn test_encode_decode_roundtrip() {
        for v in [vec![0i64, 0, 0], vec![1, -2, 3], vec![-5, 7, 0, 11], vec![100]] {
            let code = encode(&v).unwrap();
            let back = decode(code, v.len()).unwrap();
            assert_eq!(back.as_slice(), v.as_slice());
            assert_eq!(encode(&back).unwrap(), code);
        }
        assert_eq!(encode(&[]).unwrap(), 0);
    }

    #[test]
    fn test_encode_overflow() {
        let b = KroneckerLimits::get().bound(4).unwrap();
        assert!(encode(&[b, 0, 0, 0]).is_ok());
        let err = encode(&[b + 1, 0, 0, 0]).unwrap_err();
        assert_eq!(err.kind(), crate::ErrorKind::Overflow);
        assert!(encode(&vec![0; 40]).is_err());
    }

    #[test]
    fn test_decode_rejects_foreign_code() {
        // 40 ternary digits do not fit in 39 balanced positions
        let b = KroneckerLimits::get().bound(2).unwrap();
        let r = 2 * b + 1;
        assert!(decode(r * (b + 1), 2).is_err() || r.checked_mul(b + 1).is_none());
        assert!(decode(i64::MAX, 39).is_err());
        assert!(decode(5, 0).is_err());
    }

    #[test]
    fn test_try_exponents_reports_foreign_code() {
        let s = SymbolSet::new(["x"]).unwrap();
        let x2 = KroneckerMonomial::from_exponents(&[2], &s).unwrap();
        assert_eq!(x2.try_exponents(&s).unwrap().as_slice(), &[2]);
        // decodes as one digit but leaves a carry
        let err = KroneckerMonomial(i64::MAX).try_exponents(&s).unwrap_err();
        assert_eq!(err.kind(), crate::ErrorKind::Overflow);
        // 2^20 fits the radix but not an i16 exponent
        let err = KroneckerMonomial(1 << 20).try_exponents(&s).unwrap_err();
        assert_eq!(err.kind(), crate::ErrorKind::Overflow);
        assert!(KroneckerMonomial::from_code(i64::MAX, 1).is_err());
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "is not valid for 1 symbols")]
    fn test_degree_of_foreign_code_panics_in_debug() {
        let s = SymbolSet::new(["x"]).unwrap();
        let _ = KroneckerMonomial(i64::MAX).degree(&s);
    }

    #[test]
    fn test_multiply_adds_exponents() {
        let s = SymbolSet::new(["x", "y", "z"]).unwrap();
        let a = KroneckerMonomial::from_exponents(&[1, 2, -1], &s).unwrap();
        let b = KroneckerMonomial::from_exponents(&[3, 0, 1], &s).unwrap();
        let p = a.multiply(&b, &s).unwrap();
        assert_eq!(p[0].key.exponents(&s).as_slice(), &[4, 2, 0]);
        assert_eq!(p[0].key.degree(&s), 6);
    }

    #[test]
    fn test_multiply_overflow() {
        let names: Vec<String> = (0..10).map(|i| format!("x{i:02}")).collect();
        let s = SymbolSet::new(names).unwrap();
        let b = KroneckerLimits::get().bound(10).unwrap();
        let big = i16::try_from(b).unwrap();
        let mut e = vec![0i16; 10];
        e[3] = big;
        let a = KroneckerMonomial::from_exponents(&e, &s).unwrap();
        assert!(a.multiply(&a, &s).is_err());
    }

    #[test]
    fn test_code_order_is_multiplicative() {
        let s = SymbolSet::new(["x", "y"]).unwrap();
        let x = KroneckerMonomial::from_exponents(&[1, 0], &s).unwrap();
        let y = KroneckerMonomial::from_exponents(&[0, 1], &s).unwrap();
        let xy = x.multiply(&y, &s).unwrap()[0].key;
        let y2 = y.multiply(&y, &s).unwrap()[0].key;
        assert!(x < y);
        assert!(xy < y2);
    }
}

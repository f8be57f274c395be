//! Trigonometric monomials: `cos(n·x)` or `sin(n·x)` for an integral
//! multiplier vector `n`.
//!
//! Keys are kept in canonical form, where the first nonzero multiplier is
//! positive. `cos(0)` is the unit key and `sin(0)` is the zero key, which
//! series never store.

use serde::{Deserialize, Serialize};
use sigma_integers::Integer;
use sigma_series::{
    EvalValue, Exponents, InsertionMap, Key, KeyIntegral, ProductTerm, ProductTerms, Result,
    SeriesError, SymbolSet,
};
use smallvec::{smallvec, SmallVec};

use crate::linear::{canonicalise, combine, drop_masked, format_form, is_canonical, spread};

/// `cos` (flavour `true`) or `sin` (flavour `false`) of `Σ n_i·x_i`.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug, Serialize, Deserialize)]
pub struct TrigMonomial {
    multipliers: Exponents,
    flavour: bool,
}

impl TrigMonomial {
    /// Creates a key from multipliers already in canonical form.
    ///
    /// # Errors
    ///
    /// `InvalidArgument` if the first nonzero multiplier is negative.
    pub fn new(multipliers: &[i16], flavour: bool) -> Result<Self> {
        if !is_canonical(multipliers) {
            return Err(SeriesError::invalid(
                "the first nonzero multiplier of a trigonometric monomial must be positive",
            ));
        }
        Ok(Self {
            multipliers: SmallVec::from_slice(multipliers),
            flavour,
        })
    }

    /// Canonicalises `multipliers` and builds the key. The returned flag is
    /// true when the multipliers were negated, in which case a sine key
    /// stands for the opposite of the original value.
    ///
    /// # Errors
    ///
    /// `Overflow` if a multiplier cannot be negated.
    pub fn canonical(mut multipliers: Exponents, flavour: bool) -> Result<(Self, bool)> {
        let flipped = canonicalise(&mut multipliers)?;
        Ok((Self { multipliers, flavour }, flipped))
    }

    /// The multiplier vector.
    #[must_use]
    pub fn multipliers(&self) -> &[i16] {
        &self.multipliers
    }

    /// True for cosine.
    #[must_use]
    pub fn flavour(&self) -> bool {
        self.flavour
    }

    /// The same argument with the other flavour.
    #[must_use]
    pub fn flipped(&self) -> Self {
        Self {
            multipliers: self.multipliers.clone(),
            flavour: !self.flavour,
        }
    }

    /// Sum of the multipliers at `positions`, or of all of them.
    #[must_use]
    pub fn t_degree(&self, positions: Option<&[usize]>) -> i64 {
        self.fold(positions, i64::from)
    }

    /// Sum of the absolute multipliers at `positions`, or of all of them.
    #[must_use]
    pub fn t_order(&self, positions: Option<&[usize]>) -> i64 {
        self.fold(positions, |n| i64::from(n.unsigned_abs()))
    }

    fn fold(&self, positions: Option<&[usize]>, f: impl Fn(i16) -> i64) -> i64 {
        match positions {
            Some(p) => p.iter().filter_map(|&i| self.multipliers.get(i)).map(|&n| f(n)).sum(),
            None => self.multipliers.iter().map(|&n| f(n)).sum(),
        }
    }

    fn multiplier(&self, pos: usize) -> i16 {
        self.multipliers.get(pos).copied().unwrap_or(0)
    }

    fn all_zero(&self) -> bool {
        self.multipliers.iter().all(|&n| n == 0)
    }
}

impl Key for TrigMonomial {
    fn unit(symbols: &SymbolSet) -> Result<Self> {
        Ok(Self {
            multipliers: smallvec![0; symbols.len()],
            flavour: true,
        })
    }

    fn is_unit(&self, _symbols: &SymbolSet) -> bool {
        self.flavour && self.all_zero()
    }

    fn is_zero(&self, _symbols: &SymbolSet) -> bool {
        !self.flavour && self.all_zero()
    }

    fn is_compatible(&self, symbols: &SymbolSet) -> bool {
        self.multipliers.len() == symbols.len() && is_canonical(&self.multipliers)
    }

    /// Werner's formulas. Both products are halved; the sign adjustments
    /// come from `sin·sin`, `cos·sin` and the canonicalisation of sines.
    fn multiply(&self, other: &Self, _symbols: &SymbolSet) -> Result<ProductTerms<Self>> {
        let plus = combine(&self.multipliers, &other.multipliers, false)?;
        let minus = combine(&self.multipliers, &other.multipliers, true)?;
        let flavour = self.flavour == other.flavour;
        let (negate_plus, negate_minus) = match (self.flavour, other.flavour) {
            (false, false) => (true, false),
            (true, false) => (false, true),
            _ => (false, false),
        };
        let mut out = ProductTerms::new();
        for (form, negate) in [(plus, negate_plus), (minus, negate_minus)] {
            let (key, flipped) = Self::canonical(form, flavour)?;
            out.push(ProductTerm {
                key,
                negate: negate ^ (flipped && !flavour),
                halve: true,
            });
        }
        Ok(out)
    }

    fn extend(&self, map: &InsertionMap, _from: &SymbolSet, _to: &SymbolSet) -> Result<Self> {
        Ok(Self {
            multipliers: spread(&self.multipliers, &map.positions, map.new_len),
            flavour: self.flavour,
        })
    }

    fn trim_identify(&self, mask: &mut [bool], _symbols: &SymbolSet) {
        for (m, &n) in mask.iter_mut().zip(self.multipliers.iter()) {
            if n != 0 {
                *m = false;
            }
        }
    }

    fn trim(&self, mask: &[bool], _from: &SymbolSet, _to: &SymbolSet) -> Result<Self> {
        Ok(Self {
            multipliers: drop_masked(&self.multipliers, mask),
            flavour: self.flavour,
        })
    }

    fn partial(&self, pos: usize, _symbols: &SymbolSet) -> Result<SmallVec<[(Integer, Self); 2]>> {
        let n = self.multiplier(pos);
        if n == 0 {
            return Ok(SmallVec::new());
        }
        let factor = if self.flavour { -i64::from(n) } else { i64::from(n) };
        Ok(smallvec![(Integer::new(factor), self.flipped())])
    }

    fn integrate(&self, pos: usize, _symbols: &SymbolSet) -> Result<KeyIntegral<Self>> {
        let n = self.multiplier(pos);
        if n == 0 {
            return Ok(KeyIntegral::Independent);
        }
        let divisor = if self.flavour { i64::from(n) } else { -i64::from(n) };
        Ok(KeyIntegral::Integrated {
            divisor: Integer::new(divisor),
            key: self.flipped(),
        })
    }

    fn split_power(&self, pos: usize, symbols: &SymbolSet) -> Result<Option<(i64, Self)>> {
        if self.multiplier(pos) == 0 {
            return Ok(None);
        }
        Err(SeriesError::invalid(format!(
            "the symbol '{}' appears in a trigonometric argument: use t_subs() to substitute it",
            symbols.get(pos).unwrap_or("?")
        )))
    }

    fn evaluate<V: EvalValue>(&self, values: &[V], _symbols: &SymbolSet) -> Result<V> {
        let mut arg = V::zero();
        for (v, &n) in values.iter().zip(self.multipliers.iter()) {
            if n != 0 {
                arg = arg.add(&V::from_integer(&Integer::from(n))?.mul(v));
            }
        }
        if self.flavour {
            arg.cos()
        } else {
            arg.sin()
        }
    }

    fn format(&self, symbols: &SymbolSet) -> String {
        if self.is_unit(symbols) {
            return String::new();
        }
        let name = if self.flavour { "cos" } else { "sin" };
        format!("{name}({})", format_form(&self.multipliers, symbols))
    }
}

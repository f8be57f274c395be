//! Poisson series: coefficients times `cos`/`sin` of integral linear
//! combinations of symbols.
//!
//! Poisson series are plain [`Series`] over [`TrigMonomial`] keys, so they
//! share the arithmetic, calculus and persistence of every other series.
//! The operations that only make sense for trigonometric keys live in the
//! [`Trigonometric`] and [`TimeIntegration`] extension traits.

use sigma_integers::Integer;
use sigma_series::{Coefficient, Exponents, Key, Result, Series, SeriesError, SymbolSet};
use smallvec::smallvec;
use tracing::debug;

use crate::divisor::Divisor;
use crate::divisor_series::DivisorSeries;
use crate::linear::{canonicalise, decompose, to_form};
use crate::trig::TrigMonomial;

/// A series of trigonometric keys.
pub type PoissonSeries<C> = Series<C, TrigMonomial>;

/// Operations on series with trigonometric keys.
pub trait Trigonometric: Sized {
    /// Coefficient type.
    type Cf;

    /// `cos` of a single-term series whose coefficient is an integral
    /// linear combination of symbols.
    ///
    /// # Errors
    ///
    /// `InvalidArgument` for any other argument.
    fn cos(&self) -> Result<Self>;

    /// `sin` of a single-term series whose coefficient is an integral
    /// linear combination of symbols.
    ///
    /// # Errors
    ///
    /// `InvalidArgument` for any other argument.
    fn sin(&self) -> Result<Self>;

    /// Largest sum of multipliers over the terms.
    fn t_degree(&self) -> i64;

    /// Smallest sum of multipliers over the terms.
    fn t_ldegree(&self) -> i64;

    /// Largest sum of absolute multipliers over the terms.
    fn t_order(&self) -> i64;

    /// Smallest sum of absolute multipliers over the terms.
    fn t_lorder(&self) -> i64;

    /// [`Trigonometric::t_degree`] restricted to `names`.
    fn partial_t_degree<S: AsRef<str>>(&self, names: &[S]) -> i64;

    /// [`Trigonometric::t_ldegree`] restricted to `names`.
    fn partial_t_ldegree<S: AsRef<str>>(&self, names: &[S]) -> i64;

    /// [`Trigonometric::t_order`] restricted to `names`.
    fn partial_t_order<S: AsRef<str>>(&self, names: &[S]) -> i64;

    /// [`Trigonometric::t_lorder`] restricted to `names`.
    fn partial_t_lorder<S: AsRef<str>>(&self, names: &[S]) -> i64;

    /// Substitutes `cos(name)` with `c` and `sin(name)` with `s`.
    ///
    /// # Errors
    ///
    /// Propagates the failures of series arithmetic.
    fn t_subs(&self, name: &str, c: &Self, s: &Self) -> Result<Self>;

    /// Coefficient of the key with the given multipliers and flavour, zero
    /// if absent.
    ///
    /// # Errors
    ///
    /// `InvalidArgument` if the multipliers are not canonical or do not
    /// match the symbol set.
    fn find_cf_trig(&self, multipliers: &[i16], flavour: bool) -> Result<Self::Cf>;
}

fn trig_of<C: Coefficient>(arg: &PoissonSeries<C>, flavour: bool) -> Result<PoissonSeries<C>> {
    if arg.is_zero() {
        return Ok(if flavour {
            Series::from_cf(C::one())
        } else {
            Series::new(arg.symbols().clone())
        });
    }
    let invalid = || {
        SeriesError::invalid(
            "the argument of a trigonometric function must be an integral linear combination of symbols",
        )
    };
    if !arg.is_single_cf() {
        return Err(invalid());
    }
    let (symbols, form) = decompose(&arg.to_cf()?, arg.symbols()).map_err(|_| invalid())?;
    let (key, flipped) = TrigMonomial::canonical(to_form(&form)?, flavour)?;
    let cf = if flipped && !flavour { C::one().neg() } else { C::one() };
    Series::from_terms(symbols, [(key, cf)])
}

/// `cos(n·x)` and `sin(n·x)` as polynomials in `c = cos(x)` and
/// `s = sin(x)`, from the binomial expansion of `(c + i·s)^n`.
fn multiple_angle<C: Coefficient>(
    n: u32,
    c: &PoissonSeries<C>,
    s: &PoissonSeries<C>,
) -> Result<(PoissonSeries<C>, PoissonSeries<C>)> {
    let mut cos_n = PoissonSeries::default();
    let mut sin_n = PoissonSeries::default();
    for k in 0..=n {
        let term = c
            .pow(i64::from(n - k))?
            .mul(&s.pow(i64::from(k))?)?
            .mul_integer(&Integer::binomial(n, k))?;
        match k % 4 {
            0 => cos_n.add_assign(&term)?,
            1 => sin_n.add_assign(&term)?,
            2 => cos_n.sub_assign(&term)?,
            _ => sin_n.sub_assign(&term)?,
        }
    }
    Ok((cos_n, sin_n))
}

fn fold_keys<C: Coefficient>(
    p: &PoissonSeries<C>,
    names: Option<&[String]>,
    order: bool,
    low: bool,
) -> i64 {
    let positions = names.map(|n| p.symbols().positions_of(n));
    let values = p.iter().map(|(k, _)| {
        if order {
            k.t_order(positions.as_deref())
        } else {
            k.t_degree(positions.as_deref())
        }
    });
    if low {
        values.min().unwrap_or(0)
    } else {
        values.max().unwrap_or(0)
    }
}

fn to_names<S: AsRef<str>>(names: &[S]) -> Vec<String> {
    names.iter().map(|s| s.as_ref().to_string()).collect()
}

impl<C: Coefficient> Trigonometric for PoissonSeries<C> {
    type Cf = C;

    fn cos(&self) -> Result<Self> {
        trig_of(self, true)
    }

    fn sin(&self) -> Result<Self> {
        trig_of(self, false)
    }

    fn t_degree(&self) -> i64 {
        fold_keys(self, None, false, false)
    }

    fn t_ldegree(&self) -> i64 {
        fold_keys(self, None, false, true)
    }

    fn t_order(&self) -> i64 {
        fold_keys(self, None, true, false)
    }

    fn t_lorder(&self) -> i64 {
        fold_keys(self, None, true, true)
    }

    fn partial_t_degree<S: AsRef<str>>(&self, names: &[S]) -> i64 {
        fold_keys(self, Some(&to_names(names)), false, false)
    }

    fn partial_t_ldegree<S: AsRef<str>>(&self, names: &[S]) -> i64 {
        fold_keys(self, Some(&to_names(names)), false, true)
    }

    fn partial_t_order<S: AsRef<str>>(&self, names: &[S]) -> i64 {
        fold_keys(self, Some(&to_names(names)), true, false)
    }

    fn partial_t_lorder<S: AsRef<str>>(&self, names: &[S]) -> i64 {
        fold_keys(self, Some(&to_names(names)), true, true)
    }

    fn t_subs(&self, name: &str, c: &Self, s: &Self) -> Result<Self> {
        let Some(pos) = self.symbols().index_of(name) else {
            return Ok(self.clone());
        };
        let symbols = self.symbols().clone();
        let mut out = Self::new(symbols.clone());
        for (key, cf) in self.sorted_terms() {
            let n = key.multipliers()[pos];
            if n == 0 {
                out.add_assign(&Self::from_terms(symbols.clone(), [(key.clone(), cf.clone())])?)?;
                continue;
            }
            let mut rest = Exponents::from_slice(key.multipliers());
            rest[pos] = 0;
            // cos(rest) and sin(rest) in canonical form
            let (cos_key, flipped) = TrigMonomial::canonical(rest, true)?;
            let sin_key = cos_key.flipped();
            let cos_rest = Self::from_terms(symbols.clone(), [(cos_key, cf.clone())])?;
            let sin_cf = if flipped { cf.neg() } else { cf.clone() };
            let sin_rest = Self::from_terms(symbols.clone(), [(sin_key, sin_cf)])?;

            let (cos_n, mut sin_n) = multiple_angle(u32::from(n.unsigned_abs()), c, s)?;
            if n < 0 {
                sin_n = sin_n.neg();
            }
            let term = if key.flavour() {
                cos_n.mul(&cos_rest)?.sub(&sin_n.mul(&sin_rest)?)?
            } else {
                sin_n.mul(&cos_rest)?.add(&cos_n.mul(&sin_rest)?)?
            };
            out.add_assign(&term)?;
        }
        Ok(out)
    }

    fn find_cf_trig(&self, multipliers: &[i16], flavour: bool) -> Result<C> {
        let key = TrigMonomial::new(multipliers, flavour)?;
        if !key.is_compatible(self.symbols()) {
            return Err(SeriesError::invalid(format!(
                "multiplier vector of size {} does not match {} symbols",
                multipliers.len(),
                self.symbols().len()
            )));
        }
        Ok(self.get(&key).cloned().unwrap_or_else(C::zero))
    }
}

/// Integration with respect to time of Poisson series whose coefficients
/// are divisor series.
///
/// Each symbol `x` is taken to be a linear function of time with frequency
/// `\nu_{x}`, so `cos(n·x)` integrates to `sin(n·x) / (n·ν)`.
pub trait TimeIntegration: Sized {
    /// Time integration with the frequency symbols `\nu_{x}`.
    ///
    /// # Errors
    ///
    /// `InvalidArgument` for a term whose multipliers are all zero.
    fn t_integrate(&self) -> Result<Self>;

    /// Time integration with user-supplied frequency names, one per symbol
    /// of the series in order.
    ///
    /// # Errors
    ///
    /// `InvalidArgument` if the names are not sorted, or their number
    /// (after removing duplicates) differs from the number of symbols.
    fn t_integrate_with<S: AsRef<str>>(&self, names: &[S]) -> Result<Self>;
}

impl<C: Coefficient> TimeIntegration for PoissonSeries<DivisorSeries<C>> {
    fn t_integrate(&self) -> Result<Self> {
        let names: Vec<String> = self
            .symbols()
            .names()
            .iter()
            .map(|n| format!("\\nu_{{{n}}}"))
            .collect();
        time_integral(self, &names)
    }

    fn t_integrate_with<S: AsRef<str>>(&self, names: &[S]) -> Result<Self> {
        let mut names = to_names(names);
        if names.windows(2).any(|w| w[0] > w[1]) {
            return Err(SeriesError::invalid(
                "the list of symbol names must be ordered lexicographically",
            ));
        }
        names.dedup();
        if names.len() != self.symbols().len() {
            return Err(SeriesError::invalid(
                "the number of symbols passed in input must be equal to the number of symbols of the Poisson series",
            ));
        }
        time_integral(self, &names)
    }
}

/// `names[i]` is the frequency of symbol `i` of `p`.
fn time_integral<C: Coefficient>(
    p: &PoissonSeries<DivisorSeries<C>>,
    names: &[String],
) -> Result<PoissonSeries<DivisorSeries<C>>> {
    let frequencies = SymbolSet::new(names.iter().map(String::as_str))?;
    let slots = names
        .iter()
        .map(|n| {
            frequencies
                .index_of(n)
                .ok_or_else(|| SeriesError::invalid(format!("unknown frequency symbol '{n}'")))
        })
        .collect::<Result<Vec<_>>>()?;
    debug!(terms = p.len(), symbols = p.symbols().len(), "time integration");
    let mut out = Series::new(p.symbols().clone());
    for (key, cf) in p.sorted_terms() {
        let cd = key
            .multipliers()
            .iter()
            .fold(Integer::new(0), |g, &n| g.gcd(&Integer::from(n)));
        if cd.signum() == 0 {
            return Err(SeriesError::invalid(
                "an invalid trigonometric term was encountered while attempting a time integration",
            ));
        }
        let mut form: Exponents = smallvec![0; frequencies.len()];
        for (&n, &slot) in key.multipliers().iter().zip(slots.iter()) {
            form[slot] = Integer::from(n)
                .div_exact(&cd)
                .and_then(|q| q.to_i16())
                .ok_or_else(|| SeriesError::arithmetic("inexact multiplier reduction"))?;
        }
        // the frequency order may differ from the symbol order
        let flipped = canonicalise(&mut form)?;
        let divisor = DivisorSeries::from_terms(frequencies.clone(), [(Divisor::new([(form, 1)])?, C::one())])?;
        let mut integrated = cf.mul(&divisor)?.div_integer(&cd)?;
        if flipped ^ !key.flavour() {
            integrated = integrated.neg();
        }
        out.insert(key.flipped(), integrated)?;
    }
    Ok(out)
}

//! Heuristic polynomial GCD (GCDHEU) over the integers.
//!
//! The last variable is replaced by an integer `xi` large enough for the
//! image gcd to encode the true gcd in balanced base-`xi` digits. The
//! candidate rebuilt from those digits is accepted only if it divides
//! both inputs, so a wrong guess is never returned.

use sigma_integers::Integer;
use sigma_rings::Z;
use sigma_series::{Exponents, PolyKey, Result, Series, SeriesError, SymbolSet};
use tracing::{debug, trace};

use crate::content::{content, primitive_part};

const MAX_ITERATIONS: usize = 6;
const MAX_WORK: u64 = 100_000;

pub(crate) fn gcdheu<K: PolyKey>(a: &Series<Z, K>, b: &Series<Z, K>) -> Result<Series<Z, K>> {
    heu(a, b)?.ok_or_else(|| SeriesError::arithmetic("the heuristic GCD algorithm failed"))
}

fn height<K: PolyKey>(p: &Series<Z, K>) -> Integer {
    p.iter().map(|(_, c)| c.0.abs()).max().unwrap_or_default()
}

fn max_exponent<K: PolyKey>(p: &Series<Z, K>, pos: usize) -> u64 {
    p.iter()
        .map(|(k, _)| k.exponent(pos, p.symbols()))
        .max()
        .map_or(0, |e| u64::try_from(e).unwrap_or(0))
}

/// Substitutes `xi` for the last symbol.
fn eval_last<K: PolyKey>(p: &Series<Z, K>, xi: &Integer, reduced: &SymbolSet) -> Result<Series<Z, K>> {
    let mut out = Series::new(reduced.clone());
    for (k, c) in p.iter() {
        let exps = k.exponents(p.symbols());
        let Some((&last, rest)) = exps.split_last() else {
            return Err(SeriesError::invalid("cannot evaluate a constant polynomial"));
        };
        let e = u32::try_from(last)
            .map_err(|_| SeriesError::invalid("negative exponents are not allowed in polynomial GCD computations"))?;
        let term = Series::from_terms(reduced.clone(), [(K::from_exponents(rest, reduced)?, Z(&c.0 * &xi.pow(e)))])?;
        out.add_assign(&term)?;
    }
    Ok(out)
}

/// Rebuilds a polynomial in the last symbol from its image at `xi`, using
/// balanced digits.
fn interpolate<K: PolyKey>(gamma: &Series<Z, K>, xi: &Integer, full: &SymbolSet) -> Result<Series<Z, K>> {
    let mut out = Series::new(full.clone());
    let mut gamma = gamma.clone();
    let mut i: i16 = 0;
    while !gamma.is_zero() {
        let digit = gamma.map_cf(|c| {
            c.0.symmetric_mod(xi)
                .map(Z)
                .ok_or_else(|| SeriesError::invalid("the evaluation point must be positive"))
        })?;
        for (k, c) in digit.iter() {
            let mut exps: Exponents = k.exponents(digit.symbols());
            exps.push(i);
            out.insert(K::from_exponents(&exps, full)?, c.clone())?;
        }
        gamma = gamma.sub(&digit)?.div_integer(xi)?;
        i = i
            .checked_add(1)
            .ok_or_else(|| SeriesError::overflow("exponent overflow in GCD interpolation"))?;
    }
    Ok(out)
}

fn heu<K: PolyKey>(a: &Series<Z, K>, b: &Series<Z, K>) -> Result<Option<Series<Z, K>>> {
    if a.is_zero() {
        return Ok(Some(b.clone()));
    }
    if b.is_zero() {
        return Ok(Some(a.clone()));
    }
    let symbols = a.symbols().clone();
    if symbols.is_empty() {
        let g = Z(a.to_cf()?.0.gcd(&b.to_cf()?.0));
        return Ok(Some(Series::from_cf(g)));
    }
    let ca = content(a)?;
    let cb = content(b)?;
    let cg = Z(ca.0.gcd(&cb.0));
    let a = a.div_cf(&ca)?;
    let b = b.div_cf(&cb)?;

    let last = symbols.len() - 1;
    let mut mask = vec![false; symbols.len()];
    mask[last] = true;
    let reduced = symbols.without_mask(&mask);
    let degree = max_exponent(&a, last).max(max_exponent(&b, last));

    let mut xi = Integer::new(2) * height(&a).min(height(&b)) + Integer::new(29);
    for iteration in 0..MAX_ITERATIONS {
        if (xi.bit_len() as u64).saturating_mul(degree) > MAX_WORK {
            debug!(iteration, bits = xi.bit_len(), degree, "heuristic gcd: evaluation point too large");
            return Ok(None);
        }
        let ea = eval_last(&a, &xi, &reduced)?;
        let eb = eval_last(&b, &xi, &reduced)?;
        if let Some(gamma) = heu(&ea, &eb)? {
            let candidate = interpolate(&gamma, &xi, &symbols)?;
            if !candidate.is_zero() {
                let g = primitive_part(&candidate)?;
                if a.div(&g).is_ok() && b.div(&g).is_ok() {
                    debug!(iteration, symbols = symbols.len(), "heuristic gcd succeeded");
                    return g.mul_cf(&cg).map(Some);
                }
            }
        }
        trace!(iteration, bits = xi.bit_len(), "heuristic gcd candidate rejected");
        xi = xi * Integer::new(73_794) / Integer::new(27_011);
    }
    debug!(symbols = symbols.len(), "heuristic gcd gave up");
    Ok(None)
}

//! Multivariate polynomial GCD.
//!
//! Two algorithms are available. The subresultant PRS works over any
//! coefficient ring with a gcd, treating multivariate input recursively as
//! univariate polynomials with polynomial coefficients. The heuristic
//! GCDHEU of Char, Geddes and Gonnet maps the problem to integers by
//! evaluation and is usually much faster, but only applies to integer
//! coefficients and may give up.

use sigma_series::{ErrorKind, PolyKey, Result, Series, SeriesError};
use tracing::debug;

use crate::content::GcdCoefficient;
use crate::split::{join, split};
use crate::univariate::{degree, from_dense, pseudo_divrem, to_dense, trim, Dense};

/// Choice of GCD algorithm.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum GcdAlgorithm {
    /// Heuristic first when the ring supports it, PRS otherwise or on
    /// failure.
    #[default]
    Automatic,
    /// Subresultant polynomial remainder sequence.
    SubresultantPrs,
    /// Heuristic GCD; integer coefficients only.
    Heuristic,
}

fn check_exponents<C: GcdCoefficient, K: PolyKey>(p: &Series<C, K>) -> Result<()> {
    if p.iter().any(|(k, _)| k.exponents(p.symbols()).iter().any(|&e| e < 0)) {
        return Err(SeriesError::invalid(
            "negative exponents are not allowed in polynomial GCD computations",
        ));
    }
    Ok(())
}

/// Computes a greatest common divisor of `a` and `b`, unique up to sign.
///
/// # Errors
///
/// `InvalidArgument` for negative exponents, `TypeMismatch` when the
/// heuristic is requested for a non-integer ring, `Arithmetic` when the
/// heuristic explicitly requested gives up.
pub fn gcd<C: GcdCoefficient, K: PolyKey>(
    a: &Series<C, K>,
    b: &Series<C, K>,
    algorithm: GcdAlgorithm,
) -> Result<Series<C, K>> {
    check_exponents(a)?;
    check_exponents(b)?;
    let (symbols, _, _) = a.symbols().merge(b.symbols());
    let a = a.extend_symbols(&symbols)?;
    let b = b.extend_symbols(&symbols)?;
    if a.is_zero() {
        return Ok(b);
    }
    if b.is_zero() {
        return Ok(a);
    }
    debug!(?algorithm, symbols = symbols.len(), lhs = a.len(), rhs = b.len(), "polynomial gcd");
    match algorithm {
        GcdAlgorithm::SubresultantPrs => gcd_prs(&a, &b),
        GcdAlgorithm::Heuristic => C::heuristic_gcd(&a, &b).unwrap_or_else(|| {
            Err(SeriesError::type_mismatch(
                "the heuristic GCD algorithm requires integer coefficients",
            ))
        }),
        GcdAlgorithm::Automatic => match C::heuristic_gcd(&a, &b) {
            Some(Err(e)) if e.kind() == ErrorKind::Arithmetic => {
                debug!(reason = %e, "heuristic gcd failed, falling back to PRS");
                gcd_prs(&a, &b)
            }
            Some(result) => result,
            None => gcd_prs(&a, &b),
        },
    }
}

/// PRS gcd of two nonzero polynomials over the same symbols.
fn gcd_prs<C: GcdCoefficient, K: PolyKey>(a: &Series<C, K>, b: &Series<C, K>) -> Result<Series<C, K>> {
    let symbols = a.symbols().clone();
    match symbols.len() {
        0 => Ok(Series::from_cf(a.to_cf()?.gcd(&b.to_cf()?)?)),
        1 => from_dense(prs(to_dense(a)?, to_dense(b)?)?, &symbols),
        _ => {
            let sa = split(a)?;
            let sb = split(b)?;
            let g = prs(to_dense(&sa)?, to_dense(&sb)?)?;
            join(&from_dense(g, sa.symbols())?)?.extend_symbols(&symbols)
        }
    }
}

fn dense_content<D: GcdCoefficient>(v: &Dense<D>) -> Result<D> {
    let mut acc = D::zero();
    for c in v {
        acc = acc.gcd(c)?;
    }
    Ok(acc)
}

fn divide_all<D: GcdCoefficient>(v: &Dense<D>, d: &D) -> Result<Dense<D>> {
    let mut out = v.iter().map(|c| c.div_exact(d)).collect::<Result<Dense<D>>>()?;
    trim(&mut out);
    Ok(out)
}

fn to_i64(n: usize) -> Result<i64> {
    i64::try_from(n).map_err(|_| SeriesError::overflow("degree too large"))
}

/// Subresultant PRS on dense univariate polynomials, both nonzero.
fn prs<D: GcdCoefficient>(a: Dense<D>, b: Dense<D>) -> Result<Dense<D>> {
    let ca = dense_content(&a)?;
    let cb = dense_content(&b)?;
    let c = ca.gcd(&cb)?;
    let mut a = divide_all(&a, &ca)?;
    let mut b = divide_all(&b, &cb)?;
    if degree(&a) < degree(&b) {
        std::mem::swap(&mut a, &mut b);
    }
    let mut g = D::one();
    let mut h = D::one();
    loop {
        let (Some(da), Some(db)) = (degree(&a), degree(&b)) else {
            return Err(SeriesError::zero_division("zero polynomial in the remainder sequence"));
        };
        let delta = to_i64(da - db)?;
        let (_, r) = pseudo_divrem(&a, &b)?;
        match degree(&r) {
            None => break,
            Some(0) => return Ok(vec![c]),
            Some(_) => {}
        }
        let divisor = g.mul(&h.pow(delta)?)?;
        a = b;
        b = divide_all(&r, &divisor)?;
        g = a.last().cloned().unwrap_or_else(D::one);
        h = match delta {
            0 => h,
            1 => g.clone(),
            _ => g.pow(delta)?.div_exact(&h.pow(delta - 1)?)?,
        };
    }
    let cb = dense_content(&b)?;
    let pb = divide_all(&b, &cb)?;
    pb.iter().map(|x| x.mul(&c)).collect()
}

//! Recursive representation of multivariate polynomials.

use sigma_series::{Coefficient, Exponents, PolyKey, Result, Series, SeriesError, SymbolSet};

/// Rewrites a polynomial in `n >= 2` symbols as a univariate polynomial in
/// its first symbol whose coefficients are polynomials in the others.
///
/// # Errors
///
/// `InvalidArgument` when the polynomial has fewer than two symbols.
pub fn split<C: Coefficient, K: PolyKey>(p: &Series<C, K>) -> Result<Series<Series<C, K>, K>> {
    let symbols = p.symbols();
    if symbols.len() < 2 {
        return Err(SeriesError::invalid(
            "a polynomial needs at least two symbols to be split",
        ));
    }
    let head = SymbolSet::new(&symbols.names()[..1])?;
    let tail = SymbolSet::new(&symbols.names()[1..])?;
    let mut out: Series<Series<C, K>, K> = Series::new(head.clone());
    for (k, c) in p.iter() {
        let exps = k.exponents(symbols);
        let inner = Series::from_terms(tail.clone(), [(K::from_exponents(&exps[1..], &tail)?, c.clone())])?;
        let outer = Series::from_terms(head.clone(), [(K::from_exponents(&exps[..1], &head)?, inner)])?;
        out.add_assign(&outer)?;
    }
    Ok(out)
}

/// Inverse of [`split`]: flattens a polynomial with polynomial
/// coefficients into a single polynomial over the union of the symbols.
///
/// # Errors
///
/// Fails when the exponents cannot be represented in the joined key.
pub fn join<C: Coefficient, K: PolyKey>(p: &Series<Series<C, K>, K>) -> Result<Series<C, K>> {
    let mut symbols = p.symbols().clone();
    for (_, c) in p.iter() {
        symbols = symbols.merge(c.symbols()).0;
    }
    let outer_pos = symbols.positions_of(p.symbols().names());
    let mut out = Series::new(symbols.clone());
    for (k, c) in p.iter() {
        let outer_exps = k.exponents(p.symbols());
        let inner_pos = symbols.positions_of(c.symbols().names());
        for (ik, ic) in c.iter() {
            let mut exps: Exponents = std::iter::repeat(0).take(symbols.len()).collect();
            for (&pos, &e) in outer_pos.iter().zip(outer_exps.iter()) {
                exps[pos] = e;
            }
            for (&pos, &e) in inner_pos.iter().zip(ik.exponents(c.symbols()).iter()) {
                exps[pos] = exps[pos]
                    .checked_add(e)
                    .ok_or_else(|| SeriesError::overflow("exponent overflow while joining"))?;
            }
            out.add_assign(&Series::from_terms(
                symbols.clone(),
                [(K::from_exponents(&exps, &symbols)?, ic.clone())],
            )?)?;
        }
    }
    Ok(out)
}

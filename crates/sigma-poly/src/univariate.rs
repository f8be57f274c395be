//! Dense univariate helpers and pseudo-division.

use sigma_series::{Coefficient, PolyKey, Result, Series, SeriesError, SymbolSet};

/// Dense coefficients, `v[i]` multiplying `x**i`. Trailing zeros are
/// trimmed, so the zero polynomial is empty.
pub(crate) type Dense<D> = Vec<D>;

pub(crate) fn trim<D: Coefficient>(v: &mut Dense<D>) {
    while v.last().is_some_and(Coefficient::is_zero) {
        v.pop();
    }
}

/// Degree of a trimmed dense polynomial; `None` for zero.
pub(crate) fn degree<D>(v: &Dense<D>) -> Option<usize> {
    v.len().checked_sub(1)
}

/// Converts a series in at most one symbol into dense form.
pub(crate) fn to_dense<D: Coefficient, K: PolyKey>(p: &Series<D, K>) -> Result<Dense<D>> {
    if p.symbols().len() > 1 {
        return Err(SeriesError::invalid(format!(
            "a univariate polynomial was expected, got the symbols {:?}",
            p.symbols().names()
        )));
    }
    let mut out: Dense<D> = Vec::new();
    for (k, c) in p.iter() {
        let e = k.exponents(p.symbols()).first().copied().unwrap_or(0);
        let e = usize::try_from(e)
            .map_err(|_| SeriesError::invalid("negative exponents are not allowed in univariate division"))?;
        if out.len() <= e {
            out.resize_with(e + 1, D::zero);
        }
        out[e] = c.clone();
    }
    trim(&mut out);
    Ok(out)
}

/// Converts dense coefficients back into a series over `symbols`.
pub(crate) fn from_dense<D: Coefficient, K: PolyKey>(v: Dense<D>, symbols: &SymbolSet) -> Result<Series<D, K>> {
    let mut out = Series::new(symbols.clone());
    for (i, c) in v.into_iter().enumerate() {
        if c.is_zero() {
            continue;
        }
        let key = if symbols.is_empty() {
            if i > 0 {
                return Err(SeriesError::invalid("a constant was expected"));
            }
            K::from_exponents(&[], symbols)?
        } else {
            let e = i16::try_from(i).map_err(|_| SeriesError::overflow("exponent out of range"))?;
            K::from_exponents(&[e], symbols)?
        };
        out.insert(key, c)?;
    }
    Ok(out)
}

/// Pseudo-division: returns `(q, r)` with `lc(b)**(deg a - deg b + 1) * a
/// == q * b + r` and `deg r < deg b`.
pub(crate) fn pseudo_divrem<D: Coefficient>(a: &Dense<D>, b: &Dense<D>) -> Result<(Dense<D>, Dense<D>)> {
    let Some(n) = degree(b) else {
        return Err(SeriesError::zero_division("pseudo-division by a zero polynomial"));
    };
    let Some(m) = degree(a).filter(|&m| m >= n) else {
        return Ok((Vec::new(), a.clone()));
    };
    let lb = &b[n];
    let mut u = a.clone();
    let mut q: Dense<D> = vec![D::zero(); m - n + 1];
    for k in (0..=m - n).rev() {
        let lead = u[n + k].clone();
        q[k] = lead.mul(&lb.pow(i64::try_from(k).map_err(|_| SeriesError::overflow("degree too large"))?)?)?;
        for j in (0..n + k).rev() {
            let mut t = lb.mul(&u[j])?;
            if j >= k {
                t.sub_assign(&lead.mul(&b[j - k])?)?;
            }
            u[j] = t;
        }
        u[n + k] = D::zero();
    }
    u.truncate(n);
    trim(&mut u);
    trim(&mut q);
    Ok((q, u))
}

/// Univariate pseudo-division with remainder.
///
/// Both polynomials must share at most one symbol. The result `(q, r)`
/// satisfies `lc(b)**(deg a - deg b + 1) * a == q*b + r` with
/// `deg r < deg b`. When `deg a < deg b` the quotient is zero and the
/// remainder is `a`.
///
/// # Errors
///
/// `ZeroDivision` for a zero `b`, `InvalidArgument` for multivariate input
/// or negative exponents.
pub fn udivrem<C: Coefficient, K: PolyKey>(
    a: &Series<C, K>,
    b: &Series<C, K>,
) -> Result<(Series<C, K>, Series<C, K>)> {
    let (symbols, _, _) = a.symbols().merge(b.symbols());
    let a = a.extend_symbols(&symbols)?;
    let b = b.extend_symbols(&symbols)?;
    let (q, r) = pseudo_divrem(&to_dense(&a)?, &to_dense(&b)?)?;
    Ok((from_dense(q, &symbols)?, from_dense(r, &symbols)?))
}

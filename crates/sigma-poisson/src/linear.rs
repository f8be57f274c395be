//! Integral linear forms shared by trigonometric arguments and divisors.

use sigma_integers::Integer;
use sigma_series::{Coefficient, Exponents, Result, SeriesError, SymbolSet};

/// Brings a linear form to canonical form, where the first nonzero
/// coefficient is positive. Returns true if the form was negated.
pub(crate) fn canonicalise(form: &mut Exponents) -> Result<bool> {
    let negative = form.iter().find(|&&n| n != 0).is_some_and(|&n| n < 0);
    if negative {
        for n in form.iter_mut() {
            *n = n
                .checked_neg()
                .ok_or_else(|| SeriesError::overflow("multiplier overflow in canonicalisation"))?;
        }
    }
    Ok(negative)
}

pub(crate) fn is_canonical(form: &[i16]) -> bool {
    form.iter().find(|&&n| n != 0).map_or(true, |&n| n > 0)
}

/// Adds or subtracts two forms element-wise.
pub(crate) fn combine(a: &[i16], b: &[i16], subtract: bool) -> Result<Exponents> {
    a.iter()
        .zip(b.iter())
        .map(|(&x, &y)| {
            let r = if subtract { x.checked_sub(y) } else { x.checked_add(y) };
            r.ok_or_else(|| SeriesError::overflow("multiplier overflow in trigonometric multiplication"))
        })
        .collect()
}

/// Inserts zeros so that `form` lines up with a larger symbol set.
pub(crate) fn spread(form: &[i16], positions: &[usize], new_len: usize) -> Exponents {
    let mut out: Exponents = std::iter::repeat(0).take(new_len).collect();
    for (&n, &p) in form.iter().zip(positions.iter()) {
        out[p] = n;
    }
    out
}

/// Drops the entries flagged in `mask`.
pub(crate) fn drop_masked(form: &[i16], mask: &[bool]) -> Exponents {
    form.iter()
        .zip(mask.iter())
        .filter(|(_, &m)| !m)
        .map(|(&n, _)| n)
        .collect()
}

/// Reads the coefficient of a single-term series argument as `Σ n_i·x_i`
/// and lays it out over the union of `symbols` and the names involved.
pub(crate) fn decompose<C: Coefficient>(cf: &C, symbols: &SymbolSet) -> Result<(SymbolSet, Vec<Integer>)> {
    let combination = cf.integral_combination()?;
    let names = SymbolSet::new(combination.iter().map(|(n, _)| n.as_str()))?;
    let (merged, _, _) = symbols.merge(&names);
    let mut form = vec![Integer::new(0); merged.len()];
    for (name, n) in combination {
        if let Some(p) = merged.index_of(&name) {
            form[p] = n;
        }
    }
    Ok((merged, form))
}

/// Converts integer coefficients to the key representation.
pub(crate) fn to_form(values: &[Integer]) -> Result<Exponents> {
    values
        .iter()
        .map(|n| {
            n.to_i16()
                .ok_or_else(|| SeriesError::overflow("linear form coefficient out of range"))
        })
        .collect()
}

/// `n_1*x_1 + n_2*x_2 + ...`, e.g. `x-2*y`.
pub(crate) fn format_form(form: &[i16], symbols: &SymbolSet) -> String {
    let mut out = String::new();
    for (i, &n) in form.iter().enumerate().filter(|(_, &n)| n != 0) {
        let name = symbols.get(i).unwrap_or("?");
        if n < 0 {
            out.push('-');
        } else if !out.is_empty() {
            out.push('+');
        }
        match n.unsigned_abs() {
            1 => out.push_str(name),
            a => out.push_str(&format!("{a}*{name}")),
        }
    }
    out
}

//! Series multiplication.
//!
//! Every term of `a` is multiplied with every term of `b`. Under a degree
//! bound both operands are sorted by low degree, so the inner loop can stop
//! at the first pair whose degree exceeds the bound. Large products are
//! split into contiguous chunks of `a` and run on the shared rayon pool;
//! the chunk results are merged in order, which makes the result
//! independent of the thread count.

use rayon::prelude::*;
use sigma_integers::Integer;
use tracing::{debug, trace};

use crate::coefficient::Coefficient;
use crate::error::Result;
use crate::key::Key;
use crate::series::Series;
use crate::settings::{self, Settings};
use crate::symbol_set::SymbolSet;
use crate::terms::Terms;
use crate::truncation::{auto_truncation, Truncation};

struct TermRef<'a, K, C> {
    key: &'a K,
    cf: &'a C,
    degree: i64,
}

struct Context<'a> {
    symbols: &'a SymbolSet,
    bound: Option<i64>,
    names: Option<&'a [String]>,
    positions: Option<Vec<usize>>,
}

impl Context<'_> {
    fn key_degree<K: Key>(&self, key: &K) -> i64 {
        match &self.positions {
            Some(p) => key.partial_degree(p, self.symbols),
            None => key.degree(self.symbols),
        }
    }
}

fn collect_terms<'a, C: Coefficient, K: Key>(s: &'a Series<C, K>, ctx: &Context<'_>) -> Vec<TermRef<'a, K, C>> {
    let mut v: Vec<_> = s
        .iter()
        .map(|(key, cf)| TermRef {
            key,
            cf,
            degree: ctx.key_degree(key) + cf.ldegree(ctx.names),
        })
        .collect();
    if ctx.bound.is_some() {
        v.sort_by_key(|t| t.degree);
    }
    v
}

fn multiply_chunk<C: Coefficient, K: Key>(
    chunk: &[TermRef<'_, K, C>],
    tb: &[TermRef<'_, K, C>],
    ctx: &Context<'_>,
) -> Result<Terms<K, C>> {
    let two = Integer::new(2);
    let mut out = Terms::new();
    for a in chunk {
        if let (Some(bound), Some(first)) = (ctx.bound, tb.first()) {
            if a.degree + first.degree > bound {
                break;
            }
        }
        for b in tb {
            if let Some(bound) = ctx.bound {
                if a.degree + b.degree > bound {
                    break;
                }
            }
            let products = a.key.multiply(b.key, ctx.symbols)?;
            let cf = a.cf.mul(b.cf)?;
            if cf.is_zero() {
                continue;
            }
            for p in products {
                let mut c = if p.halve { cf.div_integer(&two)? } else { cf.clone() };
                if p.negate {
                    c = c.neg();
                }
                if let Some(bound) = ctx.bound {
                    c = c.truncate_degree(bound - ctx.key_degree(&p.key), ctx.names)?;
                }
                out.insert(p.key, c, ctx.symbols)?;
            }
        }
    }
    Ok(out)
}

/// Multiplies two series with the auto-truncation of their type and the
/// current global settings.
///
/// # Errors
///
/// Fails on exponent overflow or when a coefficient product fails.
pub fn multiply<C: Coefficient, K: Key>(a: &Series<C, K>, b: &Series<C, K>) -> Result<Series<C, K>> {
    let truncation = auto_truncation::<Series<C, K>>();
    multiply_with(a, b, &truncation, &settings::snapshot())
}

/// Multiplies two series with an explicit truncation and settings.
///
/// # Errors
///
/// Fails on exponent overflow or when a coefficient product fails.
pub fn multiply_with<C: Coefficient, K: Key>(
    a: &Series<C, K>,
    b: &Series<C, K>,
    truncation: &Truncation,
    settings: &Settings,
) -> Result<Series<C, K>> {
    let (a, b) = Series::unify(a, b)?;
    let symbols = a.symbols().clone();
    if a.is_zero() || b.is_zero() {
        return Ok(Series::new(symbols));
    }
    let names = truncation.names();
    let ctx = Context {
        symbols: &symbols,
        bound: truncation.bound(),
        names,
        positions: names.map(|n| symbols.positions_of(n)),
    };
    let ta = collect_terms(&a, &ctx);
    let tb = collect_terms(&b, &ctx);

    let work = (ta.len() as u64).saturating_mul(tb.len() as u64);
    let threads = settings.threads_for(work).min(ta.len());
    debug!(
        lhs = ta.len(),
        rhs = tb.len(),
        work,
        threads,
        truncated = ctx.bound.is_some(),
        "series multiplication"
    );

    let terms = if threads <= 1 {
        multiply_chunk(&ta, &tb, &ctx)?
    } else {
        let pool = settings::thread_pool(settings.n_threads, settings.thread_binding)?;
        let chunk_size = ta.len().div_ceil(threads);
        let partials: Vec<Result<Terms<K, C>>> = pool.install(|| {
            ta.par_chunks(chunk_size)
                .enumerate()
                .map(|(i, chunk)| {
                    trace!(chunk = i, len = chunk.len(), "multiplying chunk");
                    multiply_chunk(chunk, &tb, &ctx)
                })
                .collect()
        });
        let mut merged = Terms::new();
        for part in partials {
            merged.merge(part?, &symbols)?;
        }
        merged
    };
    Ok(Series { symbols, terms })
}

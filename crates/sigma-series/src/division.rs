//! Exact series division.

use crate::coefficient::Coefficient;
use crate::error::{Result, SeriesError};
use crate::key::Key;
use crate::multiplier::multiply_with;
use crate::series::Series;
use crate::settings;
use crate::truncation::Truncation;

impl<C: Coefficient, K: Key> Series<C, K> {
    /// Exact quotient `self / other`.
    ///
    /// Constant divisors divide every coefficient. Otherwise the leading
    /// term (the greatest key) of the divisor is repeatedly divided into
    /// the leading term of the remainder; the division fails as soon as a
    /// step is not exact.
    ///
    /// # Errors
    ///
    /// `ZeroDivision` for a zero divisor, `Arithmetic` when the quotient is
    /// not exact, `InvalidArgument` for monomials with negative exponents.
    pub fn div(&self, other: &Self) -> Result<Self> {
        if other.is_zero() {
            return Err(SeriesError::zero_division("division of a series by zero"));
        }
        if other.is_single_cf() {
            return self.div_cf(&other.to_cf()?);
        }
        let (a, b) = Self::unify(self, other)?;
        let symbols = a.symbols.clone();
        let Some((lead_key, lead_cf)) = b.iter().max_by(|x, y| x.0.cmp(y.0)) else {
            return Err(SeriesError::zero_division("division of a series by zero"));
        };
        let unit = K::unit(&symbols)?;
        for (k, _) in a.iter().chain(b.iter()) {
            // rejects keys the division order is not defined for
            k.divide(&unit, &symbols)?;
        }
        let settings = settings::snapshot();
        let mut rem = a.into_owned();
        let mut quot = Self::new(symbols.clone());
        while let Some((rk, rc)) = rem
            .iter()
            .max_by(|x, y| x.0.cmp(y.0))
            .map(|(k, c)| (k.clone(), c.clone()))
        {
            let qk = rk
                .divide(lead_key, &symbols)?
                .ok_or_else(|| SeriesError::arithmetic("the division is not exact"))?;
            let qc = rc.div_exact(lead_cf)?;
            let step = Self::from_terms(symbols.clone(), [(qk.clone(), qc.clone())])?;
            let prod = multiply_with(&step, &b, &Truncation::Off, &settings)?;
            rem.sub_assign(&prod)?;
            // inexact coefficient rings may leave a residue on the leading key
            rem.terms.retain(|k, _| k != &rk);
            quot.terms.insert(qk, qc, &symbols)?;
        }
        Ok(quot)
    }
}

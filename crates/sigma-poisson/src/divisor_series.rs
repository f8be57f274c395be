//! Series whose keys are [`Divisor`]s.

use sigma_series::{Coefficient, Result, Series};

use crate::divisor::Divisor;

/// A series of divisor keys.
pub type DivisorSeries<C> = Series<C, Divisor>;

/// Inverts a divisor series holding the single linear form `Σ n_i·x_i`
/// in its coefficient.
///
/// # Errors
///
/// `InvalidArgument` unless `s` is one unit-key term whose coefficient is an
/// integral linear combination of symbols with no constant part;
/// `ZeroDivision` for zero.
pub fn invert<C: Coefficient>(s: &DivisorSeries<C>) -> Result<DivisorSeries<C>> {
    s.pow(-1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use sigma_integers::Integer;
    use sigma_rings::Q;
    use sigma_series::{ErrorKind, Exponents, Monomial, SymbolSet};
    use std::collections::HashMap;

    type P = Series<Q, Monomial>;
    type DS = DivisorSeries<P>;

    fn sym(n: &str) -> DS {
        DS::from_symbol(n).unwrap()
    }

    fn int(n: i64) -> DS {
        DS::from_integer(n)
    }

    fn divisor(form: &[i16], k: u16) -> Divisor {
        Divisor::new([(Exponents::from_slice(form), k)]).unwrap()
    }

    fn xy() -> SymbolSet {
        SymbolSet::new(["x", "y"]).unwrap()
    }

    #[test]
    fn test_invert_linear_form() {
        // 1/(x + 2y)
        let l = sym("x").add(&sym("y").mul_integer(&Integer::new(2)).unwrap()).unwrap();
        let inv = invert(&l).unwrap();
        let expected = DS::from_terms(xy(), [(divisor(&[1, 2], 1), P::from_integer(1))]).unwrap();
        assert!(inv.strict_eq(&expected));
    }

    #[test]
    fn test_invert_extracts_signed_gcd() {
        // 1/(-2x + 4y) = -1/2 * 1/(x - 2y)
        let l = sym("y")
            .mul_integer(&Integer::new(4))
            .unwrap()
            .sub(&sym("x").mul_integer(&Integer::new(2)).unwrap())
            .unwrap();
        let inv = invert(&l).unwrap();
        let cf = P::from_cf(Q::new(-1, 2));
        let expected = DS::from_terms(xy(), [(divisor(&[1, -2], 1), cf)]).unwrap();
        assert_eq!(inv, expected);
    }

    #[test]
    fn test_invert_rejects_other_arguments() {
        let msg = "invalid argument for series exponentiation: negative integral value";
        let with_constant = sym("x").add(&int(1)).unwrap();
        let err = invert(&with_constant).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Value);
        assert!(err.message().contains(msg));
        let quadratic = sym("x").mul(&sym("x")).unwrap();
        assert_eq!(invert(&quadratic).unwrap_err().kind(), ErrorKind::Value);
        assert_eq!(invert(&int(3)).unwrap_err().kind(), ErrorKind::Value);
        assert_eq!(invert(&DS::default()).unwrap_err().kind(), ErrorKind::ZeroDivision);
    }

    #[test]
    fn test_negative_powers_raise_exponents() {
        let l = sym("x").sub(&sym("y")).unwrap();
        let p = l.pow(-3).unwrap();
        let expected = DS::from_terms(xy(), [(divisor(&[1, -1], 3), P::from_integer(1))]).unwrap();
        assert_eq!(p, expected);
        let twice = invert(&l).unwrap().mul(&invert(&l).unwrap()).unwrap();
        assert_eq!(twice, l.pow(-2).unwrap());
    }

    #[test]
    fn test_partial_and_integrate() {
        // d/dx 1/(x+y) = -1/(x+y)^2
        let inv = invert(&sym("x").add(&sym("y")).unwrap()).unwrap();
        let d = inv.partial("x").unwrap();
        let expected = DS::from_terms(xy(), [(divisor(&[1, 1], 2), P::from_integer(-1))]).unwrap();
        assert_eq!(d, expected);

        let err = inv.integrate("x").unwrap_err();
        assert!(err.message().contains("an integration variable was detected in a divisor"));
        // independent variables integrate the coefficient
        let i = inv.integrate("z").unwrap();
        assert_eq!(i, inv.mul(&sym("z")).unwrap());
        assert_eq!(inv.degree(), 0);
    }

    #[test]
    fn test_evaluate_and_display() {
        let inv = invert(&sym("x").add(&sym("y")).unwrap()).unwrap().pow(2).unwrap();
        let mut values = HashMap::new();
        values.insert("x".to_string(), 1.5f64);
        values.insert("y".to_string(), 0.5f64);
        assert!((inv.evaluate(&values).unwrap() - 0.25).abs() < 1e-15);
        assert_eq!(inv.to_string(), "1/[(x+y)**2]");
    }
}

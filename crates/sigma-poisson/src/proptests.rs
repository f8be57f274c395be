//! Property-based tests for Poisson and divisor series.

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use proptest::prelude::*;

    use crate::{invert, DivisorSeries, PoissonSeries, TimeIntegration, TrigMonomial, Trigonometric};
    use sigma_rings::Q;
    use sigma_series::{s11n, Compression, Monomial, SaveFormat, Series, SymbolSet};

    type P = Series<Q, Monomial>;
    type PS = PoissonSeries<P>;

    fn xy() -> SymbolSet {
        SymbolSet::new(["x", "y"]).unwrap()
    }

    fn small_q() -> impl Strategy<Value = Q> {
        (-9i64..10, 1i64..4).prop_map(|(n, d)| Q::new(n, d))
    }

    fn small_key() -> impl Strategy<Value = TrigMonomial> {
        (proptest::collection::vec(-3i16..4, 2), any::<bool>())
            .prop_map(|(m, f)| TrigMonomial::canonical(m.into_iter().collect(), f).unwrap().0)
    }

    // Strategy for Poisson series in x, y with numeric coefficients
    fn small_poisson() -> impl Strategy<Value = PS> {
        proptest::collection::vec((small_key(), small_q()), 0..5).prop_map(|t| {
            PS::from_terms(xy(), t.into_iter().map(|(k, c)| (k, P::from_cf(c)))).unwrap()
        })
    }

    fn linear_arg() -> impl Strategy<Value = PS> {
        (-4i64..5, -4i64..5)
            .prop_filter("argument must be non-zero", |(a, b)| *a != 0 || *b != 0)
            .prop_map(|(a, b)| {
                let x = PS::from_symbol("x").unwrap().mul_integer(&a.into()).unwrap();
                let y = PS::from_symbol("y").unwrap().mul_integer(&b.into()).unwrap();
                x.add(&y).unwrap()
            })
    }

    fn values(x: f64, y: f64) -> HashMap<String, f64> {
        HashMap::from([("x".to_string(), x), ("y".to_string(), y)])
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        #[test]
        fn pythagorean_identity(arg in linear_arg()) {
            let c = arg.cos().unwrap();
            let s = arg.sin().unwrap();
            let sum = c.mul(&c).unwrap().add(&s.mul(&s).unwrap()).unwrap();
            prop_assert_eq!(sum, PS::from_integer(1));
        }

        #[test]
        fn poisson_mul_commutative(a in small_poisson(), b in small_poisson()) {
            prop_assert_eq!(a.mul(&b).unwrap(), b.mul(&a).unwrap());
        }

        #[test]
        fn product_evaluates_to_product_of_values(
            a in small_poisson(),
            b in small_poisson(),
            x in -2.0f64..2.0,
            y in -2.0f64..2.0,
        ) {
            let v = values(x, y);
            let lhs = a.mul(&b).unwrap().evaluate(&v).unwrap();
            let rhs = a.evaluate(&v).unwrap() * b.evaluate(&v).unwrap();
            prop_assert!((lhs - rhs).abs() < 1e-9);
        }

        #[test]
        fn t_subs_with_own_functions_is_identity(a in small_poisson()) {
            let x = PS::from_symbol("x").unwrap();
            let r = a.t_subs("x", &x.cos().unwrap(), &x.sin().unwrap()).unwrap();
            prop_assert_eq!(r, a);
        }

        #[test]
        fn integrate_then_differentiate(a in small_poisson()) {
            // terms independent of x would pick up a factor x instead
            let dependent = a.partial("x").unwrap();
            let back = dependent.integrate("x").unwrap().partial("x").unwrap();
            prop_assert_eq!(back, dependent);
        }

        #[test]
        fn archive_roundtrip(a in small_poisson()) {
            let mut buf = Vec::new();
            s11n::save(&a, &mut buf, SaveFormat::BoostBinary, Compression::Bzip2).unwrap();
            let back: PS = s11n::load(buf.as_slice(), SaveFormat::BoostBinary, Compression::Bzip2).unwrap();
            prop_assert!(back.strict_eq(&a));
        }

        #[test]
        fn t_integrate_flips_every_term(a in small_poisson()) {
            type DS = DivisorSeries<Q>;
            type TS = PoissonSeries<DS>;
            let lifted = TS::from_terms(
                a.symbols().clone(),
                a.iter().map(|(k, c)| (k.clone(), DS::from_cf(c.to_cf().unwrap()))),
            ).unwrap();
            let unit = TrigMonomial::canonical([0i16, 0].into_iter().collect(), true).unwrap().0;
            let oscillating = lifted
                .sub(&TS::from_terms(xy(), lifted.get(&unit).map(|c| (unit.clone(), c.clone()))).unwrap())
                .unwrap();
            let i = oscillating.t_integrate().unwrap();
            prop_assert_eq!(i.len(), oscillating.len());
            prop_assert_eq!(i.t_order(), oscillating.t_order());
        }

        #[test]
        fn divisor_inverse_evaluates_to_reciprocal(a in 1i64..5, b in -4i64..5) {
            type DP = DivisorSeries<P>;
            let l = DP::from_symbol("x").unwrap().mul_integer(&a.into()).unwrap()
                .add(&DP::from_symbol("y").unwrap().mul_integer(&b.into()).unwrap()).unwrap();
            let inv = invert(&l).unwrap();
            let v = values(1.25, 0.5);
            let product = inv.evaluate(&v).unwrap() * l.evaluate(&v).unwrap();
            prop_assert!((product - 1.0).abs() < 1e-12);
            prop_assert_eq!(inv.mul(&inv).unwrap(), l.pow(-2).unwrap());
        }
    }
}

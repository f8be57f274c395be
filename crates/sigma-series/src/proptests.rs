//! Property-based tests for series arithmetic.

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use crate::monomial::Monomial;
    use crate::multiplier::multiply_with;
    use crate::s11n::{load, save, Compression, SaveFormat};
    use crate::settings::Settings;
    use crate::symbol_set::SymbolSet;
    use crate::truncation::Truncation;
    use crate::Series;
    use sigma_rings::{Q, Z};

    type P = Series<Z, Monomial>;
    type PQ = Series<Q, Monomial>;

    fn xyz() -> SymbolSet {
        SymbolSet::new(["x", "y", "z"]).unwrap()
    }

    fn small_coeff() -> impl Strategy<Value = Z> {
        (-20i64..20i64).prop_map(Z::new)
    }

    fn small_term() -> impl Strategy<Value = (Monomial, Z)> {
        (proptest::collection::vec(0i16..4, 3), small_coeff()).prop_map(|(e, c)| (Monomial::new(&e), c))
    }

    // Strategy for polynomials in x, y, z with at most six terms
    fn small_poly() -> impl Strategy<Value = P> {
        proptest::collection::vec(small_term(), 0..6).prop_map(|t| P::from_terms(xyz(), t).unwrap())
    }

    fn nonzero_poly() -> impl Strategy<Value = P> {
        small_poly().prop_filter("polynomial must be non-zero", |p| !p.is_zero())
    }

    fn small_qpoly() -> impl Strategy<Value = PQ> {
        proptest::collection::vec((proptest::collection::vec(0i16..4, 3), -20i64..20, 1i64..6), 0..6).prop_map(|t| {
            PQ::from_terms(xyz(), t.into_iter().map(|(e, n, d)| (Monomial::new(&e), Q::new(n, d)))).unwrap()
        })
    }

    proptest! {
        #[test]
        fn series_add_commutative(a in small_poly(), b in small_poly()) {
            prop_assert_eq!(a.add(&b).unwrap(), b.add(&a).unwrap());
        }

        #[test]
        fn series_add_associative(a in small_poly(), b in small_poly(), c in small_poly()) {
            let left = a.add(&b).unwrap().add(&c).unwrap();
            let right = a.add(&b.add(&c).unwrap()).unwrap();
            prop_assert_eq!(left, right);
        }

        #[test]
        fn series_mul_commutative(a in small_poly(), b in small_poly()) {
            prop_assert_eq!(a.mul(&b).unwrap(), b.mul(&a).unwrap());
        }

        #[test]
        fn series_distributive(a in small_qpoly(), b in small_qpoly(), c in small_qpoly()) {
            let left = a.mul(&b.add(&c).unwrap()).unwrap();
            let right = a.mul(&b).unwrap().add(&a.mul(&c).unwrap()).unwrap();
            prop_assert_eq!(left, right);
        }

        #[test]
        fn series_additive_inverse(a in small_poly()) {
            prop_assert!(a.add(&a.neg()).unwrap().is_zero());
        }

        #[test]
        fn truncation_idempotent(a in small_qpoly(), bound in 0i64..8) {
            let once = a.truncate_degree(bound).unwrap();
            prop_assert_eq!(once.truncate_degree(bound).unwrap(), once.clone());
            prop_assert!(once.is_zero() || once.degree() <= bound);
        }

        #[test]
        fn truncated_product_matches_truncated_full(a in small_poly(), b in small_poly(), bound in 0i64..10) {
            let serial = Settings { n_threads: 1, ..Settings::default() };
            let full = multiply_with(&a, &b, &Truncation::Off, &serial).unwrap();
            let cut = multiply_with(&a, &b, &Truncation::Total(bound), &serial).unwrap();
            prop_assert_eq!(cut, full.truncate_degree(bound).unwrap());
        }

        #[test]
        fn thread_count_invariance(a in small_poly(), b in small_poly()) {
            let serial = Settings { n_threads: 1, ..Settings::default() };
            let parallel = Settings { n_threads: 3, min_work_per_thread: 1, ..Settings::default() };
            let one = multiply_with(&a, &b, &Truncation::Off, &serial).unwrap();
            let many = multiply_with(&a, &b, &Truncation::Off, &parallel).unwrap();
            prop_assert!(one.strict_eq(&many));
        }

        #[test]
        fn division_inverts_multiplication(a in small_poly(), b in nonzero_poly()) {
            let ab = a.mul(&b).unwrap();
            prop_assert_eq!(ab.div(&b).unwrap(), a);
        }

        #[test]
        fn integrate_then_differentiate(a in small_qpoly()) {
            let i = a.integrate("y").unwrap();
            prop_assert_eq!(i.raw_partial("y").unwrap(), a);
        }

        #[test]
        fn archive_roundtrip(a in small_poly(), portable in any::<bool>()) {
            let format = if portable { SaveFormat::MsgpackPortable } else { SaveFormat::MsgpackBinary };
            let mut buf = Vec::new();
            save(&a, &mut buf, format, Compression::Zlib).unwrap();
            let back: P = load(buf.as_slice(), format, Compression::Zlib).unwrap();
            prop_assert!(back.strict_eq(&a));
        }
    }
}

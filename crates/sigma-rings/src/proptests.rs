//! Property-based tests for the coefficient rings.

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use crate::{EuclideanDomain, Field, Ring, Q, Z};

    fn small_z() -> impl Strategy<Value = Z> {
        (-500i64..500i64).prop_map(Z::new)
    }

    fn small_q() -> impl Strategy<Value = Q> {
        ((-200i64..200i64), prop_oneof![(-50i64..=-1i64), (1i64..=50i64)])
            .prop_map(|(n, d)| Q::new(n, d))
    }

    proptest! {
        #[test]
        fn z_gcd_divides_both(a in small_z(), b in small_z()) {
            let g = a.gcd(&b);
            prop_assume!(!g.is_zero());
            prop_assert!(a.div_exact(&g).is_some());
            prop_assert!(b.div_exact(&g).is_some());
        }

        #[test]
        fn q_gcd_divides_into_integers(a in small_q(), b in small_q()) {
            // a / gcd(a, b) is an integer for the fraction gcd
            let g = a.gcd(&b);
            prop_assume!(!g.is_zero());
            let qa = a.field_div(&g).unwrap();
            prop_assert!(qa.0.is_integer());
        }

        #[test]
        fn q_inverse(a in small_q()) {
            prop_assume!(!a.is_zero());
            prop_assert!((a.clone() * a.inv().unwrap()).is_one());
        }

        #[test]
        fn z_division_identity(a in small_z(), b in small_z()) {
            prop_assume!(!b.is_zero());
            let (q, r) = a.div_rem(&b).unwrap();
            prop_assert_eq!(q * b.clone() + r.clone(), a);
            prop_assert!(r.0.abs() < b.0.abs());
        }

        #[test]
        fn z_pow_matches_repeated_product(a in -20i64..20i64, n in 0u32..6u32) {
            let z = Z::new(a);
            let mut acc = Z::one();
            for _ in 0..n {
                acc = acc * z.clone();
            }
            prop_assert_eq!(z.pow(n), acc);
        }
    }
}

//! Property-based tests for arbitrary precision arithmetic.

#[cfg(test)]
mod tests {
    use num_traits::Zero;
    use proptest::prelude::*;

    use crate::{Integer, Rational, Real};

    // Strategy for generating small integers
    fn small_int() -> impl Strategy<Value = i64> {
        -1000i64..1000i64
    }

    // Strategy for generating non-zero integers
    fn non_zero_int() -> impl Strategy<Value = i64> {
        prop_oneof![(-1000i64..=-1i64), (1i64..=1000i64)]
    }

    proptest! {
        #[test]
        fn gcd_times_lcm_is_product(a in non_zero_int(), b in non_zero_int()) {
            let a = Integer::new(a);
            let b = Integer::new(b);
            prop_assert_eq!(&a.gcd(&b) * &a.lcm(&b), (&a * &b).abs());
        }

        #[test]
        fn binomial_pascal_rule(n in 1u32..40, k in 1u32..40) {
            prop_assume!(k <= n);
            prop_assert_eq!(
                Integer::binomial(n, k),
                &Integer::binomial(n - 1, k - 1) + &Integer::binomial(n - 1, k)
            );
        }

        #[test]
        fn integer_distributive(a in small_int(), b in small_int(), c in small_int()) {
            let a = Integer::new(a);
            let b = Integer::new(b);
            let c = Integer::new(c);
            prop_assert_eq!(&a * &(&b + &c), &(&a * &b) + &(&a * &c));
        }

        #[test]
        fn integer_div_rem_reconstructs(a in small_int(), b in non_zero_int()) {
            let (q, r) = Integer::new(a).div_rem(&Integer::new(b)).unwrap();
            prop_assert_eq!(&(&q * &Integer::new(b)) + &r, Integer::new(a));
            prop_assert!(r.abs() < Integer::new(b).abs());
            prop_assert_eq!(q.to_i64(), Some(a / b));
        }

        #[test]
        fn symmetric_mod_is_congruent(a in small_int(), m in 1i64..500i64) {
            let m_big = Integer::new(m);
            let r = Integer::new(a).symmetric_mod(&m_big).unwrap();
            prop_assert!((&Integer::new(a) - &r).div_exact(&m_big).is_some());
            prop_assert!(&r * &Integer::new(2) <= m_big);
            prop_assert!(&r * &Integer::new(2) > -m_big);
        }

        #[test]
        fn gcd_divides_both(a in non_zero_int(), b in non_zero_int()) {
            let a = Integer::new(a);
            let b = Integer::new(b);
            let g = a.gcd(&b);
            prop_assert!((a.clone() % g.clone()).is_zero());
            prop_assert!((b.clone() % g.clone()).is_zero());
            prop_assert_eq!(g, b.gcd(&a));
        }

        #[test]
        fn rational_add_commutative(
            num_a in small_int(),
            den_a in non_zero_int(),
            num_b in small_int(),
            den_b in non_zero_int()
        ) {
            let a = Rational::from_i64(num_a, den_a);
            let b = Rational::from_i64(num_b, den_b);
            prop_assert_eq!(&a + &b, &b + &a);
        }

        #[test]
        fn rational_multiplicative_inverse(num in non_zero_int(), den in non_zero_int()) {
            use num_traits::One;
            let a = Rational::from_i64(num, den);
            let inv = a.recip().unwrap();
            prop_assert!((a * inv).is_one());
        }

        #[test]
        fn rational_trunc_matches_machine_division(num in small_int(), den in non_zero_int()) {
            let q = Rational::from_i64(num, den);
            prop_assert_eq!(q.trunc().to_i64(), Some(num / den));
        }

        #[test]
        fn rational_string_roundtrip(num in small_int(), den in non_zero_int()) {
            let q = Rational::from_i64(num, den);
            prop_assert_eq!(q.to_string().parse::<Rational>().unwrap(), q);
        }

        #[test]
        fn real_integer_arithmetic_is_exact(a in small_int(), b in small_int()) {
            let ra = Real::from(a);
            let rb = Real::from(b);
            prop_assert_eq!(&ra * &rb, Real::from(a * b));
            prop_assert_eq!(&ra + &rb, Real::from(a + b));
        }
    }
}

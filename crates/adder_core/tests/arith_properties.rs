use adder_core::arith::{self, ArithError};
use proptest::prelude::*;

proptest! {
    #[test]
    fn floor_division_identity_holds(a in any::<i64>(), b in any::<i64>()) {
        prop_assume!(b != 0);
        prop_assume!(!(a == i64::MIN && b == -1));
        let q = arith::floor_div(a, b).unwrap();
        let r = arith::floor_mod(a, b).unwrap();
        prop_assert_eq!(q as i128 * b as i128 + r as i128, a as i128);
        if r != 0 {
            prop_assert_eq!(r < 0, b < 0);
        }
        prop_assert!((r as i128).abs() < (b as i128).abs());
    }
}

proptest! {
    #[test]
    fn checked_ops_agree_with_wide_arithmetic(a in any::<i64>(), b in any::<i64>()) {
        let wide_sum = a as i128 + b as i128;
        match arith::add(a, b) {
            Ok(v) => prop_assert_eq!(v as i128, wide_sum),
            Err(e) => {
                prop_assert_eq!(e, ArithError::Overflow);
                prop_assert!(wide_sum > i64::MAX as i128 || wide_sum < i64::MIN as i128);
            }
        }
        let wide_diff = a as i128 - b as i128;
        match arith::sub(a, b) {
            Ok(v) => prop_assert_eq!(v as i128, wide_diff),
            Err(_) => prop_assert!(wide_diff > i64::MAX as i128 || wide_diff < i64::MIN as i128),
        }
        let wide_prod = a as i128 * b as i128;
        match arith::mul(a, b) {
            Ok(v) => prop_assert_eq!(v as i128, wide_prod),
            Err(_) => prop_assert!(wide_prod > i64::MAX as i128 || wide_prod < i64::MIN as i128),
        }
    }
}

proptest! {
    #[test]
    fn left_shift_never_loses_bits(v in any::<i64>(), n in 0i64..80) {
        let wide = (v as i128).checked_shl(n as u32).filter(|_| n < 64);
        match arith::shl(v, n) {
            Ok(r) => {
                if v != 0 {
                    prop_assert_eq!(Some(r as i128), wide);
                } else {
                    prop_assert_eq!(r, 0);
                }
            }
            Err(e) => {
                prop_assert_eq!(e, ArithError::Overflow);
                let fits = wide.map(|w| w >= i64::MIN as i128 && w <= i64::MAX as i128).unwrap_or(false);
                prop_assert!(!fits);
            }
        }
    }
}

#[test]
fn negation_of_min_overflows() {
    assert_eq!(arith::neg(i64::MIN), Err(ArithError::Overflow));
    assert_eq!(arith::abs(i64::MIN), Err(ArithError::Overflow));
    assert_eq!(arith::neg(5), Ok(-5));
}

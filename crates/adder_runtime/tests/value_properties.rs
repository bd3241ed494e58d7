use adder_runtime::Value;
use adder_runtime::core::exceptions::OVERFLOW_ERROR_TYPE;
use adder_runtime::objects::{List, Tuple};
use proptest::prelude::*;

fn ints(values: &[i64]) -> Vec<Value> {
    values.iter().copied().map(Value::int).collect()
}

proptest! {
    #[test]
    fn negative_index_mirrors_positive(values in prop::collection::vec(any::<i64>(), 1..20), pick in any::<prop::sample::Index>()) {
        let n = values.len() as i64;
        let i = pick.index(values.len()) as i64;
        let list = List::value(ints(&values));
        let a = list.get_item(&Value::int(i)).unwrap();
        let b = list.get_item(&Value::int(i - n)).unwrap();
        prop_assert!(a.equals(&b).unwrap());
    }
}

proptest! {
    #[test]
    fn str_indexing_counts_code_points(s in "\\PC{1,16}", pick in any::<prop::sample::Index>()) {
        let chars: Vec<char> = s.chars().collect();
        let i = pick.index(chars.len());
        let value = Value::new_str(&s);
        let got = value.get_item(&Value::int(i as i64 - chars.len() as i64)).unwrap();
        prop_assert_eq!(got.str().unwrap(), chars[i].to_string());
    }
}

proptest! {
    #[test]
    fn int_addition_is_checked(a in any::<i64>(), b in any::<i64>()) {
        let sum = Value::int(a).add(&Value::int(b));
        match a.checked_add(b) {
            Some(expected) => prop_assert_eq!(sum.unwrap().repr().unwrap(), expected.to_string()),
            None => prop_assert!(sum.unwrap_err().matches(&OVERFLOW_ERROR_TYPE)),
        }
    }
}

proptest! {
    #[test]
    fn floor_division_and_modulo_agree(a in any::<i64>(), b in any::<i64>().prop_filter("nonzero", |b| *b != 0)) {
        prop_assume!(!(a == i64::MIN && b == -1));
        let q = Value::int(a).floordiv(&Value::int(b)).unwrap().int_value().unwrap();
        let r = Value::int(a).modulo(&Value::int(b)).unwrap().int_value().unwrap();
        prop_assert_eq!(q as i128 * b as i128 + r as i128, a as i128);
        prop_assert!(r == 0 || (r < 0) == (b < 0));
    }
}

proptest! {
    #[test]
    fn equal_values_hash_equal(values in prop::collection::vec(-1000i64..1000, 0..8)) {
        let a = Tuple::value(ints(&values));
        let b = Tuple::value(ints(&values));
        prop_assert!(a.equals(&b).unwrap());
        prop_assert_eq!(a.hash_code().unwrap(), b.hash_code().unwrap());
    }
}

proptest! {
    #[test]
    fn bool_and_int_share_hashes(b in any::<bool>()) {
        let as_bool = Value::bool(b);
        let as_int = Value::int(b as i64);
        prop_assert!(as_bool.equals(&as_int).unwrap());
        prop_assert_eq!(as_bool.hash_code().unwrap(), as_int.hash_code().unwrap());
    }
}

//! Property tests for the arithmetic operators.

use ember_value::{ops, Value};
use proptest::prelude::*;

fn scalar() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<i64>().prop_map(Value::Long),
        (-1.0e12..1.0e12f64).prop_map(Value::Double),
        "[0-9]{0,4}(\\.[0-9]{1,3})?[a-z]{0,2}".prop_map(Value::string),
    ]
}

fn same(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Double(x), Value::Double(y)) => x == y || (x.is_nan() && y.is_nan()),
        _ => a == b,
    }
}

proptest! {
    #[test]
    fn sub_long_matches_general_sub(x in scalar(), r in any::<i64>()) {
        prop_assert!(same(&x.sub_long(r), &x.sub(&Value::Long(r))));
    }

    #[test]
    fn sub_rev_matches_reversed_sub(x in scalar(), l in any::<i64>()) {
        prop_assert!(same(&x.sub_rev(l), &Value::Long(l).sub(&x)));
    }

    #[test]
    fn long_sub_matches_boxed_sub(l in any::<i64>(), r in any::<i64>()) {
        prop_assert!(same(&Value::long_sub(l, r), &Value::Long(l).sub(&Value::Long(r))));
    }

    #[test]
    fn add_and_mul_variants_agree(x in scalar(), n in any::<i64>()) {
        prop_assert!(same(&x.add_long(n), &x.add(&Value::Long(n))));
        prop_assert!(same(&x.add_rev(n), &Value::Long(n).add(&x)));
        prop_assert!(same(&x.mul_long(n), &x.mul(&Value::Long(n))));
        prop_assert!(same(&x.mul_rev(n), &Value::Long(n).mul(&x)));
    }

    #[test]
    fn div_is_always_double(a in scalar(), b in scalar()) {
        prop_assert!(matches!(a.div(&b), Value::Double(_)));
    }

    #[test]
    fn rem_fails_only_on_zero_divisor(a in scalar(), b in scalar()) {
        prop_assert_eq!(a.rem(&b).is_err(), b.to_long() == 0);
    }

    #[test]
    fn loose_eq_is_reflexive_for_non_nan(x in scalar()) {
        prop_assert_eq!(x.loose_eq(&x), Ok(true));
        prop_assert_eq!(ops::compare(ember_ir::BinaryOp::LtEq, &x, &x), Ok(true));
    }
}

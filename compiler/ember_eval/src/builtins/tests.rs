use crate::{buffer_handler, Environment, FunctionTable};
use ember_ir::SharedInterner;
use ember_value::{EvalError, EvalResult, Value};
use pretty_assertions::assert_eq;

fn call(name: &str, args: &[Value]) -> EvalResult {
    let table = FunctionTable::with_builtins();
    let mut env = Environment::builder()
        .interner(SharedInterner::new())
        .print_handler(buffer_handler())
        .build();
    match table.lookup(name) {
        Some(f) => f.call_args(&mut env, args),
        None => panic!("{name} is not a builtin"),
    }
}

#[test]
fn test_string_functions() {
    assert_eq!(call("strlen", &[Value::string("héllo")]), Ok(Value::Long(6)));
    assert_eq!(call("STRTOUPPER", &[Value::string("abc")]), Ok(Value::string("ABC")));
    assert_eq!(call("strtolower", &[Value::Long(1)]), Ok(Value::string("1")));
    assert_eq!(
        call(
            "implode",
            &[Value::string(", "), Value::list([Value::Long(1), Value::Double(2.5)])]
        ),
        Ok(Value::string("1, 2.5"))
    );
}

#[test]
fn test_wrong_arity_is_a_native_error() {
    assert_eq!(
        call("strlen", &[]),
        Err(EvalError::Native {
            function: "strlen".into(),
            message: "expects exactly 1 parameters, 0 given".into(),
        })
    );
}

#[test]
fn test_max_and_min() {
    let args = [Value::Long(3), Value::Double(7.5), Value::string("5")];
    assert_eq!(call("max", &args), Ok(Value::Double(7.5)));
    assert_eq!(call("min", &args), Ok(Value::Long(3)));
    assert_eq!(
        call("max", &[Value::list([Value::Long(1), Value::Long(9)])]),
        Ok(Value::Long(9))
    );
    assert!(call("min", &[Value::empty_array()]).is_err());
}

#[test]
fn test_abs_promotes_on_overflow() {
    assert_eq!(call("abs", &[Value::Long(-4)]), Ok(Value::Long(4)));
    assert_eq!(call("abs", &[Value::string("-1.5")]), Ok(Value::Double(1.5)));
    assert_eq!(
        call("abs", &[Value::Long(i64::MIN)]),
        Ok(Value::Double(-(i64::MIN as f64)))
    );
}

#[test]
fn test_array_push_mutates_in_place() {
    let array = Value::list([Value::Long(1)]);
    assert_eq!(
        call("array_push", &[array.clone(), Value::Long(2), Value::Long(3)]),
        Ok(Value::Long(3))
    );
    assert_eq!(array.count(), 3);
    assert!(call("array_push", &[Value::Long(1), Value::Long(2)]).is_err());
}

#[test]
fn test_count_and_is_null() {
    assert_eq!(call("count", &[Value::Null]), Ok(Value::Long(0)));
    assert_eq!(call("count", &[Value::Long(5)]), Ok(Value::Long(1)));
    assert_eq!(call("is_null", &[Value::Unset]), Ok(Value::Bool(true)));
    assert_eq!(call("is_null", &[Value::Bool(false)]), Ok(Value::Bool(false)));
}

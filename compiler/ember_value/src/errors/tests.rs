use super::*;
use ember_ir::Role;

#[test]
fn test_undefined_function_message() {
    assert_eq!(
        undefined_function("frobnicate").to_string(),
        "'frobnicate' is an unknown function"
    );
}

#[test]
fn test_type_names_in_messages() {
    assert_eq!(
        scalar_as_array(&Value::Long(3)).to_string(),
        "cannot use a value of type int as an array"
    );
    assert_eq!(
        not_callable(&Value::Null).to_string(),
        "a value of type null is not callable"
    );
}

#[test]
fn test_role_error_is_transparent() {
    let role = RoleError {
        file: "a.php".to_owned(),
        line: 7,
        role: Role::Assign,
        node: "a literal",
    };
    let err: EvalError = role.clone().into();
    assert_eq!(err.to_string(), role.to_string());
    assert_eq!(err, EvalError::Role(role));
}

#[test]
fn test_native_error_names_function() {
    assert_eq!(
        native_error("strlen", "expects exactly 1 argument").to_string(),
        "strlen(): expects exactly 1 argument"
    );
}

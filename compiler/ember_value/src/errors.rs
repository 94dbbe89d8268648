//! Evaluation-time errors.
//!
//! Factory functions (e.g. `modulo_by_zero()`) are the preferred way to build
//! errors; both backends call the same factories so compiled code and the
//! evaluator report identical messages.

use ember_ir::RoleError;

use crate::Value;

/// Result of evaluation.
pub type EvalResult = Result<Value, EvalError>;

/// Failure raised while evaluating an expression.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum EvalError {
    #[error("'{name}' is an unknown function")]
    UndefinedFunction { name: String },

    #[error("a value of type {type_name} is not callable")]
    NotCallable { type_name: &'static str },

    #[error("modulo by zero")]
    ModuloByZero,

    #[error("cannot unset string offsets")]
    StringOffsetUnset,

    #[error("cannot use a value of type {type_name} as an array")]
    ScalarAsArray { type_name: &'static str },

    #[error("cannot use a value of type {type_name} as an object")]
    ScalarAsObject { type_name: &'static str },

    #[error("illegal offset type {type_name}")]
    IllegalOffset { type_name: &'static str },

    #[error("cannot use [] for reading")]
    ArrayTailRead,

    #[error("nesting level too deep - recursive dependency?")]
    NestingTooDeep,

    #[error("cannot use [] after the largest integer key")]
    NextIndexOverflow,

    #[error(transparent)]
    Role(#[from] RoleError),

    /// Raised by native functions.
    #[error("{function}(): {message}")]
    Native { function: String, message: String },
}

#[cold]
pub fn undefined_function(name: &str) -> EvalError {
    EvalError::UndefinedFunction {
        name: name.to_owned(),
    }
}

#[cold]
pub fn not_callable(value: &Value) -> EvalError {
    EvalError::NotCallable {
        type_name: value.type_name(),
    }
}

#[cold]
pub fn modulo_by_zero() -> EvalError {
    EvalError::ModuloByZero
}

#[cold]
pub fn nesting_too_deep() -> EvalError {
    EvalError::NestingTooDeep
}

#[cold]
pub fn next_index_overflow() -> EvalError {
    EvalError::NextIndexOverflow
}

#[cold]
pub fn scalar_as_array(value: &Value) -> EvalError {
    EvalError::ScalarAsArray {
        type_name: value.type_name(),
    }
}

#[cold]
pub fn scalar_as_object(value: &Value) -> EvalError {
    EvalError::ScalarAsObject {
        type_name: value.type_name(),
    }
}

#[cold]
pub fn illegal_offset(key: &Value) -> EvalError {
    EvalError::IllegalOffset {
        type_name: key.type_name(),
    }
}

#[cold]
pub fn native_error(function: &str, message: impl Into<String>) -> EvalError {
    EvalError::Native {
        function: function.to_owned(),
        message: message.into(),
    }
}

#[cfg(test)]
mod tests;

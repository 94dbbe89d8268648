//! Ember runtime values.
//!
//! The dynamically-typed value model shared by the evaluator and by
//! compiled units:
//! - `Value`: tagged union with total coercions and non-mutating operators
//! - `ArrayValue` / `ObjectValue`: shared containers behind a `Handle`
//! - `Var`: reference cell used for variable storage and by-ref passing
//! - `EvalError`: evaluation-time failures

mod array;
mod errors;
mod format;
pub mod numeric;
mod object;
pub mod ops;
mod value;
mod var;

pub use array::{ArrayKey, ArrayValue};
pub use errors::{
    illegal_offset, modulo_by_zero, native_error, nesting_too_deep, next_index_overflow,
    not_callable, scalar_as_array, scalar_as_object, undefined_function, EvalError, EvalResult,
};
pub use format::format_double;
pub use numeric::Numeric;
pub use object::ObjectValue;
pub use value::{Handle, Value};
pub use var::Var;

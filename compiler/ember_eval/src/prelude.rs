//! Names used by compiled units.
//!
//! Generated code starts with `use ember_eval::prelude::*;` and refers to
//! nothing else, so the emitted text stays independent of crate layout.

pub use ember_ir::{
    ArrayEntry, BinaryOp, CastType, ExprArena, ExprId, Location, Name, RoleError, UnaryOp,
};
pub use ember_value::{ops, ArrayKey, ArrayValue, EvalError, Value, Var};

pub use crate::{ArgMode, Callable, Environment, RefArgs, MAX_FIXED_ARITY};

/// Raise `error` from an expression position.
#[cold]
pub fn fail<T>(error: EvalError) -> Result<T, EvalError> {
    Err(error)
}

//! Ember Eval - tree-walking evaluator and runtime environment.
//!
//! # Architecture
//!
//! - `Environment`: variables (`Var` cells), the function table and the
//!   output sink for one evaluation
//! - `Evaluator`: exhaustive per-kind evaluation over an immutable
//!   `ExprArena`, one method per evaluation context
//! - `Callable`: the call ABI shared with compiled code (`call0..call5`,
//!   `call_args`, and the reference-returning `call_ref*` family)
//! - `prelude`: everything compiled units refer to

mod builtins;
mod environment;
mod evaluator;
mod function;
mod print_handler;
mod shared;

pub mod prelude;

pub use environment::{Environment, EnvironmentBuilder};
pub use evaluator::Evaluator;
pub use function::{
    ArgMode, Callable, FunctionTable, NativeBody, NativeFunction, RefArgs, MAX_FIXED_ARITY,
};
pub use print_handler::{
    buffer_handler, silent_handler, stdout_handler, PrintHandler, SharedPrintHandler,
};
pub use shared::SharedRegistry;

// Value types, for callers that only depend on this crate.
pub use ember_value::{EvalError, EvalResult, Value, Var};

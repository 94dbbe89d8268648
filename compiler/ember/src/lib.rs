//! Ember - a dynamically-typed expression engine with two backends.
//!
//! A unit is an arena of expression nodes plus the statements that run
//! them. It is analyzed once; afterwards it can be evaluated any number of
//! times (from many threads, one `Environment` each) or compiled once to
//! Rust source that behaves identically.
//!
//! ```text
//! ExprArena + [Statement]
//!         |
//!      analyze            (ember_analyze: hints, VarState)
//!      /      \
//!  Evaluator   Compiler   (ember_eval / ember_codegen)
//! ```
//!
//! `Program` ties the pieces together; the member crates are re-exported
//! for hosts that need finer control.

mod config;
mod logging;
mod program;

pub use config::{Config, OutputMode};
pub use logging::init_tracing;
pub use program::{Program, ProgramBuilder};

pub use ember_analyze::{analyze, Analysis, ScopeMode, StaticType, VarFlags, VarState};
pub use ember_codegen::{CodegenError, Compiler, PRELUDE_IMPORT};
pub use ember_eval::{
    buffer_handler, silent_handler, stdout_handler, ArgMode, Callable, Environment,
    EnvironmentBuilder, Evaluator, FunctionTable, NativeFunction, RefArgs, SharedPrintHandler,
    SharedRegistry, MAX_FIXED_ARITY,
};
pub use ember_ir::{
    ArrayEntry, BinaryOp, CastType, ExprArena, ExprId, ExprKind, Location, Name, Role, RoleError,
    Statement, StatementKind, UnaryOp,
};
pub use ember_value::{EvalError, EvalResult, Value, Var};

//! Ember Codegen - ahead-of-time compilation of expression trees to Rust.
//!
//! The compiler walks an analyzed `ExprArena` and emits the text of a Rust
//! function that, run against an `ember_eval::Environment`, has exactly the
//! effects the tree-walking evaluator would have. Generated functions only
//! name items from `ember_eval::prelude`; put [`PRELUDE_IMPORT`] at the top
//! of the file they are pasted into.
//!
//! Static hints from `ember_analyze` select primitive code paths
//! (`i64`/`f64`/`String`/`bool` temporaries) where the result type of a
//! node is known; everything else goes through `Value`.

mod compiler;
mod emitter;
mod errors;

pub use compiler::{Compiler, GenResult};
pub use emitter::{Emitter, TempKind};
pub use errors::{not_analyzed, CodegenError};

pub use compiler::MAX_FIXED_ARITY;

/// The single import generated code relies on.
pub const PRELUDE_IMPORT: &str = "use ember_eval::prelude::*;";

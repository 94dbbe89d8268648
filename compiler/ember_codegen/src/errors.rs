//! Code-generation failures.
//!
//! These are internal errors of the compile step, kept apart from the
//! evaluation errors a program can raise at run time.

use ember_ir::{ExprId, RoleError};

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum CodegenError {
    /// The node was not reached by the analysis pass, so its hint and
    /// variable state are missing.
    #[error("expression {expr:?} was not analyzed before code generation")]
    NotAnalyzed { expr: ExprId },

    #[error(transparent)]
    Role(#[from] RoleError),
}

#[cold]
pub fn not_analyzed(expr: ExprId) -> CodegenError {
    CodegenError::NotAnalyzed { expr }
}

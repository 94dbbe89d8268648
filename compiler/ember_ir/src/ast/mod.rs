//! Expression tree types.

mod expr;
mod operators;

pub use expr::{ArrayEntry, Expr, ExprKind};
pub use operators::{BinaryOp, CastType, UnaryOp};

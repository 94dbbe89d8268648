//! Top-level statements of a unit.
//!
//! Control flow is out of scope; a unit is a straight-line list of
//! expression statements and echoes.

use crate::ExprId;

#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub enum StatementKind {
    /// `expr;` evaluated for its side effects.
    Expr,
    /// `echo expr;`
    Echo,
}

#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub struct Statement {
    pub kind: StatementKind,
    pub expr: ExprId,
}

impl Statement {
    pub fn expr(expr: ExprId) -> Self {
        Statement {
            kind: StatementKind::Expr,
            expr,
        }
    }

    pub fn echo(expr: ExprId) -> Self {
        Statement {
            kind: StatementKind::Echo,
            expr,
        }
    }
}

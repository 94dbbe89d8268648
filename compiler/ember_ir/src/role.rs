//! Role-incompatibility errors.
//!
//! Raised when an lvalue-only operation (assign, assign by reference, unset,
//! isset) is applied to a node that is not storage.

use std::fmt;

use crate::{Expr, StringInterner};

/// The lvalue role a node was asked to play.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Role {
    Assign,
    AssignRef,
    Unset,
    Isset,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Role::Assign => "assign to",
            Role::AssignRef => "assign by reference to",
            Role::Unset => "unset",
            Role::Isset => "use isset on",
        })
    }
}

/// A node was used in a role it cannot play.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("{file}:{line}: cannot {role} {node}")]
pub struct RoleError {
    pub file: String,
    pub line: u32,
    pub role: Role,
    /// Description of the offending node, e.g. "a literal".
    pub node: &'static str,
}

impl RoleError {
    /// Build the error for `expr`, resolving its file name.
    pub fn new(role: Role, expr: &Expr, interner: &StringInterner) -> Self {
        let file = interner.lookup(expr.loc.file);
        RoleError {
            file: if file.is_empty() {
                "<unknown>".to_owned()
            } else {
                file.to_owned()
            },
            line: expr.loc.line,
            role,
            node: expr.kind.describe(),
        }
    }
}

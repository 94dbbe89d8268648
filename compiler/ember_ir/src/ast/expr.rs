//! Expression nodes.
//!
//! No `Box<Expr>`: children are `ExprId` indices into the arena, lists are
//! ranges into flat side vectors. Every kind is `Copy`.

use std::fmt;

use super::operators::{BinaryOp, CastType, UnaryOp};
use crate::{EntryRange, ExprId, ExprRange, Location, Name};

/// Expression node: kind plus the location it was built from.
#[derive(Copy, Clone, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub struct Expr {
    pub kind: ExprKind,
    pub loc: Location,
}

impl Expr {
    pub fn new(kind: ExprKind, loc: Location) -> Self {
        Expr { kind, loc }
    }
}

impl fmt::Debug for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?} @ {:?}", self.kind, self.loc)
    }
}

/// One `key => value` entry of an array literal. `key` is `None` for
/// positional entries, which take the next free integer index.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub struct ArrayEntry {
    pub key: Option<ExprId>,
    pub value: ExprId,
}

impl ArrayEntry {
    pub fn positional(value: ExprId) -> Self {
        ArrayEntry { key: None, value }
    }

    pub fn keyed(key: ExprId, value: ExprId) -> Self {
        ArrayEntry {
            key: Some(key),
            value,
        }
    }
}

/// Expression kinds. The set is closed: the evaluator, the analyzer and the
/// compiler all match it exhaustively.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub enum ExprKind {
    // Literals
    Null,
    Bool(bool),
    Long(i64),
    /// IEEE-754 bits, so the kind stays `Eq + Hash`.
    Double(u64),
    String(Name),

    // Storage
    /// `$name`
    Var(Name),
    /// `$base[index]`
    ArrayGet { base: ExprId, index: ExprId },
    /// `$base[]`, only valid as an assignment target.
    ArrayTail { base: ExprId },
    /// `$base->field`
    FieldGet { base: ExprId, field: Name },

    /// `[k => v, v2, ...]`
    ArrayLiteral { entries: EntryRange },

    // Operators
    Unary { op: UnaryOp, operand: ExprId },
    Binary {
        op: BinaryOp,
        left: ExprId,
        right: ExprId,
    },
    Cast { ty: CastType, operand: ExprId },

    // Lvalue forms, built only through `ExprArena::create_*`
    /// `target = value`; `target` is a storage node.
    Assign { target: ExprId, value: ExprId },
    /// `$target = &source`
    AssignRef { target: Name, source: ExprId },
    /// `unset($name)`
    UnsetVar(Name),
    /// `unset($base[index])`: array-key removal.
    UnsetArray { base: ExprId, index: ExprId },
    /// `unset($base->field)`
    UnsetField { base: ExprId, field: Name },
    /// `isset($name)`
    IssetVar(Name),
    /// `isset($base[index])`
    IssetArray { base: ExprId, index: ExprId },
    /// `isset($base->field)`
    IssetField { base: ExprId, field: Name },

    // Calls
    /// `name(args...)`, name resolved at run time.
    Call { name: Name, args: ExprRange },
    /// `$name(args...)`: dynamic function call.
    CallVar { name: ExprId, args: ExprRange },
}

impl ExprKind {
    /// Construct a double literal kind.
    pub fn double(value: f64) -> Self {
        ExprKind::Double(value.to_bits())
    }

    /// Storage nodes can be assigned, unset and tested with isset.
    pub fn is_storage(&self) -> bool {
        matches!(
            self,
            ExprKind::Var(_)
                | ExprKind::ArrayGet { .. }
                | ExprKind::ArrayTail { .. }
                | ExprKind::FieldGet { .. }
        )
    }

    pub fn is_literal(&self) -> bool {
        matches!(
            self,
            ExprKind::Null
                | ExprKind::Bool(_)
                | ExprKind::Long(_)
                | ExprKind::Double(_)
                | ExprKind::String(_)
        )
    }

    /// Short human description used in role errors.
    pub fn describe(&self) -> &'static str {
        match self {
            ExprKind::Null
            | ExprKind::Bool(_)
            | ExprKind::Long(_)
            | ExprKind::Double(_)
            | ExprKind::String(_) => "a literal",
            ExprKind::Var(_) => "a variable",
            ExprKind::ArrayGet { .. } => "an array element",
            ExprKind::ArrayTail { .. } => "an array append",
            ExprKind::FieldGet { .. } => "an object field",
            ExprKind::ArrayLiteral { .. } => "an array literal",
            ExprKind::Unary { .. } => "a unary expression",
            ExprKind::Binary { .. } => "a binary expression",
            ExprKind::Cast { .. } => "a cast",
            ExprKind::Assign { .. } | ExprKind::AssignRef { .. } => "an assignment",
            ExprKind::UnsetVar(_) | ExprKind::UnsetArray { .. } | ExprKind::UnsetField { .. } => {
                "an unset"
            }
            ExprKind::IssetVar(_) | ExprKind::IssetArray { .. } | ExprKind::IssetField { .. } => {
                "an isset"
            }
            ExprKind::Call { .. } | ExprKind::CallVar { .. } => "a function call",
        }
    }
}

//! Ember IR - expression tree types for the Ember expression engine.
//!
//! This crate contains the data structures shared by the analysis pass and
//! both execution backends:
//! - `Name` / `StringInterner` for interned identifiers
//! - `Location` for diagnostics (file + line)
//! - `ExprArena` holding every node of a unit, addressed by `ExprId`
//! - `ExprKind`, the closed set of expression kinds
//! - `RoleError` for lvalue-only operations applied to non-storage nodes
//!
//! # Design Philosophy
//!
//! - **Intern names**: variable, field and function names are `Name(u32)`.
//! - **Flatten the tree**: children are `ExprId` indices, argument lists are
//!   `ExprRange`s into a shared list, so the arena is one contiguous block
//!   that many threads can read at once.
//! - **Closed kinds**: every backend matches `ExprKind` exhaustively.

mod arena;
pub mod ast;
mod expr_id;
mod interner;
mod location;
mod name;
mod role;
mod statement;

pub use arena::{Children, ExprArena, SharedArena};
pub use ast::{ArrayEntry, BinaryOp, CastType, Expr, ExprKind, UnaryOp};
pub use expr_id::{EntryRange, ExprId, ExprRange};
pub use interner::{SharedInterner, StringInterner};
pub use location::Location;
pub use name::Name;
pub use role::{Role, RoleError};
pub use statement::{Statement, StatementKind};

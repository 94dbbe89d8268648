//! Arena allocation for the flat expression tree.
//!
//! - Contiguous storage for all expressions of a unit
//! - Child references use `ExprId` indices
//! - Argument lists use `ExprRange` into `expr_lists`
//!
//! The arena also owns the interner its names come from, so the builder
//! methods can take plain `&str` names.

use smallvec::SmallVec;
use std::fmt;
use std::sync::Arc;

use crate::ast::{ArrayEntry, BinaryOp, CastType, Expr, ExprKind, UnaryOp};
use crate::{
    EntryRange, ExprId, ExprRange, Location, Name, Role, RoleError, SharedInterner,
};

/// Direct children of a node, in evaluation order.
pub type Children = SmallVec<[ExprId; 4]>;

/// Contiguous storage for all expressions in a unit.
///
/// Immutable once built; share it across threads through `SharedArena`.
#[derive(Clone, Default)]
pub struct ExprArena {
    interner: SharedInterner,

    /// All expressions (indexed by `ExprId`).
    exprs: Vec<Expr>,

    /// Flattened expression lists (call arguments).
    expr_lists: Vec<ExprId>,

    /// Array-literal entries.
    entries: Vec<ArrayEntry>,
}

impl ExprArena {
    /// Create a new empty arena with its own interner.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an arena whose names come from `interner`.
    pub fn with_interner(interner: SharedInterner) -> Self {
        ExprArena {
            interner,
            ..Self::default()
        }
    }

    #[inline]
    pub fn interner(&self) -> &SharedInterner {
        &self.interner
    }

    #[inline]
    pub fn intern(&self, s: &str) -> Name {
        self.interner.intern(s)
    }

    // ===== Expression allocation =====

    /// Allocate expression, return ID.
    ///
    /// Prefer the typed builders below; lvalue forms must go through the
    /// `create_*` methods so role checks run.
    #[inline]
    pub fn alloc(&mut self, kind: ExprKind, loc: Location) -> ExprId {
        let index = u32::try_from(self.exprs.len())
            .unwrap_or_else(|_| panic!("expression arena exceeded u32::MAX nodes"));
        self.exprs.push(Expr::new(kind, loc));
        ExprId::new(index)
    }

    /// Get expression by ID.
    ///
    /// # Panics
    /// Panics if `id` is out of bounds.
    #[inline]
    #[track_caller]
    pub fn get(&self, id: ExprId) -> &Expr {
        &self.exprs[id.index()]
    }

    #[inline]
    #[track_caller]
    pub fn kind(&self, id: ExprId) -> ExprKind {
        self.exprs[id.index()].kind
    }

    #[inline]
    #[track_caller]
    pub fn loc(&self, id: ExprId) -> Location {
        self.exprs[id.index()].loc
    }

    /// Number of expressions; side tables are sized by this.
    #[inline]
    pub fn len(&self) -> usize {
        self.exprs.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.exprs.is_empty()
    }

    // ===== Lists =====

    /// Allocate expression list, return range.
    pub fn alloc_expr_list(&mut self, exprs: impl IntoIterator<Item = ExprId>) -> ExprRange {
        let start = self.expr_lists.len();
        self.expr_lists.extend(exprs);
        let (start, len) = range_bounds(start, self.expr_lists.len());
        ExprRange::new(start, len)
    }

    /// Get expression list by range.
    #[inline]
    pub fn get_expr_list(&self, range: ExprRange) -> &[ExprId] {
        &self.expr_lists[range.span()]
    }

    pub fn alloc_entries(&mut self, entries: impl IntoIterator<Item = ArrayEntry>) -> EntryRange {
        let start = self.entries.len();
        self.entries.extend(entries);
        let (start, len) = range_bounds(start, self.entries.len());
        EntryRange::new(start, len)
    }

    #[inline]
    pub fn get_entries(&self, range: EntryRange) -> &[ArrayEntry] {
        &self.entries[range.span()]
    }

    // ===== Builders =====

    pub fn null(&mut self, loc: Location) -> ExprId {
        self.alloc(ExprKind::Null, loc)
    }

    pub fn bool(&mut self, value: bool, loc: Location) -> ExprId {
        self.alloc(ExprKind::Bool(value), loc)
    }

    pub fn long(&mut self, value: i64, loc: Location) -> ExprId {
        self.alloc(ExprKind::Long(value), loc)
    }

    pub fn double(&mut self, value: f64, loc: Location) -> ExprId {
        self.alloc(ExprKind::double(value), loc)
    }

    pub fn string(&mut self, value: &str, loc: Location) -> ExprId {
        let name = self.intern(value);
        self.alloc(ExprKind::String(name), loc)
    }

    pub fn var(&mut self, name: &str, loc: Location) -> ExprId {
        let name = self.intern(name);
        self.alloc(ExprKind::Var(name), loc)
    }

    pub fn array_get(&mut self, base: ExprId, index: ExprId, loc: Location) -> ExprId {
        self.alloc(ExprKind::ArrayGet { base, index }, loc)
    }

    pub fn array_tail(&mut self, base: ExprId, loc: Location) -> ExprId {
        self.alloc(ExprKind::ArrayTail { base }, loc)
    }

    pub fn field_get(&mut self, base: ExprId, field: &str, loc: Location) -> ExprId {
        let field = self.intern(field);
        self.alloc(ExprKind::FieldGet { base, field }, loc)
    }

    pub fn array_literal(
        &mut self,
        entries: impl IntoIterator<Item = ArrayEntry>,
        loc: Location,
    ) -> ExprId {
        let entries = self.alloc_entries(entries);
        self.alloc(ExprKind::ArrayLiteral { entries }, loc)
    }

    pub fn unary(&mut self, op: UnaryOp, operand: ExprId, loc: Location) -> ExprId {
        self.alloc(ExprKind::Unary { op, operand }, loc)
    }

    pub fn binary(&mut self, op: BinaryOp, left: ExprId, right: ExprId, loc: Location) -> ExprId {
        self.alloc(ExprKind::Binary { op, left, right }, loc)
    }

    pub fn cast(&mut self, ty: CastType, operand: ExprId, loc: Location) -> ExprId {
        self.alloc(ExprKind::Cast { ty, operand }, loc)
    }

    pub fn call(
        &mut self,
        name: &str,
        args: impl IntoIterator<Item = ExprId>,
        loc: Location,
    ) -> ExprId {
        let name = self.intern(name);
        let args = self.alloc_expr_list(args);
        self.alloc(ExprKind::Call { name, args }, loc)
    }

    pub fn call_var(
        &mut self,
        name: ExprId,
        args: impl IntoIterator<Item = ExprId>,
        loc: Location,
    ) -> ExprId {
        let args = self.alloc_expr_list(args);
        self.alloc(ExprKind::CallVar { name, args }, loc)
    }

    // ===== Lvalue forms =====

    /// `target = value`. Fails unless `target` is a storage node.
    pub fn create_assign(
        &mut self,
        target: ExprId,
        value: ExprId,
        loc: Location,
    ) -> Result<ExprId, RoleError> {
        if !self.kind(target).is_storage() {
            return Err(self.role_error(Role::Assign, target));
        }
        Ok(self.alloc(ExprKind::Assign { target, value }, loc))
    }

    /// `$target = &source`. Fails unless `target` is a variable.
    pub fn create_assign_ref(
        &mut self,
        target: ExprId,
        source: ExprId,
        loc: Location,
    ) -> Result<ExprId, RoleError> {
        match self.kind(target) {
            ExprKind::Var(name) => Ok(self.alloc(ExprKind::AssignRef { target: name, source }, loc)),
            _ => Err(self.role_error(Role::AssignRef, target)),
        }
    }

    /// `unset(target)`.
    pub fn create_unset(&mut self, target: ExprId, loc: Location) -> Result<ExprId, RoleError> {
        let kind = match self.kind(target) {
            ExprKind::Var(name) => ExprKind::UnsetVar(name),
            ExprKind::ArrayGet { base, index } => ExprKind::UnsetArray { base, index },
            ExprKind::FieldGet { base, field } => ExprKind::UnsetField { base, field },
            _ => return Err(self.role_error(Role::Unset, target)),
        };
        Ok(self.alloc(kind, loc))
    }

    /// `isset(target)`.
    pub fn create_isset(&mut self, target: ExprId, loc: Location) -> Result<ExprId, RoleError> {
        let kind = match self.kind(target) {
            ExprKind::Var(name) => ExprKind::IssetVar(name),
            ExprKind::ArrayGet { base, index } => ExprKind::IssetArray { base, index },
            ExprKind::FieldGet { base, field } => ExprKind::IssetField { base, field },
            _ => return Err(self.role_error(Role::Isset, target)),
        };
        Ok(self.alloc(kind, loc))
    }

    /// Role error for `id` with its location resolved.
    pub fn role_error(&self, role: Role, id: ExprId) -> RoleError {
        RoleError::new(role, self.get(id), &self.interner)
    }

    // ===== Traversal =====

    /// Direct children of `id`, in the order both backends evaluate them.
    pub fn children(&self, id: ExprId) -> Children {
        let mut out = Children::new();
        match self.kind(id) {
            ExprKind::Null
            | ExprKind::Bool(_)
            | ExprKind::Long(_)
            | ExprKind::Double(_)
            | ExprKind::String(_)
            | ExprKind::Var(_)
            | ExprKind::UnsetVar(_)
            | ExprKind::IssetVar(_) => {}
            ExprKind::ArrayGet { base, index }
            | ExprKind::UnsetArray { base, index }
            | ExprKind::IssetArray { base, index } => {
                out.push(base);
                out.push(index);
            }
            ExprKind::ArrayTail { base }
            | ExprKind::FieldGet { base, .. }
            | ExprKind::UnsetField { base, .. }
            | ExprKind::IssetField { base, .. } => out.push(base),
            ExprKind::ArrayLiteral { entries } => {
                for entry in self.get_entries(entries) {
                    out.extend(entry.key);
                    out.push(entry.value);
                }
            }
            ExprKind::Unary { operand, .. } | ExprKind::Cast { operand, .. } => out.push(operand),
            ExprKind::Binary { left, right, .. } => {
                out.push(left);
                out.push(right);
            }
            ExprKind::Assign { target, value } => {
                out.push(target);
                out.push(value);
            }
            ExprKind::AssignRef { source, .. } => out.push(source),
            ExprKind::Call { args, .. } => out.extend_from_slice(self.get_expr_list(args)),
            ExprKind::CallVar { name, args } => {
                out.push(name);
                out.extend_from_slice(self.get_expr_list(args));
            }
        }
        out
    }
}

fn range_bounds(start: usize, end: usize) -> (u32, u32) {
    let start32 = u32::try_from(start)
        .unwrap_or_else(|_| panic!("expression arena list exceeded u32::MAX entries"));
    let len = u32::try_from(end - start)
        .unwrap_or_else(|_| panic!("expression arena list exceeded u32::MAX entries"));
    (start32, len)
}

impl fmt::Debug for ExprArena {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExprArena")
            .field("exprs", &self.exprs.len())
            .field("expr_lists", &self.expr_lists.len())
            .field("entries", &self.entries.len())
            .finish_non_exhaustive()
    }
}

/// Read-only arena shared between evaluating threads.
#[derive(Clone)]
pub struct SharedArena(Arc<ExprArena>);

impl SharedArena {
    pub fn new(arena: ExprArena) -> Self {
        SharedArena(Arc::new(arena))
    }
}

impl std::ops::Deref for SharedArena {
    type Target = ExprArena;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl fmt::Debug for SharedArena {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SharedArena({} exprs)", self.0.len())
    }
}

#[cfg(test)]
mod tests;

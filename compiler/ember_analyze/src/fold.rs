//! Queries over a node's children.
//!
//! `var_state` and `is_var_assigned` share one combinator, `fold_children`,
//! so composite kinds are handled in a single place: only the kinds that
//! directly define, read or unset a variable need their own rule.

use ember_ir::{ExprArena, ExprId, ExprKind, Name};
use ember_stack::ensure_sufficient_stack;

use crate::VarState;

/// Fold `f` over the direct children of `id` in evaluation order.
pub fn fold_children<T>(
    arena: &ExprArena,
    id: ExprId,
    init: T,
    mut f: impl FnMut(T, ExprId) -> T,
) -> T {
    arena
        .children(id)
        .into_iter()
        .fold(init, |acc, child| f(acc, child))
}

/// Definedness of `var` after `id` executes.
///
/// `owner` is the node asking; it and leaves that do not mention `var`
/// answer `Unknown`. Composite nodes merge their children left to right.
pub fn var_state(arena: &ExprArena, id: ExprId, var: Name, owner: ExprId) -> VarState {
    if id == owner {
        return VarState::Unknown;
    }
    ensure_sufficient_stack(|| match arena.kind(id) {
        ExprKind::Var(name) if name == var => VarState::Valid,
        ExprKind::AssignRef { target, .. } if target == var => VarState::Valid,
        ExprKind::UnsetVar(name) if name == var => VarState::Unset,
        ExprKind::Assign { target, .. } if is_var(arena, target, var) => VarState::Valid,
        _ => combine_children_var_state(arena, id, var, owner),
    })
}

/// Left-priority merge of the children's states; `Unknown` for leaves.
fn combine_children_var_state(
    arena: &ExprArena,
    id: ExprId,
    var: Name,
    owner: ExprId,
) -> VarState {
    fold_children(arena, id, None, |acc: Option<VarState>, child| {
        let state = var_state(arena, child, var, owner);
        Some(match acc {
            Some(left) => combine_binary_var_state(left, state),
            None => state,
        })
    })
    .unwrap_or(VarState::Unknown)
}

/// State after a two-operand node whose operands produced `left` and
/// `right`.
#[inline]
pub fn combine_binary_var_state(left: VarState, right: VarState) -> VarState {
    left.merge(right)
}

/// Whether `id` (or any node below it) assigns `var`.
pub fn is_var_assigned(arena: &ExprArena, id: ExprId, var: Name) -> bool {
    ensure_sufficient_stack(|| match arena.kind(id) {
        ExprKind::Assign { target, .. } if is_var(arena, target, var) => true,
        ExprKind::AssignRef { target, .. } if target == var => true,
        _ => fold_children(arena, id, false, |acc, child| {
            acc || is_var_assigned(arena, child, var)
        }),
    })
}

fn is_var(arena: &ExprArena, id: ExprId, var: Name) -> bool {
    matches!(arena.kind(id), ExprKind::Var(name) if name == var)
}

#[cfg(test)]
mod tests;

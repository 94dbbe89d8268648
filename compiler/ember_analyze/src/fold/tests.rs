use super::*;
use ember_ir::{BinaryOp, Location};

fn loc() -> Location {
    Location::UNKNOWN
}

#[test]
fn test_leaf_states() {
    let mut arena = ExprArena::new();
    let x = arena.var("x", loc());
    let y = arena.var("y", loc());
    let lit = arena.long(1, loc());
    let var = arena.intern("x");

    assert_eq!(var_state(&arena, x, var, ExprId::INVALID), VarState::Valid);
    assert_eq!(var_state(&arena, y, var, ExprId::INVALID), VarState::Unknown);
    assert_eq!(var_state(&arena, lit, var, ExprId::INVALID), VarState::Unknown);
    // The asking node itself does not count.
    assert_eq!(var_state(&arena, x, var, x), VarState::Unknown);
}

#[test]
fn test_unset_wins_from_the_left() {
    let mut arena = ExprArena::new();
    let x = arena.var("x", loc());
    let unset = arena.create_unset(x, loc()).unwrap_or(ExprId::INVALID);
    let read = arena.var("x", loc());
    let both = arena.binary(BinaryOp::Concat, unset, read, loc());
    let var = arena.intern("x");
    assert_eq!(var_state(&arena, both, var, ExprId::INVALID), VarState::Unset);

    let flipped = arena.binary(BinaryOp::Concat, read, unset, loc());
    assert_eq!(
        var_state(&arena, flipped, var, ExprId::INVALID),
        VarState::Unset
    );
}

#[test]
fn test_assignment_defines() {
    let mut arena = ExprArena::new();
    let x = arena.var("x", loc());
    let one = arena.long(1, loc());
    let assign = arena.create_assign(x, one, loc()).unwrap_or(ExprId::INVALID);
    let var = arena.intern("x");
    let other = arena.intern("y");
    assert_eq!(var_state(&arena, assign, var, ExprId::INVALID), VarState::Valid);
    assert_eq!(
        var_state(&arena, assign, other, ExprId::INVALID),
        VarState::Unknown
    );
}

#[test]
fn test_is_var_assigned_searches_subtrees() {
    let mut arena = ExprArena::new();
    let x = arena.var("x", loc());
    let one = arena.long(1, loc());
    let assign = arena.create_assign(x, one, loc()).unwrap_or(ExprId::INVALID);
    let two = arena.long(2, loc());
    let sum = arena.binary(BinaryOp::Add, two, assign, loc());
    let call = arena.call("f", [sum], loc());

    let a = arena.var("a", loc());
    let b = arena.var("b", loc());
    let by_ref = arena.create_assign_ref(a, b, loc()).unwrap_or(ExprId::INVALID);

    let x_name = arena.intern("x");
    let a_name = arena.intern("a");
    let b_name = arena.intern("b");
    assert!(is_var_assigned(&arena, call, x_name));
    assert!(!is_var_assigned(&arena, call, a_name));
    assert!(is_var_assigned(&arena, by_ref, a_name));
    assert!(!is_var_assigned(&arena, by_ref, b_name));
}

#[test]
fn test_fold_children_visits_in_order() {
    let mut arena = ExprArena::new();
    let a = arena.long(1, loc());
    let b = arena.long(2, loc());
    let c = arena.long(3, loc());
    let call = arena.call("f", [a, b, c], loc());
    let seen = fold_children(&arena, call, Vec::new(), |mut acc, child| {
        acc.push(child);
        acc
    });
    assert_eq!(seen, vec![a, b, c]);
}

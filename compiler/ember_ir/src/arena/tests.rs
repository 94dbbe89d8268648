use super::*;
use pretty_assertions::assert_eq;

fn at(arena: &ExprArena, line: u32) -> Location {
    Location::new(arena.intern("test.php"), line)
}

#[test]
fn test_builders_allocate_in_order() {
    let mut arena = ExprArena::new();
    let loc = at(&arena, 1);
    let a = arena.long(1, loc);
    let b = arena.long(2, loc);
    let sum = arena.binary(BinaryOp::Add, a, b, loc);
    assert_eq!(a.index(), 0);
    assert_eq!(b.index(), 1);
    assert_eq!(sum.index(), 2);
    assert_eq!(arena.len(), 3);
    assert_eq!(
        arena.kind(sum),
        ExprKind::Binary {
            op: BinaryOp::Add,
            left: a,
            right: b
        }
    );
}

#[test]
fn test_call_args_are_listed() {
    let mut arena = ExprArena::new();
    let loc = at(&arena, 1);
    let args: Vec<ExprId> = (0..6).map(|i| arena.long(i, loc)).collect();
    let call = arena.call("strlen", args.iter().copied(), loc);
    let ExprKind::Call { name, args: range } = arena.kind(call) else {
        panic!("expected call");
    };
    assert_eq!(arena.interner().lookup(name), "strlen");
    assert_eq!(arena.get_expr_list(range), args.as_slice());
}

#[test]
fn test_create_assign_rejects_literal_with_line() {
    let mut arena = ExprArena::new();
    let lit = arena.long(5, at(&arena, 12));
    let value = arena.long(6, at(&arena, 12));
    let err = arena
        .create_assign(lit, value, at(&arena, 12))
        .expect_err("literal is not assignable");
    assert_eq!(err.line, 12);
    assert_eq!(err.file, "test.php");
    assert_eq!(err.role, Role::Assign);
    assert_eq!(err.to_string(), "test.php:12: cannot assign to a literal");
}

#[test]
fn test_create_assign_accepts_storage() {
    let mut arena = ExprArena::new();
    let loc = at(&arena, 1);
    let var = arena.var("a", loc);
    let tail = arena.array_tail(var, loc);
    let value = arena.long(1, loc);
    assert!(arena.create_assign(var, value, loc).is_ok());
    assert!(arena.create_assign(tail, value, loc).is_ok());
}

#[test]
fn test_create_assign_ref_requires_variable() {
    let mut arena = ExprArena::new();
    let loc = at(&arena, 4);
    let a = arena.var("a", loc);
    let idx = arena.long(0, loc);
    let elem = arena.array_get(a, idx, loc);
    let b = arena.var("b", loc);
    assert!(arena.create_assign_ref(a, b, loc).is_ok());
    let err = arena
        .create_assign_ref(elem, b, loc)
        .expect_err("array element is not a reference target");
    assert_eq!(err.role, Role::AssignRef);
    assert_eq!(err.node, "an array element");
}

#[test]
fn test_create_unset_maps_storage_kinds() {
    let mut arena = ExprArena::new();
    let loc = at(&arena, 2);
    let a = arena.var("a", loc);
    let k = arena.string("k", loc);
    let elem = arena.array_get(a, k, loc);
    let unset = arena.create_unset(elem, loc).unwrap_or(ExprId::INVALID);
    assert_eq!(arena.kind(unset), ExprKind::UnsetArray { base: a, index: k });

    let call = arena.call("f", [], at(&arena, 9));
    let err = arena.create_unset(call, loc).expect_err("calls cannot be unset");
    assert_eq!(err.to_string(), "test.php:9: cannot unset a function call");
}

#[test]
fn test_create_isset_rejects_array_tail() {
    let mut arena = ExprArena::new();
    let loc = at(&arena, 3);
    let a = arena.var("a", loc);
    let tail = arena.array_tail(a, loc);
    let err = arena.create_isset(tail, loc).expect_err("tail has no value");
    assert_eq!(err.role, Role::Isset);
}

#[test]
fn test_children_follow_evaluation_order() {
    let mut arena = ExprArena::new();
    let loc = at(&arena, 1);
    let f = arena.var("f", loc);
    let a = arena.long(1, loc);
    let b = arena.long(2, loc);
    let call = arena.call_var(f, [a, b], loc);
    assert_eq!(arena.children(call).as_slice(), &[f, a, b]);

    let k = arena.string("k", loc);
    let lit = arena.array_literal([ArrayEntry::keyed(k, a), ArrayEntry::positional(b)], loc);
    assert_eq!(arena.children(lit).as_slice(), &[k, a, b]);
}

#[test]
fn test_shared_arena_derefs() {
    let mut arena = ExprArena::new();
    let loc = at(&arena, 1);
    let id = arena.null(loc);
    let shared = SharedArena::new(arena);
    assert_eq!(shared.kind(id), ExprKind::Null);
}

use super::*;
use crate::{buffer_handler, ArgMode, Callable, FunctionTable, NativeFunction};
use ember_ir::{BinaryOp, Location, Name, Role, RoleError};
use ember_value::Var;
use parking_lot::Mutex;
use pretty_assertions::assert_eq;
use std::sync::Arc;

fn loc() -> Location {
    Location::UNKNOWN
}

fn env_for(arena: &ExprArena) -> Environment {
    Environment::builder()
        .interner(arena.interner().clone())
        .print_handler(buffer_handler())
        .build()
}

fn env_with(arena: &ExprArena, functions: FunctionTable) -> Environment {
    Environment::builder()
        .interner(arena.interner().clone())
        .functions(functions)
        .print_handler(buffer_handler())
        .build()
}

fn ok<T: Default>(r: Result<T, RoleError>) -> T {
    r.unwrap_or_default()
}

#[test]
fn test_literals_and_arithmetic() {
    let mut arena = ExprArena::new();
    let seven = arena.long(7, loc());
    let ten = arena.long(10, loc());
    let sub = arena.binary(BinaryOp::Sub, seven, ten, loc());
    let half = arena.double(0.5, loc());
    let mixed = arena.binary(BinaryOp::Add, sub, half, loc());

    let mut env = env_for(&arena);
    let eval = Evaluator::new(&arena);
    assert_eq!(eval.eval(&mut env, sub), Ok(Value::Long(-3)));
    assert_eq!(eval.eval(&mut env, mixed), Ok(Value::Double(-2.5)));
}

#[test]
fn test_division_is_double() {
    let mut arena = ExprArena::new();
    let four = arena.long(4, loc());
    let two = arena.long(2, loc());
    let div = arena.binary(BinaryOp::Div, four, two, loc());
    let mut env = env_for(&arena);
    let eval = Evaluator::new(&arena);
    assert_eq!(eval.eval(&mut env, div), Ok(Value::Double(2.0)));
    assert_eq!(eval.eval_double(&mut env, div), Ok(2.0));
}

#[test]
fn test_modulo_by_zero_fails() {
    let mut arena = ExprArena::new();
    let one = arena.long(1, loc());
    let zero = arena.long(0, loc());
    let rem = arena.binary(BinaryOp::Mod, one, zero, loc());
    let mut env = env_for(&arena);
    let eval = Evaluator::new(&arena);
    assert_eq!(eval.eval(&mut env, rem), Err(EvalError::ModuloByZero));
    assert_eq!(eval.eval_long(&mut env, rem), Err(EvalError::ModuloByZero));
}

#[test]
fn test_nested_assignment_autovivifies() {
    // $a['x'][] = 1; $a['x'][] = 2;
    let mut arena = ExprArena::new();
    let push = |arena: &mut ExprArena, n: i64| {
        let a = arena.var("a", loc());
        let key = arena.string("x", loc());
        let elem = arena.array_get(a, key, loc());
        let tail = arena.array_tail(elem, loc());
        let value = arena.long(n, loc());
        ok(arena.create_assign(tail, value, loc()))
    };
    let first = push(&mut arena, 1);
    let second = push(&mut arena, 2);

    let mut env = env_for(&arena);
    let eval = Evaluator::new(&arena);
    assert_eq!(eval.eval(&mut env, first), Ok(Value::Long(1)));
    assert_eq!(eval.eval(&mut env, second), Ok(Value::Long(2)));

    let a = env.intern("a");
    let inner = env.get_variable(a).get(&Value::string("x"));
    assert_eq!(inner, Value::list([Value::Long(1), Value::Long(2)]));
}

#[test]
fn test_field_assignment_creates_object() {
    let mut arena = ExprArena::new();
    let o = arena.var("o", loc());
    let field = arena.field_get(o, "name", loc());
    let value = arena.string("ember", loc());
    let assign = ok(arena.create_assign(field, value, loc()));
    let o2 = arena.var("o", loc());
    let read = arena.field_get(o2, "name", loc());

    let mut env = env_for(&arena);
    let eval = Evaluator::new(&arena);
    let _ = eval.eval(&mut env, assign);
    assert_eq!(eval.eval(&mut env, read), Ok(Value::string("ember")));
}

#[test]
fn test_comparing_self_referencing_objects_fails() {
    // $o->me = $o; $p->me = $p; $o == $p
    let mut arena = ExprArena::new();
    let link = |arena: &mut ExprArena, name: &str| {
        let target = arena.var(name, loc());
        let field = arena.field_get(target, "me", loc());
        let value = arena.var(name, loc());
        ok(arena.create_assign(field, value, loc()))
    };
    let link_o = link(&mut arena, "o");
    let link_p = link(&mut arena, "p");
    let o = arena.var("o", loc());
    let p = arena.var("p", loc());
    let eq = arena.binary(BinaryOp::Eq, o, p, loc());
    let same = arena.binary(BinaryOp::Eq, o, o, loc());

    let mut env = env_for(&arena);
    let eval = Evaluator::new(&arena);
    assert!(eval.eval(&mut env, link_o).is_ok());
    assert!(eval.eval(&mut env, link_p).is_ok());
    assert_eq!(eval.eval(&mut env, eq), Err(EvalError::NestingTooDeep));
    assert_eq!(eval.eval_boolean(&mut env, eq), Err(EvalError::NestingTooDeep));
    assert_eq!(eval.eval(&mut env, same), Ok(Value::Bool(true)));
}

#[test]
fn test_assignment_copies_arrays() {
    // $a = [1]; $b = $a; $b[] = 2;
    let mut arena = ExprArena::new();
    let one = arena.long(1, loc());
    let literal = arena.array_literal([ArrayEntry::positional(one)], loc());
    let a = arena.var("a", loc());
    let set_a = ok(arena.create_assign(a, literal, loc()));
    let a2 = arena.var("a", loc());
    let b = arena.var("b", loc());
    let set_b = ok(arena.create_assign(b, a2, loc()));
    let b2 = arena.var("b", loc());
    let tail = arena.array_tail(b2, loc());
    let two = arena.long(2, loc());
    let push = ok(arena.create_assign(tail, two, loc()));

    let mut env = env_for(&arena);
    let eval = Evaluator::new(&arena);
    for id in [set_a, set_b, push] {
        assert!(eval.eval_top(&mut env, id).is_ok());
    }
    assert_eq!(env.get_variable(arena.intern("a")).count(), 1);
    assert_eq!(env.get_variable(arena.intern("b")).count(), 2);
}

#[test]
fn test_assign_ref_aliases() {
    // $b =& $a; $b = 5;
    let mut arena = ExprArena::new();
    let b = arena.var("b", loc());
    let a = arena.var("a", loc());
    let alias = ok(arena.create_assign_ref(b, a, loc()));
    let b2 = arena.var("b", loc());
    let five = arena.long(5, loc());
    let set = ok(arena.create_assign(b2, five, loc()));

    let mut env = env_for(&arena);
    let eval = Evaluator::new(&arena);
    assert_eq!(eval.eval(&mut env, alias), Ok(Value::Null));
    assert_eq!(eval.eval(&mut env, set), Ok(Value::Long(5)));
    assert_eq!(env.get_variable(arena.intern("a")), Value::Long(5));
}

#[test]
fn test_unset_array_key_then_isset_is_false() {
    let mut arena = ExprArena::new();
    let a = arena.var("a", loc());
    let k = arena.string("k", loc());
    let elem = arena.array_get(a, k, loc());
    let unset = ok(arena.create_unset(elem, loc()));
    let a2 = arena.var("a", loc());
    let k2 = arena.string("k", loc());
    let elem2 = arena.array_get(a2, k2, loc());
    let isset = ok(arena.create_isset(elem2, loc()));

    let mut env = env_for(&arena);
    let array = Value::empty_array();
    let _ = array.put(&Value::string("k"), Value::Long(1));
    env.set_variable(arena.intern("a"), array);

    let eval = Evaluator::new(&arena);
    assert_eq!(eval.eval(&mut env, isset), Ok(Value::Bool(true)));
    assert_eq!(eval.eval(&mut env, unset), Ok(Value::Long(1)));
    assert_eq!(eval.eval(&mut env, isset), Ok(Value::Bool(false)));
    // Removing an absent key does not fail.
    assert_eq!(eval.eval(&mut env, unset), Ok(Value::Unset));
}

#[test]
fn test_eval_value_reports_missing_elements_as_null() {
    let mut arena = ExprArena::new();
    let a = arena.var("a", loc());
    let k = arena.string("missing", loc());
    let elem = arena.array_get(a, k, loc());
    let mut env = env_for(&arena);
    env.set_variable(arena.intern("a"), Value::empty_array());
    let eval = Evaluator::new(&arena);
    assert_eq!(eval.eval(&mut env, elem), Ok(Value::Unset));
    assert_eq!(eval.eval_value(&mut env, elem), Ok(Value::Null));
}

#[test]
fn test_unset_string_offset_fails() {
    let mut arena = ExprArena::new();
    let s = arena.var("s", loc());
    let zero = arena.long(0, loc());
    let elem = arena.array_get(s, zero, loc());
    let unset = ok(arena.create_unset(elem, loc()));
    let mut env = env_for(&arena);
    env.set_variable(arena.intern("s"), Value::string("abc"));
    let eval = Evaluator::new(&arena);
    assert_eq!(eval.eval(&mut env, unset), Err(EvalError::StringOffsetUnset));
}

#[test]
fn test_reading_array_tail_fails() {
    let mut arena = ExprArena::new();
    let a = arena.var("a", loc());
    let tail = arena.array_tail(a, loc());
    let mut env = env_for(&arena);
    let eval = Evaluator::new(&arena);
    assert_eq!(eval.eval(&mut env, tail), Err(EvalError::ArrayTailRead));
}

#[test]
fn test_lvalue_contexts_reject_non_storage() {
    let mut arena = ExprArena::new();
    let file = arena.intern("main.php");
    let lit = arena.long(1, Location::new(file, 7));
    let mut env = env_for(&arena);
    let eval = Evaluator::new(&arena);

    let err = eval.eval_assign(&mut env, lit, Value::Null);
    assert_eq!(
        err.map_err(|e| e.to_string()),
        Err("main.php:7: cannot assign to a literal".to_owned())
    );
    assert_eq!(
        eval.eval_unset(&mut env, lit),
        Err(EvalError::Role(arena.role_error(Role::Unset, lit)))
    );
    assert!(eval.eval_isset(&mut env, lit).is_err());
    assert!(eval.eval_assign_ref(&mut env, lit, Var::default()).is_err());
}

#[test]
fn test_lvalue_contexts_on_storage() {
    let mut arena = ExprArena::new();
    let x = arena.var("x", loc());
    let mut env = env_for(&arena);
    let eval = Evaluator::new(&arena);
    assert_eq!(eval.eval_isset(&mut env, x), Ok(false));
    assert_eq!(eval.eval_assign(&mut env, x, Value::Long(3)), Ok(Value::Long(3)));
    assert_eq!(eval.eval_isset(&mut env, x), Ok(true));
    assert_eq!(eval.eval_unset(&mut env, x), Ok(Value::Null));
    assert_eq!(eval.eval_isset(&mut env, x), Ok(false));

    let shared = Var::new(Value::Long(9));
    assert_eq!(eval.eval_assign_ref(&mut env, x, shared.clone()), Ok(Value::Long(9)));
    shared.set(Value::Long(10));
    assert_eq!(eval.eval(&mut env, x), Ok(Value::Long(10)));
}

/// Records which entry point each call came through.
#[derive(Default)]
struct Recorder {
    calls: Mutex<Vec<(&'static str, Vec<Value>)>>,
}

impl Recorder {
    fn record(&self, entry: &'static str, args: Vec<Value>) -> EvalResult {
        let count = i64::try_from(args.len()).unwrap_or_default();
        self.calls.lock().push((entry, args));
        Ok(Value::Long(count))
    }
}

impl Callable for Recorder {
    fn name(&self) -> &str {
        "record"
    }

    fn call_args(&self, _env: &mut Environment, args: &[Value]) -> EvalResult {
        self.record("call_args", args.to_vec())
    }

    fn call0(&self, _env: &mut Environment) -> EvalResult {
        self.record("call0", vec![])
    }

    fn call2(&self, _env: &mut Environment, a0: Value, a1: Value) -> EvalResult {
        self.record("call2", vec![a0, a1])
    }

    fn call5(
        &self,
        _env: &mut Environment,
        a0: Value,
        a1: Value,
        a2: Value,
        a3: Value,
        a4: Value,
    ) -> EvalResult {
        self.record("call5", vec![a0, a1, a2, a3, a4])
    }
}

fn recorder_table(recorder: &Arc<Recorder>) -> FunctionTable {
    let mut table = FunctionTable::new();
    let callable: Arc<dyn Callable> = Arc::clone(recorder) as Arc<dyn Callable>;
    table.register_arc(callable);
    table
}

#[test]
fn test_call_abi_threshold() {
    let mut arena = ExprArena::new();
    let name = arena.string("RECORD", loc());
    let five: Vec<ExprId> = (1..=5).map(|n| arena.long(n, loc())).collect();
    let six: Vec<ExprId> = (1..=6).map(|n| arena.long(n, loc())).collect();
    let call5 = arena.call_var(name, five, loc());
    let call6 = arena.call("record", six, loc());
    let call0 = arena.call("record", [], loc());

    let recorder = Arc::new(Recorder::default());
    let mut env = env_with(&arena, recorder_table(&recorder));
    let eval = Evaluator::new(&arena);
    assert_eq!(eval.eval(&mut env, call5), Ok(Value::Long(5)));
    assert_eq!(eval.eval(&mut env, call6), Ok(Value::Long(6)));
    assert_eq!(eval.eval(&mut env, call0), Ok(Value::Long(0)));

    let calls = recorder.calls.lock();
    let entries: Vec<&str> = calls.iter().map(|(entry, _)| *entry).collect();
    assert_eq!(entries, vec!["call5", "call_args", "call0"]);
    assert_eq!(calls[1].1, (1..=6).map(Value::Long).collect::<Vec<_>>());
}

#[test]
fn test_call_errors() {
    let mut arena = ExprArena::new();
    let missing = arena.call("nope", [], loc());
    let number = arena.long(3, loc());
    let not_callable = arena.call_var(number, [], loc());
    let mut env = env_for(&arena);
    let eval = Evaluator::new(&arena);
    assert_eq!(
        eval.eval(&mut env, missing),
        Err(EvalError::UndefinedFunction {
            name: "nope".into()
        })
    );
    assert_eq!(
        eval.eval(&mut env, not_callable),
        Err(EvalError::NotCallable { type_name: "int" })
    );
}

#[test]
fn test_arguments_follow_arg_modes() {
    // array_push($list, 1) autovivifies $list; strlen($s) copies.
    let mut arena = ExprArena::new();
    let list = arena.var("list", loc());
    let one = arena.long(1, loc());
    let push = arena.call("array_push", [list, one], loc());

    let mut env = env_for(&arena);
    let eval = Evaluator::new(&arena);
    assert_eq!(eval.eval(&mut env, push), Ok(Value::Long(1)));
    assert_eq!(eval.eval(&mut env, push), Ok(Value::Long(2)));
    assert_eq!(
        env.get_variable(arena.intern("list")),
        Value::list([Value::Long(1), Value::Long(1)])
    );
}

#[test]
fn test_by_value_argument_is_a_copy() {
    let mut arena = ExprArena::new();
    let a = arena.var("a", loc());
    let mutate = arena.call("mutate", [a], loc());
    let mut table = FunctionTable::new();
    table.register(NativeFunction::new("mutate", |_, args| {
        args[0].append(Value::Long(99))
    }));
    let mut env = env_with(&arena, table);
    env.set_variable(arena.intern("a"), Value::list([Value::Long(1)]));

    let eval = Evaluator::new(&arena);
    assert_eq!(eval.eval(&mut env, mutate), Ok(Value::Long(99)));
    assert_eq!(env.get_variable(arena.intern("a")).count(), 1);

    let mut by_ref = FunctionTable::new();
    by_ref.register(
        NativeFunction::new("mutate", |_, args| args[0].append(Value::Long(99)))
            .with_arg_modes([ArgMode::Ref]),
    );
    let mut env = env_with(&arena, by_ref);
    env.set_variable(arena.intern("a"), Value::list([Value::Long(1)]));
    assert_eq!(eval.eval(&mut env, mutate), Ok(Value::Long(99)));
    assert_eq!(env.get_variable(arena.intern("a")).count(), 2);
}

fn counter_table() -> FunctionTable {
    let mut table = FunctionTable::new();
    table.register(
        NativeFunction::new("inc", |env, args| {
            let next = args[0].add(&Value::Long(1));
            if let Some(cell) = env.ref_arg(0) {
                cell.set(next.clone());
            }
            Ok(next)
        })
        .with_arg_modes([ArgMode::Ref]),
    );
    table
}

#[test]
fn test_by_ref_argument_updates_scalar() {
    // inc($n); inc($n); inc($m); inc(5)
    let mut arena = ExprArena::new();
    let n = arena.var("n", loc());
    let inc = arena.call("inc", [n], loc());
    let m = arena.var("m", loc());
    let inc_unbound = arena.call("inc", [m], loc());
    let five = arena.long(5, loc());
    let inc_literal = arena.call("inc", [five], loc());

    let mut env = env_with(&arena, counter_table());
    env.set_variable(arena.intern("n"), Value::Long(1));
    let eval = Evaluator::new(&arena);
    assert_eq!(eval.eval(&mut env, inc), Ok(Value::Long(2)));
    assert_eq!(eval.eval(&mut env, inc), Ok(Value::Long(3)));
    assert_eq!(env.get_variable(arena.intern("n")), Value::Long(3));

    assert_eq!(eval.eval(&mut env, inc_unbound), Ok(Value::Long(1)));
    assert_eq!(env.get_variable(arena.intern("m")), Value::Long(1));

    assert_eq!(eval.eval(&mut env, inc_literal), Ok(Value::Long(6)));
    assert_eq!(env.get_variable(arena.intern("n")), Value::Long(3));
}

#[test]
fn test_by_value_argument_has_no_cell() {
    let mut arena = ExprArena::new();
    let n = arena.var("n", loc());
    let call = arena.call("peek", [n], loc());
    let mut table = FunctionTable::new();
    table.register_native("peek", |env, _| Ok(Value::Bool(env.ref_arg(0).is_some())));
    let mut env = env_with(&arena, table);
    let eval = Evaluator::new(&arena);
    assert_eq!(eval.eval(&mut env, call), Ok(Value::Bool(false)));
}

#[test]
fn test_eval_ref_returns_the_variable_cell() {
    let mut arena = ExprArena::new();
    let x = arena.var("x", loc());
    let lit = arena.long(4, loc());
    let mut env = env_for(&arena);
    let eval = Evaluator::new(&arena);
    let cell = eval.eval_ref(&mut env, x).unwrap_or_default();
    cell.set(Value::Long(1));
    assert_eq!(env.get_variable(arena.intern("x")), Value::Long(1));
    assert_eq!(
        eval.eval_ref(&mut env, lit).map(|v| v.get()),
        Ok(Value::Long(4))
    );
}

#[test]
fn test_array_literal_keys() {
    let mut arena = ExprArena::new();
    let k = arena.string("k", loc());
    let v = arena.long(1, loc());
    let p = arena.long(2, loc());
    let literal = arena.array_literal(
        [ArrayEntry::keyed(k, v), ArrayEntry::positional(p)],
        loc(),
    );
    let mut env = env_for(&arena);
    let eval = Evaluator::new(&arena);
    let value = eval.eval(&mut env, literal).unwrap_or_default();
    assert_eq!(value.get(&Value::string("k")), Value::Long(1));
    assert_eq!(value.get(&Value::Long(0)), Value::Long(2));
}

#[test]
fn test_primitive_contexts_agree_with_eval() {
    let mut arena = ExprArena::new();
    let s = arena.string("12abc", loc());
    let two = arena.long(2, loc());
    let concat = arena.binary(BinaryOp::Concat, s, two, loc());
    let lt = arena.binary(BinaryOp::Lt, s, two, loc());
    let cast = arena.cast(ember_ir::CastType::Long, concat, loc());
    let mut env = env_for(&arena);
    let eval = Evaluator::new(&arena);

    for id in [s, two, concat, lt, cast] {
        let value = eval.eval(&mut env, id).unwrap_or_default();
        assert_eq!(eval.eval_string(&mut env, id), Ok(value.to_string()));
        assert_eq!(eval.eval_long(&mut env, id), Ok(value.to_long()));
        assert_eq!(eval.eval_boolean(&mut env, id), Ok(value.to_boolean()));
        assert_eq!(eval.eval_char(&mut env, id), Ok(value.to_char()));
    }
}

#[test]
fn test_echo_statements() {
    let mut arena = ExprArena::new();
    let four = arena.long(4, loc());
    let two = arena.long(2, loc());
    let div = arena.binary(BinaryOp::Div, four, two, loc());
    let greeting = arena.string("hi ", loc());
    let x = arena.var("x", loc());
    let isset = ok(arena.create_isset(x, loc()));
    let statements = [
        Statement::echo(greeting),
        Statement::echo(div),
        Statement::echo(isset),
        Statement::expr(four),
    ];
    let mut env = env_for(&arena);
    let eval = Evaluator::new(&arena);
    assert_eq!(eval.run(&mut env, &statements), Ok(()));
    assert_eq!(env.output(), "hi 2");
}

#[test]
fn test_deep_nesting_does_not_overflow() {
    let mut arena = ExprArena::new();
    let mut id = arena.long(0, loc());
    for _ in 0..100_000 {
        let one = arena.long(1, loc());
        id = arena.binary(BinaryOp::Add, id, one, loc());
    }
    let mut env = env_for(&arena);
    let eval = Evaluator::new(&arena);
    assert_eq!(eval.eval(&mut env, id), Ok(Value::Long(100_000)));
}

#[test]
fn test_unused_name_is_harmless() {
    let arena = ExprArena::new();
    let env = env_for(&arena);
    assert_eq!(env.get_variable(Name::EMPTY), Value::Null);
}

//! Error surfaces shared by the builder and both backends.

#![allow(clippy::unwrap_used, clippy::expect_used, reason = "Tests can panic")]

mod common;

use common::AT;
use ember::{
    BinaryOp, CodegenError, EvalError, ExprArena, ExprId, ExprKind, Location, OutputMode,
    Program, Role, Statement, Value,
};
use pretty_assertions::assert_eq;

#[test]
fn test_builder_role_errors_carry_the_line() {
    let mut arena = ExprArena::new();
    let file = arena.intern("page.php");
    let one = arena.long(1, Location::new(file, 12));
    let two = arena.long(2, AT);
    let sum = arena.binary(BinaryOp::Add, one, two, Location::new(file, 13));

    let error = arena.create_assign(one, two, AT).unwrap_err();
    assert_eq!(error.to_string(), "page.php:12: cannot assign to a literal");
    assert_eq!(error.line, 12);

    let error = arena.create_unset(sum, AT).unwrap_err();
    assert_eq!(error.role, Role::Unset);
    assert_eq!(error.line, 13);

    let error = arena.create_isset(one, AT).unwrap_err();
    assert_eq!(error.role, Role::Isset);

    let x = arena.var("x", AT);
    let element = arena.array_get(x, one, Location::new(file, 14));
    let error = arena.create_assign_ref(element, two, AT).unwrap_err();
    assert_eq!(error.role, Role::AssignRef);
    assert_eq!(error.line, 14);
}

#[test]
fn test_backends_report_role_errors_for_raw_nodes() {
    // A node allocated without the checking builder.
    let mut arena = ExprArena::new();
    let file = arena.intern("raw.php");
    let literal = arena.string("s", Location::new(file, 3));
    let value = arena.long(1, AT);
    let assign = arena.alloc(
        ExprKind::Assign {
            target: literal,
            value,
        },
        AT,
    );
    let program = Program::new(arena, vec![Statement::expr(assign)]);

    let mut env = program.environment();
    let Err(EvalError::Role(error)) = program.run(&mut env) else {
        panic!("expected a role error from the evaluator");
    };
    assert_eq!(error.to_string(), "raw.php:3: cannot assign to a literal");

    let Err(CodegenError::Role(error)) = program.compile() else {
        panic!("expected a role error from the compiler");
    };
    assert_eq!(error.line, 3);
}

#[test]
fn test_division_always_produces_a_double() {
    let mut arena = ExprArena::new();
    let four = arena.long(4, AT);
    let two = arena.long(2, AT);
    let div = arena.binary(BinaryOp::Div, four, two, AT);
    let zero = arena.long(0, AT);
    let by_zero = arena.binary(BinaryOp::Div, four, zero, AT);
    let program = Program::builder().output(OutputMode::Silent).build(
        arena,
        vec![Statement::expr(div), Statement::expr(by_zero)],
    );
    let mut env = program.environment();
    assert_eq!(program.evaluate(&mut env, div), Ok(Value::Double(2.0)));
    assert_eq!(
        program.evaluate(&mut env, by_zero),
        Ok(Value::Double(f64::INFINITY))
    );
    assert_eq!(
        program.analysis().hint(div),
        Some(ember::StaticType::Double)
    );
}

#[test]
fn test_runtime_errors_propagate_unchanged() {
    let mut arena = ExprArena::new();
    let seven = arena.long(7, AT);
    let zero = arena.long(0, AT);
    let rem = arena.binary(BinaryOp::Mod, seven, zero, AT);
    let missing = arena.call("no_such_function", [], AT);
    let number = arena.long(5, AT);
    let not_callable = arena.call_var(number, [], AT);
    let program = Program::builder()
        .output(OutputMode::Silent)
        .build(arena, vec![Statement::echo(rem)]);
    let mut env = program.environment();

    assert_eq!(program.run(&mut env), Err(EvalError::ModuloByZero));
    assert_eq!(
        program.evaluator().eval(&mut env, missing),
        Err(EvalError::UndefinedFunction {
            name: "no_such_function".into()
        })
    );
    assert_eq!(
        program.evaluator().eval(&mut env, not_callable),
        Err(EvalError::NotCallable { type_name: "int" })
    );
}

#[test]
fn test_compiling_an_unanalyzed_node_fails() {
    let mut arena = ExprArena::new();
    let analyzed = arena.long(1, AT);
    let stray: ExprId = arena.long(2, AT);
    let program = Program::new(arena, vec![Statement::expr(analyzed)]);
    assert_eq!(
        program.compile_value("f", stray),
        Err(ember_codegen::not_analyzed(stray))
    );
}

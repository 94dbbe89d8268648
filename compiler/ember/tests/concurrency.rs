//! One analyzed tree, many environments on many threads.

#![allow(clippy::unwrap_used, clippy::expect_used, reason = "Tests can panic")]

mod common;

use common::{assign, AT};
use ember::{BinaryOp, ExprArena, OutputMode, Program, Statement, Value};
use pretty_assertions::assert_eq;

/// `$out = $n * 3 - 1; $list[] = $out; echo $out;`
fn program() -> Program {
    let mut arena = ExprArena::new();
    let n = arena.var("n", AT);
    let three = arena.long(3, AT);
    let product = arena.binary(BinaryOp::Mul, n, three, AT);
    let one = arena.long(1, AT);
    let diff = arena.binary(BinaryOp::Sub, product, one, AT);
    let set = assign(&mut arena, "out", diff);

    let list = arena.var("list", AT);
    let tail = arena.array_tail(list, AT);
    let out = arena.var("out", AT);
    let append = arena.create_assign(tail, out, AT).unwrap();
    let out = arena.var("out", AT);

    Program::builder().output(OutputMode::Buffer).build(
        arena,
        vec![
            Statement::expr(set),
            Statement::expr(append),
            Statement::echo(out),
        ],
    )
}

#[test]
fn test_parallel_runs_are_independent() {
    let program = program();
    let mut envs: Vec<_> = (0..64)
        .map(|n| program.environment_builder().variable("n", Value::Long(n)).build())
        .collect();

    let results = program.run_parallel(&mut envs);
    assert!(results.iter().all(Result::is_ok));

    let out = program.arena().intern("out");
    let list = program.arena().intern("list");
    for (n, env) in (0_i64..).zip(&envs) {
        assert_eq!(env.get_variable(out), Value::Long(n * 3 - 1));
        assert_eq!(env.get_variable(list), Value::list([Value::Long(n * 3 - 1)]));
        assert_eq!(env.output(), (n * 3 - 1).to_string());
    }
}

#[test]
fn test_scoped_threads_share_one_program() {
    let program = program();
    let outputs: Vec<String> = std::thread::scope(|scope| {
        let handles: Vec<_> = (0..8_i64)
            .map(|n| {
                let program = &program;
                scope.spawn(move || {
                    let mut env = program
                        .environment_builder()
                        .variable("n", Value::Long(n))
                        .build();
                    for _ in 0..100 {
                        program.run(&mut env).unwrap();
                    }
                    let list = program.arena().intern("list");
                    assert_eq!(env.get_variable(list).count(), 100);
                    env.output()
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });
    for (n, output) in (0_i64..).zip(outputs) {
        assert_eq!(output, (n * 3 - 1).to_string().repeat(100));
    }
}

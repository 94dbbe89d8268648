//! Helpers shared by the integration tests.

#![allow(dead_code, reason = "each test binary uses a different subset")]

use std::sync::Arc;

use ember::{
    Callable, Environment, EvalResult, ExprArena, ExprId, FunctionTable, Location, Value,
};
use parking_lot::Mutex;

pub const AT: Location = Location::UNKNOWN;

/// `$name = value`.
pub fn assign(arena: &mut ExprArena, name: &str, value: ExprId) -> ExprId {
    let target = arena.var(name, AT);
    arena.create_assign(target, value, AT).unwrap()
}

/// Records which entry point each call came through.
#[derive(Default)]
pub struct Recorder {
    pub calls: Mutex<Vec<(&'static str, Vec<Value>)>>,
}

impl Recorder {
    fn record(&self, entry: &'static str, args: Vec<Value>) -> EvalResult {
        let count = args.len();
        self.calls.lock().push((entry, args));
        Ok(Value::Long(i64::try_from(count).unwrap_or(-1)))
    }

    pub fn entries(&self) -> Vec<(&'static str, Vec<Value>)> {
        self.calls.lock().clone()
    }
}

impl Callable for Recorder {
    fn name(&self) -> &str {
        "record"
    }

    fn call_args(&self, _env: &mut Environment, args: &[Value]) -> EvalResult {
        self.record("call_args", args.to_vec())
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

/// Built-ins plus `record`.
pub fn table_with(recorder: &Arc<Recorder>) -> FunctionTable {
    let mut table = FunctionTable::with_builtins();
    table.register_arc(Arc::clone(recorder) as Arc<dyn Callable>);
    table
}

//! Callables and the function table.
//!
//! Every call site, in both backends, chooses an entry point by argument
//! count: up to [`MAX_FIXED_ARITY`] arguments use `call0..call5`, anything
//! longer packs the arguments into one slice for `call_args`.

use rustc_hash::FxHashMap;
use smallvec::SmallVec;
use std::fmt;
use std::sync::Arc;

use ember_value::{EvalResult, Value, Var};

use crate::Environment;

/// Largest argument count passed through a fixed-arity entry point.
pub const MAX_FIXED_ARITY: usize = 5;

/// How the caller evaluates an argument that names storage.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
pub enum ArgMode {
    /// The callee receives a copy.
    #[default]
    Value,
    /// The callee receives the live value (containers are shared); a
    /// variable's cell is also available through `Environment::ref_arg`.
    Ref,
    /// Like `Ref`, autovivifying an array in unset storage.
    ArrayRef,
    /// Like `Ref`, autovivifying an object in unset storage.
    ObjectRef,
}

/// Caller cells of the variables passed in `ArgMode::Ref`, by argument
/// position.
///
/// A call site that passes a variable installs its cells with
/// [`Environment::with_ref_args`] for the duration of the call; the callee
/// reads them back with [`Environment::ref_arg`] and assigns through them.
#[derive(Clone, Default, Debug)]
pub struct RefArgs {
    cells: SmallVec<[Option<Var>; MAX_FIXED_ARITY]>,
}

impl RefArgs {
    pub fn new() -> Self {
        RefArgs::default()
    }

    /// Record `cell` as the argument at `index`.
    pub fn bind(&mut self, index: usize, cell: Var) {
        if self.cells.len() <= index {
            self.cells.resize(index + 1, None);
        }
        self.cells[index] = Some(cell);
    }

    pub fn get(&self, index: usize) -> Option<&Var> {
        self.cells.get(index).and_then(Option::as_ref)
    }

    pub fn is_empty(&self) -> bool {
        self.cells.iter().all(Option::is_none)
    }
}

/// A function reachable through the environment's function table.
///
/// Only `call_args` is required. The fixed-arity and reference-returning
/// entry points default to it, so an implementation can specialize any of
/// them without changing what callers observe.
pub trait Callable: Send + Sync {
    fn name(&self) -> &str;

    /// Passing mode of the parameter at `index`.
    fn arg_mode(&self, _index: usize) -> ArgMode {
        ArgMode::Value
    }

    fn call_args(&self, env: &mut Environment, args: &[Value]) -> EvalResult;

    fn call0(&self, env: &mut Environment) -> EvalResult {
        self.call_args(env, &[])
    }

    fn call1(&self, env: &mut Environment, a0: Value) -> EvalResult {
        self.call_args(env, &[a0])
    }

    fn call2(&self, env: &mut Environment, a0: Value, a1: Value) -> EvalResult {
        self.call_args(env, &[a0, a1])
    }

    fn call3(&self, env: &mut Environment, a0: Value, a1: Value, a2: Value) -> EvalResult {
        self.call_args(env, &[a0, a1, a2])
    }

    fn call4(
        &self,
        env: &mut Environment,
        a0: Value,
        a1: Value,
        a2: Value,
        a3: Value,
    ) -> EvalResult {
        self.call_args(env, &[a0, a1, a2, a3])
    }

    fn call5(
        &self,
        env: &mut Environment,
        a0: Value,
        a1: Value,
        a2: Value,
        a3: Value,
        a4: Value,
    ) -> EvalResult {
        self.call_args(env, &[a0, a1, a2, a3, a4])
    }

    /// Reference-returning counterpart of `call_args`.
    fn call_ref_args(
        &self,
        env: &mut Environment,
        args: &[Value],
    ) -> Result<Var, ember_value::EvalError> {
        self.call_args(env, args).map(Var::new)
    }

    fn call_ref0(&self, env: &mut Environment) -> Result<Var, ember_value::EvalError> {
        self.call_ref_args(env, &[])
    }

    fn call_ref1(&self, env: &mut Environment, a0: Value) -> Result<Var, ember_value::EvalError> {
        self.call_ref_args(env, &[a0])
    }

    fn call_ref2(
        &self,
        env: &mut Environment,
        a0: Value,
        a1: Value,
    ) -> Result<Var, ember_value::EvalError> {
        self.call_ref_args(env, &[a0, a1])
    }

    fn call_ref3(
        &self,
        env: &mut Environment,
        a0: Value,
        a1: Value,
        a2: Value,
    ) -> Result<Var, ember_value::EvalError> {
        self.call_ref_args(env, &[a0, a1, a2])
    }

    fn call_ref4(
        &self,
        env: &mut Environment,
        a0: Value,
        a1: Value,
        a2: Value,
        a3: Value,
    ) -> Result<Var, ember_value::EvalError> {
        self.call_ref_args(env, &[a0, a1, a2, a3])
    }

    fn call_ref5(
        &self,
        env: &mut Environment,
        a0: Value,
        a1: Value,
        a2: Value,
        a3: Value,
        a4: Value,
    ) -> Result<Var, ember_value::EvalError> {
        self.call_ref_args(env, &[a0, a1, a2, a3, a4])
    }
}

/// Body of a [`NativeFunction`].
pub type NativeBody = dyn Fn(&mut Environment, &[Value]) -> EvalResult + Send + Sync;

/// A host function backed by a Rust closure.
#[derive(Clone)]
pub struct NativeFunction {
    name: Arc<str>,
    modes: SmallVec<[ArgMode; 4]>,
    body: Arc<NativeBody>,
}

impl NativeFunction {
    pub fn new(
        name: impl Into<Arc<str>>,
        body: impl Fn(&mut Environment, &[Value]) -> EvalResult + Send + Sync + 'static,
    ) -> Self {
        NativeFunction {
            name: name.into(),
            modes: SmallVec::new(),
            body: Arc::new(body),
        }
    }

    /// Declare the passing modes of the leading parameters; the rest are
    /// passed by value.
    #[must_use]
    pub fn with_arg_modes(mut self, modes: impl IntoIterator<Item = ArgMode>) -> Self {
        self.modes = modes.into_iter().collect();
        self
    }
}

impl Callable for NativeFunction {
    fn name(&self) -> &str {
        &self.name
    }

    fn arg_mode(&self, index: usize) -> ArgMode {
        self.modes.get(index).copied().unwrap_or_default()
    }

    fn call_args(&self, env: &mut Environment, args: &[Value]) -> EvalResult {
        (self.body)(env, args)
    }
}

impl fmt::Debug for NativeFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NativeFunction")
            .field("name", &self.name)
            .field("modes", &self.modes)
            .finish_non_exhaustive()
    }
}

/// Case-insensitive map from function names to callables.
#[derive(Clone, Default)]
pub struct FunctionTable {
    functions: FxHashMap<String, Arc<dyn Callable>>,
}

impl FunctionTable {
    pub fn new() -> Self {
        FunctionTable::default()
    }

    /// A table pre-populated with the built-in functions.
    pub fn with_builtins() -> Self {
        let mut table = FunctionTable::new();
        crate::builtins::register(&mut table);
        table
    }

    /// Register `callable` under its own name, replacing any previous entry.
    pub fn register(&mut self, callable: impl Callable + 'static) {
        self.register_arc(Arc::new(callable));
    }

    pub fn register_arc(&mut self, callable: Arc<dyn Callable>) {
        let key = callable.name().to_ascii_lowercase();
        self.functions.insert(key, callable);
    }

    /// Shorthand for registering a by-value [`NativeFunction`].
    pub fn register_native(
        &mut self,
        name: &str,
        body: impl Fn(&mut Environment, &[Value]) -> EvalResult + Send + Sync + 'static,
    ) {
        self.register(NativeFunction::new(name, body));
    }

    pub fn lookup(&self, name: &str) -> Option<Arc<dyn Callable>> {
        if let Some(callable) = self.functions.get(name) {
            return Some(Arc::clone(callable));
        }
        self.functions
            .get(name.to_ascii_lowercase().as_str())
            .map(Arc::clone)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.lookup(name).is_some()
    }

    pub fn len(&self) -> usize {
        self.functions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }

    /// Registered names (lowercased), in no particular order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.functions.keys().map(String::as_str)
    }
}

impl fmt::Debug for FunctionTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<&str> = self.names().collect();
        names.sort_unstable();
        f.debug_struct("FunctionTable")
            .field("functions", &names)
            .finish()
    }
}

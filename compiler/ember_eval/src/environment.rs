//! Runtime environment: variables, functions and the output sink.
//!
//! One `Environment` per evaluation. Environments share the interner, the
//! function table and (optionally) the print handler, but never variables,
//! so many threads can evaluate one tree side by side.

use rustc_hash::FxHashMap;
use std::fmt;
use std::sync::Arc;

use ember_ir::{Name, SharedInterner};
use ember_value::{not_callable, undefined_function, EvalError, Value, Var};

use crate::print_handler::{stdout_handler, SharedPrintHandler};
use crate::shared::SharedRegistry;
use crate::{Callable, FunctionTable, RefArgs};

mod builder;

pub use builder::EnvironmentBuilder;

/// Variable bindings plus the shared runtime services.
pub struct Environment {
    vars: FxHashMap<Name, Var>,
    functions: SharedRegistry<FunctionTable>,
    print_handler: SharedPrintHandler,
    interner: SharedInterner,
    /// By-reference cells of the call in progress.
    ref_args: RefArgs,
}

impl Environment {
    /// An environment with the built-in functions, printing to stdout.
    pub fn new(interner: SharedInterner) -> Self {
        Environment {
            vars: FxHashMap::default(),
            functions: SharedRegistry::new(FunctionTable::with_builtins()),
            print_handler: stdout_handler(),
            interner,
            ref_args: RefArgs::new(),
        }
    }

    pub fn builder() -> EnvironmentBuilder {
        EnvironmentBuilder::new()
    }

    // ===== Names =====

    pub fn intern(&self, s: &str) -> Name {
        self.interner.intern(s)
    }

    pub fn interner(&self) -> &SharedInterner {
        &self.interner
    }

    // ===== Variables =====

    /// Current value of `name`; `Null` when unbound.
    pub fn get_variable(&self, name: Name) -> Value {
        self.vars.get(&name).map_or(Value::Null, Var::get)
    }

    /// The cell bound to `name`, binding a fresh `Null` cell if needed.
    pub fn get_var(&mut self, name: Name) -> Var {
        self.vars.entry(name).or_default().clone()
    }

    /// Assign through the existing cell, so references observe the write.
    pub fn set_variable(&mut self, name: Name, value: Value) {
        match self.vars.get(&name) {
            Some(var) => var.set(value),
            None => {
                self.vars.insert(name, Var::new(value));
            }
        }
    }

    /// Rebind `name` to `var` (assignment by reference).
    pub fn bind_var(&mut self, name: Name, var: Var) {
        self.vars.insert(name, var);
    }

    /// Drop the binding; other names sharing the cell keep it.
    pub fn remove_variable(&mut self, name: Name) {
        self.vars.remove(&name);
    }

    pub fn isset_variable(&self, name: Name) -> bool {
        self.vars.get(&name).is_some_and(Var::is_set)
    }

    /// The array stored in `name`, creating one if the variable is unset
    /// or null.
    pub fn get_array(&mut self, name: Name) -> Value {
        self.get_var(name).to_array()
    }

    /// The object stored in `name`, creating a `stdClass` if unset or null.
    pub fn get_object(&mut self, name: Name) -> Value {
        self.get_var(name).to_object()
    }

    /// Bound names with their current values, in no particular order.
    pub fn variables(&self) -> impl Iterator<Item = (Name, Value)> + '_ {
        self.vars.iter().map(|(&name, var)| (name, var.get()))
    }

    /// Drop every binding, keeping functions and output.
    pub fn clear_variables(&mut self) {
        self.vars.clear();
    }

    // ===== Functions =====

    /// Resolve a dynamic function name.
    pub fn function(&self, name: &Value) -> Result<Arc<dyn Callable>, EvalError> {
        match name {
            Value::Str(s) => self.function_named(s),
            other => Err(not_callable(other)),
        }
    }

    /// Resolve an interned function name.
    pub fn function_by_name(&self, name: Name) -> Result<Arc<dyn Callable>, EvalError> {
        self.function_named(self.interner.lookup(name))
    }

    fn function_named(&self, name: &str) -> Result<Arc<dyn Callable>, EvalError> {
        let found = self.functions.lookup(name);
        tracing::trace!(function = name, found = found.is_some(), "resolve function");
        found.ok_or_else(|| undefined_function(name))
    }

    pub fn functions(&self) -> &SharedRegistry<FunctionTable> {
        &self.functions
    }

    /// Run `call` with `refs` as the by-reference cells of the running
    /// call. The previous cells are restored afterwards, so a call nested
    /// inside `call` never sees its caller's.
    pub fn with_ref_args<T>(
        &mut self,
        refs: RefArgs,
        call: impl FnOnce(&mut Environment) -> T,
    ) -> T {
        let outer = std::mem::replace(&mut self.ref_args, refs);
        let result = call(self);
        self.ref_args = outer;
        result
    }

    /// Caller's cell for the argument at `index` of the running call, when
    /// a variable was passed there in `ArgMode::Ref`.
    pub fn ref_arg(&self, index: usize) -> Option<Var> {
        self.ref_args.get(index).cloned()
    }

    // ===== Output =====

    pub fn print(&self, value: &Value) {
        match value {
            Value::Long(n) => self.print_long(*n),
            Value::Double(d) => self.print_double(*d),
            Value::Bool(b) => self.print_bool(*b),
            Value::Str(s) => self.print_str(s),
            Value::Null | Value::Unset => {}
            Value::Array(_) | Value::Object(_) => self.print_str(&value.to_string()),
        }
    }

    pub fn print_long(&self, value: i64) {
        self.print_handler.print_long(value);
    }

    pub fn print_double(&self, value: f64) {
        self.print_handler.print_double(value);
    }

    pub fn print_str(&self, value: &str) {
        self.print_handler.print(value);
    }

    /// `true` prints `1`, `false` prints nothing.
    pub fn print_bool(&self, value: bool) {
        self.print_handler.print_bool(value);
    }

    pub fn print_handler(&self) -> &SharedPrintHandler {
        &self.print_handler
    }

    /// Output captured so far (empty unless printing to a buffer).
    pub fn output(&self) -> String {
        self.print_handler.output()
    }

    /// Captured output, clearing the buffer.
    pub fn take_output(&self) -> String {
        self.print_handler.take_output()
    }
}

impl fmt::Debug for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut vars: Vec<(&str, Value)> = self
            .vars
            .iter()
            .map(|(&name, var)| (self.interner.lookup(name), var.get()))
            .collect();
        vars.sort_by(|a, b| a.0.cmp(b.0));
        f.debug_struct("Environment")
            .field("vars", &vars)
            .field("functions", &self.functions.len())
            .finish_non_exhaustive()
    }
}

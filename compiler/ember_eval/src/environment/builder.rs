//! Builder for `Environment`.

use ember_ir::SharedInterner;
use ember_value::Value;
use rustc_hash::FxHashMap;

use super::Environment;
use crate::print_handler::{stdout_handler, SharedPrintHandler};
use crate::shared::SharedRegistry;
use crate::{FunctionTable, RefArgs};

/// Builder for creating `Environment` instances with various configurations.
#[derive(Default)]
pub struct EnvironmentBuilder {
    interner: Option<SharedInterner>,
    functions: Option<SharedRegistry<FunctionTable>>,
    print_handler: Option<SharedPrintHandler>,
    variables: Vec<(String, Value)>,
}

impl EnvironmentBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Share an interner with the arena whose trees will run here.
    #[must_use]
    pub fn interner(mut self, interner: SharedInterner) -> Self {
        self.interner = Some(interner);
        self
    }

    /// Use a pre-built function table instead of the built-ins.
    #[must_use]
    pub fn functions(mut self, functions: FunctionTable) -> Self {
        self.functions = Some(SharedRegistry::new(functions));
        self
    }

    /// Share a function table with other environments.
    #[must_use]
    pub fn shared_functions(mut self, functions: SharedRegistry<FunctionTable>) -> Self {
        self.functions = Some(functions);
        self
    }

    #[must_use]
    pub fn print_handler(mut self, handler: SharedPrintHandler) -> Self {
        self.print_handler = Some(handler);
        self
    }

    /// Pre-populate a variable (a host-provided global).
    #[must_use]
    pub fn variable(mut self, name: &str, value: Value) -> Self {
        self.variables.push((name.to_owned(), value));
        self
    }

    pub fn build(self) -> Environment {
        let interner = self.interner.unwrap_or_default();
        let mut vars = FxHashMap::default();
        for (name, value) in self.variables {
            vars.insert(interner.intern(&name), value.into());
        }
        Environment {
            vars,
            functions: self
                .functions
                .unwrap_or_else(|| SharedRegistry::new(FunctionTable::with_builtins())),
            print_handler: self.print_handler.unwrap_or_else(stdout_handler),
            interner,
            ref_args: RefArgs::new(),
        }
    }
}

//! Builder for `Program`.

use std::sync::Arc;

use ember_analyze::{analyze, ScopeMode};
use ember_eval::{FunctionTable, SharedRegistry};
use ember_ir::{ExprArena, SharedArena, Statement};

use super::Program;
use crate::{Config, OutputMode};

/// Configures and analyzes a program.
#[derive(Default)]
pub struct ProgramBuilder {
    config: Config,
    functions: Option<SharedRegistry<FunctionTable>>,
}

impl ProgramBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }

    /// `Function` when the unit runs in a fresh local scope.
    #[must_use]
    pub fn scope(mut self, scope: ScopeMode) -> Self {
        self.config.scope = scope;
        self
    }

    #[must_use]
    pub fn output(mut self, output: OutputMode) -> Self {
        self.config.output = output;
        self
    }

    #[must_use]
    pub fn unit_name(mut self, name: impl Into<String>) -> Self {
        self.config.unit_name = name.into();
        self
    }

    /// Functions visible to the program; the built-ins by default.
    #[must_use]
    pub fn functions(mut self, functions: FunctionTable) -> Self {
        self.functions = Some(SharedRegistry::new(functions));
        self
    }

    /// Analyze `statements` and freeze the unit.
    pub fn build(self, arena: ExprArena, statements: Vec<Statement>) -> Program {
        let analysis = analyze(&arena, &statements, self.config.scope);
        tracing::debug!(
            exprs = arena.len(),
            statements = statements.len(),
            scope = ?self.config.scope,
            "program built"
        );
        Program {
            arena: SharedArena::new(arena),
            statements: statements.into(),
            analysis: Arc::new(analysis),
            functions: self
                .functions
                .unwrap_or_else(|| SharedRegistry::new(FunctionTable::with_builtins())),
            config: self.config,
        }
    }
}

//! Analyzed units and their two execution paths.

use std::sync::Arc;

use ember_analyze::Analysis;
use ember_codegen::{CodegenError, Compiler, PRELUDE_IMPORT};
use ember_eval::{Environment, EnvironmentBuilder, Evaluator, FunctionTable, SharedRegistry};
use ember_ir::{ExprArena, ExprId, SharedArena, Statement};
use ember_value::{EvalError, EvalResult};
use rayon::prelude::*;

use crate::Config;

mod builder;

pub use builder::ProgramBuilder;

/// Worker stack for parallel runs; `stacker` grows it further on demand.
const WORKER_STACK_SIZE: usize = 16 * 1024 * 1024;

/// An analyzed unit, ready to run or compile.
///
/// Cloning is cheap: the arena, statements, analysis and function table
/// are shared.
#[derive(Clone)]
pub struct Program {
    arena: SharedArena,
    statements: Arc<[Statement]>,
    analysis: Arc<Analysis>,
    functions: SharedRegistry<FunctionTable>,
    config: Config,
}

impl Program {
    /// Analyze `statements` with the default configuration.
    pub fn new(arena: ExprArena, statements: Vec<Statement>) -> Self {
        ProgramBuilder::new().build(arena, statements)
    }

    pub fn builder() -> ProgramBuilder {
        ProgramBuilder::new()
    }

    pub fn arena(&self) -> &ExprArena {
        &self.arena
    }

    pub fn statements(&self) -> &[Statement] {
        &self.statements
    }

    pub fn analysis(&self) -> &Analysis {
        &self.analysis
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn functions(&self) -> &SharedRegistry<FunctionTable> {
        &self.functions
    }

    /// Environment builder sharing this program's interner and function
    /// table, with a fresh output handler.
    pub fn environment_builder(&self) -> EnvironmentBuilder {
        Environment::builder()
            .interner(self.arena.interner().clone())
            .shared_functions(self.functions.clone())
            .print_handler(self.config.output.handler())
    }

    /// A fresh, empty environment for one run.
    pub fn environment(&self) -> Environment {
        self.environment_builder().build()
    }

    pub fn evaluator(&self) -> Evaluator<'_> {
        Evaluator::new(&self.arena)
    }

    /// Evaluate every statement against `env`.
    #[tracing::instrument(level = "debug", skip_all, fields(statements = self.statements.len()))]
    pub fn run(&self, env: &mut Environment) -> Result<(), EvalError> {
        self.evaluator().run(env, &self.statements)
    }

    /// The value of one node, as a host sees it.
    pub fn evaluate(&self, env: &mut Environment, id: ExprId) -> EvalResult {
        self.evaluator().eval_value(env, id)
    }

    /// Run the unit once per environment, in parallel.
    ///
    /// Results are in the order of `envs`.
    #[tracing::instrument(level = "debug", skip_all, fields(environments = envs.len()))]
    pub fn run_parallel(&self, envs: &mut [Environment]) -> Vec<Result<(), EvalError>> {
        rayon::ThreadPoolBuilder::new()
            .stack_size(WORKER_STACK_SIZE)
            .build_scoped(rayon::ThreadBuilder::run, |pool| {
                pool.install(|| envs.par_iter_mut().map(|env| self.run(env)).collect())
            })
            .unwrap_or_else(|e| {
                tracing::warn!("failed to create thread pool ({e}), running sequentially");
                envs.iter_mut().map(|env| self.run(env)).collect()
            })
    }

    fn compiler(&self) -> Compiler<'_> {
        Compiler::new(&self.arena, &self.analysis)
    }

    /// The unit as `pub fn {unit_name}(env: &mut Environment) -> Result<(), EvalError>`.
    pub fn compile(&self) -> Result<String, CodegenError> {
        self.compiler()
            .compile_unit(&self.config.unit_name, &self.statements)
    }

    /// `compile` preceded by the import the generated function needs.
    pub fn compile_module(&self) -> Result<String, CodegenError> {
        Ok(format!("{PRELUDE_IMPORT}\n\n{}", self.compile()?))
    }

    /// One analyzed node as `pub fn {name}(env: &mut Environment) -> Result<Value, EvalError>`.
    pub fn compile_value(&self, name: &str, id: ExprId) -> Result<String, CodegenError> {
        self.compiler().compile_value(name, id)
    }

    /// Code that rebuilds node `id` in another arena.
    pub fn compile_expr(&self, name: &str, id: ExprId) -> Result<String, CodegenError> {
        self.compiler().compile_expr(name, id)
    }
}

impl std::fmt::Debug for Program {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Program")
            .field("arena", &self.arena)
            .field("statements", &self.statements.len())
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

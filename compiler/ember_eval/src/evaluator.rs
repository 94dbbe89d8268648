//! Tree-walking evaluator.
//!
//! `Evaluator` borrows an immutable arena and evaluates nodes against a
//! caller-supplied `Environment`. It holds no per-evaluation state, so one
//! arena can be evaluated from many threads, each with its own environment.
//!
//! Evaluation contexts mirror the compiler's `generate*` family:
//! - `eval`: the value of a node (`eval_value` for host-facing results)
//! - `eval_top`: statement context, the result is discarded
//! - `eval_array` / `eval_object`: container for writing, autovivified
//! - `eval_ref`: the `Var` behind a node
//! - `eval_arg*`: by-reference argument passing
//! - `eval_copy`: a value safe to store (arrays detached)
//! - `eval_assign`, `eval_assign_ref`, `eval_unset`, `eval_isset`: lvalues
//! - `eval_string`, `eval_boolean`, `eval_long`, `eval_double`, `eval_char`
//! - `print`: echo

use ember_ir::{ArrayEntry, CastType, ExprArena, ExprId, ExprKind, Statement, StatementKind, UnaryOp};
use ember_stack::ensure_sufficient_stack;
use ember_value::{ops, ArrayKey, ArrayValue, EvalError, EvalResult, Value};

use crate::Environment;

mod call;
mod context;
mod lvalue;

/// Evaluates nodes of one arena.
#[derive(Copy, Clone)]
pub struct Evaluator<'a> {
    arena: &'a ExprArena,
}

impl<'a> Evaluator<'a> {
    pub fn new(arena: &'a ExprArena) -> Self {
        Evaluator { arena }
    }

    pub fn arena(&self) -> &'a ExprArena {
        self.arena
    }

    /// Run a unit's statements in order, stopping at the first error.
    #[tracing::instrument(level = "debug", skip_all, fields(statements = statements.len()))]
    pub fn run(&self, env: &mut Environment, statements: &[Statement]) -> Result<(), EvalError> {
        for statement in statements {
            self.run_statement(env, statement)?;
        }
        Ok(())
    }

    pub fn run_statement(
        &self,
        env: &mut Environment,
        statement: &Statement,
    ) -> Result<(), EvalError> {
        match statement.kind {
            StatementKind::Expr => self.eval_top(env, statement.expr),
            StatementKind::Echo => self.print(env, statement.expr),
        }
    }

    /// The value of `id`.
    pub fn eval(&self, env: &mut Environment, id: ExprId) -> EvalResult {
        ensure_sufficient_stack(|| self.eval_inner(env, id))
    }

    /// The value of `id` as handed back to a host: a missing element reads
    /// as `Null`.
    pub fn eval_value(&self, env: &mut Environment, id: ExprId) -> EvalResult {
        match self.eval(env, id)? {
            Value::Unset => Ok(Value::Null),
            value => Ok(value),
        }
    }

    fn eval_inner(&self, env: &mut Environment, id: ExprId) -> EvalResult {
        match self.arena.kind(id) {
            ExprKind::Null => Ok(Value::Null),
            ExprKind::Bool(b) => Ok(Value::Bool(b)),
            ExprKind::Long(n) => Ok(Value::Long(n)),
            ExprKind::Double(bits) => Ok(Value::Double(f64::from_bits(bits))),
            ExprKind::String(s) => Ok(Value::string(self.arena.interner().lookup(s))),

            ExprKind::Var(name) => Ok(env.get_variable(name)),
            ExprKind::ArrayGet { base, index } => {
                let container = self.eval(env, base)?;
                let index = self.eval(env, index)?;
                Ok(container.get(&index))
            }
            ExprKind::ArrayTail { .. } => Err(EvalError::ArrayTailRead),
            ExprKind::FieldGet { base, field } => Ok(self.eval(env, base)?.get_field(field)),
            ExprKind::ArrayLiteral { entries } => {
                let mut array = ArrayValue::new();
                for &ArrayEntry { key, value } in self.arena.get_entries(entries) {
                    match key {
                        Some(key) => {
                            let key = ArrayKey::from_value(&self.eval(env, key)?)?;
                            array.insert(key, self.eval_copy(env, value)?);
                        }
                        None => {
                            array.push(self.eval_copy(env, value)?)?;
                        }
                    }
                }
                Ok(Value::from_array(array))
            }

            ExprKind::Unary { op, operand } => {
                let value = self.eval(env, operand)?;
                Ok(match op {
                    UnaryOp::Neg => value.neg(),
                    UnaryOp::Not => Value::Bool(!value.to_boolean()),
                })
            }
            ExprKind::Binary { op, left, right } => {
                let left = self.eval(env, left)?;
                let right = self.eval(env, right)?;
                ops::binary(op, &left, &right)
            }
            ExprKind::Cast { ty, operand } => {
                let value = self.eval(env, operand)?;
                Ok(match ty {
                    CastType::Long => Value::Long(value.to_long()),
                    CastType::Double => Value::Double(value.to_double()),
                    CastType::String => Value::Str(value.to_str()),
                    CastType::Boolean => Value::Bool(value.to_boolean()),
                })
            }

            ExprKind::Assign { target, value } => self.assign(env, target, value),
            ExprKind::AssignRef { target, source } => {
                let var = self.eval_ref(env, source)?;
                env.bind_var(target, var.clone());
                Ok(var.get())
            }

            ExprKind::UnsetVar(name) => {
                env.remove_variable(name);
                Ok(Value::Null)
            }
            ExprKind::UnsetArray { base, index } => self.unset_element(env, base, index),
            ExprKind::UnsetField { base, field } => self.eval(env, base)?.remove_field(field),
            ExprKind::IssetVar(name) => Ok(Value::Bool(env.isset_variable(name))),
            ExprKind::IssetArray { base, index } => {
                let container = self.eval(env, base)?;
                let index = self.eval(env, index)?;
                Ok(Value::Bool(container.isset_index(&index)))
            }
            ExprKind::IssetField { base, field } => {
                Ok(Value::Bool(self.eval(env, base)?.isset_field(field)))
            }

            ExprKind::Call { name, args } => {
                let callee = env.function_by_name(name)?;
                self.call(env, &callee, self.arena.get_expr_list(args))
            }
            ExprKind::CallVar { name, args } => {
                let name = self.eval(env, name)?;
                let callee = env.function(&name)?;
                self.call(env, &callee, self.arena.get_expr_list(args))
            }
        }
    }

    /// Statement context: evaluate for side effects only.
    pub fn eval_top(&self, env: &mut Environment, id: ExprId) -> Result<(), EvalError> {
        match self.arena.kind(id) {
            ExprKind::Null
            | ExprKind::Bool(_)
            | ExprKind::Long(_)
            | ExprKind::Double(_)
            | ExprKind::String(_)
            | ExprKind::Var(_) => Ok(()),
            ExprKind::ArrayGet { .. }
            | ExprKind::ArrayTail { .. }
            | ExprKind::FieldGet { .. }
            | ExprKind::ArrayLiteral { .. }
            | ExprKind::Unary { .. }
            | ExprKind::Binary { .. }
            | ExprKind::Cast { .. }
            | ExprKind::Assign { .. }
            | ExprKind::AssignRef { .. }
            | ExprKind::UnsetVar(_)
            | ExprKind::UnsetArray { .. }
            | ExprKind::UnsetField { .. }
            | ExprKind::IssetVar(_)
            | ExprKind::IssetArray { .. }
            | ExprKind::IssetField { .. }
            | ExprKind::Call { .. }
            | ExprKind::CallVar { .. } => self.eval(env, id).map(drop),
        }
    }
}

#[cfg(test)]
mod tests;

//! Non-value evaluation contexts.
//!
//! Each context defaults to `eval` plus a conversion and is specialized only
//! where the node kind changes the semantics (storage nodes) or makes a
//! shortcut possible (literals, casts, typed operators).

use ember_ir::{BinaryOp, CastType, ExprId, ExprKind, UnaryOp};
use ember_stack::ensure_sufficient_stack;
use ember_value::{ops, EvalError, EvalResult, Value, Var};

use super::Evaluator;
use crate::Environment;

impl Evaluator<'_> {
    // ===== Containers =====

    /// The array stored at `id`, created when the storage is unset or null.
    pub fn eval_array(&self, env: &mut Environment, id: ExprId) -> EvalResult {
        ensure_sufficient_stack(|| match self.arena.kind(id) {
            ExprKind::Var(name) => Ok(env.get_array(name)),
            ExprKind::ArrayGet { base, index } => {
                let container = self.eval_array(env, base)?;
                let index = self.eval(env, index)?;
                container.get_array(&index)
            }
            ExprKind::ArrayTail { base } => {
                let container = self.eval_array(env, base)?;
                container.append(Value::empty_array())
            }
            ExprKind::FieldGet { base, field } => {
                self.eval_object(env, base)?.get_field_array(field)
            }
            _ => self.eval(env, id),
        })
    }

    /// The object stored at `id`, a fresh `stdClass` when unset or null.
    pub fn eval_object(&self, env: &mut Environment, id: ExprId) -> EvalResult {
        ensure_sufficient_stack(|| match self.arena.kind(id) {
            ExprKind::Var(name) => Ok(env.get_object(name)),
            ExprKind::ArrayGet { base, index } => {
                let container = self.eval_array(env, base)?;
                let index = self.eval(env, index)?;
                container.get_object(&index)
            }
            ExprKind::ArrayTail { base } => {
                let container = self.eval_array(env, base)?;
                container.append(Value::std_object())
            }
            ExprKind::FieldGet { base, field } => {
                self.eval_object(env, base)?.get_field_object(field)
            }
            _ => self.eval(env, id),
        })
    }

    // ===== References =====

    /// The cell behind `id`: a variable's own `Var`, a call's returned
    /// reference, or the value wrapped in a fresh cell.
    pub fn eval_ref(&self, env: &mut Environment, id: ExprId) -> Result<Var, EvalError> {
        match self.arena.kind(id) {
            ExprKind::Var(name) => Ok(env.get_var(name)),
            ExprKind::Call { name, args } => {
                let callee = env.function_by_name(name)?;
                self.call_ref(env, &callee, self.arena.get_expr_list(args))
            }
            ExprKind::CallVar { name, args } => {
                let name = self.eval(env, name)?;
                let callee = env.function(&name)?;
                self.call_ref(env, &callee, self.arena.get_expr_list(args))
            }
            _ => self.eval(env, id).map(Var::new),
        }
    }

    // ===== Arguments =====

    /// By-reference argument: storage passes its live value, binding
    /// unset variables.
    pub fn eval_arg(&self, env: &mut Environment, id: ExprId) -> EvalResult {
        match self.arena.kind(id) {
            ExprKind::Var(name) => Ok(env.get_var(name).get()),
            _ => self.eval(env, id),
        }
    }

    pub fn eval_arg_array(&self, env: &mut Environment, id: ExprId) -> EvalResult {
        self.eval_array(env, id)
    }

    pub fn eval_arg_object(&self, env: &mut Environment, id: ExprId) -> EvalResult {
        self.eval_object(env, id)
    }

    /// A value safe to store: nothing else can mutate it through a shared
    /// array handle.
    pub fn eval_copy(&self, env: &mut Environment, id: ExprId) -> EvalResult {
        match self.arena.kind(id) {
            ExprKind::Null
            | ExprKind::Bool(_)
            | ExprKind::Long(_)
            | ExprKind::Double(_)
            | ExprKind::String(_)
            | ExprKind::ArrayLiteral { .. }
            | ExprKind::Unary { .. }
            | ExprKind::Binary { .. }
            | ExprKind::Cast { .. }
            | ExprKind::UnsetVar(_)
            | ExprKind::IssetVar(_)
            | ExprKind::IssetArray { .. }
            | ExprKind::IssetField { .. } => self.eval(env, id),
            ExprKind::Var(name) => Ok(env.get_variable(name).copy()),
            ExprKind::ArrayGet { .. }
            | ExprKind::ArrayTail { .. }
            | ExprKind::FieldGet { .. }
            | ExprKind::Assign { .. }
            | ExprKind::AssignRef { .. }
            | ExprKind::UnsetArray { .. }
            | ExprKind::UnsetField { .. }
            | ExprKind::Call { .. }
            | ExprKind::CallVar { .. } => Ok(self.eval(env, id)?.copy()),
        }
    }

    // ===== Primitives =====

    pub fn eval_string(&self, env: &mut Environment, id: ExprId) -> Result<String, EvalError> {
        match self.arena.kind(id) {
            ExprKind::String(s) => Ok(self.arena.interner().lookup(s).to_owned()),
            ExprKind::Binary {
                op: BinaryOp::Concat,
                left,
                right,
            } => {
                let mut out = self.eval_string(env, left)?;
                out.push_str(&self.eval_string(env, right)?);
                Ok(out)
            }
            ExprKind::Cast {
                ty: CastType::String,
                operand,
            } => self.eval_string(env, operand),
            _ => Ok(self.eval(env, id)?.to_string()),
        }
    }

    pub fn eval_boolean(&self, env: &mut Environment, id: ExprId) -> Result<bool, EvalError> {
        match self.arena.kind(id) {
            ExprKind::Bool(b) => Ok(b),
            ExprKind::Unary {
                op: UnaryOp::Not,
                operand,
            } => Ok(!self.eval_boolean(env, operand)?),
            ExprKind::Binary { op, left, right } if op.is_comparison() => {
                let left = self.eval(env, left)?;
                let right = self.eval(env, right)?;
                ops::compare(op, &left, &right)
            }
            ExprKind::Cast {
                ty: CastType::Boolean,
                operand,
            } => self.eval_boolean(env, operand),
            ExprKind::IssetVar(name) => Ok(env.isset_variable(name)),
            _ => Ok(self.eval(env, id)?.to_boolean()),
        }
    }

    pub fn eval_long(&self, env: &mut Environment, id: ExprId) -> Result<i64, EvalError> {
        match self.arena.kind(id) {
            ExprKind::Long(n) => Ok(n),
            ExprKind::Binary {
                op: BinaryOp::Mod,
                left,
                right,
            } => {
                let left = self.eval_long(env, left)?;
                let right = self.eval_long(env, right)?;
                ops::long_rem(left, right)
            }
            ExprKind::Cast {
                ty: CastType::Long,
                operand,
            } => self.eval_long(env, operand),
            _ => Ok(self.eval(env, id)?.to_long()),
        }
    }

    pub fn eval_double(&self, env: &mut Environment, id: ExprId) -> Result<f64, EvalError> {
        match self.arena.kind(id) {
            ExprKind::Double(bits) => Ok(f64::from_bits(bits)),
            ExprKind::Binary {
                op: BinaryOp::Div,
                left,
                right,
            } => {
                let left = self.eval_double(env, left)?;
                let right = self.eval_double(env, right)?;
                Ok(left / right)
            }
            ExprKind::Cast {
                ty: CastType::Double,
                operand,
            } => self.eval_double(env, operand),
            _ => Ok(self.eval(env, id)?.to_double()),
        }
    }

    pub fn eval_char(&self, env: &mut Environment, id: ExprId) -> Result<char, EvalError> {
        match self.arena.kind(id) {
            ExprKind::String(s) => Ok(self.arena.interner().lookup(s).chars().next().unwrap_or('\0')),
            _ => Ok(self.eval(env, id)?.to_char()),
        }
    }

    // ===== Output =====

    /// `echo id`, through a typed print when the node's type is known.
    pub fn print(&self, env: &mut Environment, id: ExprId) -> Result<(), EvalError> {
        match self.arena.kind(id) {
            ExprKind::Long(n) => env.print_long(n),
            ExprKind::Double(bits) => env.print_double(f64::from_bits(bits)),
            ExprKind::String(s) => env.print_str(self.arena.interner().lookup(s)),
            ExprKind::Binary { op, .. } => match op {
                BinaryOp::Concat => {
                    let s = self.eval_string(env, id)?;
                    env.print_str(&s);
                }
                BinaryOp::Div => {
                    let d = self.eval_double(env, id)?;
                    env.print_double(d);
                }
                BinaryOp::Mod => {
                    let n = self.eval_long(env, id)?;
                    env.print_long(n);
                }
                op if op.is_comparison() => {
                    let b = self.eval_boolean(env, id)?;
                    env.print_bool(b);
                }
                _ => {
                    let value = self.eval(env, id)?;
                    env.print(&value);
                }
            },
            ExprKind::Cast { ty, operand } => match ty {
                CastType::Long => {
                    let n = self.eval_long(env, operand)?;
                    env.print_long(n);
                }
                CastType::Double => {
                    let d = self.eval_double(env, operand)?;
                    env.print_double(d);
                }
                CastType::String => {
                    let s = self.eval_string(env, operand)?;
                    env.print_str(&s);
                }
                CastType::Boolean => {
                    let b = self.eval_boolean(env, operand)?;
                    env.print_bool(b);
                }
            },
            ExprKind::Unary {
                op: UnaryOp::Not, ..
            }
            | ExprKind::IssetVar(_)
            | ExprKind::IssetArray { .. }
            | ExprKind::IssetField { .. } => {
                let b = self.eval_boolean(env, id)?;
                env.print_bool(b);
            }
            _ => {
                let value = self.eval(env, id)?;
                env.print(&value);
            }
        }
        Ok(())
    }
}

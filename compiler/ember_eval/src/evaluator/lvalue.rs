//! Lvalue contexts: assignment, assignment by reference, unset and isset.

use ember_ir::{ExprId, ExprKind, Name, Role};
use ember_value::{EvalError, EvalResult, Value, Var};

use super::Evaluator;
use crate::Environment;

/// A storage location whose container path has been evaluated.
enum Place {
    Var(Name),
    Element { container: Value, index: Value },
    Append { container: Value },
    Field { object: Value, field: Name },
}

impl Evaluator<'_> {
    /// Evaluate the container path of `target`, leaving the final write for
    /// [`Self::store`].
    fn place(&self, env: &mut Environment, target: ExprId, role: Role) -> Result<Place, EvalError> {
        match self.arena.kind(target) {
            ExprKind::Var(name) => Ok(Place::Var(name)),
            ExprKind::ArrayGet { base, index } => {
                let container = self.eval_array(env, base)?;
                let index = self.eval(env, index)?;
                Ok(Place::Element { container, index })
            }
            ExprKind::ArrayTail { base } => Ok(Place::Append {
                container: self.eval_array(env, base)?,
            }),
            ExprKind::FieldGet { base, field } => Ok(Place::Field {
                object: self.eval_object(env, base)?,
                field,
            }),
            _ => Err(self.arena.role_error(role, target).into()),
        }
    }

    fn store(env: &mut Environment, place: Place, value: Value) -> EvalResult {
        match place {
            Place::Var(name) => {
                env.set_variable(name, value.clone());
                Ok(value)
            }
            Place::Element { container, index } => container.put(&index, value),
            Place::Append { container } => container.append(value),
            Place::Field { object, field } => object.put_field(field, value),
        }
    }

    /// `target = value`: container path, then the value, then the write.
    pub(super) fn assign(&self, env: &mut Environment, target: ExprId, value: ExprId) -> EvalResult {
        let place = self.place(env, target, Role::Assign)?;
        let value = self.eval_copy(env, value)?;
        Self::store(env, place, value)
    }

    /// Store an already-evaluated `value` into `target`.
    pub fn eval_assign(&self, env: &mut Environment, target: ExprId, value: Value) -> EvalResult {
        let place = self.place(env, target, Role::Assign)?;
        Self::store(env, place, value)
    }

    /// Bind the variable `target` to `var`.
    pub fn eval_assign_ref(&self, env: &mut Environment, target: ExprId, var: Var) -> EvalResult {
        match self.arena.kind(target) {
            ExprKind::Var(name) => {
                let value = var.get();
                env.bind_var(name, var);
                Ok(value)
            }
            _ => Err(self.arena.role_error(Role::AssignRef, target).into()),
        }
    }

    /// `unset(target)`; returns the removed value for elements and fields.
    pub fn eval_unset(&self, env: &mut Environment, target: ExprId) -> EvalResult {
        match self.arena.kind(target) {
            ExprKind::Var(name) => {
                env.remove_variable(name);
                Ok(Value::Null)
            }
            ExprKind::ArrayGet { base, index } => self.unset_element(env, base, index),
            ExprKind::FieldGet { base, field } => self.eval(env, base)?.remove_field(field),
            _ => Err(self.arena.role_error(Role::Unset, target).into()),
        }
    }

    pub fn eval_isset(&self, env: &mut Environment, target: ExprId) -> Result<bool, EvalError> {
        match self.arena.kind(target) {
            ExprKind::Var(name) => Ok(env.isset_variable(name)),
            ExprKind::ArrayGet { base, index } => {
                let container = self.eval(env, base)?;
                let index = self.eval(env, index)?;
                Ok(container.isset_index(&index))
            }
            ExprKind::FieldGet { base, field } => Ok(self.eval(env, base)?.isset_field(field)),
            _ => Err(self.arena.role_error(Role::Isset, target).into()),
        }
    }

    /// Array-key removal: container, then index, then `remove`.
    pub(super) fn unset_element(
        &self,
        env: &mut Environment,
        base: ExprId,
        index: ExprId,
    ) -> EvalResult {
        let container = self.eval(env, base)?;
        let index = self.eval(env, index)?;
        container.remove(&index)
    }
}

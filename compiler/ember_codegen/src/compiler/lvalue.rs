//! Assignment, unset and isset.

use ember_ir::{ExprId, ExprKind, Role};

use super::{Compiler, GenResult};
use crate::emitter::TempKind;

impl Compiler<'_> {
    /// `target = value`: container path, then the value, then the write.
    pub fn generate_assign(&mut self, target: ExprId, value: ExprId) -> GenResult {
        match self.node(target)? {
            ExprKind::Var(name) => {
                let value = self.generate_copy(value)?;
                let name = self.name(name);
                if value.starts_with('_') {
                    self.line(&format!("env.set_variable({name}, {value}.clone());"));
                } else {
                    // Literals are rebuilt rather than cloned.
                    self.line(&format!("env.set_variable({name}, {value});"));
                }
                Ok(value)
            }
            ExprKind::ArrayGet { base, index } => {
                let container = self.generate_array(base)?;
                let index = self.generate(index)?;
                let value = self.generate_copy(value)?;
                Ok(self.bind(
                    TempKind::Value,
                    &format!("{container}.put(&{index}, {value})?"),
                ))
            }
            ExprKind::ArrayTail { base } => {
                let container = self.generate_array(base)?;
                let value = self.generate_copy(value)?;
                Ok(self.bind(TempKind::Value, &format!("{container}.append({value})?")))
            }
            ExprKind::FieldGet { base, field } => {
                let object = self.generate_object(base)?;
                let field = self.name(field);
                let value = self.generate_copy(value)?;
                Ok(self.bind(
                    TempKind::Value,
                    &format!("{object}.put_field({field}, {value})?"),
                ))
            }
            _ => Err(self.arena.role_error(Role::Assign, target).into()),
        }
    }

    /// `unset(target)`.
    pub fn generate_unset(&mut self, target: ExprId) -> GenResult {
        match self.node(target)? {
            ExprKind::Var(name) => {
                let name = self.name(name);
                self.line(&format!("env.remove_variable({name});"));
                Ok("Value::Null".to_owned())
            }
            ExprKind::ArrayGet { base, index } => self.generate_unset_element(base, index),
            ExprKind::FieldGet { base, field } => {
                let object = self.generate(base)?;
                let field = self.name(field);
                Ok(self.bind(TempKind::Value, &format!("{object}.remove_field({field})?")))
            }
            _ => Err(self.arena.role_error(Role::Unset, target).into()),
        }
    }

    /// `isset(target)` as a `bool` operand.
    pub fn generate_isset(&mut self, target: ExprId) -> GenResult {
        match self.node(target)? {
            ExprKind::Var(name) => {
                let name = self.name(name);
                Ok(self.bind(TempKind::Bool, &format!("env.isset_variable({name})")))
            }
            ExprKind::ArrayGet { base, index } => {
                let container = self.generate(base)?;
                let index = self.generate(index)?;
                Ok(self.bind(TempKind::Bool, &format!("{container}.isset_index(&{index})")))
            }
            ExprKind::FieldGet { base, field } => {
                let object = self.generate(base)?;
                let field = self.name(field);
                Ok(self.bind(TempKind::Bool, &format!("{object}.isset_field({field})")))
            }
            _ => Err(self.arena.role_error(Role::Isset, target).into()),
        }
    }

    /// Array-key removal: container, index, then `remove`.
    pub(super) fn generate_unset_element(&mut self, base: ExprId, index: ExprId) -> GenResult {
        let container = self.generate(base)?;
        let index = self.generate(index)?;
        Ok(self.bind(TempKind::Value, &format!("{container}.remove(&{index})?")))
    }
}

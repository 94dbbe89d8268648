//! Container, reference, argument and copy contexts.

use ember_ir::{ExprId, ExprKind};
use ember_stack::ensure_sufficient_stack;

use super::{Compiler, GenResult};
use crate::emitter::TempKind;

impl Compiler<'_> {
    /// The array stored at `id`, autovivified.
    pub fn generate_array(&mut self, id: ExprId) -> GenResult {
        ensure_sufficient_stack(|| match self.node(id)? {
            ExprKind::Var(name) => {
                let name = self.name(name);
                Ok(self.bind(TempKind::Value, &format!("env.get_array({name})")))
            }
            ExprKind::ArrayGet { base, index } => {
                let container = self.generate_array(base)?;
                let index = self.generate(index)?;
                Ok(self.bind(TempKind::Value, &format!("{container}.get_array(&{index})?")))
            }
            ExprKind::ArrayTail { base } => {
                let container = self.generate_array(base)?;
                Ok(self.bind(
                    TempKind::Value,
                    &format!("{container}.append(Value::empty_array())?"),
                ))
            }
            ExprKind::FieldGet { base, field } => {
                let object = self.generate_object(base)?;
                let field = self.name(field);
                Ok(self.bind(TempKind::Value, &format!("{object}.get_field_array({field})?")))
            }
            _ => self.generate(id),
        })
    }

    /// The object stored at `id`, autovivified.
    pub fn generate_object(&mut self, id: ExprId) -> GenResult {
        ensure_sufficient_stack(|| match self.node(id)? {
            ExprKind::Var(name) => {
                let name = self.name(name);
                Ok(self.bind(TempKind::Value, &format!("env.get_object({name})")))
            }
            ExprKind::ArrayGet { base, index } => {
                let container = self.generate_array(base)?;
                let index = self.generate(index)?;
                Ok(self.bind(TempKind::Value, &format!("{container}.get_object(&{index})?")))
            }
            ExprKind::ArrayTail { base } => {
                let container = self.generate_array(base)?;
                Ok(self.bind(
                    TempKind::Value,
                    &format!("{container}.append(Value::std_object())?"),
                ))
            }
            ExprKind::FieldGet { base, field } => {
                let object = self.generate_object(base)?;
                let field = self.name(field);
                Ok(self.bind(TempKind::Value, &format!("{object}.get_field_object({field})?")))
            }
            _ => self.generate(id),
        })
    }

    /// A `Var` operand for `id`.
    pub fn generate_ref(&mut self, id: ExprId) -> GenResult {
        match self.node(id)? {
            ExprKind::Var(name) => {
                let name = self.name(name);
                Ok(self.bind(TempKind::Ref, &format!("env.get_var({name})")))
            }
            ExprKind::Call { name, args } => {
                let arena = self.arena;
                let callee = self.resolve_static(name);
                self.generate_call(&callee, arena.get_expr_list(args), true)
            }
            ExprKind::CallVar { name, args } => {
                let arena = self.arena;
                let callee = self.resolve_dynamic(name)?;
                self.generate_call(&callee, arena.get_expr_list(args), true)
            }
            _ => {
                let value = self.generate(id)?;
                Ok(self.bind(TempKind::Ref, &format!("Var::new({value})")))
            }
        }
    }

    /// By-reference argument: the live value, binding unset variables. A
    /// variable's cell is also recorded in `refs` at its argument position.
    pub fn generate_arg(&mut self, id: ExprId, refs: Option<(&str, usize)>) -> GenResult {
        match self.node(id)? {
            ExprKind::Var(name) => {
                let name = self.name(name);
                let cell = self.bind(TempKind::Ref, &format!("env.get_var({name})"));
                if let Some((refs, index)) = refs {
                    self.line(&format!("{refs}.bind({index}, {cell}.clone());"));
                }
                Ok(self.bind(TempKind::Value, &format!("{cell}.get()")))
            }
            _ => self.generate(id),
        }
    }

    pub fn generate_arg_array(&mut self, id: ExprId) -> GenResult {
        self.generate_array(id)
    }

    pub fn generate_arg_object(&mut self, id: ExprId) -> GenResult {
        self.generate_object(id)
    }

    /// A value safe to store.
    pub fn generate_copy(&mut self, id: ExprId) -> GenResult {
        match self.node(id)? {
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
            | ExprKind::IssetField { .. } => self.generate(id),
            ExprKind::Var(name) => {
                if self.statically_unset(id) {
                    return Ok("Value::Null".to_owned());
                }
                let name = self.name(name);
                Ok(self.bind(TempKind::Value, &format!("env.get_variable({name}).copy()")))
            }
            ExprKind::ArrayGet { .. }
            | ExprKind::ArrayTail { .. }
            | ExprKind::FieldGet { .. }
            | ExprKind::Assign { .. }
            | ExprKind::AssignRef { .. }
            | ExprKind::UnsetArray { .. }
            | ExprKind::UnsetField { .. }
            | ExprKind::Call { .. }
            | ExprKind::CallVar { .. } => {
                let value = self.generate(id)?;
                Ok(self.bind(TempKind::Value, &format!("{value}.copy()")))
            }
        }
    }
}

//! Code that rebuilds a node as data through the arena builders.

use ember_ir::{ExprId, ExprKind, Location};
use ember_stack::ensure_sufficient_stack;

use super::{double_literal, Compiler, GenResult};
use crate::emitter::TempKind;

impl Compiler<'_> {
    /// Emit builder calls that recreate `id` (children first) in an arena
    /// named `arena`; the operand is the rebuilt `ExprId`.
    pub fn generate_expr(&mut self, id: ExprId) -> GenResult {
        ensure_sufficient_stack(|| self.generate_expr_inner(id))
    }

    fn generate_expr_inner(&mut self, id: ExprId) -> GenResult {
        let arena = self.arena;
        let loc = self.location(arena.loc(id));
        let expr = match arena.kind(id) {
            ExprKind::Null => format!("arena.null({loc})"),
            ExprKind::Bool(b) => format!("arena.bool({b}, {loc})"),
            ExprKind::Long(n) => format!("arena.long({}, {loc})", super::long_literal(n)),
            ExprKind::Double(bits) => {
                format!("arena.double({}, {loc})", double_literal(f64::from_bits(bits)))
            }
            ExprKind::String(s) => format!("arena.string({}, {loc})", self.str_text(s)),
            ExprKind::Var(name) => format!("arena.var({}, {loc})", self.str_text(name)),
            ExprKind::ArrayGet { base, index } => {
                let base = self.generate_expr(base)?;
                let index = self.generate_expr(index)?;
                format!("arena.array_get({base}, {index}, {loc})")
            }
            ExprKind::ArrayTail { base } => {
                let base = self.generate_expr(base)?;
                format!("arena.array_tail({base}, {loc})")
            }
            ExprKind::FieldGet { base, field } => {
                let base = self.generate_expr(base)?;
                format!("arena.field_get({base}, {}, {loc})", self.str_text(field))
            }
            ExprKind::ArrayLiteral { entries } => {
                let mut rebuilt = Vec::new();
                for entry in arena.get_entries(entries) {
                    let key = entry.key.map(|key| self.generate_expr(key)).transpose()?;
                    let value = self.generate_expr(entry.value)?;
                    rebuilt.push(match key {
                        Some(key) => format!("ArrayEntry::keyed({key}, {value})"),
                        None => format!("ArrayEntry::positional({value})"),
                    });
                }
                format!("arena.array_literal([{}], {loc})", rebuilt.join(", "))
            }
            ExprKind::Unary { op, operand } => {
                let operand = self.generate_expr(operand)?;
                format!("arena.unary(UnaryOp::{op:?}, {operand}, {loc})")
            }
            ExprKind::Binary { op, left, right } => {
                let left = self.generate_expr(left)?;
                let right = self.generate_expr(right)?;
                format!("arena.binary(BinaryOp::{op:?}, {left}, {right}, {loc})")
            }
            ExprKind::Cast { ty, operand } => {
                let operand = self.generate_expr(operand)?;
                format!("arena.cast(CastType::{ty:?}, {operand}, {loc})")
            }
            ExprKind::Assign { target, value } => {
                let target = self.generate_expr(target)?;
                let value = self.generate_expr(value)?;
                format!("arena.create_assign({target}, {value}, {loc})?")
            }
            ExprKind::AssignRef { target, source } => {
                let target = self.bind(
                    TempKind::Expr,
                    &format!("arena.var({}, {loc})", self.str_text(target)),
                );
                let source = self.generate_expr(source)?;
                format!("arena.create_assign_ref({target}, {source}, {loc})?")
            }
            ExprKind::UnsetVar(name) | ExprKind::IssetVar(name) => {
                let target = self.bind(
                    TempKind::Expr,
                    &format!("arena.var({}, {loc})", self.str_text(name)),
                );
                lvalue_form(arena.kind(id), &target, &loc)
            }
            ExprKind::UnsetArray { base, index } | ExprKind::IssetArray { base, index } => {
                let base = self.generate_expr(base)?;
                let index = self.generate_expr(index)?;
                let target = self.bind(
                    TempKind::Expr,
                    &format!("arena.array_get({base}, {index}, {loc})"),
                );
                lvalue_form(arena.kind(id), &target, &loc)
            }
            ExprKind::UnsetField { base, field } | ExprKind::IssetField { base, field } => {
                let base = self.generate_expr(base)?;
                let target = self.bind(
                    TempKind::Expr,
                    &format!("arena.field_get({base}, {}, {loc})", self.str_text(field)),
                );
                lvalue_form(arena.kind(id), &target, &loc)
            }
            ExprKind::Call { name, args } => {
                let args = self.generate_expr_list(arena.get_expr_list(args))?;
                format!("arena.call({}, [{args}], {loc})", self.str_text(name))
            }
            ExprKind::CallVar { name, args } => {
                let name = self.generate_expr(name)?;
                let args = self.generate_expr_list(arena.get_expr_list(args))?;
                format!("arena.call_var({name}, [{args}], {loc})")
            }
        };
        Ok(self.bind(TempKind::Expr, &expr))
    }

    fn generate_expr_list(&mut self, ids: &[ExprId]) -> GenResult {
        let mut rebuilt = Vec::with_capacity(ids.len());
        for &id in ids {
            rebuilt.push(self.generate_expr(id)?);
        }
        Ok(rebuilt.join(", "))
    }

    fn location(&mut self, loc: Location) -> String {
        if loc == Location::UNKNOWN {
            return "Location::UNKNOWN".to_owned();
        }
        let file = self.name(loc.file);
        format!("Location::new({file}, {})", loc.line)
    }
}

/// `create_unset` or `create_isset` over an already rebuilt target.
fn lvalue_form(kind: ExprKind, target: &str, loc: &str) -> String {
    let builder = match kind {
        ExprKind::UnsetVar(_) | ExprKind::UnsetArray { .. } | ExprKind::UnsetField { .. } => {
            "create_unset"
        }
        _ => "create_isset",
    };
    format!("arena.{builder}({target}, {loc})?")
}

//! Primitive-producing contexts and echo.
//!
//! Literals, casts and the operators whose result type is fixed get direct
//! primitive code; everything else is generated as a `Value` and coerced.

use ember_analyze::StaticType;
use ember_ir::{BinaryOp, CastType, ExprId, ExprKind, UnaryOp};

use super::{double_literal, long_literal, Compiler, GenResult};
use crate::emitter::TempKind;
use crate::CodegenError;

impl Compiler<'_> {
    /// A `bool` operand.
    pub fn generate_boolean(&mut self, id: ExprId) -> GenResult {
        match self.node(id)? {
            ExprKind::Bool(b) => Ok(b.to_string()),
            ExprKind::Unary {
                op: UnaryOp::Not,
                operand,
            } => {
                let b = self.generate_boolean(operand)?;
                Ok(self.bind(TempKind::Bool, &format!("!{b}")))
            }
            ExprKind::Binary { op, left, right } if op.is_comparison() => {
                let l = self.generate(left)?;
                let r = self.generate(right)?;
                Ok(self.bind(
                    TempKind::Bool,
                    &format!("ops::compare(BinaryOp::{op:?}, &{l}, &{r})?"),
                ))
            }
            ExprKind::Cast {
                ty: CastType::Boolean,
                operand,
            } => self.generate_boolean(operand),
            ExprKind::IssetVar(name) => {
                let name = self.name(name);
                Ok(self.bind(TempKind::Bool, &format!("env.isset_variable({name})")))
            }
            _ => self.coerce(id, TempKind::Bool, "to_boolean"),
        }
    }

    /// A `String` operand.
    pub fn generate_string(&mut self, id: ExprId) -> GenResult {
        match self.node(id)? {
            ExprKind::String(s) => Ok(format!("String::from({})", self.str_text(s))),
            ExprKind::Binary {
                op: BinaryOp::Concat,
                left,
                right,
            } => {
                let l = self.generate_string(left)?;
                let out = self.emitter.declare_temp(TempKind::Str);
                self.line(&format!("let mut {out} = {l};"));
                let r = self.generate_string(right)?;
                self.line(&format!("{out}.push_str(&{r});"));
                Ok(out)
            }
            ExprKind::Cast {
                ty: CastType::String,
                operand,
            } => self.generate_string(operand),
            _ => self.coerce(id, TempKind::Str, "to_string"),
        }
    }

    /// An `i64` operand.
    pub fn generate_long(&mut self, id: ExprId) -> GenResult {
        match self.node(id)? {
            ExprKind::Long(n) => Ok(long_literal(n)),
            ExprKind::Binary {
                op: BinaryOp::Mod,
                left,
                right,
            } => {
                let l = self.generate_long(left)?;
                let r = self.generate_long(right)?;
                Ok(self.bind(TempKind::Long, &format!("ops::long_rem({l}, {r})?")))
            }
            ExprKind::Cast {
                ty: CastType::Long,
                operand,
            } => self.generate_long(operand),
            _ => self.coerce(id, TempKind::Long, "to_long"),
        }
    }

    /// An `f64` operand.
    pub fn generate_double(&mut self, id: ExprId) -> GenResult {
        match self.node(id)? {
            ExprKind::Double(bits) => Ok(double_literal(f64::from_bits(bits))),
            ExprKind::Binary {
                op: BinaryOp::Div,
                left,
                right,
            } => {
                let l = self.generate_double(left)?;
                let r = self.generate_double(right)?;
                Ok(self.bind(TempKind::Double, &format!("{l} / {r}")))
            }
            ExprKind::Cast {
                ty: CastType::Double,
                operand,
            } => self.generate_double(operand),
            _ => self.coerce(id, TempKind::Double, "to_double"),
        }
    }

    /// A `char` operand.
    pub fn generate_char(&mut self, id: ExprId) -> GenResult {
        match self.node(id)? {
            ExprKind::String(s) => {
                let c = self.arena.interner().lookup(s).chars().next().unwrap_or('\0');
                Ok(format!("{c:?}"))
            }
            _ => self.coerce(id, TempKind::Char, "to_char"),
        }
    }

    /// General value, then one conversion method.
    fn coerce(&mut self, id: ExprId, kind: TempKind, method: &str) -> GenResult {
        let value = self.generate(id)?;
        Ok(self.bind(kind, &format!("{value}.{method}()")))
    }

    /// `echo id` through the typed print the static hint allows.
    pub fn generate_print(&mut self, id: ExprId) -> Result<(), CodegenError> {
        self.node(id)?;
        match self.hint(id) {
            Some(StaticType::Long) => {
                let n = self.generate_long(id)?;
                self.line(&format!("env.print_long({n});"));
            }
            Some(StaticType::Double) => {
                let d = self.generate_double(id)?;
                self.line(&format!("env.print_double({d});"));
            }
            Some(StaticType::String) => {
                if let ExprKind::String(s) = self.arena.kind(id) {
                    let text = self.str_text(s);
                    self.line(&format!("env.print_str({text});"));
                    return Ok(());
                }
                let s = self.generate_string(id)?;
                self.line(&format!("env.print_str(&{s});"));
            }
            Some(StaticType::Boolean) => {
                let b = self.generate_boolean(id)?;
                self.line(&format!("env.print_bool({b});"));
            }
            None => {
                let value = self.generate(id)?;
                self.line(&format!("env.print(&{value});"));
            }
        }
        Ok(())
    }
}

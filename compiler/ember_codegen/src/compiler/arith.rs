//! Operators, with arithmetic specialized on static hints.

use ember_analyze::StaticType;
use ember_ir::{BinaryOp, CastType, ExprId};

use super::{Compiler, GenResult};
use crate::emitter::TempKind;

/// Method names of one additive operator.
struct Additive {
    /// `Value::long_sub(l, r)`
    long_op: &'static str,
    /// `l.sub(&r)`
    op: &'static str,
    /// `l.sub_long(r)`
    op_long: &'static str,
    /// `r.sub_rev(l)`
    op_rev: &'static str,
    /// `l - r` on doubles
    symbol: &'static str,
}

const ADD: Additive = Additive {
    long_op: "long_add",
    op: "add",
    op_long: "add_long",
    op_rev: "add_rev",
    symbol: "+",
};

const SUB: Additive = Additive {
    long_op: "long_sub",
    op: "sub",
    op_long: "sub_long",
    op_rev: "sub_rev",
    symbol: "-",
};

const MUL: Additive = Additive {
    long_op: "long_mul",
    op: "mul",
    op_long: "mul_long",
    op_rev: "mul_rev",
    symbol: "*",
};

impl Compiler<'_> {
    pub(super) fn generate_binary(&mut self, op: BinaryOp, left: ExprId, right: ExprId) -> GenResult {
        match op {
            BinaryOp::Add => self.generate_additive(&ADD, left, right),
            BinaryOp::Sub => self.generate_additive(&SUB, left, right),
            BinaryOp::Mul => self.generate_additive(&MUL, left, right),
            BinaryOp::Div => {
                let l = self.generate_double(left)?;
                let r = self.generate_double(right)?;
                Ok(self.bind(TempKind::Value, &format!("Value::Double({l} / {r})")))
            }
            BinaryOp::Mod => {
                let l = self.generate_long(left)?;
                let r = self.generate_long(right)?;
                Ok(self.bind(
                    TempKind::Value,
                    &format!("Value::Long(ops::long_rem({l}, {r})?)"),
                ))
            }
            BinaryOp::Concat => {
                let l = self.generate_string(left)?;
                let r = self.generate_string(right)?;
                Ok(self.bind(TempKind::Value, &format!("Value::from({l} + &{r})")))
            }
            BinaryOp::Eq
            | BinaryOp::NotEq
            | BinaryOp::Lt
            | BinaryOp::LtEq
            | BinaryOp::Gt
            | BinaryOp::GtEq => {
                let l = self.generate(left)?;
                let r = self.generate(right)?;
                Ok(self.bind(
                    TempKind::Value,
                    &format!("Value::Bool(ops::compare(BinaryOp::{op:?}, &{l}, &{r})?)"),
                ))
            }
        }
    }

    /// Add, Sub and Mul: the representation of each operand is chosen from
    /// the static hints of both.
    fn generate_additive(&mut self, op: &Additive, left: ExprId, right: ExprId) -> GenResult {
        let lh = self.hint(left);
        let rh = self.hint(right);
        let expr = if StaticType::is_double(lh) || StaticType::is_double(rh) {
            let l = self.generate_double(left)?;
            let r = self.generate_double(right)?;
            format!("Value::Double({l} {} {r})", op.symbol)
        } else if StaticType::is_long(lh) && StaticType::is_long(rh) {
            let l = self.generate_long(left)?;
            let r = self.generate_long(right)?;
            format!("Value::{}({l}, {r})", op.long_op)
        } else if StaticType::is_long(lh) {
            let l = self.generate_long(left)?;
            let r = self.generate(right)?;
            format!("{r}.{}({l})", op.op_rev)
        } else if StaticType::is_long(rh) {
            let l = self.generate(left)?;
            let r = self.generate_long(right)?;
            format!("{l}.{}({r})", op.op_long)
        } else {
            let l = self.generate(left)?;
            let r = self.generate(right)?;
            format!("{l}.{}(&{r})", op.op)
        };
        Ok(self.bind(TempKind::Value, &expr))
    }

    pub(super) fn generate_cast(&mut self, ty: CastType, operand: ExprId) -> GenResult {
        let expr = match ty {
            CastType::Long => format!("Value::Long({})", self.generate_long(operand)?),
            CastType::Double => format!("Value::Double({})", self.generate_double(operand)?),
            CastType::String => format!("Value::from({})", self.generate_string(operand)?),
            CastType::Boolean => format!("Value::Bool({})", self.generate_boolean(operand)?),
        };
        Ok(self.bind(TempKind::Value, &expr))
    }
}

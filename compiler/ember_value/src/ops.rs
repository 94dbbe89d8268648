//! Operators on values.
//!
//! Operators never mutate an operand. Add, Sub and Mul stay in `Long` while
//! both operands are integral and promote to `Double` on overflow; the
//! `_long` and `_rev` variants take one operand as a raw `i64` so compiled
//! code can skip boxing a statically known long. Division always produces
//! a `Double`.

use ember_ir::BinaryOp;
use std::cmp::Ordering;

use crate::errors::{modulo_by_zero, nesting_too_deep};
use crate::numeric::{parse_numeric, Numeric};
use crate::{EvalError, EvalResult, Value};

#[inline]
fn arith(
    left: Numeric,
    right: Numeric,
    long_op: fn(i64, i64) -> Value,
    double_op: fn(f64, f64) -> f64,
) -> Value {
    match (left, right) {
        (Numeric::Long(l), Numeric::Long(r)) => long_op(l, r),
        (l, r) => Value::Double(double_op(l.to_double(), r.to_double())),
    }
}

/// `a % b` on longs. Fails on a zero divisor; `i64::MIN % -1` is 0.
#[inline]
pub fn long_rem(a: i64, b: i64) -> Result<i64, EvalError> {
    if b == 0 {
        Err(modulo_by_zero())
    } else {
        Ok(a.wrapping_rem(b))
    }
}

macro_rules! additive_ops {
    ($op:ident, $op_long:ident, $op_rev:ident, $long_op:ident, $checked:ident, $float:tt) => {
        /// Long operator used when both operands are known longs; overflow
        /// promotes to `Double`.
        #[inline]
        pub fn $long_op(l: i64, r: i64) -> Value {
            match l.$checked(r) {
                Some(v) => Value::Long(v),
                None => Value::Double((l as f64) $float (r as f64)),
            }
        }

        pub fn $op(&self, other: &Value) -> Value {
            arith(self.to_number(), other.to_number(), Value::$long_op, |l, r| l $float r)
        }

        /// `self op r` with `r` a raw long.
        pub fn $op_long(&self, r: i64) -> Value {
            arith(self.to_number(), Numeric::Long(r), Value::$long_op, |l, r| l $float r)
        }

        /// `l op self` with `l` a raw long.
        pub fn $op_rev(&self, l: i64) -> Value {
            arith(Numeric::Long(l), self.to_number(), Value::$long_op, |l, r| l $float r)
        }
    };
}

impl Value {
    additive_ops!(add_numbers, add_long, add_rev, long_add, checked_add, +);
    additive_ops!(sub, sub_long, sub_rev, long_sub, checked_sub, -);
    additive_ops!(mul, mul_long, mul_rev, long_mul, checked_mul, *);

    /// `self + other`. Two arrays form their union (left keys win).
    pub fn add(&self, other: &Value) -> Value {
        if let (Value::Array(left), Value::Array(right)) = (self, other) {
            let mut union = left.read().deep_copy();
            if !left.ptr_eq(right) {
                for (key, value) in right.read().iter() {
                    if !union.contains_key(key) {
                        union.insert(key.clone(), value.copy());
                    }
                }
            }
            return Value::from_array(union);
        }
        self.add_numbers(other)
    }

    /// `self / other`, always a `Double`; zero divisors follow IEEE.
    pub fn div(&self, other: &Value) -> Value {
        Value::Double(self.to_double() / other.to_double())
    }

    /// `self % other` on the long conversions.
    pub fn rem(&self, other: &Value) -> EvalResult {
        Ok(Value::Long(long_rem(self.to_long(), other.to_long())?))
    }

    pub fn neg(&self) -> Value {
        match self.to_number() {
            Numeric::Long(l) => match l.checked_neg() {
                Some(v) => Value::Long(v),
                None => Value::Double(-(l as f64)),
            },
            Numeric::Double(d) => Value::Double(-d),
        }
    }

    pub fn concat(&self, other: &Value) -> Value {
        let mut out = self.to_string();
        out.push_str(&other.to_str());
        Value::string(out)
    }

    /// Loose equality (`==`).
    pub fn loose_eq(&self, other: &Value) -> Result<bool, EvalError> {
        Ok(self.loose_cmp(other)? == Some(Ordering::Equal))
    }

    /// Loose comparison; `None` when the operands are uncomparable (NaN,
    /// arrays with disjoint keys, distinct objects). Fails on containers
    /// nested deeper than [`MAX_COMPARE_DEPTH`], which is how a cycle of
    /// objects ends.
    pub fn loose_cmp(&self, other: &Value) -> Result<Option<Ordering>, EvalError> {
        self.loose_cmp_at(other, 0)
    }

    fn loose_cmp_at(&self, other: &Value, depth: usize) -> Result<Option<Ordering>, EvalError> {
        Ok(match (self, other) {
            (Value::Null | Value::Unset, Value::Null | Value::Unset) => Some(Ordering::Equal),
            (Value::Null | Value::Unset, Value::Str(s)) => Some(cmp_strings("", s)),
            (Value::Str(s), Value::Null | Value::Unset) => Some(cmp_strings(s, "")),
            (Value::Bool(_) | Value::Null | Value::Unset, _)
            | (_, Value::Bool(_) | Value::Null | Value::Unset) => {
                Some(self.to_boolean().cmp(&other.to_boolean()))
            }
            (Value::Str(a), Value::Str(b)) => match (parse_numeric(a), parse_numeric(b)) {
                (Some(x), Some(y)) => cmp_numbers(x, y),
                _ => Some(cmp_strings(a, b)),
            },
            (Value::Array(a), Value::Array(b)) => {
                if a.ptr_eq(b) {
                    return Ok(Some(Ordering::Equal));
                }
                // Pairs are collected first so no lock is held while recursing.
                let pairs: Vec<(Value, Option<Value>)> = {
                    let (a, b) = (a.read(), b.read());
                    if a.len() != b.len() {
                        return Ok(Some(a.len().cmp(&b.len())));
                    }
                    a.iter()
                        .map(|(key, left)| (left.clone(), b.get(key).cloned()))
                        .collect()
                };
                let depth = nested(depth)?;
                for (left, right) in pairs {
                    let Some(right) = right else {
                        return Ok(None);
                    };
                    match left.loose_cmp_at(&right, depth)? {
                        Some(Ordering::Equal) => {}
                        unequal => return Ok(unequal),
                    }
                }
                Some(Ordering::Equal)
            }
            (Value::Array(_), _) => Some(Ordering::Greater),
            (_, Value::Array(_)) => Some(Ordering::Less),
            (Value::Object(a), Value::Object(b)) => {
                if a.ptr_eq(b) {
                    return Ok(Some(Ordering::Equal));
                }
                let pairs: Vec<(Value, Option<Value>)> = {
                    let (a, b) = (a.read(), b.read());
                    if a.class_name() != b.class_name() || a.len() != b.len() {
                        return Ok(None);
                    }
                    a.iter()
                        .map(|(name, value)| (value.clone(), b.get(name).cloned()))
                        .collect()
                };
                let depth = nested(depth)?;
                for (left, right) in pairs {
                    let Some(right) = right else {
                        return Ok(None);
                    };
                    if left.loose_cmp_at(&right, depth)? != Some(Ordering::Equal) {
                        return Ok(None);
                    }
                }
                Some(Ordering::Equal)
            }
            (Value::Object(_), _) => Some(Ordering::Greater),
            (_, Value::Object(_)) => Some(Ordering::Less),
            _ => cmp_numbers(self.to_number(), other.to_number()),
        })
    }
}

/// Containers nested deeper than this are not compared.
pub const MAX_COMPARE_DEPTH: usize = 256;

fn nested(depth: usize) -> Result<usize, EvalError> {
    if depth >= MAX_COMPARE_DEPTH {
        Err(nesting_too_deep())
    } else {
        Ok(depth + 1)
    }
}

fn cmp_strings(a: &str, b: &str) -> Ordering {
    a.as_bytes().cmp(b.as_bytes())
}

fn cmp_numbers(a: Numeric, b: Numeric) -> Option<Ordering> {
    match (a, b) {
        (Numeric::Long(x), Numeric::Long(y)) => Some(x.cmp(&y)),
        (x, y) => x.to_double().partial_cmp(&y.to_double()),
    }
}

/// Evaluate a comparison operator.
pub fn compare(op: BinaryOp, left: &Value, right: &Value) -> Result<bool, EvalError> {
    let ordering = left.loose_cmp(right)?;
    Ok(match op {
        BinaryOp::Eq => ordering == Some(Ordering::Equal),
        BinaryOp::NotEq => ordering != Some(Ordering::Equal),
        BinaryOp::Lt => ordering == Some(Ordering::Less),
        BinaryOp::LtEq => matches!(ordering, Some(Ordering::Less | Ordering::Equal)),
        BinaryOp::Gt => ordering == Some(Ordering::Greater),
        BinaryOp::GtEq => matches!(ordering, Some(Ordering::Greater | Ordering::Equal)),
        BinaryOp::Add
        | BinaryOp::Sub
        | BinaryOp::Mul
        | BinaryOp::Div
        | BinaryOp::Mod
        | BinaryOp::Concat => false,
    })
}

/// Evaluate a binary operator on two already-evaluated operands.
pub fn binary(op: BinaryOp, left: &Value, right: &Value) -> EvalResult {
    match op {
        BinaryOp::Add => Ok(left.add(right)),
        BinaryOp::Sub => Ok(left.sub(right)),
        BinaryOp::Mul => Ok(left.mul(right)),
        BinaryOp::Div => Ok(left.div(right)),
        BinaryOp::Mod => left.rem(right),
        BinaryOp::Concat => Ok(left.concat(right)),
        BinaryOp::Eq
        | BinaryOp::NotEq
        | BinaryOp::Lt
        | BinaryOp::LtEq
        | BinaryOp::Gt
        | BinaryOp::GtEq => Ok(Value::Bool(compare(op, left, right)?)),
    }
}

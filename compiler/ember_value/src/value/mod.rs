//! Runtime values.
//!
//! `Value` is a tagged union. Scalars are inline; arrays and objects are
//! shared containers reached through a `Handle`, so `put`, `append` and
//! `remove` mutate the container rather than the wrapper. Assignment and
//! by-value argument passing use `copy()`, which detaches arrays.
//!
//! Coercions (`to_boolean`, `to_long`, `to_double`, `Display`) are total:
//! every value converts to every primitive without error.

mod container;
mod heap;

use std::fmt;
use std::sync::Arc;

pub use heap::Handle;

use crate::format::format_double;
use crate::numeric::{parse_numeric_prefix, Numeric};
use crate::{ArrayValue, ObjectValue};

/// Runtime value.
#[derive(Clone, Default)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Long(i64),
    Double(f64),
    Str(Arc<str>),
    Array(Handle<ArrayValue>),
    Object(Handle<ObjectValue>),
    /// Result of reading something that does not exist (missing array key,
    /// removed entry). Behaves like `Null` everywhere except `Debug`.
    Unset,
}

impl Value {
    // ===== Factories =====

    #[inline]
    pub fn string(s: impl Into<Arc<str>>) -> Value {
        Value::Str(s.into())
    }

    pub fn empty_array() -> Value {
        Value::Array(Handle::new(ArrayValue::new()))
    }

    pub fn from_array(array: ArrayValue) -> Value {
        Value::Array(Handle::new(array))
    }

    /// Positional array `[v0, v1, ...]`.
    pub fn list(values: impl IntoIterator<Item = Value>) -> Value {
        Value::from_array(ArrayValue::from_values(values))
    }

    pub fn std_object() -> Value {
        Value::Object(Handle::new(ObjectValue::std_class()))
    }

    pub fn from_object(object: ObjectValue) -> Value {
        Value::Object(Handle::new(object))
    }

    // ===== Inspection =====

    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null | Value::Unset => "null",
            Value::Bool(_) => "bool",
            Value::Long(_) => "int",
            Value::Double(_) => "float",
            Value::Str(_) => "string",
            Value::Array(_) => "array",
            Value::Object(_) => "object",
        }
    }

    /// `isset` semantics: anything but null/unset.
    #[inline]
    pub fn is_set(&self) -> bool {
        !self.is_null()
    }

    #[inline]
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null | Value::Unset)
    }

    pub fn as_array(&self) -> Option<&Handle<ArrayValue>> {
        match self {
            Value::Array(handle) => Some(handle),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&Handle<ObjectValue>> {
        match self {
            Value::Object(handle) => Some(handle),
            _ => None,
        }
    }

    /// Element count for arrays; 0 for null, 1 for any other value.
    pub fn count(&self) -> usize {
        match self {
            Value::Array(array) => array.read().len(),
            Value::Null | Value::Unset => 0,
            _ => 1,
        }
    }

    // ===== Coercions =====

    pub fn to_boolean(&self) -> bool {
        match self {
            Value::Null | Value::Unset => false,
            Value::Bool(b) => *b,
            Value::Long(l) => *l != 0,
            Value::Double(d) => *d != 0.0,
            Value::Str(s) => !(s.is_empty() || &**s == "0"),
            Value::Array(array) => !array.read().is_empty(),
            Value::Object(_) => true,
        }
    }

    /// Arithmetic view of the value.
    pub fn to_number(&self) -> Numeric {
        match self {
            Value::Null | Value::Unset => Numeric::Long(0),
            Value::Bool(b) => Numeric::Long(i64::from(*b)),
            Value::Long(l) => Numeric::Long(*l),
            Value::Double(d) => Numeric::Double(*d),
            Value::Str(s) => parse_numeric_prefix(s),
            Value::Array(array) => Numeric::Long(i64::from(!array.read().is_empty())),
            Value::Object(_) => Numeric::Long(1),
        }
    }

    #[expect(
        clippy::cast_possible_truncation,
        reason = "double to long saturates, NaN becomes 0"
    )]
    pub fn to_long(&self) -> i64 {
        match self.to_number() {
            Numeric::Long(l) => l,
            Numeric::Double(d) => d as i64,
        }
    }

    pub fn to_double(&self) -> f64 {
        self.to_number().to_double()
    }

    /// First character of the string conversion, `'\0'` if empty.
    pub fn to_char(&self) -> char {
        match self {
            Value::Str(s) => s.chars().next().unwrap_or('\0'),
            _ => self.to_string().chars().next().unwrap_or('\0'),
        }
    }

    /// String conversion without copying when already a string.
    pub fn to_str(&self) -> Arc<str> {
        match self {
            Value::Str(s) => Arc::clone(s),
            _ => Arc::from(self.to_string()),
        }
    }

    /// Value-semantics copy: arrays are copied recursively, everything else
    /// (including object handles) is shared.
    pub fn copy(&self) -> Value {
        match self {
            Value::Array(array) => Value::from_array(array.read().deep_copy()),
            Value::Unset => Value::Null,
            _ => self.clone(),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null | Value::Unset | Value::Bool(false) => Ok(()),
            Value::Bool(true) => f.write_str("1"),
            Value::Long(l) => write!(f, "{l}"),
            Value::Double(d) => f.write_str(&format_double(*d)),
            Value::Str(s) => f.write_str(s),
            Value::Array(_) => f.write_str("Array"),
            Value::Object(_) => f.write_str("Object"),
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("Null"),
            Value::Unset => f.write_str("Unset"),
            Value::Bool(b) => write!(f, "Bool({b})"),
            Value::Long(l) => write!(f, "Long({l})"),
            Value::Double(d) => write!(f, "Double({d:?})"),
            Value::Str(s) => write!(f, "Str({:?})", &**s),
            Value::Array(array) => write!(f, "Array({:?})", &*array.read()),
            Value::Object(object) => {
                let object = object.read();
                write!(f, "Object({}, {} fields)", object.class_name(), object.len())
            }
        }
    }
}

/// Structural equality: arrays compare element-wise, objects by identity,
/// doubles by `==`. Loose language equality is `Value::loose_eq`.
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) | (Value::Unset, Value::Unset) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Long(a), Value::Long(b)) => a == b,
            (Value::Double(a), Value::Double(b)) => a == b,
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::Array(a), Value::Array(b)) => {
                if a.ptr_eq(b) {
                    return true;
                }
                let (a, b) = (a.read(), b.read());
                a.len() == b.len() && a.iter().zip(b.iter()).all(|(x, y)| x == y)
            }
            (Value::Object(a), Value::Object(b)) => a.ptr_eq(b),
            _ => false,
        }
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Long(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Double(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::string(value)
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::string(value)
    }
}

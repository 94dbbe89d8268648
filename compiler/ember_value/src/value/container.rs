//! Element and field access on values.
//!
//! Reads never fail: a missing key or field reads as `Unset`. Writes fail
//! when the receiver is a scalar. Autovivifying accessors (`get_array`,
//! `get_object` and their field forms) create the nested container when
//! the slot is null or unset.

use ember_ir::Name;
use std::sync::Arc;

use super::Value;
use crate::errors::{scalar_as_array, scalar_as_object};
use crate::{ArrayKey, EvalError, EvalResult};

impl Value {
    /// `$this[index]` for reading.
    pub fn get(&self, index: &Value) -> Value {
        match self {
            Value::Array(array) => match ArrayKey::from_value(index) {
                Ok(key) => array.read().get(&key).cloned().unwrap_or(Value::Unset),
                Err(_) => Value::Unset,
            },
            Value::Str(s) => string_offset(s, index.to_long()),
            _ => Value::Unset,
        }
    }

    /// `$this[index] = value`; returns the stored value.
    pub fn put(&self, index: &Value, value: Value) -> EvalResult {
        match self {
            Value::Array(array) => {
                let key = ArrayKey::from_value(index)?;
                array.write().insert(key, value.clone());
                Ok(value)
            }
            _ => Err(scalar_as_array(self)),
        }
    }

    /// `$this[] = value`; returns the stored value.
    pub fn append(&self, value: Value) -> EvalResult {
        match self {
            Value::Array(array) => {
                array.write().push(value.clone())?;
                Ok(value)
            }
            _ => Err(scalar_as_array(self)),
        }
    }

    /// `unset($this[index])`: returns the removed value, or `Unset` if the
    /// key was absent or the receiver holds no elements.
    pub fn remove(&self, index: &Value) -> EvalResult {
        match self {
            Value::Array(array) => {
                let key = ArrayKey::from_value(index)?;
                Ok(array.write().remove(&key).unwrap_or(Value::Unset))
            }
            Value::Str(_) => Err(EvalError::StringOffsetUnset),
            Value::Null
            | Value::Unset
            | Value::Bool(_)
            | Value::Long(_)
            | Value::Double(_)
            | Value::Object(_) => Ok(Value::Unset),
        }
    }

    /// `isset($this[index])`
    pub fn isset_index(&self, index: &Value) -> bool {
        self.get(index).is_set()
    }

    /// Element for `$this[index][..] = ..`, creating an array in a null slot.
    pub fn get_array(&self, index: &Value) -> EvalResult {
        self.vivify_element(index, Value::empty_array)
    }

    /// Element for `$this[index]->f = ..`, creating an object in a null slot.
    pub fn get_object(&self, index: &Value) -> EvalResult {
        self.vivify_element(index, Value::std_object)
    }

    fn vivify_element(&self, index: &Value, create: fn() -> Value) -> EvalResult {
        let Value::Array(array) = self else {
            return Err(scalar_as_array(self));
        };
        let key = ArrayKey::from_value(index)?;
        let mut array = array.write();
        match array.get(&key) {
            Some(existing) if existing.is_set() => Ok(existing.clone()),
            _ => {
                let fresh = create();
                array.insert(key, fresh.clone());
                Ok(fresh)
            }
        }
    }

    /// `$this->field` for reading.
    pub fn get_field(&self, field: Name) -> Value {
        match self {
            Value::Object(object) => object.read().get(field).cloned().unwrap_or(Value::Unset),
            _ => Value::Unset,
        }
    }

    /// `$this->field = value`; returns the stored value.
    pub fn put_field(&self, field: Name, value: Value) -> EvalResult {
        match self {
            Value::Object(object) => {
                object.write().set(field, value.clone());
                Ok(value)
            }
            _ => Err(scalar_as_object(self)),
        }
    }

    /// `unset($this->field)`: returns the removed value or `Unset`.
    pub fn remove_field(&self, field: Name) -> EvalResult {
        match self {
            Value::Object(object) => Ok(object.write().remove(field).unwrap_or(Value::Unset)),
            _ => Ok(Value::Unset),
        }
    }

    pub fn isset_field(&self, field: Name) -> bool {
        self.get_field(field).is_set()
    }

    /// Field for `$this->field[..] = ..`, creating an array in a null slot.
    pub fn get_field_array(&self, field: Name) -> EvalResult {
        self.vivify_field(field, Value::empty_array)
    }

    /// Field for `$this->field->g = ..`, creating an object in a null slot.
    pub fn get_field_object(&self, field: Name) -> EvalResult {
        self.vivify_field(field, Value::std_object)
    }

    fn vivify_field(&self, field: Name, create: fn() -> Value) -> EvalResult {
        let Value::Object(object) = self else {
            return Err(scalar_as_object(self));
        };
        let mut object = object.write();
        match object.get(field) {
            Some(existing) if existing.is_set() => Ok(existing.clone()),
            _ => {
                let fresh = create();
                object.set(field, fresh.clone());
                Ok(fresh)
            }
        }
    }
}

/// Character at `offset`; negative offsets count from the end.
fn string_offset(s: &Arc<str>, offset: i64) -> Value {
    let len = s.chars().count();
    let index = if offset < 0 {
        usize::try_from(offset.unsigned_abs())
            .ok()
            .and_then(|back| len.checked_sub(back))
    } else {
        usize::try_from(offset).ok()
    };
    match index.and_then(|i| s.chars().nth(i)) {
        Some(c) => Value::string(c.to_string()),
        None => Value::Unset,
    }
}

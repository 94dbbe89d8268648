//! Reference cells.

use parking_lot::RwLock;
use std::fmt;
use std::sync::Arc;

use crate::Value;

/// Shared storage slot for one variable.
///
/// Environments map names to `Var`s; assignment by reference binds two names
/// to the same `Var`, and by-reference arguments hand the callee the `Var`
/// itself.
#[derive(Clone, Default)]
pub struct Var(Arc<RwLock<Value>>);

impl Var {
    pub fn new(value: Value) -> Self {
        Var(Arc::new(RwLock::new(value)))
    }

    /// Current value (container handles are shared, not copied).
    pub fn get(&self) -> Value {
        self.0.read().clone()
    }

    pub fn set(&self, value: Value) {
        *self.0.write() = value;
    }

    pub fn replace(&self, value: Value) -> Value {
        std::mem::replace(&mut *self.0.write(), value)
    }

    pub fn is_set(&self) -> bool {
        self.0.read().is_set()
    }

    pub fn ptr_eq(&self, other: &Var) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    /// Autovivify to an array when unset or null; return the stored value.
    pub fn to_array(&self) -> Value {
        let mut slot = self.0.write();
        if slot.is_null() {
            *slot = Value::empty_array();
        }
        slot.clone()
    }

    /// Autovivify to a `stdClass` object when unset or null.
    pub fn to_object(&self) -> Value {
        let mut slot = self.0.write();
        if slot.is_null() {
            *slot = Value::std_object();
        }
        slot.clone()
    }
}

impl From<Value> for Var {
    fn from(value: Value) -> Self {
        Var::new(value)
    }
}

impl fmt::Debug for Var {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Var({:?})", *self.0.read())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clones_share_storage() {
        let a = Var::new(Value::Long(1));
        let b = a.clone();
        b.set(Value::Long(2));
        assert_eq!(a.get(), Value::Long(2));
        assert!(a.ptr_eq(&b));
    }

    #[test]
    fn test_to_array_autovivifies_null_only() {
        let var = Var::default();
        assert!(!var.is_set());
        let array = var.to_array();
        assert!(matches!(array, Value::Array(_)));
        assert!(var.is_set());

        let scalar = Var::new(Value::Long(3));
        assert_eq!(scalar.to_array(), Value::Long(3));
    }
}

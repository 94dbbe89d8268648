//! Object container.

use ember_ir::Name;
use std::fmt;
use std::sync::Arc;

use crate::Value;

/// Class name plus ordered field map.
///
/// Field names are interned; objects are compared and copied by handle.
#[derive(Clone)]
pub struct ObjectValue {
    class_name: Arc<str>,
    fields: Vec<(Name, Value)>,
}

impl ObjectValue {
    /// Class of objects created by autovivification.
    pub const STD_CLASS: &'static str = "stdClass";

    pub fn new(class_name: impl Into<Arc<str>>) -> Self {
        ObjectValue {
            class_name: class_name.into(),
            fields: Vec::new(),
        }
    }

    pub fn std_class() -> Self {
        Self::new(Self::STD_CLASS)
    }

    pub fn class_name(&self) -> &str {
        &self.class_name
    }

    pub fn get(&self, field: Name) -> Option<&Value> {
        self.fields
            .iter()
            .find_map(|(name, value)| (*name == field).then_some(value))
    }

    pub fn set(&mut self, field: Name, value: Value) -> Option<Value> {
        match self.fields.iter_mut().find(|(name, _)| *name == field) {
            Some((_, slot)) => Some(std::mem::replace(slot, value)),
            None => {
                self.fields.push((field, value));
                None
            }
        }
    }

    pub fn remove(&mut self, field: Name) -> Option<Value> {
        let pos = self.fields.iter().position(|(name, _)| *name == field)?;
        Some(self.fields.remove(pos).1)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Name, &Value)> {
        self.fields.iter().map(|(name, value)| (*name, value))
    }
}

impl fmt::Debug for ObjectValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Field values are omitted: objects may reference themselves.
        f.debug_struct("ObjectValue")
            .field("class_name", &self.class_name)
            .field("fields", &self.fields.iter().map(|(n, _)| n).collect::<Vec<_>>())
            .finish()
    }
}

//! Ordered array container.

use rustc_hash::FxHashMap;
use std::fmt;
use std::sync::Arc;

use crate::errors::{illegal_offset, next_index_overflow};
use crate::numeric::canonical_long;
use crate::{EvalError, Value};

/// Array key after normalization.
///
/// Canonical integer strings become `Long` keys, bools become 0/1, doubles
/// truncate, null becomes the empty string.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum ArrayKey {
    Long(i64),
    Str(Arc<str>),
}

impl ArrayKey {
    /// Normalize a value used as an array index.
    pub fn from_value(value: &Value) -> Result<ArrayKey, EvalError> {
        match value {
            Value::Null | Value::Unset => Ok(ArrayKey::Str(Arc::from(""))),
            Value::Bool(b) => Ok(ArrayKey::Long(i64::from(*b))),
            Value::Long(l) => Ok(ArrayKey::Long(*l)),
            #[expect(
                clippy::cast_possible_truncation,
                reason = "double keys truncate toward zero"
            )]
            Value::Double(d) => Ok(ArrayKey::Long(*d as i64)),
            Value::Str(s) => Ok(ArrayKey::from_arc_str(s)),
            Value::Array(_) | Value::Object(_) => Err(illegal_offset(value)),
        }
    }

    pub fn from_arc_str(s: &Arc<str>) -> ArrayKey {
        match canonical_long(s) {
            Some(l) => ArrayKey::Long(l),
            None => ArrayKey::Str(Arc::clone(s)),
        }
    }

    pub fn to_value(&self) -> Value {
        match self {
            ArrayKey::Long(l) => Value::Long(*l),
            ArrayKey::Str(s) => Value::Str(Arc::clone(s)),
        }
    }
}

impl From<i64> for ArrayKey {
    fn from(value: i64) -> Self {
        ArrayKey::Long(value)
    }
}

impl From<&str> for ArrayKey {
    fn from(value: &str) -> Self {
        ArrayKey::from_arc_str(&Arc::from(value))
    }
}

impl fmt::Display for ArrayKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArrayKey::Long(l) => write!(f, "{l}"),
            ArrayKey::Str(s) => f.write_str(s),
        }
    }
}

/// Insertion-ordered map from keys to values with a next-free integer index.
///
/// Removal leaves a hole in `slots`; holes are squeezed out once they
/// outnumber live entries, so removal is amortized O(1) and iteration
/// keeps insertion order.
#[derive(Clone)]
pub struct ArrayValue {
    slots: Vec<Option<(ArrayKey, Value)>>,
    positions: FxHashMap<ArrayKey, usize>,
    /// `None` once `i64::MAX` has been used as a key.
    next_index: Option<i64>,
}

/// Below this many slots holes are never compacted.
const MIN_COMPACT_SLOTS: usize = 16;

impl Default for ArrayValue {
    fn default() -> Self {
        ArrayValue {
            slots: Vec::new(),
            positions: FxHashMap::default(),
            next_index: Some(0),
        }
    }
}

impl ArrayValue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Positional array `[v0, v1, ...]`.
    pub fn from_values(values: impl IntoIterator<Item = Value>) -> Self {
        let mut array = ArrayValue::new();
        for (index, value) in (0..).zip(values) {
            array.insert(ArrayKey::Long(index), value);
        }
        array
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// The index `push` will use next; `None` when integer keys are
    /// exhausted.
    #[inline]
    pub fn next_index(&self) -> Option<i64> {
        self.next_index
    }

    pub fn get(&self, key: &ArrayKey) -> Option<&Value> {
        let &pos = self.positions.get(key)?;
        self.slots[pos].as_ref().map(|(_, value)| value)
    }

    pub fn contains_key(&self, key: &ArrayKey) -> bool {
        self.positions.contains_key(key)
    }

    /// Insert or replace. Replacing keeps the key's position.
    pub fn insert(&mut self, key: ArrayKey, value: Value) -> Option<Value> {
        if let Some(&pos) = self.positions.get(&key) {
            if let Some((_, slot)) = self.slots[pos].as_mut() {
                return Some(std::mem::replace(slot, value));
            }
        }
        if let (ArrayKey::Long(l), Some(next)) = (&key, self.next_index) {
            if *l >= next {
                self.next_index = l.checked_add(1);
            }
        }
        self.positions.insert(key.clone(), self.slots.len());
        self.slots.push(Some((key, value)));
        None
    }

    /// Append at the next free integer index. Fails once `i64::MAX` is
    /// taken rather than overwrite it.
    pub fn push(&mut self, value: Value) -> Result<ArrayKey, EvalError> {
        let index = self.next_index.ok_or_else(next_index_overflow)?;
        let key = ArrayKey::Long(index);
        self.insert(key.clone(), value);
        Ok(key)
    }

    /// Remove a key. The next free index is not rewound.
    pub fn remove(&mut self, key: &ArrayKey) -> Option<Value> {
        let pos = self.positions.remove(key)?;
        let (_, value) = self.slots[pos].take()?;
        if self.slots.len() >= MIN_COMPACT_SLOTS && self.positions.len() * 2 < self.slots.len() {
            self.compact();
        }
        Some(value)
    }

    fn compact(&mut self) {
        self.slots.retain(Option::is_some);
        for (pos, (key, _)) in self.slots.iter().flatten().enumerate() {
            if let Some(p) = self.positions.get_mut(key) {
                *p = pos;
            }
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&ArrayKey, &Value)> {
        self.slots.iter().flatten().map(|(k, v)| (k, v))
    }

    pub fn keys(&self) -> impl Iterator<Item = &ArrayKey> {
        self.iter().map(|(k, _)| k)
    }

    pub fn values(&self) -> impl Iterator<Item = &Value> {
        self.iter().map(|(_, v)| v)
    }

    /// Copy with every nested array copied as well.
    pub fn deep_copy(&self) -> ArrayValue {
        let mut copy = ArrayValue {
            slots: Vec::with_capacity(self.len()),
            positions: FxHashMap::default(),
            next_index: self.next_index,
        };
        for (key, value) in self.iter() {
            copy.positions.insert(key.clone(), copy.slots.len());
            copy.slots.push(Some((key.clone(), value.copy())));
        }
        copy
    }
}

impl fmt::Debug for ArrayValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

//! [`Value`] and [`Table`], the dynamic value model carried by the codec.

use std::fmt;
use std::hash::{Hash, Hasher};

use indexmap::IndexMap;

/// A host value.
///
/// Everything except [`Value::Host`] has a wire encoding. Equality is wire
/// identity: numbers compare by bit pattern, so `NaN == NaN` when the bits
/// match and `0.0 != -0.0`.
#[derive(Debug, Clone)]
pub enum Value {
    Nil,
    Bool(bool),
    Number(f64),
    /// Byte string; may hold any byte including zero.
    Bytes(Vec<u8>),
    Table(Table),
    /// A host object the format cannot carry.
    Host(HostKind),
}

/// Host value kinds outside the encodable set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HostKind {
    Function,
    Userdata,
    LightUserdata,
    Thread,
}

impl HostKind {
    pub fn name(self) -> &'static str {
        match self {
            HostKind::Function => "function",
            HostKind::Userdata => "userdata",
            HostKind::LightUserdata => "lightuserdata",
            HostKind::Thread => "thread",
        }
    }
}

impl fmt::Display for HostKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl Value {
    /// Host-side type name of this value.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Value::Nil => "nil",
            Value::Bool(_) => "boolean",
            Value::Number(_) => "number",
            Value::Bytes(_) => "string",
            Value::Table(_) => "table",
            Value::Host(kind) => kind.name(),
        }
    }

    pub fn is_nil(&self) -> bool {
        matches!(self, Value::Nil)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Value::Bytes(b) => Some(b),
            _ => None,
        }
    }

    pub fn as_table(&self) -> Option<&Table> {
        match self {
            Value::Table(t) => Some(t),
            _ => None,
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Nil, Value::Nil) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Number(a), Value::Number(b)) => a.to_bits() == b.to_bits(),
            (Value::Bytes(a), Value::Bytes(b)) => a == b,
            (Value::Table(a), Value::Table(b)) => a == b,
            (Value::Host(a), Value::Host(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for Value {}

impl Hash for Value {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            Value::Nil => {}
            Value::Bool(b) => b.hash(state),
            Value::Number(n) => n.to_bits().hash(state),
            Value::Bytes(b) => b.hash(state),
            // Entries in order, matching `eq`; the sequence hint is not part of equality.
            Value::Table(t) => {
                t.len().hash(state);
                for (key, value) in t {
                    key.hash(state);
                    value.hash(state);
                }
            }
            Value::Host(kind) => kind.hash(state),
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Number(n as f64)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Bytes(s.as_bytes().to_vec())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Bytes(s.into_bytes())
    }
}

impl From<&[u8]> for Value {
    fn from(b: &[u8]) -> Self {
        Value::Bytes(b.to_vec())
    }
}

impl From<Vec<u8>> for Value {
    fn from(b: Vec<u8>) -> Self {
        Value::Bytes(b)
    }
}

impl From<Table> for Value {
    fn from(t: Table) -> Self {
        Value::Table(t)
    }
}

/// An insertion-ordered associative table.
///
/// Keys are unique; inserting an existing key replaces its value in place.
/// The optional sequence hint plays the role of the host's length operator
/// and only affects the size header written by the encoder.
#[derive(Debug, Clone, Default)]
pub struct Table {
    entries: IndexMap<Value, Value>,
    sequence_hint: Option<usize>,
}

impl Table {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: IndexMap::with_capacity(capacity),
            sequence_hint: None,
        }
    }

    /// Builds an array-like table with keys `1..=n`.
    pub fn from_sequence<I>(values: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Value>,
    {
        let entries: IndexMap<Value, Value> = values
            .into_iter()
            .enumerate()
            .map(|(i, v)| (Value::Number((i + 1) as f64), v.into()))
            .collect();
        let n = entries.len();
        Self {
            entries,
            sequence_hint: Some(n),
        }
    }

    /// Sets the declared sequence length.
    pub fn with_sequence_hint(mut self, hint: usize) -> Self {
        self.sequence_hint = Some(hint);
        self
    }

    pub fn set_sequence_hint(&mut self, hint: Option<usize>) {
        self.sequence_hint = hint;
    }

    pub fn sequence_hint(&self) -> Option<usize> {
        self.sequence_hint
    }

    /// Declared sequence length, or the border of the `1..=n` key run when
    /// nothing was declared.
    pub fn sequence_len(&self) -> usize {
        if let Some(hint) = self.sequence_hint {
            return hint;
        }
        let mut n = 0usize;
        while self.entries.contains_key(&Value::Number((n + 1) as f64)) {
            n += 1;
        }
        n
    }

    /// Inserts `value` under `key`, returning the value it replaced.
    pub fn insert(&mut self, key: impl Into<Value>, value: impl Into<Value>) -> Option<Value> {
        self.entries.insert(key.into(), value.into())
    }

    pub fn get(&self, key: &Value) -> Option<&Value> {
        self.entries.get(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Value, &Value)> {
        self.entries.iter()
    }
}

impl PartialEq for Table {
    fn eq(&self, other: &Self) -> bool {
        self.entries.len() == other.entries.len() && self.entries.iter().eq(other.entries.iter())
    }
}

impl Eq for Table {}

impl FromIterator<(Value, Value)> for Table {
    fn from_iter<I: IntoIterator<Item = (Value, Value)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
            sequence_hint: None,
        }
    }
}

impl<'a> IntoIterator for &'a Table {
    type Item = (&'a Value, &'a Value);
    type IntoIter = indexmap::map::Iter<'a, Value, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

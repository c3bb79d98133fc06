//! Conversion from `serde_json` documents into [`Value`] trees.
//!
//! - `null` → `Nil`, booleans and numbers map directly
//! - strings → UTF-8 byte strings
//! - arrays → sequence tables keyed `1..=n`
//! - objects → tables keyed by byte-string field names, in document order

use crate::{Table, Value};

impl From<&serde_json::Value> for Value {
    fn from(v: &serde_json::Value) -> Self {
        match v {
            serde_json::Value::Null => Value::Nil,
            serde_json::Value::Bool(b) => Value::Bool(*b),
            serde_json::Value::Number(n) => Value::Number(n.as_f64().unwrap_or(f64::NAN)),
            serde_json::Value::String(s) => Value::from(s.as_str()),
            serde_json::Value::Array(arr) => {
                Value::Table(Table::from_sequence(arr.iter().map(Value::from)))
            }
            serde_json::Value::Object(obj) => Value::Table(
                obj.iter()
                    .map(|(k, v)| (Value::from(k.as_str()), Value::from(v)))
                    .collect(),
            ),
        }
    }
}

impl From<serde_json::Value> for Value {
    fn from(v: serde_json::Value) -> Self {
        Value::from(&v)
    }
}

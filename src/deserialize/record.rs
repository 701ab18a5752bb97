//! Resolved records
//!
//! A [`Record`] holds exactly the fields that were committed during a
//! successful resolve. Optional fields that had neither a value nor a default
//! are absent, not null.

use std::collections::BTreeMap;

use serde::{Serialize, Serializer};
use serde_json::{Map, Number, Value};

/// A committed field value
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    /// String primitive
    String(String),
    /// Number primitive, kept as parsed
    Number(Number),
    /// Boolean primitive
    Boolean(bool),
    /// Opaque object, stored verbatim
    Object(Map<String, Value>),
    /// Nested record
    Record(Record),
}

impl FieldValue {
    /// Converts back to a JSON value
    pub fn to_value(&self) -> Value {
        match self {
            FieldValue::String(s) => Value::String(s.clone()),
            FieldValue::Number(n) => Value::Number(n.clone()),
            FieldValue::Boolean(b) => Value::Bool(*b),
            FieldValue::Object(map) => Value::Object(map.clone()),
            FieldValue::Record(record) => record.to_value(),
        }
    }

    /// Consumes the value into JSON
    pub fn into_value(self) -> Value {
        match self {
            FieldValue::String(s) => Value::String(s),
            FieldValue::Number(n) => Value::Number(n),
            FieldValue::Boolean(b) => Value::Bool(b),
            FieldValue::Object(map) => Value::Object(map),
            FieldValue::Record(record) => record.into_value(),
        }
    }
}

/// A fully resolved instance of a schema
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Record {
    type_name: String,
    fields: BTreeMap<String, FieldValue>,
}

impl Record {
    pub(crate) fn new(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            fields: BTreeMap::new(),
        }
    }

    pub(crate) fn insert(&mut self, name: impl Into<String>, value: FieldValue) {
        self.fields.insert(name.into(), value);
    }

    /// Name of the schema this record was resolved against
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    /// Gets a field value
    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.fields.get(name)
    }

    /// Checks if a field is present
    pub fn contains(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    /// Present field names, sorted
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    /// Iterates over present fields
    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of present fields
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns true if no field is present
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Gets a string field
    pub fn get_str(&self, name: &str) -> Option<&str> {
        match self.get(name)? {
            FieldValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// Gets a number field as `f64`
    pub fn get_f64(&self, name: &str) -> Option<f64> {
        match self.get(name)? {
            FieldValue::Number(n) => n.as_f64(),
            _ => None,
        }
    }

    /// Gets a number field as `i64`, if it is an integer in range
    pub fn get_i64(&self, name: &str) -> Option<i64> {
        match self.get(name)? {
            FieldValue::Number(n) => n.as_i64(),
            _ => None,
        }
    }

    /// Gets a boolean field
    pub fn get_bool(&self, name: &str) -> Option<bool> {
        match self.get(name)? {
            FieldValue::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    /// Gets an opaque object field
    pub fn get_object(&self, name: &str) -> Option<&Map<String, Value>> {
        match self.get(name)? {
            FieldValue::Object(map) => Some(map),
            _ => None,
        }
    }

    /// Gets a nested record field
    pub fn get_record(&self, name: &str) -> Option<&Record> {
        match self.get(name)? {
            FieldValue::Record(record) => Some(record),
            _ => None,
        }
    }

    /// Converts the record to a JSON object
    pub fn to_value(&self) -> Value {
        Value::Object(
            self.fields
                .iter()
                .map(|(k, v)| (k.clone(), v.to_value()))
                .collect(),
        )
    }

    /// Consumes the record into a JSON object
    pub fn into_value(self) -> Value {
        Value::Object(
            self.fields
                .into_iter()
                .map(|(k, v)| (k, v.into_value()))
                .collect(),
        )
    }
}

/// Serializes as a plain map of the present fields.
impl Serialize for Record {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(&self.fields)
    }
}

//! Deserializer engine
//!
//! Resolution of one schema level:
//! 1. Own fields not shadowed by a more derived level are resolved in
//!    declaration order
//! 2. Own field names join the shadow set
//! 3. The base schema is resolved next into the same record, with its errors
//!    appended after this level's
//!
//! A field is resolved in three steps: presence (value, default, skip or
//! missing), type (exact JSON kind, no coercion), then every constraint in
//! order. A type failure ends the field; constraints are not evaluated.
//!
//! The engine performs no I/O and never mutates a schema, so one schema can be
//! resolved from any number of threads at once.

use std::collections::HashSet;

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use super::errors::{DeserializeError, DeserializeResult, FieldError};
use super::record::{FieldValue, Record};
use crate::observability::{Event, Logger};
use crate::schema::{json_type_name, FieldDescriptor, TypeCategory, TypeSchema};

/// Default limit on nested record depth
pub const DEFAULT_MAX_DEPTH: usize = 64;

/// Validating deserializer
///
/// Holds only limits; it carries no state between calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Deserializer {
    max_depth: usize,
}

impl Default for Deserializer {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

/// Result of resolving a single field
enum FieldOutcome {
    /// Value passed every check
    Committed(FieldValue),
    /// Optional field absent without default
    Skipped,
    /// Field failed
    Failed(FieldError),
}

impl Deserializer {
    /// Creates a deserializer with default limits
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets how many levels of nested records may appear below the top-level
    /// record. Zero means no nested records at all.
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Configured depth limit
    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Resolves `input` against `schema`.
    ///
    /// Returns the populated record, or every field violation found. A failed
    /// call never yields a partial record.
    pub fn resolve(&self, schema: &TypeSchema, input: &Value) -> DeserializeResult<Record> {
        let object = input.as_object().ok_or_else(|| DeserializeError::InputShape {
            actual: json_type_name(input),
        })?;

        let (record, errors) = match self.resolve_object(schema, object, 0) {
            Ok(resolved) => resolved,
            Err(e) => {
                Logger::warn(
                    Event::ResolveAborted.as_str(),
                    &[("type", schema.name()), ("code", e.code())],
                );
                return Err(e);
            }
        };

        if errors.is_empty() {
            Logger::trace(
                Event::ResolveSucceeded.as_str(),
                &[("type", schema.name()), ("fields", &record.len().to_string())],
            );
            Ok(record)
        } else {
            Logger::trace(
                Event::ResolveFailed.as_str(),
                &[("type", schema.name()), ("errors", &errors.len().to_string())],
            );
            Err(DeserializeError::Invalid(errors))
        }
    }

    /// Resolves `input` against `schema`, then converts the record into `T`.
    pub fn resolve_as<T: DeserializeOwned>(
        &self,
        schema: &TypeSchema,
        input: &Value,
    ) -> DeserializeResult<T> {
        let record = self.resolve(schema, input)?;
        serde_json::from_value(record.into_value())
            .map_err(|e| DeserializeError::Conversion(e.to_string()))
    }

    /// Walks the base chain of `schema` against one JSON object.
    ///
    /// Only `SchemaTooDeep` is returned as `Err`; field failures are collected
    /// into the error list.
    fn resolve_object(
        &self,
        schema: &TypeSchema,
        object: &Map<String, Value>,
        depth: usize,
    ) -> DeserializeResult<(Record, Vec<FieldError>)> {
        let mut record = Record::new(schema.name());
        let mut errors = Vec::new();
        let mut shadowed: HashSet<&str> = HashSet::new();

        for level in schema.lineage() {
            for field in level.own_fields() {
                if shadowed.contains(field.name()) {
                    continue;
                }
                match self.resolve_field(field, object.get(field.name()), depth)? {
                    FieldOutcome::Committed(value) => record.insert(field.name(), value),
                    FieldOutcome::Skipped => {}
                    FieldOutcome::Failed(error) => errors.push(error),
                }
            }
            shadowed.extend(level.own_fields().iter().map(|f| f.name()));
        }

        Ok((record, errors))
    }

    fn resolve_field(
        &self,
        field: &FieldDescriptor,
        supplied: Option<&Value>,
        depth: usize,
    ) -> DeserializeResult<FieldOutcome> {
        let raw = match (supplied, field.default_value()) {
            (Some(value), _) => value,
            (None, Some(default)) => default,
            (None, None) if field.is_optional() => return Ok(FieldOutcome::Skipped),
            (None, None) => return Ok(FieldOutcome::Failed(FieldError::missing(field.name()))),
        };

        let value = match self.resolve_category(field, raw, depth)? {
            Ok(value) => value,
            Err(error) => return Ok(FieldOutcome::Failed(error)),
        };

        let messages: Vec<String> = field
            .validators()
            .iter()
            .filter(|validator| !validator.check(raw))
            .map(|validator| validator.message().to_string())
            .collect();

        if messages.is_empty() {
            Ok(FieldOutcome::Committed(value))
        } else {
            Ok(FieldOutcome::Failed(FieldError::constraints(
                field.name(),
                messages,
            )))
        }
    }

    /// Type step of a field. The outer `Result` carries call-level aborts,
    /// the inner one the field's own type or nested failure.
    fn resolve_category(
        &self,
        field: &FieldDescriptor,
        raw: &Value,
        depth: usize,
    ) -> DeserializeResult<Result<FieldValue, FieldError>> {
        let mismatch = || FieldError::type_mismatch(field.name(), field.category().expected_type());

        let value = match (field.category(), raw) {
            (TypeCategory::Primitive(kind), _) if !kind.matches(raw) => Err(mismatch()),
            (TypeCategory::Primitive(_), Value::String(s)) => Ok(FieldValue::String(s.clone())),
            (TypeCategory::Primitive(_), Value::Number(n)) => Ok(FieldValue::Number(n.clone())),
            (TypeCategory::Primitive(_), Value::Bool(b)) => Ok(FieldValue::Boolean(*b)),
            (TypeCategory::OpaqueObject, Value::Object(map)) => Ok(FieldValue::Object(map.clone())),
            (TypeCategory::Nested(child), Value::Object(map)) => {
                if depth >= self.max_depth {
                    return Err(DeserializeError::SchemaTooDeep {
                        limit: self.max_depth,
                    });
                }
                let (record, errors) = self.resolve_object(child, map, depth + 1)?;
                if errors.is_empty() {
                    Ok(FieldValue::Record(record))
                } else {
                    Err(FieldError::nested(field.name(), errors))
                }
            }
            _ => Err(mismatch()),
        };

        Ok(value)
    }
}

//! Validating deserialization for recordcheck
//!
//! Turns a parsed JSON object into a [`Record`] by walking a [`TypeSchema`]
//! and its base chain, or reports every violation found as a tree of
//! [`FieldError`]s.
//!
//! # Guarantees
//!
//! - No coercion: a field's JSON kind must match its category exactly
//! - Full collection across fields, short-circuit within a field on type errors
//! - A failed call never returns a partially populated record
//! - Errors ordered by declaration, own fields before inherited ones

mod engine;
mod errors;
mod record;
mod report;

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::schema::TypeSchema;

pub use engine::{Deserializer, DEFAULT_MAX_DEPTH};
pub use errors::{DeserializeError, DeserializeResult, FieldError, Violation, MISSING_FIELD_MESSAGE};
pub use record::{FieldValue, Record};
pub use report::{render, render_lines, INDENT};

/// Resolves `input` against `schema` with default limits.
pub fn resolve(schema: &TypeSchema, input: &Value) -> DeserializeResult<Record> {
    Deserializer::default().resolve(schema, input)
}

/// A Rust type bound to the schema its values are validated against.
pub trait Deserializable: DeserializeOwned {
    /// The schema for this type
    fn schema() -> Arc<TypeSchema>;
}

/// Validates `input` against `T`'s schema and converts it into `T`.
pub fn from_value<T: Deserializable>(input: &Value) -> DeserializeResult<T> {
    Deserializer::default().resolve_as(&T::schema(), input)
}

//! Deserialization errors
//!
//! Error codes:
//! - RC_INPUT_SHAPE: top-level input is not an object
//! - RC_VALIDATION_FAILED: one or more fields are invalid (carries the tree)
//! - RC_SCHEMA_TOO_DEEP: nesting exceeded the configured depth limit
//! - RC_CONVERSION_FAILED: a valid record did not fit the requested Rust type

use serde::ser::{SerializeStruct, Serializer};
use serde::Serialize;
use thiserror::Error;

use super::report::render;

/// Message recorded for an absent required field
pub const MISSING_FIELD_MESSAGE: &str = "required field missing";

/// Result type for deserialization
pub type DeserializeResult<T> = Result<T, DeserializeError>;

/// What went wrong with one field
#[derive(Debug, Clone, PartialEq)]
pub enum Violation {
    /// Required field absent from input
    MissingRequired,
    /// Value present with the wrong JSON type; constraints were not evaluated
    TypeMismatch {
        /// JSON type the field category requires
        expected: &'static str,
    },
    /// Value well typed but rejected by one or more constraints
    Constraints(Vec<String>),
    /// Nested record failed; holds the nested field errors
    Nested(Vec<FieldError>),
}

/// One invalid field and its violation
#[derive(Debug, Clone, PartialEq)]
pub struct FieldError {
    field: String,
    violation: Violation,
}

impl FieldError {
    /// Required field missing
    pub fn missing(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            violation: Violation::MissingRequired,
        }
    }

    /// Wrong JSON type
    pub fn type_mismatch(field: impl Into<String>, expected: &'static str) -> Self {
        Self {
            field: field.into(),
            violation: Violation::TypeMismatch { expected },
        }
    }

    /// Failed constraints, messages in evaluation order
    pub fn constraints(field: impl Into<String>, messages: Vec<String>) -> Self {
        Self {
            field: field.into(),
            violation: Violation::Constraints(messages),
        }
    }

    /// Failed nested record
    pub fn nested(field: impl Into<String>, errors: Vec<FieldError>) -> Self {
        Self {
            field: field.into(),
            violation: Violation::Nested(errors),
        }
    }

    /// Field name
    pub fn field(&self) -> &str {
        &self.field
    }

    /// The violation
    pub fn violation(&self) -> &Violation {
        &self.violation
    }

    /// Message lines for a leaf error. Empty for nested errors.
    pub fn messages(&self) -> Vec<String> {
        match &self.violation {
            Violation::MissingRequired => vec![MISSING_FIELD_MESSAGE.to_string()],
            Violation::TypeMismatch { expected } => {
                vec![format!("value type is incorrect, {} is expected", expected)]
            }
            Violation::Constraints(messages) => messages.clone(),
            Violation::Nested(_) => Vec::new(),
        }
    }

    /// Nested field errors. Empty for leaf errors.
    pub fn children(&self) -> &[FieldError] {
        match &self.violation {
            Violation::Nested(children) => children,
            _ => &[],
        }
    }

    /// Follows a dotted path (`addr.zip`) down the nested errors
    pub fn find(&self, path: &str) -> Option<&FieldError> {
        let (head, rest) = match path.split_once('.') {
            Some((head, rest)) => (head, Some(rest)),
            None => (path, None),
        };
        if head != self.field {
            return None;
        }
        match rest {
            None => Some(self),
            Some(rest) => self.children().iter().find_map(|child| child.find(rest)),
        }
    }
}

/// Serializes as `{"field": ..., "errors": [...]}` where `errors` holds
/// message strings for leaf errors and nested objects otherwise.
impl Serialize for FieldError {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("FieldError", 2)?;
        state.serialize_field("field", &self.field)?;
        match &self.violation {
            Violation::Nested(children) => state.serialize_field("errors", children)?,
            _ => state.serialize_field("errors", &self.messages())?,
        }
        state.end()
    }
}

/// Failure of a whole `resolve` call
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DeserializeError {
    /// The input was not a JSON object
    #[error("input must be an object, got {actual}")]
    InputShape {
        /// JSON type actually supplied
        actual: &'static str,
    },

    /// One or more fields failed; every violation found is included
    #[error("input value does not pass validation:\n{}", render(.0))]
    Invalid(Vec<FieldError>),

    /// Nested records went deeper than the depth limit
    #[error("schema too deep: nesting exceeds {limit} levels")]
    SchemaTooDeep {
        /// Configured limit
        limit: usize,
    },

    /// The validated record could not be converted to the requested type
    #[error("failed to convert validated record: {0}")]
    Conversion(String),
}

impl DeserializeError {
    /// Returns the stable error code
    pub fn code(&self) -> &'static str {
        match self {
            DeserializeError::InputShape { .. } => "RC_INPUT_SHAPE",
            DeserializeError::Invalid(_) => "RC_VALIDATION_FAILED",
            DeserializeError::SchemaTooDeep { .. } => "RC_SCHEMA_TOO_DEEP",
            DeserializeError::Conversion(_) => "RC_CONVERSION_FAILED",
        }
    }

    /// Top-level field errors. Empty unless this is `Invalid`.
    pub fn field_errors(&self) -> &[FieldError] {
        match self {
            DeserializeError::Invalid(errors) => errors,
            _ => &[],
        }
    }

    /// Finds a field error by dotted path
    pub fn find(&self, path: &str) -> Option<&FieldError> {
        self.field_errors().iter().find_map(|e| e.find(path))
    }
}

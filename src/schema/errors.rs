//! Schema configuration errors
//!
//! Every variant describes an authoring mistake found while a schema is being
//! built or loaded from definition files. They are raised once, at
//! construction time, and are never produced by a `resolve` call.
//!
//! Error code: RC_SCHEMA_CONFIGURATION (FATAL for the affected schema)

use thiserror::Error;

/// Result type for schema construction
pub type SchemaResult<T> = Result<T, SchemaError>;

/// Schema construction failures
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SchemaError {
    /// A constraint was built with parameters it cannot work with
    #[error("invalid input for {constraint}: {reason}")]
    InvalidConstraint {
        /// Constraint kind (e.g. "range")
        constraint: String,
        /// Why the parameters were rejected
        reason: String,
    },

    /// A constraint was attached to a field of the wrong category
    #[error("{field}: constraint {constraint} only applies to field type: {expected}")]
    ConstraintTypeMismatch {
        /// Field the constraint was attached to
        field: String,
        /// Constraint name
        constraint: String,
        /// Field type the constraint requires
        expected: &'static str,
    },

    /// An optional field's default does not match the field category
    #[error("{field}: default value must be the same type as field, {expected} is expected")]
    DefaultTypeMismatch {
        /// Field carrying the default
        field: String,
        /// Field type the default must have
        expected: &'static str,
    },

    /// The same field name was declared twice on one type
    #[error("{field}: declared more than once on type '{type_name}'")]
    DuplicateField {
        /// Owning type
        type_name: String,
        /// Repeated field name
        field: String,
    },

    /// A field type that the deserializer cannot handle
    #[error("{field}: {field_type} is not allowed as field type")]
    UnsupportedFieldType {
        /// Field name
        field: String,
        /// Declared type (e.g. "array")
        field_type: String,
    },

    /// Two definitions share a type name
    #[error("type '{0}' is defined more than once")]
    DuplicateType(String),

    /// A definition references a type that does not exist
    #[error("unknown type '{name}' referenced by '{referenced_by}'")]
    UnknownType {
        /// Missing type name
        name: String,
        /// Type whose definition holds the reference
        referenced_by: String,
    },

    /// Definitions reference each other in a loop
    #[error("type reference cycle: {0}")]
    CyclicReference(String),

    /// A definition file could not be read or parsed
    #[error("malformed schema definition '{path}': {reason}")]
    MalformedDefinition {
        /// File path
        path: String,
        /// Read or parse failure
        reason: String,
    },
}

impl SchemaError {
    /// Creates an invalid constraint error
    pub fn invalid_constraint(constraint: impl Into<String>, reason: impl Into<String>) -> Self {
        SchemaError::InvalidConstraint {
            constraint: constraint.into(),
            reason: reason.into(),
        }
    }

    /// Creates a malformed definition error
    pub fn malformed_definition(path: impl Into<String>, reason: impl Into<String>) -> Self {
        SchemaError::MalformedDefinition {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Returns the stable error code
    pub fn code(&self) -> &'static str {
        "RC_SCHEMA_CONFIGURATION"
    }

    /// Schema errors make the affected schema unusable
    pub fn is_fatal(&self) -> bool {
        true
    }
}

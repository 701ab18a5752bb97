//! Constraint validators
//!
//! A constraint is a named predicate over one already type-checked value,
//! plus the message reported when the predicate fails. Validators are
//! immutable and shared freely between threads.
//!
//! Constructors with parameters that can be wrong return `SchemaResult`, so a
//! bad parameter fails while the schema is being written, not while input is
//! being resolved.

mod membership;
mod number;
mod string;

use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use crate::schema::PrimitiveKind;

pub use membership::{blacklist, whitelist};
pub use number::{max, min, range, safe_int, MAX_SAFE_INTEGER};
pub use string::{length_range, no_extra_space, non_empty_string, regex};

type Predicate = dyn Fn(&Value) -> bool + Send + Sync;

/// A named check applied to a field value after its type has been verified.
#[derive(Clone)]
pub struct ConstraintValidator {
    name: String,
    message: String,
    applies_to: Option<PrimitiveKind>,
    predicate: Arc<Predicate>,
}

impl ConstraintValidator {
    /// Creates a validator usable on any field category.
    ///
    /// `name` identifies the validator on a field: attaching a second
    /// validator with the same name replaces the first.
    pub fn new<F>(name: impl Into<String>, message: impl Into<String>, predicate: F) -> Self
    where
        F: Fn(&Value) -> bool + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            message: message.into(),
            applies_to: None,
            predicate: Arc::new(predicate),
        }
    }

    /// Restricts the validator to fields of one primitive kind
    pub fn for_kind(mut self, kind: PrimitiveKind) -> Self {
        self.applies_to = Some(kind);
        self
    }

    /// Validator name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Failure message
    pub fn message(&self) -> &str {
        &self.message
    }

    /// The only primitive kind this validator may be attached to, if restricted
    pub fn applies_to(&self) -> Option<PrimitiveKind> {
        self.applies_to
    }

    /// Runs the predicate
    pub fn check(&self, value: &Value) -> bool {
        (self.predicate)(value)
    }
}

impl fmt::Debug for ConstraintValidator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConstraintValidator")
            .field("name", &self.name)
            .field("message", &self.message)
            .field("applies_to", &self.applies_to)
            .finish_non_exhaustive()
    }
}

//! Observability events for recordcheck
//!
//! Events are explicit and typed.

use std::fmt;

/// Observable events in recordcheck
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    // Configuration
    /// Configuration loaded
    ConfigLoaded,
    /// Configuration rejected (FATAL)
    ConfigInvalid,
    /// Schema definitions loaded
    SchemasLoaded,
    /// Schema definitions rejected (FATAL)
    SchemaLoadFailed,

    // Resolution
    /// Input resolved into a record
    ResolveSucceeded,
    /// Input rejected with field errors
    ResolveFailed,
    /// Resolution aborted before finishing (depth limit)
    ResolveAborted,

    // Check command
    /// Check stream begins
    CheckStart,
    /// Document accepted
    DocumentAccepted,
    /// Document rejected
    DocumentRejected,
    /// Check stream finished
    CheckComplete,
}

impl Event {
    /// Returns the string representation of the event
    pub fn as_str(&self) -> &'static str {
        match self {
            // Configuration
            Event::ConfigLoaded => "CONFIG_LOADED",
            Event::ConfigInvalid => "CONFIG_INVALID",
            Event::SchemasLoaded => "SCHEMAS_LOADED",
            Event::SchemaLoadFailed => "SCHEMA_LOAD_FAILED",

            // Resolution
            Event::ResolveSucceeded => "RESOLVE_SUCCEEDED",
            Event::ResolveFailed => "RESOLVE_FAILED",
            Event::ResolveAborted => "RESOLVE_ABORTED",

            // Check
            Event::CheckStart => "CHECK_BEGIN",
            Event::DocumentAccepted => "DOCUMENT_ACCEPTED",
            Event::DocumentRejected => "DOCUMENT_REJECTED",
            Event::CheckComplete => "CHECK_COMPLETE",
        }
    }

    /// Returns true if this event indicates a fatal condition
    pub fn is_fatal(&self) -> bool {
        matches!(self, Event::ConfigInvalid | Event::SchemaLoadFailed)
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

//! Observability subsystem for recordcheck
//!
//! Structured JSON-line logging with typed event names.
//!
//! # Principles
//!
//! 1. Observability is read-only
//! 2. No async or background threads
//! 3. Deterministic output
//! 4. Log lines go to stderr; stdout belongs to command output
//!
//! # Usage
//!
//! ```ignore
//! use recordcheck::observability::{Logger, Event, Severity};
//!
//! Logger::set_min_severity(Severity::Trace);
//! Logger::trace(Event::ResolveFailed.as_str(), &[("type", "Person")]);
//! ```

mod events;
mod logger;

pub use events::Event;
pub use logger::{Logger, Severity};

fn event_severity(event: Event) -> Severity {
    if event.is_fatal() {
        Severity::Fatal
    } else {
        Severity::Info
    }
}

/// Log a lifecycle event
pub fn log_event(event: Event) {
    Logger::log(event_severity(event), event.as_str(), &[]);
}

/// Log a lifecycle event with fields
pub fn log_event_with_fields(event: Event, fields: &[(&str, &str)]) {
    Logger::log(event_severity(event), event.as_str(), fields);
}

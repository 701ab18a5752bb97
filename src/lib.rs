//! recordcheck - validating deserialization of JSON into typed records
//!
//! A [`schema::TypeSchema`] declares the fields of one type: their category,
//! optionality, defaults and constraints, plus an optional base type whose
//! fields are inherited. [`deserialize::resolve`] turns a parsed JSON object
//! into a [`deserialize::Record`], or reports every violation it found as a
//! path-qualified error tree.
//!
//! ```ignore
//! use recordcheck::constraints::{non_empty_string, range};
//! use recordcheck::deserialize::resolve;
//! use recordcheck::schema::{FieldDescriptor, TypeSchema};
//!
//! let person = TypeSchema::builder("Person")
//!     .field(FieldDescriptor::string("name").with(non_empty_string()))
//!     .field(FieldDescriptor::number("age").with(range(0.0, 150.0)?))
//!     .build()?;
//!
//! let record = resolve(&person, &serde_json::json!({"name": "Alice", "age": 30}))?;
//! ```

pub mod cli;
pub mod constraints;
pub mod deserialize;
pub mod observability;
pub mod schema;

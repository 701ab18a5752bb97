//! Schema subsystem for recordcheck
//!
//! A schema is the field contract of one type: ordered own fields, each with
//! a category, optionality, an optional default and ordered constraints, plus
//! an optional base schema whose fields are inherited.
//!
//! # Design Principles
//!
//! - Explicit construction through [`SchemaBuilder`], no reflection
//! - Every authoring mistake fails at build time
//! - Immutable after build, shared via `Arc`
//! - No process-wide registry; [`SchemaRegistry`] is an ordinary value

mod builder;
mod errors;
mod loader;
mod types;

pub use builder::SchemaBuilder;
pub use errors::{SchemaError, SchemaResult};
pub use loader::{
    read_definition_file, ConstraintDefinition, FieldDefinition, SchemaRegistry, TypeDefinition,
};
pub use types::{json_type_name, FieldDescriptor, PrimitiveKind, TypeCategory, TypeSchema};

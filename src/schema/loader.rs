//! Schema registry and definition file loader
//!
//! Definition files:
//! - One JSON file per type, any `*.json` name, in a single directory
//! - Types reference their base (`extends`) and nested field types by name
//! - Any malformed file, unknown reference or reference cycle fails the
//!   whole load; nothing is registered from a failed load

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::builder::SchemaBuilder;
use super::errors::{SchemaError, SchemaResult};
use super::types::{FieldDescriptor, PrimitiveKind, TypeCategory, TypeSchema};
use crate::constraints::{self, ConstraintValidator};
use crate::observability::{log_event_with_fields, Event};

/// One type as written in a definition file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TypeDefinition {
    /// Type name, unique across the registry
    pub name: String,
    /// Base type name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extends: Option<String>,
    /// Own fields in declaration order
    #[serde(default)]
    pub fields: Vec<FieldDefinition>,
}

/// One field as written in a definition file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FieldDefinition {
    /// Field name
    pub name: String,
    /// `string`, `number`, `boolean`, `object` or another type's name
    #[serde(rename = "type")]
    pub field_type: String,
    /// Whether the field may be absent
    #[serde(default)]
    pub optional: bool,
    /// Default used when the field is absent (implies optional)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
    /// Constraints in evaluation order
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub constraints: Vec<ConstraintDefinition>,
}

/// A constraint as written in a definition file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase", deny_unknown_fields)]
pub enum ConstraintDefinition {
    /// See [`constraints::non_empty_string`]
    NonEmptyString,
    /// See [`constraints::no_extra_space`]
    NoExtraSpace,
    /// See [`constraints::regex`]
    Regex {
        /// Pattern searched for in the value
        pattern: String,
    },
    /// See [`constraints::length_range`]
    LengthRange {
        /// Minimum length in characters
        min: usize,
        /// Maximum length in characters
        max: usize,
    },
    /// See [`constraints::min`]
    Min {
        /// Inclusive lower bound
        value: f64,
    },
    /// See [`constraints::max`]
    Max {
        /// Inclusive upper bound
        value: f64,
    },
    /// See [`constraints::range`]
    Range {
        /// Inclusive lower bound
        min: f64,
        /// Inclusive upper bound
        max: f64,
    },
    /// See [`constraints::safe_int`]
    SafeInt,
    /// See [`constraints::whitelist`]
    Whitelist {
        /// Allowed values
        values: Vec<Value>,
    },
    /// See [`constraints::blacklist`]
    Blacklist {
        /// Banned values
        values: Vec<Value>,
    },
}

impl ConstraintDefinition {
    /// Builds the validator this definition describes
    pub fn build(&self) -> SchemaResult<ConstraintValidator> {
        match self {
            ConstraintDefinition::NonEmptyString => Ok(constraints::non_empty_string()),
            ConstraintDefinition::NoExtraSpace => Ok(constraints::no_extra_space()),
            ConstraintDefinition::Regex { pattern } => constraints::regex(pattern),
            ConstraintDefinition::LengthRange { min, max } => constraints::length_range(*min, *max),
            ConstraintDefinition::Min { value } => constraints::min(*value),
            ConstraintDefinition::Max { value } => constraints::max(*value),
            ConstraintDefinition::Range { min, max } => constraints::range(*min, *max),
            ConstraintDefinition::SafeInt => Ok(constraints::safe_int()),
            ConstraintDefinition::Whitelist { values } => constraints::whitelist(values.clone()),
            ConstraintDefinition::Blacklist { values } => constraints::blacklist(values.clone()),
        }
    }
}

/// Named collection of built schemas.
///
/// The registry is an ordinary value; resolution never consults it. It only
/// exists to hand out schemas by name.
#[derive(Debug, Default, Clone)]
pub struct SchemaRegistry {
    schemas: BTreeMap<String, Arc<TypeSchema>>,
}

impl SchemaRegistry {
    /// Creates an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a built schema under its type name.
    ///
    /// Registered schemas are immutable; registering a second schema with the
    /// same name fails.
    pub fn register(&mut self, schema: Arc<TypeSchema>) -> SchemaResult<()> {
        if self.schemas.contains_key(schema.name()) {
            return Err(SchemaError::DuplicateType(schema.name().to_string()));
        }
        self.schemas.insert(schema.name().to_string(), schema);
        Ok(())
    }

    /// Gets a schema by type name
    pub fn get(&self, name: &str) -> Option<&Arc<TypeSchema>> {
        self.schemas.get(name)
    }

    /// Checks if a type is registered
    pub fn contains(&self, name: &str) -> bool {
        self.schemas.contains_key(name)
    }

    /// Registered type names in sorted order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.schemas.keys().map(String::as_str)
    }

    /// Returns all registered schemas
    pub fn schemas(&self) -> impl Iterator<Item = &Arc<TypeSchema>> {
        self.schemas.values()
    }

    /// Returns the number of registered schemas
    pub fn len(&self) -> usize {
        self.schemas.len()
    }

    /// Returns true if nothing is registered
    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }

    /// Loads every `*.json` definition file in `dir`.
    ///
    /// Files are read in name order so that error reporting is deterministic.
    pub fn load_dir(dir: &Path) -> SchemaResult<Self> {
        let entries = fs::read_dir(dir).map_err(|e| {
            SchemaError::malformed_definition(
                dir.display().to_string(),
                format!("Failed to read schema directory: {}", e),
            )
        })?;

        let mut paths = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| {
                SchemaError::malformed_definition(
                    dir.display().to_string(),
                    format!("Failed to read directory entry: {}", e),
                )
            })?;
            let path = entry.path();

            // Skip non-JSON files
            if path.extension().map_or(true, |ext| ext != "json") {
                continue;
            }
            paths.push(path);
        }
        paths.sort();

        let definitions = paths
            .iter()
            .map(|path| read_definition_file(path))
            .collect::<SchemaResult<Vec<_>>>()?;

        let registry = Self::from_definitions(definitions)?;
        log_event_with_fields(
            Event::SchemasLoaded,
            &[
                ("count", &registry.len().to_string()),
                ("schema_dir", &dir.display().to_string()),
            ],
        );
        Ok(registry)
    }

    /// Builds a registry from parsed definitions, resolving references by
    /// name regardless of the order the definitions are given in.
    pub fn from_definitions(definitions: Vec<TypeDefinition>) -> SchemaResult<Self> {
        let mut by_name: BTreeMap<String, TypeDefinition> = BTreeMap::new();
        for definition in definitions {
            if by_name.contains_key(&definition.name) {
                return Err(SchemaError::DuplicateType(definition.name));
            }
            by_name.insert(definition.name.clone(), definition);
        }

        let mut linker = Linker {
            definitions: &by_name,
            built: BTreeMap::new(),
            in_progress: Vec::new(),
        };
        for name in by_name.keys() {
            linker.build(name, name)?;
        }

        Ok(Self {
            schemas: linker.built,
        })
    }
}

/// Reads and parses a single definition file.
pub fn read_definition_file(path: &Path) -> SchemaResult<TypeDefinition> {
    let content = fs::read_to_string(path).map_err(|e| {
        SchemaError::malformed_definition(
            path.display().to_string(),
            format!("Failed to read file: {}", e),
        )
    })?;

    serde_json::from_str(&content).map_err(|e| {
        SchemaError::malformed_definition(path.display().to_string(), format!("Invalid JSON: {}", e))
    })
}

/// Builds definitions depth first, so every schema is created after the
/// schemas it points at.
struct Linker<'a> {
    definitions: &'a BTreeMap<String, TypeDefinition>,
    built: BTreeMap<String, Arc<TypeSchema>>,
    in_progress: Vec<String>,
}

impl<'a> Linker<'a> {
    fn build(&mut self, name: &str, referenced_by: &str) -> SchemaResult<Arc<TypeSchema>> {
        if let Some(schema) = self.built.get(name) {
            return Ok(Arc::clone(schema));
        }

        if let Some(pos) = self.in_progress.iter().position(|n| n == name) {
            let mut cycle = self.in_progress[pos..].to_vec();
            cycle.push(name.to_string());
            return Err(SchemaError::CyclicReference(cycle.join(" -> ")));
        }

        let definitions = self.definitions;
        let definition = definitions.get(name).ok_or_else(|| SchemaError::UnknownType {
            name: name.to_string(),
            referenced_by: referenced_by.to_string(),
        })?;

        self.in_progress.push(name.to_string());

        let mut builder = SchemaBuilder::new(name);
        if let Some(base) = &definition.extends {
            let base = self.build(base, name)?;
            builder = builder.extends(&base);
        }
        for field in &definition.fields {
            builder = builder.field(self.field(field, name)?);
        }

        self.in_progress.pop();

        let schema = builder.build()?;
        self.built.insert(name.to_string(), Arc::clone(&schema));
        Ok(schema)
    }

    fn field(&mut self, field: &FieldDefinition, owner: &str) -> SchemaResult<FieldDescriptor> {
        let category = match field.field_type.as_str() {
            "string" => TypeCategory::Primitive(PrimitiveKind::String),
            "number" => TypeCategory::Primitive(PrimitiveKind::Number),
            "boolean" => TypeCategory::Primitive(PrimitiveKind::Boolean),
            "object" => TypeCategory::OpaqueObject,
            "array" | "null" => {
                return Err(SchemaError::UnsupportedFieldType {
                    field: field.name.clone(),
                    field_type: field.field_type.clone(),
                })
            }
            other => TypeCategory::Nested(self.build(other, owner)?),
        };

        let mut descriptor = FieldDescriptor::new(field.name.clone(), category);
        if field.optional {
            descriptor = descriptor.optional();
        }
        if let Some(default) = &field.default {
            descriptor = descriptor.with_default(default.clone());
        }
        for constraint in &field.constraints {
            descriptor = descriptor.with(constraint.build()?);
        }
        Ok(descriptor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    fn definition(value: Value) -> TypeDefinition {
        serde_json::from_value(value).unwrap()
    }

    fn write_definition(dir: &Path, file: &str, value: Value) {
        fs::write(dir.join(file), serde_json::to_string_pretty(&value).unwrap()).unwrap();
    }

    #[test]
    fn test_register_and_get() {
        let mut registry = SchemaRegistry::new();
        let schema = SchemaBuilder::new("Person").build().unwrap();
        registry.register(schema).unwrap();

        assert!(registry.contains("Person"));
        assert_eq!(registry.get("Person").unwrap().name(), "Person");
        assert!(registry.get("Nobody").is_none());
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_register_same_name_twice_fails() {
        let mut registry = SchemaRegistry::new();
        registry.register(SchemaBuilder::new("Person").build().unwrap()).unwrap();

        let result = registry.register(SchemaBuilder::new("Person").build().unwrap());
        assert_eq!(result.unwrap_err(), SchemaError::DuplicateType("Person".into()));
    }

    #[test]
    fn test_references_resolved_out_of_order() {
        let registry = SchemaRegistry::from_definitions(vec![
            definition(json!({
                "name": "Outer",
                "extends": "Base",
                "fields": [{ "name": "addr", "type": "Address" }]
            })),
            definition(json!({
                "name": "Address",
                "fields": [{ "name": "zip", "type": "string",
                             "constraints": [{ "kind": "nonEmptyString" }] }]
            })),
            definition(json!({
                "name": "Base",
                "fields": [{ "name": "id", "type": "number" }]
            })),
        ])
        .unwrap();

        let outer = registry.get("Outer").unwrap();
        assert_eq!(outer.base().unwrap().name(), "Base");
        match outer.own_field("addr").unwrap().category() {
            TypeCategory::Nested(schema) => {
                assert!(Arc::ptr_eq(schema, registry.get("Address").unwrap()))
            }
            other => panic!("unexpected category: {other:?}"),
        }
    }

    #[test]
    fn test_unknown_reference_fails() {
        let result = SchemaRegistry::from_definitions(vec![definition(json!({
            "name": "Outer",
            "fields": [{ "name": "addr", "type": "Address" }]
        }))]);

        assert_eq!(
            result.unwrap_err(),
            SchemaError::UnknownType {
                name: "Address".into(),
                referenced_by: "Outer".into(),
            }
        );
    }

    #[test]
    fn test_cycle_detected() {
        let result = SchemaRegistry::from_definitions(vec![
            definition(json!({ "name": "A", "fields": [{ "name": "b", "type": "B" }] })),
            definition(json!({ "name": "B", "extends": "A" })),
        ]);

        assert_eq!(
            result.unwrap_err(),
            SchemaError::CyclicReference("A -> B -> A".into())
        );
    }

    #[test]
    fn test_self_reference_detected() {
        let result = SchemaRegistry::from_definitions(vec![definition(json!({
            "name": "Node",
            "fields": [{ "name": "next", "type": "Node", "optional": true }]
        }))]);

        assert!(matches!(result, Err(SchemaError::CyclicReference(_))));
    }

    #[test]
    fn test_array_field_rejected() {
        let result = SchemaRegistry::from_definitions(vec![definition(json!({
            "name": "Post",
            "fields": [{ "name": "tags", "type": "array" }]
        }))]);

        assert_eq!(
            result.unwrap_err(),
            SchemaError::UnsupportedFieldType {
                field: "tags".into(),
                field_type: "array".into(),
            }
        );
    }

    #[test]
    fn test_invalid_constraint_parameters_rejected() {
        let result = SchemaRegistry::from_definitions(vec![definition(json!({
            "name": "Person",
            "fields": [{ "name": "age", "type": "number",
                         "constraints": [{ "kind": "range", "min": 17, "max": 15 }] }]
        }))]);

        assert!(matches!(result, Err(SchemaError::InvalidConstraint { .. })));
    }

    #[test]
    fn test_constraint_definitions_parse() {
        let parsed: Vec<ConstraintDefinition> = serde_json::from_value(json!([
            { "kind": "noExtraSpace" },
            { "kind": "regex", "pattern": "^a" },
            { "kind": "lengthRange", "min": 1, "max": 3 },
            { "kind": "safeInt" },
            { "kind": "whitelist", "values": ["a", 1] }
        ]))
        .unwrap();

        assert_eq!(parsed[1], ConstraintDefinition::Regex { pattern: "^a".into() });
        assert_eq!(parsed[2], ConstraintDefinition::LengthRange { min: 1, max: 3 });
        assert!(parsed.iter().all(|c| c.build().is_ok()));
    }

    #[test]
    fn test_load_dir() {
        let temp_dir = TempDir::new().unwrap();
        write_definition(
            temp_dir.path(),
            "person.json",
            json!({
                "name": "Person",
                "fields": [
                    { "name": "name", "type": "string" },
                    { "name": "age", "type": "number", "optional": true, "default": 18 }
                ]
            }),
        );
        fs::write(temp_dir.path().join("README.txt"), "not a schema").unwrap();

        let registry = SchemaRegistry::load_dir(temp_dir.path()).unwrap();
        assert_eq!(registry.names().collect::<Vec<_>>(), vec!["Person"]);
        let age = registry.get("Person").unwrap().own_field("age").unwrap();
        assert_eq!(age.default_value(), Some(&json!(18)));
    }

    #[test]
    fn test_load_dir_malformed_file() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("broken.json"), "{ not json").unwrap();

        let result = SchemaRegistry::load_dir(temp_dir.path());
        match result.unwrap_err() {
            SchemaError::MalformedDefinition { path, reason } => {
                assert!(path.contains("broken.json"));
                assert!(reason.contains("Invalid JSON"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_load_missing_dir() {
        let temp_dir = TempDir::new().unwrap();
        let result = SchemaRegistry::load_dir(&temp_dir.path().join("missing"));
        assert!(matches!(result, Err(SchemaError::MalformedDefinition { .. })));
    }
}

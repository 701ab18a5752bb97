//! Schema Definition Tests
//!
//! Tests for loading types from definition files:
//! - References resolve by name, in any file order
//! - Loaded schemas behave exactly like built ones
//! - Authoring mistakes fail the whole load

use std::fs;
use std::path::Path;

use recordcheck::deserialize::resolve;
use recordcheck::schema::{SchemaError, SchemaRegistry};
use serde_json::{json, Value};
use tempfile::TempDir;

// =============================================================================
// Helper Functions
// =============================================================================

fn write_definition(dir: &Path, file: &str, value: Value) {
    fs::write(dir.join(file), serde_json::to_string_pretty(&value).unwrap()).unwrap();
}

fn setup_registry() -> (TempDir, SchemaRegistry) {
    let tmp = TempDir::new().unwrap();

    write_definition(
        tmp.path(),
        "a_person.json",
        json!({
            "name": "Person",
            "extends": "Named",
            "fields": [
                { "name": "age", "type": "number", "optional": true, "default": 18,
                  "constraints": [
                      { "kind": "range", "min": 0, "max": 150 },
                      { "kind": "safeInt" }
                  ] },
                { "name": "address", "type": "Address" },
                { "name": "meta", "type": "object", "optional": true },
                { "name": "role", "type": "string", "optional": true,
                  "constraints": [{ "kind": "whitelist", "values": ["admin", "user"] }] }
            ]
        }),
    );
    write_definition(
        tmp.path(),
        "b_named.json",
        json!({
            "name": "Named",
            "fields": [
                { "name": "name", "type": "string",
                  "constraints": [
                      { "kind": "nonEmptyString" },
                      { "kind": "noExtraSpace" },
                      { "kind": "lengthRange", "min": 1, "max": 20 }
                  ] }
            ]
        }),
    );
    write_definition(
        tmp.path(),
        "c_address.json",
        json!({
            "name": "Address",
            "fields": [
                { "name": "zip", "type": "string",
                  "constraints": [{ "kind": "regex", "pattern": "^[0-9]{5}$" }] },
                { "name": "verified", "type": "boolean", "default": false }
            ]
        }),
    );

    let registry = SchemaRegistry::load_dir(tmp.path()).unwrap();
    (tmp, registry)
}

// =============================================================================
// Loading Tests
// =============================================================================

/// Every file is loaded and linked.
#[test]
fn test_load_links_references() {
    let (_tmp, registry) = setup_registry();

    assert_eq!(
        registry.names().collect::<Vec<_>>(),
        vec!["Address", "Named", "Person"]
    );
    let person = registry.get("Person").unwrap();
    assert_eq!(person.base().unwrap().name(), "Named");
    assert_eq!(
        person.field_names(),
        vec!["age", "address", "meta", "role", "name"]
    );
}

/// A loaded schema resolves documents with defaults applied.
#[test]
fn test_loaded_schema_resolves() {
    let (_tmp, registry) = setup_registry();
    let person = registry.get("Person").unwrap();

    let record = resolve(
        person,
        &json!({"name": "Alice", "address": {"zip": "10001"}}),
    )
    .unwrap();

    assert_eq!(
        record.to_value(),
        json!({
            "name": "Alice",
            "age": 18,
            "address": {"zip": "10001", "verified": false}
        })
    );
}

/// Loaded constraints report the catalogue messages.
#[test]
fn test_loaded_schema_reports_errors() {
    let (_tmp, registry) = setup_registry();
    let person = registry.get("Person").unwrap();

    let err = resolve(
        person,
        &json!({
            "name": " Alice",
            "age": 12.5,
            "address": {"zip": "1000"},
            "role": "root"
        }),
    )
    .unwrap_err();

    assert_eq!(
        serde_json::to_value(err.field_errors()).unwrap(),
        json!([
            {"field": "age", "errors": ["value must be a safe integer"]},
            {"field": "address", "errors": [
                {"field": "zip", "errors": ["value must match regex: ^[0-9]{5}$"]}
            ]},
            {"field": "role", "errors": ["value must be one of admin|user"]},
            {"field": "name", "errors": ["value must not have leading or trailing whitespace"]}
        ])
    );
}

// =============================================================================
// Failure Tests
// =============================================================================

/// An unknown field type name fails the load.
#[test]
fn test_unknown_reference() {
    let tmp = TempDir::new().unwrap();
    write_definition(
        tmp.path(),
        "order.json",
        json!({ "name": "Order", "fields": [{ "name": "buyer", "type": "Customer" }] }),
    );

    assert_eq!(
        SchemaRegistry::load_dir(tmp.path()).unwrap_err(),
        SchemaError::UnknownType {
            name: "Customer".into(),
            referenced_by: "Order".into(),
        }
    );
}

/// A constraint that does not apply to the field type fails the load.
#[test]
fn test_constraint_on_wrong_type() {
    let tmp = TempDir::new().unwrap();
    write_definition(
        tmp.path(),
        "person.json",
        json!({
            "name": "Person",
            "fields": [{ "name": "name", "type": "string",
                         "constraints": [{ "kind": "min", "value": 1 }] }]
        }),
    );

    let err = SchemaRegistry::load_dir(tmp.path()).unwrap_err();
    assert!(matches!(err, SchemaError::ConstraintTypeMismatch { .. }));
    assert_eq!(err.code(), "RC_SCHEMA_CONFIGURATION");
}

/// A default of the wrong kind fails the load.
#[test]
fn test_default_of_wrong_type() {
    let tmp = TempDir::new().unwrap();
    write_definition(
        tmp.path(),
        "settings.json",
        json!({
            "name": "Settings",
            "fields": [{ "name": "retries", "type": "number", "default": "three" }]
        }),
    );

    assert!(matches!(
        SchemaRegistry::load_dir(tmp.path()),
        Err(SchemaError::DefaultTypeMismatch { .. })
    ));
}

/// Unknown keys in a definition are rejected.
#[test]
fn test_unknown_definition_key() {
    let tmp = TempDir::new().unwrap();
    write_definition(
        tmp.path(),
        "person.json",
        json!({ "name": "Person", "feilds": [] }),
    );

    assert!(matches!(
        SchemaRegistry::load_dir(tmp.path()),
        Err(SchemaError::MalformedDefinition { .. })
    ));
}

/// Two files defining the same type fail the load.
#[test]
fn test_duplicate_type() {
    let tmp = TempDir::new().unwrap();
    write_definition(tmp.path(), "one.json", json!({ "name": "Person" }));
    write_definition(tmp.path(), "two.json", json!({ "name": "Person" }));

    assert_eq!(
        SchemaRegistry::load_dir(tmp.path()).unwrap_err(),
        SchemaError::DuplicateType("Person".into())
    );
}

/// Inheritance cycles fail the load.
#[test]
fn test_inheritance_cycle() {
    let tmp = TempDir::new().unwrap();
    write_definition(tmp.path(), "a.json", json!({ "name": "A", "extends": "B" }));
    write_definition(tmp.path(), "b.json", json!({ "name": "B", "extends": "A" }));

    assert_eq!(
        SchemaRegistry::load_dir(tmp.path()).unwrap_err(),
        SchemaError::CyclicReference("A -> B -> A".into())
    );
}

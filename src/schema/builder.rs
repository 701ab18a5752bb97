//! Schema builder
//!
//! Fields are registered by explicit calls. All authoring mistakes are
//! reported by [`SchemaBuilder::build`]; a schema that builds can be resolved
//! against any input without raising a configuration error.

use std::collections::HashSet;
use std::sync::Arc;

use super::errors::{SchemaError, SchemaResult};
use super::types::{FieldDescriptor, TypeSchema};

/// Collects the fields of one type before it is frozen into a [`TypeSchema`].
#[derive(Debug)]
pub struct SchemaBuilder {
    name: String,
    base: Option<Arc<TypeSchema>>,
    fields: Vec<FieldDescriptor>,
}

impl SchemaBuilder {
    /// Creates a builder for the named type
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            base: None,
            fields: Vec::new(),
        }
    }

    /// Sets the base schema this type inherits fields from
    pub fn extends(mut self, base: &Arc<TypeSchema>) -> Self {
        self.base = Some(Arc::clone(base));
        self
    }

    /// Appends a field. Declaration order is kept for error reporting.
    pub fn field(mut self, field: FieldDescriptor) -> Self {
        self.fields.push(field);
        self
    }

    /// Checks every field and freezes the schema.
    ///
    /// # Errors
    ///
    /// Returns `SchemaError` if:
    /// - a field name is declared twice (DuplicateField)
    /// - a constraint does not apply to its field's category (ConstraintTypeMismatch)
    /// - a default value has the wrong shape (DefaultTypeMismatch)
    pub fn build(self) -> SchemaResult<Arc<TypeSchema>> {
        let mut seen = HashSet::new();
        for field in &self.fields {
            if !seen.insert(field.name()) {
                return Err(SchemaError::DuplicateField {
                    type_name: self.name.clone(),
                    field: field.name().to_string(),
                });
            }
            check_constraints(field)?;
            check_default(field)?;
        }

        Ok(Arc::new(TypeSchema {
            name: self.name,
            own_fields: self.fields,
            base: self.base,
        }))
    }
}

/// Constraints restricted to one primitive kind may only sit on fields of
/// that kind.
fn check_constraints(field: &FieldDescriptor) -> SchemaResult<()> {
    for validator in field.validators() {
        if let Some(kind) = validator.applies_to() {
            if field.category().primitive_kind() != Some(kind) {
                return Err(SchemaError::ConstraintTypeMismatch {
                    field: field.name().to_string(),
                    constraint: validator.name().to_string(),
                    expected: kind.type_name(),
                });
            }
        }
    }
    Ok(())
}

fn check_default(field: &FieldDescriptor) -> SchemaResult<()> {
    match field.default_value() {
        Some(value) if !field.category().accepts(value) => Err(SchemaError::DefaultTypeMismatch {
            field: field.name().to_string(),
            expected: field.category().expected_type(),
        }),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constraints;
    use serde_json::json;

    #[test]
    fn test_build_keeps_declaration_order() {
        let schema = SchemaBuilder::new("Person")
            .field(FieldDescriptor::string("name"))
            .field(FieldDescriptor::number("age"))
            .field(FieldDescriptor::boolean("active").optional())
            .build()
            .unwrap();

        let names: Vec<_> = schema.own_fields().iter().map(|f| f.name()).collect();
        assert_eq!(names, vec!["name", "age", "active"]);
        assert!(schema.base().is_none());
    }

    #[test]
    fn test_empty_schema_builds() {
        let schema = SchemaBuilder::new("Empty").build().unwrap();
        assert!(schema.own_fields().is_empty());
    }

    #[test]
    fn test_duplicate_field_rejected() {
        let result = SchemaBuilder::new("Person")
            .field(FieldDescriptor::string("name"))
            .field(FieldDescriptor::number("name"))
            .build();

        assert_eq!(
            result.unwrap_err(),
            SchemaError::DuplicateField {
                type_name: "Person".into(),
                field: "name".into(),
            }
        );
    }

    #[test]
    fn test_number_constraint_on_string_rejected() {
        let result = SchemaBuilder::new("C")
            .field(FieldDescriptor::string("field1").with(constraints::min(1.0).unwrap()))
            .build();

        match result.unwrap_err() {
            SchemaError::ConstraintTypeMismatch { field, expected, .. } => {
                assert_eq!(field, "field1");
                assert_eq!(expected, "number");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_string_constraint_on_nested_rejected() {
        let inner = SchemaBuilder::new("Inner").build().unwrap();
        let result = SchemaBuilder::new("Outer")
            .field(FieldDescriptor::nested("inner", &inner).with(constraints::non_empty_string()))
            .build();
        assert!(matches!(
            result,
            Err(SchemaError::ConstraintTypeMismatch { .. })
        ));
    }

    #[test]
    fn test_membership_constraint_applies_to_any_kind() {
        let schema = SchemaBuilder::new("C")
            .field(
                FieldDescriptor::number("n").with(constraints::whitelist([json!(1), json!(5)]).unwrap()),
            )
            .field(
                FieldDescriptor::boolean("b").with(constraints::blacklist([json!(false)]).unwrap()),
            )
            .build();
        assert!(schema.is_ok());
    }

    #[test]
    fn test_default_type_mismatch_rejected() {
        let result = SchemaBuilder::new("C")
            .field(FieldDescriptor::number("optional1").with_default("abc"))
            .build();

        assert_eq!(
            result.unwrap_err(),
            SchemaError::DefaultTypeMismatch {
                field: "optional1".into(),
                expected: "number",
            }
        );
    }

    #[test]
    fn test_nested_default_must_be_object() {
        let inner = SchemaBuilder::new("Inner")
            .field(FieldDescriptor::string("field1"))
            .build()
            .unwrap();

        let ok = SchemaBuilder::new("Outer")
            .field(FieldDescriptor::nested("inner", &inner).with_default(json!({"field1": "abc"})))
            .build();
        assert!(ok.is_ok());

        let bad = SchemaBuilder::new("Outer")
            .field(FieldDescriptor::nested("inner", &inner).with_default(json!("abc")))
            .build();
        assert!(matches!(bad, Err(SchemaError::DefaultTypeMismatch { .. })));
    }

    #[test]
    fn test_same_name_allowed_across_levels() {
        let base = SchemaBuilder::new("Base")
            .field(FieldDescriptor::number("field1").with(constraints::max(10.0).unwrap()))
            .build()
            .unwrap();
        let derived = SchemaBuilder::new("Derived")
            .extends(&base)
            .field(FieldDescriptor::number("field1").with(constraints::min(20.0).unwrap()))
            .build()
            .unwrap();

        assert_eq!(derived.base().unwrap().name(), "Base");
    }
}

//! Schema type definitions
//!
//! Supported field categories:
//! - string, number, boolean: JSON primitives, matched exactly
//! - object: opaque JSON object, stored verbatim
//! - nested: another schema, resolved recursively
//!
//! Arrays are not a field category.

use std::sync::Arc;

use serde_json::Value;

use super::builder::SchemaBuilder;
use crate::constraints::ConstraintValidator;

/// JSON primitive kinds a field can declare
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveKind {
    /// JSON string
    String,
    /// JSON number (integer or float)
    Number,
    /// JSON boolean
    Boolean,
}

impl PrimitiveKind {
    /// Returns the type name for error messages
    pub fn type_name(&self) -> &'static str {
        match self {
            PrimitiveKind::String => "string",
            PrimitiveKind::Number => "number",
            PrimitiveKind::Boolean => "boolean",
        }
    }

    /// Returns true if the value has exactly this kind
    pub fn matches(&self, value: &Value) -> bool {
        match self {
            PrimitiveKind::String => value.is_string(),
            PrimitiveKind::Number => value.is_number(),
            PrimitiveKind::Boolean => value.is_boolean(),
        }
    }
}

/// Declared category of a field
#[derive(Debug, Clone)]
pub enum TypeCategory {
    /// One of the three JSON primitives
    Primitive(PrimitiveKind),
    /// Any JSON object, accepted without looking inside
    OpaqueObject,
    /// A JSON object resolved against another schema
    Nested(Arc<TypeSchema>),
}

impl TypeCategory {
    /// Returns the JSON type a value must have for this category
    pub fn expected_type(&self) -> &'static str {
        match self {
            TypeCategory::Primitive(kind) => kind.type_name(),
            TypeCategory::OpaqueObject | TypeCategory::Nested(_) => "object",
        }
    }

    /// Returns the primitive kind, if this is a primitive category
    pub fn primitive_kind(&self) -> Option<PrimitiveKind> {
        match self {
            TypeCategory::Primitive(kind) => Some(*kind),
            _ => None,
        }
    }

    /// Shape check only. Nested contents are not inspected.
    pub fn accepts(&self, value: &Value) -> bool {
        match self {
            TypeCategory::Primitive(kind) => kind.matches(value),
            TypeCategory::OpaqueObject | TypeCategory::Nested(_) => value.is_object(),
        }
    }
}

/// Field definition
///
/// A descriptor only becomes part of a schema through
/// [`SchemaBuilder::build`], which checks it against its category.
#[derive(Debug, Clone)]
pub struct FieldDescriptor {
    name: String,
    category: TypeCategory,
    optional: bool,
    default: Option<Value>,
    validators: Vec<ConstraintValidator>,
}

impl FieldDescriptor {
    /// Create a required field of the given category
    pub fn new(name: impl Into<String>, category: TypeCategory) -> Self {
        Self {
            name: name.into(),
            category,
            optional: false,
            default: None,
            validators: Vec::new(),
        }
    }

    /// Create a required string field
    pub fn string(name: impl Into<String>) -> Self {
        Self::new(name, TypeCategory::Primitive(PrimitiveKind::String))
    }

    /// Create a required number field
    pub fn number(name: impl Into<String>) -> Self {
        Self::new(name, TypeCategory::Primitive(PrimitiveKind::Number))
    }

    /// Create a required boolean field
    pub fn boolean(name: impl Into<String>) -> Self {
        Self::new(name, TypeCategory::Primitive(PrimitiveKind::Boolean))
    }

    /// Create a required opaque object field
    pub fn object(name: impl Into<String>) -> Self {
        Self::new(name, TypeCategory::OpaqueObject)
    }

    /// Create a required nested field
    pub fn nested(name: impl Into<String>, schema: &Arc<TypeSchema>) -> Self {
        Self::new(name, TypeCategory::Nested(Arc::clone(schema)))
    }

    /// Marks the field optional without a default
    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    /// Marks the field optional with a default value.
    ///
    /// The default goes through the same checks as a supplied value.
    pub fn with_default(mut self, value: impl Into<Value>) -> Self {
        self.optional = true;
        self.default = Some(value.into());
        self
    }

    /// Appends a validator. A validator with the same name replaces the
    /// earlier one in its original position.
    pub fn with(mut self, validator: ConstraintValidator) -> Self {
        match self
            .validators
            .iter_mut()
            .find(|existing| existing.name() == validator.name())
        {
            Some(existing) => *existing = validator,
            None => self.validators.push(validator),
        }
        self
    }

    /// Field name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declared category
    pub fn category(&self) -> &TypeCategory {
        &self.category
    }

    /// Whether the field may be absent from input
    pub fn is_optional(&self) -> bool {
        self.optional
    }

    /// Whether a missing value is replaced by a default
    pub fn has_default(&self) -> bool {
        self.default.is_some()
    }

    /// The default value, if any
    pub fn default_value(&self) -> Option<&Value> {
        self.default.as_ref()
    }

    /// Validators in declaration order
    pub fn validators(&self) -> &[ConstraintValidator] {
        &self.validators
    }
}

/// Complete type schema: own fields plus an optional base schema.
///
/// Schemas are immutable once built and can only point at schemas that
/// already exist, so base chains and nesting are acyclic.
#[derive(Debug)]
pub struct TypeSchema {
    pub(crate) name: String,
    pub(crate) own_fields: Vec<FieldDescriptor>,
    pub(crate) base: Option<Arc<TypeSchema>>,
}

impl TypeSchema {
    /// Starts building a schema with the given type name
    pub fn builder(name: impl Into<String>) -> SchemaBuilder {
        SchemaBuilder::new(name)
    }

    /// Type name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Fields declared on this type, in declaration order
    pub fn own_fields(&self) -> &[FieldDescriptor] {
        &self.own_fields
    }

    /// Looks up a field declared on this type (not its ancestors)
    pub fn own_field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.own_fields.iter().find(|f| f.name == name)
    }

    /// Base schema, if any
    pub fn base(&self) -> Option<&Arc<TypeSchema>> {
        self.base.as_ref()
    }

    /// This schema followed by each ancestor, most derived first
    pub fn lineage(&self) -> impl Iterator<Item = &TypeSchema> {
        std::iter::successors(Some(self), |schema| schema.base().map(|b| b.as_ref()))
    }

    /// Resolves a field name to the descriptor that governs it, honoring
    /// shadowing by more derived types.
    pub fn field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.lineage().find_map(|schema| schema.own_field(name))
    }

    /// Every effective field name, own fields first, then inherited ones
    /// not shadowed by a more derived declaration.
    pub fn field_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = Vec::new();
        for schema in self.lineage() {
            for field in schema.own_fields() {
                if !names.contains(&field.name()) {
                    names.push(field.name());
                }
            }
        }
        names
    }
}

/// Returns the JSON type name for error messages.
pub fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

//! String constraints

use super::ConstraintValidator;
use crate::schema::{PrimitiveKind, SchemaError, SchemaResult};

/// Rejects strings that are empty or contain only whitespace
pub fn non_empty_string() -> ConstraintValidator {
    ConstraintValidator::new("nonEmptyString", "value must be non-empty", |v| {
        v.as_str().map_or(false, |s| !s.trim().is_empty())
    })
    .for_kind(PrimitiveKind::String)
}

/// Rejects strings with leading or trailing whitespace. The empty string passes.
pub fn no_extra_space() -> ConstraintValidator {
    ConstraintValidator::new(
        "noExtraSpace",
        "value must not have leading or trailing whitespace",
        |v| v.as_str().map_or(false, |s| s.trim() == s),
    )
    .for_kind(PrimitiveKind::String)
}

/// Requires a match of `pattern` anywhere in the string
///
/// # Errors
///
/// Returns `SchemaError::InvalidConstraint` if the pattern does not compile.
pub fn regex(pattern: &str) -> SchemaResult<ConstraintValidator> {
    let compiled = ::regex::Regex::new(pattern)
        .map_err(|e| SchemaError::invalid_constraint("regex", e.to_string()))?;

    Ok(ConstraintValidator::new(
        format!("regex-{}", pattern),
        format!("value must match regex: {}", pattern),
        move |v| v.as_str().map_or(false, |s| compiled.is_match(s)),
    )
    .for_kind(PrimitiveKind::String))
}

/// Requires the character count to lie within `[min, max]`
///
/// # Errors
///
/// Returns `SchemaError::InvalidConstraint` if `min > max`.
pub fn length_range(min: usize, max: usize) -> SchemaResult<ConstraintValidator> {
    if min > max {
        return Err(SchemaError::invalid_constraint(
            "lengthRange",
            format!("lower bound {} exceeds upper bound {}", min, max),
        ));
    }

    Ok(ConstraintValidator::new(
        format!("lengthRange-{}-{}", min, max),
        format!("value length must be between {} and {}", min, max),
        move |v| {
            v.as_str().map_or(false, |s| {
                let len = s.chars().count();
                min <= len && len <= max
            })
        },
    )
    .for_kind(PrimitiveKind::String))
}

//! Number constraints
//!
//! Bounds are inclusive. Values are compared as `f64`.

use serde_json::Value;

use super::ConstraintValidator;
use crate::schema::{PrimitiveKind, SchemaError, SchemaResult};

/// Largest integer every JSON number consumer can represent exactly (2^53 - 1)
pub const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_991.0;

fn number(value: &Value) -> Option<f64> {
    value.as_f64()
}

/// Requires `value >= min_val`
///
/// # Errors
///
/// Returns `SchemaError::InvalidConstraint` if `min_val` is NaN.
pub fn min(min_val: f64) -> SchemaResult<ConstraintValidator> {
    if min_val.is_nan() {
        return Err(SchemaError::invalid_constraint("min", "bound must be a number"));
    }

    Ok(ConstraintValidator::new(
        format!("min-{}", min_val),
        format!("value is below minimum {}", min_val),
        move |v| number(v).map_or(false, |n| n >= min_val),
    )
    .for_kind(PrimitiveKind::Number))
}

/// Requires `value <= max_val`
///
/// # Errors
///
/// Returns `SchemaError::InvalidConstraint` if `max_val` is NaN.
pub fn max(max_val: f64) -> SchemaResult<ConstraintValidator> {
    if max_val.is_nan() {
        return Err(SchemaError::invalid_constraint("max", "bound must be a number"));
    }

    Ok(ConstraintValidator::new(
        format!("max-{}", max_val),
        format!("value is above maximum {}", max_val),
        move |v| number(v).map_or(false, |n| n <= max_val),
    )
    .for_kind(PrimitiveKind::Number))
}

/// Requires `min_val <= value <= max_val`
///
/// # Errors
///
/// Returns `SchemaError::InvalidConstraint` if either bound is NaN or
/// `min_val > max_val`.
pub fn range(min_val: f64, max_val: f64) -> SchemaResult<ConstraintValidator> {
    if min_val.is_nan() || max_val.is_nan() {
        return Err(SchemaError::invalid_constraint(
            "range",
            "bounds must be numbers",
        ));
    }
    if min_val > max_val {
        return Err(SchemaError::invalid_constraint(
            "range",
            format!("lower bound {} exceeds upper bound {}", min_val, max_val),
        ));
    }

    Ok(ConstraintValidator::new(
        format!("range-{}-{}", min_val, max_val),
        format!("value must be between {} and {}", min_val, max_val),
        move |v| number(v).map_or(false, |n| min_val <= n && n <= max_val),
    )
    .for_kind(PrimitiveKind::Number))
}

/// Requires an integral value with magnitude at most [`MAX_SAFE_INTEGER`]
pub fn safe_int() -> ConstraintValidator {
    ConstraintValidator::new("safeInt", "value must be a safe integer", is_safe_integer)
        .for_kind(PrimitiveKind::Number)
}

fn is_safe_integer(value: &Value) -> bool {
    if let Some(i) = value.as_i64() {
        return i.unsigned_abs() as f64 <= MAX_SAFE_INTEGER;
    }
    if let Some(u) = value.as_u64() {
        return u as f64 <= MAX_SAFE_INTEGER;
    }
    match value.as_f64() {
        Some(n) => n.is_finite() && n.fract() == 0.0 && n.abs() <= MAX_SAFE_INTEGER,
        None => false,
    }
}

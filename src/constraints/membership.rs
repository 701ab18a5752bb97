//! Membership constraints
//!
//! Allowed and banned values are plain JSON values. Numbers compare by
//! numeric value, so `5` and `5.0` are the same member.

use serde_json::Value;

use super::ConstraintValidator;
use crate::schema::{SchemaError, SchemaResult};

/// Requires the value to be one of `allowed`
///
/// # Errors
///
/// Returns `SchemaError::InvalidConstraint` if `allowed` is empty.
pub fn whitelist<I>(allowed: I) -> SchemaResult<ConstraintValidator>
where
    I: IntoIterator,
    I::Item: Into<Value>,
{
    let allowed: Vec<Value> = allowed.into_iter().map(Into::into).collect();
    if allowed.is_empty() {
        return Err(SchemaError::invalid_constraint(
            "whitelist",
            "allowed values must be non-empty",
        ));
    }

    let listed = join_values(&allowed);
    Ok(ConstraintValidator::new(
        format!("whitelist-{}", listed),
        format!("value must be one of {}", listed),
        move |v| allowed.iter().any(|a| same_value(a, v)),
    ))
}

/// Requires the value to be none of `banned`
///
/// # Errors
///
/// Returns `SchemaError::InvalidConstraint` if `banned` is empty.
pub fn blacklist<I>(banned: I) -> SchemaResult<ConstraintValidator>
where
    I: IntoIterator,
    I::Item: Into<Value>,
{
    let banned: Vec<Value> = banned.into_iter().map(Into::into).collect();
    if banned.is_empty() {
        return Err(SchemaError::invalid_constraint(
            "blacklist",
            "banned values must be non-empty",
        ));
    }

    let listed = join_values(&banned);
    Ok(ConstraintValidator::new(
        format!("blacklist-{}", listed),
        format!("value must not be one of {}", listed),
        move |v| !banned.iter().any(|b| same_value(b, v)),
    ))
}

fn same_value(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => x.as_f64() == y.as_f64(),
        _ => a == b,
    }
}

/// Strings are listed bare, everything else as JSON.
fn join_values(values: &[Value]) -> String {
    values
        .iter()
        .map(|v| match v {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        })
        .collect::<Vec<_>>()
        .join("|")
}

//! Reusable field validators.
//!
//! Each constructor returns a [`FieldValidator`] to pass to
//! [`Field::validate_with`](crate::Field::validate_with). Validators see the
//! value after coercion, so `range` compares a loaded `Decimal` and `length`
//! counts the characters of a loaded string.
//!
//! ```rust
//! use serde_param::{load, validators, value, Field, FieldType, LoadOptions, Schema};
//!
//! let schema = Schema::define(
//!     "Phone",
//!     [Field::new("number", FieldType::String).validate_with(validators::length(Some(3), Some(15)))],
//! )
//! .unwrap();
//!
//! let err = load(&schema, &value!({ "number": "1" }), &LoadOptions::default()).unwrap_err();
//! assert_eq!(err.first("number").unwrap().to_string(), "must be at least 3 long");
//! ```

use crate::{FieldValidator, Value};
use std::sync::Arc;

fn measured(value: &Value) -> Result<usize, String> {
    match value {
        Value::String(s) | Value::Symbol(s) => Ok(s.chars().count()),
        Value::Array(items) => Ok(items.len()),
        Value::Object(_) | Value::Record(_) => Ok(value.as_object().map_or(0, |obj| obj.len())),
        other => Err(format!("length is undefined for {}", other.type_name())),
    }
}

/// Bounds the number of characters, elements or fields.
#[must_use]
pub fn length(min: Option<usize>, max: Option<usize>) -> FieldValidator {
    Arc::new(move |value| {
        let len = measured(value)?;
        if let Some(min) = min {
            if len < min {
                return Err(format!("must be at least {min} long"));
            }
        }
        if let Some(max) = max {
            if len > max {
                return Err(format!("must be at most {max} long"));
            }
        }
        Ok(())
    })
}

/// Bounds a numeric value, inclusive on both ends.
///
/// Decimals are compared through their nearest `f64`.
#[must_use]
pub fn range(min: Option<f64>, max: Option<f64>) -> FieldValidator {
    Arc::new(move |value| {
        let n = value
            .as_f64()
            .ok_or_else(|| format!("range is undefined for {}", value.type_name()))?;
        if let Some(min) = min {
            if n < min {
                return Err(format!("must be greater than or equal to {min}"));
            }
        }
        if let Some(max) = max {
            if n > max {
                return Err(format!("must be less than or equal to {max}"));
            }
        }
        Ok(())
    })
}

/// Accepts only the listed values.
///
/// Strings and symbols compare by text, so `one_of(["new"])` also accepts a
/// loaded enum value `:new`.
#[must_use]
pub fn one_of<I, V>(values: I) -> FieldValidator
where
    I: IntoIterator<Item = V>,
    V: Into<Value>,
{
    let allowed: Vec<Value> = values.into_iter().map(Into::into).collect();
    Arc::new(move |value| {
        let matches = |candidate: &Value| match (candidate.as_str(), value.as_str()) {
            (Some(a), Some(b)) => a == b,
            _ => candidate == value,
        };
        if allowed.iter().any(matches) {
            return Ok(());
        }
        let listed: Vec<String> = allowed.iter().map(ToString::to_string).collect();
        Err(format!("must be one of: {}", listed.join(", ")))
    })
}

/// Rejects blank strings, empty arrays and empty objects.
#[must_use]
pub fn non_empty() -> FieldValidator {
    Arc::new(|value| {
        let empty = match value {
            Value::String(s) => s.trim().is_empty(),
            other => measured(other).map_or(false, |len| len == 0),
        };
        if empty {
            Err("must not be empty".to_string())
        } else {
            Ok(())
        }
    })
}

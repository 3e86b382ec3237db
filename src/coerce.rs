//! Per-type conversion between external and internal scalar values.
//!
//! [`coerce_in`] turns a wire value into its internal form while loading and
//! [`coerce_out`] does the reverse while dumping. Both are pure and only
//! handle scalar types; arrays and nested schemas are walked by the load and
//! dump engines, which call back in here for every leaf.
//!
//! Numbers are accepted as numeric strings too, since upstream APIs are not
//! always consistent about which one they send:
//!
//! ```rust
//! use serde_param::{coerce_in, Decimal, FieldType, Value};
//!
//! let amount = coerce_in(&Value::from("500"), &FieldType::Decimal).unwrap();
//! assert_eq!(amount, Value::Decimal(Decimal::from(500)));
//!
//! let count = coerce_in(&Value::from("12"), &FieldType::Integer).unwrap();
//! assert_eq!(count, Value::from(12));
//! ```

use crate::{Decimal, FieldError, FieldType, Number, Value};
use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};

/// Converts an external value into the internal form for `ty`.
///
/// # Errors
///
/// - [`FieldError::TypeMismatch`] when the value has the wrong kind,
/// - [`FieldError::InvalidFormat`] when it has the right kind but cannot be parsed,
/// - [`FieldError::UnknownEnumValue`] for a literal missing from an enum mapping.
pub fn coerce_in(raw: &Value, ty: &FieldType) -> Result<Value, FieldError> {
    match ty {
        FieldType::String => match raw {
            Value::String(s) => Ok(Value::String(s.clone())),
            other => Err(FieldError::type_mismatch("string", other)),
        },
        FieldType::Integer => integer_in(raw),
        FieldType::Float => float_in(raw),
        FieldType::Decimal => decimal_in(raw).map(Value::Decimal),
        FieldType::Boolean => match raw {
            Value::Bool(b) => Ok(Value::Bool(*b)),
            Value::String(s) if s == "true" => Ok(Value::Bool(true)),
            Value::String(s) if s == "false" => Ok(Value::Bool(false)),
            Value::String(s) => Err(FieldError::invalid_format("boolean", s.as_str())),
            other => Err(FieldError::type_mismatch("boolean", other)),
        },
        FieldType::Date => match raw {
            Value::Date(d) => Ok(Value::Date(*d)),
            Value::String(s) => NaiveDate::parse_from_str(s, "%Y-%m-%d")
                .map(Value::Date)
                .map_err(|_| FieldError::invalid_format("date", s.as_str())),
            other => Err(FieldError::type_mismatch("date", other)),
        },
        FieldType::DateTime => match raw {
            Value::DateTime(dt) => Ok(Value::DateTime(*dt)),
            Value::String(s) => DateTime::parse_from_rfc3339(s)
                .map(|dt| Value::DateTime(dt.with_timezone(&Utc)))
                .map_err(|_| FieldError::invalid_format("datetime", s.as_str())),
            other => Err(FieldError::type_mismatch("datetime", other)),
        },
        FieldType::Any => Ok(raw.clone()),
        FieldType::Enum(mapping) => match raw {
            Value::String(_) | Value::Number(_) => mapping
                .to_internal(raw)
                .map(Value::symbol)
                .ok_or_else(|| FieldError::UnknownEnumValue(raw.to_string())),
            other => Err(FieldError::type_mismatch(&ty.describe(), other)),
        },
        FieldType::Array(_) | FieldType::One(_) | FieldType::Many(_) => {
            Err(FieldError::type_mismatch(&ty.describe(), raw))
        }
    }
}

/// Converts an internal value into the wire form for `ty`.
///
/// Decimals are written as canonical strings, dates as `YYYY-MM-DD` and
/// datetimes as RFC 3339 in UTC (`...Z`).
///
/// # Errors
///
/// [`FieldError::TypeMismatch`] when the value does not hold the declared type,
/// [`FieldError::UnknownEnumValue`] for a symbol missing from an enum mapping.
pub fn coerce_out(value: &Value, ty: &FieldType) -> Result<Value, FieldError> {
    match ty {
        FieldType::String => match value {
            Value::String(s) => Ok(Value::String(s.clone())),
            other => Err(FieldError::type_mismatch("string", other)),
        },
        FieldType::Integer => match value {
            Value::Number(n) => n
                .as_i64()
                .map(Value::from)
                .ok_or_else(|| FieldError::type_mismatch("integer", value)),
            Value::Decimal(d) => d
                .to_i64()
                .map(Value::from)
                .ok_or_else(|| FieldError::type_mismatch("integer", value)),
            other => Err(FieldError::type_mismatch("integer", other)),
        },
        FieldType::Float => match value {
            Value::Number(n) => Ok(Value::Number(Number::Float(n.as_f64()))),
            Value::Decimal(d) => Ok(Value::Number(Number::Float(d.to_f64()))),
            other => Err(FieldError::type_mismatch("float", other)),
        },
        FieldType::Decimal => match value {
            Value::Decimal(d) => Ok(Value::String(d.to_string())),
            Value::Number(_) | Value::String(_) => {
                decimal_in(value).map(|d| Value::String(d.to_string()))
            }
            other => Err(FieldError::type_mismatch("decimal", other)),
        },
        FieldType::Boolean => match value {
            Value::Bool(b) => Ok(Value::Bool(*b)),
            other => Err(FieldError::type_mismatch("boolean", other)),
        },
        FieldType::Date => match value {
            Value::Date(d) => Ok(Value::String(d.format("%Y-%m-%d").to_string())),
            // serialized structs carry dates as strings
            Value::String(_) => coerce_in(value, ty).and_then(|date| coerce_out(&date, ty)),
            other => Err(FieldError::type_mismatch("date", other)),
        },
        FieldType::DateTime => match value {
            Value::DateTime(dt) => Ok(Value::String(
                dt.to_rfc3339_opts(SecondsFormat::AutoSi, true),
            )),
            Value::String(_) => coerce_in(value, ty).and_then(|dt| coerce_out(&dt, ty)),
            other => Err(FieldError::type_mismatch("datetime", other)),
        },
        FieldType::Any => Ok(value.clone()),
        FieldType::Enum(mapping) => match value {
            // Plain strings are accepted so serde unit variants dump directly.
            Value::Symbol(name) | Value::String(name) => mapping
                .to_external(name)
                .cloned()
                .ok_or_else(|| FieldError::UnknownEnumValue(value.to_string())),
            other => Err(FieldError::type_mismatch(&ty.describe(), other)),
        },
        FieldType::Array(_) | FieldType::One(_) | FieldType::Many(_) => {
            Err(FieldError::type_mismatch(&ty.describe(), value))
        }
    }
}

fn integer_in(raw: &Value) -> Result<Value, FieldError> {
    match raw {
        Value::Number(n) => n
            .as_i64()
            .map(Value::from)
            .ok_or_else(|| FieldError::invalid_format("integer", n.to_string())),
        Value::String(s) => s
            .trim()
            .parse::<i64>()
            .map(Value::from)
            .map_err(|_| FieldError::invalid_format("integer", s.as_str())),
        other => Err(FieldError::type_mismatch("integer", other)),
    }
}

fn float_in(raw: &Value) -> Result<Value, FieldError> {
    let parsed = match raw {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s
            .trim()
            .parse::<f64>()
            .map_err(|_| FieldError::invalid_format("float", s.as_str()))?,
        other => return Err(FieldError::type_mismatch("float", other)),
    };
    if parsed.is_finite() {
        Ok(Value::Number(Number::Float(parsed)))
    } else {
        Err(FieldError::invalid_format("float", raw.to_string()))
    }
}

fn decimal_in(raw: &Value) -> Result<Decimal, FieldError> {
    match raw {
        Value::Decimal(d) => Ok(d.clone()),
        Value::Number(Number::Integer(i)) => Ok(Decimal::from(*i)),
        Value::Number(Number::Float(f)) => {
            Decimal::try_from(*f).map_err(|_| FieldError::invalid_format("decimal", f.to_string()))
        }
        Value::String(s) => s
            .parse()
            .map_err(|_| FieldError::invalid_format("decimal", s.as_str())),
        other => Err(FieldError::type_mismatch("decimal", other)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::EnumMapping;

    #[test]
    fn test_string_is_identity_only_for_strings() {
        assert_eq!(
            coerce_in(&Value::from("John"), &FieldType::String),
            Ok(Value::from("John"))
        );
        assert_eq!(
            coerce_in(&Value::from(5), &FieldType::String),
            Err(FieldError::TypeMismatch {
                expected: "string".into(),
                found: "integer".into()
            })
        );
    }

    #[test]
    fn test_integer_accepts_numeric_strings() {
        assert_eq!(coerce_in(&Value::from("42"), &FieldType::Integer), Ok(Value::from(42)));
        assert_eq!(coerce_in(&Value::from(42.0), &FieldType::Integer), Ok(Value::from(42)));
        assert!(matches!(
            coerce_in(&Value::from("4x"), &FieldType::Integer),
            Err(FieldError::InvalidFormat { .. })
        ));
        assert!(matches!(
            coerce_in(&Value::from(4.5), &FieldType::Integer),
            Err(FieldError::InvalidFormat { .. })
        ));
        // 2^63 is one past i64::MAX
        assert!(matches!(
            coerce_in(&Value::from(9_223_372_036_854_775_808.0), &FieldType::Integer),
            Err(FieldError::InvalidFormat { .. })
        ));
        assert!(matches!(
            coerce_in(&Value::from(true), &FieldType::Integer),
            Err(FieldError::TypeMismatch { .. })
        ));
    }

    #[test]
    fn test_float() {
        assert_eq!(
            coerce_in(&Value::from("2.5"), &FieldType::Float),
            Ok(Value::from(2.5))
        );
        assert_eq!(coerce_in(&Value::from(2), &FieldType::Float), Ok(Value::from(2.0)));
        assert!(coerce_in(&Value::from("inf"), &FieldType::Float).is_err());
    }

    #[test]
    fn test_decimal_in_and_out() {
        let loaded = coerce_in(&Value::from("19.90"), &FieldType::Decimal).unwrap();
        assert_eq!(loaded, Value::Decimal("19.9".parse().unwrap()));
        assert_eq!(
            coerce_out(&loaded, &FieldType::Decimal),
            Ok(Value::from("19.9"))
        );
        assert_eq!(
            coerce_in(&Value::from(500), &FieldType::Decimal),
            Ok(Value::Decimal(Decimal::from(500)))
        );
        assert!(matches!(
            coerce_in(&Value::from("five hundred"), &FieldType::Decimal),
            Err(FieldError::InvalidFormat { .. })
        ));
    }

    #[test]
    fn test_boolean_canonical_strings() {
        assert_eq!(coerce_in(&Value::from("true"), &FieldType::Boolean), Ok(Value::from(true)));
        assert_eq!(coerce_in(&Value::from(false), &FieldType::Boolean), Ok(Value::from(false)));
        assert!(matches!(
            coerce_in(&Value::from("yes"), &FieldType::Boolean),
            Err(FieldError::InvalidFormat { .. })
        ));
        assert!(matches!(
            coerce_in(&Value::from(1), &FieldType::Boolean),
            Err(FieldError::TypeMismatch { .. })
        ));
    }

    #[test]
    fn test_dates() {
        let date = coerce_in(&Value::from("2024-01-15"), &FieldType::Date).unwrap();
        assert_eq!(coerce_out(&date, &FieldType::Date), Ok(Value::from("2024-01-15")));
        assert!(coerce_in(&Value::from("15/01/2024"), &FieldType::Date).is_err());

        let dt = coerce_in(&Value::from("2024-01-15T12:30:00+02:00"), &FieldType::DateTime).unwrap();
        assert_eq!(
            coerce_out(&dt, &FieldType::DateTime),
            Ok(Value::from("2024-01-15T10:30:00Z"))
        );
    }

    #[test]
    fn test_enum_both_ways() {
        let status = EnumMapping::builder("status")
            .value("new", "NEW")
            .value("charged", "CHARGED")
            .build()
            .unwrap();
        let ty = FieldType::enumeration(&status);

        assert_eq!(coerce_in(&Value::from("NEW"), &ty), Ok(Value::symbol("new")));
        assert_eq!(coerce_out(&Value::symbol("new"), &ty), Ok(Value::from("NEW")));
        assert_eq!(coerce_out(&Value::from("charged"), &ty), Ok(Value::from("CHARGED")));
        assert_eq!(
            coerce_in(&Value::from("UNKNOWN"), &ty),
            Err(FieldError::UnknownEnumValue("\"UNKNOWN\"".into()))
        );
        assert!(matches!(
            coerce_out(&Value::symbol("refunded"), &ty),
            Err(FieldError::UnknownEnumValue(_))
        ));
    }

    #[test]
    fn test_out_rejects_wrong_kinds() {
        assert!(coerce_out(&Value::from("1"), &FieldType::Integer).is_err());
        assert!(coerce_out(&Value::from(1), &FieldType::Boolean).is_err());
        assert!(coerce_out(&Value::from(20240115), &FieldType::Date).is_err());
        assert_eq!(coerce_out(&Value::from(3), &FieldType::Decimal), Ok(Value::from("3")));
    }

    #[test]
    fn test_out_canonicalizes_serialized_strings() {
        assert_eq!(
            coerce_out(&Value::from("12.50"), &FieldType::Decimal),
            Ok(Value::from("12.5"))
        );
        assert_eq!(
            coerce_out(&Value::from("2024-01-15"), &FieldType::Date),
            Ok(Value::from("2024-01-15"))
        );
        assert!(matches!(
            coerce_out(&Value::from("soon"), &FieldType::Date),
            Err(FieldError::InvalidFormat { .. })
        ));
    }
}

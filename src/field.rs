//! Field descriptors.
//!
//! A [`Field`] declares one entry of a schema: its internal name, the external
//! key it is read from and written to (defaults to the name), its
//! [`FieldType`], whether it is required, an optional default and an optional
//! validator.
//!
//! ```rust
//! use serde_param::{Field, FieldType, Value};
//!
//! let field = Field::new("currency_code", FieldType::String)
//!     .key("currencyCode")
//!     .optional()
//!     .default("USD");
//!
//! assert_eq!(field.name(), "currency_code");
//! assert_eq!(field.external_key(), "currencyCode");
//! assert_eq!(field.default_value(), Some(&Value::from("USD")));
//! ```

use crate::coerce::{coerce_in, coerce_out};
use crate::{EnumMapping, FieldError, Schema, SchemaError, Value};
use std::fmt;
use std::sync::Arc;

/// Checks a loaded value; `Err(message)` is reported as [`FieldError::Invalid`].
pub type FieldValidator = Arc<dyn Fn(&Value) -> Result<(), String> + Send + Sync>;

/// The declared type of a field.
#[derive(Clone, Debug)]
pub enum FieldType {
    String,
    Integer,
    Float,
    Decimal,
    Boolean,
    /// ISO-8601 calendar date, `YYYY-MM-DD`.
    Date,
    /// RFC 3339 timestamp, normalised to UTC.
    DateTime,
    /// Passed through untouched in both directions.
    Any,
    Enum(Arc<EnumMapping>),
    /// A list whose elements all have the given type.
    Array(Box<FieldType>),
    /// One nested document.
    One(SchemaRef),
    /// A list of nested documents.
    Many(SchemaRef),
}

impl FieldType {
    #[must_use]
    pub fn one(schema: &Arc<Schema>) -> Self {
        FieldType::One(SchemaRef::Resolved(Arc::clone(schema)))
    }

    #[must_use]
    pub fn many(schema: &Arc<Schema>) -> Self {
        FieldType::Many(SchemaRef::Resolved(Arc::clone(schema)))
    }

    /// Nests a schema by name; only a [`Registry`](crate::Registry) can resolve it.
    #[must_use]
    pub fn one_named(name: impl Into<String>) -> Self {
        FieldType::One(SchemaRef::Named(name.into()))
    }

    #[must_use]
    pub fn many_named(name: impl Into<String>) -> Self {
        FieldType::Many(SchemaRef::Named(name.into()))
    }

    #[must_use]
    pub fn array_of(element: FieldType) -> Self {
        FieldType::Array(Box::new(element))
    }

    #[must_use]
    pub fn enumeration(mapping: &Arc<EnumMapping>) -> Self {
        FieldType::Enum(Arc::clone(mapping))
    }

    /// Name used in `expected ...` error messages.
    #[must_use]
    pub fn describe(&self) -> String {
        match self {
            FieldType::String => "string".to_string(),
            FieldType::Integer => "integer".to_string(),
            FieldType::Float => "float".to_string(),
            FieldType::Decimal => "decimal".to_string(),
            FieldType::Boolean => "boolean".to_string(),
            FieldType::Date => "date".to_string(),
            FieldType::DateTime => "datetime".to_string(),
            FieldType::Any => "any".to_string(),
            FieldType::Enum(mapping) => format!("enum {}", mapping.name()),
            FieldType::Array(element) => format!("array of {}", element.describe()),
            FieldType::One(schema) => schema.name().to_string(),
            FieldType::Many(schema) => format!("array of {}", schema.name()),
        }
    }

    /// `true` for types handled entirely by the coercers.
    #[must_use]
    pub fn is_scalar(&self) -> bool {
        !matches!(
            self,
            FieldType::Array(_) | FieldType::One(_) | FieldType::Many(_)
        )
    }

    /// Rewrites by-name schema references through `resolve`.
    pub(crate) fn resolved_with<F>(&self, resolve: &mut F) -> Result<FieldType, SchemaError>
    where
        F: FnMut(&str) -> Result<Arc<Schema>, SchemaError>,
    {
        Ok(match self {
            FieldType::One(SchemaRef::Named(name)) => {
                FieldType::One(SchemaRef::Resolved(resolve(name)?))
            }
            FieldType::Many(SchemaRef::Named(name)) => {
                FieldType::Many(SchemaRef::Resolved(resolve(name)?))
            }
            FieldType::Array(element) => FieldType::Array(Box::new(element.resolved_with(resolve)?)),
            other => other.clone(),
        })
    }
}

/// A nested schema, either already built or referenced by name.
#[derive(Clone)]
pub enum SchemaRef {
    Resolved(Arc<Schema>),
    Named(String),
}

impl SchemaRef {
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            SchemaRef::Resolved(schema) => schema.name(),
            SchemaRef::Named(name) => name,
        }
    }

    #[must_use]
    pub fn resolved(&self) -> Option<&Arc<Schema>> {
        match self {
            SchemaRef::Resolved(schema) => Some(schema),
            SchemaRef::Named(_) => None,
        }
    }
}

// Nested schemas print by name only.
impl fmt::Debug for SchemaRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SchemaRef::Resolved(schema) => write!(f, "Resolved({})", schema.name()),
            SchemaRef::Named(name) => write!(f, "Named({})", name),
        }
    }
}

/// Declaration of one schema field.
#[derive(Clone)]
pub struct Field {
    name: String,
    key: Option<String>,
    ty: FieldType,
    required: Option<bool>,
    default: Option<Value>,
    validator: Option<FieldValidator>,
}

impl Field {
    #[must_use]
    pub fn new(name: impl Into<String>, ty: FieldType) -> Self {
        Field {
            name: name.into(),
            key: None,
            ty,
            required: None,
            default: None,
            validator: None,
        }
    }

    /// Sets the external key; defaults to the internal name.
    #[must_use]
    pub fn key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }

    /// Marks the field required regardless of the schema-wide flag.
    #[must_use]
    pub fn required(mut self) -> Self {
        self.required = Some(true);
        self
    }

    /// Marks the field optional regardless of the schema-wide flag.
    #[must_use]
    pub fn optional(mut self) -> Self {
        self.required = Some(false);
        self
    }

    /// Internal value used on load when the external key is absent.
    #[must_use]
    pub fn default(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(value.into());
        self
    }

    #[must_use]
    pub fn validator<F>(mut self, validator: F) -> Self
    where
        F: Fn(&Value) -> Result<(), String> + Send + Sync + 'static,
    {
        self.validator = Some(Arc::new(validator));
        self
    }

    /// Uses a shared validator such as those in [`validators`](crate::validators).
    #[must_use]
    pub fn validate_with(mut self, validator: FieldValidator) -> Self {
        self.validator = Some(validator);
        self
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn external_key(&self) -> &str {
        self.key.as_deref().unwrap_or(&self.name)
    }

    #[must_use]
    pub fn field_type(&self) -> &FieldType {
        &self.ty
    }

    /// The field's own required flag, if it sets one.
    #[must_use]
    pub fn required_flag(&self) -> Option<bool> {
        self.required
    }

    #[must_use]
    pub fn default_value(&self) -> Option<&Value> {
        self.default.as_ref()
    }

    pub(crate) fn check(&self, value: &Value) -> Option<FieldError> {
        let validator = self.validator.as_ref()?;
        validator(value).err().map(FieldError::Invalid)
    }

    pub(crate) fn with_type(&self, ty: FieldType) -> Field {
        Field { ty, ..self.clone() }
    }

    /// Definition-time checks: non-empty names and a default matching the type.
    ///
    /// Returns the field with its default in canonical internal form, so a
    /// defaulted value is indistinguishable from a loaded one.
    pub(crate) fn validate(&self, schema: &str) -> Result<Field, SchemaError> {
        if self.name.is_empty() {
            return Err(SchemaError::EmptyName {
                schema: schema.to_string(),
                what: "a field".to_string(),
            });
        }
        if self.external_key().is_empty() {
            return Err(SchemaError::EmptyName {
                schema: schema.to_string(),
                what: format!("the external key of field `{}`", self.name),
            });
        }
        let default = match &self.default {
            Some(default) => Some(normalize_default(&self.ty, default).map_err(|reason| {
                SchemaError::InvalidDefault {
                    schema: schema.to_string(),
                    field: self.name.clone(),
                    reason,
                }
            })?),
            None => None,
        };
        Ok(Field {
            default,
            ..self.clone()
        })
    }
}

fn normalize_default(ty: &FieldType, default: &Value) -> Result<Value, String> {
    if default.is_null() {
        return Ok(Value::Null);
    }
    match ty {
        FieldType::One(_) if default.is_object() => Ok(default.clone()),
        FieldType::Many(_) if default.is_array() => Ok(default.clone()),
        FieldType::One(_) | FieldType::Many(_) => Err(format!(
            "expected {}, found {}",
            ty.describe(),
            default.type_name()
        )),
        FieldType::Array(element) => match default {
            Value::Array(items) => items
                .iter()
                .map(|item| normalize_default(element, item))
                .collect::<Result<Vec<_>, _>>()
                .map(Value::Array),
            other => Err(format!("expected array, found {}", other.type_name())),
        },
        // defaults are internal values, so these must already be parsed
        FieldType::Decimal | FieldType::Date | FieldType::DateTime if default.is_string() => {
            Err(format!("expected {}, found string", ty.describe()))
        }
        scalar => coerce_out(default, scalar)
            .and_then(|external| coerce_in(&external, scalar))
            .map_err(|err| err.to_string()),
    }
}

impl fmt::Debug for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Field")
            .field("name", &self.name)
            .field("key", &self.external_key())
            .field("ty", &self.ty)
            .field("required", &self.required)
            .field("default", &self.default)
            .field("validator", &self.validator.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_defaults_to_name() {
        let field = Field::new("amount", FieldType::Decimal);
        assert_eq!(field.external_key(), "amount");
        assert_eq!(field.required_flag(), None);
        assert_eq!(field.clone().required().required_flag(), Some(true));
        assert_eq!(field.optional().required_flag(), Some(false));
    }

    #[test]
    fn test_rejects_empty_names() {
        assert!(matches!(
            Field::new("", FieldType::String).validate("S"),
            Err(SchemaError::EmptyName { .. })
        ));
        assert!(matches!(
            Field::new("a", FieldType::String).key("").validate("S"),
            Err(SchemaError::EmptyName { .. })
        ));
    }

    #[test]
    fn test_default_must_match_type() {
        assert!(Field::new("n", FieldType::Integer).default(3).validate("S").is_ok());
        assert!(Field::new("n", FieldType::Integer).default(Value::Null).validate("S").is_ok());
        let err = Field::new("n", FieldType::Integer)
            .default("three")
            .validate("S")
            .unwrap_err();
        assert!(matches!(err, SchemaError::InvalidDefault { .. }));
        assert!(Field::new("tags", FieldType::array_of(FieldType::String))
            .default(vec![Value::from(1)])
            .validate("S")
            .is_err());
    }

    #[test]
    fn test_default_takes_internal_form() {
        let status = EnumMapping::builder("status")
            .value("new", "NEW")
            .build()
            .unwrap();
        let field = Field::new("status", FieldType::enumeration(&status))
            .default("new")
            .validate("S")
            .unwrap();
        assert_eq!(field.default_value(), Some(&Value::symbol("new")));

        let field = Field::new("ratio", FieldType::Float).default(3).validate("S").unwrap();
        assert_eq!(field.default_value(), Some(&Value::from(3.0)));

        let field = Field::new("ids", FieldType::array_of(FieldType::Float))
            .default(vec![Value::from(1)])
            .validate("S")
            .unwrap();
        assert_eq!(field.default_value(), Some(&Value::Array(vec![Value::from(1.0)])));
    }

    #[test]
    fn test_validator_reports_invalid() {
        let field = Field::new("age", FieldType::Integer).validator(|v| match v.as_i64() {
            Some(n) if n >= 18 => Ok(()),
            _ => Err("must be an adult".to_string()),
        });
        assert_eq!(field.check(&Value::from(30)), None);
        assert_eq!(
            field.check(&Value::from(3)),
            Some(FieldError::Invalid("must be an adult".to_string()))
        );
    }

    #[test]
    fn test_describe() {
        assert_eq!(FieldType::array_of(FieldType::Date).describe(), "array of date");
        assert_eq!(FieldType::many_named("Phone").describe(), "array of Phone");
        assert!(!FieldType::one_named("User").is_scalar());
    }
}

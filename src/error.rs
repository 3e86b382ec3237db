//! Error types for schema definition, loading and dumping.
//!
//! Two very different kinds of failure exist:
//!
//! - **Definition errors** ([`SchemaError`]) are integration bugs: duplicate
//!   keys, a non-bijective enum, a schema that nests itself. They are reported
//!   immediately, one at a time, when a schema or registry is built, and are
//!   never caused by runtime data.
//! - **Data errors** ([`FieldError`]) describe a problem with one field of one
//!   input. Loading and dumping never stop at the first one: every problem in
//!   the tree is collected into a single [`ValidationError`] keyed by field path.
//!
//! ## Examples
//!
//! ```rust
//! use serde_param::{load, value, Field, FieldError, FieldType, LoadOptions, Schema};
//!
//! let schema = Schema::builder("Payment")
//!     .required(true)
//!     .field(Field::new("amount", FieldType::Decimal))
//!     .field(Field::new("currency_code", FieldType::String).key("currencyCode"))
//!     .build()
//!     .unwrap();
//!
//! let err = load(&schema, &value!({ "amount": "ten" }), &LoadOptions::default()).unwrap_err();
//! assert_eq!(err.len(), 2);
//! assert_eq!(err.first("currencyCode"), Some(&FieldError::MissingField));
//! ```

use indexmap::IndexMap;
use serde::{Serialize, Serializer};
use std::fmt;
use thiserror::Error;

/// A schema could not be defined.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    #[error("invalid schema definition: {what} in schema `{schema}` has an empty name")]
    EmptyName { schema: String, what: String },

    #[error("invalid schema definition: duplicate {kind} `{key}` in schema `{schema}`")]
    DuplicateKey {
        schema: String,
        kind: &'static str,
        key: String,
    },

    #[error("invalid schema definition: enum `{name}` is not a bijection, {detail}")]
    NonBijectiveEnum { name: String, detail: String },

    #[error("invalid schema definition: enum `{0}` has no values")]
    EmptyEnum(String),

    #[error("invalid schema definition: schema nests itself: {}", .cycle.join(" -> "))]
    CyclicSchemaDefinition { cycle: Vec<String> },

    #[error("invalid schema definition: schema `{0}` is referenced but never defined")]
    UnresolvedSchema(String),

    #[error("invalid schema definition: schema `{0}` is defined twice")]
    DuplicateSchema(String),

    #[error("invalid schema definition: default for field `{field}` in schema `{schema}` is invalid: {reason}")]
    InvalidDefault {
        schema: String,
        field: String,
        reason: String,
    },
}

/// A problem with a single field of the data being loaded or dumped.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FieldError {
    #[error("is missing")]
    MissingField,

    #[error("expected {expected}, found {found}")]
    TypeMismatch { expected: String, found: String },

    #[error("invalid {expected} format: {input:?}")]
    InvalidFormat { expected: String, input: String },

    #[error("unknown enum value {0}")]
    UnknownEnumValue(String),

    #[error("unknown field")]
    UnknownField,

    /// Rejected by a field validator.
    #[error("{0}")]
    Invalid(String),
}

impl FieldError {
    pub fn type_mismatch(expected: &str, found: &crate::Value) -> Self {
        FieldError::TypeMismatch {
            expected: expected.to_string(),
            found: found.type_name().to_string(),
        }
    }

    pub fn invalid_format(expected: &str, input: impl Into<String>) -> Self {
        FieldError::InvalidFormat {
            expected: expected.to_string(),
            input: input.into(),
        }
    }
}

/// Every field error found in one load, dump or validate call, keyed by path.
///
/// Paths keep the order in which the schema walk met them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValidationError {
    errors: IndexMap<String, Vec<FieldError>>,
}

impl ValidationError {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `error` at `path`.
    pub fn insert(&mut self, path: impl Into<String>, error: FieldError) {
        self.errors.entry(path.into()).or_default().push(error);
    }

    /// Errors recorded at `path`.
    #[must_use]
    pub fn get(&self, path: &str) -> Option<&[FieldError]> {
        self.errors.get(path).map(Vec::as_slice)
    }

    /// First error recorded at `path`.
    #[must_use]
    pub fn first(&self, path: &str) -> Option<&FieldError> {
        self.errors.get(path).and_then(|errors| errors.first())
    }

    /// Number of distinct paths with errors.
    #[must_use]
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.errors.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[FieldError])> {
        self.errors.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    /// `Ok(value)` when nothing was recorded, `Err(self)` otherwise.
    pub fn into_result<T>(self, value: T) -> std::result::Result<T, ValidationError> {
        if self.is_empty() {
            Ok(value)
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "validation failed for {} field(s)", self.errors.len())?;
        for (path, errors) in &self.errors {
            let shown = if path.is_empty() { "<root>" } else { path.as_str() };
            for error in errors {
                write!(f, "\n  {}: {}", shown, error)?;
            }
        }
        Ok(())
    }
}

impl std::error::Error for ValidationError {}

impl Serialize for ValidationError {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        use serde::ser::SerializeMap;
        let mut map = serializer.serialize_map(Some(self.errors.len()))?;
        for (path, errors) in &self.errors {
            let messages: Vec<String> = errors.iter().map(ToString::to_string).collect();
            map.serialize_entry(path, &messages)?;
        }
        map.end()
    }
}

/// Crate-level error.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    #[error(transparent)]
    InvalidSchemaDefinition(#[from] SchemaError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Raised by the serde bridge (`to_value`, `from_value`).
    #[error("{0}")]
    Custom(String),
}

impl Error {
    pub fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Custom(msg.to_string())
    }

    /// The aggregate data errors, if this is a validation failure.
    #[must_use]
    pub fn as_validation(&self) -> Option<&ValidationError> {
        match self {
            Error::Validation(err) => Some(err),
            _ => None,
        }
    }
}

impl serde::ser::Error for Error {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Custom(msg.to_string())
    }
}

impl serde::de::Error for Error {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Custom(msg.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;

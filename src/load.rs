//! The load engine: external representation → internal representation.
//!
//! [`load`] walks a schema depth-first. For every field it looks up the
//! external key, applies defaults and required rules, coerces scalars,
//! recurses into nested schemas and lists, and runs field validators. Errors
//! never stop the walk: every problem in the tree is collected and returned
//! as one [`ValidationError`] keyed by external path
//! (`detail.phones[2].countryCode`).
//!
//! ```rust
//! use serde_param::{load, value, Decimal, Field, FieldType, LoadOptions, Schema, Value};
//!
//! let payment = Schema::builder("Payment")
//!     .required(true)
//!     .field(Field::new("currency_code", FieldType::String).key("currencyCode"))
//!     .field(Field::new("amount", FieldType::Decimal))
//!     .build()
//!     .unwrap();
//!
//! let loaded = load(
//!     &payment,
//!     &value!({ "currencyCode": "USD", "amount": "500" }),
//!     &LoadOptions::default(),
//! )
//! .unwrap();
//!
//! assert_eq!(loaded.get("currency_code"), Some(&Value::from("USD")));
//! assert_eq!(loaded.get("amount"), Some(&Value::Decimal(Decimal::from(500))));
//! ```

use crate::coerce::coerce_in;
use crate::path::FieldPath;
use crate::{
    from_value, FieldError, FieldType, LoadOptions, Map, Record, Result, Schema, SchemaRef,
    UnknownFields, ValidationError, Value,
};
use serde::de::DeserializeOwned;
use serde::{Serialize, Serializer};
use std::sync::Arc;
use tracing::{debug, trace};

/// The internal representation produced by [`load`].
///
/// Which variant is returned is chosen by [`LoadOptions::struct_output`].
#[derive(Clone, Debug, PartialEq)]
pub enum Loaded {
    /// A record tagged with its schema; nested schemas are records too.
    Typed(Record),
    /// A generic ordered map; nested schemas are maps too.
    Generic(Map),
}

impl Loaded {
    #[must_use]
    pub fn fields(&self) -> &Map {
        match self {
            Loaded::Typed(record) => record.fields(),
            Loaded::Generic(map) => map,
        }
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields().get(name)
    }

    #[must_use]
    pub fn as_record(&self) -> Option<&Record> {
        match self {
            Loaded::Typed(record) => Some(record),
            Loaded::Generic(_) => None,
        }
    }

    #[must_use]
    pub fn into_map(self) -> Map {
        match self {
            Loaded::Typed(record) => record.into_fields(),
            Loaded::Generic(map) => map,
        }
    }

    #[must_use]
    pub fn into_value(self) -> Value {
        match self {
            Loaded::Typed(record) => Value::Record(record),
            Loaded::Generic(map) => Value::Object(map),
        }
    }
}

impl From<Loaded> for Value {
    fn from(loaded: Loaded) -> Self {
        loaded.into_value()
    }
}

impl Serialize for Loaded {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Loaded::Typed(record) => record.serialize(serializer),
            Loaded::Generic(map) => Value::Object(map.clone()).serialize(serializer),
        }
    }
}

struct Loader<'a> {
    options: &'a LoadOptions,
    errors: ValidationError,
}

impl<'a> Loader<'a> {
    fn new(options: &'a LoadOptions) -> Self {
        Loader {
            options,
            errors: ValidationError::new(),
        }
    }

    fn push(&mut self, path: &FieldPath, error: FieldError) {
        self.errors.insert(path.to_string(), error);
    }

    fn wrap(&self, schema: &Schema, fields: Map) -> Value {
        if self.options.struct_output {
            Value::Record(Record::new(schema.name(), fields))
        } else {
            Value::Object(fields)
        }
    }

    /// Nested-schema defaults take the same output shape as loaded documents.
    fn default_value(&self, ty: &FieldType, default: &Value) -> Value {
        match (ty, default) {
            (FieldType::One(reference), Value::Object(fields)) => match reference.resolved() {
                Some(schema) => self.wrap(schema, fields.clone()),
                None => default.clone(),
            },
            (FieldType::Many(reference), Value::Array(items)) => {
                let one = FieldType::One(reference.clone());
                Value::Array(items.iter().map(|item| self.default_value(&one, item)).collect())
            }
            _ => default.clone(),
        }
    }

    /// Loads one document. `path` uses external keys, `ipath` internal names.
    fn load_document(
        &mut self,
        schema: &Schema,
        raw: &Value,
        path: &FieldPath,
        ipath: &FieldPath,
    ) -> Option<Map> {
        let Some(object) = raw.as_object() else {
            self.push(path, FieldError::type_mismatch("object", raw));
            return None;
        };

        let mut out = Map::with_capacity(schema.fields().len());
        for field in schema.fields() {
            let field_ipath = ipath.key(field.name());
            let address = field_ipath.without_indexes();
            if self.options.is_excluded(&address) {
                continue;
            }
            let field_path = path.key(field.external_key());
            let required = self
                .options
                .required_for(&address)
                .unwrap_or_else(|| schema.is_required(field));

            match object.get(field.external_key()) {
                Some(Value::Null) if !required => {
                    out.insert(field.name().to_string(), Value::Null);
                }
                None | Some(Value::Null) => {
                    if let Some(default) = field.default_value() {
                        let value = self.default_value(field.field_type(), default);
                        out.insert(field.name().to_string(), value);
                    } else if required {
                        self.push(&field_path, FieldError::MissingField);
                    }
                }
                Some(raw) => {
                    let before = self.errors.len();
                    let Some(value) =
                        self.load_value(field.field_type(), raw, &field_path, &field_ipath)
                    else {
                        continue;
                    };
                    if self.errors.len() == before {
                        if let Some(error) = field.check(&value) {
                            self.push(&field_path, error);
                            continue;
                        }
                    }
                    out.insert(field.name().to_string(), value);
                }
            }
        }

        match self.options.unknown {
            UnknownFields::Ignore => {}
            UnknownFields::Error => {
                for key in object.keys() {
                    if schema.field_by_key(key).is_none() {
                        self.push(&path.key(key), FieldError::UnknownField);
                    }
                }
            }
            UnknownFields::Include => {
                for (key, value) in object.iter() {
                    // a key naming a declared field would bypass its coercion
                    if schema.field_by_key(key).is_none()
                        && schema.field(key).is_none()
                        && !out.contains_key(key)
                    {
                        out.insert(key.clone(), value.clone());
                    }
                }
            }
        }

        Some(out)
    }

    fn load_value(
        &mut self,
        ty: &FieldType,
        raw: &Value,
        path: &FieldPath,
        ipath: &FieldPath,
    ) -> Option<Value> {
        match ty {
            FieldType::One(reference) => {
                let schema = self.resolved(reference, path)?;
                trace!(path = %path, schema = schema.name(), "loading nested document");
                let fields = self.load_document(schema, raw, path, ipath)?;
                Some(self.wrap(schema, fields))
            }
            FieldType::Many(reference) => {
                let schema = self.resolved(reference, path)?;
                let Some(items) = raw.as_array() else {
                    self.push(path, FieldError::type_mismatch(&ty.describe(), raw));
                    return None;
                };
                trace!(path = %path, schema = schema.name(), len = items.len(), "loading nested list");
                let mut out = Vec::with_capacity(items.len());
                let mut complete = true;
                for (i, item) in items.iter().enumerate() {
                    match self.load_document(schema, item, &path.index(i), &ipath.index(i)) {
                        Some(fields) => out.push(self.wrap(schema, fields)),
                        None => complete = false,
                    }
                }
                complete.then_some(Value::Array(out))
            }
            FieldType::Array(element) => {
                let Some(items) = raw.as_array() else {
                    self.push(path, FieldError::type_mismatch(&ty.describe(), raw));
                    return None;
                };
                let mut out = Vec::with_capacity(items.len());
                let mut complete = true;
                for (i, item) in items.iter().enumerate() {
                    match self.load_value(element, item, &path.index(i), &ipath.index(i)) {
                        Some(value) => out.push(value),
                        None => complete = false,
                    }
                }
                complete.then_some(Value::Array(out))
            }
            scalar => match coerce_in(raw, scalar) {
                Ok(value) => Some(value),
                Err(error) => {
                    self.push(path, error);
                    None
                }
            },
        }
    }

    fn resolved<'s>(
        &mut self,
        reference: &'s SchemaRef,
        path: &FieldPath,
    ) -> Option<&'s Arc<Schema>> {
        let resolved = reference.resolved();
        if resolved.is_none() {
            self.push(
                path,
                FieldError::Invalid(format!("schema `{}` was never resolved", reference.name())),
            );
        }
        resolved
    }

    fn finish(self, schema: &Schema, fields: Option<Map>) -> std::result::Result<Loaded, ValidationError> {
        let errors = self.errors;
        match fields {
            Some(fields) if errors.is_empty() => Ok(if self.options.struct_output {
                Loaded::Typed(Record::new(schema.name(), fields))
            } else {
                Loaded::Generic(fields)
            }),
            _ => Err(errors),
        }
    }
}

/// Loads `external` with `schema`.
///
/// # Errors
///
/// A [`ValidationError`] holding every field error found anywhere in the tree.
pub fn load(
    schema: &Schema,
    external: &Value,
    options: &LoadOptions,
) -> std::result::Result<Loaded, ValidationError> {
    debug!(schema = schema.name(), struct_output = options.struct_output, "load");
    let mut loader = Loader::new(options);
    let root = FieldPath::root();
    let fields = loader.load_document(schema, external, &root, &root);
    let result = loader.finish(schema, fields);
    if let Err(errors) = &result {
        debug!(schema = schema.name(), errors = errors.len(), "load rejected");
    }
    result
}

/// Loads every element of the external array `external`.
///
/// Error paths start with the element index, e.g. `[1].currencyCode`.
///
/// # Errors
///
/// A [`ValidationError`] holding every field error of every element.
pub fn load_many(
    schema: &Schema,
    external: &Value,
    options: &LoadOptions,
) -> std::result::Result<Vec<Loaded>, ValidationError> {
    debug!(schema = schema.name(), "load_many");
    let root = FieldPath::root();
    let Some(items) = external.as_array() else {
        let mut errors = ValidationError::new();
        errors.insert(
            root.to_string(),
            FieldError::type_mismatch(&format!("array of {}", schema.name()), external),
        );
        return Err(errors);
    };

    let mut loader = Loader::new(options);
    let documents: Vec<Option<Map>> = items
        .iter()
        .enumerate()
        .map(|(i, item)| loader.load_document(schema, item, &root.index(i), &root.index(i)))
        .collect();

    if !loader.errors.is_empty() {
        debug!(schema = schema.name(), errors = loader.errors.len(), "load_many rejected");
        return Err(loader.errors);
    }
    Ok(documents
        .into_iter()
        .flatten()
        .map(|fields| {
            if options.struct_output {
                Loaded::Typed(Record::new(schema.name(), fields))
            } else {
                Loaded::Generic(fields)
            }
        })
        .collect())
}

/// Runs the full load traversal and reports only whether it succeeded.
///
/// # Errors
///
/// The same [`ValidationError`] [`load`] would return.
pub fn validate(
    schema: &Schema,
    external: &Value,
    options: &LoadOptions,
) -> std::result::Result<(), ValidationError> {
    load(schema, external, options).map(|_| ())
}

/// Loads `external` and deserializes the internal representation into `T`.
///
/// Enum symbols deserialize into unit variants, decimals and dates into
/// anything that reads them from strings.
///
/// # Errors
///
/// [`Error::Validation`](crate::Error::Validation) when loading fails,
/// [`Error::Custom`](crate::Error::Custom) when `T` does not match.
pub fn load_into<T>(schema: &Schema, external: &Value, options: &LoadOptions) -> Result<T>
where
    T: DeserializeOwned,
{
    let loaded = load(schema, external, options)?;
    from_value(loaded.into_value())
}

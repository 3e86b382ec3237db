//! The dump engine: internal representation → external representation.
//!
//! [`dump`] is the mirror of [`load`](crate::load): it reads each field by
//! internal name, converts it back to its wire form and writes it under the
//! external key. Optional fields missing from the input are left out of the
//! output rather than written as `null`. Errors are aggregated exactly as in
//! loading, keyed by internal path (`detail.user.first_name`).
//!
//! ```rust
//! use serde_param::{dump, value, DumpOptions, EnumMapping, Field, FieldType, Schema, Value};
//!
//! let status = EnumMapping::builder("status")
//!     .value("new", "NEW")
//!     .value("charged", "CHARGED")
//!     .build()
//!     .unwrap();
//! let schema = Schema::define("Charge", [Field::new("status", FieldType::enumeration(&status))])
//!     .unwrap();
//!
//! let internal = value!({ "status": (Value::symbol("new")) });
//! let external = dump(&schema, &internal, &DumpOptions::default()).unwrap();
//! assert_eq!(external, value!({ "status": "NEW" }));
//! ```

use crate::coerce::coerce_out;
use crate::path::FieldPath;
use crate::{
    to_value, DumpOptions, FieldError, FieldType, Map, Result, Schema, SchemaRef, ValidationError,
    Value,
};
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, trace};

struct Dumper<'a> {
    options: &'a DumpOptions,
    errors: ValidationError,
}

impl<'a> Dumper<'a> {
    fn new(options: &'a DumpOptions) -> Self {
        Dumper {
            options,
            errors: ValidationError::new(),
        }
    }

    fn push(&mut self, path: &FieldPath, error: FieldError) {
        self.errors.insert(path.to_string(), error);
    }

    fn dump_document(&mut self, schema: &Schema, internal: &Value, path: &FieldPath) -> Option<Map> {
        let fields = match internal {
            Value::Object(map) => map,
            Value::Record(record) if record.schema_name() == schema.name() => record.fields(),
            Value::Record(record) => {
                self.push(
                    path,
                    FieldError::TypeMismatch {
                        expected: format!("record {}", schema.name()),
                        found: format!("record {}", record.schema_name()),
                    },
                );
                return None;
            }
            other => {
                self.push(path, FieldError::type_mismatch("object", other));
                return None;
            }
        };

        let mut out = Map::with_capacity(schema.fields().len());
        for field in schema.fields() {
            let field_path = path.key(field.name());
            let address = field_path.without_indexes();
            if self.options.is_excluded(&address) {
                continue;
            }
            let required = self
                .options
                .required_for(&address)
                .unwrap_or_else(|| schema.is_required(field));

            match fields.get(field.name()) {
                None | Some(Value::Null) if required => {
                    self.push(&field_path, FieldError::MissingField);
                }
                None => {}
                Some(Value::Null) => {
                    out.insert(field.external_key().to_string(), Value::Null);
                }
                Some(value) => {
                    if let Some(external) = self.dump_value(field.field_type(), value, &field_path) {
                        out.insert(field.external_key().to_string(), external);
                    }
                }
            }
        }
        Some(out)
    }

    fn dump_value(&mut self, ty: &FieldType, value: &Value, path: &FieldPath) -> Option<Value> {
        match ty {
            FieldType::One(reference) => {
                let schema = self.resolved(reference, path)?;
                trace!(path = %path, schema = schema.name(), "dumping nested document");
                self.dump_document(schema, value, path).map(Value::Object)
            }
            FieldType::Many(reference) => {
                let schema = self.resolved(reference, path)?;
                let Some(items) = value.as_array() else {
                    self.push(path, FieldError::type_mismatch(&ty.describe(), value));
                    return None;
                };
                let mut out = Vec::with_capacity(items.len());
                let mut complete = true;
                for (i, item) in items.iter().enumerate() {
                    match self.dump_document(schema, item, &path.index(i)) {
                        Some(fields) => out.push(Value::Object(fields)),
                        None => complete = false,
                    }
                }
                complete.then_some(Value::Array(out))
            }
            FieldType::Array(element) => {
                let Some(items) = value.as_array() else {
                    self.push(path, FieldError::type_mismatch(&ty.describe(), value));
                    return None;
                };
                let mut out = Vec::with_capacity(items.len());
                let mut complete = true;
                for (i, item) in items.iter().enumerate() {
                    match self.dump_value(element, item, &path.index(i)) {
                        Some(external) => out.push(external),
                        None => complete = false,
                    }
                }
                complete.then_some(Value::Array(out))
            }
            scalar => match coerce_out(value, scalar) {
                Ok(external) => Some(external),
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
}

/// Dumps `internal` (a map, a record or a loaded value) with `schema`.
///
/// # Errors
///
/// A [`ValidationError`] holding every field error found anywhere in the tree.
pub fn dump(
    schema: &Schema,
    internal: &Value,
    options: &DumpOptions,
) -> std::result::Result<Value, ValidationError> {
    debug!(schema = schema.name(), "dump");
    let mut dumper = Dumper::new(options);
    let fields = dumper.dump_document(schema, internal, &FieldPath::root());
    match fields {
        Some(fields) if dumper.errors.is_empty() => Ok(Value::Object(fields)),
        _ => {
            debug!(schema = schema.name(), errors = dumper.errors.len(), "dump rejected");
            Err(dumper.errors)
        }
    }
}

/// Dumps every element of the internal array `internal`.
///
/// # Errors
///
/// A [`ValidationError`] whose paths start with the element index.
pub fn dump_many(
    schema: &Schema,
    internal: &Value,
    options: &DumpOptions,
) -> std::result::Result<Value, ValidationError> {
    debug!(schema = schema.name(), "dump_many");
    let mut dumper = Dumper::new(options);
    let root = FieldPath::root();
    let Some(items) = internal.as_array() else {
        dumper.push(
            &root,
            FieldError::type_mismatch(&format!("array of {}", schema.name()), internal),
        );
        return Err(dumper.errors);
    };

    let out: Vec<Value> = items
        .iter()
        .enumerate()
        .filter_map(|(i, item)| dumper.dump_document(schema, item, &root.index(i)))
        .map(Value::Object)
        .collect();
    dumper.errors.into_result(Value::Array(out))
}

/// Converts a `Serialize` value into its internal representation and dumps it.
///
/// Unit enum variants are matched against enum mappings by variant name, so
/// `#[serde(rename_all = "snake_case")]` lines them up with symbol names.
///
/// # Errors
///
/// [`Error::Custom`](crate::Error::Custom) when `value` cannot be represented,
/// [`Error::Validation`](crate::Error::Validation) when it does not fit `schema`.
pub fn dump_from<T>(schema: &Schema, value: &T, options: &DumpOptions) -> Result<Value>
where
    T: ?Sized + Serialize,
{
    let internal = to_value(value)?;
    Ok(dump(schema, &internal, options)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{value, Field, Record};

    fn user_schema() -> Arc<Schema> {
        Schema::builder("User")
            .required(true)
            .field(Field::new("first_name", FieldType::String).key("firstName"))
            .field(Field::new("nickname", FieldType::String).optional())
            .build()
            .unwrap()
    }

    #[test]
    fn test_omits_absent_optional_fields() {
        let external = dump(
            &user_schema(),
            &value!({ "first_name": "John" }),
            &DumpOptions::default(),
        )
        .unwrap();
        assert_eq!(external, value!({ "firstName": "John" }));
    }

    #[test]
    fn test_keeps_explicit_null() {
        let external = dump(
            &user_schema(),
            &value!({ "first_name": "John", "nickname": null }),
            &DumpOptions::default(),
        )
        .unwrap();
        assert_eq!(external, value!({ "firstName": "John", "nickname": null }));
    }

    #[test]
    fn test_aggregates_errors_by_internal_path() {
        let detail = Schema::builder("Detail")
            .field(Field::new("user", FieldType::one(&user_schema())))
            .field(Field::new("count", FieldType::Integer))
            .build()
            .unwrap();
        let err = dump(
            &detail,
            &value!({ "user": { "nickname": 3 }, "count": "many" }),
            &DumpOptions::default(),
        )
        .unwrap_err();
        assert_eq!(
            err.paths().collect::<Vec<_>>(),
            vec!["user.first_name", "user.nickname", "count"]
        );
    }

    #[test]
    fn test_record_schema_must_match() {
        let record = Value::Record(Record::new("Account", Map::new()));
        let err = dump(&user_schema(), &record, &DumpOptions::default()).unwrap_err();
        assert_eq!(
            err.first(""),
            Some(&FieldError::TypeMismatch {
                expected: "record User".into(),
                found: "record Account".into()
            })
        );
    }

    #[test]
    fn test_exclude_and_required_override() {
        let external = dump(
            &user_schema(),
            &value!({ "nickname": "Jo" }),
            &DumpOptions::new().with_required(false),
        )
        .unwrap();
        assert_eq!(external, value!({ "nickname": "Jo" }));

        let external = dump(
            &user_schema(),
            &value!({ "first_name": "John", "nickname": "Jo" }),
            &DumpOptions::new().with_exclude("nickname"),
        )
        .unwrap();
        assert_eq!(external, value!({ "firstName": "John" }));
    }

    #[test]
    fn test_per_field_required_override() {
        let err = dump(
            &user_schema(),
            &value!({ "first_name": "John" }),
            &DumpOptions::new().with_field_required("nickname", true),
        )
        .unwrap_err();
        assert_eq!(err.paths().collect::<Vec<_>>(), vec!["nickname"]);

        let external = dump(
            &user_schema(),
            &value!({ "nickname": "Jo" }),
            &DumpOptions::new()
                .with_required(true)
                .with_field_required("first_name", false),
        )
        .unwrap();
        assert_eq!(external, value!({ "nickname": "Jo" }));
    }

    #[test]
    fn test_dump_many() {
        let external = dump_many(
            &user_schema(),
            &value!([{ "first_name": "A" }, { "first_name": "B" }]),
            &DumpOptions::default(),
        )
        .unwrap();
        assert_eq!(external, value!([{ "firstName": "A" }, { "firstName": "B" }]));

        let err = dump_many(&user_schema(), &value!([{}, { "first_name": "B" }]), &DumpOptions::default())
            .unwrap_err();
        assert_eq!(err.paths().collect::<Vec<_>>(), vec!["[0].first_name"]);
    }
}

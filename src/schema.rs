//! Schema definitions and the schema registry.
//!
//! A [`Schema`] is an ordered list of [`Field`]s with a name. It is defined
//! once, validated eagerly, and then shared read-only (`Arc<Schema>`) by every
//! load, dump and validate call.
//!
//! Nested schemas can be composed directly by passing a built schema to
//! [`FieldType::one`] / [`FieldType::many`]:
//!
//! ```rust
//! use serde_param::{Field, FieldType, Schema};
//!
//! let user = Schema::builder("User")
//!     .field(Field::new("first_name", FieldType::String).key("firstName"))
//!     .build()
//!     .unwrap();
//!
//! let detail = Schema::builder("Detail")
//!     .field(Field::new("user", FieldType::one(&user)))
//!     .build()
//!     .unwrap();
//! assert_eq!(detail.fields().len(), 1);
//! ```
//!
//! or by name through a [`Registry`], which resolves references once and
//! rejects schemas that nest themselves:
//!
//! ```rust
//! use serde_param::{Field, FieldType, Registry, Schema, SchemaError};
//!
//! let err = Registry::builder()
//!     .schema(Schema::builder("a").field(Field::new("b", FieldType::one_named("b"))))
//!     .schema(Schema::builder("b").field(Field::new("a", FieldType::many_named("a"))))
//!     .build()
//!     .unwrap_err();
//! assert!(matches!(err, SchemaError::CyclicSchemaDefinition { .. }));
//! ```

use crate::{
    dump, load, validate, DumpOptions, Error, Field, LoadOptions, Loaded, Result, SchemaError,
    Value,
};
use indexmap::IndexMap;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::debug;

/// A named, immutable, ordered set of fields.
#[derive(Debug)]
pub struct Schema {
    name: String,
    fields: Vec<Field>,
    required: bool,
}

impl Schema {
    #[must_use]
    pub fn builder(name: impl Into<String>) -> SchemaBuilder {
        SchemaBuilder {
            name: name.into(),
            fields: Vec::new(),
            required: false,
        }
    }

    /// Defines a schema from an ordered list of fields; all fields optional
    /// unless they say otherwise.
    ///
    /// # Errors
    ///
    /// See [`SchemaBuilder::build`].
    pub fn define(
        name: impl Into<String>,
        fields: impl IntoIterator<Item = Field>,
    ) -> std::result::Result<Arc<Schema>, SchemaError> {
        Schema::builder(name).fields(fields).build()
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    /// Looks a field up by internal name.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name() == name)
    }

    /// Looks a field up by external key.
    #[must_use]
    pub fn field_by_key(&self, key: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.external_key() == key)
    }

    /// The schema-wide "all fields required" flag.
    #[must_use]
    pub fn requires_all(&self) -> bool {
        self.required
    }

    /// Whether `field` is required, before any per-call override.
    #[must_use]
    pub fn is_required(&self, field: &Field) -> bool {
        field.required_flag().unwrap_or(self.required)
    }
}

/// Collects the fields of a [`Schema`].
#[derive(Debug, Clone)]
pub struct SchemaBuilder {
    name: String,
    fields: Vec<Field>,
    required: bool,
}

impl SchemaBuilder {
    /// Makes every field required unless the field itself says otherwise.
    #[must_use]
    pub fn required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    #[must_use]
    pub fn field(mut self, field: Field) -> Self {
        self.fields.push(field);
        self
    }

    #[must_use]
    pub fn fields(mut self, fields: impl IntoIterator<Item = Field>) -> Self {
        self.fields.extend(fields);
        self
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Validates the definition and freezes it.
    ///
    /// # Errors
    ///
    /// - [`SchemaError::EmptyName`] for an empty schema name, field name or key,
    /// - [`SchemaError::DuplicateKey`] when two fields share a name or external key,
    /// - [`SchemaError::InvalidDefault`] when a default does not fit its type,
    /// - [`SchemaError::CyclicSchemaDefinition`] when a field nests this schema by name,
    /// - [`SchemaError::UnresolvedSchema`] for any other by-name reference; use a
    ///   [`Registry`] for those.
    pub fn build(self) -> std::result::Result<Arc<Schema>, SchemaError> {
        let own = self.name.clone();
        let schema = self.finish(&mut |name: &str| {
            if name == own {
                Err(SchemaError::CyclicSchemaDefinition {
                    cycle: vec![own.clone(), own.clone()],
                })
            } else {
                Err(SchemaError::UnresolvedSchema(name.to_string()))
            }
        })?;
        Ok(Arc::new(schema))
    }

    fn finish<F>(&self, resolve: &mut F) -> std::result::Result<Schema, SchemaError>
    where
        F: FnMut(&str) -> std::result::Result<Arc<Schema>, SchemaError>,
    {
        if self.name.is_empty() {
            return Err(SchemaError::EmptyName {
                schema: String::new(),
                what: "the schema".to_string(),
            });
        }

        let mut names = HashSet::with_capacity(self.fields.len());
        let mut keys = HashSet::with_capacity(self.fields.len());
        let mut fields = Vec::with_capacity(self.fields.len());
        for field in &self.fields {
            let checked = field.validate(&self.name)?;
            if !names.insert(field.name()) {
                return Err(SchemaError::DuplicateKey {
                    schema: self.name.clone(),
                    kind: "field name",
                    key: field.name().to_string(),
                });
            }
            if !keys.insert(field.external_key()) {
                return Err(SchemaError::DuplicateKey {
                    schema: self.name.clone(),
                    kind: "external key",
                    key: field.external_key().to_string(),
                });
            }
            fields.push(checked.with_type(field.field_type().resolved_with(resolve)?));
        }

        debug!(schema = %self.name, fields = fields.len(), "schema defined");
        Ok(Schema {
            name: self.name.clone(),
            fields,
            required: self.required,
        })
    }
}

/// A set of named schemas whose by-name references have been resolved.
#[derive(Debug, Default)]
pub struct Registry {
    schemas: IndexMap<String, Arc<Schema>>,
}

/// Collects schema definitions for a [`Registry`].
#[derive(Debug, Default)]
pub struct RegistryBuilder {
    pending: IndexMap<String, SchemaBuilder>,
    duplicate: Option<String>,
}

impl RegistryBuilder {
    #[must_use]
    pub fn schema(mut self, schema: SchemaBuilder) -> Self {
        let name = schema.name().to_string();
        if self.pending.contains_key(&name) {
            self.duplicate.get_or_insert(name);
        } else {
            self.pending.insert(name, schema);
        }
        self
    }

    /// Resolves every reference and validates every schema.
    ///
    /// # Errors
    ///
    /// Any [`SchemaBuilder::build`] error, plus
    /// [`SchemaError::DuplicateSchema`] for a name registered twice and
    /// [`SchemaError::CyclicSchemaDefinition`] for direct or transitive
    /// self-nesting. The first error found is returned.
    pub fn build(self) -> std::result::Result<Registry, SchemaError> {
        if let Some(name) = self.duplicate {
            return Err(SchemaError::DuplicateSchema(name));
        }

        let mut resolved = IndexMap::with_capacity(self.pending.len());
        let mut stack = Vec::new();
        for name in self.pending.keys() {
            resolve_named(name, &self.pending, &mut resolved, &mut stack)?;
        }

        let schemas: IndexMap<String, Arc<Schema>> = self
            .pending
            .keys()
            .filter_map(|name| resolved.get(name).map(|s| (name.clone(), Arc::clone(s))))
            .collect();
        debug!(schemas = schemas.len(), "registry resolved");
        Ok(Registry { schemas })
    }
}

fn resolve_named(
    name: &str,
    pending: &IndexMap<String, SchemaBuilder>,
    resolved: &mut IndexMap<String, Arc<Schema>>,
    stack: &mut Vec<String>,
) -> std::result::Result<Arc<Schema>, SchemaError> {
    if let Some(schema) = resolved.get(name) {
        return Ok(Arc::clone(schema));
    }
    if let Some(pos) = stack.iter().position(|n| n == name) {
        let mut cycle = stack[pos..].to_vec();
        cycle.push(name.to_string());
        return Err(SchemaError::CyclicSchemaDefinition { cycle });
    }
    let builder = pending
        .get(name)
        .ok_or_else(|| SchemaError::UnresolvedSchema(name.to_string()))?;

    stack.push(name.to_string());
    let schema = builder.finish(&mut |dep: &str| resolve_named(dep, pending, resolved, stack))?;
    stack.pop();

    let schema = Arc::new(schema);
    resolved.insert(name.to_string(), Arc::clone(&schema));
    Ok(schema)
}

impl Registry {
    #[must_use]
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::default()
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Arc<Schema>> {
        self.schemas.get(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.schemas.keys().map(String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.schemas.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }

    fn require(&self, name: &str) -> Result<&Arc<Schema>> {
        self.get(name)
            .ok_or_else(|| Error::from(SchemaError::UnresolvedSchema(name.to_string())))
    }

    /// [`load`] with the schema registered as `name`.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidSchemaDefinition`] for an unknown name,
    /// [`Error::Validation`] when the data does not fit.
    pub fn load(&self, name: &str, external: &Value, options: &LoadOptions) -> Result<Loaded> {
        Ok(load(self.require(name)?, external, options)?)
    }

    /// [`dump`] with the schema registered as `name`.
    ///
    /// # Errors
    ///
    /// As for [`Registry::load`].
    pub fn dump(&self, name: &str, internal: &Value, options: &DumpOptions) -> Result<Value> {
        Ok(dump(self.require(name)?, internal, options)?)
    }

    /// [`validate`] with the schema registered as `name`.
    ///
    /// # Errors
    ///
    /// As for [`Registry::load`].
    pub fn validate(&self, name: &str, external: &Value, options: &LoadOptions) -> Result<()> {
        Ok(validate(self.require(name)?, external, options)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::FieldType;

    #[test]
    fn test_duplicate_names_and_keys() {
        let err = Schema::define(
            "Payment",
            [
                Field::new("amount", FieldType::Decimal),
                Field::new("amount", FieldType::Integer).key("total"),
            ],
        )
        .unwrap_err();
        assert_eq!(
            err,
            SchemaError::DuplicateKey {
                schema: "Payment".into(),
                kind: "field name",
                key: "amount".into()
            }
        );

        let err = Schema::define(
            "Payment",
            [
                Field::new("amount", FieldType::Decimal),
                Field::new("total", FieldType::Decimal).key("amount"),
            ],
        )
        .unwrap_err();
        assert!(matches!(err, SchemaError::DuplicateKey { kind: "external key", .. }));
    }

    #[test]
    fn test_required_flag_resolution() {
        let schema = Schema::builder("S")
            .required(true)
            .field(Field::new("a", FieldType::String))
            .field(Field::new("b", FieldType::String).optional())
            .build()
            .unwrap();
        assert!(schema.requires_all());
        assert!(schema.is_required(&schema.fields()[0]));
        assert!(!schema.is_required(&schema.fields()[1]));
    }

    #[test]
    fn test_self_reference_without_registry_is_cyclic() {
        let err = Schema::define("Node", [Field::new("next", FieldType::one_named("Node"))])
            .unwrap_err();
        assert_eq!(
            err,
            SchemaError::CyclicSchemaDefinition {
                cycle: vec!["Node".into(), "Node".into()]
            }
        );
        let err = Schema::define("Node", [Field::new("user", FieldType::one_named("User"))])
            .unwrap_err();
        assert_eq!(err, SchemaError::UnresolvedSchema("User".into()));
    }

    #[test]
    fn test_registry_resolves_in_any_order() {
        let registry = Registry::builder()
            .schema(
                Schema::builder("Order")
                    .field(Field::new("phones", FieldType::many_named("Phone")))
                    .field(Field::new("user", FieldType::one_named("User"))),
            )
            .schema(Schema::builder("User").field(Field::new("name", FieldType::String)))
            .schema(
                Schema::builder("Phone")
                    .field(Field::new("country_code", FieldType::String).key("countryCode")),
            )
            .build()
            .unwrap();

        assert_eq!(registry.names().collect::<Vec<_>>(), vec!["Order", "User", "Phone"]);
        let order = registry.get("Order").unwrap();
        let user = order.field("user").unwrap();
        match user.field_type() {
            FieldType::One(schema) => {
                let resolved = schema.resolved().unwrap();
                assert!(Arc::ptr_eq(resolved, registry.get("User").unwrap()));
            }
            other => panic!("unexpected type {:?}", other),
        }
    }

    #[test]
    fn test_registry_cycle_reports_path() {
        let err = Registry::builder()
            .schema(Schema::builder("A").field(Field::new("b", FieldType::one_named("B"))))
            .schema(Schema::builder("B").field(Field::new("c", FieldType::one_named("C"))))
            .schema(
                Schema::builder("C")
                    .field(Field::new("a", FieldType::array_of(FieldType::one_named("A")))),
            )
            .build()
            .unwrap_err();
        assert_eq!(
            err,
            SchemaError::CyclicSchemaDefinition {
                cycle: vec!["A".into(), "B".into(), "C".into(), "A".into()]
            }
        );
    }

    #[test]
    fn test_registry_rejects_duplicates_and_unknown_refs() {
        let err = Registry::builder()
            .schema(Schema::builder("A"))
            .schema(Schema::builder("A"))
            .build()
            .unwrap_err();
        assert_eq!(err, SchemaError::DuplicateSchema("A".into()));

        let err = Registry::builder()
            .schema(Schema::builder("A").field(Field::new("b", FieldType::one_named("B"))))
            .build()
            .unwrap_err();
        assert_eq!(err, SchemaError::UnresolvedSchema("B".into()));
    }

    #[test]
    fn test_schema_is_shareable_across_threads() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Schema>();
        assert_send_sync::<Registry>();
    }
}

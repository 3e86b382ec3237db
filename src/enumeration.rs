//! Enumerated-value mappings.
//!
//! An [`EnumMapping`] pairs internal symbol names with the literals another
//! system uses for them, e.g. `new ↔ "NEW"`. The table must be a bijection;
//! this is checked once, when the mapping is built, so a typo that maps two
//! members to the same literal is caught before any data flows.
//!
//! ```rust
//! use serde_param::{EnumMapping, Value};
//!
//! let status = EnumMapping::builder("status")
//!     .value("new", "NEW")
//!     .value("charged", "CHARGED")
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(status.to_internal(&Value::from("NEW")), Some("new"));
//! assert_eq!(status.to_external("charged"), Some(&Value::from("CHARGED")));
//!
//! let broken = EnumMapping::builder("status")
//!     .value("new", "NEW")
//!     .value("fresh", "NEW")
//!     .build();
//! assert!(broken.is_err());
//! ```

use crate::{Number, SchemaError, Value};
use std::collections::HashSet;
use std::sync::Arc;

/// A validated bijection between internal symbols and external literals.
#[derive(Debug, Clone, PartialEq)]
pub struct EnumMapping {
    name: String,
    entries: Vec<(String, Value)>,
}

/// Collects members for an [`EnumMapping`].
#[derive(Debug, Clone)]
pub struct EnumMappingBuilder {
    name: String,
    entries: Vec<(String, Value)>,
}

impl EnumMappingBuilder {
    /// Adds a member: `internal` is the symbol name, `external` the wire literal.
    #[must_use]
    pub fn value(mut self, internal: impl Into<String>, external: impl Into<Value>) -> Self {
        self.entries.push((internal.into(), external.into()));
        self
    }

    /// Validates the table and freezes it.
    ///
    /// # Errors
    ///
    /// [`SchemaError::EmptyEnum`] for an empty table and
    /// [`SchemaError::NonBijectiveEnum`] when a symbol or literal repeats, a
    /// symbol is empty, or a literal is not a string or integer.
    pub fn build(self) -> Result<Arc<EnumMapping>, SchemaError> {
        let EnumMappingBuilder { name, entries } = self;
        if entries.is_empty() {
            return Err(SchemaError::EmptyEnum(name));
        }

        let mut internals = HashSet::new();
        let mut externals: Vec<&Value> = Vec::with_capacity(entries.len());
        for (internal, external) in &entries {
            let non_bijective = |detail: String| SchemaError::NonBijectiveEnum {
                name: name.clone(),
                detail,
            };
            if internal.is_empty() {
                return Err(non_bijective("a member has an empty name".to_string()));
            }
            if !internals.insert(internal.as_str()) {
                return Err(non_bijective(format!("member `{}` appears twice", internal)));
            }
            if !matches!(external, Value::String(_) | Value::Number(Number::Integer(_))) {
                return Err(non_bijective(format!(
                    "literal for `{}` must be a string or integer, found {}",
                    internal,
                    external.type_name()
                )));
            }
            if externals.contains(&external) {
                return Err(non_bijective(format!(
                    "literal {} is shared by more than one member",
                    external
                )));
            }
            externals.push(external);
        }

        Ok(Arc::new(EnumMapping { name, entries }))
    }
}

impl EnumMapping {
    #[must_use]
    pub fn builder(name: impl Into<String>) -> EnumMappingBuilder {
        EnumMappingBuilder {
            name: name.into(),
            entries: Vec::new(),
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Symbol for an external literal. Whole floats match integer literals.
    #[must_use]
    pub fn to_internal(&self, external: &Value) -> Option<&str> {
        let external = match external {
            Value::Number(n) => match n.as_i64() {
                Some(i) => Value::Number(Number::Integer(i)),
                None => return None,
            },
            other => other.clone(),
        };
        self.entries
            .iter()
            .find(|(_, literal)| *literal == external)
            .map(|(internal, _)| internal.as_str())
    }

    /// External literal for a symbol name.
    #[must_use]
    pub fn to_external(&self, internal: &str) -> Option<&Value> {
        self.entries
            .iter()
            .find(|(name, _)| name == internal)
            .map(|(_, literal)| literal)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

//! Per-call options for loading and dumping.
//!
//! - [`LoadOptions`]: output shape, required overrides, unknown-key policy
//! - [`DumpOptions`]: required overrides and excluded fields, as for loading
//!
//! Field-addressing options take dotted **internal** paths without array
//! indexes (`detail.phones.country_code`), so one entry covers every element
//! of a list.
//!
//! ## Examples
//!
//! ```rust
//! use serde_param::{LoadOptions, UnknownFields};
//!
//! let options = LoadOptions::new()
//!     .with_struct(true)
//!     .with_unknown(UnknownFields::Error)
//!     .with_field_required("detail.amount", false);
//!
//! assert!(options.struct_output);
//! assert_eq!(options.required_for("detail.amount"), Some(false));
//! ```

use indexmap::{IndexMap, IndexSet};

/// What to do with external keys no field declares.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum UnknownFields {
    /// Drop them silently.
    #[default]
    Ignore,
    /// Report [`FieldError::UnknownField`](crate::FieldError::UnknownField) at their path.
    Error,
    /// Copy them, untouched, into the internal representation.
    Include,
}

/// Options for [`load`](crate::load), [`load_many`](crate::load_many) and
/// [`validate`](crate::validate).
#[derive(Clone, Debug, Default)]
pub struct LoadOptions {
    /// Produce [`Loaded::Typed`](crate::Loaded::Typed) records instead of generic maps.
    pub struct_output: bool,
    /// Overrides every field's required flag.
    pub required: Option<bool>,
    /// Overrides the required flag of individual fields; wins over `required`.
    pub required_fields: IndexMap<String, bool>,
    pub unknown: UnknownFields,
    /// Fields skipped entirely.
    pub exclude: IndexSet<String>,
}

impl LoadOptions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_struct(mut self, struct_output: bool) -> Self {
        self.struct_output = struct_output;
        self
    }

    #[must_use]
    pub fn with_required(mut self, required: bool) -> Self {
        self.required = Some(required);
        self
    }

    #[must_use]
    pub fn with_field_required(mut self, path: impl Into<String>, required: bool) -> Self {
        self.required_fields.insert(path.into(), required);
        self
    }

    #[must_use]
    pub fn with_unknown(mut self, unknown: UnknownFields) -> Self {
        self.unknown = unknown;
        self
    }

    #[must_use]
    pub fn with_exclude(mut self, path: impl Into<String>) -> Self {
        self.exclude.insert(path.into());
        self
    }

    /// The override that applies to the field at `path`, if any.
    #[must_use]
    pub fn required_for(&self, path: &str) -> Option<bool> {
        self.required_fields.get(path).copied().or(self.required)
    }

    #[must_use]
    pub fn is_excluded(&self, path: &str) -> bool {
        self.exclude.contains(path)
    }
}

/// Options for [`dump`](crate::dump) and [`dump_many`](crate::dump_many).
#[derive(Clone, Debug, Default)]
pub struct DumpOptions {
    /// Overrides every field's required flag.
    pub required: Option<bool>,
    /// Overrides the required flag of individual fields; wins over `required`.
    pub required_fields: IndexMap<String, bool>,
    /// Fields left out of the output.
    pub exclude: IndexSet<String>,
}

impl DumpOptions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_required(mut self, required: bool) -> Self {
        self.required = Some(required);
        self
    }

    #[must_use]
    pub fn with_field_required(mut self, path: impl Into<String>, required: bool) -> Self {
        self.required_fields.insert(path.into(), required);
        self
    }

    #[must_use]
    pub fn with_exclude(mut self, path: impl Into<String>) -> Self {
        self.exclude.insert(path.into());
        self
    }

    #[must_use]
    pub fn required_for(&self, path: &str) -> Option<bool> {
        self.required_fields.get(path).copied().or(self.required)
    }

    #[must_use]
    pub fn is_excluded(&self, path: &str) -> bool {
        self.exclude.contains(path)
    }
}

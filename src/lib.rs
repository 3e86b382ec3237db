//! # serde_param
//!
//! Declarative schemas that map external payloads (JSON-like dynamic values)
//! to a typed internal representation and back.
//!
//! ## What does it do?
//!
//! A [`Schema`] names its fields, their types, whether they are required and
//! which external key each one is read from. [`load`] turns an external
//! document into the internal representation, coercing every leaf; [`dump`]
//! does the reverse. Both walk the whole tree and report **every** problem at
//! once in a [`ValidationError`] keyed by field path, so a caller gets
//! `detail.amount: is missing` and `status: unknown enum value "UNKNOWN"` from
//! one call instead of fixing errors one round trip at a time.
//!
//! ## Key Features
//!
//! - **Key renaming**: `currencyCode` on the wire, `currency_code` in code
//! - **Coercion**: decimal strings to [`Decimal`], ISO dates to `chrono` types,
//!   wire literals to enum [symbols](Value::Symbol)
//! - **Nesting**: single and list sub-schemas, referenced directly or by name
//!   through a [`Registry`]
//! - **Aggregated errors**: one [`ValidationError`] per call, never fail-fast
//! - **Serde bridge**: [`load_into`] and [`dump_from`] work with plain
//!   `#[derive(Serialize, Deserialize)]` structs
//!
//! ## Quick Start
//!
//! ```toml
//! [dependencies]
//! serde_param = "0.1"
//! ```
//!
//! ### Loading a payload
//!
//! ```rust
//! use serde_param::{
//!     load, value, Decimal, EnumMapping, Field, FieldType, LoadOptions, Schema, Value,
//! };
//!
//! let status = EnumMapping::builder("status")
//!     .value("new", "NEW")
//!     .value("charged", "CHARGED")
//!     .build()
//!     .unwrap();
//!
//! let payment = Schema::builder("Payment")
//!     .required(true)
//!     .field(Field::new("currency_code", FieldType::String).key("currencyCode"))
//!     .field(Field::new("amount", FieldType::Decimal))
//!     .field(Field::new("status", FieldType::enumeration(&status)))
//!     .build()
//!     .unwrap();
//!
//! let loaded = load(
//!     &payment,
//!     &value!({ "currencyCode": "USD", "amount": "500", "status": "NEW" }),
//!     &LoadOptions::default(),
//! )
//! .unwrap();
//!
//! assert_eq!(loaded.get("amount"), Some(&Value::Decimal(Decimal::from(500))));
//! assert_eq!(loaded.get("status"), Some(&Value::symbol("new")));
//! ```
//!
//! ### Collecting every error
//!
//! ```rust
//! use serde_param::{load, value, Field, FieldError, FieldType, LoadOptions, Schema};
//!
//! let schema = Schema::builder("Payment")
//!     .required(true)
//!     .field(Field::new("currency_code", FieldType::String).key("currencyCode"))
//!     .field(Field::new("amount", FieldType::Decimal))
//!     .build()
//!     .unwrap();
//!
//! let err = load(&schema, &value!({ "amount": "ten" }), &LoadOptions::default()).unwrap_err();
//! assert_eq!(err.paths().collect::<Vec<_>>(), vec!["currencyCode", "amount"]);
//! assert_eq!(err.first("currencyCode"), Some(&FieldError::MissingField));
//! ```
//!
//! ### Plain Rust structs
//!
//! ```rust
//! use serde::{Deserialize, Serialize};
//! use serde_param::{dump_from, load_into, value, DumpOptions, Field, FieldType, LoadOptions, Schema};
//!
//! #[derive(Serialize, Deserialize, Debug, PartialEq)]
//! struct User {
//!     first_name: String,
//! }
//!
//! let schema = Schema::define(
//!     "User",
//!     [Field::new("first_name", FieldType::String).key("firstName")],
//! )
//! .unwrap();
//!
//! let user: User = load_into(&schema, &value!({ "firstName": "Ada" }), &LoadOptions::default()).unwrap();
//! assert_eq!(user, User { first_name: "Ada".into() });
//!
//! let external = dump_from(&schema, &user, &DumpOptions::default()).unwrap();
//! assert_eq!(external, value!({ "firstName": "Ada" }));
//! ```
//!
//! ## Logging
//!
//! The crate emits `tracing` events: `debug` for schema definitions and the
//! outcome of each load or dump, `trace` for every nested document visited.
//! Install any subscriber to see them.
//!
//! ## Examples
//!
//! See the `demos/` directory:
//!
//! - **`payment.rs`** - loading, error aggregation and dumping of a payment
//! - **`registry.rs`** - by-name references and cycle detection
//! - **`typed_records.rs`** - record output and plain structs
//!
//! Run any example with: `cargo run --example <name>`

pub mod coerce;
pub mod de;
pub mod decimal;
pub mod dump;
pub mod enumeration;
pub mod error;
pub mod field;
pub mod load;
pub mod macros;
pub mod map;
pub mod options;
pub mod path;
pub mod schema;
pub mod ser;
pub mod validators;
pub mod value;

pub use coerce::{coerce_in, coerce_out};
pub use de::{from_value, ValueDeserializer};
pub use decimal::{Decimal, ParseDecimalError};
pub use dump::{dump, dump_from, dump_many};
pub use enumeration::{EnumMapping, EnumMappingBuilder};
pub use error::{Error, FieldError, Result, SchemaError, ValidationError};
pub use field::{Field, FieldType, FieldValidator, SchemaRef};
pub use load::{load, load_into, load_many, validate, Loaded};
pub use map::Map;
pub use options::{DumpOptions, LoadOptions, UnknownFields};
pub use path::FieldPath;
pub use schema::{Registry, RegistryBuilder, Schema, SchemaBuilder};
pub use ser::{to_value, ValueSerializer};
pub use value::{Number, Record, Value};

//! Record output and plain Rust structs on both sides of a schema.
//!
//! Run with: cargo run --example typed_records

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_param::{
    dump_from, load, load_into, validators, value, Decimal, DumpOptions, EnumMapping, Field,
    FieldType, LoadOptions, Schema, Value,
};
use std::error::Error;

#[derive(Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "snake_case")]
enum Status {
    New,
    Charged,
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
struct Charge {
    amount: Decimal,
    status: Status,
    created_at: DateTime<Utc>,
    tags: Vec<String>,
}

fn main() -> Result<(), Box<dyn Error>> {
    let status = EnumMapping::builder("status")
        .value("new", 0)
        .value("charged", 1)
        .build()?;
    let charge = Schema::builder("Charge")
        .required(true)
        .field(Field::new("amount", FieldType::Decimal).validate_with(validators::range(Some(0.0), None)))
        .field(Field::new("status", FieldType::enumeration(&status)))
        .field(Field::new("created_at", FieldType::DateTime).key("createdAt"))
        .field(
            Field::new("tags", FieldType::array_of(FieldType::String))
                .optional()
                .default(Vec::<Value>::new()),
        )
        .build()?;

    let external = value!({
        "amount": "42.00",
        "status": 1,
        "createdAt": "2024-05-01T12:00:00+02:00"
    });

    let typed = load(&charge, &external, &LoadOptions::new().with_struct(true))?;
    if let Some(record) = typed.as_record() {
        println!("{} record: {}", record.schema_name(), Value::Record(record.clone()));
    }

    let parsed: Charge = load_into(&charge, &external, &LoadOptions::default())?;
    println!("{parsed:?}");
    assert_eq!(parsed.status, Status::Charged);

    let back = dump_from(&charge, &parsed, &DumpOptions::default())?;
    println!("{}", serde_json::to_string(&back)?);

    Ok(())
}

//! Loading a payment payload, reporting every error at once, and dumping it back.
//!
//! Run with: RUST_LOG=serde_param=debug cargo run --example payment

use serde_param::{
    dump, load, value, DumpOptions, EnumMapping, Field, FieldType, LoadOptions, Schema,
};
use std::error::Error;
use tracing_subscriber::EnvFilter;

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .try_init();
}

fn main() -> Result<(), Box<dyn Error>> {
    init_tracing();

    let status = EnumMapping::builder("status")
        .value("new", "NEW")
        .value("charged", "CHARGED")
        .build()?;
    let user = Schema::builder("User")
        .required(true)
        .field(Field::new("first_name", FieldType::String).key("firstName"))
        .build()?;
    let detail = Schema::builder("Detail")
        .required(true)
        .field(Field::new("currency_code", FieldType::String).key("currencyCode"))
        .field(Field::new("amount", FieldType::Decimal))
        .field(Field::new("status", FieldType::enumeration(&status)))
        .field(Field::new("user", FieldType::one(&user)))
        .build()?;
    let payment = Schema::builder("Payment")
        .required(true)
        .field(Field::new("detail", FieldType::one(&detail)))
        .build()?;

    let external = value!({
        "detail": {
            "currencyCode": "USD",
            "amount": "500",
            "status": "NEW",
            "user": { "firstName": "John" }
        }
    });
    let loaded = load(&payment, &external, &LoadOptions::default())?;
    println!("Loaded:\n{}\n", loaded.clone().into_value());

    let dumped = dump(&payment, &loaded.into_value(), &DumpOptions::default())?;
    println!("Dumped:\n{}\n", serde_json::to_string_pretty(&dumped)?);
    assert_eq!(dumped, external);
    println!("✓ Round-trip successful\n");

    // one call, every problem
    let broken = value!({
        "detail": {
            "currencyCode": 840,
            "status": "UNKNOWN",
            "user": {}
        }
    });
    if let Err(errors) = load(&payment, &broken, &LoadOptions::default()) {
        println!("{errors}\n");
        println!("As JSON: {}", serde_json::to_string(&errors)?);
    }

    Ok(())
}

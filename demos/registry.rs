//! Schemas that refer to each other by name.
//!
//! Run with: RUST_LOG=serde_param=trace cargo run --example registry

use serde_param::{value, Field, FieldType, LoadOptions, Registry, Schema, UnknownFields};
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

    // "Order" is registered before "LineItem" and still resolves.
    let registry = Registry::builder()
        .schema(
            Schema::builder("Order")
                .required(true)
                .field(Field::new("order_id", FieldType::Integer).key("orderId"))
                .field(Field::new("items", FieldType::many_named("LineItem"))),
        )
        .schema(
            Schema::builder("LineItem")
                .required(true)
                .field(Field::new("sku", FieldType::String))
                .field(Field::new("unit_price", FieldType::Decimal).key("unitPrice"))
                .field(Field::new("quantity", FieldType::Integer)),
        )
        .build()?;
    println!("Registered: {:?}", registry.names().collect::<Vec<_>>());

    let order = value!({
        "orderId": "1001",
        "items": [
            { "sku": "WIDGET-1", "unitPrice": "9.99", "quantity": 2 },
            { "sku": "GADGET-7", "unitPrice": "14.5", "quantity": 1 }
        ]
    });
    let loaded = registry.load("Order", &order, &LoadOptions::default())?;
    println!("Loaded: {}", loaded.into_value());

    let strict = LoadOptions::new().with_unknown(UnknownFields::Error);
    let sloppy = value!({
        "orderId": 1002,
        "items": [{ "sku": "WIDGET-1", "unitPrice": "free", "qty": 2 }]
    });
    if let Err(err) = registry.validate("Order", &sloppy, &strict) {
        println!("\n{err}");
    }

    // A schema that contains itself can never be loaded.
    let cyclic = Registry::builder()
        .schema(Schema::builder("Category").field(Field::new("parent", FieldType::one_named("Category"))))
        .build();
    if let Err(err) = cyclic {
        println!("\n{err}");
    }

    Ok(())
}

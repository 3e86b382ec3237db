use serde::{Deserialize, Serialize};
use serde_param::{
    dump, dump_from, load, load_into, load_many, validate, validators, value, Decimal,
    DumpOptions, EnumMapping, Error, Field, FieldError, FieldType, LoadOptions, Loaded, Map,
    Registry, Schema, SchemaError, UnknownFields, Value,
};
use std::sync::Arc;

fn status_mapping() -> Arc<EnumMapping> {
    EnumMapping::builder("status")
        .value("new", "NEW")
        .value("charged", "CHARGED")
        .build()
        .unwrap()
}

fn payment_schema() -> Arc<Schema> {
    let user = Schema::builder("User")
        .required(true)
        .field(Field::new("first_name", FieldType::String).key("firstName"))
        .build()
        .unwrap();
    let detail = Schema::builder("Detail")
        .required(true)
        .field(Field::new("currency_code", FieldType::String).key("currencyCode"))
        .field(Field::new("amount", FieldType::Decimal))
        .field(Field::new("user", FieldType::one(&user)))
        .build()
        .unwrap();
    Schema::builder("Payment")
        .required(true)
        .field(Field::new("detail", FieldType::one(&detail)))
        .build()
        .unwrap()
}

#[test]
fn test_payment_loads_with_renamed_keys_and_decimal() {
    let external = value!({
        "detail": {
            "currencyCode": "USD",
            "amount": "500",
            "user": { "firstName": "John" }
        }
    });

    let loaded = load(&payment_schema(), &external, &LoadOptions::default()).unwrap();

    let mut user = Map::new();
    user.insert("first_name".into(), Value::from("John"));
    let mut detail = Map::new();
    detail.insert("currency_code".into(), Value::from("USD"));
    detail.insert("amount".into(), Value::Decimal(Decimal::from(500)));
    detail.insert("user".into(), Value::Object(user));
    let mut expected = Map::new();
    expected.insert("detail".into(), Value::Object(detail));

    assert_eq!(loaded, Loaded::Generic(expected));
}

#[test]
fn test_missing_amount_is_the_only_error() {
    let external = value!({
        "detail": {
            "currencyCode": "USD",
            "user": { "firstName": "John" }
        }
    });

    let err = load(&payment_schema(), &external, &LoadOptions::default()).unwrap_err();
    assert_eq!(err.len(), 1);
    assert_eq!(err.get("detail.amount"), Some(&[FieldError::MissingField][..]));
}

#[test]
fn test_every_error_is_reported_in_one_call() {
    let external = value!({
        "detail": {
            "currencyCode": 840,
            "amount": "lots",
            "user": {}
        }
    });

    let err = load(&payment_schema(), &external, &LoadOptions::default()).unwrap_err();
    assert_eq!(
        err.paths().collect::<Vec<_>>(),
        vec!["detail.currencyCode", "detail.amount", "detail.user.firstName"]
    );
    assert_eq!(
        err.first("detail.currencyCode"),
        Some(&FieldError::TypeMismatch {
            expected: "string".into(),
            found: "integer".into()
        })
    );
    assert!(matches!(
        err.first("detail.amount"),
        Some(FieldError::InvalidFormat { .. })
    ));

    // validate agrees with load
    let same = validate(&payment_schema(), &external, &LoadOptions::default()).unwrap_err();
    assert_eq!(same, err);
}

#[test]
fn test_status_enum_scenario() {
    let schema = Schema::define(
        "Charge",
        [Field::new("status", FieldType::enumeration(&status_mapping()))],
    )
    .unwrap();

    let loaded = load(&schema, &value!({ "status": "NEW" }), &LoadOptions::default()).unwrap();
    assert_eq!(loaded.get("status"), Some(&Value::symbol("new")));

    let mut internal = Map::new();
    internal.insert("status".into(), Value::symbol("new"));
    let external = dump(&schema, &Value::Object(internal), &DumpOptions::default()).unwrap();
    assert_eq!(external, value!({ "status": "NEW" }));

    let err = load(&schema, &value!({ "status": "UNKNOWN" }), &LoadOptions::default()).unwrap_err();
    assert!(matches!(
        err.first("status"),
        Some(FieldError::UnknownEnumValue(_))
    ));
}

#[test]
fn test_list_errors_carry_indexes() {
    let phone = Schema::builder("Phone")
        .required(true)
        .field(Field::new("country_code", FieldType::Integer).key("countryCode"))
        .field(Field::new("number", FieldType::String))
        .build()
        .unwrap();
    let detail = Schema::define("Detail", [Field::new("phones", FieldType::many(&phone))]).unwrap();

    let external = value!({
        "phones": [
            { "countryCode": 1, "number": "555" },
            { "countryCode": 44, "number": "556" },
            { "countryCode": "x", "number": "557" }
        ]
    });
    let err = load(&detail, &external, &LoadOptions::default()).unwrap_err();
    assert_eq!(err.paths().collect::<Vec<_>>(), vec!["phones[2].countryCode"]);
}

#[test]
fn test_load_then_dump_round_trip() {
    let schema = payment_schema();
    let external = value!({
        "detail": {
            "currencyCode": "EUR",
            "amount": "19.99",
            "user": { "firstName": "Ada" }
        }
    });

    let loaded = load(&schema, &external, &LoadOptions::default()).unwrap();
    let dumped = dump(&schema, &loaded.clone().into_value(), &DumpOptions::default()).unwrap();
    assert_eq!(dumped, external);

    let typed = load(&schema, &external, &LoadOptions::new().with_struct(true)).unwrap();
    let dumped = dump(&schema, &typed.into_value(), &DumpOptions::default()).unwrap();
    assert_eq!(dumped, external);
}

#[test]
fn test_struct_output_nests_records() {
    let loaded = load(
        &payment_schema(),
        &value!({
            "detail": {
                "currencyCode": "USD",
                "amount": "1",
                "user": { "firstName": "John" }
            }
        }),
        &LoadOptions::new().with_struct(true),
    )
    .unwrap();

    let record = loaded.as_record().unwrap();
    assert_eq!(record.schema_name(), "Payment");
    match record.get("detail") {
        Some(Value::Record(detail)) => {
            assert_eq!(detail.schema_name(), "Detail");
            assert!(matches!(detail.get("user"), Some(Value::Record(_))));
        }
        other => panic!("expected a Detail record, got {other:?}"),
    }
}

#[test]
fn test_optional_fields_absent_versus_null() {
    let schema = Schema::define(
        "Profile",
        [
            Field::new("name", FieldType::String).required(),
            Field::new("nickname", FieldType::String),
            Field::new("locale", FieldType::String).default("en"),
        ],
    )
    .unwrap();

    let loaded = load(&schema, &value!({ "name": "Ada" }), &LoadOptions::default()).unwrap();
    assert_eq!(loaded.get("nickname"), None);
    assert_eq!(loaded.get("locale"), Some(&Value::from("en")));

    let loaded = load(
        &schema,
        &value!({ "name": "Ada", "nickname": null }),
        &LoadOptions::default(),
    )
    .unwrap();
    assert_eq!(loaded.get("nickname"), Some(&Value::Null));

    let err = load(&schema, &value!({ "name": null }), &LoadOptions::default()).unwrap_err();
    assert_eq!(err.first("name"), Some(&FieldError::MissingField));
}

#[test]
fn test_unknown_field_policies() {
    let schema = Schema::define("User", [Field::new("name", FieldType::String)]).unwrap();
    let external = value!({ "name": "Ada", "role": "admin" });

    let ignored = load(&schema, &external, &LoadOptions::default()).unwrap();
    assert_eq!(ignored.get("role"), None);

    let err = load(
        &schema,
        &external,
        &LoadOptions::new().with_unknown(UnknownFields::Error),
    )
    .unwrap_err();
    assert_eq!(err.first("role"), Some(&FieldError::UnknownField));

    let included = load(
        &schema,
        &external,
        &LoadOptions::new().with_unknown(UnknownFields::Include),
    )
    .unwrap();
    assert_eq!(included.get("role"), Some(&Value::from("admin")));
}

#[test]
fn test_required_overrides_and_exclude() {
    let schema = payment_schema();
    let external = value!({
        "detail": { "currencyCode": "USD", "user": { "firstName": "John" } }
    });

    let loaded = load(
        &schema,
        &external,
        &LoadOptions::new().with_field_required("detail.amount", false),
    )
    .unwrap();
    assert_eq!(loaded.get("detail").and_then(|d| d.get("amount")), None);

    let loaded = load(
        &schema,
        &external,
        &LoadOptions::new().with_exclude("detail.amount"),
    )
    .unwrap();
    assert!(loaded.get("detail").is_some());

    assert!(load(&schema, &value!({}), &LoadOptions::new().with_required(false)).is_ok());
}

#[test]
fn test_validators_run_after_coercion() {
    let schema = Schema::define(
        "Payment",
        [
            Field::new("amount", FieldType::Decimal)
                .required()
                .validate_with(validators::range(Some(0.01), None)),
            Field::new("currency_code", FieldType::String)
                .key("currencyCode")
                .validate_with(validators::one_of(["USD", "EUR"])),
        ],
    )
    .unwrap();

    let err = load(
        &schema,
        &value!({ "amount": "0", "currencyCode": "GBP" }),
        &LoadOptions::default(),
    )
    .unwrap_err();
    assert_eq!(err.len(), 2);
    assert!(matches!(err.first("amount"), Some(FieldError::Invalid(_))));
    assert!(matches!(err.first("currencyCode"), Some(FieldError::Invalid(_))));

    // a coercion failure is not also reported by the validator
    let err = load(&schema, &value!({ "amount": "abc" }), &LoadOptions::default()).unwrap_err();
    assert_eq!(err.get("amount").map(<[_]>::len), Some(1));
}

#[test]
fn test_load_many_prefixes_indexes() {
    let schema = Schema::builder("User")
        .required(true)
        .field(Field::new("first_name", FieldType::String).key("firstName"))
        .build()
        .unwrap();

    let users = load_many(
        &schema,
        &value!([{ "firstName": "A" }, { "firstName": "B" }]),
        &LoadOptions::default(),
    )
    .unwrap();
    assert_eq!(users.len(), 2);
    assert_eq!(users[1].get("first_name"), Some(&Value::from("B")));

    let err = load_many(
        &schema,
        &value!([{ "firstName": "A" }, {}]),
        &LoadOptions::default(),
    )
    .unwrap_err();
    assert_eq!(err.paths().collect::<Vec<_>>(), vec!["[1].firstName"]);
}

#[test]
fn test_registry_resolves_names() {
    let registry = Registry::builder()
        .schema(
            Schema::builder("Payment")
                .required(true)
                .field(Field::new("user", FieldType::one_named("User"))),
        )
        .schema(
            Schema::builder("User")
                .required(true)
                .field(Field::new("first_name", FieldType::String).key("firstName")),
        )
        .build()
        .unwrap();

    assert_eq!(registry.names().collect::<Vec<_>>(), vec!["Payment", "User"]);
    let loaded = registry
        .load(
            "Payment",
            &value!({ "user": { "firstName": "John" } }),
            &LoadOptions::default(),
        )
        .unwrap();
    assert_eq!(
        loaded.get("user").and_then(|u| u.get("first_name")),
        Some(&Value::from("John"))
    );

    let err = registry
        .validate("Payment", &value!({ "user": {} }), &LoadOptions::default())
        .unwrap_err();
    assert!(err.as_validation().unwrap().first("user.firstName").is_some());

    assert!(matches!(
        registry.load("Refund", &value!({}), &LoadOptions::default()),
        Err(Error::InvalidSchemaDefinition(SchemaError::UnresolvedSchema(_)))
    ));
}

#[test]
fn test_registry_rejects_cycles_and_dangling_names() {
    let err = Registry::builder()
        .schema(Schema::builder("Node").field(Field::new("next", FieldType::one_named("Node"))))
        .build()
        .unwrap_err();
    assert_eq!(
        err,
        SchemaError::CyclicSchemaDefinition {
            cycle: vec!["Node".into(), "Node".into()]
        }
    );

    let err = Registry::builder()
        .schema(Schema::builder("Order").field(Field::new("items", FieldType::many_named("Item"))))
        .build()
        .unwrap_err();
    assert_eq!(err, SchemaError::UnresolvedSchema("Item".into()));
}

#[test]
fn test_enum_must_be_bijective() {
    let err = EnumMapping::builder("status")
        .value("new", "NEW")
        .value("fresh", "NEW")
        .build()
        .unwrap_err();
    assert!(matches!(err, SchemaError::NonBijectiveEnum { .. }));
}

#[derive(Serialize, Deserialize, Debug, PartialEq)]
#[serde(rename_all = "snake_case")]
enum Status {
    New,
    Charged,
}

#[derive(Serialize, Deserialize, Debug, PartialEq)]
struct Charge {
    amount: Decimal,
    status: Status,
    note: Option<String>,
}

#[test]
fn test_serde_structs_on_both_sides() {
    let schema = Schema::define(
        "Charge",
        [
            Field::new("amount", FieldType::Decimal).required(),
            Field::new("status", FieldType::enumeration(&status_mapping())).required(),
            Field::new("note", FieldType::String),
        ],
    )
    .unwrap();

    let charge: Charge = load_into(
        &schema,
        &value!({ "amount": "7.25", "status": "CHARGED" }),
        &LoadOptions::default(),
    )
    .unwrap();
    assert_eq!(
        charge,
        Charge {
            amount: "7.25".parse().unwrap(),
            status: Status::Charged,
            note: None
        }
    );

    // `note: None` serializes as null, which an optional field keeps
    let external = dump_from(&schema, &charge, &DumpOptions::default()).unwrap();
    assert_eq!(
        external,
        value!({ "amount": "7.25", "status": "CHARGED", "note": null })
    );
}

#[test]
fn test_json_wire_format() {
    let schema = payment_schema();
    let external: Value = serde_json::from_str(
        r#"{"detail": {"currencyCode": "USD", "amount": 12.5, "user": {"firstName": "John"}}}"#,
    )
    .unwrap();

    let loaded = load(&schema, &external, &LoadOptions::default()).unwrap();
    let dumped = dump(&schema, &loaded.into_value(), &DumpOptions::default()).unwrap();
    assert_eq!(
        serde_json::to_string(&dumped).unwrap(),
        r#"{"detail":{"currencyCode":"USD","amount":"12.5","user":{"firstName":"John"}}}"#
    );

    let err = load(&schema, &value!({}), &LoadOptions::default()).unwrap_err();
    assert_eq!(
        serde_json::to_string(&err).unwrap(),
        r#"{"detail":["is missing"]}"#
    );
}

use serde_param::{value, Decimal, Map, Number, Value};

#[test]
fn test_value_macro_null() {
    assert_eq!(value!(null), Value::Null);
}

#[test]
fn test_value_macro_booleans() {
    assert_eq!(value!(true), Value::Bool(true));
    assert_eq!(value!(false), Value::Bool(false));
}

#[test]
fn test_value_macro_numbers() {
    assert_eq!(value!(42), Value::Number(Number::Integer(42)));
    assert_eq!(value!(3.5), Value::Number(Number::Float(3.5)));
    assert_eq!(value!(-123), Value::Number(Number::Integer(-123)));
}

#[test]
fn test_value_macro_strings() {
    assert_eq!(value!("USD"), Value::String("USD".to_string()));
    assert_eq!(value!(""), Value::String(String::new()));
}

#[test]
fn test_value_macro_object_keeps_key_order() {
    let v = value!({
        "currencyCode": "USD",
        "amount": "500",
        "user": { "firstName": "John" },
    });

    let keys: Vec<_> = v.as_object().unwrap().keys().cloned().collect();
    assert_eq!(keys, vec!["currencyCode", "amount", "user"]);
    assert_eq!(
        v.get("user").and_then(|u| u.get("firstName")),
        Some(&Value::from("John"))
    );
}

#[test]
fn test_value_macro_arrays() {
    assert_eq!(value!([]), Value::Array(vec![]));
    assert_eq!(
        value!([1, "two", null, [true]]),
        Value::Array(vec![
            Value::from(1),
            Value::from("two"),
            Value::Null,
            Value::Array(vec![Value::Bool(true)]),
        ])
    );
}

#[test]
fn test_value_macro_internal_leaves() {
    let amount: Decimal = "19.99".parse().unwrap();
    let v = value!({
        "amount": (amount.clone()),
        "status": (Value::symbol("charged")),
        "meta": {}
    });

    assert_eq!(v.get("amount"), Some(&Value::Decimal(amount)));
    assert_eq!(v.get("status"), Some(&Value::symbol("charged")));
    assert_eq!(v.get("meta"), Some(&Value::Object(Map::new())));
}

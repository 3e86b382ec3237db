/// Builds a [`Value`](crate::Value) from JSON-like syntax.
///
/// Object keys must be string literals. Leaves that are not `null`, `true`,
/// `false`, an array or an object are passed to `Value::from`, so any
/// expression with a `From` impl works; wrap multi-token expressions in
/// parentheses.
///
/// ```rust
/// use serde_param::{value, Value};
///
/// let v = value!({
///     "amount": "12.50",
///     "tags": ["a", "b"],
///     "status": (Value::symbol("new")),
///     "offset": (-3),
/// });
/// assert_eq!(v.get("offset"), Some(&Value::from(-3)));
/// ```
#[macro_export]
macro_rules! value {
    (null) => {
        $crate::Value::Null
    };

    (true) => {
        $crate::Value::Bool(true)
    };

    (false) => {
        $crate::Value::Bool(false)
    };

    ([]) => {
        $crate::Value::Array(vec![])
    };

    ([ $($elem:tt),* $(,)? ]) => {
        $crate::Value::Array(vec![$($crate::value!($elem)),*])
    };

    ({}) => {
        $crate::Value::Object($crate::Map::new())
    };

    ({ $($key:literal : $value:tt),* $(,)? }) => {{
        let mut object = $crate::Map::new();
        $(
            object.insert($key.to_string(), $crate::value!($value));
        )*
        $crate::Value::Object(object)
    }};

    ($s:expr) => {
        $crate::Value::from($s)
    };
}

//! JSON <-> Value conversion utilities

use crate::Value;

/// Convert serde_json::Value to a Value
pub fn json_to_value(v: serde_json::Value) -> Value {
    match v {
        serde_json::Value::Null => Value::Null,
        serde_json::Value::Bool(b) => Value::Boolean(b),
        serde_json::Value::Number(n) => match n.as_i64() {
            Some(i) => Value::Integer(i),
            None => n.as_f64().map(Value::Float).unwrap_or(Value::Null),
        },
        serde_json::Value::String(s) => Value::String(s),
        serde_json::Value::Array(arr) => Value::list(arr.into_iter().map(json_to_value)),
        serde_json::Value::Object(obj) => {
            Value::object(obj.into_iter().map(|(k, v)| (k, json_to_value(v))))
        }
    }
}

/// Convert a Value to serde_json::Value. Callables have no JSON form and
/// become null.
pub fn value_to_json(v: &Value) -> serde_json::Value {
    match v {
        Value::Null | Value::Callable(_) => serde_json::Value::Null,
        Value::Boolean(b) => serde_json::Value::Bool(*b),
        Value::Integer(i) => serde_json::Value::Number((*i).into()),
        Value::Float(f) => serde_json::Number::from_f64(*f)
            .map(serde_json::Value::Number)
            .unwrap_or(serde_json::Value::Null),
        Value::String(s) => serde_json::Value::String(s.clone()),
        Value::List(list) => {
            serde_json::Value::Array(list.borrow().iter().map(value_to_json).collect())
        }
        Value::Map(map) => serde_json::Value::Object(
            map.borrow()
                .iter()
                .map(|(k, v)| (k.clone(), value_to_json(v)))
                .collect(),
        ),
    }
}

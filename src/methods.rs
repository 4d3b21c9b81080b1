//! Intrinsic keys on lists, maps and strings.
//!
//! When a key lookup misses, the resolver asks this table before giving
//! up. `length` answers directly with a number; every other name answers
//! with a callable that acts on its receiver when a call container
//! invokes it (`items.sort()`, `name.upper()`).

use std::cmp::Ordering;

use crate::{
    error::{PathError, Result},
    value::{Callable, Value},
};

/// Resolve an intrinsic key on `target`
pub fn lookup(target: &Value, name: &str) -> Option<Value> {
    if name == "length" {
        return length(target);
    }
    let applies = match target {
        Value::List(_) => matches!(
            name,
            "sort" | "reverse" | "keys" | "values" | "first" | "last" | "join"
        ),
        Value::Map(_) => matches!(name, "keys" | "values"),
        Value::String(_) => matches!(name, "upper" | "lower" | "trim" | "reverse"),
        _ => false,
    };
    if !applies {
        return None;
    }
    let method: fn(&Value, &[Value]) -> Result<Value> = match name {
        "sort" => method_sort,
        "reverse" => method_reverse,
        "keys" => method_keys,
        "values" => method_values,
        "first" => method_first,
        "last" => method_last,
        "join" => method_join,
        "upper" => method_upper,
        "lower" => method_lower,
        _ => method_trim,
    };
    Some(Value::Callable(Callable::new(name, method)))
}

fn length(target: &Value) -> Option<Value> {
    let len = match target {
        Value::List(list) => list.borrow().len(),
        Value::Map(map) => map.borrow().len(),
        Value::String(s) => s.chars().count(),
        _ => return None,
    };
    Some(Value::Integer(len as i64))
}

fn requires(method: &str, kind: &str, got: &Value) -> PathError {
    PathError::resolution(format!(
        ".{}() requires {}, got {}",
        method,
        kind,
        got.type_name()
    ))
}

/// .sort() - sorts the list in place and returns it
fn method_sort(receiver: &Value, _args: &[Value]) -> Result<Value> {
    match receiver {
        Value::List(list) => {
            list.borrow_mut().sort_by(compare_values);
            Ok(receiver.clone())
        }
        other => Err(requires("sort", "list", other)),
    }
}

/// .reverse() - reverses a list in place, or returns a reversed string
fn method_reverse(receiver: &Value, _args: &[Value]) -> Result<Value> {
    match receiver {
        Value::List(list) => {
            list.borrow_mut().reverse();
            Ok(receiver.clone())
        }
        Value::String(s) => Ok(Value::String(s.chars().rev().collect())),
        other => Err(requires("reverse", "list or string", other)),
    }
}

/// .keys() - map keys, or list indices
fn method_keys(receiver: &Value, _args: &[Value]) -> Result<Value> {
    if !receiver.is_container() {
        return Err(requires("keys", "map or list", receiver));
    }
    Ok(Value::list(receiver.own_keys().into_iter().map(Value::String)))
}

/// .values() - a new list of the receiver's values
fn method_values(receiver: &Value, _args: &[Value]) -> Result<Value> {
    match receiver {
        Value::Map(map) => Ok(Value::list(map.borrow().values().cloned())),
        Value::List(list) => Ok(Value::list(list.borrow().iter().cloned())),
        other => Err(requires("values", "map or list", other)),
    }
}

fn method_first(receiver: &Value, _args: &[Value]) -> Result<Value> {
    match receiver {
        Value::List(list) => Ok(list.borrow().first().cloned().unwrap_or(Value::Null)),
        other => Err(requires("first", "list", other)),
    }
}

fn method_last(receiver: &Value, _args: &[Value]) -> Result<Value> {
    match receiver {
        Value::List(list) => Ok(list.borrow().last().cloned().unwrap_or(Value::Null)),
        other => Err(requires("last", "list", other)),
    }
}

/// .join(separator?) - joins scalar items, "," by default
fn method_join(receiver: &Value, args: &[Value]) -> Result<Value> {
    let Value::List(list) = receiver else {
        return Err(requires("join", "list", receiver));
    };
    let separator = match args.first() {
        Some(sep) => sep.to_key()?,
        None => ",".to_string(),
    };
    let parts = list
        .borrow()
        .iter()
        .map(Value::to_key)
        .collect::<Result<Vec<_>>>()?;
    Ok(Value::String(parts.join(&separator)))
}

fn method_upper(receiver: &Value, _args: &[Value]) -> Result<Value> {
    match receiver {
        Value::String(s) => Ok(Value::String(s.to_uppercase())),
        other => Err(requires("upper", "string", other)),
    }
}

fn method_lower(receiver: &Value, _args: &[Value]) -> Result<Value> {
    match receiver {
        Value::String(s) => Ok(Value::String(s.to_lowercase())),
        other => Err(requires("lower", "string", other)),
    }
}

fn method_trim(receiver: &Value, _args: &[Value]) -> Result<Value> {
    match receiver {
        Value::String(s) => Ok(Value::String(s.trim().to_string())),
        other => Err(requires("trim", "string", other)),
    }
}

/// Compare two values for sorting
fn compare_values(a: &Value, b: &Value) -> Ordering {
    match (a, b) {
        (Value::Integer(a), Value::Integer(b)) => a.cmp(b),
        (Value::Float(a), Value::Float(b)) => a.partial_cmp(b).unwrap_or(Ordering::Equal),
        (Value::Integer(a), Value::Float(b)) => {
            (*a as f64).partial_cmp(b).unwrap_or(Ordering::Equal)
        }
        (Value::Float(a), Value::Integer(b)) => {
            a.partial_cmp(&(*b as f64)).unwrap_or(Ordering::Equal)
        }
        (Value::String(a), Value::String(b)) => a.cmp(b),
        (Value::Boolean(a), Value::Boolean(b)) => a.cmp(b),
        _ => Ordering::Equal,
    }
}

use std::{cell::RefCell, fmt, rc::Rc};

use indexmap::IndexMap;

use crate::error::{PathError, Result};

/// Ordered key/value storage behind [`Value::Map`].
pub type Fields = IndexMap<String, Value>;

type NativeFn = dyn Fn(&Value, &[Value]) -> Result<Value>;

/// A value node in a data graph navigated by paths.
///
/// Lists and maps are shared handles: cloning a `Value::Map` clones the
/// handle, not the entries, so a write made through any clone is visible
/// from the root the value was reached from. This is what lets `set`
/// mutate a graph in place while the resolver keeps a history of the
/// contexts it visited.
///
/// # Examples
///
/// ```
/// use tkpath::Value;
///
/// let doc = Value::object([("name", Value::from("Ada")), ("age", Value::from(36))]);
/// let alias = doc.clone();
/// alias.set_key("age", Value::from(37)).unwrap();
///
/// assert_eq!(doc.get_key("age"), Some(Value::Integer(37)));
/// ```
///
/// Graphs containing reference cycles are allowed but `Debug` and `==`
/// recurse through them.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Null / absent-but-present value
    Null,

    /// Boolean (true/false)
    Boolean(bool),

    /// Floating-point number
    Float(f64),

    /// Integer number (kept apart from floats)
    Integer(i64),

    /// UTF-8 string
    String(String),

    /// Ordered list, keyed by decimal index
    List(Rc<RefCell<Vec<Value>>>),

    /// Insertion-ordered map with string keys
    Map(Rc<RefCell<Fields>>),

    /// Native function invoked by a call container
    Callable(Callable),
}

/// A native function stored in a data graph.
///
/// The first argument is the receiver: the value one step before the
/// callable on the path (`a.b.f()` calls `f` with `a.b` as receiver).
#[derive(Clone)]
pub struct Callable {
    name: Rc<str>,
    func: Rc<NativeFn>,
}

impl Callable {
    pub fn new<F>(name: impl Into<String>, func: F) -> Self
    where
        F: Fn(&Value, &[Value]) -> Result<Value> + 'static,
    {
        let name: String = name.into();
        Callable {
            name: Rc::from(name),
            func: Rc::new(func),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn call(&self, receiver: &Value, args: &[Value]) -> Result<Value> {
        (self.func)(receiver, args)
    }
}

impl fmt::Debug for Callable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<fn {}>", self.name)
    }
}

impl PartialEq for Callable {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.func, &other.func)
    }
}

impl Value {
    /// Build a list value
    pub fn list(items: impl IntoIterator<Item = Value>) -> Self {
        Value::List(Rc::new(RefCell::new(items.into_iter().collect())))
    }

    /// Build a map value, keeping the given key order
    pub fn object<K: Into<String>>(entries: impl IntoIterator<Item = (K, Value)>) -> Self {
        Value::Map(Rc::new(RefCell::new(
            entries.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        )))
    }

    /// Build an empty map value
    pub fn empty_map() -> Self {
        Value::Map(Rc::new(RefCell::new(Fields::new())))
    }

    /// Wrap a closure as a callable value
    pub fn callable<F>(name: impl Into<String>, func: F) -> Self
    where
        F: Fn(&Value, &[Value]) -> Result<Value> + 'static,
    {
        Value::Callable(Callable::new(name, func))
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Boolean(_) => "boolean",
            Value::Integer(_) => "integer",
            Value::Float(_) => "float",
            Value::String(_) => "string",
            Value::List(_) => "list",
            Value::Map(_) => "map",
            Value::Callable(_) => "callable",
        }
    }

    pub fn is_callable(&self) -> bool {
        matches!(self, Value::Callable(_))
    }

    /// Lists and maps can have keys enumerated and assigned
    pub fn is_container(&self) -> bool {
        matches!(self, Value::List(_) | Value::Map(_))
    }

    /// Own keys in iteration order: map keys, or list indices as strings
    pub fn own_keys(&self) -> Vec<String> {
        match self {
            Value::Map(map) => map.borrow().keys().cloned().collect(),
            Value::List(list) => (0..list.borrow().len()).map(|i| i.to_string()).collect(),
            _ => Vec::new(),
        }
    }

    /// Look up an own key. Lists accept decimal indices only.
    pub fn get_key(&self, key: &str) -> Option<Value> {
        match self {
            Value::Map(map) => map.borrow().get(key).cloned(),
            Value::List(list) => {
                let index = parse_index(key)?;
                list.borrow().get(index).cloned()
            }
            _ => None,
        }
    }

    pub fn has_key(&self, key: &str) -> bool {
        match self {
            Value::Map(map) => map.borrow().contains_key(key),
            Value::List(list) => parse_index(key).is_some_and(|i| i < list.borrow().len()),
            _ => false,
        }
    }

    /// Assign an own key.
    ///
    /// Lists accept an existing index or the index one past the end
    /// (append). Anything else is rejected, as is assignment into a value
    /// that is not a container.
    pub fn set_key(&self, key: &str, value: Value) -> Result<()> {
        match self {
            Value::Map(map) => {
                map.borrow_mut().insert(key.to_string(), value);
                Ok(())
            }
            Value::List(list) => {
                let index = parse_index(key).ok_or_else(|| {
                    PathError::resolution(format!("'{}' is not a valid list index", key))
                })?;
                let mut items = list.borrow_mut();
                if index < items.len() {
                    items[index] = value;
                    Ok(())
                } else if index == items.len() {
                    items.push(value);
                    Ok(())
                } else {
                    Err(PathError::resolution(format!(
                        "index {} is out of range for list of length {}",
                        index,
                        items.len()
                    )))
                }
            }
            other => Err(PathError::resolution(format!(
                "cannot assign key '{}' on {}",
                key,
                other.type_name()
            ))),
        }
    }

    /// Stringify a scalar for use as a lookup key
    pub fn to_key(&self) -> Result<String> {
        match self {
            Value::String(s) => Ok(s.clone()),
            Value::Integer(n) => Ok(n.to_string()),
            Value::Float(n) => Ok(n.to_string()),
            Value::Boolean(b) => Ok(b.to_string()),
            Value::Null => Ok("null".to_string()),
            other => Err(PathError::resolution(format!(
                "a {} cannot be used as a key",
                other.type_name()
            ))),
        }
    }

    /// Identity of a shared container, used for cycle detection
    pub(crate) fn container_id(&self) -> Option<usize> {
        match self {
            Value::Map(map) => Some(Rc::as_ptr(map) as *const () as usize),
            Value::List(list) => Some(Rc::as_ptr(list) as *const () as usize),
            _ => None,
        }
    }
}

fn parse_index(key: &str) -> Option<usize> {
    if key.is_empty() || !key.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    key.parse().ok()
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Boolean(b)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Integer(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Integer(n as i64)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Float(n)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::list(items)
    }
}

use std::fmt::{Display, Formatter};
use crate::active::ActiveSubscriber;
use crate::object::{Object, ObjectKind};

/// A value stored in a property: a primitive, or a (shared) [Object].
#[derive(Debug, Clone, Default)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Number(f64),
    String(String),
    Object(Object)
}

impl Value {
    /// Name of the variant, used in error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "boolean",
            Value::Number(_) => "number",
            Value::String(_) => "string",
            Value::Object(_) => "object"
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(x) => Some(*x),
            _ => None
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Number(x) => Some(*x),
            _ => None
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(x) => Some(x),
            _ => None
        }
    }

    pub fn as_object(&self) -> Option<&Object> {
        match self {
            Value::Object(x) => Some(x),
            _ => None
        }
    }

    /// Copy out the current contents as JSON.
    ///
    /// The reads are untracked, so snapshotting never registers the active subscriber.
    /// Don't call this on a graph with cycles.
    pub fn to_json(&self) -> serde_json::Value {
        ActiveSubscriber::untracked(|| self.to_json_untracked())
    }

    fn to_json_untracked(&self) -> serde_json::Value {
        match self {
            Value::Null => serde_json::Value::Null,
            Value::Bool(x) => serde_json::Value::Bool(*x),
            Value::Number(x) if x.fract() == 0.0 && x.abs() < 1e15 => serde_json::Value::from(*x as i64),
            // Not representable in JSON (NaN, infinities) becomes null
            Value::Number(x) => serde_json::Number::from_f64(*x)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
            Value::String(x) => serde_json::Value::String(x.clone()),
            Value::Object(object) => {
                let entries = object.keys()
                    .into_iter()
                    .filter_map(|key| object.get(&key).map(|value| (key, value.to_json_untracked())));
                match object.kind() {
                    ObjectKind::Map => serde_json::Value::Object(entries.collect()),
                    ObjectKind::List => serde_json::Value::Array(entries.map(|(_, value)| value).collect())
                }
            }
        }
    }
}

/// Strict equality: primitives by value (so `NaN != NaN`), objects by identity.
///
/// Two objects with the same contents are still different values.
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Number(a), Value::Number(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Object(a), Value::Object(b)) => a.ptr_eq(b),
            _ => false
        }
    }
}

/// Renders the way a bound text node shows the value.
///
/// Numbers print like JavaScript's `String(x)`: integers without a fraction,
/// and exponent form (`1e+21`, `1.5e-7`) outside `[1e-6, 1e21)`.
impl Display for Value {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Null => write!(f, "null"),
            Value::Bool(x) => write!(f, "{}", x),
            Value::Number(x) if x.is_finite() && x.fract() == 0.0 && x.abs() < 1e15 => write!(f, "{}", *x as i64),
            Value::Number(x) if x.is_nan() => write!(f, "NaN"),
            Value::Number(x) if x.is_infinite() => write!(f, "{}Infinity", if *x < 0.0 { "-" } else { "" }),
            Value::Number(x) if x.abs() >= 1e21 || x.abs() < 1e-6 => write_exponent(f, *x),
            Value::Number(x) => write!(f, "{}", x),
            Value::String(x) => write!(f, "{}", x),
            Value::Object(_) => write!(f, "[object Object]")
        }
    }
}

fn write_exponent(f: &mut Formatter<'_>, x: f64) -> std::fmt::Result {
    let formatted = format!("{:e}", x);
    match formatted.split_once('e') {
        Some((mantissa, exponent)) if !exponent.starts_with('-') => write!(f, "{}e+{}", mantissa, exponent),
        _ => write!(f, "{}", formatted)
    }
}

impl From<()> for Value {
    fn from((): ()) -> Self {
        Value::Null
    }
}

impl From<bool> for Value {
    fn from(x: bool) -> Self {
        Value::Bool(x)
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Value::Number(x)
    }
}

impl From<i32> for Value {
    fn from(x: i32) -> Self {
        Value::Number(x.into())
    }
}

impl From<u32> for Value {
    fn from(x: u32) -> Self {
        Value::Number(x.into())
    }
}

impl From<i64> for Value {
    fn from(x: i64) -> Self {
        Value::Number(x as f64)
    }
}

impl From<&str> for Value {
    fn from(x: &str) -> Self {
        Value::String(x.to_owned())
    }
}

impl From<String> for Value {
    fn from(x: String) -> Self {
        Value::String(x)
    }
}

impl From<Object> for Value {
    fn from(x: Object) -> Self {
        Value::Object(x)
    }
}

impl From<&Object> for Value {
    fn from(x: &Object) -> Self {
        Value::Object(x.clone())
    }
}

/// Builds fresh, plain (not yet instrumented) objects.
/// Arrays become [ObjectKind::List] objects keyed `"0"`, `"1"`, ...
impl From<serde_json::Value> for Value {
    fn from(json: serde_json::Value) -> Self {
        match json {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(x) => Value::Bool(x),
            serde_json::Value::Number(x) => Value::Number(x.as_f64().unwrap_or(f64::NAN)),
            serde_json::Value::String(x) => Value::String(x),
            serde_json::Value::Array(elems) => Value::Object(Object::from_list(elems.into_iter().map(Value::from))),
            serde_json::Value::Object(entries) => Value::Object(entries.into_iter()
                .map(|(key, value)| (key, Value::from(value)))
                .collect())
        }
    }
}

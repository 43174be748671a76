//! Structural values accepted by validators.
//!
//! This module provides [`Value`], the dynamic input and output type of every
//! validator. It extends the JSON data model with the variants the validation
//! semantics need: a distinct `Undefined` (absent) value separate from `Null`,
//! big integers, dates, symbols, and keyed `Map`/`Set` collections.
//!
//! # Example
//!
//! ```rust
//! use sluice::Value;
//!
//! let value = Value::from(serde_json::json!({"name": "Alice", "age": 30}));
//! assert_eq!(value.kind_name(), "object");
//! ```

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde_json::Value as JsonValue;
use std::fmt::{self, Display};

/// A dynamically typed structural value.
///
/// All validators consume and produce `Value`s. The variants cover the JSON
/// model plus `Undefined`, `BigInt`, `Date`, `Symbol`, `Map`, and `Set`.
/// `Undefined` marks an absent value (an object field that was never set),
/// while `Null` is an explicitly present null.
#[derive(Debug, Clone)]
pub enum Value {
    /// An absent value, distinct from an explicit null
    Undefined,
    /// An explicit null
    Null,
    /// A boolean
    Bool(bool),
    /// A double-precision float, including NaN and infinities
    Number(f64),
    /// An arbitrary-width integer (up to 128 bits)
    BigInt(i128),
    /// A UTF-8 string
    String(String),
    /// A point in time
    Date(DateTime<Utc>),
    /// A symbol with a description
    Symbol(String),
    /// An ordered sequence of values
    Array(Vec<Value>),
    /// A string-keyed mapping that preserves insertion order
    Object(IndexMap<String, Value>),
    /// A mapping with arbitrary keys, as ordered entry pairs
    Map(Vec<(Value, Value)>),
    /// A collection of distinct values, in insertion order
    Set(Vec<Value>),
}

impl Value {
    /// Returns the name of this value's kind, as used in error messages.
    ///
    /// `Number(f64::NAN)` reports `"nan"` rather than `"number"` so that
    /// type mismatch messages point at the actual problem.
    ///
    /// # Example
    ///
    /// ```rust
    /// use sluice::Value;
    ///
    /// assert_eq!(Value::Null.kind_name(), "null");
    /// assert_eq!(Value::from(42.0).kind_name(), "number");
    /// assert_eq!(Value::Number(f64::NAN).kind_name(), "nan");
    /// ```
    pub fn kind_name(&self) -> &'static str {
        match self {
            Value::Undefined => "undefined",
            Value::Null => "null",
            Value::Bool(_) => "boolean",
            Value::Number(n) if n.is_nan() => "nan",
            Value::Number(_) => "number",
            Value::BigInt(_) => "bigint",
            Value::String(_) => "string",
            Value::Date(_) => "date",
            Value::Symbol(_) => "symbol",
            Value::Array(_) => "array",
            Value::Object(_) => "object",
            Value::Map(_) => "map",
            Value::Set(_) => "set",
        }
    }

    /// Returns true if this value is `Undefined`.
    pub fn is_undefined(&self) -> bool {
        matches!(self, Value::Undefined)
    }

    /// Returns true if this value is `Null`.
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Returns the string slice if this is a `String` value.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the float if this is a `Number` value.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Returns the boolean if this is a `Bool` value.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Returns the elements if this is an `Array` value.
    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Value::Array(items) => Some(items),
            _ => None,
        }
    }

    /// Returns the field map if this is an `Object` value.
    pub fn as_object(&self) -> Option<&IndexMap<String, Value>> {
        match self {
            Value::Object(fields) => Some(fields),
            _ => None,
        }
    }

    /// Looks up a field on an object value.
    ///
    /// Returns `None` for missing fields and for non-object values.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.as_object().and_then(|fields| fields.get(key))
    }

    /// Returns a canonical serialized form of this value.
    ///
    /// Two values produce the same key exactly when a uniqueness check should
    /// treat them as duplicates. Strings are quoted and escaped so that the
    /// string `"1"` and the number `1` never collide, and every composite
    /// variant carries a distinct wrapper. Object keys serialize in insertion
    /// order, so objects with the same fields in a different order produce
    /// different keys.
    pub fn stable_key(&self) -> String {
        match self {
            Value::Undefined => "undefined".to_string(),
            Value::Null => "null".to_string(),
            Value::Bool(b) => b.to_string(),
            Value::Number(n) => number_key(*n),
            Value::BigInt(n) => format!("{}n", n),
            Value::String(s) => JsonValue::String(s.clone()).to_string(),
            Value::Date(d) => format!("Date({})", d.to_rfc3339()),
            Value::Symbol(desc) => format!("Symbol({})", desc),
            Value::Array(items) => {
                let parts: Vec<String> = items.iter().map(Value::stable_key).collect();
                format!("[{}]", parts.join(","))
            }
            Value::Object(fields) => {
                let parts: Vec<String> = fields
                    .iter()
                    .map(|(k, v)| {
                        format!("{}:{}", JsonValue::String(k.clone()), v.stable_key())
                    })
                    .collect();
                format!("{{{}}}", parts.join(","))
            }
            Value::Map(entries) => {
                let parts: Vec<String> = entries
                    .iter()
                    .map(|(k, v)| format!("[{},{}]", k.stable_key(), v.stable_key()))
                    .collect();
                format!("Map{{{}}}", parts.join(","))
            }
            Value::Set(items) => {
                let parts: Vec<String> = items.iter().map(Value::stable_key).collect();
                format!("Set{{{}}}", parts.join(","))
            }
        }
    }

    /// Converts a `serde_json::Value` into a `Value`.
    ///
    /// All JSON numbers become `Number` floats. JSON has no undefined, big
    /// integer, date, symbol, map, or set forms, so those variants never
    /// appear in the result.
    pub fn from_json(json: JsonValue) -> Self {
        match json {
            JsonValue::Null => Value::Null,
            JsonValue::Bool(b) => Value::Bool(b),
            JsonValue::Number(n) => Value::Number(n.as_f64().unwrap_or(f64::NAN)),
            JsonValue::String(s) => Value::String(s),
            JsonValue::Array(items) => {
                Value::Array(items.into_iter().map(Value::from_json).collect())
            }
            JsonValue::Object(fields) => Value::Object(
                fields
                    .into_iter()
                    .map(|(k, v)| (k, Value::from_json(v)))
                    .collect(),
            ),
        }
    }

    /// Converts this value into a `serde_json::Value`.
    ///
    /// Variants without a JSON form use natural images: `Undefined` becomes
    /// null, `Date` becomes its RFC 3339 string, `BigInt` becomes a number
    /// when it fits in 64 bits and a decimal string otherwise, `Symbol`
    /// becomes its description string, `Map` becomes an array of `[key,
    /// value]` pairs, and `Set` becomes an array. Non-finite numbers become
    /// null, as JSON cannot represent them.
    pub fn to_json(&self) -> JsonValue {
        match self {
            Value::Undefined | Value::Null => JsonValue::Null,
            Value::Bool(b) => JsonValue::Bool(*b),
            Value::Number(n) => serde_json::Number::from_f64(*n)
                .map(JsonValue::Number)
                .unwrap_or(JsonValue::Null),
            Value::BigInt(n) => {
                if let Ok(small) = i64::try_from(*n) {
                    JsonValue::Number(small.into())
                } else {
                    JsonValue::String(n.to_string())
                }
            }
            Value::String(s) => JsonValue::String(s.clone()),
            Value::Date(d) => JsonValue::String(d.to_rfc3339()),
            Value::Symbol(desc) => JsonValue::String(desc.clone()),
            Value::Array(items) => JsonValue::Array(items.iter().map(Value::to_json).collect()),
            Value::Object(fields) => JsonValue::Object(
                fields
                    .iter()
                    .map(|(k, v)| (k.clone(), v.to_json()))
                    .collect(),
            ),
            Value::Map(entries) => JsonValue::Array(
                entries
                    .iter()
                    .map(|(k, v)| JsonValue::Array(vec![k.to_json(), v.to_json()]))
                    .collect(),
            ),
            Value::Set(items) => JsonValue::Array(items.iter().map(Value::to_json).collect()),
        }
    }
}

/// Canonical rendering for number keys.
///
/// Zero and negative zero collapse to the same key, and all NaN payloads
/// collapse to `NaN`, matching the equality rules of [`Value`].
fn number_key(n: f64) -> String {
    if n == 0.0 {
        "0".to_string()
    } else if n.is_nan() {
        "NaN".to_string()
    } else {
        format!("{}", n)
    }
}

impl PartialEq for Value {
    /// Structural equality.
    ///
    /// Numbers compare by the same-value-zero rule: `NaN` equals `NaN`, and
    /// `0.0` equals `-0.0`. Objects compare by field lookup regardless of
    /// insertion order. Maps and sets compare entry-wise in order.
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Undefined, Value::Undefined) => true,
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Number(a), Value::Number(b)) => (a.is_nan() && b.is_nan()) || a == b,
            (Value::BigInt(a), Value::BigInt(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Date(a), Value::Date(b)) => a == b,
            (Value::Symbol(a), Value::Symbol(b)) => a == b,
            (Value::Array(a), Value::Array(b)) => a == b,
            (Value::Object(a), Value::Object(b)) => a == b,
            (Value::Map(a), Value::Map(b)) => a == b,
            (Value::Set(a), Value::Set(b)) => a == b,
            _ => false,
        }
    }
}

impl Display for Value {
    /// Renders the value for messages and string coercion.
    ///
    /// Strings render bare (no quotes), numbers drop a trailing `.0`, and
    /// composites render in their canonical serialized form.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Undefined => write!(f, "undefined"),
            Value::Null => write!(f, "null"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Number(n) if n.is_nan() => write!(f, "NaN"),
            Value::Number(n) => write!(f, "{}", n),
            Value::BigInt(n) => write!(f, "{}", n),
            Value::String(s) => write!(f, "{}", s),
            Value::Date(d) => write!(f, "{}", d.to_rfc3339()),
            Value::Symbol(desc) => write!(f, "Symbol({})", desc),
            Value::Array(_) | Value::Object(_) | Value::Map(_) | Value::Set(_) => {
                write!(f, "{}", self.stable_key())
            }
        }
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

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Number(n as f64)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Number(n as f64)
    }
}

impl From<i128> for Value {
    fn from(n: i128) -> Self {
        Value::BigInt(n)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(d: DateTime<Utc>) -> Self {
        Value::Date(d)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::Array(items)
    }
}

impl From<JsonValue> for Value {
    fn from(json: JsonValue) -> Self {
        Value::from_json(json)
    }
}

//! Runtime value representation for the melon interpreter.
//!
//! Values live in the constant pool and on frame operand stacks. They are
//! plain data: cloning a value deep-copies any sequence it holds.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::value_type::ValueType;

/// Runtime value representation.
///
/// Serializes as `{"type": <tag>, "value": <payload>}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "lowercase")]
pub enum Value {
    /// 64-bit float, the only arithmetic operand.
    Number(f64),
    /// UTF-8 text.
    String(String),
    /// Boolean value.
    Boolean(bool),
    /// Variable-length ordered sequence.
    List(Vec<Value>),
    /// Fixed-arity ordered sequence. Distinct from `List` for type checks.
    Tuple(Vec<Value>),
    /// Name of an entry in the builtin registry. Only ever dispatched by CALL.
    #[serde(rename = "builtin")]
    BuiltinRef(String),
}

// Numbers compare by bit pattern so that `Value` can be `Eq`. The interpreter
// never produces NaN (non-finite results fault), so in practice this only
// separates +0.0 from -0.0.
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Number(a), Value::Number(b)) => a.to_bits() == b.to_bits(),
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Boolean(a), Value::Boolean(b)) => a == b,
            (Value::List(a), Value::List(b)) => a == b,
            (Value::Tuple(a), Value::Tuple(b)) => a == b,
            (Value::BuiltinRef(a), Value::BuiltinRef(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for Value {}

impl Value {
    /// A number value.
    pub fn number(n: f64) -> Self {
        Value::Number(n)
    }

    /// A text value.
    pub fn string(s: impl Into<String>) -> Self {
        Value::String(s.into())
    }

    /// A boolean value.
    pub fn boolean(b: bool) -> Self {
        Value::Boolean(b)
    }

    /// A list value.
    pub fn list(items: impl IntoIterator<Item = Value>) -> Self {
        Value::List(items.into_iter().collect())
    }

    /// A tuple value.
    pub fn tuple(items: impl IntoIterator<Item = Value>) -> Self {
        Value::Tuple(items.into_iter().collect())
    }

    /// A reference to the builtin called `name`.
    pub fn builtin(name: impl Into<String>) -> Self {
        Value::BuiltinRef(name.into())
    }

    /// Returns the type tag for this value.
    pub fn value_type(&self) -> ValueType {
        match self {
            Value::Number(_) => ValueType::Number,
            Value::String(_) => ValueType::String,
            Value::Boolean(_) => ValueType::Boolean,
            Value::List(_) => ValueType::List,
            Value::Tuple(_) => ValueType::Tuple,
            Value::BuiltinRef(_) => ValueType::Builtin,
        }
    }

    /// Type name used verbatim in diagnostics.
    pub fn type_name(&self) -> &'static str {
        self.value_type().name()
    }

    /// String coercion.
    ///
    /// Numbers render as decimal text, booleans as `true`/`false`, and
    /// lists and tuples as their coerced elements joined by a single space.
    /// A builtin reference renders as its name.
    pub fn str(&self) -> String {
        match self {
            Value::Number(n) => format_number(*n),
            Value::String(s) => s.clone(),
            Value::Boolean(b) => b.to_string(),
            Value::List(items) | Value::Tuple(items) => join_str(items),
            Value::BuiltinRef(name) => name.clone(),
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    /// False when this value is, or contains, a NaN or infinite number.
    /// Such values have no JSON encoding.
    pub fn is_finite(&self) -> bool {
        match self {
            Value::Number(n) => n.is_finite(),
            Value::List(items) | Value::Tuple(items) => items.iter().all(Value::is_finite),
            _ => true,
        }
    }

    /// Elements of a list or tuple.
    pub fn elements(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) | Value::Tuple(items) => Some(items),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.str())
    }
}

/// Coerce every value to text and join with a single space.
pub fn join_str(values: &[Value]) -> String {
    values.iter().map(Value::str).collect::<Vec<_>>().join(" ")
}

/// Shortest round-trip digits. Magnitudes from 1e21 up and below 1e-6 use
/// exponent notation with an explicit sign, e.g. `1e+21` and `1.5e-7`.
fn format_number(n: f64) -> String {
    if n.is_nan() {
        "NaN".to_string()
    } else if n.is_infinite() {
        if n > 0.0 { "Infinity" } else { "-Infinity" }.to_string()
    } else if n == 0.0 {
        // -0 prints as 0
        "0".to_string()
    } else if n.abs() >= 1e21 || n.abs() < 1e-6 {
        let text = format!("{n:e}");
        match text.split_once('e') {
            Some((mantissa, exp)) if !exp.starts_with('-') => format!("{mantissa}e+{exp}"),
            _ => text,
        }
    } else {
        n.to_string()
    }
}

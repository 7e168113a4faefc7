//! Value type tags.
//!
//! Each runtime [`Value`](crate::Value) variant has exactly one tag. The tag
//! names double as the `type` field of the JSON encoding and appear verbatim
//! in diagnostic messages.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifies the variant of a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueType {
    /// 64-bit float.
    Number,
    /// UTF-8 text.
    String,
    /// true / false.
    Boolean,
    /// Variable-length ordered sequence.
    List,
    /// Fixed-arity ordered sequence.
    Tuple,
    /// Reference to a builtin by name.
    Builtin,
}

/// All value types, in definition order.
pub const ALL_VALUE_TYPES: [ValueType; 6] = [
    ValueType::Number,
    ValueType::String,
    ValueType::Boolean,
    ValueType::List,
    ValueType::Tuple,
    ValueType::Builtin,
];

impl ValueType {
    /// Name used in diagnostics and in the serialized `type` field.
    pub fn name(&self) -> &'static str {
        match self {
            ValueType::Number => "number",
            ValueType::String => "string",
            ValueType::Boolean => "boolean",
            ValueType::List => "list",
            ValueType::Tuple => "tuple",
            ValueType::Builtin => "builtin",
        }
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

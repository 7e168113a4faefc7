//! Validation errors raised by builtin normalizers.
//!
//! These are author-facing: every variant carries the source line of the
//! offending call so it can be reported back against the program text.

use melon_common::ValueType;
use thiserror::Error;

use crate::registry::Arity;

/// A builtin call whose arguments do not satisfy the builtin's contract.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Too few or too many arguments.
    #[error("line {line}: {builtin} expects {expected} arguments, got {found}")]
    ArgumentCount {
        line: u32,
        builtin: &'static str,
        expected: Arity,
        found: usize,
    },

    /// An argument has the wrong type.
    #[error("line {line}: expected {expected}, got {found}. {message}")]
    InvalidType {
        line: u32,
        expected: ValueType,
        found: ValueType,
        message: String,
    },

    /// An argument matches none of several accepted types.
    #[error("line {line}: expected one of {}, got {found}. {message}", join_types(.expected))]
    InvalidTypeMultiple {
        line: u32,
        expected: Vec<ValueType>,
        found: ValueType,
        message: String,
    },

    /// Text with the right type but the wrong shape.
    #[error("line {line}: {message}")]
    InvalidFormat { line: u32, message: String },
}

impl ValidationError {
    /// Source line the error refers to.
    pub fn line(&self) -> u32 {
        match self {
            ValidationError::ArgumentCount { line, .. }
            | ValidationError::InvalidType { line, .. }
            | ValidationError::InvalidTypeMultiple { line, .. }
            | ValidationError::InvalidFormat { line, .. } => *line,
        }
    }
}

fn join_types(types: &[ValueType]) -> String {
    types
        .iter()
        .map(ValueType::name)
        .collect::<Vec<_>>()
        .join(", ")
}

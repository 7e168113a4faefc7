//! Decode errors for melon programs.

use thiserror::Error;

use crate::opcode::Opcode;

/// Errors that occur while decoding a program from its JSON form.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// The text is not valid JSON or does not have the program shape.
    #[error("invalid program: {0}")]
    InvalidJson(String),

    /// `DATA` or `CALL` without a `value`.
    #[error("{0} requires an operand")]
    MissingOperand(Opcode),

    /// An operand on an opcode that takes none.
    #[error("{0} takes no operand")]
    UnexpectedOperand(Opcode),

    /// The line table is present but its length differs from the instruction count.
    #[error("line table has {lines} entries for {instructions} instructions")]
    LineTableMismatch { lines: usize, instructions: usize },
}

impl From<serde_json::Error> for DecodeError {
    fn from(e: serde_json::Error) -> Self {
        DecodeError::InvalidJson(e.to_string())
    }
}

//! Activation records.

use melon_common::Value;
use serde::{Deserialize, Serialize};

/// One activation: an instruction pointer and an operand stack.
///
/// `ip` indexes the program's instruction sequence and never exceeds its
/// length. The stack only changes through instruction execution (or a host
/// result pushed on resume).
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Frame {
    /// Index of the next instruction to execute.
    pub ip: usize,
    /// Operand stack, bottom first.
    pub stack: Vec<Value>,
}

impl Frame {
    /// A fresh frame starting at `ip` with an empty stack.
    pub fn new(ip: usize) -> Self {
        Self {
            ip,
            stack: Vec::new(),
        }
    }
}

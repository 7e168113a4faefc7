//! Opcode definitions for the melon instruction set.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifies the operation to perform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Opcode {
    /// Push constant pool entry `operand` onto the current frame's stack.
    Data,
    /// Pop b, pop a, push a + b.
    Add,
    /// Pop b, pop a, push a - b.
    Sub,
    /// Pop b, pop a, push a * b.
    Mul,
    /// Pop b, pop a, push a / b. Division by zero is a fault.
    Div,
    /// End the current frame. Halts the program when the last frame ends.
    Nop,
    /// Pop `operand` arguments and a builtin reference, then suspend on the
    /// resolved host action.
    Call,
}

/// All opcodes, in definition order. Useful for exhaustive testing.
pub const ALL_OPCODES: [Opcode; 7] = [
    Opcode::Data,
    Opcode::Add,
    Opcode::Sub,
    Opcode::Mul,
    Opcode::Div,
    Opcode::Nop,
    Opcode::Call,
];

impl Opcode {
    /// Returns the mnemonic for this opcode.
    pub fn name(&self) -> &'static str {
        match self {
            Opcode::Data => "DATA",
            Opcode::Add => "ADD",
            Opcode::Sub => "SUB",
            Opcode::Mul => "MUL",
            Opcode::Div => "DIV",
            Opcode::Nop => "NOP",
            Opcode::Call => "CALL",
        }
    }

    /// Whether instructions with this opcode carry an operand.
    pub fn has_operand(&self) -> bool {
        matches!(self, Opcode::Data | Opcode::Call)
    }

    /// Whether this is one of the four binary arithmetic opcodes.
    pub fn is_arithmetic(&self) -> bool {
        matches!(self, Opcode::Add | Opcode::Sub | Opcode::Mul | Opcode::Div)
    }
}

impl fmt::Display for Opcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_data_and_call_take_operands() {
        let with: Vec<_> = ALL_OPCODES.iter().filter(|op| op.has_operand()).collect();
        assert_eq!(with, [&Opcode::Data, &Opcode::Call]);
    }

    #[test]
    fn serde_uses_mnemonic() {
        for op in ALL_OPCODES {
            let json = serde_json::to_string(&op).unwrap();
            assert_eq!(json, format!("\"{}\"", op.name()));
        }
    }
}

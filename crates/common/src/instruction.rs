//! Instruction representation for the melon instruction set.
//!
//! An instruction is an opcode plus an operand. Only `DATA` (constant pool
//! index) and `CALL` (argument count) use the operand; for every other opcode
//! it is zero.
//!
//! The JSON form mirrors the value encoding:
//! ```text
//! {"type": "DATA", "value": 0}
//! {"type": "ADD"}
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::DecodeError;
use crate::opcode::Opcode;

/// A single melon instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "RawInstruction", try_from = "RawInstruction")]
pub struct Instruction {
    /// The operation to perform.
    pub opcode: Opcode,
    /// Operand. Meaning depends on opcode.
    pub operand: u32,
}

impl Instruction {
    /// Create a new instruction.
    pub fn new(opcode: Opcode, operand: u32) -> Self {
        Self { opcode, operand }
    }

    /// `DATA index`
    pub fn data(index: u32) -> Self {
        Self::new(Opcode::Data, index)
    }

    /// `CALL argc`
    pub fn call(argc: u32) -> Self {
        Self::new(Opcode::Call, argc)
    }

    pub fn add() -> Self {
        Self::new(Opcode::Add, 0)
    }

    pub fn sub() -> Self {
        Self::new(Opcode::Sub, 0)
    }

    pub fn mul() -> Self {
        Self::new(Opcode::Mul, 0)
    }

    pub fn div() -> Self {
        Self::new(Opcode::Div, 0)
    }

    pub fn nop() -> Self {
        Self::new(Opcode::Nop, 0)
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.opcode.has_operand() {
            write!(f, "{} {}", self.opcode, self.operand)
        } else {
            write!(f, "{}", self.opcode)
        }
    }
}

/// Wire shape of an instruction.
#[derive(Serialize, Deserialize)]
struct RawInstruction {
    #[serde(rename = "type")]
    opcode: Opcode,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    value: Option<u32>,
}

impl From<Instruction> for RawInstruction {
    fn from(instr: Instruction) -> Self {
        RawInstruction {
            opcode: instr.opcode,
            value: instr.opcode.has_operand().then_some(instr.operand),
        }
    }
}

impl TryFrom<RawInstruction> for Instruction {
    type Error = DecodeError;

    fn try_from(raw: RawInstruction) -> Result<Self, Self::Error> {
        match (raw.opcode.has_operand(), raw.value) {
            (true, Some(operand)) => Ok(Instruction::new(raw.opcode, operand)),
            (true, None) => Err(DecodeError::MissingOperand(raw.opcode)),
            (false, None) => Ok(Instruction::new(raw.opcode, 0)),
            (false, Some(_)) => Err(DecodeError::UnexpectedOperand(raw.opcode)),
        }
    }
}

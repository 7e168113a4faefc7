//! Program representation: instruction sequence plus constant pool.
//!
//! A program is immutable once built and is shared read-only by every
//! interpreter created from it. On disk it is a JSON document:
//!
//! ```text
//! {
//!   "instructions": [{"type": "DATA", "value": 0}, {"type": "NOP"}],
//!   "data": [{"type": "number", "value": 1}],
//!   "lines": [1, 1]
//! }
//! ```
//!
//! `lines` is optional debug information mapping each instruction to the
//! source line it was generated from.

use std::fmt::Write;

use serde::{Deserialize, Serialize};

use crate::error::DecodeError;
use crate::instruction::Instruction;
use crate::value::Value;

/// A melon program.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Program {
    /// The instruction stream.
    pub instructions: Vec<Instruction>,
    /// The constant pool, indexed by `DATA`.
    pub data: Vec<Value>,
    /// Source line per instruction. Empty when no debug info was emitted.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub lines: Vec<u32>,
}

impl Program {
    /// Create a new program without line information.
    pub fn new(instructions: Vec<Instruction>, data: Vec<Value>) -> Self {
        Self {
            instructions,
            data,
            lines: Vec::new(),
        }
    }

    /// Attach a line table. Must have one entry per instruction.
    pub fn with_lines(mut self, lines: Vec<u32>) -> Result<Self, DecodeError> {
        if lines.len() != self.instructions.len() {
            return Err(DecodeError::LineTableMismatch {
                lines: lines.len(),
                instructions: self.instructions.len(),
            });
        }
        self.lines = lines;
        Ok(self)
    }

    /// Source line of the instruction at `ip`, or 0 when unknown.
    pub fn line_of(&self, ip: usize) -> u32 {
        self.lines.get(ip).copied().unwrap_or(0)
    }

    /// Number of instructions in the program.
    pub fn len(&self) -> usize {
        self.instructions.len()
    }

    /// Returns true if the program has no instructions.
    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }

    /// Decode a program from its JSON form.
    pub fn from_json(text: &str) -> Result<Self, DecodeError> {
        let program: Program = serde_json::from_str(text)?;
        if !program.lines.is_empty() && program.lines.len() != program.instructions.len() {
            return Err(DecodeError::LineTableMismatch {
                lines: program.lines.len(),
                instructions: program.instructions.len(),
            });
        }
        Ok(program)
    }

    /// Encode the program as pretty-printed JSON.
    pub fn to_json(&self) -> Result<String, DecodeError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Short content hash identifying this exact program.
    ///
    /// The first 64 bits of a blake3 hash over the instructions and the
    /// constant pool, as 16 hex digits. Line information is not included, so
    /// recompiling with or without debug info keeps the fingerprint.
    pub fn fingerprint(&self) -> String {
        let mut data = Vec::new();
        for instr in &self.instructions {
            data.push(instr.opcode as u8);
            data.extend_from_slice(&instr.operand.to_be_bytes());
        }
        for value in &self.data {
            encode_value(&mut data, value);
        }
        let hash = blake3::hash(&data);
        hash.to_hex().as_str()[..16].to_string()
    }

    /// Human-readable listing: constant pool, then one instruction per line.
    pub fn disassemble(&self) -> String {
        let mut out = String::new();
        // Writing to a String cannot fail.
        let _ = writeln!(out, ".data");
        for (i, value) in self.data.iter().enumerate() {
            let _ = writeln!(out, "  {i:>4}  {:<8} {}", value.type_name(), render(value));
        }
        let _ = writeln!(out, ".code");
        for (i, instr) in self.instructions.iter().enumerate() {
            match self.lines.get(i) {
                Some(line) => {
                    let _ = writeln!(out, "  {i:>4}  {:<12} ; line {line}", instr.to_string());
                }
                None => {
                    let _ = writeln!(out, "  {i:>4}  {instr}");
                }
            }
        }
        out
    }
}

fn encode_value(out: &mut Vec<u8>, value: &Value) {
    match value {
        Value::Number(n) => {
            out.push(0);
            out.extend_from_slice(&n.to_bits().to_be_bytes());
        }
        Value::String(s) | Value::BuiltinRef(s) => {
            out.push(if matches!(value, Value::String(_)) { 1 } else { 5 });
            out.extend_from_slice(&(s.len() as u64).to_be_bytes());
            out.extend_from_slice(s.as_bytes());
        }
        Value::Boolean(b) => {
            out.push(2);
            out.push(u8::from(*b));
        }
        Value::List(items) | Value::Tuple(items) => {
            out.push(if matches!(value, Value::List(_)) { 3 } else { 4 });
            out.extend_from_slice(&(items.len() as u64).to_be_bytes());
            for item in items {
                encode_value(out, item);
            }
        }
    }
}

/// Constant rendering for listings: text is quoted, everything else is coerced.
fn render(value: &Value) -> String {
    match value {
        Value::String(s) => format!("{s:?}"),
        Value::List(items) | Value::Tuple(items) => {
            let inner: Vec<String> = items.iter().map(render).collect();
            format!("[{}]", inner.join(", "))
        }
        other => other.str(),
    }
}

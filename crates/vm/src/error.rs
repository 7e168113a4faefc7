//! Runtime errors for the melon interpreter.
//!
//! Two classes never mix. A [`Fault`] means the program itself is
//! ill-formed, which a correct compiler never produces; it is never a run
//! status and never retried. A [`ValidationError`] comes from a builtin
//! normalizer and is the program author's mistake. [`RuntimeError`] carries
//! either, so `run` has one error type while the attribution stays visible.

use melon_builtins::ValidationError;
use melon_common::{Opcode, ValueType};
use thiserror::Error;

/// Internal-invariant violations. Every variant includes the instruction
/// index (`at`) where it was detected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Fault {
    /// An instruction needed more operands than the stack holds.
    #[error("stack underflow at instruction {at}")]
    StackUnderflow { at: usize },

    /// The operand stack hit the configured depth limit.
    #[error("stack overflow at instruction {at} (limit {limit})")]
    StackOverflow { at: usize, limit: usize },

    /// `DATA k` with `k` outside the constant pool.
    #[error("constant index {index} out of range (pool size {len}) at instruction {at}")]
    DataIndexOutOfRange { at: usize, index: u32, len: usize },

    /// Arithmetic on a non-number.
    #[error("{opcode} expects {expected} operands, found {found} at instruction {at}")]
    TypeMismatch {
        at: usize,
        opcode: Opcode,
        expected: ValueType,
        found: ValueType,
    },

    /// `DIV` with a zero divisor.
    #[error("division by zero at instruction {at}")]
    DivisionByZero { at: usize },

    /// `CALL n` with fewer than `n + 1` values on the stack.
    #[error("CALL {argc} needs its arguments plus a callee but only {available} values are on the stack at instruction {at}")]
    CallUnderflow {
        at: usize,
        argc: usize,
        available: usize,
    },

    /// The callee slot of a `CALL` does not hold a builtin reference.
    #[error("CALL target is a {found}, not a builtin, at instruction {at}")]
    NotCallable { at: usize, found: ValueType },

    /// The callee names no registered builtin.
    #[error("unknown builtin '{name}' at instruction {at}")]
    UnknownBuiltin { at: usize, name: String },

    /// Execution ran past the last instruction without a terminating NOP.
    #[error("unexpected end of program at instruction {at}")]
    UnexpectedEndOfProgram { at: usize },

    /// A frame operation on a halted interpreter.
    #[error("no active frame")]
    NoActiveFrame,
}

/// Errors returned by [`Interpreter::run`](crate::Interpreter::run).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuntimeError {
    /// The program is ill-formed.
    #[error("compiler bug: {0}")]
    Fault(#[from] Fault),

    /// A builtin rejected its arguments.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Arithmetic overflowed to an infinity. Operands can come from host
    /// results, so a well-formed program can reach this.
    #[error("arithmetic overflow at instruction {at}")]
    Overflow { at: usize },

    /// The host resumed with a NaN or infinite number, which no snapshot
    /// could encode.
    #[error("host result holds a non-finite number (frame ip {at})")]
    NonFiniteHostResult { at: usize },
}

impl RuntimeError {
    /// True when the failure is attributed to the compiler rather than the author.
    pub fn is_compiler_bug(&self) -> bool {
        matches!(self, RuntimeError::Fault(_))
    }
}

/// Errors restoring an interpreter from a snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SnapshotError {
    /// The text is not a snapshot document.
    #[error("invalid snapshot: {0}")]
    InvalidJson(String),

    /// The snapshot was taken against a different program.
    #[error("snapshot constant pool ({found} entries) does not match the program ({expected} entries)")]
    PoolMismatch { expected: usize, found: usize },

    /// The snapshot names a different program fingerprint.
    #[error("snapshot belongs to program {found}, not {expected}")]
    ProgramMismatch { expected: String, found: String },

    /// The snapshot has no frames: the program already halted.
    #[error("snapshot is of a halted program")]
    Halted,

    /// A frame's instruction pointer lies past the end of the program.
    #[error("frame {frame} has ip {ip} beyond program length {len}")]
    IpOutOfRange { frame: usize, ip: usize, len: usize },

    /// A NaN or infinite number, which has no JSON encoding.
    #[error("snapshot holds a non-finite number")]
    NonFiniteValue,

    /// A frame's stack exceeds the configured limit.
    #[error("frame {frame} has stack depth {depth} (limit {limit})")]
    StackTooDeep {
        frame: usize,
        depth: usize,
        limit: usize,
    },
}

impl From<serde_json::Error> for SnapshotError {
    fn from(e: serde_json::Error) -> Self {
        SnapshotError::InvalidJson(e.to_string())
    }
}

//! Verification errors for the melon verifier.
//!
//! Every error includes an instruction index (`at`) where one applies.
//! The verifier collects ALL errors, not just the first.

use melon_builtins::ValidationError;
use melon_common::{Opcode, ValueType};
use thiserror::Error;

/// Errors found during static verification.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VerifyError {
    // --- Structural ---
    /// Program has no instructions.
    #[error("program is empty")]
    EmptyProgram,

    /// Program does not end with NOP.
    #[error("program does not end with NOP")]
    MissingTerminator,

    /// Instruction follows the NOP that ends the program.
    #[error("unreachable instruction at {at}")]
    UnreachableInstruction { at: usize },

    /// `DATA k` with `k` outside the constant pool.
    #[error("DATA index {index} out of range (pool size {len}) at instruction {at}")]
    DataIndexOutOfRange { at: usize, index: u32, len: usize },

    // --- Stack ---
    /// Stack underflow detected statically.
    #[error("stack underflow at instruction {at}")]
    StackUnderflow { at: usize },

    /// `CALL n` with fewer than `n + 1` values available.
    #[error("CALL {argc} with stack depth {depth} at instruction {at}")]
    CallUnderflow { at: usize, argc: u32, depth: usize },

    /// Stack grows past the interpreter's default limit.
    #[error("stack depth {depth} exceeds limit at instruction {at}")]
    StackTooDeep { at: usize, depth: usize },

    // --- Types ---
    /// Arithmetic on a value statically known not to be a number.
    #[error("{opcode} on {found} at instruction {at}")]
    TypeMismatch {
        at: usize,
        opcode: Opcode,
        found: ValueType,
    },

    /// Constant divisor of zero.
    #[error("division by constant zero at instruction {at}")]
    DivisionByZero { at: usize },

    /// CALL target statically known not to be a builtin reference.
    #[error("CALL target is a {found} at instruction {at}")]
    NotCallable { at: usize, found: ValueType },

    /// CALL target names no registered builtin.
    #[error("unknown builtin '{name}' at instruction {at}")]
    UnknownBuiltin { at: usize, name: String },

    // --- Builtins ---
    /// A builtin call with constant arguments that its normalizer rejects.
    #[error("invalid builtin call at instruction {at}: {error}")]
    InvalidCall { at: usize, error: ValidationError },

    // --- Limits ---
    /// Program exceeds maximum size.
    #[error("program too large: {size} instructions (max 65536)")]
    ProgramTooLarge { size: usize },

    /// Constant pool exceeds maximum size.
    #[error("constant pool too large: {size} entries (max 65536)")]
    DataPoolTooLarge { size: usize },
}

impl VerifyError {
    /// True for errors the program author should fix, as opposed to
    /// malformed output from the code generator.
    pub fn is_author_error(&self) -> bool {
        matches!(self, VerifyError::InvalidCall { .. })
    }
}

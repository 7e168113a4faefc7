//! Limits checking for melon programs.

use crate::error::VerifyError;
use melon_common::Program;

/// Maximum program size in instructions.
pub const MAX_PROGRAM_SIZE: usize = 65_536;

/// Maximum constant pool size.
pub const MAX_DATA_POOL: usize = 65_536;

/// Maximum static stack depth. Matches the interpreter's default limit.
pub const MAX_STACK_DEPTH: usize = 4096;

/// Run the limits check.
pub fn check_limits(program: &Program) -> Vec<VerifyError> {
    let mut errors = Vec::new();

    if program.len() > MAX_PROGRAM_SIZE {
        errors.push(VerifyError::ProgramTooLarge {
            size: program.len(),
        });
    }
    if program.data.len() > MAX_DATA_POOL {
        errors.push(VerifyError::DataPoolTooLarge {
            size: program.data.len(),
        });
    }

    errors
}

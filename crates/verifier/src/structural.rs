//! Structural validation pass for melon programs.
//!
//! Checks that the program is terminated by a NOP, that nothing follows the
//! terminating NOP, and that every DATA index names a pool entry.

use crate::error::VerifyError;
use melon_common::{Opcode, Program};

/// Run the structural validation pass.
pub fn check_structural(program: &Program) -> Vec<VerifyError> {
    let mut errors = Vec::new();
    let instrs = &program.instructions;

    if instrs.is_empty() {
        errors.push(VerifyError::EmptyProgram);
        return errors;
    }

    match instrs.iter().position(|i| i.opcode == Opcode::Nop) {
        None => errors.push(VerifyError::MissingTerminator),
        Some(end) if end + 1 < instrs.len() => {
            errors.push(VerifyError::UnreachableInstruction { at: end + 1 });
        }
        Some(_) => {}
    }

    for (at, instr) in instrs.iter().enumerate() {
        if instr.opcode == Opcode::Data && instr.operand as usize >= program.data.len() {
            errors.push(VerifyError::DataIndexOutOfRange {
                at,
                index: instr.operand,
                len: program.data.len(),
            });
        }
    }

    errors
}

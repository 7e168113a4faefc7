//! melon verifier: static checks for programs before they run.
//!
//! The verifier checks a `Program` ahead of execution and collects ALL
//! errors rather than stopping at the first. A program that verifies can
//! still fail at runtime, since host results are unknown until resumption,
//! but it will not trip over the code generator's own mistakes.
//!
//! # Usage
//!
//! ```
//! use melon_common::{Instruction, Program, Value};
//! use melon_verifier::verify;
//!
//! let program = Program::new(
//!     vec![Instruction::data(0), Instruction::data(1), Instruction::call(1), Instruction::nop()],
//!     vec![Value::builtin("print"), Value::string("hello")],
//! );
//!
//! assert!(verify(&program).is_ok());
//! ```
//!
//! # Passes
//!
//! 1. **Limits**: program and constant pool size
//! 2. **Structural**: NOP terminator, trailing code, DATA indices
//! 3. **Stack**: underflow, depth, operand types, constant builtin calls

pub mod error;
pub mod limits;
pub mod stack;
pub mod structural;

pub use error::VerifyError;

use melon_common::Program;

/// Verify a program.
///
/// Returns `Ok(())` if the program passes all checks, or
/// `Err(Vec<VerifyError>)` with every error found.
pub fn verify(program: &Program) -> Result<(), Vec<VerifyError>> {
    let mut all_errors = Vec::new();

    all_errors.extend(limits::check_limits(program));

    let structural_errors = structural::check_structural(program);
    let fatal = structural_errors.contains(&VerifyError::EmptyProgram);
    all_errors.extend(structural_errors);

    if !fatal {
        all_errors.extend(stack::check_stack(program));
    }

    if all_errors.is_empty() {
        Ok(())
    } else {
        Err(all_errors)
    }
}

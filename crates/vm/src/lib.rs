//! melon interpreter: runs programs in bounded steps and suspends on host actions.
//!
//! The interpreter is a stack machine with:
//! - A frame stack, each frame holding an instruction pointer and an operand stack
//! - A step-bounded dispatch loop ([`Interpreter::run`])
//! - A suspend/resume protocol: a builtin `CALL` stops execution with a
//!   [`HostAction`]; the host performs it and resumes with the result
//! - A JSON snapshot of the entire state ([`Interpreter::snapshot`],
//!   [`Interpreter::resume`])
//!
//! # Usage
//!
//! ```
//! use melon_common::{Instruction, Program, Value};
//! use melon_vm::{Interpreter, RunStatus};
//!
//! let program = Program::new(
//!     vec![
//!         Instruction::data(0),
//!         Instruction::data(1),
//!         Instruction::call(1),
//!         Instruction::nop(),
//!     ],
//!     vec![Value::builtin("input"), Value::string("Name?")],
//! );
//!
//! let mut vm = Interpreter::new(&program);
//! let status = vm.run(100).unwrap();
//! assert_eq!(status.action().unwrap().name, "is.workflow.actions.prompt");
//!
//! // Later, possibly in another process:
//! let state = vm.snapshot().unwrap();
//! let mut vm = Interpreter::resume(&program, &state, Value::string("Ada")).unwrap();
//! assert_eq!(vm.run(100).unwrap(), RunStatus::Halted);
//! ```

pub mod error;
pub mod execute;
pub mod frame;
pub mod machine;
pub mod snapshot;

pub use error::{Fault, RuntimeError, SnapshotError};
pub use frame::Frame;
pub use machine::{Interpreter, Limits, RunStatus, MAX_STACK_DEPTH};
pub use melon_builtins::HostAction;
pub use snapshot::Snapshot;

use melon_common::Program;

/// Start a fresh interpreter on `program` and run it for at most `steps`
/// instructions.
///
/// # Errors
///
/// Returns [`RuntimeError`] on a fault or a builtin validation failure.
pub fn start(program: &Program, steps: usize) -> Result<(Interpreter<'_>, RunStatus), RuntimeError> {
    let mut vm = Interpreter::new(program);
    let status = vm.run(steps)?;
    Ok((vm, status))
}

//! Interpreter state: the program reference, the frame stack and limits.

use melon_builtins::HostAction;
use melon_common::{Program, Value};
use tracing::debug;

use crate::error::{Fault, RuntimeError};
use crate::frame::Frame;

/// Default maximum operand stack depth per frame.
pub const MAX_STACK_DEPTH: usize = 4096;

/// Resource limits applied while executing. Configuration only; never part
/// of a snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Limits {
    /// Maximum number of values on one frame's operand stack.
    pub max_stack_depth: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_stack_depth: MAX_STACK_DEPTH,
        }
    }
}

/// Outcome of a bounded [`Interpreter::run`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunStatus {
    /// The step budget ran out; more instructions remain.
    Running,
    /// The frame stack is empty. Terminal.
    Halted,
    /// A builtin call resolved to a host action. Execution resumes at the
    /// instruction after the `CALL` once a result is pushed.
    Suspended(HostAction),
}

impl RunStatus {
    /// Lowercase status name, as reported to hosts.
    pub fn name(&self) -> &'static str {
        match self {
            RunStatus::Running => "running",
            RunStatus::Halted => "halted",
            RunStatus::Suspended(_) => "suspended",
        }
    }

    /// The pending host action, if suspended.
    pub fn action(&self) -> Option<&HostAction> {
        match self {
            RunStatus::Suspended(action) => Some(action),
            _ => None,
        }
    }
}

/// The melon interpreter.
///
/// All resumable state lives in `frames`; the program is borrowed read-only
/// and may be shared by any number of interpreters.
#[derive(Debug, Clone)]
pub struct Interpreter<'a> {
    /// The program being executed.
    pub(crate) program: &'a Program,
    /// Frame stack, outermost first.
    pub(crate) frames: Vec<Frame>,
    pub(crate) limits: Limits,
}

impl<'a> Interpreter<'a> {
    /// Create an interpreter with a single entry frame at `ip = 0`.
    ///
    /// The program is not validated; an ill-formed program faults when the
    /// offending instruction executes.
    pub fn new(program: &'a Program) -> Self {
        Self::with_limits(program, Limits::default())
    }

    /// Like [`Interpreter::new`] with explicit limits.
    pub fn with_limits(program: &'a Program, limits: Limits) -> Self {
        Self {
            program,
            frames: vec![Frame::new(0)],
            limits,
        }
    }

    /// Build an interpreter from already-validated frames.
    pub(crate) fn from_frames(program: &'a Program, frames: Vec<Frame>, limits: Limits) -> Self {
        Self {
            program,
            frames,
            limits,
        }
    }

    /// The program this interpreter executes.
    pub fn program(&self) -> &'a Program {
        self.program
    }

    /// The frame stack, outermost first.
    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }

    pub fn limits(&self) -> Limits {
        self.limits
    }

    /// True once the frame stack is empty.
    pub fn is_halted(&self) -> bool {
        self.frames.is_empty()
    }

    /// Push a host result onto the topmost frame's stack.
    ///
    /// This is the in-process half of resuming after a suspension; see
    /// [`Interpreter::resume`] for the snapshot path.
    pub fn push_result(&mut self, value: Value) -> Result<(), RuntimeError> {
        let limit = self.limits.max_stack_depth;
        let frame = self.frames.last_mut().ok_or(Fault::NoActiveFrame)?;
        if !value.is_finite() {
            return Err(RuntimeError::NonFiniteHostResult { at: frame.ip });
        }
        if frame.stack.len() >= limit {
            return Err(Fault::StackOverflow { at: frame.ip, limit }.into());
        }
        debug!(ip = frame.ip, value = %value, "host result pushed");
        frame.stack.push(value);
        Ok(())
    }

    /// The topmost frame.
    pub(crate) fn frame_mut(&mut self) -> Result<&mut Frame, Fault> {
        self.frames.last_mut().ok_or(Fault::NoActiveFrame)
    }
}

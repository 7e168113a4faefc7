//! Dispatch loop and opcode implementations.
//!
//! Every instruction is atomic: operands are inspected in place and the
//! frame is only mutated once the instruction is known to succeed, so a
//! fault leaves the interpreter exactly as it was before the instruction.

use melon_builtins::{Builtin, HostAction};
use melon_common::{Opcode, Value, ValueType};
use tracing::{debug, trace};

use crate::error::{Fault, RuntimeError};
use crate::machine::{Interpreter, RunStatus};

/// Result of a single instruction.
enum Step {
    Continue,
    Halted,
    Suspended(HostAction),
}

impl<'a> Interpreter<'a> {
    /// Execute at most `steps` instructions.
    ///
    /// Stops early when the program halts or a `CALL` suspends on a host
    /// action. A fault or a builtin validation error aborts immediately and
    /// is returned as an error, never as a status.
    pub fn run(&mut self, steps: usize) -> Result<RunStatus, RuntimeError> {
        for executed in 0..steps {
            match self.step()? {
                Step::Continue => {}
                Step::Halted => {
                    debug!(executed = executed + 1, "halted");
                    return Ok(RunStatus::Halted);
                }
                Step::Suspended(action) => {
                    debug!(
                        executed = executed + 1,
                        action = %action.name,
                        args = action.args.len(),
                        "suspended on host action"
                    );
                    return Ok(RunStatus::Suspended(action));
                }
            }
        }

        if self.frames.is_empty() {
            Ok(RunStatus::Halted)
        } else {
            Ok(RunStatus::Running)
        }
    }

    /// Execute one instruction of the topmost frame.
    fn step(&mut self) -> Result<Step, RuntimeError> {
        let Some(frame) = self.frames.last() else {
            return Ok(Step::Halted);
        };
        let at = frame.ip;
        let instr = *self
            .program
            .instructions
            .get(at)
            .ok_or(Fault::UnexpectedEndOfProgram { at })?;

        trace!(ip = at, %instr, depth = frame.stack.len(), "dispatch");

        match instr.opcode {
            Opcode::Data => self.exec_data(at, instr.operand)?,
            Opcode::Add => self.exec_binary_arith(at, Opcode::Add, |a, b| Ok(a + b))?,
            Opcode::Sub => self.exec_binary_arith(at, Opcode::Sub, |a, b| Ok(a - b))?,
            Opcode::Mul => self.exec_binary_arith(at, Opcode::Mul, |a, b| Ok(a * b))?,
            Opcode::Div => self.exec_binary_arith(at, Opcode::Div, |a, b| {
                if b == 0.0 {
                    Err(Fault::DivisionByZero { at })
                } else {
                    Ok(a / b)
                }
            })?,
            Opcode::Nop => return Ok(self.exec_nop(at)?),
            Opcode::Call => return Ok(Step::Suspended(self.exec_call(at, instr.operand)?)),
        }

        Ok(Step::Continue)
    }

    fn exec_data(&mut self, at: usize, index: u32) -> Result<(), Fault> {
        let pool = &self.program.data;
        let value = pool
            .get(index as usize)
            .cloned()
            .ok_or(Fault::DataIndexOutOfRange {
                at,
                index,
                len: pool.len(),
            })?;

        let limit = self.limits.max_stack_depth;
        let frame = self.frame_mut()?;
        if frame.stack.len() >= limit {
            return Err(Fault::StackOverflow { at, limit });
        }
        frame.stack.push(value);
        frame.ip = at + 1;
        Ok(())
    }

    /// Binary arithmetic: `a` was pushed before `b`; push `op(a, b)`.
    fn exec_binary_arith(
        &mut self,
        at: usize,
        opcode: Opcode,
        op: impl Fn(f64, f64) -> Result<f64, Fault>,
    ) -> Result<(), RuntimeError> {
        let frame = self.frame_mut()?;
        let len = frame.stack.len();
        if len < 2 {
            return Err(Fault::StackUnderflow { at }.into());
        }

        let a = number_operand(&frame.stack[len - 2], at, opcode)?;
        let b = number_operand(&frame.stack[len - 1], at, opcode)?;
        let result = op(a, b)?;
        if !result.is_finite() {
            return Err(RuntimeError::Overflow { at });
        }

        frame.stack.truncate(len - 2);
        frame.stack.push(Value::Number(result));
        frame.ip = at + 1;
        Ok(())
    }

    /// End the current frame. When a caller remains, the callee's top value
    /// (if any) becomes the caller's return value.
    fn exec_nop(&mut self, at: usize) -> Result<Step, Fault> {
        if let [.., caller, callee] = self.frames.as_slice() {
            let limit = self.limits.max_stack_depth;
            if !callee.stack.is_empty() && caller.stack.len() >= limit {
                return Err(Fault::StackOverflow { at, limit });
            }
        }

        let Some(mut finished) = self.frames.pop() else {
            return Ok(Step::Halted);
        };
        match self.frames.last_mut() {
            None => Ok(Step::Halted),
            Some(caller) => {
                if let Some(ret) = finished.stack.pop() {
                    caller.stack.push(ret);
                }
                trace!(ip = caller.ip, "returned to caller frame");
                Ok(Step::Continue)
            }
        }
    }

    /// `CALL argc`: stack holds `callee, arg0, .., arg(argc-1)` top-most last.
    fn exec_call(&mut self, at: usize, argc: u32) -> Result<HostAction, RuntimeError> {
        let line = self.program.line_of(at);
        let frame = self.frame_mut()?;
        let argc = argc as usize;
        let available = frame.stack.len();
        if available < argc + 1 {
            return Err(Fault::CallUnderflow {
                at,
                argc,
                available,
            }
            .into());
        }

        let callee_at = available - argc - 1;
        let name = match &frame.stack[callee_at] {
            Value::BuiltinRef(name) => name,
            other => {
                return Err(Fault::NotCallable {
                    at,
                    found: other.value_type(),
                }
                .into())
            }
        };
        let builtin = Builtin::from_name(name).ok_or_else(|| Fault::UnknownBuiltin {
            at,
            name: name.clone(),
        })?;

        // The slice above the callee is already in push order.
        let action = builtin.request(&frame.stack[callee_at + 1..], line)?;

        frame.stack.truncate(callee_at);
        frame.ip = at + 1;
        Ok(action)
    }
}

fn number_operand(value: &Value, at: usize, opcode: Opcode) -> Result<f64, Fault> {
    value.as_number().ok_or(Fault::TypeMismatch {
        at,
        opcode,
        expected: ValueType::Number,
        found: value.value_type(),
    })
}

//! State snapshots.
//!
//! A snapshot is the complete resumable state of an interpreter, encoded as
//! JSON:
//!
//! ```text
//! {"dataPool": [<value>...], "frames": [{"ip": 3, "stack": [<value>...]}]}
//! ```
//!
//! Snapshots taken by this crate also carry `"program"`, the fingerprint of
//! the program they belong to. It is optional on input so that hand-written
//! or older snapshots still restore.
//!
//! Together with the program it was taken from, a snapshot reconstructs
//! execution exactly, in another process or on another machine.

use melon_common::{Program, Value};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::SnapshotError;
use crate::frame::Frame;
use crate::machine::{Interpreter, Limits};

/// Serializable interpreter state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    /// The program's constant pool at the time of the snapshot.
    pub data_pool: Vec<Value>,
    /// Frame stack, outermost first.
    pub frames: Vec<Frame>,
    /// [`Program::fingerprint`] of the originating program.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub program: Option<String>,
}

impl Snapshot {
    /// Encode as JSON text.
    ///
    /// Fails on NaN or infinite numbers rather than writing `null`, which
    /// could never be decoded again.
    pub fn to_json(&self) -> Result<String, SnapshotError> {
        if !self.is_finite() {
            return Err(SnapshotError::NonFiniteValue);
        }
        Ok(serde_json::to_string(self)?)
    }

    fn is_finite(&self) -> bool {
        self.data_pool.iter().all(Value::is_finite)
            && self
                .frames
                .iter()
                .all(|f| f.stack.iter().all(Value::is_finite))
    }

    /// Decode from JSON text.
    pub fn from_json(text: &str) -> Result<Self, SnapshotError> {
        Ok(serde_json::from_str(text)?)
    }
}

impl<'a> Interpreter<'a> {
    /// Capture the current state.
    pub fn state(&self) -> Snapshot {
        Snapshot {
            data_pool: self.program.data.clone(),
            frames: self.frames.clone(),
            program: Some(self.program.fingerprint()),
        }
    }

    /// Capture the current state as JSON text for the host to store.
    pub fn snapshot(&self) -> Result<String, SnapshotError> {
        self.state().to_json()
    }

    /// Rebuild an interpreter from stored state without pushing anything.
    ///
    /// Rejects snapshots taken against a different program or pool, halted
    /// snapshots, and frames whose `ip` or stack depth is out of bounds.
    pub fn restore(program: &'a Program, snapshot: Snapshot, limits: Limits) -> Result<Self, SnapshotError> {
        if snapshot.data_pool != program.data {
            return Err(SnapshotError::PoolMismatch {
                expected: program.data.len(),
                found: snapshot.data_pool.len(),
            });
        }
        if let Some(found) = &snapshot.program {
            let expected = program.fingerprint();
            if *found != expected {
                return Err(SnapshotError::ProgramMismatch {
                    expected,
                    found: found.clone(),
                });
            }
        }
        if snapshot.frames.is_empty() {
            return Err(SnapshotError::Halted);
        }
        if !snapshot.is_finite() {
            return Err(SnapshotError::NonFiniteValue);
        }
        for (i, frame) in snapshot.frames.iter().enumerate() {
            if frame.ip > program.len() {
                return Err(SnapshotError::IpOutOfRange {
                    frame: i,
                    ip: frame.ip,
                    len: program.len(),
                });
            }
            if frame.stack.len() > limits.max_stack_depth {
                return Err(SnapshotError::StackTooDeep {
                    frame: i,
                    depth: frame.stack.len(),
                    limit: limits.max_stack_depth,
                });
            }
        }
        Ok(Interpreter::from_frames(program, snapshot.frames, limits))
    }

    /// Rebuild an interpreter from snapshot text and push the host's
    /// `result` onto the topmost frame.
    ///
    /// For actions without a meaningful result, hosts pass empty text.
    pub fn resume(program: &'a Program, state: &str, result: Value) -> Result<Self, SnapshotError> {
        Self::resume_with_limits(program, state, result, Limits::default())
    }

    /// Like [`Interpreter::resume`] with explicit limits.
    pub fn resume_with_limits(
        program: &'a Program,
        state: &str,
        result: Value,
        limits: Limits,
    ) -> Result<Self, SnapshotError> {
        if !result.is_finite() {
            return Err(SnapshotError::NonFiniteValue);
        }
        let snapshot = Snapshot::from_json(state)?;
        let mut vm = Self::restore(program, snapshot, limits)?;

        let top = vm.frames.len() - 1;
        let frame = &mut vm.frames[top];
        if frame.stack.len() >= limits.max_stack_depth {
            return Err(SnapshotError::StackTooDeep {
                frame: top,
                depth: frame.stack.len() + 1,
                limit: limits.max_stack_depth,
            });
        }
        debug!(ip = frame.ip, frames = top + 1, "resumed from snapshot");
        frame.stack.push(result);
        Ok(vm)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use melon_common::Instruction;

    fn program() -> Program {
        Program::new(
            vec![Instruction::data(0), Instruction::nop()],
            vec![Value::number(7.0)],
        )
    }

    #[test]
    fn json_shape() {
        let program = program();
        let mut vm = Interpreter::new(&program);
        vm.run(1).unwrap();
        let json: serde_json::Value = serde_json::from_str(&vm.snapshot().unwrap()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "dataPool": [{"type": "number", "value": 7.0}],
                "frames": [{"ip": 1, "stack": [{"type": "number", "value": 7.0}]}],
                "program": program.fingerprint()
            })
        );
    }

    #[test]
    fn restore_rejects_foreign_pool() {
        let program = program();
        let snapshot = Snapshot {
            data_pool: vec![],
            frames: vec![Frame::new(0)],
            program: None,
        };
        assert_eq!(
            Interpreter::restore(&program, snapshot, Limits::default()).unwrap_err(),
            SnapshotError::PoolMismatch {
                expected: 1,
                found: 0
            }
        );
    }

    #[test]
    fn restore_rejects_ip_past_end() {
        let program = program();
        let snapshot = Snapshot {
            data_pool: program.data.clone(),
            frames: vec![Frame::new(3)],
            program: None,
        };
        assert_eq!(
            Interpreter::restore(&program, snapshot, Limits::default()).unwrap_err(),
            SnapshotError::IpOutOfRange {
                frame: 0,
                ip: 3,
                len: 2
            }
        );
    }

    #[test]
    fn ip_at_end_is_allowed() {
        let program = program();
        let snapshot = Snapshot {
            data_pool: program.data.clone(),
            frames: vec![Frame::new(2)],
            program: None,
        };
        assert!(Interpreter::restore(&program, snapshot, Limits::default()).is_ok());
    }

    #[test]
    fn restore_rejects_other_program() {
        let program = program();
        let other = Program::new(
            vec![Instruction::data(0), Instruction::data(0), Instruction::nop()],
            vec![Value::number(7.0)],
        );
        let mut vm = Interpreter::new(&other);
        vm.run(1).unwrap();
        assert!(matches!(
            Interpreter::restore(&program, vm.state(), Limits::default()),
            Err(SnapshotError::ProgramMismatch { .. })
        ));
    }

    #[test]
    fn to_json_rejects_non_finite_numbers() {
        let snapshot = Snapshot {
            data_pool: vec![],
            frames: vec![Frame {
                ip: 0,
                stack: vec![Value::list([Value::number(f64::NAN)])],
            }],
            program: None,
        };
        assert_eq!(snapshot.to_json(), Err(SnapshotError::NonFiniteValue));
    }

    #[test]
    fn resume_rejects_halted_snapshot() {
        let program = program();
        let state = r#"{"dataPool":[{"type":"number","value":7}],"frames":[]}"#;
        assert_eq!(
            Interpreter::resume(&program, state, Value::string("")).unwrap_err(),
            SnapshotError::Halted
        );
    }

    #[test]
    fn resume_rejects_garbage() {
        let program = program();
        assert!(matches!(
            Interpreter::resume(&program, "not json", Value::string("")),
            Err(SnapshotError::InvalidJson(_))
        ));
    }

    #[test]
    fn resume_respects_stack_limit() {
        let program = program();
        let state = r#"{"dataPool":[{"type":"number","value":7}],"frames":[{"ip":1,"stack":[{"type":"number","value":7}]}]}"#;
        let limits = Limits { max_stack_depth: 1 };
        assert!(matches!(
            Interpreter::resume_with_limits(&program, state, Value::boolean(true), limits),
            Err(SnapshotError::StackTooDeep { .. })
        ));
    }
}

//! Abstract stack analysis for melon programs.
//!
//! Walks the straight-line code up to the terminating NOP, tracking what is
//! known about each stack slot. Constants loaded by DATA stay constant through
//! arithmetic, so a builtin call whose arguments are all constants can be
//! validated before the program ever runs.

use crate::error::VerifyError;
use crate::limits::MAX_STACK_DEPTH;
use melon_builtins::Builtin;
use melon_common::{Opcode, Program, Value, ValueType};

/// What the analysis knows about one stack slot.
#[derive(Debug, Clone, PartialEq)]
enum Slot {
    /// Exact value, known statically.
    Const(Value),
    /// Only the type is known.
    Typed(ValueType),
    /// A host result. Anything goes.
    Unknown,
}

impl Slot {
    fn value_type(&self) -> Option<ValueType> {
        match self {
            Slot::Const(v) => Some(v.value_type()),
            Slot::Typed(t) => Some(*t),
            Slot::Unknown => None,
        }
    }

    fn as_const(&self) -> Option<&Value> {
        match self {
            Slot::Const(v) => Some(v),
            _ => None,
        }
    }
}

/// Run the stack analysis. Stops at the first error that makes the rest of
/// the stack shape unknowable.
pub fn check_stack(program: &Program) -> Vec<VerifyError> {
    let mut errors = Vec::new();
    let mut stack: Vec<Slot> = Vec::new();

    for (at, instr) in program.instructions.iter().enumerate() {
        match instr.opcode {
            Opcode::Nop => return errors,
            Opcode::Data => {
                let Some(value) = program.data.get(instr.operand as usize) else {
                    // Reported by the structural pass.
                    return errors;
                };
                stack.push(Slot::Const(value.clone()));
            }
            Opcode::Add | Opcode::Sub | Opcode::Mul | Opcode::Div => {
                if stack.len() < 2 {
                    errors.push(VerifyError::StackUnderflow { at });
                    return errors;
                }
                let b = stack.pop().unwrap_or(Slot::Unknown);
                let a = stack.pop().unwrap_or(Slot::Unknown);
                stack.push(fold_arith(at, instr.opcode, &a, &b, &mut errors));
            }
            Opcode::Call => {
                let argc = instr.operand as usize;
                if stack.len() < argc + 1 {
                    errors.push(VerifyError::CallUnderflow {
                        at,
                        argc: instr.operand,
                        depth: stack.len(),
                    });
                    return errors;
                }
                let callee_at = stack.len() - argc - 1;
                check_call(program, at, &stack[callee_at..], &mut errors);
                stack.truncate(callee_at);
                // The host's result is pushed on resume.
                stack.push(Slot::Unknown);
            }
        }

        if stack.len() > MAX_STACK_DEPTH {
            errors.push(VerifyError::StackTooDeep {
                at,
                depth: stack.len(),
            });
            return errors;
        }
    }

    errors
}

fn fold_arith(
    at: usize,
    opcode: Opcode,
    a: &Slot,
    b: &Slot,
    errors: &mut Vec<VerifyError>,
) -> Slot {
    let mut typed_ok = true;
    for slot in [a, b] {
        if let Some(found) = slot.value_type() {
            if found != ValueType::Number {
                errors.push(VerifyError::TypeMismatch { at, opcode, found });
                typed_ok = false;
            }
        }
    }
    if !typed_ok {
        return Slot::Typed(ValueType::Number);
    }

    let divisor_zero = matches!(b.as_const().and_then(Value::as_number), Some(d) if d == 0.0);
    if opcode == Opcode::Div && divisor_zero {
        errors.push(VerifyError::DivisionByZero { at });
        return Slot::Typed(ValueType::Number);
    }

    let (Some(x), Some(y)) = (
        a.as_const().and_then(Value::as_number),
        b.as_const().and_then(Value::as_number),
    ) else {
        return Slot::Typed(ValueType::Number);
    };

    let result = match opcode {
        Opcode::Add => x + y,
        Opcode::Sub => x - y,
        Opcode::Mul => x * y,
        _ => x / y,
    };
    if result.is_finite() {
        Slot::Const(Value::Number(result))
    } else {
        Slot::Typed(ValueType::Number)
    }
}

/// `slots[0]` is the callee, the rest are arguments in push order.
fn check_call(program: &Program, at: usize, slots: &[Slot], errors: &mut Vec<VerifyError>) {
    let name = match &slots[0] {
        Slot::Const(Value::BuiltinRef(name)) => name,
        Slot::Const(other) => {
            errors.push(VerifyError::NotCallable {
                at,
                found: other.value_type(),
            });
            return;
        }
        Slot::Typed(found) => {
            errors.push(VerifyError::NotCallable { at, found: *found });
            return;
        }
        // A host result could be a builtin reference.
        Slot::Unknown => return,
    };

    let Some(builtin) = Builtin::from_name(name) else {
        errors.push(VerifyError::UnknownBuiltin {
            at,
            name: name.clone(),
        });
        return;
    };

    let args: Option<Vec<Value>> = slots[1..].iter().map(|s| s.as_const().cloned()).collect();
    if let Some(args) = args {
        if let Err(error) = builtin.request(&args, program.line_of(at)) {
            errors.push(VerifyError::InvalidCall { at, error });
        }
    }
}

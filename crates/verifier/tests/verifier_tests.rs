use melon_builtins::ValidationError;
use melon_common::{Instruction, Opcode, Program, Value, ValueType};
use melon_verifier::{verify, VerifyError};

fn prog(instructions: Vec<Instruction>, data: Vec<Value>) -> Program {
    Program::new(instructions, data)
}

fn errors_of(program: &Program) -> Vec<VerifyError> {
    verify(program).expect_err("expected verification errors")
}

// ============================================================
// Valid programs
// ============================================================

#[test]
fn single_nop() {
    assert!(verify(&prog(vec![Instruction::nop()], vec![])).is_ok());
}

#[test]
fn arithmetic_expression() {
    let p = prog(
        vec![
            Instruction::data(0),
            Instruction::data(1),
            Instruction::sub(),
            Instruction::nop(),
        ],
        vec![Value::number(56.0), Value::number(-2.0)],
    );
    assert!(verify(&p).is_ok());
}

#[test]
fn print_with_many_arguments() {
    let p = prog(
        vec![
            Instruction::data(0),
            Instruction::data(1),
            Instruction::data(2),
            Instruction::data(3),
            Instruction::call(3),
            Instruction::nop(),
        ],
        vec![
            Value::builtin("print"),
            Value::string("a"),
            Value::number(1.0),
            Value::boolean(true),
        ],
    );
    assert!(verify(&p).is_ok());
}

#[test]
fn chained_calls_through_host_results() {
    // print(input("name?"))
    let p = prog(
        vec![
            Instruction::data(0),
            Instruction::data(1),
            Instruction::data(2),
            Instruction::call(1),
            Instruction::call(1),
            Instruction::nop(),
        ],
        vec![
            Value::builtin("print"),
            Value::builtin("input"),
            Value::string("name?"),
        ],
    );
    assert!(verify(&p).is_ok());
}

#[test]
fn choose_with_constant_list() {
    let p = prog(
        vec![
            Instruction::data(0),
            Instruction::data(1),
            Instruction::call(1),
            Instruction::nop(),
        ],
        vec![
            Value::builtin("choose"),
            Value::list([Value::string("red"), Value::string("blue")]),
        ],
    );
    assert!(verify(&p).is_ok());
}

// ============================================================
// Structural errors
// ============================================================

#[test]
fn empty_program_is_fatal() {
    assert_eq!(
        errors_of(&prog(vec![], vec![])),
        vec![VerifyError::EmptyProgram]
    );
}

#[test]
fn missing_terminator() {
    let errors = errors_of(&prog(vec![Instruction::data(0)], vec![Value::number(1.0)]));
    assert!(errors.contains(&VerifyError::MissingTerminator));
}

#[test]
fn trailing_code() {
    let p = prog(
        vec![Instruction::nop(), Instruction::nop()],
        vec![],
    );
    assert_eq!(
        errors_of(&p),
        vec![VerifyError::UnreachableInstruction { at: 1 }]
    );
}

#[test]
fn data_index_out_of_range() {
    let p = prog(vec![Instruction::data(1), Instruction::nop()], vec![Value::number(1.0)]);
    assert!(errors_of(&p).iter().any(|e| matches!(
        e,
        VerifyError::DataIndexOutOfRange {
            at: 0,
            index: 1,
            len: 1
        }
    )));
}

// ============================================================
// Stack errors
// ============================================================

#[test]
fn arithmetic_underflow() {
    let p = prog(
        vec![Instruction::data(0), Instruction::add(), Instruction::nop()],
        vec![Value::number(1.0)],
    );
    assert_eq!(errors_of(&p), vec![VerifyError::StackUnderflow { at: 1 }]);
}

#[test]
fn call_underflow() {
    let p = prog(
        vec![Instruction::data(0), Instruction::call(2), Instruction::nop()],
        vec![Value::builtin("print")],
    );
    assert_eq!(
        errors_of(&p),
        vec![VerifyError::CallUnderflow {
            at: 1,
            argc: 2,
            depth: 1
        }]
    );
}

#[test]
fn stack_too_deep() {
    let mut instrs = vec![Instruction::data(0); 4097];
    instrs.push(Instruction::nop());
    let errors = errors_of(&prog(instrs, vec![Value::number(1.0)]));
    assert!(errors
        .iter()
        .any(|e| matches!(e, VerifyError::StackTooDeep { at: 4096, .. })));
}

// ============================================================
// Type errors
// ============================================================

#[test]
fn add_string_and_number() {
    let p = prog(
        vec![
            Instruction::data(0),
            Instruction::data(1),
            Instruction::add(),
            Instruction::nop(),
        ],
        vec![Value::string("a"), Value::number(1.0)],
    );
    assert_eq!(
        errors_of(&p),
        vec![VerifyError::TypeMismatch {
            at: 2,
            opcode: Opcode::Add,
            found: ValueType::String
        }]
    );
}

#[test]
fn division_by_constant_zero() {
    let p = prog(
        vec![
            Instruction::data(0),
            Instruction::data(1),
            Instruction::div(),
            Instruction::nop(),
        ],
        vec![Value::number(1.0), Value::number(0.0)],
    );
    assert_eq!(errors_of(&p), vec![VerifyError::DivisionByZero { at: 2 }]);
}

#[test]
fn folded_divisor_of_zero() {
    // 1 / (2 - 2)
    let p = prog(
        vec![
            Instruction::data(0),
            Instruction::data(1),
            Instruction::data(1),
            Instruction::sub(),
            Instruction::div(),
            Instruction::nop(),
        ],
        vec![Value::number(1.0), Value::number(2.0)],
    );
    assert_eq!(errors_of(&p), vec![VerifyError::DivisionByZero { at: 4 }]);
}

#[test]
fn call_on_number() {
    let p = prog(
        vec![Instruction::data(0), Instruction::call(0), Instruction::nop()],
        vec![Value::number(3.0)],
    );
    assert_eq!(
        errors_of(&p),
        vec![VerifyError::NotCallable {
            at: 1,
            found: ValueType::Number
        }]
    );
}

#[test]
fn call_on_arithmetic_result() {
    let p = prog(
        vec![
            Instruction::data(0),
            Instruction::data(0),
            Instruction::add(),
            Instruction::call(0),
            Instruction::nop(),
        ],
        vec![Value::number(3.0)],
    );
    assert!(errors_of(&p)
        .iter()
        .any(|e| matches!(e, VerifyError::NotCallable { at: 3, .. })));
}

#[test]
fn unknown_builtin() {
    let p = prog(
        vec![Instruction::data(0), Instruction::call(0), Instruction::nop()],
        vec![Value::builtin("teleport")],
    );
    assert_eq!(
        errors_of(&p),
        vec![VerifyError::UnknownBuiltin {
            at: 1,
            name: "teleport".into()
        }]
    );
}

// ============================================================
// Builtin calls with constant arguments
// ============================================================

#[test]
fn define_with_two_words_reports_source_line() {
    let p = prog(
        vec![
            Instruction::data(0),
            Instruction::data(1),
            Instruction::call(1),
            Instruction::nop(),
        ],
        vec![Value::builtin("define"), Value::string("two words")],
    )
    .with_lines(vec![7, 7, 7, 7])
    .unwrap();

    let errors = errors_of(&p);
    assert_eq!(errors.len(), 1);
    match &errors[0] {
        VerifyError::InvalidCall { at, error } => {
            assert_eq!(*at, 2);
            assert_eq!(error.line(), 7);
            assert!(matches!(error, ValidationError::InvalidFormat { .. }));
        }
        other => panic!("unexpected error {other:?}"),
    }
    assert!(errors[0].is_author_error());
}

#[test]
fn exit_with_arguments() {
    let p = prog(
        vec![
            Instruction::data(0),
            Instruction::data(1),
            Instruction::call(1),
            Instruction::nop(),
        ],
        vec![Value::builtin("exit"), Value::number(1.0)],
    );
    assert!(matches!(
        errors_of(&p)[0],
        VerifyError::InvalidCall {
            error: ValidationError::ArgumentCount { .. },
            ..
        }
    ));
}

#[test]
fn collects_every_error() {
    let p = prog(
        vec![
            Instruction::data(0),
            Instruction::data(1),
            Instruction::mul(),
            Instruction::data(5),
        ],
        vec![Value::boolean(true), Value::number(1.0)],
    );
    let errors = errors_of(&p);
    assert!(errors.contains(&VerifyError::MissingTerminator));
    assert!(errors.iter().any(|e| matches!(e, VerifyError::DataIndexOutOfRange { at: 3, .. })));
    assert!(errors.iter().any(|e| matches!(e, VerifyError::TypeMismatch { at: 2, .. })));
}

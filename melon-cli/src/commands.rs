//! CLI command implementations.
//!
//! Each command returns `Err(code)` with the process exit code after
//! reporting the problem on stderr.

use std::fs;
use std::io;
use std::path::Path;

use melon_common::{Program, Value};
use melon_vm::{Interpreter, RunStatus};
use serde_json::json;
use tracing::debug;

use crate::host::{ConsoleHost, Host, Reply};

/// Input, decode or snapshot error.
pub const EXIT_INPUT: i32 = 1;
/// Static verification failed.
pub const EXIT_VERIFY: i32 = 2;
/// The program faulted or a builtin rejected its arguments.
pub const EXIT_RUNTIME: i32 = 3;

/// Verify a program file.
pub fn verify(path: &Path) -> Result<(), i32> {
    let program = read_program(path)?;
    check(&program)?;
    println!("OK: {} ({} instructions)", path.display(), program.len());
    Ok(())
}

/// Verify, then run a program to completion on the console.
pub fn run(path: &Path, steps: usize) -> Result<(), i32> {
    let program = read_program(path)?;
    check(&program)?;

    let stdin = io::stdin();
    let mut host = ConsoleHost::new(stdin.lock(), io::stdout());
    drive(&program, steps, &mut host)
}

/// Drive `program` to completion, `steps` instructions at a time, handing
/// every suspension to `host`.
pub fn drive(program: &Program, steps: usize, host: &mut impl Host) -> Result<(), i32> {
    let mut vm = Interpreter::new(program);
    loop {
        let status = vm.run(steps).map_err(|e| {
            eprintln!("runtime error: {e}");
            EXIT_RUNTIME
        })?;
        match status {
            RunStatus::Running => continue,
            RunStatus::Halted => return Ok(()),
            RunStatus::Suspended(action) => {
                let reply = host.perform(&action).map_err(|e| {
                    eprintln!("error: host I/O failed: {e}");
                    EXIT_INPUT
                })?;
                match reply {
                    Reply::Resume(value) => vm.push_result(value).map_err(|e| {
                        eprintln!("runtime error: {e}");
                        EXIT_RUNTIME
                    })?,
                    Reply::Stop => {
                        debug!("stopped by host");
                        return Ok(());
                    }
                }
            }
        }
    }
}

/// One bounded run, from a fresh start or from a saved snapshot.
///
/// Prints `{"status": ..., "action": ..., "state": ...}`. The `state` object
/// is what a later `step --state` expects.
pub fn step(path: &Path, steps: usize, state: Option<&Path>, result: Option<&str>) -> Result<(), i32> {
    let program = read_program(path)?;

    let mut vm = match state {
        Some(state_path) => {
            let text = read_text(state_path)?;
            let value = match result {
                Some(raw) => parse_value(raw)?,
                None => Value::string(""),
            };
            Interpreter::resume(&program, &text, value).map_err(|e| {
                eprintln!("error: {e}");
                EXIT_INPUT
            })?
        }
        None => Interpreter::new(&program),
    };

    let status = vm.run(steps).map_err(|e| {
        eprintln!("runtime error: {e}");
        EXIT_RUNTIME
    })?;

    let report = json!({
        "status": status.name(),
        "action": status.action(),
        "state": vm.state(),
    });
    println!("{report}");
    Ok(())
}

/// Print a program listing.
pub fn disassemble(path: &Path) -> Result<(), i32> {
    let program = read_program(path)?;
    print!("{}", program.disassemble());
    Ok(())
}

/// Print the program fingerprint recorded in snapshots.
pub fn hash(path: &Path) -> Result<(), i32> {
    let program = read_program(path)?;
    println!("{}", program.fingerprint());
    Ok(())
}

fn check(program: &Program) -> Result<(), i32> {
    melon_verifier::verify(program).map_err(|errors| {
        for e in &errors {
            eprintln!("error: {e}");
        }
        EXIT_VERIFY
    })
}

fn read_text(path: &Path) -> Result<String, i32> {
    fs::read_to_string(path).map_err(|e| {
        eprintln!("error: cannot read '{}': {e}", path.display());
        EXIT_INPUT
    })
}

fn read_program(path: &Path) -> Result<Program, i32> {
    let text = read_text(path)?;
    Program::from_json(&text).map_err(|e| {
        eprintln!("error: {}: {e}", path.display());
        EXIT_INPUT
    })
}

fn parse_value(raw: &str) -> Result<Value, i32> {
    serde_json::from_str(raw).map_err(|e| {
        eprintln!("error: --result is not a value: {e}");
        EXIT_INPUT
    })
}

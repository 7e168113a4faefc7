//! melon CLI: verify, run, step through and inspect compiled programs.
//!
//! Exit codes:
//! - 0: Success
//! - 1: Input/decode/snapshot error
//! - 2: Verification failure
//! - 3: Runtime error

mod commands;
mod host;

use std::path::PathBuf;
use std::process;

use clap::builder::RangedU64ValueParser;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "melon")]
#[command(about = "Run and inspect compiled melon programs")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Verify a program and run it on the console
    Run {
        program: PathBuf,
        /// Instructions executed between host checks
        #[arg(long, default_value = "1000", value_parser = RangedU64ValueParser::<usize>::new().range(1..))]
        steps: usize,
    },
    /// Run a bounded number of steps and print the resulting state as JSON
    Step {
        program: PathBuf,
        #[arg(long)]
        steps: usize,
        /// Snapshot to resume from (the "state" object of a previous step)
        #[arg(long)]
        state: Option<PathBuf>,
        /// Host result pushed on resume, as a tagged value; defaults to empty text
        #[arg(long, requires = "state")]
        result: Option<String>,
    },
    /// Run the static checks only
    Verify { program: PathBuf },
    /// Print the constant pool and instruction listing
    Disassemble { program: PathBuf },
    /// Print the program fingerprint
    Hash { program: PathBuf },
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            // Help and version go to stdout and are not failures.
            let code = if e.use_stderr() { commands::EXIT_INPUT } else { 0 };
            let _ = e.print();
            process::exit(code);
        }
    };

    init_logging();

    let result = match &cli.command {
        Command::Run { program, steps } => commands::run(program, *steps),
        Command::Step {
            program,
            steps,
            state,
            result,
        } => commands::step(program, *steps, state.as_deref(), result.as_deref()),
        Command::Verify { program } => commands::verify(program),
        Command::Disassemble { program } => commands::disassemble(program),
        Command::Hash { program } => commands::hash(program),
    };

    if let Err(code) = result {
        process::exit(code);
    }
}

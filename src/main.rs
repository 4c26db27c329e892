//! CLI binary for the todo tracker.
//!
//! This binary is a thin wrapper that parses arguments and delegates to the
//! library.

use clap::Parser;
use std::process::ExitCode;
use todo_tracker::cli::{run, Cli};

fn main() -> ExitCode {
    let cli = Cli::parse();
    let output = run(cli.command);

    for msg in output.stdout {
        println!("{msg}");
    }
    for msg in output.stderr {
        eprintln!("{msg}");
    }

    output.exit_code
}

//! Command-line interface layer.
//!
//! Parses arguments, dispatches to a command and maps the outcome to an
//! [`ExitStatus`]. All terminal output lives here and in [`report`].

use anyhow::Result;
use tracing_subscriber::EnvFilter;

mod args;
mod commands;
mod exit_status;
pub mod report;

pub use args::{Arguments, CheckArgs, CheckCommand, Command, CommonArgs, InitCommand};
pub use exit_status::ExitStatus;

use commands::{check::check, init::init};

pub fn run_cli(args: Arguments) -> Result<ExitStatus> {
    init_logging(args.verbose());

    let Some(Arguments { command }) = args.with_command_or_help() else {
        return Ok(ExitStatus::Success);
    };

    match command {
        Some(Command::Check(cmd)) => check(cmd),
        Some(Command::Init(cmd)) => init(cmd),
        None => Ok(ExitStatus::Success),
    }
}

/// Diagnostics go to stderr so stdout stays clean for `--json`.
///
/// `RUST_LOG` wins over the defaults; `-v` turns on debug output for this crate.
fn init_logging(verbose: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if verbose {
            EnvFilter::new("env_guardian=debug")
        } else {
            EnvFilter::new("warn")
        }
    });

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

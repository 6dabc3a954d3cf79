//! CLI argument definitions using clap.
//!
//! ## Commands
//!
//! - `check`: Compare `process.env` keys used in code against the env file
//! - `init`: Create a `.envguardianrc.json` with default settings

use std::path::PathBuf;

use clap::{Args, CommandFactory, Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
pub struct Arguments {
    #[command(subcommand)]
    pub command: Option<Command>,
}

impl Arguments {
    /// Check if a command was provided, otherwise print help and return None.
    pub fn with_command_or_help(self) -> Option<Self> {
        if self.command.is_none() {
            Self::command().print_help().ok();
            None
        } else {
            Some(self)
        }
    }

    /// Get the verbose flag from the command's common args.
    pub fn verbose(&self) -> bool {
        match &self.command {
            Some(Command::Check(cmd)) => cmd.args.common.verbose,
            Some(Command::Init(cmd)) => cmd.common.verbose,
            None => false,
        }
    }
}

/// Common arguments shared by all commands.
#[derive(Debug, Clone, Args)]
pub struct CommonArgs {
    /// Project root directory
    #[arg(long, default_value = ".")]
    pub root: PathBuf,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

#[derive(Debug, Parser)]
pub struct CheckArgs {
    #[command(flatten)]
    pub common: CommonArgs,

    /// Env file to compare against (overrides config file)
    #[arg(short, long, env = "ENV_GUARDIAN_ENV_FILE")]
    pub env: Option<String>,

    /// Template file updated by --sync (overrides config file)
    #[arg(short, long)]
    pub template: Option<String>,

    /// Source glob to scan, can be repeated (replaces config includes)
    #[arg(short, long = "include")]
    pub includes: Vec<String>,

    /// Append missing keys to the template file without asking
    #[arg(short, long)]
    pub sync: bool,

    /// Print the audit as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Args)]
pub struct CheckCommand {
    #[command(flatten)]
    pub args: CheckArgs,
}

#[derive(Debug, Args)]
pub struct InitCommand {
    #[command(flatten)]
    pub common: CommonArgs,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Check that every process.env key used in code is defined in the env file
    Check(CheckCommand),
    /// Initialize a new .envguardianrc.json configuration file
    Init(InitCommand),
}

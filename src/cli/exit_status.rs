use std::process::ExitCode;

/// Process exit status of the CLI.
///
/// - `Success` (0): every key used in code is defined
/// - `Failure` (1): the audit found missing keys, or `init` found an existing config
/// - `Error` (2): the command could not run (bad config, unreadable env file, etc.)
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ExitStatus {
    Success,
    Failure,
    Error,
}

impl ExitStatus {
    /// Exit status for a finished audit.
    ///
    /// Unused keys and skipped files are warnings and never fail the run.
    pub fn from_missing(has_missing: bool) -> Self {
        if has_missing {
            ExitStatus::Failure
        } else {
            ExitStatus::Success
        }
    }
}

impl From<ExitStatus> for ExitCode {
    fn from(status: ExitStatus) -> Self {
        match status {
            ExitStatus::Success => ExitCode::from(0),
            ExitStatus::Failure => ExitCode::from(1),
            ExitStatus::Error => ExitCode::from(2),
        }
    }
}

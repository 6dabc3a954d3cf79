//! Issue types produced by an env audit.
//!
//! Each issue is self-contained with everything the reporter needs to display it.

use enum_dispatch::enum_dispatch;
use serde::Serialize;

// ============================================================
// Severity and Rule
// ============================================================

/// Severity level of an issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Error,
    Warning,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
        }
    }
}

/// Rule identifier for each issue type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Rule {
    MissingKey,
    UnusedKey,
    ParseError,
}

impl std::fmt::Display for Rule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Rule::MissingKey => write!(f, "missing-key"),
            Rule::UnusedKey => write!(f, "unused-key"),
            Rule::ParseError => write!(f, "parse-error"),
        }
    }
}

// ============================================================
// Issue Types
// ============================================================

/// Key read from `process.env` in code but not defined in the env file.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MissingKeyIssue {
    pub key: String,
    /// Env file the key is missing from.
    pub env_path: String,
    /// Source files referencing the key, sorted.
    pub used_in: Vec<String>,
}

impl MissingKeyIssue {
    pub fn severity() -> Severity {
        Severity::Error
    }

    pub fn rule() -> Rule {
        Rule::MissingKey
    }
}

/// Key defined in the env file but never referenced in code.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UnusedKeyIssue {
    pub env_path: String,
    pub line: usize,
    pub key: String,
}

impl UnusedKeyIssue {
    pub fn severity() -> Severity {
        Severity::Warning
    }

    pub fn rule() -> Rule {
        Rule::UnusedKey
    }
}

/// Source file that could not be read or parsed, and was skipped.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParseErrorIssue {
    pub file_path: String,
    pub error: String,
}

impl ParseErrorIssue {
    pub fn severity() -> Severity {
        Severity::Warning
    }

    pub fn rule() -> Rule {
        Rule::ParseError
    }
}

// ============================================================
// Issue Enum
// ============================================================

/// A problem found during an audit.
#[enum_dispatch(Report)]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Issue {
    MissingKey(MissingKeyIssue),
    UnusedKey(UnusedKeyIssue),
    ParseError(ParseErrorIssue),
}

impl Issue {
    pub fn severity(&self) -> Severity {
        match self {
            Issue::MissingKey(_) => MissingKeyIssue::severity(),
            Issue::UnusedKey(_) => UnusedKeyIssue::severity(),
            Issue::ParseError(_) => ParseErrorIssue::severity(),
        }
    }

    pub fn rule(&self) -> Rule {
        match self {
            Issue::MissingKey(_) => MissingKeyIssue::rule(),
            Issue::UnusedKey(_) => UnusedKeyIssue::rule(),
            Issue::ParseError(_) => ParseErrorIssue::rule(),
        }
    }
}

impl PartialOrd for Issue {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

/// Errors first, then by rule, then by location and message.
impl Ord for Issue {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.severity()
            .cmp(&other.severity())
            .then_with(|| self.rule().cmp(&other.rule()))
            .then_with(|| self.location().cmp(&other.location()))
            .then_with(|| self.message().cmp(&other.message()))
    }
}

// ============================================================
// Report Trait (for CLI output)
// ============================================================

/// Location information for report output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ReportLocation<'a> {
    /// A line in the env file.
    EnvLine { path: &'a str, line: usize },
    /// A whole file.
    File { path: &'a str },
}

/// Trait for types that can be reported to CLI.
///
/// Implemented by all issue types; `enum_dispatch` forwards calls on [`Issue`].
#[enum_dispatch]
pub trait Report {
    /// Get the location for this issue.
    fn location(&self) -> ReportLocation<'_>;

    /// Primary message to display (key name or error).
    fn message(&self) -> String;

    /// Optional details for the "= note:" line.
    fn details(&self) -> Option<String> {
        None
    }

    /// Optional hint for fixing the issue.
    fn hint(&self) -> Option<String> {
        None
    }

    /// Further files involved besides the one in [`Report::location`].
    fn other_files(&self) -> &[String] {
        &[]
    }
}

// ============================================================
// Report Implementations
// ============================================================

impl Report for MissingKeyIssue {
    fn location(&self) -> ReportLocation<'_> {
        match self.used_in.first() {
            Some(path) => ReportLocation::File { path },
            None => ReportLocation::File {
                path: &self.env_path,
            },
        }
    }

    fn message(&self) -> String {
        self.key.clone()
    }

    fn details(&self) -> Option<String> {
        Some(format!("not defined in {}", self.env_path))
    }

    fn other_files(&self) -> &[String] {
        self.used_in.get(1..).unwrap_or(&[])
    }
}

impl Report for UnusedKeyIssue {
    fn location(&self) -> ReportLocation<'_> {
        ReportLocation::EnvLine {
            path: &self.env_path,
            line: self.line,
        }
    }

    fn message(&self) -> String {
        self.key.clone()
    }

    fn hint(&self) -> Option<String> {
        Some("remove it from the env file if it is no longer needed".to_string())
    }
}

impl Report for ParseErrorIssue {
    fn location(&self) -> ReportLocation<'_> {
        ReportLocation::File {
            path: &self.file_path,
        }
    }

    fn message(&self) -> String {
        self.error.clone()
    }
}

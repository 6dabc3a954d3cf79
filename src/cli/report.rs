//! Report formatting and printing utilities.
//!
//! Issues are displayed in cargo style. Kept apart from the core so the crate
//! can be used as a library without terminal output.

use std::io::Write;

use colored::Colorize;

use crate::issues::{Issue, Report, ReportLocation, Severity};

/// Success mark for consistent output formatting.
pub const SUCCESS_MARK: &str = "\u{2713}"; // ✓

/// Failure mark for consistent output formatting.
pub const FAILURE_MARK: &str = "\u{2718}"; // ✘

/// Maximum number of additional files to display per issue.
const MAX_FILES_DISPLAY: usize = 3;

/// Print issues in cargo-style format to a writer.
pub fn report_to<W: Write>(issues: &[Issue], writer: &mut W) {
    if issues.is_empty() {
        return;
    }

    let mut sorted = issues.to_vec();
    sorted.sort();

    for issue in &sorted {
        print_issue(issue, writer);
    }

    print_summary(&sorted, writer);
}

/// Print a success message when every used key is defined.
pub fn print_success_to<W: Write>(source_files: usize, env_path: &str, writer: &mut W) {
    let _ = writeln!(
        writer,
        "{} {}",
        SUCCESS_MARK.green(),
        format!(
            "Checked {} source {} - code and {} are in sync",
            source_files,
            if source_files == 1 { "file" } else { "files" },
            env_path
        )
        .green()
    );
}

/// Print a warning about files that could not be parsed.
pub fn print_parse_warning_to<W: Write>(count: usize, verbose: bool, writer: &mut W) {
    if count > 0 && !verbose {
        let _ = writeln!(
            writer,
            "{} {} file(s) could not be parsed (use {} for details)",
            "warning:".bold().yellow(),
            count,
            "-v".cyan()
        );
    }
}

/// Print a general warning line.
pub fn print_warning_to<W: Write>(message: &str, writer: &mut W) {
    let _ = writeln!(writer, "{} {}", "warning:".bold().yellow(), message);
}

/// Print the scan statistics footer.
pub fn print_stats_to<W: Write>(files_scanned: usize, keys_found: usize, writer: &mut W) {
    let _ = writeln!(
        writer,
        "{} {} {} scanned | {} {} found",
        "Stats:".blue(),
        files_scanned,
        if files_scanned == 1 { "file" } else { "files" },
        keys_found,
        if keys_found == 1 {
            "variable"
        } else {
            "variables"
        }
    );
}

// ============================================================
// Internal Functions
// ============================================================

fn print_issue<W: Write>(issue: &Issue, writer: &mut W) {
    let severity_str = match issue.severity() {
        Severity::Error => "error".bold().red(),
        Severity::Warning => "warning".bold().yellow(),
    };

    let _ = writeln!(
        writer,
        "{}: \"{}\"  {}",
        severity_str,
        issue.message(),
        issue.rule().to_string().dimmed().cyan()
    );

    match issue.location() {
        ReportLocation::EnvLine { path, line } => {
            let _ = writeln!(writer, "  {} {}:{}", "-->".blue(), path, line);
        }
        ReportLocation::File { path } => {
            let _ = writeln!(writer, "  {} {}", "-->".blue(), path);
        }
    }

    if let Some(details) = issue.details() {
        let _ = writeln!(writer, "   {} {} {}", "=".blue(), "note:".bold(), details);
    }

    if let Some(hint) = issue.hint() {
        let _ = writeln!(writer, "   {} {} {}", "=".blue(), "hint:".bold().cyan(), hint);
    }

    print_other_files(issue.other_files(), writer);

    let _ = writeln!(writer); // Empty line between issues
}

fn print_other_files<W: Write>(files: &[String], writer: &mut W) {
    let total = files.len();
    let display_count = total.min(MAX_FILES_DISPLAY);

    for (i, file) in files.iter().take(display_count).enumerate() {
        let is_last = i == display_count - 1;
        let remaining = total.saturating_sub(display_count);
        let suffix = if is_last && remaining > 0 {
            format!(" (and {} more)", remaining)
        } else {
            String::new()
        };

        let _ = writeln!(
            writer,
            "   {} {} {}{}",
            "=".blue(),
            "also used:".bold(),
            file,
            suffix
        );
    }
}

fn print_summary<W: Write>(issues: &[Issue], writer: &mut W) {
    let total_errors = issues
        .iter()
        .filter(|i| i.severity() == Severity::Error)
        .count();
    let total_warnings = issues
        .iter()
        .filter(|i| i.severity() == Severity::Warning)
        .count();
    let total_problems = total_errors + total_warnings;

    if total_problems > 0 {
        let _ = writeln!(
            writer,
            "{} {} {} ({} {}, {} {})",
            FAILURE_MARK.red(),
            total_problems,
            if total_problems == 1 {
                "problem"
            } else {
                "problems"
            },
            total_errors,
            if total_errors == 1 { "error" } else { "errors" }.red(),
            total_warnings,
            if total_warnings == 1 {
                "warning"
            } else {
                "warnings"
            }
            .yellow()
        );
    }
}

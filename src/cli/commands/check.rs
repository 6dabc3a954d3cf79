use std::{
    io::{self, IsTerminal, Write},
    path::Path,
    time::Duration,
};

use anyhow::{Context, Result};
use colored::Colorize;
use dialoguer::{Confirm, theme::ColorfulTheme};
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use tracing::debug;

use super::super::{
    args::{CheckArgs, CheckCommand},
    exit_status::ExitStatus,
    report::{
        SUCCESS_MARK, print_parse_warning_to, print_stats_to, print_success_to,
        print_warning_to, report_to,
    },
};
use crate::{
    config::{Config, ConfigLoadResult, load_config},
    core::{AuditContext, AuditResult, SyncOutcome, UsageIndex, sync_template},
    issues::{Issue, ParseErrorIssue},
};

pub fn check(cmd: CheckCommand) -> Result<ExitStatus> {
    let args = &cmd.args;
    let root = &args.common.root;

    let search_dir = root.canonicalize().unwrap_or_else(|_| root.clone());
    let ConfigLoadResult { mut config, path } = load_config(&search_dir)?;
    match &path {
        Some(path) => debug!("using config file {}", path.display()),
        None => debug!("no config file found, using defaults"),
    }
    apply_overrides(&mut config, args);
    config.validate()?;

    let ctx = AuditContext::new(config, root.clone())?;
    debug!("discovered {} source files", ctx.files.len());

    let spinner =
        (!args.json && io::stderr().is_terminal()).then(|| start_spinner(ctx.files.len()));
    ctx.batch();
    if let Some(spinner) = spinner {
        spinner.finish_and_clear();
    }

    let result = ctx.audit();

    if args.json {
        let synced = if args.sync && result.has_missing() {
            Some(sync_template(&result.missing, &ctx.template_path())?.added)
        } else {
            None
        };
        print_json(&ctx, &result, synced)?;
        return Ok(ExitStatus::from_missing(result.has_missing()));
    }

    let verbose = args.common.verbose;
    let mut out = io::stdout().lock();
    let env_path = ctx.env_path().display().to_string();

    if !ctx.env.exists {
        print_warning_to(
            &format!("{} not found, every used key is reported missing", env_path),
            &mut out,
        );
    }

    let issues: Vec<Issue> = ctx
        .issues(&result)
        .into_iter()
        .filter(|issue| verbose || !matches!(issue, Issue::ParseError(_)))
        .collect();

    let batch = ctx.batch();
    if issues.is_empty() {
        print_success_to(batch.files_scanned, &env_path, &mut out);
    } else {
        report_to(&issues, &mut out);
    }
    print_parse_warning_to(batch.parse_errors.len(), verbose, &mut out);

    if result.has_missing() {
        let template_path = ctx.template_path();
        if should_sync(args, &result, &template_path)? {
            let outcome = sync_template(&result.missing, &template_path)?;
            print_sync_outcome(&outcome, &template_path, &mut out);
        } else if !args.sync {
            let _ = writeln!(
                out,
                "{} run with {} to add missing keys to {}",
                "tip:".bold().cyan(),
                "--sync".cyan(),
                template_path.display()
            );
        }
    }

    print_stats_to(batch.files_scanned, batch.usages.len(), &mut out);

    Ok(ExitStatus::from_missing(result.has_missing()))
}

/// Command-line values take precedence over the config file.
fn apply_overrides(config: &mut Config, args: &CheckArgs) {
    if let Some(env) = &args.env {
        config.env_file = env.clone();
    }
    if let Some(template) = &args.template {
        config.template_file = template.clone();
    }
    if !args.includes.is_empty() {
        config.includes = args.includes.clone();
    }
}

/// `--sync` always syncs. Otherwise ask, but only when someone can answer.
fn should_sync(args: &CheckArgs, result: &AuditResult, template_path: &Path) -> Result<bool> {
    if args.sync {
        return Ok(true);
    }
    if !(io::stdin().is_terminal() && io::stderr().is_terminal()) {
        return Ok(false);
    }

    let prompt = format!(
        "Add {} missing {} to {}?",
        result.missing.len(),
        if result.missing.len() == 1 { "key" } else { "keys" },
        template_path.display()
    );
    let confirmed = Confirm::with_theme(&ColorfulTheme::default())
        .with_prompt(prompt)
        .default(true)
        .interact()
        .context("Failed to read confirmation")?;
    Ok(confirmed)
}

fn print_sync_outcome<W: Write>(outcome: &SyncOutcome, template_path: &Path, writer: &mut W) {
    if outcome.added.is_empty() {
        let _ = writeln!(
            writer,
            "{} already lists every missing key",
            template_path.display()
        );
        return;
    }

    let _ = writeln!(
        writer,
        "{} {}",
        SUCCESS_MARK.green(),
        if outcome.created {
            format!(
                "Created {} with {} {}",
                template_path.display(),
                outcome.added.len(),
                if outcome.added.len() == 1 { "key" } else { "keys" }
            )
        } else {
            format!(
                "Added {} {} to {}",
                outcome.added.len(),
                if outcome.added.len() == 1 { "key" } else { "keys" },
                template_path.display()
            )
        }
        .green()
    );
}

fn start_spinner(file_count: usize) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner:.green} {msg}") {
        spinner.set_style(style);
    }
    spinner.set_message(format!("Scanning {} files...", file_count));
    spinner.enable_steady_tick(Duration::from_millis(80));
    spinner
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct JsonReport<'a> {
    env_file: String,
    env_file_exists: bool,
    files_scanned: usize,
    #[serde(flatten)]
    audit: &'a AuditResult,
    usages: &'a UsageIndex,
    parse_errors: &'a [ParseErrorIssue],
    #[serde(skip_serializing_if = "Option::is_none")]
    synced: Option<Vec<String>>,
}

fn print_json(
    ctx: &AuditContext,
    result: &AuditResult,
    synced: Option<Vec<String>>,
) -> Result<()> {
    let batch = ctx.batch();
    let report = JsonReport {
        env_file: ctx.env_path().display().to_string(),
        env_file_exists: ctx.env.exists,
        files_scanned: batch.files_scanned,
        audit: result,
        usages: &batch.usages,
        parse_errors: &batch.parse_errors,
        synced,
    };
    let json = serde_json::to_string_pretty(&report).context("Failed to serialize report")?;
    println!("{}", json);
    Ok(())
}

use std::{cell::OnceCell, path::PathBuf};

use anyhow::Result;

use super::{
    audit::{AuditResult, audit},
    batch::{BatchScan, scan_files},
    env_file::{EnvFile, load_env_file},
    file_scanner::{discover_files, join_under},
    scanner::KeySet,
};
use crate::{
    config::Config,
    issues::{Issue, MissingKeyIssue, UnusedKeyIssue},
};

/// Everything needed to audit one project.
///
/// Files are discovered and the env file is loaded eagerly so configuration
/// problems surface before any scanning starts. Scanning itself runs on first
/// access to [`AuditContext::batch`].
pub struct AuditContext {
    /// Merged configuration (CLI args > config file > defaults).
    pub config: Config,

    /// Project root; relative paths in the config are resolved against it.
    pub root_dir: PathBuf,

    /// Source files selected by `includes` minus `ignores`.
    pub files: Vec<PathBuf>,

    /// Paths that could not be accessed during discovery.
    pub skipped_count: usize,

    /// Parsed env file (empty when it does not exist).
    pub env: EnvFile,

    batch: OnceCell<BatchScan>,
}

impl AuditContext {
    pub fn new(config: Config, root_dir: PathBuf) -> Result<Self> {
        let discovery = discover_files(&root_dir, &config.includes, &config.ignores);
        let env = load_env_file(&join_under(&root_dir, &config.env_file))?;

        Ok(Self {
            config,
            root_dir,
            files: discovery.files,
            skipped_count: discovery.skipped_count,
            env,
            batch: OnceCell::new(),
        })
    }

    pub fn env_path(&self) -> PathBuf {
        join_under(&self.root_dir, &self.config.env_file)
    }

    pub fn template_path(&self) -> PathBuf {
        join_under(&self.root_dir, &self.config.template_file)
    }

    /// Scan results for all files (lazy initialization).
    pub fn batch(&self) -> &BatchScan {
        self.batch.get_or_init(|| scan_files(&self.files))
    }

    /// Every key referenced in code.
    pub fn used_keys(&self) -> KeySet {
        self.batch().used_keys()
    }

    pub fn audit(&self) -> AuditResult {
        audit(&self.used_keys(), &self.env.keys())
    }

    /// Issues for an audit result: missing keys, unused keys and parse errors,
    /// sorted for display.
    pub fn issues(&self, result: &AuditResult) -> Vec<Issue> {
        let env_path = self.env_path().display().to_string();
        let batch = self.batch();

        let missing = result.missing.iter().map(|key| {
            Issue::MissingKey(MissingKeyIssue {
                key: key.clone(),
                env_path: env_path.clone(),
                used_in: batch
                    .usages
                    .get(key)
                    .map(|files| files.iter().cloned().collect())
                    .unwrap_or_default(),
            })
        });

        let unused = result.unused.iter().map(|key| {
            Issue::UnusedKey(UnusedKeyIssue {
                env_path: env_path.clone(),
                line: self.env.get(key).map(|e| e.line).unwrap_or(0),
                key: key.clone(),
            })
        });

        let parse_errors = batch.parse_errors.iter().cloned().map(Issue::ParseError);

        let mut issues: Vec<Issue> = missing.chain(unused).chain(parse_errors).collect();
        issues.sort();
        issues
    }
}

//! Parallel scanning of many source files.
//!
//! Every file is read and scanned as an independent rayon task. Tasks share
//! nothing; their key sets are merged into a [`UsageIndex`] once all of them
//! have completed.

use std::{
    collections::{BTreeMap, BTreeSet},
    fs,
    path::PathBuf,
};

use rayon::prelude::*;
use tracing::debug;

use super::{
    parser::SourceDialect,
    scanner::{KeySet, ParseFailure, ScanOutcome, scan_with_dialect},
};
use crate::issues::ParseErrorIssue;

/// Stack size for scan workers. Parsing and visiting are recursive, so deeply
/// nested or generated sources need more room than rayon's default.
const SCAN_STACK_SIZE: usize = 64 * 1024 * 1024;

/// Environment key -> files referencing it.
pub type UsageIndex = BTreeMap<String, BTreeSet<String>>;

/// Merged result of scanning a batch of files.
#[derive(Debug, Default)]
pub struct BatchScan {
    /// Every key found, with the files that reference it.
    pub usages: UsageIndex,
    /// Number of files read (including those that failed to parse).
    pub files_scanned: usize,
    /// Files that could not be read or parsed.
    pub parse_errors: Vec<ParseErrorIssue>,
}

impl BatchScan {
    /// Union of all per-file key sets.
    pub fn used_keys(&self) -> KeySet {
        self.usages.keys().cloned().collect()
    }

    /// Add one file's outcome.
    pub fn merge(&mut self, file_path: String, outcome: ScanOutcome) {
        self.files_scanned += 1;
        match outcome {
            ScanOutcome::Scanned(keys) => {
                for key in keys {
                    self.usages
                        .entry(key)
                        .or_default()
                        .insert(file_path.clone());
                }
            }
            ScanOutcome::Unparsed(failure) => {
                debug!("skipping {}: {}", file_path, failure.message);
                self.parse_errors.push(ParseErrorIssue {
                    file_path,
                    error: failure.message,
                });
            }
        }
    }
}

/// Read and scan every file in parallel, then merge the results.
///
/// Unreadable or unparseable files are recorded as parse errors; they never
/// abort the batch.
pub fn scan_files(files: &[PathBuf]) -> BatchScan {
    let run = || {
        files
            .par_iter()
            .map(|path| {
                let file_path = path.to_string_lossy().to_string();
                let outcome = match fs::read_to_string(path) {
                    Ok(code) => scan_with_dialect(&code, SourceDialect::from_path(path)),
                    Err(e) => ScanOutcome::Unparsed(ParseFailure {
                        message: format!("Failed to read file: {}", e),
                    }),
                };
                (file_path, outcome)
            })
            .collect::<Vec<_>>()
    };

    let results = match rayon::ThreadPoolBuilder::new()
        .stack_size(SCAN_STACK_SIZE)
        .build()
    {
        Ok(pool) => pool.install(run),
        Err(e) => {
            debug!("falling back to the global thread pool: {}", e);
            run()
        }
    };

    let mut batch = BatchScan::default();
    for (file_path, outcome) in results {
        batch.merge(file_path, outcome);
    }
    batch
}

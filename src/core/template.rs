//! Keeping a committed template (e.g. `.env.example`) in step with the code.

use std::{fs, path::Path};

use anyhow::{Context, Result};
use tracing::debug;

/// Content of a template file created from scratch.
pub const TEMPLATE_HEADER: &str = "# Environment Variables Template\n";

/// What [`sync_template`] changed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncOutcome {
    /// Keys appended, in the order given.
    pub added: Vec<String>,
    /// Whether the template file did not exist before.
    pub created: bool,
}

/// Append `KEY=` lines for every key in `missing` that the template does not
/// define yet. Existing content is preserved; nothing is written when
/// `missing` is empty.
pub fn sync_template(missing: &[String], path: &Path) -> Result<SyncOutcome> {
    if missing.is_empty() {
        return Ok(SyncOutcome::default());
    }

    let created = !path.exists();
    let mut content = if created {
        TEMPLATE_HEADER.to_string()
    } else {
        fs::read_to_string(path)
            .with_context(|| format!("Failed to read template file: {}", path.display()))?
    };

    let mut added = Vec::new();
    for key in missing {
        if defines_key(&content, key) {
            continue;
        }
        if !content.is_empty() && !content.ends_with('\n') {
            content.push('\n');
        }
        content.push_str(key);
        content.push_str("=\n");
        added.push(key.clone());
    }

    if added.is_empty() && !created {
        debug!("{} already lists every missing key", path.display());
        return Ok(SyncOutcome::default());
    }

    fs::write(path, content)
        .with_context(|| format!("Failed to write template file: {}", path.display()))?;

    Ok(SyncOutcome { added, created })
}

/// Whether any line of `content` assigns `key` (optionally `export`ed).
fn defines_key(content: &str, key: &str) -> bool {
    content.lines().any(|line| {
        let line = line.trim_start();
        let line = line.strip_prefix("export ").unwrap_or(line).trim_start();
        line.strip_prefix(key)
            .is_some_and(|rest| rest.trim_start().starts_with('='))
    })
}

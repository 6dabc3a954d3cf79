//! Reader for dotenv-style `KEY=value` files.

use std::{
    collections::BTreeMap,
    fs,
    path::{Path, PathBuf},
    sync::LazyLock,
};

use anyhow::{Context, Result};
use regex::Regex;

use super::scanner::KeySet;

// One assignment per match. A value is either a quoted string (which may span
// lines) or the rest of the line up to an inline `#` comment.
static LINE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r##"(?m)^\s*(?:export\s+)?([\w.-]+)(?:\s*=\s*?|:\s+?)(\s*'(?:\\'|[^'])*'|\s*"(?:\\"|[^"])*"|\s*`(?:\\`|[^`])*`|[^#\r\n]+)?\s*(?:#.*)?$"##,
    )
    .unwrap()
});

/// A single `KEY=value` definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvEntry {
    pub key: String,
    pub value: String,
    /// 1-based line of the key.
    pub line: usize,
}

/// Parsed contents of an env file.
#[derive(Debug, Clone, Default)]
pub struct EnvFile {
    pub path: PathBuf,
    /// Whether the file existed when it was loaded.
    pub exists: bool,
    /// Definitions in file order, one per key (last definition wins).
    pub entries: Vec<EnvEntry>,
}

impl EnvFile {
    pub fn keys(&self) -> KeySet {
        self.entries.iter().map(|e| e.key.clone()).collect()
    }

    pub fn get(&self, key: &str) -> Option<&EnvEntry> {
        self.entries.iter().find(|e| e.key == key)
    }
}

/// Load an env file. A missing file is treated as empty.
pub fn load_env_file(path: &Path) -> Result<EnvFile> {
    if !path.exists() {
        return Ok(EnvFile {
            path: path.to_path_buf(),
            exists: false,
            entries: Vec::new(),
        });
    }

    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read env file: {}", path.display()))?;

    Ok(EnvFile {
        path: path.to_path_buf(),
        exists: true,
        entries: parse_env(&content),
    })
}

/// Parse dotenv text into entries.
///
/// - `export` prefixes and `KEY: value` are accepted
/// - blank lines, `#` comment lines and inline comments are skipped
/// - surrounding quotes are removed; double-quoted values expand `\n` and `\r`
/// - when a key repeats, the last definition wins but keeps its position
pub fn parse_env(content: &str) -> Vec<EnvEntry> {
    let normalized = content.replace("\r\n", "\n").replace('\r', "\n");

    let mut order: Vec<String> = Vec::new();
    let mut by_key: BTreeMap<String, EnvEntry> = BTreeMap::new();

    for caps in LINE_REGEX.captures_iter(&normalized) {
        let Some(key) = caps.get(1) else {
            continue;
        };
        let raw = caps.get(2).map(|m| m.as_str()).unwrap_or("");
        let line = normalized[..key.start()].matches('\n').count() + 1;

        let entry = EnvEntry {
            key: key.as_str().to_string(),
            value: unquote(raw.trim()),
            line,
        };

        if !by_key.contains_key(&entry.key) {
            order.push(entry.key.clone());
        }
        by_key.insert(entry.key.clone(), entry);
    }

    order
        .into_iter()
        .filter_map(|key| by_key.remove(&key))
        .collect()
}

fn unquote(value: &str) -> String {
    let mut chars = value.chars();
    let (Some(first), Some(last)) = (chars.next(), chars.next_back()) else {
        return value.to_string();
    };

    if !matches!(first, '\'' | '"' | '`') || first != last {
        return value.to_string();
    }

    let inner = &value[1..value.len() - 1];
    if first == '"' {
        inner.replace("\\n", "\n").replace("\\r", "\r")
    } else {
        inner.to_string()
    }
}

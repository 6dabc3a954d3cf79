use std::{
    collections::BTreeSet,
    path::{Component, Path, PathBuf},
};

use glob::{Pattern, glob};
use tracing::debug;
use walkdir::WalkDir;

use super::utils::{expand_braces, is_glob_pattern};

/// Result of discovering source files.
#[derive(Debug, Default)]
pub struct DiscoveryResult {
    /// Matching files, sorted and de-duplicated.
    pub files: Vec<PathBuf>,
    /// Paths that could not be read while walking.
    pub skipped_count: usize,
}

/// Ignore rules, split into literal path prefixes and glob patterns.
struct IgnoreSet {
    literal_paths: Vec<PathBuf>,
    patterns: Vec<Pattern>,
}

impl IgnoreSet {
    fn new(ignores: &[String]) -> Self {
        let mut literal_paths = Vec::new();
        let mut patterns = Vec::new();

        for ignore in ignores {
            for p in expand_braces(ignore) {
                if is_glob_pattern(&p) {
                    match Pattern::new(&p) {
                        Ok(pattern) => patterns.push(pattern),
                        Err(e) => debug!("invalid ignore pattern '{}': {}", p, e),
                    }
                } else {
                    literal_paths.push(PathBuf::from(p.trim_start_matches("./")));
                }
            }
        }

        Self {
            literal_paths,
            patterns,
        }
    }

    /// `relative` is the path relative to the discovery root.
    fn is_ignored(&self, relative: &Path) -> bool {
        if self
            .literal_paths
            .iter()
            .any(|ignore_path| relative.starts_with(ignore_path))
        {
            return true;
        }
        let path_str = relative.to_string_lossy();
        self.patterns.iter().any(|p| p.matches(&path_str))
    }
}

/// Find the files selected by `includes` under `root`, minus `ignores`.
///
/// Include patterns are relative to `root` and may use brace alternatives. A
/// pattern without wildcards names either a file or a directory whose whole
/// subtree is included. Ignore patterns are matched against root-relative paths.
pub fn discover_files(root: &Path, includes: &[String], ignores: &[String]) -> DiscoveryResult {
    let ignore_set = IgnoreSet::new(ignores);
    let mut files: BTreeSet<PathBuf> = BTreeSet::new();
    let mut skipped_count = 0;

    let accept = |path: PathBuf, files: &mut BTreeSet<PathBuf>| {
        let relative = path.strip_prefix(root).unwrap_or(&path);
        let relative = relative.strip_prefix(".").unwrap_or(relative);
        if !ignore_set.is_ignored(relative) {
            files.insert(path);
        }
    };

    for include in includes {
        for p in expand_braces(include) {
            let full = join_under(root, &p);

            if is_glob_pattern(&p) {
                let escaped_root = PathBuf::from(Pattern::escape(&root.to_string_lossy()));
                let full_pattern = join_under(&escaped_root, &p);
                let entries = match glob(&full_pattern.to_string_lossy()) {
                    Ok(entries) => entries,
                    Err(e) => {
                        debug!("invalid include pattern '{}': {}", p, e);
                        continue;
                    }
                };
                for entry in entries {
                    match entry {
                        Ok(path) if path.is_file() => accept(path, &mut files),
                        Ok(_) => {}
                        Err(e) => {
                            skipped_count += 1;
                            debug!("cannot access path: {}", e);
                        }
                    }
                }
            } else if full.is_dir() {
                for entry in WalkDir::new(&full) {
                    match entry {
                        Ok(entry) if entry.file_type().is_file() && is_scannable_file(entry.path()) => {
                            accept(entry.into_path(), &mut files)
                        }
                        Ok(_) => {}
                        Err(e) => {
                            skipped_count += 1;
                            debug!("cannot access path: {}", e);
                        }
                    }
                }
            } else if full.is_file() {
                accept(full, &mut files);
            } else {
                debug!("include path does not exist: {}", full.display());
            }
        }
    }

    DiscoveryResult {
        files: files.into_iter().collect(),
        skipped_count,
    }
}

fn is_scannable_file(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("tsx" | "ts" | "jsx" | "js" | "mjs" | "cjs" | "mts" | "cts")
    )
}

/// Join a relative pattern under `root`, keeping `./`-style roots out of the result
/// so reported paths stay short.
pub fn join_under(root: &Path, relative: &str) -> PathBuf {
    let p = Path::new(relative);
    if p.is_absolute() {
        return p.to_path_buf();
    }
    let is_cur_dir = root.components().all(|c| matches!(c, Component::CurDir));
    if is_cur_dir {
        p.to_path_buf()
    } else {
        let rel = p.strip_prefix(Path::new(".")).unwrap_or(p);
        root.join(rel)
    }
}

use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Ok, Result};
use glob::Pattern;
use serde::{Deserialize, Serialize};

use crate::core::utils::{expand_braces, is_glob_pattern};

pub const CONFIG_FILE_NAME: &str = ".envguardianrc.json";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Glob patterns (relative to the project root) selecting source files.
    #[serde(default = "default_includes")]
    pub includes: Vec<String>,
    /// Glob patterns or path prefixes excluded from scanning.
    #[serde(default = "default_ignores")]
    pub ignores: Vec<String>,
    /// Local env file holding the real values.
    #[serde(default = "default_env_file")]
    pub env_file: String,
    /// Committed template listing every key with an empty value.
    #[serde(default = "default_template_file")]
    pub template_file: String,
}

fn default_includes() -> Vec<String> {
    vec!["src/**/*.{js,ts,jsx,tsx}".to_string()]
}

fn default_ignores() -> Vec<String> {
    vec!["**/node_modules/**".to_string()]
}

fn default_env_file() -> String {
    ".env".to_string()
}

fn default_template_file() -> String {
    ".env.example".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            includes: default_includes(),
            ignores: default_ignores(),
            env_file: default_env_file(),
            template_file: default_template_file(),
        }
    }
}

impl Config {
    /// Validate configuration values.
    ///
    /// Returns an error if any glob pattern in `includes` or `ignores` is invalid.
    /// Patterns are checked after brace expansion; patterns without wildcards are
    /// literal paths, so `app/[locale]` is valid without escaping.
    pub fn validate(&self) -> Result<()> {
        validate_patterns(&self.includes, "includes")?;
        validate_patterns(&self.ignores, "ignores")?;
        Ok(())
    }
}

fn validate_patterns(patterns: &[String], field: &str) -> Result<()> {
    for pattern in patterns {
        for expanded in expand_braces(pattern) {
            if is_glob_pattern(&expanded) {
                Pattern::new(&expanded).with_context(|| {
                    format!("Invalid glob pattern in '{}': \"{}\"", field, pattern)
                })?;
            }
        }
    }
    Ok(())
}

pub fn default_config_json() -> Result<String> {
    let config = Config::default();
    serde_json::to_string_pretty(&config).context("Failed to generate default config.")
}

pub fn find_config_file(start_dir: &Path) -> Option<PathBuf> {
    let mut current = start_dir.to_path_buf();

    loop {
        let config_path = current.join(CONFIG_FILE_NAME);
        if config_path.exists() {
            return Some(config_path);
        }
        if current.join(".git").exists() {
            return None;
        }
        if !current.pop() {
            return None;
        }
    }
}

/// Result of loading configuration.
pub struct ConfigLoadResult {
    pub config: Config,
    /// Path of the config file, or `None` when using defaults.
    pub path: Option<PathBuf>,
}

pub fn load_config(start_dir: &Path) -> Result<ConfigLoadResult> {
    match find_config_file(start_dir) {
        Some(path) => {
            let content = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read config file: {:?}", path))?;
            let config: Config = serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse config file: {:?}", path))?;
            config.validate()?;
            Ok(ConfigLoadResult {
                config,
                path: Some(path),
            })
        }
        None => Ok(ConfigLoadResult {
            config: Config::default(),
            path: None,
        }),
    }
}

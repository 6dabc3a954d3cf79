//! Core analysis engine.
//!
//! ## Pipeline
//!
//! 1. **Discovery** (`file_scanner`): include/ignore patterns → candidate files
//! 2. **Scanning** (`scanner`, `batch`): each file → set of `process.env` keys,
//!    in parallel, merged into a usage index
//! 3. **Audit** (`env_file`, `audit`): used keys vs. keys defined in `.env`
//! 4. **Sync** (`template`): missing keys appended to `.env.example`
//!
//! The scanner is usable on its own:
//!
//! ```
//! use env_guardian::core::scan;
//!
//! let keys = scan("const { PORT } = process.env; process.env['DB_URL'];").into_keys();
//! assert!(keys.contains("PORT") && keys.contains("DB_URL"));
//! ```

pub mod audit;
pub mod batch;
pub mod context;
pub mod env_file;
pub mod file_scanner;
pub mod parser;
pub mod scanner;
pub mod template;
pub mod utils;

pub use audit::{AuditResult, audit};
pub use batch::{BatchScan, UsageIndex, scan_files};
pub use context::AuditContext;
pub use env_file::{EnvEntry, EnvFile, load_env_file, parse_env};
pub use file_scanner::{DiscoveryResult, discover_files, join_under};
pub use parser::{SourceDialect, parse_source};
pub use scanner::{KeySet, ParseFailure, ScanOutcome, scan, scan_with_dialect};
pub use template::{SyncOutcome, TEMPLATE_HEADER, sync_template};

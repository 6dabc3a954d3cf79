use serde::Serialize;

use super::scanner::KeySet;

/// Comparison of keys used in code against keys defined in an env file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AuditResult {
    /// Used in code but not defined.
    pub missing: Vec<String>,
    /// Defined but never used in code.
    pub unused: Vec<String>,
    /// Defined and used.
    pub existing: Vec<String>,
}

impl AuditResult {
    pub fn has_missing(&self) -> bool {
        !self.missing.is_empty()
    }
}

pub fn audit(used: &KeySet, stored: &KeySet) -> AuditResult {
    AuditResult {
        missing: used.difference(stored).cloned().collect(),
        unused: stored.difference(used).cloned().collect(),
        existing: stored.intersection(used).cloned().collect(),
    }
}

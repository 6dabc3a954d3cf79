//! Detection of `process.env` usages in a single source unit.
//!
//! The scanner parses the text, walks every node of the resulting AST once and
//! records each environment key referenced through one of these shapes:
//!
//! - member access: `process.env.KEY`, `process.env['KEY']`, `process.env?.KEY`,
//!   `process?.env.KEY`
//! - declaration destructuring: `const { KEY, OTHER: alias } = process.env`
//! - assignment destructuring: `({ KEY } = process.env)`
//!
//! Anything else contributes nothing. Aliases (`const env = process.env`) and
//! computed keys (`process.env[name]`, template strings) are not followed.

use std::collections::BTreeSet;

use swc_ecma_ast::{
    AssignExpr, AssignOp, AssignTarget, AssignTargetPat, Expr, Lit, MemberExpr, MemberProp,
    ObjectPat, ObjectPatProp, OptChainBase, Pat, PropName, VarDeclarator,
};
use swc_ecma_visit::{Visit, VisitWith};

use super::parser::{SourceDialect, parse_source};

/// Deduplicated environment keys referenced by one source unit.
pub type KeySet = BTreeSet<String>;

const ENV_NAMESPACE: &str = "process";
const ENV_OBJECT: &str = "env";

/// Why a source unit could not be analyzed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseFailure {
    pub message: String,
}

impl std::fmt::Display for ParseFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "could not parse source: {}", self.message)
    }
}

/// Result of scanning one source unit.
///
/// A failed parse never carries keys: detection only runs on a complete tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanOutcome {
    Scanned(KeySet),
    Unparsed(ParseFailure),
}

impl ScanOutcome {
    /// Whether the source parsed.
    pub fn is_ok(&self) -> bool {
        matches!(self, ScanOutcome::Scanned(_))
    }

    /// Keys found, or `None` if the source did not parse.
    pub fn keys(&self) -> Option<&KeySet> {
        match self {
            ScanOutcome::Scanned(keys) => Some(keys),
            ScanOutcome::Unparsed(_) => None,
        }
    }

    /// Keys found; empty if the source did not parse.
    pub fn into_keys(self) -> KeySet {
        match self {
            ScanOutcome::Scanned(keys) => keys,
            ScanOutcome::Unparsed(_) => KeySet::new(),
        }
    }

    /// The `(keys, ok)` view of the outcome.
    pub fn into_parts(self) -> (KeySet, bool) {
        let ok = self.is_ok();
        (self.into_keys(), ok)
    }
}

/// Scan source text using the default dialect (TypeScript with JSX).
///
/// Parsing and the AST walk recurse once per nesting level, so the stack of the
/// calling thread bounds how deeply nested a source can be. Pathological inputs
/// (thousands of nested brackets) can overflow a default 2 MB thread stack,
/// especially in debug builds; run such scans on a thread with a larger stack,
/// as [`scan_files`](super::batch::scan_files) does.
pub fn scan(source: &str) -> ScanOutcome {
    scan_with_dialect(source, SourceDialect::default())
}

/// Scan source text with an explicit grammar.
pub fn scan_with_dialect(source: &str, dialect: SourceDialect) -> ScanOutcome {
    match parse_source(source, dialect) {
        Ok(module) => {
            let mut collector = EnvUsageCollector::default();
            module.visit_with(&mut collector);
            ScanOutcome::Scanned(collector.keys)
        }
        Err(e) => ScanOutcome::Unparsed(ParseFailure {
            message: e.to_string(),
        }),
    }
}

/// AST visitor accumulating referenced environment keys.
///
/// Every handler records what it matched and then descends into the node's
/// children, so usages nested anywhere in the tree are found.
#[derive(Debug, Default)]
pub struct EnvUsageCollector {
    pub keys: KeySet,
}

impl EnvUsageCollector {
    fn collect_pattern_keys(&mut self, pat: &ObjectPat) {
        for prop in &pat.props {
            match prop {
                // `{ KEY: alias }` and `{ KEY: { nested } }` record the source-side name.
                ObjectPatProp::KeyValue(kv) => {
                    if let PropName::Ident(ident) = &kv.key {
                        self.keys.insert(ident.sym.as_str().to_string());
                    }
                }
                // `{ KEY }` and `{ KEY = fallback }`
                ObjectPatProp::Assign(assign) => {
                    self.keys.insert(assign.key.id.sym.as_str().to_string());
                }
                ObjectPatProp::Rest(_) => {}
            }
        }
    }
}

impl Visit for EnvUsageCollector {
    fn visit_member_expr(&mut self, node: &MemberExpr) {
        if is_env_object(&node.obj)
            && let Some(key) = member_key(&node.prop)
        {
            self.keys.insert(key);
        }
        node.visit_children_with(self);
    }

    fn visit_var_declarator(&mut self, node: &VarDeclarator) {
        if let Pat::Object(pat) = &node.name
            && node.init.as_deref().is_some_and(is_env_object)
        {
            self.collect_pattern_keys(pat);
        }
        node.visit_children_with(self);
    }

    fn visit_assign_expr(&mut self, node: &AssignExpr) {
        if node.op == AssignOp::Assign
            && let AssignTarget::Pat(AssignTargetPat::Object(pat)) = &node.left
            && is_env_object(&node.right)
        {
            self.collect_pattern_keys(pat);
        }
        node.visit_children_with(self);
    }
}

/// Check whether an expression is exactly `process.env` (or `process?.env`).
fn is_env_object(expr: &Expr) -> bool {
    let member = match unwrap_ts_expr(expr) {
        Expr::Member(member) => member,
        // `process?.env`
        Expr::OptChain(chain) => match &*chain.base {
            OptChainBase::Member(member) => member,
            _ => return false,
        },
        _ => return false,
    };
    let is_namespace = matches!(
        unwrap_ts_expr(&member.obj),
        Expr::Ident(ident) if ident.sym.as_str() == ENV_NAMESPACE
    );
    let is_env = matches!(
        &member.prop,
        MemberProp::Ident(ident) if ident.sym.as_str() == ENV_OBJECT
    );
    is_namespace && is_env
}

/// Extract a statically known key from a member property.
fn member_key(prop: &MemberProp) -> Option<String> {
    match prop {
        MemberProp::Ident(ident) => Some(ident.sym.as_str().to_string()),
        MemberProp::Computed(computed) => match unwrap_ts_expr(&computed.expr) {
            Expr::Lit(Lit::Str(s)) => s.value.as_str().map(|s| s.to_string()),
            _ => None,
        },
        MemberProp::PrivateName(_) => None,
    }
}

/// Unwrap TypeScript-specific expression wrappers to get the inner expression.
fn unwrap_ts_expr(expr: &Expr) -> &Expr {
    match expr {
        Expr::TsAs(ts_as) => unwrap_ts_expr(&ts_as.expr),
        Expr::TsNonNull(ts_non_null) => unwrap_ts_expr(&ts_non_null.expr),
        Expr::TsConstAssertion(ts_const) => unwrap_ts_expr(&ts_const.expr),
        Expr::TsSatisfies(ts_sat) => unwrap_ts_expr(&ts_sat.expr),
        Expr::TsTypeAssertion(ts_assert) => unwrap_ts_expr(&ts_assert.expr),
        Expr::Paren(paren) => unwrap_ts_expr(&paren.expr),
        _ => expr,
    }
}

use std::path::Path;

use anyhow::{Result, anyhow};
use swc_common::{FileName, GLOBALS, Globals, SourceMap, Spanned, sync::Lrc};
use swc_ecma_ast::Module;
use swc_ecma_parser::{EsSyntax, Parser, StringInput, Syntax, TsSyntax, error::Error};

/// Grammar used to parse a source unit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum SourceDialect {
    /// Plain TypeScript (`.ts`). Angle-bracket casts are allowed, JSX is not.
    TypeScript,
    /// TypeScript with JSX (`.tsx`). Also accepts nearly all plain JavaScript.
    #[default]
    Tsx,
    /// ECMAScript with JSX (`.js`, `.jsx`, `.mjs`, `.cjs`).
    JavaScript,
}

impl SourceDialect {
    /// Pick a dialect from a file extension, falling back to [`SourceDialect::Tsx`].
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some("ts" | "mts" | "cts") => Self::TypeScript,
            Some("tsx") => Self::Tsx,
            Some("js" | "jsx" | "mjs" | "cjs") => Self::JavaScript,
            _ => Self::default(),
        }
    }

    fn syntax(self) -> Syntax {
        match self {
            Self::TypeScript => Syntax::Typescript(TsSyntax {
                tsx: false,
                decorators: true,
                ..Default::default()
            }),
            Self::Tsx => Syntax::Typescript(TsSyntax {
                tsx: true,
                decorators: true,
                ..Default::default()
            }),
            Self::JavaScript => Syntax::Es(EsSyntax {
                jsx: true,
                decorators: true,
                decorators_before_export: true,
                ..Default::default()
            }),
        }
    }
}

/// Parse source text into a module AST.
///
/// Errors the parser recovered from are reported as failures too, so a caller
/// never sees a partially valid tree.
///
/// Each call installs its own swc globals and source map, which makes it safe
/// to call from many rayon workers at once.
pub fn parse_source(code: &str, dialect: SourceDialect) -> Result<Module> {
    GLOBALS.set(&Globals::new(), || {
        let source_map: Lrc<SourceMap> = Default::default();
        let source_file = source_map.new_source_file(FileName::Anon.into(), code.to_owned());

        let mut parser = Parser::new(dialect.syntax(), StringInput::from(&*source_file), None);

        let module = parser
            .parse_module()
            .map_err(|e| describe_error(&source_map, &e))?;

        if let Some(recovered) = parser.take_errors().first() {
            return Err(describe_error(&source_map, recovered));
        }

        Ok(module)
    })
}

fn describe_error(source_map: &SourceMap, error: &Error) -> anyhow::Error {
    let loc = source_map.lookup_char_pos(error.span().lo);
    anyhow!(
        "{}:{}: {}",
        loc.line,
        loc.col_display + 1,
        error.kind().msg()
    )
}

use std::ffi::OsStr;
use std::path::Path;

use lazy_static::lazy_static;
use tree_sitter_typescript::{language_tsx, language_typescript};

use crate::ast::queries::SiteQueries;
use crate::ast::tree_sitter::TSParser;
use crate::misc::NiceMutex;

/// Wrapper for arbitrary tree-sitter nodes, queries, and other datatypes
pub mod tree_sitter;
/// Tree-sitter queries for the import/require/export-from sites we rewrite
pub mod queries;
/// Typed nodes for the sites we rewrite (most nodes don't get their own type, but these do)
pub mod typed_nodes;

/// Grammar used to parse a source unit.
///
/// The TypeScript grammar parses plain JavaScript too; JSX syntax needs the TSX variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dialect {
    TypeScript,
    Tsx,
}

lazy_static! {
    pub static ref TYPESCRIPT_PARSER: NiceMutex<TSParser> =
        NiceMutex::new(TSParser::new(language_typescript()).expect("failed to load TypeScript parser"));
    pub static ref TSX_PARSER: NiceMutex<TSParser> =
        NiceMutex::new(TSParser::new(language_tsx()).expect("failed to load TSX parser"));
}

impl Dialect {
    /// Dialect for a source file, by extension. `None` for files this tool doesn't rewrite.
    pub fn of_path(path: &Path) -> Option<Dialect> {
        match path.extension().and_then(OsStr::to_str)? {
            "js" | "mjs" | "cjs" | "ts" | "mts" | "cts" => Some(Dialect::TypeScript),
            "jsx" | "tsx" => Some(Dialect::Tsx),
            _ => None,
        }
    }

    pub fn parser(self) -> &'static NiceMutex<TSParser> {
        match self {
            Dialect::TypeScript => &TYPESCRIPT_PARSER,
            Dialect::Tsx => &TSX_PARSER,
        }
    }

    /// Site queries compiled for this dialect's grammar (queries are language-specific)
    pub fn queries(self) -> &'static SiteQueries {
        match self {
            Dialect::TypeScript => &queries::TYPESCRIPT_QUERIES,
            Dialect::Tsx => &queries::TSX_QUERIES,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::Dialect;

    #[test]
    fn dialect_by_extension() {
        assert_eq!(Dialect::of_path(Path::new("a/b.js")), Some(Dialect::TypeScript));
        assert_eq!(Dialect::of_path(Path::new("a/b.cjs")), Some(Dialect::TypeScript));
        assert_eq!(Dialect::of_path(Path::new("a/b.tsx")), Some(Dialect::Tsx));
        assert_eq!(Dialect::of_path(Path::new("a/b.jsx")), Some(Dialect::Tsx));
        assert_eq!(Dialect::of_path(Path::new("a/b.css")), None);
        assert_eq!(Dialect::of_path(Path::new("Makefile")), None);
    }
}

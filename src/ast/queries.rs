use lazy_static::lazy_static;
use tree_sitter_typescript::{language_tsx, language_typescript};

use crate::ast::tree_sitter::{TSLanguage, TSQuery};

/// `import ... from '...'`, `export { ... } from '...'`, and `export * from '...'`.
/// The `source` field only exists on re-exports, so plain exports never match.
const IMPORT_EXPORT_SOURCE_STR: &'static str = "
    (import_statement source: (string) @source)
    (export_statement source: (string) @source)
";

/// `require(...)` and dynamic `import(...)` calls. The callee is captured so the caller can tell
/// `require` apart from arbitrary identifiers; the anchor restricts @arg to the first argument.
const REQUIRE_OR_DYNAMIC_IMPORT_STR: &'static str = "
    (call_expression
      function: [(identifier) (import)] @callee
      arguments: (arguments . (_) @arg))
";

/// The compiled queries which locate rewritable sites, for one grammar.
pub struct SiteQueries {
    pub import_export_source: TSQuery,
    pub require_or_dynamic_import: TSQuery,
}

impl SiteQueries {
    fn new(language: TSLanguage) -> SiteQueries {
        SiteQueries {
            import_export_source: TSQuery::new(language, IMPORT_EXPORT_SOURCE_STR)
                .expect("import/export source query should compile"),
            require_or_dynamic_import: TSQuery::new(language, REQUIRE_OR_DYNAMIC_IMPORT_STR)
                .expect("require/dynamic-import query should compile"),
        }
    }
}

lazy_static! {
    pub static ref TYPESCRIPT_QUERIES: SiteQueries = SiteQueries::new(language_typescript());
    pub static ref TSX_QUERIES: SiteQueries = SiteQueries::new(language_tsx());
}

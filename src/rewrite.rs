use std::cmp::Reverse;
use std::ops::Range;
use std::path::Path;

use derive_more::{Display, Error, From};
use smallvec::SmallVec;

use crate::ast::tree_sitter::{TSQueryCursor, TSTree, TreeCreateError};
use crate::ast::typed_nodes::AstImportSite;
use crate::ast::Dialect;
use crate::debug;
use crate::diagnostics::FileLogger;
use crate::redirect::{redirect, RedirectCtx};

/// Fatal error for one source unit. Confined to that unit: the driver reports it and moves on to
/// the next file, it never aborts the run.
#[derive(Debug, Display, From, Error)]
pub enum RewriteError {
    TreeCreate(TreeCreateError),
    #[display(fmt = "not a JavaScript/TypeScript file")]
    UnsupportedExtension,
}

/// Result of rewriting one source unit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rewritten {
    /// The full source text, with redirected specifiers spliced in
    pub text: String,
    /// How many sites were redirected. `0` means `text` is the input unchanged
    pub num_redirects: usize,
}

/// One replacement over the original source text, covering a specifier literal (quotes included)
#[derive(Debug)]
struct Edit {
    byte_range: Range<usize>,
    replacement: String,
}

/// Parses the file at `path` (dialect chosen by extension) and rewrites its peer imports.
pub fn rewrite_file(path: &Path, ctx: RedirectCtx<'_>, e: &FileLogger<'_>) -> Result<Rewritten, RewriteError> {
    let dialect = Dialect::of_path(path).ok_or(RewriteError::UnsupportedExtension)?;
    let ast = dialect.parser().lock().parse_file(path)?;
    Ok(rewrite_tree(&ast, dialect, ctx, e))
}

/// [rewrite_file] for already-loaded source text.
pub fn rewrite_source(text: String, dialect: Dialect, ctx: RedirectCtx<'_>, e: &FileLogger<'_>) -> Result<Rewritten, RewriteError> {
    let ast = dialect.parser().lock().parse_string(text)?;
    Ok(rewrite_tree(&ast, dialect, ctx, e))
}

/// Finds every eligible import/require/export-from site, asks the redirector for a replacement
/// specifier, and splices the replacements back over the literals' byte ranges. Splicing runs
/// back-to-front so earlier ranges stay valid; only the literal is replaced, so surrounding
/// structure (e.g. a concatenation around a binary-expression literal) is untouched.
fn rewrite_tree(ast: &TSTree, dialect: Dialect, ctx: RedirectCtx<'_>, e: &FileLogger<'_>) -> Rewritten {
    let queries = dialect.queries();
    let root_node = ast.root_node();
    let mut qc = TSQueryCursor::new();
    let mut edits: SmallVec<[Edit; 8]> = SmallVec::new();

    for site_match in qc.matches(&queries.import_export_source, root_node) {
        let Some(source) = site_match.capture_named("source") else { continue };
        if let Some(site) = AstImportSite::of_import_or_export(source.node) {
            push_edit(&site, ctx, e, &mut edits);
        }
    }
    for call_match in qc.matches(&queries.require_or_dynamic_import, root_node) {
        let Some(callee) = call_match.capture_named("callee") else { continue };
        let Some(arg) = call_match.capture_named("arg") else { continue };
        if let Some(site) = AstImportSite::of_call(callee.node, arg.node) {
            push_edit(&site, ctx, e, &mut edits);
        }
    }

    let num_redirects = edits.len();
    let mut text = ast.text().to_string();
    edits.sort_by_key(|edit| Reverse(edit.byte_range.start));
    for edit in &edits {
        text.replace_range(edit.byte_range.clone(), &edit.replacement);
    }
    Rewritten { text, num_redirects }
}

fn push_edit(site: &AstImportSite<'_>, ctx: RedirectCtx<'_>, e: &FileLogger<'_>, edits: &mut SmallVec<[Edit; 8]>) {
    let site_e = e.at(site.literal.node.start_point());
    debug!(site_e, "{:?} site with static specifier '{}'", site.kind, site.literal.value);
    if let Some(new_specifier) = redirect(ctx, &site.literal.value, &site_e) {
        edits.push(Edit {
            byte_range: site.literal.node.byte_range(),
            replacement: site.literal.requote(&new_specifier),
        });
    }
}

use enquote::unquote;

use crate::ast::tree_sitter::TSNode;

/// String literal node together with its unquoted value
#[derive(Debug, Clone)]
pub struct AstStringLiteral<'tree> {
    pub node: TSNode<'tree>,
    pub value: String,
}

/// Which kind of site an eligible specifier literal was found at
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportSiteKind {
    /// `require('...')`
    Require,
    /// `import('...')`
    DynamicImport,
    /// `import ... from '...'`
    ImportDecl,
    /// `export { ... } from '...'` or `export * from '...'`
    ExportFrom,
}

/// A located import/require/export-from site whose specifier is statically known, and therefore
/// eligible for rewriting. Sites with dynamic specifiers never construct one of these.
#[derive(Debug, Clone)]
pub struct AstImportSite<'tree> {
    pub kind: ImportSiteKind,
    pub literal: AstStringLiteral<'tree>,
}

impl<'tree> AstStringLiteral<'tree> {
    /// `Some` iff `node` is a string literal (template strings don't count)
    pub fn try_new(node: TSNode<'tree>) -> Option<Self> {
        if node.kind() != "string" {
            return None;
        }
        let value = unquote(node.text()).ok()?;
        Some(Self { node, value })
    }

    /// Re-quotes `value` in this literal's original quote style
    pub fn requote(&self, value: &str) -> String {
        let quote = self.node.text().chars().next().unwrap_or('\'');
        format!("{}{}{}", quote, value, quote)
    }
}

impl<'tree> AstImportSite<'tree> {
    /// Site for the `source` string of an `import_statement` or `export_statement`
    pub fn of_import_or_export(source: TSNode<'tree>) -> Option<Self> {
        let literal = AstStringLiteral::try_new(source)?;
        let kind = match source.parent().map(|parent| parent.kind()) {
            Some("import_statement") => ImportSiteKind::ImportDecl,
            Some("export_statement") => ImportSiteKind::ExportFrom,
            _ => return None,
        };
        Some(Self { kind, literal })
    }

    /// Site for a `require(arg)` or `import(arg)` call. `None` when the callee is some other
    /// identifier, or when no string literal can be extracted from `arg`.
    pub fn of_call(callee: TSNode<'tree>, arg: TSNode<'tree>) -> Option<Self> {
        let kind = if callee.kind() == "import" {
            ImportSiteKind::DynamicImport
        } else if callee.text() == "require" {
            ImportSiteKind::Require
        } else {
            return None;
        };
        let literal = Self::unwrap_static_literal(arg)?;
        Some(Self { kind, literal })
    }

    /// A plain string literal, or the literal found by recursively unwrapping the left operand of
    /// a binary (concatenation) expression. The right operand is never inspected; anything else is
    /// dynamic and yields `None`.
    fn unwrap_static_literal(node: TSNode<'tree>) -> Option<AstStringLiteral<'tree>> {
        if let Some(literal) = AstStringLiteral::try_new(node) {
            return Some(literal);
        }
        if node.kind() == "binary_expression" {
            return node.field_child("left").and_then(Self::unwrap_static_literal);
        }
        None
    }
}

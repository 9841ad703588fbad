use std::fs;
use std::iter::{once, Once};
use std::ops::Range;
use std::path::Path;
use std::str::Utf8Error;

use derive_more::{Display, Error, From};

/// A parsed source unit: the tree-sitter tree plus the text it was parsed from.
///
/// Keeping the text alongside the tree lets nodes hand out their source text directly, and lets
/// the rewrite pass splice replacements over node byte ranges.
#[derive(Debug)]
pub struct TSTree {
    text: String,
    tree: tree_sitter::Tree,
}

#[derive(Debug, Clone, Copy)]
pub struct TSNode<'tree> {
    node: tree_sitter::Node<'tree>,
    tree: &'tree TSTree,
}

pub struct TSQueryCursor {
    query_cursor: tree_sitter::QueryCursor
}

pub struct TSQueryMatches<'query, 'tree: 'query> {
    query_matches: tree_sitter::QueryMatches<'query, 'tree, &'query TSTree>,
    tree: &'tree TSTree,
    query: &'query TSQuery
}

#[derive(Debug)]
pub struct TSQueryMatch<'query, 'tree> {
    query_match: tree_sitter::QueryMatch<'query, 'tree>,
    tree: &'tree TSTree,
    query: &'query TSQuery
}

#[derive(Debug, Clone, Copy)]
pub struct TSQueryCapture<'query, 'tree> {
    pub node: TSNode<'tree>,
    pub name: &'query str,
}

pub struct TSParser(tree_sitter::Parser);

pub type TSLanguage = tree_sitter::Language;
pub type TSLanguageError = tree_sitter::LanguageError;
pub type TSQuery = tree_sitter::Query;
pub type TSPoint = tree_sitter::Point;

#[derive(Debug, Display, From, Error)]
pub enum TreeCreateError {
    IO(std::io::Error),
    LoadLanguage(tree_sitter::LanguageError),
    ParsingFailed,
    #[display(fmt = "Invalid UTF-8 at byte index {}", actual_index)]
    NotUtf8 { actual_index: usize, error: Utf8Error }
}

impl TSParser {
    #[inline]
    pub fn new(language: TSLanguage) -> Result<Self, TSLanguageError> {
        let mut parser = tree_sitter::Parser::new();
        parser.set_language(language)?;
        Ok(Self(parser))
    }

    #[inline]
    pub fn parse_file(&mut self, path: &Path) -> Result<TSTree, TreeCreateError> {
        self.parse_bytes(fs::read(path)?)
    }

    #[inline]
    pub fn parse_string(&mut self, text: String) -> Result<TSTree, TreeCreateError> {
        self.parse_bytes(text.into_bytes())
    }

    pub fn parse_bytes(&mut self, byte_text: Vec<u8>) -> Result<TSTree, TreeCreateError> {
        let text = String::from_utf8(byte_text).map_err(|error| TreeCreateError::NotUtf8 {
            actual_index: error.utf8_error().valid_up_to(),
            error: error.utf8_error()
        })?;
        let tree = self.0.parse(text.as_bytes(), None).ok_or(TreeCreateError::ParsingFailed)?;
        Ok(TSTree { text, tree })
    }
}

impl TSTree {
    #[inline]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[inline]
    pub fn root_node(&self) -> TSNode<'_> {
        TSNode::new(self.tree.root_node(), self)
    }
}

impl<'tree> tree_sitter::TextProvider<'tree> for &'tree TSTree {
    type I = Once<&'tree [u8]>;

    #[inline]
    fn text(&mut self, node: tree_sitter::Node<'_>) -> Self::I {
        once(&self.text.as_bytes()[node.byte_range()])
    }
}

impl<'tree> TSNode<'tree> {
    #[inline]
    fn new(node: tree_sitter::Node<'tree>, tree: &'tree TSTree) -> Self {
        Self { node, tree }
    }

    #[inline]
    pub fn kind(&self) -> &'static str {
        self.node.kind()
    }

    #[inline]
    pub fn byte_range(&self) -> Range<usize> {
        self.node.byte_range()
    }

    #[inline]
    pub fn start_point(&self) -> TSPoint {
        self.node.start_position()
    }

    /// Source text of this node. Token boundaries in valid UTF-8 source are always character
    /// boundaries, so the slice cannot split a code point.
    #[inline]
    pub fn text(&self) -> &'tree str {
        &self.tree.text[self.byte_range()]
    }

    #[inline]
    pub fn parent(&self) -> Option<TSNode<'tree>> {
        self.node.parent().map(|node| TSNode::new(node, self.tree))
    }

    #[inline]
    pub fn field_child(&self, field_name: &str) -> Option<TSNode<'tree>> {
        self.node.child_by_field_name(field_name).map(|node| TSNode::new(node, self.tree))
    }
}

impl<'tree> PartialEq<TSNode<'tree>> for TSNode<'tree> {
    #[inline]
    fn eq(&self, other: &TSNode<'tree>) -> bool {
        self.node.id() == other.node.id()
    }
}

impl<'tree> Eq for TSNode<'tree> {}

impl TSQueryCursor {
    #[inline]
    pub fn new() -> Self {
        Self { query_cursor: tree_sitter::QueryCursor::new() }
    }

    #[inline]
    pub fn matches<'query, 'tree: 'query>(&'query mut self, query: &'query TSQuery, node: TSNode<'tree>) -> TSQueryMatches<'query, 'tree> {
        TSQueryMatches {
            query_matches: self.query_cursor.matches(query, node.node, node.tree),
            tree: node.tree,
            query
        }
    }
}

impl Default for TSQueryCursor {
    fn default() -> Self {
        Self::new()
    }
}

impl<'query, 'tree: 'query> Iterator for TSQueryMatches<'query, 'tree> {
    type Item = TSQueryMatch<'query, 'tree>;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.query_matches.next().map(|query_match| TSQueryMatch {
            query_match,
            tree: self.tree,
            query: self.query
        })
    }
}

impl<'query, 'tree> TSQueryMatch<'query, 'tree> {
    #[inline]
    pub fn iter_captures(&self) -> impl Iterator<Item = TSQueryCapture<'query, 'tree>> + '_ {
        self.query_match.captures.iter().map(|&query_capture|
            TSQueryCapture::new(query_capture, self.tree, self.query))
    }

    #[inline]
    pub fn capture_named(&self, name: &str) -> Option<TSQueryCapture<'query, 'tree>> {
        self.iter_captures().find(|capture| capture.name == name)
    }
}

impl<'query, 'tree> TSQueryCapture<'query, 'tree> {
    #[inline]
    fn new(query_capture: tree_sitter::QueryCapture<'tree>, tree: &'tree TSTree, query: &'query TSQuery) -> Self {
        Self {
            node: TSNode::new(query_capture.node, tree),
            name: &query.capture_names()[query_capture.index as usize]
        }
    }
}

//! Byte spans in a single coordinate frame.

use tree_sitter::{Node, Point};

/// A half-open byte range within one text buffer.
///
/// Spans never cross coordinate frames: a span produced from a region's
/// local parse stays local until the extractor remaps it.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn of(node: &Node) -> Self {
        Self { start: node.start_byte(), end: node.end_byte() }
    }

    pub fn contains(&self, byte: usize) -> bool {
        self.start <= byte && byte < self.end
    }

    pub fn text<'t>(&self, text: &'t str) -> &'t str {
        text.get(self.start..self.end).unwrap_or("")
    }
}

/// Compute the tree-sitter [`Point`] (row, byte column) of `byte` in `text`.
pub fn point_of(text: &str, byte: usize) -> Point {
    let byte = byte.min(text.len());
    let before = &text.as_bytes()[..byte];
    let row = before.iter().filter(|&&b| b == b'\n').count();
    let line_start = before.iter().rposition(|&b| b == b'\n').map(|i| i + 1).unwrap_or(0);
    Point { row, column: byte - line_start }
}

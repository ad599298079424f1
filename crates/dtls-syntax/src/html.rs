//! HTML syntax wrapper: locating style tags and style attributes.

use tree_sitter::{Language, Parser, Query, QueryCursor, StreamingIterator, Tree};

use crate::error::SyntaxError;
use crate::span::Span;

const STYLE_ELEMENT_QUERY: &str = r#"
(style_element (raw_text) @css)
"#;

const STYLE_ATTRIBUTE_QUERY: &str = r#"
((attribute
   (attribute_name) @name
   (quoted_attribute_value (attribute_value) @value))
 (#eq? @name "style"))
"#;

/// A `style="..."` attribute value, excluding its quotes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StyleAttribute {
    pub value_span: Span,
}

/// One tree-sitter HTML parser plus its compiled queries.
pub struct HtmlSyntax {
    parser: Parser,
    style_element_query: Query,
    style_attribute_query: Query,
    value_capture: u32,
}

impl HtmlSyntax {
    pub fn new() -> Result<Self, SyntaxError> {
        let language: Language = tree_sitter_html::LANGUAGE.into();
        let mut parser = Parser::new();
        parser.set_language(&language)?;
        let style_element_query = Query::new(&language, STYLE_ELEMENT_QUERY)?;
        let style_attribute_query = Query::new(&language, STYLE_ATTRIBUTE_QUERY)?;
        let value_capture = style_attribute_query.capture_index_for_name("value").unwrap_or(0);
        Ok(Self { parser, style_element_query, style_attribute_query, value_capture })
    }

    pub fn parse(&mut self, text: &str) -> Option<Tree> {
        self.parser.parse(text, None)
    }

    pub(crate) fn reset_parser(&mut self) {
        self.parser.reset();
    }

    /// Raw-text spans of `<style>` elements, in document order.
    pub fn style_elements(&mut self, tree: &Tree, text: &str) -> Vec<Span> {
        let mut cursor = QueryCursor::new();
        let mut matches =
            cursor.matches(&self.style_element_query, tree.root_node(), text.as_bytes());
        let mut out = Vec::new();
        while let Some(m) = matches.next() {
            for capture in m.captures {
                out.push(Span::of(&capture.node));
            }
        }
        out.sort_by_key(|s| s.start);
        out
    }

    /// Value spans of `style="..."` attributes, in document order.
    pub fn style_attributes(&mut self, tree: &Tree, text: &str) -> Vec<StyleAttribute> {
        let mut cursor = QueryCursor::new();
        let mut matches =
            cursor.matches(&self.style_attribute_query, tree.root_node(), text.as_bytes());
        let mut out = Vec::new();
        while let Some(m) = matches.next() {
            for capture in m.captures {
                if capture.index == self.value_capture {
                    out.push(StyleAttribute { value_span: Span::of(&capture.node) });
                }
            }
        }
        out.sort_by_key(|a| a.value_span.start);
        out
    }
}

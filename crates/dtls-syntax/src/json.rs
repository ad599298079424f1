//! JSON syntax wrapper for token documents.
//!
//! Token files need span-accurate positions for `$value` strings (reference
//! diagnostics, hover) and for arbitrary member paths (go-to-definition), so
//! token JSON documents keep a tree alongside the decoded value.

use tree_sitter::{Language, Node, Parser, Tree};

use crate::error::SyntaxError;
use crate::span::Span;

/// A `$value` string in a token document.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ValueString {
    /// Span of the string content, excluding the quotes.
    pub span: Span,
    pub text: String,
    /// Object keys from the document root down to the token node that owns
    /// this `$value` (the `$value` key itself excluded).
    pub token_path: Vec<String>,
}

/// One tree-sitter JSON parser.
pub struct JsonSyntax {
    parser: Parser,
}

impl JsonSyntax {
    pub fn new() -> Result<Self, SyntaxError> {
        let language: Language = tree_sitter_json::LANGUAGE.into();
        let mut parser = Parser::new();
        parser.set_language(&language)?;
        Ok(Self { parser })
    }

    pub fn parse(&mut self, text: &str) -> Option<Tree> {
        self.parser.parse(text, None)
    }

    pub(crate) fn reset_parser(&mut self) {
        self.parser.reset();
    }

    /// All `$value` string members, with their owning token paths.
    pub fn token_values(&self, tree: &Tree, text: &str) -> Vec<ValueString> {
        let mut out = Vec::new();
        if let Some(root) = root_object(tree) {
            collect_values(&root, text, &mut Vec::new(), &mut out);
        }
        out
    }

    /// Span of the key naming the member reached by walking `path` from the
    /// document root object.
    pub fn find_member(&self, tree: &Tree, text: &str, path: &[&str]) -> Option<Span> {
        let mut node = root_object(tree)?;
        let mut key_span = None;
        for segment in path {
            let (key, value) = member(&node, text, segment)?;
            key_span = Some(key);
            node = value;
        }
        key_span
    }
}

fn root_object(tree: &Tree) -> Option<Node<'_>> {
    let root = tree.root_node();
    let mut cursor = root.walk();
    root.children(&mut cursor).find(|c| c.kind() == "object")
}

/// Find a member of `object` by key, returning the key content span and the
/// value node.
fn member<'t>(object: &Node<'t>, text: &str, key: &str) -> Option<(Span, Node<'t>)> {
    if object.kind() != "object" {
        return None;
    }
    let mut cursor = object.walk();
    for pair in object.children(&mut cursor) {
        if pair.kind() != "pair" {
            continue;
        }
        let Some(key_node) = pair.child_by_field_name("key") else { continue };
        let Some(value_node) = pair.child_by_field_name("value") else { continue };
        if string_content(&key_node, text).map(|(_, t)| t) == Some(key) {
            let span = string_content(&key_node, text)
                .map(|(s, _)| s)
                .unwrap_or_else(|| Span::of(&key_node));
            return Some((span, value_node));
        }
    }
    None
}

fn collect_values(
    object: &Node,
    text: &str,
    path: &mut Vec<String>,
    out: &mut Vec<ValueString>,
) {
    let mut cursor = object.walk();
    for pair in object.children(&mut cursor) {
        if pair.kind() != "pair" {
            continue;
        }
        let Some(key_node) = pair.child_by_field_name("key") else { continue };
        let Some(value_node) = pair.child_by_field_name("value") else { continue };
        let Some((_, key)) = string_content(&key_node, text) else { continue };
        if key == "$value" {
            if let Some((span, value)) = string_content(&value_node, text) {
                out.push(ValueString {
                    span,
                    text: value.to_string(),
                    token_path: path.clone(),
                });
            }
        } else if value_node.kind() == "object" {
            path.push(key.to_string());
            collect_values(&value_node, text, path, out);
            path.pop();
        }
    }
}

/// Content span and text of a JSON string node, excluding the quotes.
fn string_content<'t>(node: &Node, text: &'t str) -> Option<(Span, &'t str)> {
    if node.kind() != "string" {
        return None;
    }
    let span = Span::new(node.start_byte() + 1, node.end_byte().saturating_sub(1));
    if span.end < span.start {
        return None;
    }
    Some((span, span.text(text)))
}

//! CSS syntax wrapper: parsing and the var()/light-dark() queries.

use tree_sitter::{Language, Node, Parser, Query, QueryCursor, StreamingIterator, Tree};

use crate::error::SyntaxError;
use crate::span::{Span, point_of};

/// Matches `var(...)` calls, anchored on the first argument so a fallback
/// does not produce a second match.
const VAR_CALL_QUERY: &str = r#"
((call_expression
   (function_name) @fn
   (arguments . (plain_value) @token-name)) @call
 (#eq? @fn "var"))
"#;

/// A `var(--token, fallback?)` occurrence, in the coordinate frame of the
/// parsed text.
#[derive(Clone, Debug, PartialEq)]
pub struct VarCall {
    /// Token name as written, including its leading dashes.
    pub token_name: String,
    /// Span of the name argument (`--token`).
    pub name_span: Span,
    /// Span of the whole `var(...)` expression.
    pub call_span: Span,
    pub fallback: Option<Fallback>,
}

/// The second argument of a `var()` call.
#[derive(Clone, Debug, PartialEq)]
pub struct Fallback {
    pub text: String,
    pub span: Span,
}

/// One tree-sitter CSS parser plus its compiled queries.
///
/// Instances are not shared between threads; acquire one from
/// [`crate::SyntaxPools`] instead.
pub struct CssSyntax {
    parser: Parser,
    var_query: Query,
    call_capture: u32,
    name_capture: u32,
}

impl CssSyntax {
    pub fn new() -> Result<Self, SyntaxError> {
        let language: Language = tree_sitter_css::LANGUAGE.into();
        let mut parser = Parser::new();
        parser.set_language(&language)?;
        let var_query = Query::new(&language, VAR_CALL_QUERY)?;
        let call_capture = var_query.capture_index_for_name("call").unwrap_or(0);
        let name_capture = var_query.capture_index_for_name("token-name").unwrap_or(0);
        Ok(Self { parser, var_query, call_capture, name_capture })
    }

    pub fn parse(&mut self, text: &str) -> Option<Tree> {
        self.parser.parse(text, None)
    }

    pub(crate) fn reset_parser(&mut self) {
        self.parser.reset();
    }

    /// Reparse after an edit, reusing the previous tree.
    ///
    /// The caller must have applied the matching [`tree_sitter::InputEdit`]
    /// to `old_tree` first.
    pub fn reparse(&mut self, text: &str, old_tree: &Tree) -> Option<Tree> {
        self.parser.parse(text, Some(old_tree))
    }

    /// Apply a full-text replacement edit to `tree` so [`Self::reparse`]
    /// can reuse it: edit from byte 0 to the old length.
    pub fn edit_for_replacement(tree: &mut Tree, new_text: &str) {
        let old_end = tree.root_node().end_byte();
        let old_end_position = tree.root_node().end_position();
        tree.edit(&tree_sitter::InputEdit {
            start_byte: 0,
            old_end_byte: old_end,
            new_end_byte: new_text.len(),
            start_position: tree_sitter::Point { row: 0, column: 0 },
            old_end_position,
            new_end_position: point_of(new_text, new_text.len()),
        });
    }

    /// All `var()` calls in the tree, in document order.
    pub fn var_calls(&mut self, tree: &Tree, text: &str) -> Vec<VarCall> {
        let mut cursor = QueryCursor::new();
        let mut matches = cursor.matches(&self.var_query, tree.root_node(), text.as_bytes());
        let mut out = Vec::new();
        while let Some(m) = matches.next() {
            let mut call: Option<Node> = None;
            let mut name: Option<Node> = None;
            for capture in m.captures {
                if capture.index == self.call_capture {
                    call = Some(capture.node);
                } else if capture.index == self.name_capture {
                    name = Some(capture.node);
                }
            }
            let (Some(call), Some(name)) = (call, name) else { continue };
            let token_name = Span::of(&name).text(text).to_string();
            if !token_name.starts_with("--") {
                continue;
            }
            out.push(VarCall {
                token_name,
                name_span: Span::of(&name),
                call_span: Span::of(&call),
                fallback: fallback_of(&call, text),
            });
        }
        out.sort_by_key(|c| c.call_span.start);
        out
    }

    /// Only the `var()` calls that carry a non-empty fallback argument.
    pub fn var_calls_with_fallback(&mut self, tree: &Tree, text: &str) -> Vec<VarCall> {
        self.var_calls(tree, text).into_iter().filter(|c| c.fallback.is_some()).collect()
    }

    /// The arguments of `light-dark(a, b)` when `value` is exactly one
    /// such expression, as written.
    pub fn light_dark_args(&mut self, value: &str) -> Option<(String, String)> {
        let wrapped = format!("x{{a:{}}}", value);
        let tree = self.parse(&wrapped)?;
        let call = find_call(tree.root_node(), &wrapped, "light-dark")?;
        let mut cursor = call.walk();
        let args = call.children(&mut cursor).find(|c| c.kind() == "arguments")?;
        let groups = argument_groups(&args);
        if groups.len() != 2 {
            return None;
        }
        Some((groups[0].text(&wrapped).to_string(), groups[1].text(&wrapped).to_string()))
    }

    /// The smallest named node containing `byte`, as `(kind, span)`.
    pub fn node_at_byte(&self, tree: &Tree, byte: usize) -> Option<(String, Span)> {
        let node = tree.root_node().named_descendant_for_byte_range(byte, byte)?;
        Some((node.kind().to_string(), Span::of(&node)))
    }
}

/// Extract the fallback span of a `var()` call node: everything from the
/// first argument node after the comma to the last argument node.
fn fallback_of(call: &Node, text: &str) -> Option<Fallback> {
    let mut cursor = call.walk();
    let args = call.children(&mut cursor).find(|c| c.kind() == "arguments")?;
    let groups = argument_groups(&args);
    if groups.len() < 2 {
        return None;
    }
    let span = Span::new(groups[1].start, groups.last()?.end);
    let fallback_text = span.text(text).trim();
    if fallback_text.is_empty() {
        return None;
    }
    Some(Fallback { text: fallback_text.to_string(), span })
}

/// Group the named children of an `arguments` node by the commas between
/// them. Each group spans from its first to its last node, so multi-node
/// arguments (`1px solid red`) stay whole.
fn argument_groups(args: &Node) -> Vec<Span> {
    let mut groups: Vec<Span> = Vec::new();
    let mut current: Option<Span> = None;
    let mut cursor = args.walk();
    for child in args.children(&mut cursor) {
        match child.kind() {
            "," => {
                if let Some(span) = current.take() {
                    groups.push(span);
                } else {
                    groups.push(Span::new(child.start_byte(), child.start_byte()));
                }
            }
            "(" | ")" => {}
            _ => {
                let span = Span::of(&child);
                current = Some(match current {
                    Some(acc) => Span::new(acc.start, span.end),
                    None => span,
                });
            }
        }
    }
    if let Some(span) = current.take() {
        groups.push(span);
    }
    groups
}

/// Depth-first search for a call expression with the given function name.
fn find_call<'t>(node: Node<'t>, text: &str, name: &str) -> Option<Node<'t>> {
    if node.kind() == "call_expression" {
        let mut cursor = node.walk();
        let matched = node
            .children(&mut cursor)
            .any(|c| c.kind() == "function_name" && Span::of(&c).text(text) == name);
        if matched {
            return Some(node);
        }
    }
    let mut cursor = node.walk();
    let children: Vec<Node> = node.children(&mut cursor).collect();
    children.into_iter().find_map(|c| find_call(c, text, name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn syntax() -> CssSyntax {
        CssSyntax::new().unwrap()
    }

    #[test]
    fn finds_var_call_and_name_span() {
        let mut css = syntax();
        let text = "body { color: var(--color-primary); }";
        let tree = css.parse(text).unwrap();
        let calls = css.var_calls(&tree, text);
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].token_name, "--color-primary");
        assert_eq!(calls[0].name_span.text(text), "--color-primary");
        assert_eq!(calls[0].call_span.text(text), "var(--color-primary)");
        assert!(calls[0].fallback.is_none());
    }

    #[test]
    fn fallback_span_covers_second_argument() {
        let mut css = syntax();
        let text = ".a{margin:var(--spacing-sm,10px)}";
        let tree = css.parse(text).unwrap();
        let calls = css.var_calls_with_fallback(&tree, text);
        assert_eq!(calls.len(), 1);
        let fallback = calls[0].fallback.as_ref().unwrap();
        assert_eq!(fallback.text, "10px");
        assert_eq!(fallback.span.text(text), "10px");
    }

    #[test]
    fn multi_node_fallback_stays_whole() {
        let mut css = syntax();
        let text = ".a{border:var(--b, 1px solid red)}";
        let tree = css.parse(text).unwrap();
        let calls = css.var_calls_with_fallback(&tree, text);
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].fallback.as_ref().unwrap().text, "1px solid red");
    }

    #[test]
    fn nested_var_fallback() {
        let mut css = syntax();
        let text = ".a{color:var(--x, var(--y))}";
        let tree = css.parse(text).unwrap();
        let calls = css.var_calls(&tree, text);
        // Outer and inner calls both match.
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0].token_name, "--x");
        assert_eq!(calls[0].fallback.as_ref().unwrap().text, "var(--y)");
        assert_eq!(calls[1].token_name, "--y");
    }

    #[test]
    fn other_functions_do_not_match() {
        let mut css = syntax();
        let text = ".a{width:calc(100% - 2px)}";
        let tree = css.parse(text).unwrap();
        assert!(css.var_calls(&tree, text).is_empty());
    }

    #[test]
    fn empty_stylesheet_has_no_calls() {
        let mut css = syntax();
        let tree = css.parse("").unwrap();
        assert!(css.var_calls(&tree, "").is_empty());
    }

    #[test]
    fn light_dark_arguments() {
        let mut css = syntax();
        let args = css.light_dark_args("light-dark(#fff, #000)").unwrap();
        assert_eq!(args, ("#fff".to_string(), "#000".to_string()));
    }

    #[test]
    fn light_dark_requires_two_args() {
        let mut css = syntax();
        assert_eq!(css.light_dark_args("#fff"), None);
    }

    #[test]
    fn incremental_replacement_reuses_tree() {
        let mut css = syntax();
        let old = ".a{color:var(--x)}";
        let mut tree = css.parse(old).unwrap();
        let new = ".a{color:var(--y)} .b{margin:var(--m,4px)}";
        CssSyntax::edit_for_replacement(&mut tree, new);
        let tree = css.reparse(new, &tree).unwrap();
        let calls = css.var_calls(&tree, new);
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0].token_name, "--y");
        assert_eq!(calls[1].token_name, "--m");
    }
}

//! Language feature handlers.

mod code_action;
mod colors;
mod completion;
mod definition;
mod diagnostics;
mod hover;

use lsp_types::Range;
use serde_json::Value;

use dtls_protocol::{JsonRpcError, invalid_params};
use dtls_syntax::{Span, SyntaxPools};
use dtls_tokens::{Token, TokenRegistry, references};

use crate::state::{Document, DocumentKind, scan_var_calls, yaml_value_strings};

/// Pull `(uri, line, character)` out of a positional request.
fn uri_and_position(params: &Option<Value>) -> Result<(String, u32, u32), JsonRpcError> {
    let params = params.as_ref().ok_or_else(|| invalid_params("request requires params"))?;
    let uri = params
        .pointer("/textDocument/uri")
        .and_then(Value::as_str)
        .ok_or_else(|| invalid_params("missing textDocument.uri"))?;
    let line = params
        .pointer("/position/line")
        .and_then(Value::as_u64)
        .ok_or_else(|| invalid_params("missing position.line"))? as u32;
    let character = params
        .pointer("/position/character")
        .and_then(Value::as_u64)
        .ok_or_else(|| invalid_params("missing position.character"))? as u32;
    Ok((uri.to_string(), line, character))
}

fn params_uri(params: &Option<Value>) -> Result<String, JsonRpcError> {
    params
        .as_ref()
        .and_then(|p| p.pointer("/textDocument/uri"))
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| invalid_params("missing textDocument.uri"))
}

/// The token name under the cursor of a CSS or CSS-bearing document: the
/// nearest `var()` name argument, or a `--foo` identifier in plain CSS.
fn css_token_name_at(
    doc: &Document,
    line: u32,
    character: u32,
    pools: &SyntaxPools,
) -> Option<(String, Range)> {
    for call in scan_var_calls(doc, pools) {
        if crate::state::range_contains(&call.name_range, line, character) {
            return Some((call.token_name, call.name_range));
        }
    }
    // Plain CSS also answers on custom property identifiers outside var().
    if doc.kind == DocumentKind::Css {
        let byte = doc.position_to_byte(line, character);
        let tree = doc.tree()?;
        let css = pools.css().ok()?;
        let (kind, span) = css.node_at_byte(tree, byte)?;
        if matches!(kind.as_str(), "plain_value" | "property_name") {
            let text = span.text(doc.text());
            if text.starts_with("--") {
                return Some((text.to_string(), span_to_range(doc, &span)));
            }
        }
    }
    None
}

fn span_to_range(doc: &Document, span: &Span) -> Range {
    let (sl, sc) = doc.byte_to_position(span.start);
    let (el, ec) = doc.byte_to_position(span.end);
    Range::new(lsp_types::Position::new(sl, sc), lsp_types::Position::new(el, ec))
}

/// The `{...}` reference under the cursor of a token document, with its
/// absolute byte span in the document.
fn reference_at(
    doc: &Document,
    byte: usize,
    pools: &SyntaxPools,
) -> Option<(Vec<String>, Span)> {
    let values: Vec<(String, Span)> = match doc.kind {
        DocumentKind::TokenJson => {
            let tree = doc.tree()?;
            let json = pools.json().ok()?;
            json.token_values(tree, doc.text())
                .into_iter()
                .map(|v| (v.text, v.span))
                .collect()
        }
        DocumentKind::TokenYaml => yaml_value_strings(doc.text()),
        _ => return None,
    };
    for (text, span) in values {
        if !span.contains(byte) {
            continue;
        }
        let relative = byte - span.start;
        for reference in references(&text) {
            if reference.start <= relative && relative < reference.end {
                let absolute = Span::new(span.start + reference.start, span.start + reference.end);
                return Some((reference.path, absolute));
            }
        }
    }
    None
}

/// The shared hover/completion documentation block: dashed name heading,
/// type, description, and the resolved value in a fenced css block
/// (light-dark values expand across lines).
fn token_markdown(token: &Token, registry: &TokenRegistry, pools: &SyntaxPools) -> String {
    let mut md = format!("# `{}`\n\n", token.dashed_name());
    if let Some(ty) = &token.ty {
        md.push_str(&format!("Type: `{ty}`\n\n"));
    }
    if let Some(description) = &token.description {
        md.push_str(&format!("{description}\n\n"));
    }
    let resolved = registry
        .resolved_value(&token.name)
        .map(str::to_string)
        .unwrap_or_else(|| token.value_string());
    md.push_str(&format!("```css\n{}\n```", display_value(&resolved, pools)));
    md
}

/// Pretty-print one-line `light-dark(...)` values; everything else is
/// shown as resolved.
fn display_value(resolved: &str, pools: &SyntaxPools) -> String {
    if resolved.starts_with("light-dark(") && !resolved.contains('\n') {
        if let Ok(mut css) = pools.css() {
            if let Some((light, dark)) = css.light_dark_args(resolved) {
                return format!("light-dark(\n  {light},\n  {dark}\n)");
            }
        }
    }
    resolved.to_string()
}

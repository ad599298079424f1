//! Document-wide var() scanning in host coordinates.
//!
//! Handlers never look at region-local spans: this module parses each CSS
//! region (or the CSS document itself), collects `var()` calls, and remaps
//! every range into host-document UTF-16 coordinates.

use dtls_extract::{CssRegion, extract_regions};
use dtls_position::LineIndex;
use dtls_syntax::{Span, SyntaxPools};
use lsp_types::{Position, Range};
use serde_json::Value;

use crate::state::document::{Document, DocumentKind};

/// A `var()` call with all ranges in host UTF-16 coordinates.
#[derive(Clone, Debug)]
pub struct ScannedVarCall {
    /// Name as written, leading dashes included.
    pub token_name: String,
    pub name_range: Range,
    pub call_range: Range,
    pub fallback: Option<ScannedFallback>,
}

#[derive(Clone, Debug)]
pub struct ScannedFallback {
    pub text: String,
    pub range: Range,
}

pub(crate) fn range(sl: u32, sc: u32, el: u32, ec: u32) -> Range {
    Range::new(Position::new(sl, sc), Position::new(el, ec))
}

pub(crate) fn range_json(sl: u32, sc: u32, el: u32, ec: u32) -> Value {
    serde_json::to_value(range(sl, sc, el, ec)).unwrap_or_default()
}

pub(crate) fn contains(range: &Range, line: u32, character: u32) -> bool {
    let after_start = (line, character) >= (range.start.line, range.start.character);
    let before_end = (line, character) < (range.end.line, range.end.character);
    after_start && before_end
}

/// All `var()` calls of a document, in document order.
///
/// Token documents yield nothing. Regions that fail to parse contribute
/// nothing; the rest are still scanned.
pub fn scan_var_calls(doc: &Document, pools: &SyntaxPools) -> Vec<ScannedVarCall> {
    match doc.kind {
        DocumentKind::Css => scan_own_tree(doc, pools),
        DocumentKind::Host(_) => scan_regions(doc, pools),
        DocumentKind::TokenJson | DocumentKind::TokenYaml => Vec::new(),
    }
}

fn scan_own_tree(doc: &Document, pools: &SyntaxPools) -> Vec<ScannedVarCall> {
    let Some(tree) = doc.tree() else { return Vec::new() };
    let Ok(mut css) = pools.css() else { return Vec::new() };
    let text = doc.text();
    css.var_calls(tree, text)
        .into_iter()
        .map(|call| {
            let to_range = |span: &Span| {
                let (sl, sc) = doc.byte_to_position(span.start);
                let (el, ec) = doc.byte_to_position(span.end);
                range(sl, sc, el, ec)
            };
            ScannedVarCall {
                name_range: to_range(&call.name_span),
                call_range: to_range(&call.call_span),
                fallback: call.fallback.as_ref().map(|f| ScannedFallback {
                    text: f.text.clone(),
                    range: to_range(&f.span),
                }),
                token_name: call.token_name,
            }
        })
        .collect()
}

fn scan_regions(doc: &Document, pools: &SyntaxPools) -> Vec<ScannedVarCall> {
    let mut out = Vec::new();
    for region in extract_regions(&doc.language_id, doc.text(), pools) {
        let Ok(mut css) = pools.css() else { continue };
        let Some(tree) = css.parse(&region.content) else { continue };
        let index = LineIndex::new(&region.content);
        for call in css.var_calls(&tree, &region.content) {
            let to_range = |span: &Span| region_range(&region, &index, span);
            out.push(ScannedVarCall {
                name_range: to_range(&call.name_span),
                call_range: to_range(&call.call_span),
                fallback: call.fallback.as_ref().map(|f| ScannedFallback {
                    text: f.text.clone(),
                    range: to_range(&f.span),
                }),
                token_name: call.token_name,
            });
        }
    }
    out.sort_by_key(|c| (c.call_range.start.line, c.call_range.start.character));
    out
}

/// Remap a region-local span to a host-coordinate range.
fn region_range(region: &CssRegion, index: &LineIndex, span: &Span) -> Range {
    let (sl, sc) = index.byte_to_position(&region.content, span.start);
    let (el, ec) = index.byte_to_position(&region.content, span.end);
    let (host_sl, host_sc) = region.to_host(sl, sc);
    let (host_el, host_ec) = region.to_host(el, ec);
    range(host_sl, host_sc, host_el, host_ec)
}

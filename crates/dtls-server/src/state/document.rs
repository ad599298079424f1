//! Per-document state.
//!
//! Three behaviors share one lifecycle: CSS documents own an incrementally
//! updated tree-sitter tree; token documents (JSON/YAML) carry the state
//! needed for reference diagnostics and definition; CSS-bearing host
//! documents (HTML, JS/TS) re-extract their embedded regions on demand.
//!
//! Content is kept as a rope for edits plus a cached `String` for the
//! parsers and analysis code that want `&str`.

use dtls_position::LineIndex;
use dtls_protocol::{JsonRpcError, invalid_params};
use dtls_syntax::{CssSyntax, ScriptLang, SyntaxPools, Tree, point_of};
use dtls_tokens::{TokenRegistry, references};
use ropey::Rope;
use serde_json::Value;

use crate::state::scan::{range_json, scan_var_calls};
use crate::state::yaml_scan::yaml_value_strings;

/// Document behavior, selected from the LSP `languageId`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum DocumentKind {
    /// Plain CSS; the whole text is one region at offset zero.
    Css,
    /// A host language with embedded CSS regions.
    Host(HostKind),
    /// DTCG token document kept with a tree-sitter JSON tree.
    TokenJson,
    /// DTCG token document; spans are recovered by text scanning.
    TokenYaml,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum HostKind {
    Html,
    Script(ScriptLang),
}

impl DocumentKind {
    pub fn from_language_id(language_id: &str) -> Option<Self> {
        match language_id {
            "css" => Some(DocumentKind::Css),
            "html" => Some(DocumentKind::Host(HostKind::Html)),
            "javascript" | "javascriptreact" => {
                Some(DocumentKind::Host(HostKind::Script(ScriptLang::Javascript)))
            }
            "typescript" => Some(DocumentKind::Host(HostKind::Script(ScriptLang::Typescript))),
            "typescriptreact" => Some(DocumentKind::Host(HostKind::Script(ScriptLang::Tsx))),
            "json" => Some(DocumentKind::TokenJson),
            "yaml" => Some(DocumentKind::TokenYaml),
            _ => None,
        }
    }

    pub fn is_token_document(&self) -> bool {
        matches!(self, DocumentKind::TokenJson | DocumentKind::TokenYaml)
    }
}

pub struct Document {
    pub uri: String,
    pub language_id: String,
    pub kind: DocumentKind,
    pub version: i32,
    rope: Rope,
    text: String,
    line_index: LineIndex,
    /// CSS tree for [`DocumentKind::Css`], JSON tree for
    /// [`DocumentKind::TokenJson`]. Host documents re-extract instead.
    tree: Option<Tree>,
    /// Cached diagnostics, recomputed after every successful update.
    pub diagnostics: Vec<Value>,
}

impl Document {
    pub fn new(
        uri: String,
        language_id: String,
        text: String,
        version: i32,
        pools: &SyntaxPools,
    ) -> Result<Self, JsonRpcError> {
        let kind = DocumentKind::from_language_id(&language_id)
            .ok_or_else(|| invalid_params(format!("unsupported languageId: {language_id}")))?;
        let mut doc = Self {
            uri,
            language_id,
            kind,
            version,
            rope: Rope::from_str(&text),
            line_index: LineIndex::new(&text),
            text,
            tree: None,
            diagnostics: Vec::new(),
        };
        doc.tree = doc.parse(pools, None);
        Ok(doc)
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn line_index(&self) -> &LineIndex {
        &self.line_index
    }

    pub fn tree(&self) -> Option<&Tree> {
        self.tree.as_ref()
    }

    pub fn position_to_byte(&self, line: u32, character: u32) -> usize {
        self.line_index.position_to_byte(&self.text, line, character)
    }

    pub fn byte_to_position(&self, byte: usize) -> (u32, u32) {
        self.line_index.byte_to_position(&self.text, byte)
    }

    /// Apply `contentChanges` in order. The caller has already validated
    /// the version monotonicity.
    pub fn apply_changes(
        &mut self,
        changes: &[Value],
        version: i32,
        pools: &SyntaxPools,
    ) -> Result<(), JsonRpcError> {
        for change in changes {
            let new_text = change
                .get("text")
                .and_then(Value::as_str)
                .ok_or_else(|| invalid_params("contentChanges entry is missing text"))?;
            match change.get("range") {
                Some(range) => self.apply_range_edit(range, new_text, pools)?,
                None => self.replace_all(new_text, pools),
            }
        }
        self.version = version;
        Ok(())
    }

    fn replace_all(&mut self, new_text: &str, pools: &SyntaxPools) {
        let old_tree = self.tree.take().map(|mut tree| {
            CssSyntax::edit_for_replacement(&mut tree, new_text);
            tree
        });
        self.rope = Rope::from_str(new_text);
        self.text = new_text.to_string();
        self.line_index = LineIndex::new(&self.text);
        self.tree = self.parse(pools, old_tree.as_ref());
    }

    fn apply_range_edit(
        &mut self,
        range: &Value,
        new_text: &str,
        pools: &SyntaxPools,
    ) -> Result<(), JsonRpcError> {
        let position = |which: &str, field: &str| -> Result<u32, JsonRpcError> {
            range
                .pointer(&format!("/{which}/{field}"))
                .and_then(Value::as_u64)
                .map(|v| v as u32)
                .ok_or_else(|| invalid_params("contentChanges range is malformed"))
        };
        let start =
            self.position_to_byte(position("start", "line")?, position("start", "character")?);
        let end = self.position_to_byte(position("end", "line")?, position("end", "character")?);
        if end < start {
            return Err(invalid_params("contentChanges range end precedes start"));
        }

        let start_point = point_of(&self.text, start);
        let old_end_point = point_of(&self.text, end);

        let start_char = self.rope.byte_to_char(start);
        let end_char = self.rope.byte_to_char(end);
        self.rope.remove(start_char..end_char);
        if !new_text.is_empty() {
            self.rope.insert(start_char, new_text);
        }
        self.text = self.rope.to_string();
        self.line_index = LineIndex::new(&self.text);

        let old_tree = self.tree.take().map(|mut tree| {
            tree.edit(&dtls_syntax::InputEdit {
                start_byte: start,
                old_end_byte: end,
                new_end_byte: start + new_text.len(),
                start_position: start_point,
                old_end_position: old_end_point,
                new_end_position: point_of(&self.text, start + new_text.len()),
            });
            tree
        });
        self.tree = self.parse(pools, old_tree.as_ref());
        Ok(())
    }

    /// Parse the document's own tree, reusing `old_tree` when the grammar
    /// supports it. Host documents have no document-wide tree.
    fn parse(&self, pools: &SyntaxPools, old_tree: Option<&Tree>) -> Option<Tree> {
        match self.kind {
            DocumentKind::Css => {
                let mut css = pools.css().ok()?;
                match old_tree {
                    Some(old) => css.reparse(&self.text, old),
                    None => css.parse(&self.text),
                }
            }
            DocumentKind::TokenJson => {
                let mut json = pools.json().ok()?;
                json.parse(&self.text)
            }
            DocumentKind::Host(_) | DocumentKind::TokenYaml => None,
        }
    }

    /// Recompute and cache the document's diagnostics.
    pub fn recompute_diagnostics(&mut self, pools: &SyntaxPools, registry: &TokenRegistry) {
        self.diagnostics = match self.kind {
            DocumentKind::Css | DocumentKind::Host(_) => {
                self.fallback_diagnostics(pools, registry)
            }
            DocumentKind::TokenJson => self.json_reference_diagnostics(pools, registry),
            DocumentKind::TokenYaml => self.yaml_reference_diagnostics(registry),
        };
    }

    /// `incorrectFallback`: a known token's fallback text differs from its
    /// resolved value byte-for-byte after trimming outer whitespace.
    fn fallback_diagnostics(&self, pools: &SyntaxPools, registry: &TokenRegistry) -> Vec<Value> {
        let mut out = Vec::new();
        for call in scan_var_calls(self, pools) {
            let Some(fallback) = &call.fallback else { continue };
            let Some(resolved) = registry.resolved_value(&call.token_name) else { continue };
            if fallback.text.trim() != resolved {
                out.push(serde_json::json!({
                    "range": fallback.range,
                    "severity": 1,
                    "code": "incorrectFallback",
                    "source": "design-tokens-language-server",
                    "message": format!(
                        "Fallback does not match the token value: expected `{resolved}`"
                    ),
                    "data": { "tokenName": call.token_name.trim_start_matches('-') }
                }));
            }
        }
        out
    }

    /// `unknownReference`: a `{...}` segment of a `$value` string does not
    /// resolve against the registry.
    fn json_reference_diagnostics(
        &self,
        pools: &SyntaxPools,
        registry: &TokenRegistry,
    ) -> Vec<Value> {
        let Some(tree) = self.tree.as_ref() else { return Vec::new() };
        let Ok(json) = pools.json() else { return Vec::new() };
        let mut out = Vec::new();
        for value in json.token_values(tree, &self.text) {
            for unresolved in unresolved_references(&value.text, registry) {
                out.push(self.unknown_reference_diagnostic(
                    value.span.start,
                    value.span.end,
                    &unresolved,
                ));
            }
        }
        out
    }

    fn yaml_reference_diagnostics(&self, registry: &TokenRegistry) -> Vec<Value> {
        let mut out = Vec::new();
        for (value_text, span) in yaml_value_strings(&self.text) {
            for unresolved in unresolved_references(&value_text, registry) {
                out.push(self.unknown_reference_diagnostic(span.start, span.end, &unresolved));
            }
        }
        out
    }

    fn unknown_reference_diagnostic(&self, start: usize, end: usize, reference: &str) -> Value {
        let (sl, sc) = self.byte_to_position(start);
        let (el, ec) = self.byte_to_position(end);
        serde_json::json!({
            "range": range_json(sl, sc, el, ec),
            "severity": 1,
            "code": "unknownReference",
            "source": "design-tokens-language-server",
            "message": format!("Unknown token reference {{{reference}}}"),
            "data": { "tokenName": reference }
        })
    }
}

/// Dotted paths of the references in `value` that fail to resolve.
fn unresolved_references(value: &str, registry: &TokenRegistry) -> Vec<String> {
    references(value)
        .into_iter()
        .filter_map(|reference| {
            let dotted = reference.dotted();
            match registry.resolve(&format!("{{{dotted}}}")) {
                Err(dtls_tokens::TokenError::UnknownReference { reference }) => Some(reference),
                _ => None,
            }
        })
        .collect()
}

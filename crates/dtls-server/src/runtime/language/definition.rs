//! textDocument/definition for token documents.
//!
//! The cursor must rest inside a `{...}` reference string; the handler
//! resolves the path to the defining node in the same document, or in
//! another open token document that is declared as a workspace token file.

use std::path::PathBuf;

use serde_json::{Value, json};

use dtls_protocol::JsonRpcError;
use dtls_syntax::Span;

use super::{reference_at, span_to_range, uri_and_position};
use crate::runtime::LspServer;
use crate::state::{Document, DocumentKind, yaml_member_span};

impl LspServer {
    pub(crate) fn handle_definition(
        &self,
        params: Option<Value>,
        id: Option<&Value>,
    ) -> Result<Option<Value>, JsonRpcError> {
        let (uri, line, character) = uri_and_position(&params)?;
        let Some(document) = self.documents.get(&uri) else {
            return Ok(None);
        };
        let document = document.read();
        if !document.kind.is_token_document() {
            return Ok(None);
        }
        self.cancellations.checkpoint(id, "textDocument/definition")?;

        let byte = document.position_to_byte(line, character);
        let Some((path, _)) = reference_at(&document, byte, &self.pools) else {
            return Ok(None);
        };
        let segments: Vec<&str> = path.iter().map(String::as_str).collect();

        // This document first.
        if let Some(span) = self.member_span(&document, &segments) {
            return Ok(Some(json!({
                "uri": document.uri,
                "range": span_to_range(&document, &span)
            })));
        }

        // Then other open token documents that are registered token files.
        let registry = self.registry.read();
        for other in self.documents.all() {
            let Some(other) = other.try_read() else { continue };
            if other.uri == document.uri || !other.kind.is_token_document() {
                continue;
            }
            let other_path = PathBuf::from(dtls_uri::uri_to_path(&other.uri));
            if !registry.is_registered_path(&other_path) {
                continue;
            }
            if let Some(span) = self.member_span(&other, &segments) {
                return Ok(Some(json!({
                    "uri": other.uri,
                    "range": span_to_range(&other, &span)
                })));
            }
        }
        Ok(None)
    }

    /// Span of the member named by `segments` within a token document.
    fn member_span(&self, document: &Document, segments: &[&str]) -> Option<Span> {
        match document.kind {
            DocumentKind::TokenJson => {
                let tree = document.tree()?;
                let json = self.pools.json().ok()?;
                json.find_member(tree, document.text(), segments)
            }
            DocumentKind::TokenYaml => yaml_member_span(document.text(), segments),
            _ => None,
        }
    }
}

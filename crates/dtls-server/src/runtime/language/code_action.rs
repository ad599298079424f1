//! textDocument/codeAction and codeAction/resolve.
//!
//! Both actions come back without edits; the client follows up with
//! `codeAction/resolve`, and only then does the server compute the text
//! edits.

use serde_json::{Value, json};

use dtls_protocol::{JsonRpcError, invalid_params};

use crate::runtime::LspServer;
use crate::state::scan_var_calls;

const FIX_ONE_TITLE: &str = "Fix this fallback";
const FIX_ALL_TITLE: &str = "Fix all fallbacks in this file";

impl LspServer {
    /// Offer fallback quick-fixes for `incorrectFallback` diagnostics in
    /// the request context.
    pub(crate) fn handle_code_action(
        &self,
        params: Option<Value>,
        id: Option<&Value>,
    ) -> Result<Option<Value>, JsonRpcError> {
        let params = params.ok_or_else(|| invalid_params("codeAction requires params"))?;
        let uri = params
            .pointer("/textDocument/uri")
            .and_then(Value::as_str)
            .ok_or_else(|| invalid_params("missing textDocument.uri"))?;
        self.cancellations.checkpoint(id, "textDocument/codeAction")?;

        let incorrect: Vec<Value> = params
            .pointer("/context/diagnostics")
            .and_then(Value::as_array)
            .map(|diagnostics| {
                diagnostics
                    .iter()
                    .filter(|d| d.get("code").and_then(Value::as_str) == Some("incorrectFallback"))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();

        if incorrect.is_empty() {
            return Ok(Some(json!([])));
        }

        Ok(Some(json!([
            {
                "title": FIX_ONE_TITLE,
                "kind": "quickfix",
                "diagnostics": incorrect,
                "data": { "uri": uri }
            },
            {
                "title": FIX_ALL_TITLE,
                "kind": "source.fixAll",
                "data": { "uri": uri }
            }
        ])))
    }

    /// Fill in `edit.changes[uri]` for a previously offered action.
    pub(crate) fn handle_code_action_resolve(
        &self,
        params: Option<Value>,
        id: Option<&Value>,
    ) -> Result<Option<Value>, JsonRpcError> {
        let Some(mut action) = params else { return Ok(None) };
        let Some(uri) =
            action.pointer("/data/uri").and_then(Value::as_str).map(str::to_string)
        else {
            return Ok(Some(action));
        };
        self.cancellations.checkpoint(id, "codeAction/resolve")?;

        let edits = match action.get("diagnostics").and_then(Value::as_array) {
            // Fix-this: one edit per attached diagnostic.
            Some(diagnostics) => self.edits_for_diagnostics(diagnostics),
            // Fix-all: re-query the document for every fallback match.
            None => self.edits_for_all_fallbacks(&uri),
        };

        if let Some(fields) = action.as_object_mut() {
            let mut changes = serde_json::Map::new();
            changes.insert(uri, Value::Array(edits));
            fields.insert("edit".into(), json!({ "changes": changes }));
        }
        Ok(Some(action))
    }

    fn edits_for_diagnostics(&self, diagnostics: &[Value]) -> Vec<Value> {
        let registry = self.registry.read();
        diagnostics
            .iter()
            .filter_map(|diagnostic| {
                let name = diagnostic.pointer("/data/tokenName").and_then(Value::as_str)?;
                let range = diagnostic.get("range")?.clone();
                let resolved = registry.resolved_value(name)?;
                Some(json!({ "range": range, "newText": resolved }))
            })
            .collect()
    }

    fn edits_for_all_fallbacks(&self, uri: &str) -> Vec<Value> {
        let Some(document) = self.documents.get(uri) else {
            return Vec::new();
        };
        let document = document.read();
        let registry = self.registry.read();
        scan_var_calls(&document, &self.pools)
            .into_iter()
            .filter_map(|call| {
                let fallback = call.fallback?;
                let resolved = registry.resolved_value(&call.token_name)?;
                Some(json!({ "range": fallback.range, "newText": resolved }))
            })
            .collect()
    }
}

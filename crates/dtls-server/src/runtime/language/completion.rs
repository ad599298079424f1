//! textDocument/completion and completionItem/resolve.

use serde_json::{Value, json};

use dtls_protocol::JsonRpcError;

use super::{token_markdown, uri_and_position};
use crate::runtime::LspServer;

impl LspServer {
    /// Offer `var(--token)` snippets when the cursor sits in a `var()`
    /// argument position or immediately after `--`.
    pub(crate) fn handle_completion(
        &self,
        params: Option<Value>,
        id: Option<&Value>,
    ) -> Result<Option<Value>, JsonRpcError> {
        let (uri, line, character) = uri_and_position(&params)?;
        let Some(document) = self.documents.get(&uri) else {
            return Ok(None);
        };
        let document = document.read();
        self.cancellations.checkpoint(id, "textDocument/completion")?;

        let line_start = document.position_to_byte(line, 0);
        let cursor = document.position_to_byte(line, character);
        let prefix = &document.text()[line_start..cursor];
        let Some(partial) = completion_context(prefix) else {
            return Ok(Some(json!({ "isIncomplete": false, "items": [] })));
        };

        // Filtering ignores dashes on both sides, so `--cp` matches
        // `color-primary`.
        let needle: String = partial.chars().filter(|&c| c != '-').collect();
        let snapshot = self.registry.read().snapshot();
        let registry = self.registry.read();
        let items: Vec<Value> = snapshot
            .iter()
            .filter(|token| {
                token.name.chars().filter(|&c| c != '-').collect::<String>().starts_with(&needle)
            })
            .map(|token| {
                let default = registry
                    .resolved_value(&token.name)
                    .map(str::to_string)
                    .unwrap_or_else(|| token.value_string());
                json!({
                    "label": token.dashed_name(),
                    "kind": 6,
                    "filterText": token.dashed_name(),
                    "insertText": format!("var({}${{0:, {}}})", token.dashed_name(), default),
                    "insertTextFormat": 2,
                    "data": { "name": token.name }
                })
            })
            .collect();

        self.cancellations.checkpoint(id, "textDocument/completion")?;
        Ok(Some(json!({ "isIncomplete": true, "items": items })))
    }

    /// Attach the value label detail and documentation to an item.
    pub(crate) fn handle_completion_resolve(
        &self,
        params: Option<Value>,
    ) -> Result<Option<Value>, JsonRpcError> {
        let Some(mut item) = params else { return Ok(None) };
        let name = item
            .pointer("/data/name")
            .or_else(|| item.get("label"))
            .and_then(Value::as_str)
            .map(str::to_string);
        let Some(name) = name else { return Ok(Some(item)) };

        let registry = self.registry.read();
        let Some(token) = registry.token(&name) else {
            return Ok(Some(item));
        };
        let value = registry
            .resolved_value(&token.name)
            .map(str::to_string)
            .unwrap_or_else(|| token.value_string());

        if let Some(fields) = item.as_object_mut() {
            fields.insert("labelDetails".into(), json!({ "detail": format!(": {value}") }));
            fields.insert(
                "documentation".into(),
                json!({
                    "kind": "markdown",
                    "value": token_markdown(token, &registry, &self.pools)
                }),
            );
        }
        Ok(Some(item))
    }
}

/// The partial token text before the cursor, when the cursor is in a
/// completion context. `None` means no completion applies here.
fn completion_context(line_prefix: &str) -> Option<&str> {
    let partial_start = line_prefix
        .rfind(|c: char| !(c.is_ascii_alphanumeric() || c == '-' || c == '_'))
        .map(|i| i + 1)
        .unwrap_or(0);
    let partial = &line_prefix[partial_start..];
    let before = &line_prefix[..partial_start];
    if partial.starts_with("--") || before.trim_end().ends_with("var(") {
        return Some(partial);
    }
    None
}

//! textDocument/hover.

use serde_json::{Value, json};

use dtls_protocol::JsonRpcError;

use super::{css_token_name_at, reference_at, span_to_range, token_markdown, uri_and_position};
use crate::runtime::LspServer;
use crate::state::DocumentKind;

impl LspServer {
    /// Explain the token under the cursor: CSS documents answer on
    /// `var()` names and `--foo` identifiers, token documents on the
    /// `{...}` reference containing the cursor.
    pub(crate) fn handle_hover(
        &self,
        params: Option<Value>,
        id: Option<&Value>,
    ) -> Result<Option<Value>, JsonRpcError> {
        let (uri, line, character) = uri_and_position(&params)?;
        let Some(document) = self.documents.get(&uri) else {
            return Ok(None);
        };
        let document = document.read();
        self.cancellations.checkpoint(id, "textDocument/hover")?;

        let registry = self.registry.read();
        let (token, range) = if document.kind.is_token_document() {
            let byte = document.position_to_byte(line, character);
            let Some((path, span)) = reference_at(&document, byte, &self.pools) else {
                return Ok(None);
            };
            let Some(token) = registry.token_by_path(&path) else {
                return Ok(None);
            };
            (token, span_to_range(&document, &span))
        } else {
            let Some((name, range)) =
                css_token_name_at(&document, line, character, &self.pools)
            else {
                return Ok(None);
            };
            let Some(token) = registry.token(&name) else {
                return Ok(None);
            };
            (token, range)
        };

        self.cancellations.checkpoint(id, "textDocument/hover")?;
        Ok(Some(json!({
            "contents": {
                "kind": "markdown",
                "value": token_markdown(token, &registry, &self.pools)
            },
            "range": range
        })))
    }
}

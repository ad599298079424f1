//! textDocument/diagnostic (pull diagnostics).

use serde_json::{Value, json};

use dtls_protocol::JsonRpcError;

use super::params_uri;
use crate::runtime::LspServer;

impl LspServer {
    /// Return the document's cached diagnostics as a full report. They are
    /// recomputed on every document update, so the cache is always current.
    pub(crate) fn handle_document_diagnostic(
        &self,
        params: Option<Value>,
    ) -> Result<Option<Value>, JsonRpcError> {
        let uri = params_uri(&params)?;
        let items = self
            .documents
            .get(&uri)
            .map(|document| document.read().diagnostics.clone())
            .unwrap_or_default();
        Ok(Some(json!({ "kind": "full", "items": items })))
    }
}

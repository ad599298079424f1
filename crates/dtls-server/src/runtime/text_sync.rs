//! Text document synchronization: didOpen, didChange, didClose.

use serde_json::Value;

use dtls_protocol::{INVALID_REQUEST, JsonRpcError, invalid_params};

use super::LspServer;
use crate::state::Document;

impl LspServer {
    pub(crate) fn handle_did_open(&mut self, params: Option<Value>) -> Result<(), JsonRpcError> {
        let params = params.ok_or_else(|| invalid_params("didOpen requires params"))?;
        let uri = required_str(&params, "/textDocument/uri")?;
        let language_id = required_str(&params, "/textDocument/languageId")?;
        let text = required_str(&params, "/textDocument/text")?;
        let version = params
            .pointer("/textDocument/version")
            .and_then(Value::as_i64)
            .unwrap_or(0) as i32;

        let mut document = Document::new(
            uri.to_string(),
            language_id.to_string(),
            text.to_string(),
            version,
            &self.pools,
        )?;
        document.recompute_diagnostics(&self.pools, &self.registry.read());
        log::debug!("opened {uri} ({language_id}, v{version})");
        self.documents.open(document);
        Ok(())
    }

    pub(crate) fn handle_did_change(&mut self, params: Option<Value>) -> Result<(), JsonRpcError> {
        let params = params.ok_or_else(|| invalid_params("didChange requires params"))?;
        let uri = required_str(&params, "/textDocument/uri")?;
        let version = params
            .pointer("/textDocument/version")
            .and_then(Value::as_i64)
            .ok_or_else(|| invalid_params("didChange requires a version"))? as i32;
        let changes = params
            .get("contentChanges")
            .and_then(Value::as_array)
            .ok_or_else(|| invalid_params("didChange requires contentChanges"))?;

        let document = self
            .documents
            .get(uri)
            .ok_or_else(|| invalid_params(format!("didChange for unopened document {uri}")))?;

        let mut document = document.write();
        // Versions increase monotonically; a stale change is a protocol
        // violation for this message.
        if version <= document.version {
            return Err(JsonRpcError::new(
                INVALID_REQUEST,
                format!(
                    "didChange version regression on {uri}: {version} <= {}",
                    document.version
                ),
            ));
        }
        document.apply_changes(changes, version, &self.pools)?;
        document.recompute_diagnostics(&self.pools, &self.registry.read());
        Ok(())
    }

    pub(crate) fn handle_did_close(&mut self, params: Option<Value>) -> Result<(), JsonRpcError> {
        let params = params.ok_or_else(|| invalid_params("didClose requires params"))?;
        let uri = required_str(&params, "/textDocument/uri")?;
        if !self.documents.close(uri) {
            log::warn!("didClose for unopened document {uri}");
        }
        Ok(())
    }
}

fn required_str<'p>(params: &'p Value, pointer: &str) -> Result<&'p str, JsonRpcError> {
    params
        .pointer(pointer)
        .and_then(Value::as_str)
        .ok_or_else(|| invalid_params(format!("missing required parameter {pointer}")))
}

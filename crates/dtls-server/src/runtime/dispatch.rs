//! Request dispatch.
//!
//! Routes decoded JSON-RPC messages to their handlers. Notifications never
//! produce responses; handler errors always serialize into an `error`
//! object rather than escaping; unknown request methods return an empty
//! result, per LSP convention for unspecified behavior.

use serde_json::Value;

use dtls_protocol::{JsonRpcError, JsonRpcRequest, JsonRpcResponse, server_not_initialized};

use super::LspServer;

impl LspServer {
    /// Handle one message; `None` means nothing goes back on the wire.
    pub fn handle_request(&mut self, request: JsonRpcRequest) -> Option<JsonRpcResponse> {
        let id = request.id.clone();

        if request.method == "$/cancelRequest" {
            if let Some(cancel_id) = request.params.as_ref().and_then(|p| p.get("id")) {
                self.cancellations.mark(cancel_id.clone());
            }
            return None;
        }

        if let Some(ref id) = id {
            if self.cancellations.is_cancelled(id) {
                self.cancellations.finish(id);
                return Some(JsonRpcResponse::error(
                    Some(id.clone()),
                    dtls_protocol::cancelled(&request.method),
                ));
            }
        }

        let result = self.route(&request.method, request.params, id.as_ref());

        if let Some(ref id) = id {
            self.cancellations.finish(id);
        }

        match (id, result) {
            // Notification outcomes have nowhere to go; failures are logged.
            (None, Ok(_)) => None,
            (None, Err(error)) => {
                log::error!("notification {} failed: {error}", request.method);
                None
            }
            (Some(id), Ok(Some(result))) => Some(JsonRpcResponse::success(Some(id), result)),
            (Some(id), Ok(None)) => Some(JsonRpcResponse::null(Some(id))),
            (Some(id), Err(error)) => Some(JsonRpcResponse::error(Some(id), error)),
        }
    }

    fn route(
        &mut self,
        method: &str,
        params: Option<Value>,
        id: Option<&Value>,
    ) -> Result<Option<Value>, JsonRpcError> {
        match method {
            "initialize" => self.handle_initialize(params),
            "initialized" => Ok(None),
            // Everything else requires the handshake first.
            _ if !self.initialized && method != "shutdown" && method != "exit" => {
                Err(server_not_initialized())
            }
            "shutdown" => self.handle_shutdown(),
            "exit" => Ok(None),
            "$/setTrace" => self.handle_set_trace(params),
            "textDocument/didOpen" => self.handle_did_open(params).map(|_| None),
            "textDocument/didChange" => self.handle_did_change(params).map(|_| None),
            "textDocument/didClose" => self.handle_did_close(params).map(|_| None),
            "textDocument/hover" => self.handle_hover(params, id),
            "textDocument/completion" => self.handle_completion(params, id),
            "completionItem/resolve" => self.handle_completion_resolve(params),
            "textDocument/codeAction" => self.handle_code_action(params, id),
            "codeAction/resolve" => self.handle_code_action_resolve(params, id),
            "textDocument/documentColor" => self.handle_document_color(params, id),
            "textDocument/definition" => self.handle_definition(params, id),
            "textDocument/diagnostic" => self.handle_document_diagnostic(params),
            other => {
                log::debug!("unhandled method: {other}");
                Ok(None)
            }
        }
    }
}

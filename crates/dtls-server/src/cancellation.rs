//! Request cancellation bookkeeping.
//!
//! `$/cancelRequest` marks the id; handlers check at their computation
//! checkpoints (after parsing, between queries, before emitting a result)
//! and bail with a cancellation error. No partial edits are ever
//! published: handlers build results locally and only return whole values.

use dtls_protocol::{JsonRpcError, cancelled};
use parking_lot::Mutex;
use rustc_hash::FxHashSet;
use serde_json::Value;

/// Set of request ids cancelled by the client.
#[derive(Default)]
pub struct CancellationRegistry {
    cancelled: Mutex<FxHashSet<Value>>,
}

impl CancellationRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a `$/cancelRequest` for `id`.
    pub fn mark(&self, id: Value) {
        self.cancelled.lock().insert(id);
    }

    pub fn is_cancelled(&self, id: &Value) -> bool {
        self.cancelled.lock().contains(id)
    }

    /// Forget an id once its request finished, cancelled or not.
    pub fn finish(&self, id: &Value) {
        self.cancelled.lock().remove(id);
    }

    /// Handler checkpoint: error out if the request was cancelled.
    pub fn checkpoint(&self, id: Option<&Value>, method: &str) -> Result<(), JsonRpcError> {
        match id {
            Some(id) if self.is_cancelled(id) => Err(cancelled(method)),
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn mark_and_checkpoint() {
        let registry = CancellationRegistry::new();
        let id = json!(5);
        assert!(registry.checkpoint(Some(&id), "textDocument/hover").is_ok());
        registry.mark(id.clone());
        assert!(registry.checkpoint(Some(&id), "textDocument/hover").is_err());
        registry.finish(&id);
        assert!(registry.checkpoint(Some(&id), "textDocument/hover").is_ok());
    }

    #[test]
    fn notifications_never_cancel() {
        let registry = CancellationRegistry::new();
        assert!(registry.checkpoint(None, "textDocument/didOpen").is_ok());
    }
}

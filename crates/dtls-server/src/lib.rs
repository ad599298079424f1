//! Design Tokens Language Server runtime.
//!
//! Serves hover, completion, diagnostics, code actions, document colors,
//! and go-to-definition for `var(--token)` references in CSS and
//! CSS-bearing documents, backed by DTCG token files loaded from workspace
//! manifests.
//!
//! # Architecture
//!
//! - [`transport`] - Content-Length message framing over stdio
//! - [`state`] - document store and the per-document syntax state
//! - [`runtime`] - the server itself: dispatch, lifecycle, handlers
//! - [`cancellation`] - `$/cancelRequest` bookkeeping
//! - [`logger`] - file sink plus the `window/logMessage` bridge
//!
//! The primary entry point is [`run_stdio`], which serves one editor
//! session over stdin/stdout and returns the process exit code.

#![deny(unsafe_code)]

pub mod cancellation;
pub mod logger;
pub mod runtime;
pub mod state;
pub mod transport;

pub use dtls_protocol::{JsonRpcError, JsonRpcRequest, JsonRpcResponse};
pub use runtime::LspServer;

/// Run the server over stdio until `exit` or EOF.
///
/// Returns the process exit code: 0 after a clean `shutdown`/`exit`
/// sequence, non-zero on transport failure or an `exit` without prior
/// `shutdown`.
pub fn run_stdio() -> i32 {
    let mut server = LspServer::new();
    logger::init(server.output_handle());
    server.run()
}

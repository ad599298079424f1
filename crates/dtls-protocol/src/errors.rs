//! LSP/JSON-RPC error codes and response helpers.

use crate::jsonrpc::JsonRpcError;

pub const PARSE_ERROR: i32 = -32700;
pub const INVALID_REQUEST: i32 = -32600;
pub const METHOD_NOT_FOUND: i32 = -32601;
pub const INVALID_PARAMS: i32 = -32602;
pub const INTERNAL_ERROR: i32 = -32603;
/// Request received before `initialize` completed.
pub const SERVER_NOT_INITIALIZED: i32 = -32002;
/// The client cancelled via `$/cancelRequest`.
pub const REQUEST_CANCELLED: i32 = -32800;
/// State changed under the request; the result would be stale.
pub const CONTENT_MODIFIED: i32 = -32801;

pub fn invalid_params(message: impl Into<String>) -> JsonRpcError {
    JsonRpcError::new(INVALID_PARAMS, message)
}

pub fn internal_error(message: impl Into<String>) -> JsonRpcError {
    JsonRpcError::new(INTERNAL_ERROR, message)
}

pub fn server_not_initialized() -> JsonRpcError {
    JsonRpcError::new(SERVER_NOT_INITIALIZED, "Server not initialized")
}

pub fn cancelled(method: &str) -> JsonRpcError {
    JsonRpcError::new(REQUEST_CANCELLED, format!("Request cancelled: {method}"))
}

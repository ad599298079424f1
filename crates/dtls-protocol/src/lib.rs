//! JSON-RPC 2.0 message types and protocol definitions for the token
//! server: request/response envelopes, LSP error codes, and the server's
//! capability advertisement.

#![deny(unsafe_code)]

mod capabilities;
mod errors;
mod jsonrpc;

pub use capabilities::server_capabilities;
pub use errors::{
    CONTENT_MODIFIED, INTERNAL_ERROR, INVALID_PARAMS, INVALID_REQUEST, METHOD_NOT_FOUND,
    PARSE_ERROR, REQUEST_CANCELLED, SERVER_NOT_INITIALIZED, cancelled, internal_error,
    invalid_params, server_not_initialized,
};
pub use jsonrpc::{JsonRpcError, JsonRpcRequest, JsonRpcResponse};

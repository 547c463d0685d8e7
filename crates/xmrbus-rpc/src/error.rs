//! Gateway error types.

use thiserror::Error;

use crate::request::JsonRpcError;

/// Errors that can occur while talking to an RPC server.
#[derive(Debug, Error)]
pub enum RpcError {
    /// HTTP request failed (connection refused, DNS, non-200 status, etc.).
    #[error("HTTP error: {0}")]
    Http(String),

    /// Request timed out after the configured duration.
    #[error("Request timed out after {ms}ms")]
    Timeout { ms: u64 },

    /// JSON-RPC protocol-level error returned by the server.
    #[error("RPC error {}: {}", .0.code, .0.message)]
    Rpc(JsonRpcError),

    /// Response carried neither `result` nor `error`, a protocol violation.
    #[error("RPC response carried neither result nor error")]
    MissingResult,

    /// Response body could not be deserialized.
    #[error("Deserialization error: {0}")]
    Deserialization(#[from] serde_json::Error),
}

impl RpcError {
    /// Returns `true` if the failure happened before a well-formed response
    /// arrived (network/HTTP layer).
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Http(_) | Self::Timeout { .. })
    }

    /// Returns `true` if the server answered but the answer itself is the
    /// failure (structured error object or a result-less body).
    pub fn is_protocol(&self) -> bool {
        matches!(self, Self::Rpc(_) | Self::MissingResult)
    }
}

//! Client error types.

use thiserror::Error;

/// Errors raised by a [`Transport`](crate::ports::Transport) implementation.
///
/// These never trigger a retry: a transport failure aborts the whole logical call.
#[derive(Debug, Clone, Error)]
pub enum TransportError {
    /// Request did not complete within the configured timeout
    #[error("Request timed out after {0:?}")]
    Timeout(std::time::Duration),

    /// Network-level failure (DNS, connect, reset, body read)
    #[error("HTTP request failed: {0}")]
    RequestFailed(String),

    /// Gateway/entrance did not form a usable URL
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
}

/// Errors surfaced to callers of the stock client.
///
/// A response body that cannot be decoded is not an error: the dispatcher
/// returns `Ok(None)` for it.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Transport failure, propagated without retry
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    /// Request parameters could not be encoded
    #[error("Failed to encode request parameters: {0}")]
    Encode(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<serde_json::Error> for ClientError {
    fn from(err: serde_json::Error) -> Self {
        ClientError::Encode(err.to_string())
    }
}

/// Result type for client operations.
pub type ClientResult<T> = Result<T, ClientError>;

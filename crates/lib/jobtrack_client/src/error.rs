//! Client error types.

use thiserror::Error;

/// Errors surfaced by the client store and HTTP client.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The API answered with a non-success status.
    #[error("{msg}")]
    Api { status: u16, msg: String },

    /// The request never produced a response.
    #[error("Network error: {0}")]
    Network(String),

    /// A response body could not be decoded.
    #[error("Unexpected response: {0}")]
    Decode(String),

    /// Rejected locally before any request was sent.
    #[error("{0}")]
    Validation(String),

    /// Durable session storage failed.
    #[error("Session storage error: {0}")]
    Storage(String),
}

impl ClientError {
    /// Whether the API rejected the bearer token.
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ClientError::Api { status: 401, .. })
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            ClientError::Decode(e.to_string())
        } else {
            ClientError::Network(e.to_string())
        }
    }
}

impl From<std::io::Error> for ClientError {
    fn from(e: std::io::Error) -> Self {
        ClientError::Storage(e.to_string())
    }
}

impl From<serde_json::Error> for ClientError {
    fn from(e: serde_json::Error) -> Self {
        ClientError::Storage(e.to_string())
    }
}

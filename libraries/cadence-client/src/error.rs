//! Error types for the Cadence API client.

use cadence_core::CadenceError;
use thiserror::Error;

/// Errors that can occur when talking to the catalog API.
#[derive(Error, Debug)]
pub enum ClientError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Server returned a non-success status
    #[error("Server error ({status}): {message}")]
    ServerError { status: u16, message: String },

    /// Server answered `success: false`
    #[error("Request rejected: {0}")]
    Rejected(String),

    /// Login refused (unknown user or wrong password)
    #[error("Authentication failed: {0}")]
    AuthFailed(String),

    /// The route needs a signed-in user
    #[error("Authentication required")]
    AuthRequired,

    /// Invalid API URL
    #[error("Invalid API URL: {0}")]
    InvalidUrl(String),

    /// Failed to parse server response
    #[error("Failed to parse response: {0}")]
    ParseError(String),

    /// Server is offline or unreachable
    #[error("Server unreachable: {0}")]
    ServerUnreachable(String),

    /// Token store failed
    #[error("Token store error: {0}")]
    Store(#[from] CadenceError),
}

impl From<ClientError> for CadenceError {
    fn from(err: ClientError) -> Self {
        match err {
            ClientError::Store(inner) => inner,
            other => CadenceError::network(other.to_string()),
        }
    }
}

/// Result type for client operations.
pub type Result<T> = std::result::Result<T, ClientError>;

//! Client error types.

use calfeed_providers::FeedError;
use calfeed_server::ServiceError;
use thiserror::Error;

/// Result type for client operations.
pub type ClientResult<T> = Result<T, ClientError>;

/// Errors that can occur in the client.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// Bad command-line usage not caught by argument parsing.
    #[error("{0}")]
    Usage(String),

    /// Service error (registry, fetch, parse).
    #[error(transparent)]
    Service(#[from] ServiceError),

    /// Output serialization error.
    #[error("failed to serialize output: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<FeedError> for ClientError {
    fn from(err: FeedError) -> Self {
        Self::Service(err.into())
    }
}

//! Service error types.

use calfeed_providers::{FeedError, FeedErrorCode};
use thiserror::Error;

/// Result type for service operations.
pub type ServiceResult<T> = Result<T, ServiceError>;

/// Errors that can occur in the feed service.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// Registry lookup, fetch or parse failure with no cached data to fall back on.
    #[error(transparent)]
    Feed(#[from] FeedError),

    /// Configuration error.
    #[error("Configuration error: {message}")]
    Config { message: String },
}

impl ServiceError {
    /// Creates a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Returns the feed error code, if this wraps a feed error.
    pub fn feed_code(&self) -> Option<FeedErrorCode> {
        match self {
            Self::Feed(e) => Some(e.code()),
            _ => None,
        }
    }

    /// Returns true if the calendar is unknown to the registry.
    pub fn is_not_found(&self) -> bool {
        self.feed_code() == Some(FeedErrorCode::NotFound)
    }
}

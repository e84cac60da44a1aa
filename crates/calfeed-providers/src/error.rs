//! Error types for feed retrieval and parsing.

use std::fmt;

use thiserror::Error;

/// Coarse classification of a [`FeedError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FeedErrorCode {
    /// Transport failure: DNS, refused connection, timeout, truncated body.
    NetworkError,
    /// The server answered with a non-success HTTP status.
    FetchError,
    /// The body is not a valid iCalendar document.
    ParseError,
    /// The calendar identifier is unknown to the registry.
    NotFound,
    /// The feed URL could not be parsed.
    InvalidUrl,
    /// Fetcher or service misconfiguration.
    ConfigurationError,
}

impl FeedErrorCode {
    /// Returns a stable snake_case name for this code.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NetworkError => "network_error",
            Self::FetchError => "fetch_error",
            Self::ParseError => "parse_error",
            Self::NotFound => "not_found",
            Self::InvalidUrl => "invalid_url",
            Self::ConfigurationError => "configuration_error",
        }
    }

    /// Returns true if a previously cached result may be served instead.
    pub fn allows_stale_fallback(&self) -> bool {
        matches!(self, Self::NetworkError | Self::FetchError | Self::ParseError)
    }
}

impl fmt::Display for FeedErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An error raised while resolving, fetching or parsing a calendar feed.
#[derive(Debug, Error)]
pub enum FeedError {
    /// The feed host could not be reached or the body could not be read.
    #[error("network error fetching {url}: {message}")]
    Network {
        url: String,
        message: String,
        #[source]
        source: Option<reqwest::Error>,
    },

    /// The feed host answered with a non-success status.
    #[error("failed to fetch calendar data from {url}: HTTP {status}")]
    Fetch { url: String, status: u16 },

    /// The document is not valid iCalendar.
    #[error("failed to parse calendar data: {message}")]
    Parse { message: String },

    /// No calendar is registered under this identifier.
    #[error("calendar not found: {calendar_id}")]
    NotFound { calendar_id: String },

    /// The feed URL is malformed.
    #[error("invalid feed URL {url}: {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    /// The fetcher could not be configured.
    #[error("configuration error: {message}")]
    Config { message: String },
}

impl FeedError {
    /// Creates a network error.
    pub fn network(url: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Network {
            url: url.into(),
            message: message.into(),
            source: None,
        }
    }

    /// Creates a network error from a transport failure.
    pub fn from_transport(url: impl Into<String>, err: reqwest::Error) -> Self {
        let message = if err.is_timeout() {
            "request timed out".to_string()
        } else if err.is_connect() {
            "connection failed".to_string()
        } else {
            err.to_string()
        };
        Self::Network {
            url: url.into(),
            message,
            source: Some(err),
        }
    }

    /// Creates a non-success status error.
    pub fn fetch(url: impl Into<String>, status: u16) -> Self {
        Self::Fetch {
            url: url.into(),
            status,
        }
    }

    /// Creates a parse error.
    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse {
            message: message.into(),
        }
    }

    /// Creates a not-found error.
    pub fn not_found(calendar_id: impl Into<String>) -> Self {
        Self::NotFound {
            calendar_id: calendar_id.into(),
        }
    }

    /// Creates a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Returns the classification of this error.
    pub fn code(&self) -> FeedErrorCode {
        match self {
            Self::Network { .. } => FeedErrorCode::NetworkError,
            Self::Fetch { .. } => FeedErrorCode::FetchError,
            Self::Parse { .. } => FeedErrorCode::ParseError,
            Self::NotFound { .. } => FeedErrorCode::NotFound,
            Self::InvalidUrl { .. } => FeedErrorCode::InvalidUrl,
            Self::Config { .. } => FeedErrorCode::ConfigurationError,
        }
    }

    /// Returns true if a stale cache entry may be served in place of this error.
    pub fn allows_stale_fallback(&self) -> bool {
        self.code().allows_stale_fallback()
    }
}

/// A specialized Result type for feed operations.
pub type FeedResult<T> = Result<T, FeedError>;

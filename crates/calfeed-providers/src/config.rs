//! HTTP fetcher configuration.

use std::time::Duration;

/// Configuration for [`HttpFetcher`](crate::HttpFetcher).
#[derive(Debug, Clone)]
pub struct FetcherConfig {
    /// Whole-request timeout, covering connect and body download.
    pub timeout: Duration,

    /// Connect timeout.
    pub connect_timeout: Duration,

    /// User agent string.
    pub user_agent: String,

    /// Whether to verify TLS certificates.
    pub verify_tls: bool,
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(Self::DEFAULT_TIMEOUT_SECS),
            connect_timeout: Duration::from_secs(Self::DEFAULT_CONNECT_TIMEOUT_SECS),
            user_agent: format!("calfeed/{}", env!("CARGO_PKG_VERSION")),
            verify_tls: true,
        }
    }
}

impl FetcherConfig {
    /// Default request timeout in seconds.
    pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

    /// Default connect timeout in seconds.
    pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;

    /// Creates a configuration with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets the connect timeout.
    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Sets the user agent string.
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Disables TLS verification (for testing only).
    pub fn with_insecure_tls(mut self) -> Self {
        self.verify_tls = false;
        self
    }
}

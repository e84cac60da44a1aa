//! Service configuration.

use std::time::Duration;

use crate::error::{ServiceError, ServiceResult};

/// Default cache time-to-live in seconds.
pub const DEFAULT_CACHE_TTL_SECS: u64 = 30;

/// Default recurrence expansion window, in months either side of now.
pub const DEFAULT_WINDOW_MONTHS: u32 = 12;

/// Feed service configuration.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// How long a cache entry is served without refetching.
    pub cache_ttl: Duration,

    /// Expansion window used when a query does not specify one.
    pub default_window_months: u32,

    /// Upper bound on cache entries. `None` keeps every key.
    pub max_cache_entries: Option<usize>,

    /// Whether concurrent misses for one key share a single fetch.
    pub single_flight: bool,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            cache_ttl: Duration::from_secs(DEFAULT_CACHE_TTL_SECS),
            default_window_months: DEFAULT_WINDOW_MONTHS,
            max_cache_entries: None,
            single_flight: true,
        }
    }
}

impl ServiceConfig {
    /// Creates a configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder: set the cache TTL.
    pub fn with_cache_ttl(mut self, ttl: Duration) -> Self {
        self.cache_ttl = ttl;
        self
    }

    /// Builder: set the default expansion window.
    pub fn with_default_window_months(mut self, months: u32) -> Self {
        self.default_window_months = months;
        self
    }

    /// Builder: bound the number of cache entries.
    pub fn with_max_cache_entries(mut self, max: usize) -> Self {
        self.max_cache_entries = Some(max);
        self
    }

    /// Builder: enable or disable single-flight fetching.
    pub fn with_single_flight(mut self, enabled: bool) -> Self {
        self.single_flight = enabled;
        self
    }

    /// Checks the configuration for values the service cannot work with.
    pub fn validate(&self) -> ServiceResult<()> {
        if self.cache_ttl.is_zero() {
            return Err(ServiceError::config("cache TTL must be greater than zero"));
        }
        if self.max_cache_entries == Some(0) {
            return Err(ServiceError::config("max cache entries must be at least 1"));
        }
        Ok(())
    }
}

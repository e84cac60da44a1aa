//! Feed service: cache, stale fallback and event delivery.
//!
//! [`FeedService`] is the entry point for the rendering layer. It resolves a
//! calendar through the registry, serves fresh [`CacheStore`] entries, and on
//! a miss fetches and expands the feed. When a refresh fails the last good
//! events are served instead of the error.
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use calfeed_core::StaticPreferences;
//! use calfeed_providers::{CalendarInfo, FetcherConfig, HttpFetcher, StaticRegistry};
//! use calfeed_server::{EventsQuery, FeedService, ServiceConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let registry = StaticRegistry::new()
//!         .with(CalendarInfo::new("work", "https://example.com/work.ics"));
//!     let service = FeedService::new(
//!         ServiceConfig::default(),
//!         Arc::new(registry),
//!         Arc::new(HttpFetcher::new(&FetcherConfig::default())?),
//!         Arc::new(StaticPreferences::new()),
//!     )?;
//!
//!     let response = service.get_events("work", EventsQuery::new()).await?;
//!     println!("{} events", response.events.len());
//!     Ok(())
//! }
//! ```

mod cache;
mod config;
mod error;
mod service;

pub use cache::{CacheDiagnostic, CacheEntry, CacheKey, CacheStore};
pub use config::{DEFAULT_CACHE_TTL_SECS, DEFAULT_WINDOW_MONTHS, ServiceConfig};
pub use error::{ServiceError, ServiceResult};
pub use service::{EventSource, EventsQuery, EventsResponse, FeedService};

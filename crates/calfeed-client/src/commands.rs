//! Subcommand implementations.

pub mod calendars;
pub mod config;
pub mod events;
pub mod stats;

use std::sync::Arc;

use calfeed_providers::HttpFetcher;
use calfeed_server::FeedService;

use crate::config::AppConfig;
use crate::error::ClientResult;

/// Validates the client configuration and builds a feed service from it.
pub fn build_service(config: &AppConfig) -> ClientResult<FeedService> {
    config.validate()?;
    let fetcher = HttpFetcher::new(&config.fetcher_config())?;
    let service = FeedService::new(
        config.service_config(),
        Arc::new(config.registry()),
        Arc::new(fetcher),
        Arc::new(config.preferences()),
    )?;
    Ok(service)
}

//! The `stats` command.

use calfeed_server::{CacheDiagnostic, EventsQuery, FeedService};
use tracing::warn;

use crate::config::AppConfig;
use crate::error::ClientResult;
use crate::output::format_diagnostics;

use super::build_service;

/// Loads every visible calendar, then prints the cache diagnostics.
pub async fn run(config: &AppConfig, json: bool) -> ClientResult<()> {
    let service = build_service(config)?;
    let diagnostics = warm(&service, &config.visible_calendar_ids()).await;

    if json {
        println!("{}", serde_json::to_string_pretty(&diagnostics)?);
    } else {
        print!("{}", format_diagnostics(&diagnostics));
    }
    Ok(())
}

/// Fetches each calendar into the cache and returns the resulting diagnostics.
pub async fn warm(service: &FeedService, ids: &[String]) -> Vec<CacheDiagnostic> {
    for id in ids {
        if let Err(err) = service.get_events(id, EventsQuery::new()).await {
            warn!(calendar_id = %id, error = %err, "Failed to load calendar");
            eprintln!("warning: {id}: {err}");
        }
    }
    service.cache_diagnostics().await
}

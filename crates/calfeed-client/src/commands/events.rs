//! The `events` command.

use calfeed_core::{CalendarEvent, TimeWindow};
use calfeed_server::{EventSource, EventsQuery, FeedService};
use chrono::{Local, NaiveDate, Utc};
use tracing::warn;

use crate::cli::EventsArgs;
use crate::config::AppConfig;
use crate::error::{ClientError, ClientResult};
use crate::output::format_agenda;

use super::build_service;

/// Prints the events selected by `args`.
pub async fn run(config: &AppConfig, args: &EventsArgs) -> ClientResult<()> {
    let service = build_service(config)?;
    let ids = calendar_ids(config, args.calendar.as_deref());
    let query = query_for(args, Utc::now().date_naive())?;

    let events = collect(&service, &ids, query).await?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&events)?);
    } else {
        print!("{}", format_agenda(&events, &Local));
    }
    Ok(())
}

/// The requested calendar, or every visible one.
pub fn calendar_ids(config: &AppConfig, requested: Option<&str>) -> Vec<String> {
    match requested {
        Some(id) => vec![id.to_string()],
        None => config.visible_calendar_ids(),
    }
}

/// Translates command-line flags into a service query.
pub fn query_for(args: &EventsArgs, today: NaiveDate) -> ClientResult<EventsQuery> {
    let mut query = EventsQuery::new().with_force_refresh(args.refresh);
    if let Some(months) = args.window_months {
        query = query.with_window_months(months);
    }
    if args.from.is_some() || args.to.is_some() {
        let first = args.from.unwrap_or(today);
        let last = args.to.unwrap_or(first);
        let range = TimeWindow::for_days(first, last)
            .ok_or_else(|| ClientError::Usage("--to must not be before --from".to_string()))?;
        query = query.with_range(range);
    }
    Ok(query)
}

/// Fetches every calendar in `ids` and merges the events by start time.
///
/// With a single calendar its error is returned. With several, failing
/// calendars are reported and skipped unless all of them fail.
pub async fn collect(
    service: &FeedService,
    ids: &[String],
    query: EventsQuery,
) -> ClientResult<Vec<CalendarEvent>> {
    let mut events = Vec::new();
    let mut first_error = None;
    let mut failures = 0;

    for id in ids {
        match service.get_events(id, query).await {
            Ok(response) => {
                if response.source == EventSource::Stale {
                    eprintln!("warning: {id}: refresh failed, showing cached events");
                }
                events.extend(response.events);
            }
            Err(err) if ids.len() == 1 => return Err(err.into()),
            Err(err) => {
                warn!(calendar_id = %id, error = %err, "Skipping calendar");
                eprintln!("warning: {id}: {err}");
                failures += 1;
                first_error.get_or_insert(err);
            }
        }
    }

    if failures == ids.len() {
        if let Some(err) = first_error {
            return Err(err.into());
        }
    }

    events.sort_by(|a, b| a.start_time.cmp(&b.start_time).then_with(|| a.id.cmp(&b.id)));
    Ok(events)
}

//! Text rendering of events, calendars and cache statistics.

use std::fmt::{Display, Write};

use calfeed_core::CalendarEvent;
use calfeed_server::CacheDiagnostic;
use chrono::{NaiveDate, NaiveTime, TimeZone};

use crate::config::CalendarSettings;

/// Renders events grouped by day in `tz`.
///
/// Events are expected sorted by start time. All-day events are stored at UTC
/// midnight and keep their calendar date in every zone.
pub fn format_agenda<Tz>(events: &[CalendarEvent], tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    if events.is_empty() {
        return "No events\n".to_string();
    }

    let mut out = String::new();
    let mut current_day: Option<NaiveDate> = None;

    for event in events {
        let start = event.start_time.with_timezone(tz);
        let end = event.end_time.with_timezone(tz);
        let day = if is_date_valued(event) {
            event.start_time.date_naive()
        } else {
            start.date_naive()
        };

        if current_day != Some(day) {
            if current_day.is_some() {
                out.push('\n');
            }
            let _ = writeln!(out, "{}", day.format("%A %Y-%m-%d"));
            current_day = Some(day);
        }

        let when = if event.is_full_day() {
            "all day    ".to_string()
        } else {
            format!("{}-{}", start.format("%H:%M"), end.format("%H:%M"))
        };
        let _ = write!(out, "  {}  {}", when, event.title);
        if let Some(location) = event.location.as_deref().filter(|l| !l.is_empty()) {
            let _ = write!(out, " @ {}", location);
        }
        let _ = writeln!(out, "  [{}]", event.calendar_id);
    }
    out
}

fn is_date_valued(event: &CalendarEvent) -> bool {
    event.all_day || (event.is_full_day() && event.start_time.time() == NaiveTime::MIN)
}

/// Renders the configured calendars, one per line.
pub fn format_calendars(calendars: &[CalendarSettings]) -> String {
    if calendars.is_empty() {
        return "No calendars configured\n".to_string();
    }
    let mut out = String::new();
    for calendar in calendars {
        let _ = writeln!(
            out,
            "{}{}  {}  {}",
            calendar.id,
            if calendar.visible { "" } else { " (hidden)" },
            calendar.display_name(),
            calendar.feed_url,
        );
    }
    out
}

/// Renders cache diagnostics as a small table.
pub fn format_diagnostics(entries: &[CacheDiagnostic]) -> String {
    if entries.is_empty() {
        return "Cache is empty\n".to_string();
    }
    let width = entries
        .iter()
        .map(|e| e.calendar_id.len())
        .max()
        .unwrap_or(0)
        .max("CALENDAR".len());

    let mut out = String::new();
    let _ = writeln!(out, "{:<width$}  {:>6}  {:>6}  LAST UPDATED", "CALENDAR", "EVENTS", "MONTHS");
    for entry in entries {
        let _ = writeln!(
            out,
            "{:<width$}  {:>6}  {:>6}  {}{}",
            entry.calendar_id,
            entry.event_count,
            entry.date_range_months,
            entry.last_updated.format("%Y-%m-%d %H:%M:%S UTC"),
            if entry.expired { " (expired)" } else { "" },
        );
    }
    out
}

//! Range selection over expanded events.

use chrono::{DateTime, Utc};

use crate::event::CalendarEvent;

/// Returns true if the event interval touches `[range_start, range_end]`.
///
/// Both ends are inclusive, so an event ending exactly at `range_start` or
/// starting exactly at `range_end` counts as overlapping.
pub fn overlaps(
    event: &CalendarEvent,
    range_start: DateTime<Utc>,
    range_end: DateTime<Utc>,
) -> bool {
    event.start_time <= range_end && event.end_time >= range_start
}

/// Selects the events overlapping `[range_start, range_end]`.
///
/// Input order is preserved.
pub fn filter_by_range<'a, I>(
    events: I,
    range_start: DateTime<Utc>,
    range_end: DateTime<Utc>,
) -> Vec<CalendarEvent>
where
    I: IntoIterator<Item = &'a CalendarEvent>,
{
    events
        .into_iter()
        .filter(|event| overlaps(event, range_start, range_end))
        .cloned()
        .collect()
}

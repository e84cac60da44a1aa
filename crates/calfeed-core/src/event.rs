//! The concrete event occurrence produced by feed expansion.

use chrono::{DateTime, Duration, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

/// A single concrete occurrence of a calendar event.
///
/// Non-recurring events carry the source UID as `id`. Occurrences of a
/// recurring series carry `{uid}-{unix_start}` as `id` and the series UID in
/// `recurrence_id`, so every occurrence in a result set has a distinct id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarEvent {
    /// Identifier, unique within one expansion result.
    pub id: String,
    /// Event title (SUMMARY).
    pub title: String,
    /// Event description, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Event location, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    /// Start of this occurrence.
    pub start_time: DateTime<Utc>,
    /// End of this occurrence.
    pub end_time: DateTime<Utc>,
    /// Identifier of the owning calendar subscription.
    pub calendar_id: String,
    /// UID of the recurring master this occurrence belongs to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recurrence_id: Option<String>,
    /// Whether the source used DATE (not DATE-TIME) values.
    #[serde(default)]
    pub all_day: bool,
    /// Display color, attached by enrichment.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

impl CalendarEvent {
    /// Creates a non-recurring event with the given id and times.
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        start_time: DateTime<Utc>,
        end_time: DateTime<Utc>,
        calendar_id: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            description: None,
            location: None,
            start_time,
            end_time,
            calendar_id: calendar_id.into(),
            recurrence_id: None,
            all_day: false,
            color: None,
        }
    }

    /// Builds the id of an occurrence of the series `uid` starting at `start`.
    pub fn occurrence_id(uid: &str, start: DateTime<Utc>) -> String {
        format!("{}-{}", uid, start.timestamp())
    }

    /// Builder method to set the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Builder method to set the location.
    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    /// Builder method to mark the event as an occurrence of series `uid`.
    pub fn with_recurrence(mut self, uid: impl Into<String>) -> Self {
        self.recurrence_id = Some(uid.into());
        self
    }

    /// Builder method to mark the event as DATE-valued.
    pub fn with_all_day(mut self, all_day: bool) -> Self {
        self.all_day = all_day;
        self
    }

    /// Returns true if this event is an occurrence of a recurring series.
    pub fn is_recurring(&self) -> bool {
        self.recurrence_id.is_some()
    }

    /// Returns the duration of the occurrence.
    pub fn duration(&self) -> Duration {
        self.end_time - self.start_time
    }

    /// Heuristic used by grid renderers to place an event in the all-day row.
    ///
    /// True for DATE-valued events, for events starting and ending on UTC
    /// midnight, and for anything lasting 24 hours or more.
    pub fn is_full_day(&self) -> bool {
        if self.all_day {
            return true;
        }
        let midnight_aligned = self.start_time.time() == NaiveTime::MIN
            && self.end_time.time() == NaiveTime::MIN
            && self.end_time > self.start_time;
        midnight_aligned || self.duration() >= Duration::hours(24)
    }
}

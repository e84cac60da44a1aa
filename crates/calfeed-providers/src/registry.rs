//! Calendar registry: resolves a calendar id to its subscription.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::{FeedError, FeedResult};
use crate::fetcher::BoxFuture;

/// A calendar subscription known to the registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarInfo {
    /// Unique identifier for the calendar.
    pub id: String,
    /// Human-readable name.
    pub name: String,
    /// Where the iCalendar feed is published.
    pub feed_url: String,
}

impl CalendarInfo {
    /// Creates a new CalendarInfo. The name defaults to the id.
    pub fn new(id: impl Into<String>, feed_url: impl Into<String>) -> Self {
        let id = id.into();
        Self {
            name: id.clone(),
            id,
            feed_url: feed_url.into(),
        }
    }

    /// Builder method to set the display name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }
}

/// Source of calendar subscriptions.
///
/// Lookups may suspend (a database or remote service behind the trait).
pub trait CalendarRegistry: Send + Sync {
    /// Returns the subscription for `id`.
    ///
    /// Fails with [`FeedError::NotFound`] when the id is unknown.
    fn lookup<'a>(&'a self, id: &'a str) -> BoxFuture<'a, FeedResult<CalendarInfo>>;

    /// Lists every known subscription.
    fn list(&self) -> BoxFuture<'_, Vec<CalendarInfo>>;
}

/// In-memory registry, populated up front.
#[derive(Debug, Clone, Default)]
pub struct StaticRegistry {
    calendars: HashMap<String, CalendarInfo>,
}

impl StaticRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method to add a calendar.
    pub fn with(mut self, info: CalendarInfo) -> Self {
        self.insert(info);
        self
    }

    /// Adds or replaces a calendar.
    pub fn insert(&mut self, info: CalendarInfo) {
        self.calendars.insert(info.id.clone(), info);
    }

    pub fn len(&self) -> usize {
        self.calendars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.calendars.is_empty()
    }
}

impl FromIterator<CalendarInfo> for StaticRegistry {
    fn from_iter<I: IntoIterator<Item = CalendarInfo>>(iter: I) -> Self {
        let mut registry = Self::new();
        for info in iter {
            registry.insert(info);
        }
        registry
    }
}

impl CalendarRegistry for StaticRegistry {
    fn lookup<'a>(&'a self, id: &'a str) -> BoxFuture<'a, FeedResult<CalendarInfo>> {
        let result = self
            .calendars
            .get(id)
            .cloned()
            .ok_or_else(|| FeedError::not_found(id));
        Box::pin(async move { result })
    }

    fn list(&self) -> BoxFuture<'_, Vec<CalendarInfo>> {
        let mut calendars: Vec<_> = self.calendars.values().cloned().collect();
        calendars.sort_by(|a, b| a.id.cmp(&b.id));
        Box::pin(async move { calendars })
    }
}

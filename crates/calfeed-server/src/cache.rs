//! Event cache keyed by feed URL and calendar, with TTL support.
//!
//! Expiry is checked when an entry is read. Entries are never swept in the
//! background; [`CacheStore::evict_expired`] is available to callers that
//! want to reclaim memory.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use calfeed_core::CalendarEvent;
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, trace};

/// Identifies one cached expansion.
///
/// Both parts are needed: two calendars may share a feed URL.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub feed_url: String,
    pub calendar_id: String,
}

impl CacheKey {
    pub fn new(feed_url: impl Into<String>, calendar_id: impl Into<String>) -> Self {
        Self {
            feed_url: feed_url.into(),
            calendar_id: calendar_id.into(),
        }
    }
}

/// Cache entry containing expanded events and metadata.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    /// Expanded events, in expansion order.
    events: Arc<Vec<CalendarEvent>>,
    /// When the entry was created.
    pub updated_at: DateTime<Utc>,
    /// Creation time on the monotonic clock.
    created: Instant,
    /// Expansion window the events were produced with.
    pub date_range_months: u32,
    pub event_count: usize,
}

impl CacheEntry {
    /// Creates a new cache entry timestamped now.
    pub fn new(events: Vec<CalendarEvent>, date_range_months: u32) -> Self {
        Self {
            event_count: events.len(),
            events: Arc::new(events),
            updated_at: Utc::now(),
            created: Instant::now(),
            date_range_months,
        }
    }

    /// Shared handle to the cached events.
    pub fn events(&self) -> &Arc<Vec<CalendarEvent>> {
        &self.events
    }

    pub fn age(&self) -> Duration {
        self.created.elapsed()
    }

    /// Returns true once the entry is at least `ttl` old.
    pub fn is_expired(&self, ttl: Duration) -> bool {
        self.age() >= ttl
    }
}

/// Read-only summary of one cache entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheDiagnostic {
    pub calendar_id: String,
    pub feed_url: String,
    pub event_count: usize,
    pub last_updated: DateTime<Utc>,
    pub date_range_months: u32,
    pub expired: bool,
}

/// Event cache with TTL support.
#[derive(Debug)]
pub struct CacheStore {
    ttl: Duration,
    max_entries: Option<usize>,
    entries: HashMap<CacheKey, CacheEntry>,
}

impl CacheStore {
    /// Creates a new cache with the given TTL and no size bound.
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            max_entries: None,
            entries: HashMap::new(),
        }
    }

    /// Builder: bound the number of entries, evicting the oldest on overflow.
    pub fn with_max_entries(mut self, max: usize) -> Self {
        self.max_entries = Some(max.max(1));
        self
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Returns the cached events for `key` if the entry is fresh, was built
    /// with the same window, and `force_refresh` is not set.
    pub fn get(
        &self,
        key: &CacheKey,
        window_months: u32,
        force_refresh: bool,
    ) -> Option<Arc<Vec<CalendarEvent>>> {
        if force_refresh {
            trace!(calendar_id = %key.calendar_id, "Cache bypassed by forced refresh");
            return None;
        }
        let Some(entry) = self.entries.get(key) else {
            debug!(calendar_id = %key.calendar_id, "Cache miss");
            return None;
        };
        if entry.date_range_months != window_months {
            debug!(
                calendar_id = %key.calendar_id,
                cached_months = entry.date_range_months,
                requested_months = window_months,
                "Cache miss: window mismatch"
            );
            return None;
        }
        if entry.is_expired(self.ttl) {
            debug!(
                calendar_id = %key.calendar_id,
                age_ms = entry.age().as_millis() as u64,
                "Cache miss: entry expired"
            );
            return None;
        }
        debug!(calendar_id = %key.calendar_id, events = entry.event_count, "Cache hit");
        Some(Arc::clone(&entry.events))
    }

    /// Returns the cached events for `key` regardless of age or window.
    pub fn get_stale(&self, key: &CacheKey) -> Option<Arc<Vec<CalendarEvent>>> {
        self.entries.get(key).map(|entry| Arc::clone(&entry.events))
    }

    /// Creates or replaces the entry for `key`.
    pub fn put(
        &mut self,
        key: CacheKey,
        events: Vec<CalendarEvent>,
        window_months: u32,
    ) -> Arc<Vec<CalendarEvent>> {
        let entry = CacheEntry::new(events, window_months);
        let shared = Arc::clone(&entry.events);
        debug!(
            calendar_id = %key.calendar_id,
            events = entry.event_count,
            window_months = window_months,
            "Stored cache entry"
        );
        self.insert_entry(key, entry);
        shared
    }

    /// Puts back an entry removed by [`invalidate`](Self::invalidate), unless
    /// a newer one has been stored meanwhile.
    pub fn reinstate(&mut self, key: CacheKey, entry: CacheEntry) {
        if self.entries.contains_key(&key) {
            return;
        }
        debug!(calendar_id = %key.calendar_id, "Reinstated cache entry");
        self.insert_entry(key, entry);
    }

    fn insert_entry(&mut self, key: CacheKey, entry: CacheEntry) {
        let full = self
            .max_entries
            .is_some_and(|max| self.entries.len() >= max);
        if full && !self.entries.contains_key(&key) {
            self.evict_oldest();
        }
        self.entries.insert(key, entry);
    }

    fn evict_oldest(&mut self) {
        let oldest = self
            .entries
            .iter()
            .min_by_key(|(_, entry)| entry.created)
            .map(|(key, _)| key.clone());
        if let Some(key) = oldest {
            self.entries.remove(&key);
            debug!(calendar_id = %key.calendar_id, "Evicted oldest cache entry");
        }
    }

    /// Removes the entry for `key`, returning it.
    pub fn invalidate(&mut self, key: &CacheKey) -> Option<CacheEntry> {
        let entry = self.entries.remove(key);
        if entry.is_some() {
            debug!(calendar_id = %key.calendar_id, "Invalidated cache entry");
        }
        entry
    }

    /// Removes every entry belonging to `calendar_id`.
    pub fn invalidate_calendar(&mut self, calendar_id: &str) -> usize {
        let before = self.entries.len();
        self.entries.retain(|key, _| key.calendar_id != calendar_id);
        let removed = before - self.entries.len();
        if removed > 0 {
            debug!(calendar_id = %calendar_id, removed = removed, "Invalidated calendar");
        }
        removed
    }

    /// Clears all cache entries.
    pub fn invalidate_all(&mut self) -> usize {
        let count = self.entries.len();
        self.entries.clear();
        debug!(count = count, "Cleared all cache entries");
        count
    }

    /// Removes all expired entries.
    pub fn evict_expired(&mut self) -> usize {
        let ttl = self.ttl;
        let before = self.entries.len();
        self.entries.retain(|key, entry| {
            let keep = !entry.is_expired(ttl);
            if !keep {
                trace!(calendar_id = %key.calendar_id, "Evicting expired cache entry");
            }
            keep
        });
        let evicted = before - self.entries.len();
        if evicted > 0 {
            debug!(evicted = evicted, "Evicted expired cache entries");
        }
        evicted
    }

    /// Summaries of every entry, sorted by calendar id.
    pub fn diagnostics(&self) -> Vec<CacheDiagnostic> {
        let mut out: Vec<_> = self
            .entries
            .iter()
            .map(|(key, entry)| CacheDiagnostic {
                calendar_id: key.calendar_id.clone(),
                feed_url: key.feed_url.clone(),
                event_count: entry.event_count,
                last_updated: entry.updated_at,
                date_range_months: entry.date_range_months,
                expired: entry.is_expired(self.ttl),
            })
            .collect();
        out.sort_by(|a, b| {
            a.calendar_id
                .cmp(&b.calendar_id)
                .then_with(|| a.feed_url.cmp(&b.feed_url))
        });
        out
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

//! Orchestration of registry lookup, cache, fetch, expansion and enrichment.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Instant;

use calfeed_core::{CalendarEvent, PreferencesProvider, TimeWindow, enrich, filter_by_range};
use calfeed_providers::{CalendarInfo, CalendarRegistry, FeedError, FeedFetcher, expand};
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard, RwLock};
use tracing::{debug, info, warn};

use crate::cache::{CacheDiagnostic, CacheKey, CacheStore};
use crate::config::ServiceConfig;
use crate::error::ServiceResult;

/// Parameters of a [`FeedService::get_events`] call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EventsQuery {
    /// Expansion window in months; the service default when `None`.
    pub window_months: Option<u32>,
    /// Skip the cache and refetch.
    pub force_refresh: bool,
    /// Only return events overlapping this range (inclusive on both ends).
    pub range: Option<TimeWindow>,
}

impl EventsQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_window_months(mut self, months: u32) -> Self {
        self.window_months = Some(months);
        self
    }

    pub fn with_force_refresh(mut self, force: bool) -> Self {
        self.force_refresh = force;
        self
    }

    pub fn with_range(mut self, range: TimeWindow) -> Self {
        self.range = Some(range);
        self
    }
}

/// Where the events of a response came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventSource {
    /// Fresh cache hit.
    Cache,
    /// Fetched and expanded for this request.
    Fetched,
    /// Fetch failed; last good cache entry served instead.
    Stale,
}

/// Events returned to the rendering layer.
#[derive(Debug, Clone)]
pub struct EventsResponse {
    /// Enriched, range-filtered events in expansion order.
    pub events: Vec<CalendarEvent>,
    pub source: EventSource,
}

/// Feed service: the entry point used by the rendering layer.
pub struct FeedService {
    config: ServiceConfig,
    registry: Arc<dyn CalendarRegistry>,
    fetcher: Arc<dyn FeedFetcher>,
    preferences: Arc<dyn PreferencesProvider>,
    cache: RwLock<CacheStore>,
    in_flight: Mutex<HashMap<CacheKey, Arc<AsyncMutex<()>>>>,
}

impl FeedService {
    /// Creates a new service with an empty cache.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::Config`](crate::ServiceError::Config) if the
    /// configuration is invalid.
    pub fn new(
        config: ServiceConfig,
        registry: Arc<dyn CalendarRegistry>,
        fetcher: Arc<dyn FeedFetcher>,
        preferences: Arc<dyn PreferencesProvider>,
    ) -> ServiceResult<Self> {
        config.validate()?;
        let mut cache = CacheStore::new(config.cache_ttl);
        if let Some(max) = config.max_cache_entries {
            cache = cache.with_max_entries(max);
        }
        Ok(Self {
            config,
            registry,
            fetcher,
            preferences,
            cache: RwLock::new(cache),
            in_flight: Mutex::new(HashMap::new()),
        })
    }

    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    /// Returns the events of `calendar_id`.
    ///
    /// Serves a fresh cache entry when one matches, otherwise fetches and
    /// expands the feed. Network, HTTP and parse failures fall back to the
    /// last cached events for the calendar if any exist.
    ///
    /// # Errors
    ///
    /// Fails with [`FeedError::NotFound`] for unknown calendars, and with the
    /// fetch or parse error when no cached data exists.
    pub async fn get_events(
        &self,
        calendar_id: &str,
        query: EventsQuery,
    ) -> ServiceResult<EventsResponse> {
        let info = self.registry.lookup(calendar_id).await?;
        let months = query.window_months.unwrap_or(self.config.default_window_months);
        let key = CacheKey::new(&info.feed_url, &info.id);

        let (events, source) = self.load(&info, key, months, query.force_refresh).await?;

        let preferences = self.preferences.as_ref();
        let events = match query.range {
            Some(range) => {
                let selected = filter_by_range(events.iter(), range.start, range.end);
                enrich(&selected, preferences)
            }
            None => enrich(events.iter(), preferences),
        };
        Ok(EventsResponse { events, source })
    }

    /// Forces a refetch of `calendar_id` with the default window.
    pub async fn refresh(&self, calendar_id: &str) -> ServiceResult<EventsResponse> {
        self.get_events(calendar_id, EventsQuery::new().with_force_refresh(true))
            .await
    }

    /// Drops cached data for `calendar_id`. No-op when nothing is cached.
    pub async fn invalidate(&self, calendar_id: &str) -> usize {
        self.cache.write().await.invalidate_calendar(calendar_id)
    }

    /// Drops all cached data.
    pub async fn invalidate_all(&self) -> usize {
        self.cache.write().await.invalidate_all()
    }

    /// Removes expired cache entries.
    pub async fn evict_expired(&self) -> usize {
        self.cache.write().await.evict_expired()
    }

    pub async fn cache_diagnostics(&self) -> Vec<CacheDiagnostic> {
        self.cache.read().await.diagnostics()
    }

    /// Lists the calendars known to the registry.
    pub async fn calendars(&self) -> Vec<CalendarInfo> {
        self.registry.list().await
    }

    async fn load(
        &self,
        info: &CalendarInfo,
        key: CacheKey,
        months: u32,
        force_refresh: bool,
    ) -> ServiceResult<(Arc<Vec<CalendarEvent>>, EventSource)> {
        if let Some(events) = self.cache.read().await.get(&key, months, force_refresh) {
            return Ok((events, EventSource::Cache));
        }

        let permit = self.acquire(&key).await;
        let outcome = self.load_exclusive(info, &key, months, force_refresh).await;
        drop(permit);
        self.release(&key);
        outcome
    }

    async fn load_exclusive(
        &self,
        info: &CalendarInfo,
        key: &CacheKey,
        months: u32,
        force_refresh: bool,
    ) -> ServiceResult<(Arc<Vec<CalendarEvent>>, EventSource)> {
        // Another request may have filled the entry while we waited.
        if let Some(events) = self.cache.read().await.get(key, months, force_refresh) {
            return Ok((events, EventSource::Cache));
        }

        let removed = if force_refresh {
            self.cache.write().await.invalidate(key)
        } else {
            None
        };

        match self.fetch_and_expand(info, months).await {
            Ok(events) => {
                let events = self.cache.write().await.put(key.clone(), events, months);
                Ok((events, EventSource::Fetched))
            }
            Err(err) => {
                let mut cache = self.cache.write().await;
                if let Some(entry) = removed {
                    cache.reinstate(key.clone(), entry);
                }
                match cache.get_stale(key) {
                    Some(events) if err.allows_stale_fallback() => {
                        warn!(
                            calendar_id = %info.id,
                            error = %err,
                            events = events.len(),
                            "Fetch failed, serving cached events"
                        );
                        Ok((events, EventSource::Stale))
                    }
                    _ => Err(err.into()),
                }
            }
        }
    }

    async fn fetch_and_expand(
        &self,
        info: &CalendarInfo,
        months: u32,
    ) -> Result<Vec<CalendarEvent>, FeedError> {
        let started = Instant::now();
        let text = self.fetcher.fetch(&info.feed_url).await?;
        let events = expand(&text, &info.id, months)?;
        info!(
            calendar_id = %info.id,
            events = events.len(),
            bytes = text.len(),
            window_months = months,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Fetched calendar feed"
        );
        Ok(events)
    }

    /// Waits for the per-key fetch lock when single-flight is enabled.
    async fn acquire(&self, key: &CacheKey) -> Option<OwnedMutexGuard<()>> {
        if !self.config.single_flight {
            return None;
        }
        let lock = {
            let mut in_flight = self.in_flight.lock().unwrap_or_else(PoisonError::into_inner);
            Arc::clone(in_flight.entry(key.clone()).or_default())
        };
        Some(lock.lock_owned().await)
    }

    fn release(&self, key: &CacheKey) {
        if !self.config.single_flight {
            return;
        }
        let mut in_flight = self.in_flight.lock().unwrap_or_else(PoisonError::into_inner);
        // Only the map holds it: nobody is waiting.
        if in_flight.get(key).is_some_and(|lock| Arc::strong_count(lock) == 1) {
            in_flight.remove(key);
            debug!(calendar_id = %key.calendar_id, "Released fetch lock");
        }
    }
}

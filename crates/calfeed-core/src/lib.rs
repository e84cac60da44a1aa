//! Core types: calendar events, time windows, range filtering, enrichment

pub mod enrich;
pub mod event;
pub mod filter;
pub mod time;
pub mod tracing;

pub use enrich::{DEFAULT_COLOR, PreferencesProvider, StaticPreferences, enrich};
pub use event::CalendarEvent;
pub use filter::{filter_by_range, overlaps};
pub use time::{ExpansionWindow, TimeWindow};
pub use tracing::{TracingConfig, TracingError, TracingOutputFormat, init_tracing};

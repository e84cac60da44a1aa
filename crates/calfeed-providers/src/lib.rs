//! Feed acquisition for calfeed.
//!
//! - [`FeedFetcher`] / [`HttpFetcher`] - Retrieves raw iCalendar text over HTTP
//! - [`parse_feed`] - Turns the text into [`FeedComponent`]s, skipping malformed VEVENTs
//! - [`expand`] - Expands recurrences into [`CalendarEvent`](calfeed_core::CalendarEvent)s
//! - [`CalendarRegistry`] - Resolves a calendar id to its feed URL
//! - [`FeedError`] - Error taxonomy shared by all of the above
//!
//! ```text
//! calendar id ──► CalendarRegistry ──► feed URL ──► FeedFetcher ──► text
//!                                                                    │
//!                                              parse_feed + expand ◄─┘
//!                                                    │
//!                                                    ▼
//!                                            Vec<CalendarEvent>
//! ```

pub mod config;
pub mod error;
pub mod expand;
pub mod fetcher;
pub mod ics;
pub mod registry;

pub use config::FetcherConfig;
pub use error::{FeedError, FeedErrorCode, FeedResult};
pub use expand::{MAX_SERIES_OCCURRENCES, expand, expand_in_window};
pub use fetcher::{BoxFuture, FeedFetcher, HttpFetcher};
pub use ics::{FeedComponent, IcalTime, ParsedFeed, parse_feed};
pub use registry::{CalendarInfo, CalendarRegistry, StaticRegistry};

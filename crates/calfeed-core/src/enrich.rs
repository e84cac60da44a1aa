//! Display enrichment: per-calendar color and visibility.
//!
//! Preferences live outside this crate (a favorites store, a config file).
//! They are injected through [`PreferencesProvider`].

use std::collections::HashMap;

use crate::event::CalendarEvent;

/// Color attached to events whose calendar has no configured color.
pub const DEFAULT_COLOR: &str = "#3b82f6";

/// Source of per-calendar display preferences.
pub trait PreferencesProvider: Send + Sync {
    /// Returns the configured color for a calendar, if any.
    fn color_for(&self, calendar_id: &str) -> Option<String>;

    /// Returns whether events of a calendar should be shown.
    ///
    /// Calendars without a stored preference are visible.
    fn is_visible(&self, calendar_id: &str) -> bool;
}

/// In-memory preferences keyed by calendar identifier.
#[derive(Debug, Clone, Default)]
pub struct StaticPreferences {
    colors: HashMap<String, String>,
    visibility: HashMap<String, bool>,
}

impl StaticPreferences {
    /// Creates an empty preference set (default color, everything visible).
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method to set the color of a calendar.
    pub fn with_color(mut self, calendar_id: impl Into<String>, color: impl Into<String>) -> Self {
        self.colors.insert(calendar_id.into(), color.into());
        self
    }

    /// Builder method to set the visibility of a calendar.
    pub fn with_visibility(mut self, calendar_id: impl Into<String>, visible: bool) -> Self {
        self.visibility.insert(calendar_id.into(), visible);
        self
    }

    /// Sets the color of a calendar.
    pub fn set_color(&mut self, calendar_id: impl Into<String>, color: impl Into<String>) {
        self.colors.insert(calendar_id.into(), color.into());
    }

    /// Sets the visibility of a calendar.
    pub fn set_visibility(&mut self, calendar_id: impl Into<String>, visible: bool) {
        self.visibility.insert(calendar_id.into(), visible);
    }
}

impl PreferencesProvider for StaticPreferences {
    fn color_for(&self, calendar_id: &str) -> Option<String> {
        self.colors.get(calendar_id).cloned()
    }

    fn is_visible(&self, calendar_id: &str) -> bool {
        self.visibility.get(calendar_id).copied().unwrap_or(true)
    }
}

/// Attaches colors and drops events of hidden calendars.
///
/// Works on copies; the input events (typically cached) are never touched.
pub fn enrich<'a, I>(events: I, preferences: &dyn PreferencesProvider) -> Vec<CalendarEvent>
where
    I: IntoIterator<Item = &'a CalendarEvent>,
{
    let mut colors: HashMap<&str, String> = HashMap::new();

    events
        .into_iter()
        .filter(|event| preferences.is_visible(&event.calendar_id))
        .map(|event| {
            let color = colors
                .entry(event.calendar_id.as_str())
                .or_insert_with(|| {
                    preferences
                        .color_for(&event.calendar_id)
                        .unwrap_or_else(|| DEFAULT_COLOR.to_string())
                })
                .clone();
            CalendarEvent {
                color: Some(color),
                ..event.clone()
            }
        })
        .collect()
}

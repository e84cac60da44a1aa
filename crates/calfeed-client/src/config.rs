//! Client configuration.
//!
//! All settings live in a single `config.toml` file at
//! `~/.config/calfeed/config.toml` by default:
//!
//! ```toml
//! [[calendars]]
//! id = "work"
//! name = "Work"
//! feed_url = "https://example.com/work.ics"
//! color = "#ef4444"
//!
//! [cache]
//! ttl_secs = 30
//! window_months = 12
//!
//! [http]
//! timeout_secs = 30
//! ```

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::time::Duration;

use calfeed_core::StaticPreferences;
use calfeed_providers::{CalendarInfo, FetcherConfig, StaticRegistry};
use calfeed_server::{DEFAULT_CACHE_TTL_SECS, DEFAULT_WINDOW_MONTHS, ServiceConfig};
use serde::{Deserialize, Serialize};

use crate::error::{ClientError, ClientResult};

/// Configuration for the calfeed client.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Subscribed calendars.
    pub calendars: Vec<CalendarSettings>,

    /// Cache settings.
    pub cache: CacheSettings,

    /// HTTP settings.
    pub http: HttpSettings,
}

/// One calendar subscription with its display preferences.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarSettings {
    pub id: String,

    /// Display name; the id when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    pub feed_url: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,

    #[serde(default = "default_visible")]
    pub visible: bool,
}

fn default_visible() -> bool {
    true
}

impl CalendarSettings {
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.id)
    }
}

/// Cache settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheSettings {
    /// Seconds a fetched feed is reused.
    pub ttl_secs: u64,

    /// Recurrence expansion window in months.
    pub window_months: u32,

    /// Upper bound on cached feeds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_entries: Option<usize>,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            ttl_secs: DEFAULT_CACHE_TTL_SECS,
            window_months: DEFAULT_WINDOW_MONTHS,
            max_entries: None,
        }
    }
}

/// HTTP settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpSettings {
    /// Request timeout in seconds.
    pub timeout_secs: u64,

    /// Connect timeout in seconds.
    pub connect_timeout_secs: u64,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,

    pub verify_tls: bool,
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self {
            timeout_secs: FetcherConfig::DEFAULT_TIMEOUT_SECS,
            connect_timeout_secs: FetcherConfig::DEFAULT_CONNECT_TIMEOUT_SECS,
            user_agent: None,
            verify_tls: true,
        }
    }
}

impl AppConfig {
    /// Loads configuration from the default path, or defaults if it does not exist.
    pub fn load() -> ClientResult<Self> {
        let path = Self::default_path();
        if path.exists() {
            Self::load_from(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Loads configuration from a specific path.
    pub fn load_from(path: &Path) -> ClientResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            ClientError::Config(format!("failed to read {}: {}", path.display(), e))
        })?;
        Self::parse(&content)
    }

    /// Parses configuration from TOML text.
    pub fn parse(content: &str) -> ClientResult<Self> {
        toml::from_str(content)
            .map_err(|e| ClientError::Config(format!("failed to parse config: {}", e)))
    }

    /// Returns the default configuration file path.
    pub fn default_path() -> PathBuf {
        Self::default_config_dir().join("config.toml")
    }

    /// Returns the default configuration directory.
    pub fn default_config_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("calfeed")
    }

    /// Checks calendar ids, feed URLs and numeric settings.
    pub fn validate(&self) -> ClientResult<()> {
        let mut seen = HashSet::new();
        for calendar in &self.calendars {
            if calendar.id.trim().is_empty() {
                return Err(ClientError::Config("calendar id must not be empty".to_string()));
            }
            if !seen.insert(calendar.id.as_str()) {
                return Err(ClientError::Config(format!("duplicate calendar id: {}", calendar.id)));
            }
            let url = url::Url::parse(&calendar.feed_url).map_err(|e| {
                ClientError::Config(format!("calendar {}: invalid feed_url: {}", calendar.id, e))
            })?;
            if !matches!(url.scheme(), "http" | "https") {
                return Err(ClientError::Config(format!(
                    "calendar {}: feed_url must use http or https",
                    calendar.id
                )));
            }
        }
        self.service_config()
            .validate()
            .map_err(|e| ClientError::Config(e.to_string()))?;
        Ok(())
    }

    /// Ids of calendars marked visible, in file order.
    pub fn visible_calendar_ids(&self) -> Vec<String> {
        self.calendars
            .iter()
            .filter(|c| c.visible)
            .map(|c| c.id.clone())
            .collect()
    }

    pub fn registry(&self) -> StaticRegistry {
        self.calendars
            .iter()
            .map(|c| CalendarInfo::new(&c.id, &c.feed_url).with_name(c.display_name()))
            .collect()
    }

    pub fn preferences(&self) -> StaticPreferences {
        let mut preferences = StaticPreferences::new();
        for calendar in &self.calendars {
            if let Some(color) = &calendar.color {
                preferences.set_color(&calendar.id, color);
            }
            preferences.set_visibility(&calendar.id, calendar.visible);
        }
        preferences
    }

    pub fn service_config(&self) -> ServiceConfig {
        let mut config = ServiceConfig::new()
            .with_cache_ttl(Duration::from_secs(self.cache.ttl_secs))
            .with_default_window_months(self.cache.window_months);
        if let Some(max) = self.cache.max_entries {
            config = config.with_max_cache_entries(max);
        }
        config
    }

    pub fn fetcher_config(&self) -> FetcherConfig {
        let mut config = FetcherConfig::new()
            .with_timeout(Duration::from_secs(self.http.timeout_secs))
            .with_connect_timeout(Duration::from_secs(self.http.connect_timeout_secs));
        if let Some(agent) = &self.http.user_agent {
            config = config.with_user_agent(agent);
        }
        if !self.http.verify_tls {
            config = config.with_insecure_tls();
        }
        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use calfeed_core::PreferencesProvider;
    use std::io::Write;

    const SAMPLE: &str = r##"
[[calendars]]
id = "work"
name = "Work"
feed_url = "https://example.com/work.ics"
color = "#ef4444"

[[calendars]]
id = "holidays"
feed_url = "https://example.com/holidays.ics"
visible = false

[cache]
ttl_secs = 60
window_months = 3
max_entries = 8

[http]
timeout_secs = 5
verify_tls = false
"##;

    #[test]
    fn defaults_when_empty() {
        let config = AppConfig::parse("").unwrap();
        assert!(config.calendars.is_empty());
        assert_eq!(config.cache.ttl_secs, 30);
        assert_eq!(config.cache.window_months, 12);
        assert_eq!(config.http.timeout_secs, 30);
        assert!(config.http.verify_tls);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn parses_sample() {
        let config = AppConfig::parse(SAMPLE).unwrap();

        assert_eq!(config.calendars.len(), 2);
        assert_eq!(config.calendars[0].display_name(), "Work");
        assert_eq!(config.calendars[1].display_name(), "holidays");
        assert!(config.calendars[0].visible);
        assert!(!config.calendars[1].visible);
        assert_eq!(config.visible_calendar_ids(), vec!["work"]);

        let service = config.service_config();
        assert_eq!(service.cache_ttl, Duration::from_secs(60));
        assert_eq!(service.default_window_months, 3);
        assert_eq!(service.max_cache_entries, Some(8));

        let fetcher = config.fetcher_config();
        assert_eq!(fetcher.timeout, Duration::from_secs(5));
        assert!(!fetcher.verify_tls);
    }

    #[test]
    fn preferences_follow_calendars() {
        let config = AppConfig::parse(SAMPLE).unwrap();
        let preferences = config.preferences();

        assert_eq!(preferences.color_for("work").as_deref(), Some("#ef4444"));
        assert_eq!(preferences.color_for("holidays"), None);
        assert!(preferences.is_visible("work"));
        assert!(!preferences.is_visible("holidays"));
        assert_eq!(config.registry().len(), 2);
    }

    #[test]
    fn load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SAMPLE.as_bytes()).unwrap();

        let config = AppConfig::load_from(file.path()).unwrap();
        assert_eq!(config.calendars[0].id, "work");
    }

    #[test]
    fn load_from_missing_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let err = AppConfig::load_from(&dir.path().join("nope.toml")).unwrap_err();
        assert!(matches!(err, ClientError::Config(_)));
    }

    #[test]
    fn rejects_malformed_toml() {
        assert!(AppConfig::parse("[[calendars]]\nid = ").is_err());
    }

    #[test]
    fn rejects_duplicate_ids() {
        let config = AppConfig::parse(
            r#"
[[calendars]]
id = "a"
feed_url = "https://example.com/1.ics"

[[calendars]]
id = "a"
feed_url = "https://example.com/2.ics"
"#,
        )
        .unwrap();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("duplicate calendar id"));
    }

    #[test]
    fn rejects_non_http_feed() {
        let config = AppConfig::parse(
            r#"
[[calendars]]
id = "a"
feed_url = "ftp://example.com/1.ics"
"#,
        )
        .unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn dump_round_trips() {
        let config = AppConfig::parse(SAMPLE).unwrap();
        let text = toml::to_string_pretty(&config).unwrap();
        let again = AppConfig::parse(&text).unwrap();
        assert_eq!(again.calendars, config.calendars);
    }

    #[test]
    fn default_path_ends_with_calfeed() {
        let path = AppConfig::default_path();
        assert!(path.ends_with("calfeed/config.toml"));
    }
}

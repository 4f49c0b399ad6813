//! User settings for SK Production Admin
//!
//! Manages the cache backend selection, audit query paging defaults and
//! display preferences.

use serde::{Deserialize, Serialize};

use super::paths::SkpPaths;
use crate::error::AdminError;

/// Environment variable that overrides the configured Redis URL
pub const REDIS_URL_ENV: &str = "REDIS_URL";

/// Which cache backend to use
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum CacheBackendKind {
    /// No cache; every cache operation is a no-op
    None,
    /// In-process cache (default)
    #[default]
    Memory,
    /// Redis server (requires the `redis` feature)
    Redis,
}

/// Cache settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheSettings {
    #[serde(default)]
    pub backend: CacheBackendKind,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub redis_url: Option<String>,

    /// TTL applied to cached reads, in seconds
    #[serde(default = "default_ttl_secs")]
    pub default_ttl_secs: u64,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            backend: CacheBackendKind::default(),
            redis_url: None,
            default_ttl_secs: default_ttl_secs(),
        }
    }
}

/// Audit query settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditSettings {
    #[serde(default = "default_page_size")]
    pub default_page_size: usize,

    #[serde(default = "default_max_page_size")]
    pub max_page_size: usize,
}

impl Default for AuditSettings {
    fn default() -> Self {
        Self {
            default_page_size: default_page_size(),
            max_page_size: default_max_page_size(),
        }
    }
}

/// User settings for SK Production Admin
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    /// Schema version for migration support
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,

    #[serde(default)]
    pub cache: CacheSettings,

    #[serde(default)]
    pub audit: AuditSettings,

    /// Default currency symbol
    #[serde(default = "default_currency")]
    pub currency_symbol: String,

    /// Date format preference (strftime format)
    #[serde(default = "default_date_format")]
    pub date_format: String,
}

fn default_schema_version() -> u32 {
    1
}

fn default_ttl_secs() -> u64 {
    300
}

fn default_page_size() -> usize {
    20
}

fn default_max_page_size() -> usize {
    100
}

fn default_currency() -> String {
    "$".to_string()
}

fn default_date_format() -> String {
    "%Y-%m-%d".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            cache: CacheSettings::default(),
            audit: AuditSettings::default(),
            currency_symbol: default_currency(),
            date_format: default_date_format(),
        }
    }
}

impl Settings {
    /// Load settings from disk, or fall back to defaults if the file doesn't exist
    ///
    /// `REDIS_URL` in the environment takes precedence over the stored URL.
    pub fn load_or_create(paths: &SkpPaths) -> Result<Self, AdminError> {
        let settings_path = paths.settings_file();

        let mut settings = if settings_path.exists() {
            let contents = std::fs::read_to_string(&settings_path)
                .map_err(|e| AdminError::Io(format!("Failed to read settings file: {}", e)))?;

            serde_json::from_str::<Settings>(&contents).map_err(|e| {
                AdminError::Config(format!("Failed to parse settings file: {}", e))
            })?
        } else {
            Settings::default()
        };

        if let Ok(url) = std::env::var(REDIS_URL_ENV) {
            if !url.trim().is_empty() {
                settings.cache.redis_url = Some(url);
            }
        }

        Ok(settings)
    }

    /// Save settings to disk
    pub fn save(&self, paths: &SkpPaths) -> Result<(), AdminError> {
        paths.ensure_directories()?;

        let contents = serde_json::to_string_pretty(self)
            .map_err(|e| AdminError::Config(format!("Failed to serialize settings: {}", e)))?;

        std::fs::write(paths.settings_file(), contents)
            .map_err(|e| AdminError::Io(format!("Failed to write settings file: {}", e)))?;

        Ok(())
    }

    /// Clamp a requested audit page size into `1..=max_page_size`
    pub fn audit_page_size(&self, requested: Option<usize>) -> usize {
        requested
            .unwrap_or(self.audit.default_page_size)
            .clamp(1, self.audit.max_page_size.max(1))
    }
}

//! Client configuration loaded from environment variables.

mod environment;
mod overrides;

use std::{env, path::PathBuf, time::Duration};

use thiserror::Error;

use finanzas_core::cache::CHANGE_SLOT_FILE;

pub use environment::{
    detect_environment, resolve_environment, Environment, EnvironmentSource, Service, ServiceUrls,
};
pub use overrides::OverrideStore;

/// Errors raised while resolving configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Unknown environment {0:?} (expected local, docker, hosted or production)")]
    UnknownEnvironment(String),

    #[error("Invalid URL for {service}: {url}")]
    InvalidUrl { service: &'static str, url: String },

    #[error("No configuration directory available; set FINANZAS_CONFIG_DIR")]
    NoConfigDir,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for configuration.
pub type Result<T> = std::result::Result<T, ConfigError>;

/// Cache and notification settings.
#[derive(Debug, Clone)]
pub struct Config {
    /// Cache TTL in seconds (default: 300)
    pub cache_ttl_seconds: u64,
    /// Maximum number of cache entries (default: 10,000)
    pub cache_max_entries: usize,
    /// Delay before the second change notification (default: 1,000)
    pub notify_delay_ms: u64,
    /// Bound on the AI insights call (default: 8)
    pub insights_timeout_seconds: u64,
    /// Directory holding the shared change slot
    pub slot_dir: Option<PathBuf>,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Environment variables:
    /// - `CACHE_TTL_SECONDS` - Cache TTL in seconds (default: 300)
    /// - `CACHE_MAX_ENTRIES` - Maximum cache entries (default: 10,000)
    /// - `NOTIFY_DELAY_MS` - Delayed notification offset (default: 1,000)
    /// - `INSIGHTS_TIMEOUT_SECONDS` - AI insights timeout (default: 8)
    /// - `FINANZAS_SLOT_DIR` - Change slot directory (default: user cache dir)
    pub fn from_env() -> Self {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        Self {
            cache_ttl_seconds: lookup("CACHE_TTL_SECONDS")
                .and_then(|v| v.parse().ok())
                .unwrap_or(300),
            cache_max_entries: lookup("CACHE_MAX_ENTRIES")
                .and_then(|v| v.parse().ok())
                .unwrap_or(10_000),
            notify_delay_ms: lookup("NOTIFY_DELAY_MS")
                .and_then(|v| v.parse().ok())
                .unwrap_or(1_000),
            insights_timeout_seconds: lookup("INSIGHTS_TIMEOUT_SECONDS")
                .and_then(|v| v.parse().ok())
                .unwrap_or(8),
            slot_dir: lookup("FINANZAS_SLOT_DIR")
                .map(PathBuf::from)
                .or_else(default_slot_dir),
        }
    }

    /// Get cache TTL as a Duration.
    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_seconds)
    }

    pub fn notify_delay(&self) -> Duration {
        Duration::from_millis(self.notify_delay_ms)
    }

    pub fn insights_timeout(&self) -> Duration {
        Duration::from_secs(self.insights_timeout_seconds)
    }

    /// Path of the shared change slot file, if a directory is known.
    pub fn slot_path(&self) -> Option<PathBuf> {
        self.slot_dir.as_ref().map(|dir| dir.join(CHANGE_SLOT_FILE))
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}

fn default_slot_dir() -> Option<PathBuf> {
    directories::BaseDirs::new().map(|b| b.cache_dir().join("finanzas"))
}

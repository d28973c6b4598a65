//! Configuration file model and loading
//!
//! Services read a single TOML file. Every section is optional; a missing
//! file is not an error (defaults are used), while a file that exists but
//! cannot be read or parsed is. Loading happens before logging is set up, so
//! the caller reports which file was used.

use crate::cache::CacheSettings;
use crate::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Default upper bound on entries per upstream cache
pub const DEFAULT_CACHE_MAX_ENTRIES: usize = 100_000;

/// Default connect/response timeout for upstream requests
pub const DEFAULT_TIMEOUT_MS: u64 = 10_000;

/// Top-level TOML configuration
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct TomlConfig {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub clients: ClientsConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Socket address the HTTP server binds to
    pub bind_addr: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:8081".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default tracing level when RUST_LOG is not set
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

/// Settings shared by all upstream clients plus one section per dependency
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ClientsConfig {
    /// Connect and response timeout, applied independently
    pub timeout_ms: u64,
    pub retry: RetryConfig,
    pub musicbrainz: UpstreamConfig,
    pub wikidata: UpstreamConfig,
    pub wikipedia: UpstreamConfig,
    pub cover_art: UpstreamConfig,
}

impl Default for ClientsConfig {
    fn default() -> Self {
        Self {
            timeout_ms: DEFAULT_TIMEOUT_MS,
            retry: RetryConfig::default(),
            musicbrainz: UpstreamConfig::default(),
            wikidata: UpstreamConfig::default(),
            wikipedia: UpstreamConfig::default(),
            cover_art: UpstreamConfig::default(),
        }
    }
}

/// Retry schedule for server-side upstream failures
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RetryConfig {
    /// Retries after the first attempt
    pub max_retries: u32,
    /// Delay before the first retry; doubles on each subsequent one
    pub min_backoff_ms: u64,
    /// Random spread applied to each delay, as a fraction of the delay
    pub jitter: f64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            min_backoff_ms: 500,
            jitter: 0.5,
        }
    }
}

/// One upstream dependency
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct UpstreamConfig {
    pub base_url: Option<String>,
    pub cache_ttl_secs: Option<u64>,
    pub cache_max_entries: Option<usize>,
}

impl UpstreamConfig {
    /// Cache policy for this dependency, falling back to the given TTL and
    /// [`DEFAULT_CACHE_MAX_ENTRIES`]
    pub fn cache_settings(&self, default_ttl: Duration) -> CacheSettings {
        CacheSettings::new(
            self.cache_ttl_secs
                .map(Duration::from_secs)
                .unwrap_or(default_ttl),
            self.cache_max_entries.unwrap_or(DEFAULT_CACHE_MAX_ENTRIES),
        )
    }
}

/// Parse configuration from TOML text
pub fn parse_toml_config(content: &str) -> Result<TomlConfig> {
    toml::from_str(content).map_err(|e| Error::Config(format!("Parse TOML failed: {}", e)))
}

/// Load configuration from a TOML file
///
/// A missing file yields the defaults. Read or parse failures are errors.
pub fn load_toml_config(path: &Path) -> Result<TomlConfig> {
    if !path.exists() {
        return Ok(TomlConfig::default());
    }

    let content = std::fs::read_to_string(path)?;
    parse_toml_config(&content)
}

/// Platform config location for a service, e.g. `~/.config/musify/musify-artist.toml`
pub fn default_config_path(service_name: &str) -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("musify").join(format!("{}.toml", service_name)))
}

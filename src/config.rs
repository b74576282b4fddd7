//! Configuration Module
//!
//! Handles loading and managing server configuration from environment
//! variables, and derives the engine's [`IndexConfig`] from it.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use tracing::level_filters::LevelFilter;

// == Log Level ==
/// Verbosity selected by the `LOG_LEVEL` setting.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    None,
    Error,
    Warn,
    #[default]
    Info,
    Debug,
}

impl LogLevel {
    /// Maps a configuration string onto a level, case-insensitively.
    ///
    /// Empty or unrecognized input selects `Info`.
    pub fn from_config_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "none" => LogLevel::None,
            "error" => LogLevel::Error,
            "warn" => LogLevel::Warn,
            "debug" => LogLevel::Debug,
            _ => LogLevel::Info,
        }
    }

    /// Returns the matching tracing filter; `None` turns logging off.
    pub fn as_filter(self) -> LevelFilter {
        match self {
            LogLevel::None => LevelFilter::OFF,
            LogLevel::Error => LevelFilter::ERROR,
            LogLevel::Warn => LevelFilter::WARN,
            LogLevel::Info => LevelFilter::INFO,
            LogLevel::Debug => LevelFilter::DEBUG,
        }
    }

    /// Default `EnvFilter` directive for this level.
    pub fn directive(self) -> String {
        let level = self.as_filter().to_string().to_lowercase();
        format!("autoindex={},tower_http={}", level, level)
    }
}

// == Index Config ==
/// Validated-at-construction settings of one index engine.
///
/// `Index::new` checks that `root` exists and is a directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexConfig {
    /// Directory every query is confined to
    pub root: PathBuf,
    /// Age at which cached responses are revalidated, zero = always
    pub ttl: Duration,
    /// Maximum number of cached responses, zero = unbounded
    pub max_size: usize,
}

impl IndexConfig {
    /// Creates a config for `root` with an always-revalidate, unbounded cache.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            ttl: Duration::ZERO,
            max_size: 0,
        }
    }
}

// == Server Config ==
/// Server configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Directory to index
    pub root: PathBuf,
    /// Cache TTL in seconds
    pub cache_ttl: u64,
    /// Maximum number of cached responses
    pub cache_max_size: usize,
    /// Reclaimer interval in seconds, 0 disables it
    pub cleanup_interval: u64,
    /// HTTP listen address
    pub server_addr: String,
    /// HTTP listen port
    pub server_port: u16,
    /// Log verbosity
    pub log_level: LogLevel,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `INDEX_ROOT` - Directory to index (default: working directory)
    /// - `CACHE_TTL` - Cache TTL in seconds (default: 0, always revalidate)
    /// - `CACHE_MAX_SIZE` - Maximum cached responses (default: 0, unbounded)
    /// - `CLEANUP_INTERVAL` - Reclaimer interval in seconds (default: 0, off)
    /// - `SERVER_ADDR` - Listen address (default: `::`)
    /// - `SERVER_PORT` - Listen port (default: 80)
    /// - `LOG_LEVEL` - none, error, warn, info or debug (default: info)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            root: env::var_os("INDEX_ROOT")
                .filter(|v| !v.is_empty())
                .map(PathBuf::from)
                .unwrap_or(defaults.root),
            cache_ttl: parse_var("CACHE_TTL").unwrap_or(defaults.cache_ttl),
            cache_max_size: parse_var("CACHE_MAX_SIZE").unwrap_or(defaults.cache_max_size),
            cleanup_interval: parse_var("CLEANUP_INTERVAL").unwrap_or(defaults.cleanup_interval),
            server_addr: env::var("SERVER_ADDR")
                .ok()
                .filter(|v| !v.is_empty())
                .unwrap_or(defaults.server_addr),
            server_port: parse_var("SERVER_PORT").unwrap_or(defaults.server_port),
            log_level: env::var("LOG_LEVEL")
                .map(|v| LogLevel::from_config_str(&v))
                .unwrap_or_default(),
        }
    }

    /// Engine settings derived from this configuration.
    pub fn index_config(&self) -> IndexConfig {
        IndexConfig {
            root: self.root.clone(),
            ttl: Duration::from_secs(self.cache_ttl),
            max_size: self.cache_max_size,
        }
    }

    /// Reclaimer interval, `None` when disabled.
    pub fn cleanup_interval(&self) -> Option<Duration> {
        (self.cleanup_interval > 0).then(|| Duration::from_secs(self.cleanup_interval))
    }

    /// `addr:port` string for the listener, bracketing IPv6 addresses.
    pub fn listen_addr(&self) -> String {
        if self.server_addr.contains(':') && !self.server_addr.starts_with('[') {
            format!("[{}]:{}", self.server_addr, self.server_port)
        } else {
            format!("{}:{}", self.server_addr, self.server_port)
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            root: env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
            cache_ttl: 0,
            cache_max_size: 0,
            cleanup_interval: 0,
            server_addr: "::".to_string(),
            server_port: 80,
            log_level: LogLevel::Info,
        }
    }
}

fn parse_var<T: std::str::FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|v| v.trim().parse().ok())
}

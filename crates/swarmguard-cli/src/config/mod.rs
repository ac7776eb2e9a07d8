//! Configuration management.
//!
//! The config file is never fatal: a missing file is created with defaults,
//! and anything unreadable falls back to defaults with a warning.

use anyhow::Result;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use swarmguard_client::DEFAULT_API_URL;
use swarmguard_core::controller::{
    DEFAULT_LIMIT_THRESHOLD_MS, DEFAULT_MAX_PEERS, DEFAULT_UNLIMIT_THRESHOLD_MS,
};
use swarmguard_core::latency::DEFAULT_WINDOW_SIZE;
use swarmguard_core::throttle::DEFAULT_NOTIFY_THRESHOLD_MS;
use swarmguard_core::{parse_range, AddressRange, GuardSettings, Thresholds};
use tracing::{info, warn};

/// Ranges that stay reachable unless configured otherwise: loopback and the
/// RFC 1918 private blocks.
pub const DEFAULT_WHITELIST: &[&str] = &[
    "127.0.0.0/8",
    "192.168.0.0/16",
    "172.16.0.0/12",
    "10.0.0.0/8",
];

/// On-disk configuration document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigFile {
    /// CIDR blocks that are never blocked
    #[serde(default)]
    pub whitelist: Option<Vec<String>>,

    /// CIDR blocks that are always blocked
    #[serde(default)]
    pub blacklist: Option<Vec<String>>,

    /// Monitor tunables
    #[serde(default)]
    pub monitor: MonitorConfig,
}

impl Default for ConfigFile {
    fn default() -> Self {
        Self {
            whitelist: Some(DEFAULT_WHITELIST.iter().map(ToString::to_string).collect()),
            blacklist: Some(Vec::new()),
            monitor: MonitorConfig::default(),
        }
    }
}

/// Tunables for the tick loop
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonitorConfig {
    /// Daemon RPC address
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Deadline in seconds for each daemon RPC call
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    /// Host the latency probe pings
    #[serde(default = "default_ping_target")]
    pub ping_target: String,

    /// Probe deadline in seconds
    #[serde(default = "default_ping_timeout")]
    pub ping_timeout_secs: u64,

    /// Seconds between ticks
    #[serde(default = "default_interval")]
    pub interval_secs: u64,

    /// Samples in the rolling average
    #[serde(default = "default_window_size")]
    pub window_size: usize,

    /// Enter restriction above this average
    #[serde(default = "default_limit")]
    pub limit_threshold_ms: f64,

    /// Leave restriction below this average
    #[serde(default = "default_unlimit")]
    pub unlimit_threshold_ms: f64,

    /// Alert above this average
    #[serde(default = "default_notify")]
    pub notify_threshold_ms: f64,

    /// Enter restriction above this many peers
    #[serde(default = "default_max_peers")]
    pub max_peers: usize,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            request_timeout_secs: default_request_timeout(),
            ping_target: default_ping_target(),
            ping_timeout_secs: default_ping_timeout(),
            interval_secs: default_interval(),
            window_size: default_window_size(),
            limit_threshold_ms: default_limit(),
            unlimit_threshold_ms: default_unlimit(),
            notify_threshold_ms: default_notify(),
            max_peers: default_max_peers(),
        }
    }
}

impl MonitorConfig {
    /// Replace inconsistent values with defaults, warning for each
    #[must_use]
    pub fn validated(mut self) -> Self {
        let defaults = Self::default();

        if !self.guard_settings().thresholds.is_consistent() {
            warn!(
                limit = self.limit_threshold_ms,
                unlimit = self.unlimit_threshold_ms,
                "unlimit threshold must be below limit threshold, using defaults"
            );
            self.limit_threshold_ms = defaults.limit_threshold_ms;
            self.unlimit_threshold_ms = defaults.unlimit_threshold_ms;
        }
        if self.window_size == 0 {
            warn!("window_size must be at least 1, using default");
            self.window_size = defaults.window_size;
        }
        if self.interval_secs == 0 {
            warn!("interval_secs must be at least 1, using default");
            self.interval_secs = defaults.interval_secs;
        }
        if self.request_timeout_secs == 0 {
            warn!("request_timeout_secs must be at least 1, using default");
            self.request_timeout_secs = defaults.request_timeout_secs;
        }
        if self.ping_timeout_secs == 0 {
            warn!("ping_timeout_secs must be at least 1, using default");
            self.ping_timeout_secs = defaults.ping_timeout_secs;
        }

        self
    }

    /// Engine settings derived from these tunables
    #[must_use]
    pub fn guard_settings(&self) -> GuardSettings {
        GuardSettings {
            thresholds: Thresholds {
                limit_ms: self.limit_threshold_ms,
                unlimit_ms: self.unlimit_threshold_ms,
                max_peers: self.max_peers,
            },
            notify_threshold_ms: self.notify_threshold_ms,
            window_size: self.window_size,
            probe_target: self.ping_target.clone(),
        }
    }
}

/// Loaded and validated configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Allow list, before bootstrap augmentation
    pub whitelist: Vec<AddressRange>,
    /// Deny list
    pub blacklist: Vec<AddressRange>,
    /// Loop tunables
    pub monitor: MonitorConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self::from_document(ConfigFile::default())
    }
}

impl Config {
    /// Get the default config file path
    pub fn path() -> Result<PathBuf> {
        Ok(project_dirs()?.config_dir().join("config.toml"))
    }

    /// Load configuration from `path`, creating it with defaults if missing
    pub fn load(path: &Path) -> Self {
        if !path.exists() {
            if let Err(e) = write_defaults(path) {
                warn!(path = %path.display(), error = %e, "failed to write default config");
                return Self::default();
            }
            info!(path = %path.display(), "created default config");
        }

        let document = std::fs::read_to_string(path)
            .map_err(anyhow::Error::from)
            .and_then(|content| Ok(toml::from_str::<ConfigFile>(&content)?));

        match document {
            Ok(document) => {
                let config = Self::from_document(document);
                info!(path = %path.display(), "loaded whitelist and blacklist from config");
                config
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "failed to load config, using defaults");
                Self::default()
            }
        }
    }

    /// Resolve a parsed document, substituting defaults for bad fields
    pub fn from_document(document: ConfigFile) -> Self {
        Self {
            whitelist: parse_list("whitelist", document.whitelist, DEFAULT_WHITELIST),
            blacklist: parse_list("blacklist", document.blacklist, &[]),
            monitor: document.monitor.validated(),
        }
    }
}

/// Platform directories for config and logs
pub fn project_dirs() -> Result<ProjectDirs> {
    ProjectDirs::from("io", "swarmguard", "swarmguard")
        .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))
}

/// Default directory for rotated log files
pub fn default_log_dir() -> Result<PathBuf> {
    Ok(project_dirs()?.data_local_dir().join("logs"))
}

fn write_defaults(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let content = toml::to_string_pretty(&ConfigFile::default())?;
    std::fs::write(path, content)?;
    Ok(())
}

fn parse_list(field: &str, entries: Option<Vec<String>>, default: &[&str]) -> Vec<AddressRange> {
    let defaults = || default.iter().filter_map(|s| parse_range(s).ok()).collect();

    let Some(entries) = entries else {
        return defaults();
    };

    let parsed: std::result::Result<Vec<_>, _> = entries.iter().map(|s| parse_range(s)).collect();
    match parsed {
        Ok(ranges) => ranges,
        Err(e) => {
            warn!(field, error = %e, "invalid entry, using default list");
            defaults()
        }
    }
}

// Default value functions for serde.
fn default_api_url() -> String {
    String::from(DEFAULT_API_URL)
}

const fn default_request_timeout() -> u64 {
    5
}

fn default_ping_target() -> String {
    String::from("8.8.8.8")
}

const fn default_ping_timeout() -> u64 {
    2
}

const fn default_interval() -> u64 {
    1
}

const fn default_window_size() -> usize {
    DEFAULT_WINDOW_SIZE
}

const fn default_limit() -> f64 {
    DEFAULT_LIMIT_THRESHOLD_MS
}

const fn default_unlimit() -> f64 {
    DEFAULT_UNLIMIT_THRESHOLD_MS
}

const fn default_notify() -> f64 {
    DEFAULT_NOTIFY_THRESHOLD_MS
}

const fn default_max_peers() -> usize {
    DEFAULT_MAX_PEERS
}

//! Configuration System
//!
//! Handles loading configuration from files and environment variables.
//! Supports TOML config files and environment variable overrides.

use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::chat::{SessionMessages, DEFAULT_ERROR_MESSAGE, DEFAULT_GREETING};
use crate::client::ClientConfig as HttpClientConfig;
use crate::dashboard::DEFAULT_ERROR_NOTICE;

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub client: ClientConfig,

    #[serde(default)]
    pub chat: ChatConfig,

    #[serde(default)]
    pub dashboard: DashboardConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Assistant service connection
#[derive(Debug, Clone, Deserialize)]
pub struct ClientConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

fn default_base_url() -> String {
    "http://localhost:5000".to_string()
}

fn default_request_timeout() -> u64 {
    30
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            request_timeout_secs: default_request_timeout(),
        }
    }
}

impl ClientConfig {
    /// Settings for the HTTP client
    pub fn http(&self) -> HttpClientConfig {
        HttpClientConfig {
            base_url: self.base_url.clone(),
            request_timeout_ms: self.request_timeout_secs.saturating_mul(1000),
        }
    }
}

/// Chat session defaults
#[derive(Debug, Clone, Deserialize)]
pub struct ChatConfig {
    #[serde(default = "default_tier")]
    pub default_tier: String,

    #[serde(default = "default_severity")]
    pub default_severity: String,

    #[serde(default = "default_greeting")]
    pub greeting: String,

    #[serde(default = "default_error_message")]
    pub error_message: String,
}

fn default_tier() -> String {
    "free".to_string()
}

fn default_severity() -> String {
    "low".to_string()
}

fn default_greeting() -> String {
    DEFAULT_GREETING.to_string()
}

fn default_error_message() -> String {
    DEFAULT_ERROR_MESSAGE.to_string()
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            default_tier: default_tier(),
            default_severity: default_severity(),
            greeting: default_greeting(),
            error_message: default_error_message(),
        }
    }
}

impl ChatConfig {
    pub fn messages(&self) -> SessionMessages {
        SessionMessages {
            greeting: self.greeting.clone(),
            error_message: self.error_message.clone(),
        }
    }
}

/// Dashboard settings
#[derive(Debug, Clone, Deserialize)]
pub struct DashboardConfig {
    #[serde(default = "default_error_notice")]
    pub error_notice: String,
}

fn default_error_notice() -> String {
    DEFAULT_ERROR_NOTICE.to_string()
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            error_notice: default_error_notice(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl Config {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        let config: Config = toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        Ok(config)
    }

    /// Load configuration from environment variables only
    pub fn from_env() -> Self {
        let mut config = Config::default();
        config.apply_env_overrides();
        config
    }

    /// Load configuration with environment variable overrides
    pub fn load_with_env(path: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Load from default locations or environment.
    ///
    /// Nothing is logged here: this usually runs before logging is set up.
    /// Call [`LoadReport::log`] once a subscriber is installed.
    pub fn load_default() -> (Self, LoadReport) {
        Self::load_first(&default_paths())
    }

    /// Load the first readable file among `paths`, falling back to the
    /// environment alone
    pub fn load_first(paths: &[PathBuf]) -> (Self, LoadReport) {
        let mut report = LoadReport::default();

        for path in paths.iter().filter(|p| p.exists()) {
            match Self::load_with_env(path) {
                Ok(config) => {
                    report.loaded = Some(path.clone());
                    return (config, report);
                }
                Err(e) => report.failures.push(e),
            }
        }

        (Self::from_env(), report)
    }

    /// Apply environment variable overrides to an existing config
    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    fn apply_overrides<F>(&mut self, var: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = var("CONCIERGE_BASE_URL") {
            self.client.base_url = url;
        }
        if let Some(secs) = var("CONCIERGE_TIMEOUT_SECS") {
            if let Ok(s) = secs.parse() {
                self.client.request_timeout_secs = s;
            }
        }

        if let Some(tier) = var("CONCIERGE_TIER") {
            self.chat.default_tier = tier;
        }
        if let Some(severity) = var("CONCIERGE_SEVERITY") {
            self.chat.default_severity = severity;
        }

        if let Some(level) = var("CONCIERGE_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Some(format) = var("CONCIERGE_LOG_FORMAT") {
            self.logging.format = format;
        }
    }
}

/// Standard config file locations, in search order
pub fn default_paths() -> Vec<PathBuf> {
    [
        dirs::config_dir().map(|p| p.join("concierge").join("config.toml")),
        Some(PathBuf::from("/etc/concierge/config.toml")),
        Some(PathBuf::from("./config.toml")),
    ]
    .into_iter()
    .flatten()
    .collect()
}

/// Outcome of a config file search, kept for logging later
#[derive(Debug, Default)]
pub struct LoadReport {
    /// File the config came from, if any
    pub loaded: Option<PathBuf>,
    /// Files that existed but could not be used
    pub failures: Vec<ConfigError>,
}

impl LoadReport {
    pub fn log(&self) {
        for e in &self.failures {
            tracing::warn!("{}", e);
        }
        match &self.loaded {
            Some(path) => tracing::info!("Loaded config from {:?}", path),
            None => tracing::info!("Using default config with environment overrides"),
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path:?}: {error}")]
    Io { path: PathBuf, error: String },

    #[error("Failed to parse config file {path:?}: {error}")]
    Parse { path: PathBuf, error: String },
}

/// Generate a default config file content
pub fn generate_default_config() -> String {
    format!(
        r#"# Concierge Configuration
#
# Environment variables override these settings:
# - CONCIERGE_BASE_URL
# - CONCIERGE_TIMEOUT_SECS
# - CONCIERGE_TIER
# - CONCIERGE_SEVERITY
# - CONCIERGE_LOG_LEVEL
# - CONCIERGE_LOG_FORMAT

[client]
# Base URL of the assistant service
base_url = "http://localhost:5000"

# Per-request timeout in seconds
request_timeout_secs = 30

[chat]
# Tier and severity sent with every query unless overridden
default_tier = "free"
default_severity = "low"

# Shown when the conversation is cleared
greeting = "{greeting}"

# Shown when a request fails
error_message = "{error}"

[dashboard]
# Shown in place of the charts when metrics cannot be loaded
error_notice = "{notice}"

[logging]
# Log level: trace, debug, info, warn, error
level = "info"

# Log format: pretty (for development) or json (for production)
format = "pretty"
"#,
        greeting = DEFAULT_GREETING,
        error = DEFAULT_ERROR_MESSAGE,
        notice = DEFAULT_ERROR_NOTICE,
    )
}

//! Probe configuration loading from file and environment variables.

use serde::Deserialize;
use thiserror::Error;

use crate::LogLevel;

/// Top-level domprob configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Config {
    /// Subscriber settings.
    #[serde(default)]
    pub logging: LoggingConfig,

    /// The logger instrument registered with the default probe.
    #[serde(default)]
    pub default_logger: DefaultLoggerConfig,
}

/// Logging subscriber configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "domprob=trace,info").
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Whether to output logs in JSON format.
    #[serde(default)]
    pub json: bool,
}

/// Configuration of the default probe's logger instrument.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DefaultLoggerConfig {
    /// Value of the `logger` field on every emitted record.
    #[serde(default = "default_logger_name")]
    pub name: String,

    /// Records below this level are dropped by the instrument.
    #[serde(default = "default_logger_level")]
    pub level: LogLevel,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_logger_name() -> String {
    "default".to_string()
}

fn default_logger_level() -> LogLevel {
    LogLevel::Debug
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

impl Default for DefaultLoggerConfig {
    fn default() -> Self {
        Self {
            name: default_logger_name(),
            level: default_logger_level(),
        }
    }
}

/// Errors that can occur when loading configuration or installing the
/// logging subscriber.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read the configuration file.
    #[error("failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    /// Failed to parse the configuration file.
    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),

    /// A global subscriber could not be installed.
    #[error("failed to install logging subscriber: {0}")]
    Subscriber(String),
}

/// Loads configuration from a TOML file, falling back to defaults.
///
/// Environment variable overrides:
/// - `DOMPROB_LOG_LEVEL` overrides `logging.level`
/// - `DOMPROB_LOG_JSON` overrides `logging.json` (set to "true" to enable)
/// - `DOMPROB_LOGGER_NAME` overrides `default_logger.name`
/// - `DOMPROB_LOGGER_LEVEL` overrides `default_logger.level`
///
/// # Errors
///
/// Returns `ConfigError` if the file exists but cannot be read or parsed.
pub fn load_config(path: Option<&str>) -> Result<Config, ConfigError> {
    load_config_with(path, |key| std::env::var(key).ok())
}

/// Like [`load_config`], reading overrides through `lookup` instead of the
/// process environment.
///
/// # Errors
///
/// Returns `ConfigError` if the file exists but cannot be read or parsed.
pub fn load_config_with(
    path: Option<&str>,
    lookup: impl Fn(&str) -> Option<String>,
) -> Result<Config, ConfigError> {
    let mut config = match path {
        Some(p) => match std::fs::read_to_string(p) {
            Ok(contents) => toml::from_str(&contents)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::info!(path = p, "config file not found, using defaults");
                Config::default()
            }
            Err(e) => return Err(ConfigError::FileRead(e)),
        },
        None => Config::default(),
    };

    apply_env_overrides(&mut config, lookup);

    Ok(config)
}

/// Applies `DOMPROB_*` overrides read through `lookup`.
///
/// Values that fail to parse are ignored and the loaded value is kept.
pub fn apply_env_overrides(config: &mut Config, lookup: impl Fn(&str) -> Option<String>) {
    if let Some(level) = lookup("DOMPROB_LOG_LEVEL") {
        config.logging.level = level;
    }
    if let Some(json) = lookup("DOMPROB_LOG_JSON") {
        config.logging.json = json == "true" || json == "1";
    }
    if let Some(name) = lookup("DOMPROB_LOGGER_NAME") {
        if !name.trim().is_empty() {
            config.default_logger.name = name;
        }
    }
    if let Some(level) = lookup("DOMPROB_LOGGER_LEVEL") {
        if let Ok(parsed) = level.parse() {
            config.default_logger.level = parsed;
        }
    }
}

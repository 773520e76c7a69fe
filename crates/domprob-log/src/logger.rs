//! The logging capability and its `tracing`-backed implementation.

use serde::{Deserialize, Serialize};

/// Severity of a log record, ordered from least to most severe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Very fine-grained diagnostics.
    Trace,
    /// Diagnostics useful while developing.
    Debug,
    /// Normal operational records.
    Info,
    /// Something unexpected that did not stop the operation.
    Warn,
    /// An operation failed.
    Error,
}

impl LogLevel {
    /// Returns the canonical lowercase label for this level.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Trace => "trace",
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for LogLevel {
    type Err = ParseLogLevelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "trace" => Ok(Self::Trace),
            "debug" => Ok(Self::Debug),
            "info" => Ok(Self::Info),
            "warn" | "warning" => Ok(Self::Warn),
            "error" => Ok(Self::Error),
            _ => Err(ParseLogLevelError(s.to_string())),
        }
    }
}

/// Error returned when parsing an unknown log level string.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown log level: {0}")]
pub struct ParseLogLevelError(pub String);

/// An instrument that can record log messages.
///
/// Announced methods that want to log declare this capability as
/// `dyn Logger` and receive whichever registered instrument provides it.
pub trait Logger: Send + Sync {
    /// Records `message` at `level`.
    fn log(&self, level: LogLevel, message: &str);

    /// Records `message` at [`LogLevel::Trace`].
    fn trace(&self, message: &str) {
        self.log(LogLevel::Trace, message);
    }

    /// Records `message` at [`LogLevel::Debug`].
    fn debug(&self, message: &str) {
        self.log(LogLevel::Debug, message);
    }

    /// Records `message` at [`LogLevel::Info`].
    fn info(&self, message: &str) {
        self.log(LogLevel::Info, message);
    }

    /// Records `message` at [`LogLevel::Warn`].
    fn warn(&self, message: &str) {
        self.log(LogLevel::Warn, message);
    }

    /// Records `message` at [`LogLevel::Error`].
    fn error(&self, message: &str) {
        self.log(LogLevel::Error, message);
    }
}

/// A named [`Logger`] that emits `tracing` events.
///
/// Every event carries a `logger` field with the logger's name. Records
/// below `min_level` are dropped before reaching the subscriber.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TracingLogger {
    name: String,
    min_level: LogLevel,
}

impl TracingLogger {
    /// Creates a logger that forwards every level.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            min_level: LogLevel::Trace,
        }
    }

    /// Creates the logger described by the `[default_logger]` section.
    pub fn from_config(config: &crate::DefaultLoggerConfig) -> Self {
        Self::new(config.name.clone()).with_min_level(config.level)
    }

    /// Drops records below `level`.
    pub fn with_min_level(mut self, level: LogLevel) -> Self {
        self.min_level = level;
        self
    }

    /// The logger's name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The least severe level this logger forwards.
    pub fn min_level(&self) -> LogLevel {
        self.min_level
    }

    /// Whether a record at `level` would be forwarded.
    pub fn enabled(&self, level: LogLevel) -> bool {
        level >= self.min_level
    }
}

impl Default for TracingLogger {
    fn default() -> Self {
        Self::from_config(&crate::DefaultLoggerConfig::default())
    }
}

impl Logger for TracingLogger {
    fn log(&self, level: LogLevel, message: &str) {
        if !self.enabled(level) {
            return;
        }
        let logger = self.name.as_str();
        match level {
            LogLevel::Trace => tracing::trace!(logger, "{message}"),
            LogLevel::Debug => tracing::debug!(logger, "{message}"),
            LogLevel::Info => tracing::info!(logger, "{message}"),
            LogLevel::Warn => tracing::warn!(logger, "{message}"),
            LogLevel::Error => tracing::error!(logger, "{message}"),
        }
    }
}

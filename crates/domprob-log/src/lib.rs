//! Logging instrument and configuration for domprob probes.
//!
//! Provides the logging-capable instrument the default probe is configured
//! with, plus the configuration and subscriber setup shared by applications
//! that adopt domprob.
//!
//! - [`Logger`]: the capability announced methods ask for
//! - [`TracingLogger`]: a [`Logger`] that forwards records to `tracing`
//! - [`load_config`]: TOML configuration with environment overrides
//! - [`init_logging`]: installs a `tracing_subscriber` formatter
//!
//! # Usage
//!
//! ```rust,ignore
//! let config = domprob_log::load_config(Some("domprob.toml"))?;
//! domprob_log::init_logging(&config.logging)?;
//!
//! let logger = domprob_log::TracingLogger::from_config(&config.default_logger);
//! logger.info("order placed");
//! ```

pub mod config;
mod logger;
mod subscriber;

pub use config::{load_config, load_config_with, Config, ConfigError, DefaultLoggerConfig, LoggingConfig};
pub use logger::{LogLevel, Logger, ParseLogLevelError, TracingLogger};
pub use subscriber::init_logging;

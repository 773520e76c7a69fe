//! Global `tracing` subscriber installation.

use tracing_subscriber::EnvFilter;

use crate::{ConfigError, LoggingConfig};

/// Installs a `tracing_subscriber::fmt` subscriber as the global default.
///
/// The filter comes from `config.level`; an unparsable filter falls back
/// to `info`. Output is JSON when `config.json` is set.
///
/// # Errors
///
/// Returns `ConfigError::Subscriber` if a global subscriber is already
/// installed.
pub fn init_logging(config: &LoggingConfig) -> Result<(), ConfigError> {
    let filter = EnvFilter::try_new(&config.level).unwrap_or_else(|_| EnvFilter::new("info"));

    let installed = if config.json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .json()
            .try_init()
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).try_init()
    };

    installed.map_err(|e| ConfigError::Subscriber(e.to_string()))
}

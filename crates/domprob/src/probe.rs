//! The public entry point for announcing observations.

use std::sync::LazyLock;

use domprob_log::{load_config, Config, DefaultLoggerConfig, Logger, TracingLogger};
use domprob_types::DispatchError;

use crate::{BasicDispatcher, Dispatcher, Instrument, Observation};

/// Environment variable naming the TOML file the default probe reads.
pub const CONFIG_PATH_ENV: &str = "DOMPROB_CONFIG_PATH";

/// Announces observations through a dispatcher.
#[derive(Debug, Clone)]
pub struct Probe<D = BasicDispatcher> {
    dispatcher: D,
}

impl<D: Dispatcher> Probe<D> {
    pub fn new(dispatcher: D) -> Self {
        Self { dispatcher }
    }

    pub fn dispatcher(&self) -> &D {
        &self.dispatcher
    }

    /// Hands `observation` to the dispatcher.
    ///
    /// # Errors
    ///
    /// Propagates the dispatcher's `DispatchError` unchanged.
    pub fn observe<O: Observation>(&self, observation: &O) -> Result<(), DispatchError> {
        self.dispatcher.dispatch(observation)
    }
}

impl Probe {
    /// A probe backed by a [`BasicDispatcher`] over `instruments`.
    pub fn with_instruments(instruments: impl IntoIterator<Item = Instrument>) -> Self {
        Self::new(BasicDispatcher::new(instruments))
    }
}

/// Builds a probe over `instruments`.
///
/// With no instruments, the probe gets a single default logger built from
/// [`DefaultLoggerConfig::default`].
pub fn get_probe(instruments: impl IntoIterator<Item = Instrument>) -> Probe {
    let dispatcher = BasicDispatcher::new(instruments);
    if dispatcher.instruments().is_empty() {
        return Probe::with_instruments([default_logger(&DefaultLoggerConfig::default())]);
    }
    Probe::new(dispatcher)
}

/// A [`TracingLogger`] instrument, resolvable as `TracingLogger` and as
/// `dyn Logger`.
pub fn default_logger(config: &DefaultLoggerConfig) -> Instrument {
    Instrument::builder(TracingLogger::from_config(config))
        .supertype::<dyn Logger>(|logger| logger)
        .build()
}

static DEFAULT_PROBE: LazyLock<Probe> = LazyLock::new(|| {
    let config = default_config();
    tracing::debug!(
        logger = %config.default_logger.name,
        level = %config.default_logger.level,
        "initialising default probe"
    );
    Probe::with_instruments([default_logger(&config.default_logger)])
});

fn default_config() -> Config {
    let path = std::env::var(CONFIG_PATH_ENV).ok();
    load_config(path.as_deref()).unwrap_or_else(|e| {
        tracing::warn!(error = %e, "invalid probe configuration, using defaults");
        Config::default()
    })
}

/// The process-wide default probe.
///
/// Built on first use with one logger instrument configured from the file
/// named by `DOMPROB_CONFIG_PATH` and the `DOMPROB_*` environment
/// overrides.
pub fn probe() -> &'static Probe {
    &DEFAULT_PROBE
}

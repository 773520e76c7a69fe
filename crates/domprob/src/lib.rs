//! Announcement-driven observability for domain code.
//!
//! Domain events ("observations") declare which of their methods consume
//! which kinds of instruments (loggers, metric sinks, tracers). A
//! [`Probe`] holds the available instruments and, when an observation is
//! announced, calls every announced method with every instrument that
//! matches it.
//!
//! # Usage
//!
//! ```
//! use std::sync::Arc;
//! use domprob::{
//!     get_probe, AnnouncementCell, Announcements, ConfigurationError, Instrument, Logger,
//!     Observation, TracingLogger,
//! };
//!
//! struct OrderPlaced {
//!     order_id: u64,
//! }
//!
//! impl OrderPlaced {
//!     fn log(&self, logger: &Arc<dyn Logger>) {
//!         logger.info(&format!("order {} placed", self.order_id));
//!     }
//! }
//!
//! static ORDER_PLACED: AnnouncementCell<OrderPlaced> = AnnouncementCell::new(|| {
//!     Announcements::builder()
//!         .method("log", OrderPlaced::log, |m| m.require())
//!         .build()
//! });
//!
//! impl Observation for OrderPlaced {
//!     fn announcements() -> Result<&'static Announcements<Self>, ConfigurationError> {
//!         ORDER_PLACED.get()
//!     }
//! }
//!
//! let logger = Instrument::builder(TracingLogger::new("orders"))
//!     .supertype::<dyn Logger>(|l| l)
//!     .build();
//! let probe = get_probe([logger]);
//! probe.observe(&OrderPlaced { order_id: 7 }).unwrap();
//! ```
//!
//! # Errors
//!
//! Declaration problems surface as [`ConfigurationError`] when a table is
//! first built. Dispatch returns [`DispatchError`], which wraps either a
//! declaration problem, a [`MissingInstrumentError`], an
//! [`InstrumentTypeError`], or the announced method's own error.

mod announcement;
mod dispatcher;
mod instrument;
mod observation;
mod probe;
mod registry;

pub use announcement::{
    AnnouncementCell, Announcement, Announcements, AnnouncementsBuilder, Constraint, Declaration,
    MethodBuilder,
};
pub use dispatcher::{BasicDispatcher, DispatchPlan, Dispatcher};
pub use instrument::{Instrument, InstrumentBuilder};
pub use observation::{BoundAnnouncement, Observation};
pub use probe::{default_logger, get_probe, probe, Probe, CONFIG_PATH_ENV};
pub use registry::InstrumentRegistry;

pub use domprob_log::{LogLevel, Logger, TracingLogger};
pub use domprob_types::{
    short_type_name, BoxError, ConfigurationError, DispatchError, InstrumentType,
    InstrumentTypeError, MissingInstrumentError,
};

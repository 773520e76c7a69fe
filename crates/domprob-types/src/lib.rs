//! Shared types and error definitions for the domprob workspace.
//!
//! This crate provides the leaf types used across all domprob crates: the
//! [`InstrumentType`] descriptor that announcements are declared against,
//! and the error taxonomy (via `thiserror`) surfaced by declaration and
//! dispatch.
//!
//! # Error taxonomy
//!
//! | Error | Raised when |
//! |-------|-------------|
//! | [`ConfigurationError`] | An announcement table is malformed (declaration time) |
//! | [`MissingInstrumentError`] | A required instrument has no satisfying implementation |
//! | [`InstrumentTypeError`] | An announced method is called with an unsupported instrument |
//! | [`DispatchError`] | Any of the above, or an error returned by an announced method |

mod error;
mod instrument_type;

pub use error::{
    BoxError, ConfigurationError, DispatchError, InstrumentTypeError, MissingInstrumentError,
};
pub use instrument_type::{short_type_name, InstrumentType};

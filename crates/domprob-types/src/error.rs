//! Error types for announcement declaration and dispatch.

use crate::InstrumentType;

/// Boxed error returned by fallible announced methods.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Errors raised while declaring an observation's announcement table.
///
/// These surface when the table is first built, never mid-dispatch.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigurationError {
    /// An announced method was declared with an empty name.
    #[error("announced method on `{observation}` has an empty name")]
    EmptyMethodName {
        /// The declaring observation type.
        observation: String,
    },

    /// An announced method declared no instrument constraints.
    #[error("`{observation}.{method}(...)` has no supported instrument types defined")]
    NoConstraints {
        /// The declaring observation type.
        observation: String,
        /// The method name.
        method: String,
    },

    /// The same method name was declared twice on one observation type.
    #[error("`{observation}.{method}(...)` is declared more than once")]
    DuplicateMethod {
        /// The declaring observation type.
        observation: String,
        /// The method name.
        method: String,
    },

    /// A constraint names a type no instrument can be resolved as.
    #[error(
        "`{observation}.{method}(...)` announces `{instrument}`, which is not a matchable instrument type"
    )]
    UnmatchableType {
        /// The declaring observation type.
        observation: String,
        /// The method name.
        method: String,
        /// The rejected type name.
        instrument: String,
    },
}

/// A required instrument had no satisfying implementation in the registry.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error(
    "required instrument `{instrument}` in `{observation}.{method}(...)` is missing from available implementations: {}",
    list_or_none(.available)
)]
pub struct MissingInstrumentError {
    /// The observation type being dispatched.
    pub observation: String,
    /// The announced method whose constraint failed.
    pub method: String,
    /// The instrument type that could not be satisfied.
    pub instrument: InstrumentType,
    /// Concrete types of the instruments that were available.
    pub available: Vec<String>,
}

/// An announced method was called directly with an instrument that
/// satisfies none of its constraints.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error(
    "`{observation}.{method}(...)` expects its instrument to be one of: [{}], but got: `{actual}`",
    join_types(.expected)
)]
pub struct InstrumentTypeError {
    /// The observation type.
    pub observation: String,
    /// The announced method.
    pub method: String,
    /// The instrument types the method announces.
    pub expected: Vec<InstrumentType>,
    /// The concrete type of the rejected instrument.
    pub actual: InstrumentType,
}

/// Errors returned by `observe` and direct announcement calls.
#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
    /// The observation's announcement table failed to build.
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),

    /// A required instrument was missing; nothing was invoked.
    #[error(transparent)]
    MissingInstrument(#[from] MissingInstrumentError),

    /// An instrument did not satisfy any constraint of the called method.
    #[error(transparent)]
    InstrumentType(#[from] InstrumentTypeError),

    /// An announced method returned an error. The method's error is
    /// passed through as-is.
    #[error(transparent)]
    Method(BoxError),
}

impl DispatchError {
    /// Returns the announced method's own error, if it is of type `E`.
    pub fn method_error<E: std::error::Error + 'static>(&self) -> Option<&E> {
        match self {
            Self::Method(source) => source.downcast_ref::<E>(),
            _ => None,
        }
    }
}

fn list_or_none(items: &[String]) -> String {
    if items.is_empty() {
        return "None".to_string();
    }
    items
        .iter()
        .map(|item| format!("`{item}`"))
        .collect::<Vec<_>>()
        .join(", ")
}

fn join_types(types: &[InstrumentType]) -> String {
    types
        .iter()
        .map(|ty| format!("`{ty}`"))
        .collect::<Vec<_>>()
        .join(", ")
}

//! Nominal type descriptors for instruments.

use std::any::{Any, TypeId};
use std::fmt;
use std::hash::{Hash, Hasher};

/// A nominal description of an instrument type.
///
/// Announcements are declared against an `InstrumentType`, and registered
/// instruments advertise the set of `InstrumentType`s they can be resolved
/// as. Two descriptors are equal when they describe the same Rust type;
/// the name is kept for diagnostics only.
///
/// Both concrete types and trait objects can be described:
///
/// ```
/// use domprob_types::InstrumentType;
///
/// trait Sink {}
/// struct Console;
///
/// let concrete = InstrumentType::of::<Console>();
/// let abstract_ = InstrumentType::of::<dyn Sink>();
/// assert_ne!(concrete, abstract_);
/// assert_eq!(abstract_.to_string(), "dyn Sink");
/// ```
#[derive(Debug, Clone, Copy)]
pub struct InstrumentType {
    id: TypeId,
    name: &'static str,
}

impl InstrumentType {
    /// Returns the descriptor for `T`.
    pub fn of<T: ?Sized + 'static>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: std::any::type_name::<T>(),
        }
    }

    /// Returns the underlying `TypeId`.
    pub fn id(self) -> TypeId {
        self.id
    }

    /// Returns the fully qualified type name.
    pub fn name(self) -> &'static str {
        self.name
    }

    /// Returns the type name with module paths stripped.
    pub fn short_name(self) -> String {
        strip_paths(self.name)
    }

    /// Whether an instrument could ever be resolved against this type.
    ///
    /// The unit type and the bare `dyn Any` family carry no nominal
    /// identity, so announcements declared against them are rejected.
    pub fn is_matchable(self) -> bool {
        let unmatchable = [
            TypeId::of::<()>(),
            TypeId::of::<dyn Any>(),
            TypeId::of::<dyn Any + Send>(),
            TypeId::of::<dyn Any + Send + Sync>(),
        ];
        !unmatchable.contains(&self.id)
    }
}

impl PartialEq for InstrumentType {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for InstrumentType {}

impl Hash for InstrumentType {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Display for InstrumentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.short_name())
    }
}

/// Returns the name of `T` with module paths stripped, e.g.
/// `alloc::sync::Arc<app::Logger>` becomes `Arc<Logger>`.
pub fn short_type_name<T: ?Sized + 'static>() -> String {
    strip_paths(std::any::type_name::<T>())
}

fn strip_paths(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut segment_start = 0;
    let mut chars = name.chars().peekable();

    while let Some(c) = chars.next() {
        if c == ':' && chars.peek() == Some(&':') {
            chars.next();
            out.truncate(segment_start);
        } else if c.is_alphanumeric() || c == '_' {
            out.push(c);
        } else {
            out.push(c);
            segment_start = out.len();
        }
    }

    out
}

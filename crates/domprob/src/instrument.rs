//! Type-erased instruments and their registered type hierarchy.
//!
//! Rust has no runtime subclassing, so an instrument carries an explicit
//! table of every [`InstrumentType`] it may be resolved as: its concrete
//! type, plus each supertype (usually a trait object) registered through
//! [`InstrumentBuilder::supertype`]. Each entry holds a ready-made
//! `Arc<V>` view, so resolution never re-casts.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use domprob_types::InstrumentType;

/// One resolvable view of an instrument: an `Arc<V>` stored type-erased.
struct View {
    ty: InstrumentType,
    handle: Box<dyn Any + Send + Sync>,
}

/// An externally owned object handed to announced methods.
///
/// Cloning an `Instrument` is cheap and preserves its identity.
#[derive(Clone)]
pub struct Instrument {
    identity: usize,
    views: Arc<[View]>,
}

impl Instrument {
    /// Wraps `value`, resolvable only as its own concrete type.
    pub fn new<T: Any + Send + Sync>(value: T) -> Self {
        Self::builder(value).build()
    }

    /// Wraps an already shared value, resolvable only as `T`.
    pub fn from_arc<T: Any + Send + Sync>(value: Arc<T>) -> Self {
        InstrumentBuilder::from_arc(value).build()
    }

    /// Starts building an instrument with registered supertypes.
    pub fn builder<T: Any + Send + Sync>(value: T) -> InstrumentBuilder<T> {
        InstrumentBuilder::from_arc(Arc::new(value))
    }

    /// The instrument's concrete type.
    pub fn concrete_type(&self) -> InstrumentType {
        // The concrete view is always stored first.
        self.views[0].ty
    }

    /// Every type this instrument can be resolved as, concrete type first.
    pub fn types(&self) -> impl Iterator<Item = InstrumentType> + '_ {
        self.views.iter().map(|view| view.ty)
    }

    /// Whether this instrument is `ty` or a registered subtype of it.
    pub fn satisfies(&self, ty: InstrumentType) -> bool {
        self.views.iter().any(|view| view.ty == ty)
    }

    /// Returns the instrument viewed as `V`, if it can be resolved as `V`.
    pub fn get<V: ?Sized + Send + Sync + 'static>(&self) -> Option<&Arc<V>> {
        let ty = InstrumentType::of::<V>();
        self.views
            .iter()
            .find(|view| view.ty == ty)
            .and_then(|view| view.handle.downcast_ref::<Arc<V>>())
    }

    /// Whether `self` and `other` wrap the same underlying object.
    pub fn same_as(&self, other: &Instrument) -> bool {
        self.identity == other.identity
    }

    pub(crate) fn identity(&self) -> usize {
        self.identity
    }
}

impl fmt::Debug for Instrument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut tuple = f.debug_tuple("Instrument");
        for ty in self.types() {
            tuple.field(&format_args!("{ty}"));
        }
        tuple.finish()
    }
}

/// Builder for an [`Instrument`] that declares its supertypes.
///
/// ```
/// use domprob::Instrument;
///
/// trait Sink: Send + Sync {}
/// struct Console;
/// impl Sink for Console {}
///
/// let console = Instrument::builder(Console)
///     .supertype::<dyn Sink>(|console| console)
///     .build();
///
/// assert!(console.get::<Console>().is_some());
/// assert!(console.get::<dyn Sink>().is_some());
/// ```
pub struct InstrumentBuilder<T> {
    value: Arc<T>,
    supertypes: Vec<View>,
}

impl<T: Any + Send + Sync> InstrumentBuilder<T> {
    /// Starts from an already shared value.
    pub fn from_arc(value: Arc<T>) -> Self {
        Self {
            value,
            supertypes: Vec::new(),
        }
    }

    /// Registers `V` as a supertype of `T`.
    ///
    /// `upcast` is normally the identity closure `|v| v`, relying on
    /// unsized coercion from `Arc<T>` to `Arc<V>`. Registering the
    /// concrete type or an already registered supertype is a no-op.
    ///
    /// Supertraits are not implied: with `trait Metrics: Logger`,
    /// registering `dyn Metrics` does not make the instrument a
    /// `dyn Logger`. Register every ancestor type the instrument should
    /// be resolvable as.
    pub fn supertype<V: ?Sized + Send + Sync + 'static>(
        mut self,
        upcast: fn(Arc<T>) -> Arc<V>,
    ) -> Self {
        let ty = InstrumentType::of::<V>();
        let known = ty == InstrumentType::of::<T>() || self.supertypes.iter().any(|v| v.ty == ty);
        if !known {
            self.supertypes.push(View {
                ty,
                handle: Box::new(upcast(Arc::clone(&self.value))),
            });
        }
        self
    }

    /// Finishes the instrument.
    pub fn build(self) -> Instrument {
        let identity = Arc::as_ptr(&self.value) as *const () as usize;
        let mut views = Vec::with_capacity(self.supertypes.len() + 1);
        views.push(View {
            ty: InstrumentType::of::<T>(),
            handle: Box::new(self.value),
        });
        views.extend(self.supertypes);

        Instrument {
            identity,
            views: views.into(),
        }
    }
}

//! Announcement declarations.
//!
//! An announcement ties a method of an observation type to the instrument
//! types it knows how to use. Declarations are collected per observation
//! type into an [`Announcements`] table, built once through
//! [`AnnouncementsBuilder`] and usually cached in a static
//! [`AnnouncementCell`].
//!
//! Announced methods receive the resolved instrument as a shared handle
//! (`&Arc<P>`), where `P` is the method's parameter type: a concrete
//! instrument type or a capability trait object such as `dyn Logger`.

use std::fmt;
use std::sync::{Arc, LazyLock};

use domprob_types::{
    short_type_name, BoxError, ConfigurationError, DispatchError, InstrumentType,
    InstrumentTypeError,
};

use crate::Instrument;

/// One `(instrument type, required)` pair attached to an announced method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Constraint {
    instrument: InstrumentType,
    required: bool,
}

impl Constraint {
    /// Creates a constraint on `instrument`.
    pub fn new(instrument: InstrumentType, required: bool) -> Self {
        Self {
            instrument,
            required,
        }
    }

    /// The declared instrument type.
    pub fn instrument_type(self) -> InstrumentType {
        self.instrument
    }

    /// Whether dispatch fails when no instrument satisfies this constraint.
    pub fn is_required(self) -> bool {
        self.required
    }

    /// Whether `instrument` is the declared type or a registered subtype.
    pub fn is_satisfied_by(self, instrument: &Instrument) -> bool {
        instrument.satisfies(self.instrument)
    }
}

impl fmt::Display for Constraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(required={})", self.instrument, self.required)
    }
}

/// Calls the announced method with `instrument` viewed as the constraint's
/// type. `None` means the instrument has no such view.
type Invoker<O> = Arc<dyn Fn(&O, &Instrument) -> Option<Result<(), BoxError>> + Send + Sync>;

/// The announced method itself, erased to a fallible call.
type MethodFn<O, P> = Arc<dyn Fn(&O, &Arc<P>) -> Result<(), BoxError> + Send + Sync>;

/// A constraint together with the call it triggers when satisfied.
pub(crate) struct Binding<O> {
    pub(crate) constraint: Constraint,
    invoke: Invoker<O>,
}

impl<O> Clone for Binding<O> {
    fn clone(&self) -> Self {
        Self {
            constraint: self.constraint,
            invoke: Arc::clone(&self.invoke),
        }
    }
}

/// An announced method of observation type `O`.
pub struct Announcement<O> {
    name: &'static str,
    declared_by: String,
    bindings: Vec<Binding<O>>,
}

impl<O> Clone for Announcement<O> {
    fn clone(&self) -> Self {
        Self {
            name: self.name,
            declared_by: self.declared_by.clone(),
            bindings: self.bindings.clone(),
        }
    }
}

impl<O: 'static> Announcement<O> {
    /// The method name.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// The observation type that declared this method. Differs from `O`
    /// when the announcement was inherited.
    pub fn declared_by(&self) -> &str {
        &self.declared_by
    }

    /// The constraints, in declaration order.
    pub fn constraints(&self) -> impl Iterator<Item = Constraint> + '_ {
        self.bindings.iter().map(|binding| binding.constraint)
    }

    /// Every announced instrument type, in declaration order.
    pub fn instrument_types(&self) -> impl Iterator<Item = InstrumentType> + '_ {
        self.supported(None)
    }

    /// Instrument types whose constraints are required.
    pub fn required_types(&self) -> impl Iterator<Item = InstrumentType> + '_ {
        self.supported(Some(true))
    }

    /// Instrument types whose constraints are optional.
    pub fn optional_types(&self) -> impl Iterator<Item = InstrumentType> + '_ {
        self.supported(Some(false))
    }

    /// Announced instrument types, filtered by `required` when given.
    pub fn supported(&self, required: Option<bool>) -> impl Iterator<Item = InstrumentType> + '_ {
        self.constraints()
            .filter(move |c| required.map_or(true, |r| c.is_required() == r))
            .map(Constraint::instrument_type)
    }

    /// Whether any constraint on `ty` is required.
    pub fn is_required(&self, ty: InstrumentType) -> bool {
        self.constraints()
            .any(|c| c.instrument_type() == ty && c.is_required())
    }

    /// Whether `instrument` satisfies at least one constraint.
    pub fn supports(&self, instrument: &Instrument) -> bool {
        self.constraints().any(|c| c.is_satisfied_by(instrument))
    }

    /// Calls the method directly with `instrument`.
    ///
    /// The first constraint the instrument satisfies decides how it is
    /// passed to the method.
    ///
    /// # Errors
    ///
    /// Returns `DispatchError::InstrumentType` if the instrument satisfies
    /// none of the constraints, or `DispatchError::Method` if the method
    /// itself fails.
    pub fn call(&self, observation: &O, instrument: &Instrument) -> Result<(), DispatchError> {
        let binding = self
            .bindings
            .iter()
            .find(|binding| binding.constraint.is_satisfied_by(instrument))
            .ok_or_else(|| self.type_error(instrument))?;
        self.invoke(binding, observation, instrument)
    }

    pub(crate) fn bindings(&self) -> &[Binding<O>] {
        &self.bindings
    }

    pub(crate) fn invoke(
        &self,
        binding: &Binding<O>,
        observation: &O,
        instrument: &Instrument,
    ) -> Result<(), DispatchError> {
        match (binding.invoke)(observation, instrument) {
            Some(result) => result.map_err(DispatchError::Method),
            None => Err(self.type_error(instrument).into()),
        }
    }

    fn type_error(&self, instrument: &Instrument) -> InstrumentTypeError {
        InstrumentTypeError {
            observation: short_type_name::<O>(),
            method: self.name.to_string(),
            expected: self.instrument_types().collect(),
            actual: instrument.concrete_type(),
        }
    }

    /// Re-targets this announcement at an observation type `C` that
    /// embeds `O`.
    fn rebase<C: 'static>(&self, project: fn(&C) -> &O) -> Announcement<C> {
        let bindings = self
            .bindings
            .iter()
            .map(|binding| {
                let invoke = Arc::clone(&binding.invoke);
                Binding {
                    constraint: binding.constraint,
                    invoke: Arc::new(move |child: &C, instrument: &Instrument| {
                        invoke(project(child), instrument)
                    }) as Invoker<C>,
                }
            })
            .collect();

        Announcement {
            name: self.name,
            declared_by: self.declared_by.clone(),
            bindings,
        }
    }
}

impl<O: 'static> fmt::Debug for Announcement<O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let constraints: Vec<String> = self.constraints().map(|c| c.to_string()).collect();
        f.debug_struct("Announcement")
            .field("name", &self.name)
            .field("declared_by", &self.declared_by)
            .field("constraints", &constraints)
            .finish()
    }
}

/// The announcement table of observation type `O`.
///
/// Inherited announcements come first in their ancestor's order, followed
/// by the type's own announcements in declaration order.
pub struct Announcements<O> {
    observation: String,
    entries: Vec<Announcement<O>>,
}

impl<O: 'static> Announcements<O> {
    /// Starts declaring the announcements of `O`.
    pub fn builder() -> AnnouncementsBuilder<O> {
        AnnouncementsBuilder {
            observation: short_type_name::<O>(),
            inherited: Vec::new(),
            own: Vec::new(),
            error: None,
        }
    }

    /// The observation type this table belongs to.
    pub fn observation(&self) -> &str {
        &self.observation
    }

    /// Iterates announcements in enumeration order.
    pub fn iter(&self) -> std::slice::Iter<'_, Announcement<O>> {
        self.entries.iter()
    }

    /// Looks up an announcement by method name.
    pub fn get(&self, name: &str) -> Option<&Announcement<O>> {
        self.entries.iter().find(|a| a.name == name)
    }

    /// Number of announced methods.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no method is announced.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<'a, O: 'static> IntoIterator for &'a Announcements<O> {
    type Item = &'a Announcement<O>;
    type IntoIter = std::slice::Iter<'a, Announcement<O>>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<O: 'static> fmt::Debug for Announcements<O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Announcements")
            .field("observation", &self.observation)
            .field("entries", &self.entries)
            .finish()
    }
}

/// Builder for an [`Announcements`] table.
///
/// Errors are collected while declaring and reported by [`build`], so a
/// declaration chain never panics.
///
/// [`build`]: AnnouncementsBuilder::build
pub struct AnnouncementsBuilder<O> {
    observation: String,
    inherited: Vec<Announcement<O>>,
    own: Vec<Announcement<O>>,
    error: Option<ConfigurationError>,
}

impl<O: 'static> AnnouncementsBuilder<O> {
    /// Inherits every announcement of the embedded observation type `P`.
    ///
    /// `project` borrows the embedded `P` from an `O`. When several
    /// ancestors announce the same method name, the first one wins.
    pub fn extends<P: 'static>(mut self, parent: &Announcements<P>, project: fn(&O) -> &P) -> Self {
        for announcement in parent {
            if self.inherited.iter().any(|a| a.name == announcement.name) {
                continue;
            }
            self.inherited.push(announcement.rebase(project));
        }
        self
    }

    /// Declares an infallible method.
    ///
    /// `declare` attaches the method's constraints, e.g.
    /// `|m| m.require()` or `|m| m.announce().announce_as::<Other>(|o| o)`.
    pub fn method<P, F>(
        self,
        name: &'static str,
        method: F,
        declare: impl FnOnce(MethodBuilder<O, P>) -> MethodBuilder<O, P>,
    ) -> Self
    where
        P: ?Sized + Send + Sync + 'static,
        F: Fn(&O, &Arc<P>) + Send + Sync + 'static,
    {
        let method: MethodFn<O, P> = Arc::new(
            move |observation: &O, instrument: &Arc<P>| -> Result<(), BoxError> {
                method(observation, instrument);
                Ok(())
            },
        );
        self.declare(name, method, declare)
    }

    /// Declares a fallible method. Its errors are returned from dispatch
    /// as `DispatchError::Method`.
    pub fn try_method<P, F, E>(
        self,
        name: &'static str,
        method: F,
        declare: impl FnOnce(MethodBuilder<O, P>) -> MethodBuilder<O, P>,
    ) -> Self
    where
        P: ?Sized + Send + Sync + 'static,
        F: Fn(&O, &Arc<P>) -> Result<(), E> + Send + Sync + 'static,
        E: Into<BoxError>,
    {
        let method: MethodFn<O, P> = Arc::new(
            move |observation: &O, instrument: &Arc<P>| -> Result<(), BoxError> {
                method(observation, instrument).map_err(Into::into)
            },
        );
        self.declare(name, method, declare)
    }

    fn declare<P: ?Sized + Send + Sync + 'static>(
        mut self,
        name: &'static str,
        method: MethodFn<O, P>,
        declare: impl FnOnce(MethodBuilder<O, P>) -> MethodBuilder<O, P>,
    ) -> Self {
        if self.error.is_some() {
            return self;
        }

        if self.own.iter().any(|a| a.name == name) {
            self.error = Some(ConfigurationError::DuplicateMethod {
                observation: self.observation.clone(),
                method: name.to_string(),
            });
            return self;
        }

        let builder = MethodBuilder {
            name,
            observation: self.observation.clone(),
            method,
            bindings: Vec::new(),
            error: None,
        };
        match declare(builder).finish() {
            Ok(announcement) => self.own.push(announcement),
            Err(e) => self.error = Some(e),
        }
        self
    }

    /// Finishes the table.
    ///
    /// An own method named like an inherited one overrides it in place.
    ///
    /// # Errors
    ///
    /// Returns the first `ConfigurationError` met while declaring.
    pub fn build(self) -> Result<Announcements<O>, ConfigurationError> {
        if let Some(e) = self.error {
            return Err(e);
        }

        let mut entries = self.inherited;
        for announcement in self.own {
            match entries.iter_mut().find(|a| a.name == announcement.name) {
                Some(slot) => *slot = announcement,
                None => entries.push(announcement),
            }
        }

        Ok(Announcements {
            observation: self.observation,
            entries,
        })
    }
}

/// Attaches constraints to one announced method.
///
/// Constraints stack: each call appends one, in call order. Declaring an
/// identical constraint twice is allowed and does not change dispatch.
pub struct MethodBuilder<O, P: ?Sized> {
    name: &'static str,
    observation: String,
    method: MethodFn<O, P>,
    bindings: Vec<Binding<O>>,
    error: Option<ConfigurationError>,
}

impl<O: 'static, P: ?Sized + Send + Sync + 'static> MethodBuilder<O, P> {
    /// Accepts an optional instrument of the parameter type `P`.
    pub fn announce(self) -> Self {
        self.bind::<P>(false, |instrument| instrument)
    }

    /// Requires an instrument of the parameter type `P`.
    pub fn require(self) -> Self {
        self.bind::<P>(true, |instrument| instrument)
    }

    /// Accepts an optional instrument of type `V`, passed to the method
    /// through `project`.
    pub fn announce_as<V: ?Sized + Send + Sync + 'static>(
        self,
        project: fn(Arc<V>) -> Arc<P>,
    ) -> Self {
        self.bind(false, project)
    }

    /// Requires an instrument of type `V`, passed to the method through
    /// `project`.
    pub fn require_as<V: ?Sized + Send + Sync + 'static>(
        self,
        project: fn(Arc<V>) -> Arc<P>,
    ) -> Self {
        self.bind(true, project)
    }

    fn bind<V: ?Sized + Send + Sync + 'static>(
        mut self,
        required: bool,
        project: fn(Arc<V>) -> Arc<P>,
    ) -> Self {
        let ty = InstrumentType::of::<V>();
        if !ty.is_matchable() || ty == InstrumentType::of::<Instrument>() {
            self.error.get_or_insert(ConfigurationError::UnmatchableType {
                observation: self.observation.clone(),
                method: self.name.to_string(),
                instrument: ty.short_name(),
            });
            return self;
        }

        let method = Arc::clone(&self.method);
        let invoke: Invoker<O> = Arc::new(move |observation: &O, instrument: &Instrument| {
            let view = instrument.get::<V>()?;
            Some(method(observation, &project(Arc::clone(view))))
        });
        self.bindings.push(Binding {
            constraint: Constraint::new(ty, required),
            invoke,
        });
        self
    }

    fn finish(self) -> Result<Announcement<O>, ConfigurationError> {
        if let Some(e) = self.error {
            return Err(e);
        }
        if self.name.trim().is_empty() {
            return Err(ConfigurationError::EmptyMethodName {
                observation: self.observation,
            });
        }
        if self.bindings.is_empty() {
            return Err(ConfigurationError::NoConstraints {
                observation: self.observation,
                method: self.name.to_string(),
            });
        }

        Ok(Announcement {
            name: self.name,
            declared_by: self.observation,
            bindings: self.bindings,
        })
    }
}

/// Function that declares an observation type's announcement table.
pub type Declaration<O> = fn() -> Result<Announcements<O>, ConfigurationError>;

/// A lazily built, process-wide announcement table.
///
/// Intended for statics: the declaration runs once, on first use, and
/// every later lookup returns the same table or the same error.
///
/// ```
/// use std::sync::Arc;
/// use domprob::{AnnouncementCell, Announcements, ConfigurationError, Observation};
///
/// struct Audit;
/// struct Shipped;
///
/// impl Shipped {
///     fn audit(&self, _audit: &Arc<Audit>) {}
/// }
///
/// fn declare() -> Result<Announcements<Shipped>, ConfigurationError> {
///     Announcements::builder()
///         .method("audit", Shipped::audit, |m| m.require())
///         .build()
/// }
///
/// static SHIPPED: AnnouncementCell<Shipped> = AnnouncementCell::new(declare);
///
/// impl Observation for Shipped {
///     fn announcements() -> Result<&'static Announcements<Self>, ConfigurationError> {
///         SHIPPED.get()
///     }
/// }
///
/// assert_eq!(Shipped::announcements().unwrap().len(), 1);
/// ```
pub struct AnnouncementCell<O: 'static> {
    table: LazyLock<Result<Announcements<O>, ConfigurationError>, Declaration<O>>,
}

impl<O: 'static> AnnouncementCell<O> {
    /// Creates a cell that builds its table with `declare` on first use.
    pub const fn new(declare: Declaration<O>) -> Self {
        Self {
            table: LazyLock::new(declare),
        }
    }

    /// Returns the table, building it on first call.
    ///
    /// # Errors
    ///
    /// Returns the declaration's `ConfigurationError` on every call if the
    /// table failed to build.
    pub fn get(&self) -> Result<&Announcements<O>, ConfigurationError> {
        LazyLock::force(&self.table).as_ref().map_err(Clone::clone)
    }
}

//! The observation contract.

use domprob_types::{short_type_name, ConfigurationError, DispatchError};

use crate::{Announcement, Announcements, Instrument};

/// A domain event that announces which of its methods consume which
/// instruments.
///
/// Implementations normally return a table cached in a static
/// [`AnnouncementCell`](crate::AnnouncementCell), so declaration runs once
/// per type no matter how many instances are observed.
pub trait Observation: Sized + 'static {
    /// The announcement table of this observation type.
    ///
    /// # Errors
    ///
    /// Returns the `ConfigurationError` raised while declaring the table.
    fn announcements() -> Result<&'static Announcements<Self>, ConfigurationError>;

    /// Announced methods bound to this instance, in enumeration order.
    ///
    /// # Errors
    ///
    /// Returns the `ConfigurationError` raised while declaring the table.
    fn bound_announcements(&self) -> Result<Vec<BoundAnnouncement<'_, Self>>, ConfigurationError> {
        Ok(Self::announcements()?
            .iter()
            .map(|announcement| BoundAnnouncement {
                observation: self,
                announcement,
            })
            .collect())
    }

    /// The type name without module path.
    fn observation_name() -> String {
        short_type_name::<Self>()
    }

    /// Number of announced methods, zero if the table failed to build.
    fn announcement_count() -> usize {
        Self::announcements().map_or(0, Announcements::len)
    }

    /// Short description, e.g. `OrderPlaced(announcements=2)`.
    fn describe(&self) -> String {
        format!(
            "{}(announcements={})",
            Self::observation_name(),
            Self::announcement_count()
        )
    }
}

/// An announcement paired with the observation it will be called on, so
/// invocation needs only the resolved instrument.
pub struct BoundAnnouncement<'a, O: 'static> {
    observation: &'a O,
    announcement: &'static Announcement<O>,
}

impl<'a, O: 'static> BoundAnnouncement<'a, O> {
    /// The underlying declaration.
    pub fn announcement(&self) -> &'static Announcement<O> {
        self.announcement
    }

    /// The bound observation.
    pub fn observation(&self) -> &'a O {
        self.observation
    }

    /// Calls the method on the bound observation with `instrument`.
    ///
    /// # Errors
    ///
    /// See [`Announcement::call`].
    pub fn call(&self, instrument: &Instrument) -> Result<(), DispatchError> {
        self.announcement.call(self.observation, instrument)
    }
}

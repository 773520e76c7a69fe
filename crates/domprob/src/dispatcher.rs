//! Matching observations against registered instruments.
//!
//! Dispatch runs in two phases. Planning resolves every announced method
//! against the registry and fails on a missing required instrument before
//! anything runs. Execution then calls the planned methods in order.

use std::fmt;

use domprob_types::{short_type_name, DispatchError, MissingInstrumentError};

use crate::announcement::Binding;
use crate::{Announcement, Instrument, InstrumentRegistry, Observation};

/// Routes an observation to the instruments its announcements accept.
pub trait Dispatcher {
    /// Calls every announced method of `observation` with each matching
    /// instrument.
    ///
    /// # Errors
    ///
    /// Returns `DispatchError::MissingInstrument` if a required instrument
    /// is not registered, in which case no method has run, or the first
    /// error raised by a method.
    fn dispatch<O: Observation>(&self, observation: &O) -> Result<(), DispatchError>;
}

/// The dispatcher used by [`Probe`](crate::Probe) unless told otherwise.
#[derive(Debug, Clone, Default)]
pub struct BasicDispatcher {
    instruments: InstrumentRegistry,
}

impl BasicDispatcher {
    pub fn new(instruments: impl IntoIterator<Item = Instrument>) -> Self {
        Self {
            instruments: instruments.into_iter().collect(),
        }
    }

    pub fn instruments(&self) -> &InstrumentRegistry {
        &self.instruments
    }

    /// Resolves the calls a dispatch of `O` would make.
    ///
    /// For each announcement, constraints are visited in declaration order
    /// and each satisfying instrument is added in registration order. An
    /// instrument already planned for the same method is skipped.
    ///
    /// # Errors
    ///
    /// Returns `DispatchError::Configuration` if `O`'s table failed to build,
    /// or `DispatchError::MissingInstrument` for the first required
    /// constraint no instrument satisfies.
    pub fn plan<O: Observation>(&self) -> Result<DispatchPlan<'_, O>, DispatchError> {
        let announcements = O::announcements()?;
        let mut calls = Vec::new();

        for announcement in announcements {
            let mut planned: Vec<usize> = Vec::new();

            for binding in announcement.bindings() {
                let constraint = binding.constraint;
                let mut satisfied = false;

                for instrument in self.instruments.satisfying(constraint.instrument_type()) {
                    satisfied = true;
                    if planned.contains(&instrument.identity()) {
                        continue;
                    }
                    planned.push(instrument.identity());
                    calls.push(PlannedCall {
                        announcement,
                        binding,
                        instrument,
                    });
                }

                if satisfied {
                    continue;
                }

                if constraint.is_required() {
                    let err = MissingInstrumentError {
                        observation: short_type_name::<O>(),
                        method: announcement.name().to_string(),
                        instrument: constraint.instrument_type(),
                        available: self.instruments.implementations(),
                    };
                    tracing::warn!(
                        observation = %err.observation,
                        method = %err.method,
                        instrument = %err.instrument,
                        "required instrument missing"
                    );
                    return Err(err.into());
                }

                tracing::debug!(
                    observation = %short_type_name::<O>(),
                    method = announcement.name(),
                    instrument = %constraint.instrument_type(),
                    "no instrument for optional constraint, skipping"
                );
            }
        }

        Ok(DispatchPlan { calls })
    }
}

impl Dispatcher for BasicDispatcher {
    fn dispatch<O: Observation>(&self, observation: &O) -> Result<(), DispatchError> {
        let plan = self.plan::<O>()?;
        tracing::debug!(
            observation = %short_type_name::<O>(),
            calls = plan.len(),
            "dispatching observation"
        );
        plan.execute(observation)
    }
}

struct PlannedCall<'a, O: 'static> {
    announcement: &'static Announcement<O>,
    binding: &'static Binding<O>,
    instrument: &'a Instrument,
}

/// The resolved, ordered calls for one observation type.
pub struct DispatchPlan<'a, O: 'static> {
    calls: Vec<PlannedCall<'a, O>>,
}

impl<'a, O: 'static> DispatchPlan<'a, O> {
    /// Number of method invocations.
    pub fn len(&self) -> usize {
        self.calls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.calls.is_empty()
    }

    /// The planned `(method, instrument)` pairs in execution order.
    pub fn calls(&self) -> impl Iterator<Item = (&'static str, &'a Instrument)> + '_ {
        self.calls
            .iter()
            .map(|call| (call.announcement.name(), call.instrument))
    }

    /// Runs the planned calls against `observation`, stopping at the first
    /// error.
    ///
    /// # Errors
    ///
    /// Returns `DispatchError::Method` carrying the method's own error.
    pub fn execute(&self, observation: &O) -> Result<(), DispatchError> {
        for call in &self.calls {
            tracing::trace!(
                observation = %short_type_name::<O>(),
                method = call.announcement.name(),
                instrument = %call.instrument.concrete_type(),
                "invoking announced method"
            );
            call.announcement
                .invoke(call.binding, observation, call.instrument)?;
        }
        Ok(())
    }
}

impl<O: 'static> fmt::Debug for DispatchPlan<'_, O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.calls().map(|(method, instrument)| (method, instrument.concrete_type())))
            .finish()
    }
}

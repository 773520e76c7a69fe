//! The ordered collection of instruments a dispatcher resolves against.

use domprob_types::InstrumentType;

use crate::Instrument;

/// Instruments in registration order.
///
/// Order matters: when several instruments satisfy one constraint they are
/// invoked in the order they were registered.
#[derive(Debug, Clone, Default)]
pub struct InstrumentRegistry {
    instruments: Vec<Instrument>,
}

impl InstrumentRegistry {
    pub fn new(instruments: impl IntoIterator<Item = Instrument>) -> Self {
        Self {
            instruments: instruments.into_iter().collect(),
        }
    }

    /// Appends `instrument`. Registering the same object twice is allowed;
    /// dispatch still calls each method on it once.
    pub fn push(&mut self, instrument: Instrument) {
        self.instruments.push(instrument);
    }

    pub fn len(&self) -> usize {
        self.instruments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instruments.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Instrument> {
        self.instruments.iter()
    }

    /// Whether the same underlying object is registered.
    pub fn contains(&self, instrument: &Instrument) -> bool {
        self.instruments.iter().any(|i| i.same_as(instrument))
    }

    /// Instruments that are `ty` or a registered subtype of it, in
    /// registration order.
    pub fn satisfying(&self, ty: InstrumentType) -> impl Iterator<Item = &Instrument> + '_ {
        self.instruments.iter().filter(move |i| i.satisfies(ty))
    }

    /// The first instrument satisfying `ty`.
    pub fn first(&self, ty: InstrumentType) -> Option<&Instrument> {
        self.satisfying(ty).next()
    }

    /// Concrete type names of every registered instrument, used in error
    /// reports.
    pub fn implementations(&self) -> Vec<String> {
        self.instruments
            .iter()
            .map(|i| i.concrete_type().short_name())
            .collect()
    }
}

impl FromIterator<Instrument> for InstrumentRegistry {
    fn from_iter<I: IntoIterator<Item = Instrument>>(iter: I) -> Self {
        Self::new(iter)
    }
}

impl<'a> IntoIterator for &'a InstrumentRegistry {
    type Item = &'a Instrument;
    type IntoIter = std::slice::Iter<'a, Instrument>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

use crate::{Effect, OfferSet};

/// Outcome of comparing the current catalog snapshot with the persisted one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    Notify(OfferSet),
    NoOp(SkipReason),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// No free offers in the catalog; persisted state is left alone.
    EmptyCatalog,
    /// Current offers equal the persisted ones.
    Unchanged,
}

/// Pure change detection: notify iff `current` is non-empty and differs from `previous`.
pub fn decide(current: OfferSet, previous: &OfferSet) -> Decision {
    if current.is_empty() {
        return Decision::NoOp(SkipReason::EmptyCatalog);
    }
    if current == *previous {
        return Decision::NoOp(SkipReason::Unchanged);
    }
    Decision::Notify(current)
}

impl Decision {
    pub fn is_notify(&self) -> bool {
        matches!(self, Decision::Notify(_))
    }

    /// Expands the decision into effects. Dispatch always precedes persistence.
    pub fn effects(self) -> Vec<Effect> {
        match self {
            Decision::Notify(offers) => {
                vec![Effect::Dispatch(offers.clone()), Effect::PersistState(offers)]
            }
            Decision::NoOp(_) => Vec::new(),
        }
    }
}

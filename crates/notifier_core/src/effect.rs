use crate::OfferSet;

/// Side effects requested by a [`crate::Decision`], in execution order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Send the offers through every configured channel.
    Dispatch(OfferSet),
    /// Replace the persisted state with these offers.
    PersistState(OfferSet),
}

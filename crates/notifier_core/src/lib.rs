//! Notifier core: offer model, catalog extraction and the pure change decision.
mod decide;
mod display;
mod effect;
mod extract;
mod offer;

pub use decide::{decide, Decision, SkipReason};
pub use display::{remaining_text, truncate_chars, DESCRIPTION_LIMIT};
pub use effect::Effect;
pub use extract::{MalformedPayloadError, OfferExtractor, DEFAULT_STORE_BASE_URL};
pub use offer::{Offer, OfferSet};

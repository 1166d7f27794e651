use notifier_core::{decide, Decision, Effect, MalformedPayloadError, OfferExtractor, OfferSet};
use notifier_logging::{notifier_info, notifier_warn};

use crate::{CatalogFetcher, Dispatcher, FetchError, RunOutcome, StateStore, StorageError};

/// Errors that abort a run before any dispatch or state write.
#[derive(Debug, thiserror::Error)]
pub enum RunError {
    #[error("catalog fetch failed: {0}")]
    Fetch(#[from] FetchError),
    #[error("malformed catalog payload: {0}")]
    MalformedPayload(#[from] MalformedPayloadError),
    #[error("state storage failed: {0}")]
    Storage(#[from] StorageError),
}

/// One fetch, one decision, and the effects that follow from it.
pub struct Pipeline {
    fetcher: Box<dyn CatalogFetcher>,
    extractor: OfferExtractor,
    store: Box<dyn StateStore>,
    dispatchers: Vec<Box<dyn Dispatcher>>,
}

impl Pipeline {
    pub fn new(
        fetcher: Box<dyn CatalogFetcher>,
        extractor: OfferExtractor,
        store: Box<dyn StateStore>,
        dispatchers: Vec<Box<dyn Dispatcher>>,
    ) -> Self {
        Self {
            fetcher,
            extractor,
            store,
            dispatchers,
        }
    }

    pub async fn run(&self) -> Result<RunOutcome, RunError> {
        notifier_info!("Fetching catalog");
        let raw = self.fetcher.fetch().await?;
        let current = self.extractor.extract(&raw)?;
        notifier_info!(
            "Catalog lists {} free offer(s): {:?}",
            current.len(),
            current.titles()
        );

        let previous = self.store.load()?;
        let decision = decide(current, &previous);
        let notified = match &decision {
            Decision::NoOp(reason) => {
                notifier_info!("No change in free games ({:?})", reason);
                return Ok(RunOutcome::Skipped(*reason));
            }
            Decision::Notify(offers) => {
                notifier_info!("Free games changed; notifying {} offer(s)", offers.len());
                offers.len()
            }
        };

        let mut failed_channels = Vec::new();
        for effect in decision.effects() {
            match effect {
                Effect::Dispatch(offers) => {
                    failed_channels = self.dispatch_all(&offers).await;
                }
                Effect::PersistState(offers) => self.store.save(&offers)?,
            }
        }

        Ok(RunOutcome::Notified {
            offers: notified,
            failed_channels,
        })
    }

    /// Best effort: every channel is attempted, failures are only reported.
    async fn dispatch_all(&self, offers: &OfferSet) -> Vec<&'static str> {
        if self.dispatchers.is_empty() {
            notifier_warn!("No notification channel configured");
        }
        let mut failed = Vec::new();
        for dispatcher in &self.dispatchers {
            if let Err(err) = dispatcher.dispatch(offers).await {
                notifier_warn!("{} dispatch failed: {}", dispatcher.channel(), err);
                failed.push(dispatcher.channel());
            }
        }
        failed
    }
}

use notifier_core::OfferSet;

#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
    #[error("webhook request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("webhook responded with status {0}")]
    Status(u16),
    #[error("invalid email address {address:?}: {message}")]
    Address { address: String, message: String },
    #[error("failed to build email: {0}")]
    Message(#[from] lettre::error::Error),
    #[error("smtp error: {0}")]
    Smtp(#[from] lettre::transport::smtp::Error),
    #[error("template error: {0}")]
    Template(String),
}

/// One notification channel.
#[async_trait::async_trait]
pub trait Dispatcher: Send + Sync {
    /// Short channel name used in logs and run outcomes.
    fn channel(&self) -> &'static str;

    async fn dispatch(&self, offers: &OfferSet) -> Result<(), DispatchError>;
}

//! Notifier engine: catalog fetch, state persistence, dispatch and the run pipeline.
mod dispatch;
mod email;
mod fetch;
mod persist;
mod runner;
mod state;
mod types;
mod webhook;

pub use dispatch::{DispatchError, Dispatcher};
pub use email::{render_email_html, render_email_text, EmailDispatcher, SmtpSettings, EMAIL_SUBJECT};
pub use fetch::{CatalogFetcher, FetchSettings, ReqwestCatalogFetcher};
pub use persist::{ensure_dir, AtomicFileWriter, PersistError};
pub use runner::{Pipeline, RunError};
pub use state::{JsonFileStateStore, StateStore, StorageError};
pub use types::{FailureKind, FetchError, RunOutcome};
pub use webhook::{
    build_webhook_message, Embed, EmbedField, EmbedFooter, EmbedImage, WebhookDispatcher,
    WebhookMessage,
};

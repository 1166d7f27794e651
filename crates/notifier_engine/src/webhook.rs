use std::time::Duration;

use chrono::{DateTime, Utc};
use notifier_core::{remaining_text, truncate_chars, OfferSet, DESCRIPTION_LIMIT};
use notifier_logging::notifier_info;
use serde::Serialize;

use crate::{DispatchError, Dispatcher};

const USERNAME: &str = "Epic Free Games";
const AVATAR_URL: &str = "https://cdn2.unrealengine.com/egs-logo-400x400-400x400-9aef7e1eaa9f.png";
const CONTENT: &str = "🎮 **New Free Game(s) Available on Epic Games Store!**";
const FOOTER: &str = "Epic Games Store – Free Game";
const EMBED_COLOR: u32 = 0x0078F2;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WebhookMessage {
    pub username: String,
    pub avatar_url: String,
    pub content: String,
    pub embeds: Vec<Embed>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Embed {
    pub title: String,
    pub url: String,
    pub description: String,
    pub color: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<EmbedImage>,
    pub fields: Vec<EmbedField>,
    pub footer: EmbedFooter,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EmbedImage {
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EmbedField {
    pub name: String,
    pub value: String,
    pub inline: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EmbedFooter {
    pub text: String,
}

/// Renders the chat payload: one embed per offer.
pub fn build_webhook_message(offers: &OfferSet, now: DateTime<Utc>) -> WebhookMessage {
    let embeds = offers
        .iter()
        .map(|offer| Embed {
            title: offer.title.clone(),
            url: offer.link_url.clone(),
            description: truncate_chars(&offer.description, DESCRIPTION_LIMIT),
            color: EMBED_COLOR,
            image: offer.image_url.clone().map(|url| EmbedImage { url }),
            fields: vec![EmbedField {
                name: "Time remaining".to_string(),
                value: remaining_text(offer.expiry, now),
                inline: true,
            }],
            footer: EmbedFooter {
                text: FOOTER.to_string(),
            },
        })
        .collect();

    WebhookMessage {
        username: USERNAME.to_string(),
        avatar_url: AVATAR_URL.to_string(),
        content: CONTENT.to_string(),
        embeds,
    }
}

pub struct WebhookDispatcher {
    client: reqwest::Client,
    url: String,
}

impl WebhookDispatcher {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, DispatchError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            url: url.into(),
        })
    }
}

#[async_trait::async_trait]
impl Dispatcher for WebhookDispatcher {
    fn channel(&self) -> &'static str {
        "webhook"
    }

    async fn dispatch(&self, offers: &OfferSet) -> Result<(), DispatchError> {
        let message = build_webhook_message(offers, Utc::now());
        let response = self.client.post(&self.url).json(&message).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(DispatchError::Status(status.as_u16()));
        }
        notifier_info!("Webhook accepted {} embed(s)", message.embeds.len());
        Ok(())
    }
}

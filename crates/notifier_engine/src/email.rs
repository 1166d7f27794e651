use std::fmt::Write as _;
use std::time::Duration;

use chrono::{DateTime, Utc};
use handlebars::Handlebars;
use lettre::message::{Mailbox, MultiPart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use notifier_core::{remaining_text, OfferSet};
use notifier_logging::notifier_info;
use serde_json::json;

use crate::{DispatchError, Dispatcher};

pub const EMAIL_SUBJECT: &str = "Epic Games – New Free Game Available";

const HTML_TEMPLATE: &str = r#"<html>
  <body style="font-family:Arial;">
    <h1>🎮 New Free Game(s) on Epic Games Store</h1>
    {{#each offers}}
    <div style="margin-bottom:20px;">
      <h2>{{title}}</h2>
      {{#if image}}<img src="{{image}}" alt="{{title}}" style="max-width:480px;">{{/if}}
      <p>{{description}}</p>
      <p><strong>{{remaining}}</strong></p>
      <a href="{{url}}">View on Epic Games Store</a>
    </div>
    {{/each}}
    <hr>
    <small>Checked on {{checked_on}}</small>
  </body>
</html>
"#;

#[derive(Debug, Clone)]
pub struct SmtpSettings {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    pub from: String,
    pub to: String,
    pub timeout: Duration,
}

fn checked_on(now: DateTime<Utc>) -> String {
    now.format("%Y-%m-%d %H:%M UTC").to_string()
}

/// Renders the HTML body. Offer text is HTML-escaped by the template engine.
pub fn render_email_html(offers: &OfferSet, now: DateTime<Utc>) -> Result<String, DispatchError> {
    let blocks: Vec<_> = offers
        .iter()
        .map(|offer| {
            json!({
                "title": offer.title,
                "description": offer.description,
                "image": offer.image_url,
                "url": offer.link_url,
                "remaining": remaining_text(offer.expiry, now),
            })
        })
        .collect();
    let data = json!({ "offers": blocks, "checked_on": checked_on(now) });

    Handlebars::new()
        .render_template(HTML_TEMPLATE, &data)
        .map_err(|err| DispatchError::Template(err.to_string()))
}

/// Plain-text alternative for clients that do not render HTML.
pub fn render_email_text(offers: &OfferSet, now: DateTime<Utc>) -> String {
    let mut text = String::from("New Free Game(s) on Epic Games Store\n\n");
    for offer in offers {
        let _ = writeln!(text, "{}", offer.title);
        if !offer.description.is_empty() {
            let _ = writeln!(text, "{}", offer.description);
        }
        let _ = writeln!(text, "{}", remaining_text(offer.expiry, now));
        let _ = writeln!(text, "{}\n", offer.link_url);
    }
    let _ = write!(text, "Checked on {}", checked_on(now));
    text
}

fn parse_mailbox(address: &str) -> Result<Mailbox, DispatchError> {
    address.parse().map_err(|err: lettre::address::AddressError| DispatchError::Address {
        address: address.to_string(),
        message: err.to_string(),
    })
}

pub struct EmailDispatcher {
    settings: SmtpSettings,
}

impl EmailDispatcher {
    pub fn new(settings: SmtpSettings) -> Self {
        Self { settings }
    }

    fn build_message(&self, offers: &OfferSet, now: DateTime<Utc>) -> Result<Message, DispatchError> {
        let html = render_email_html(offers, now)?;
        let text = render_email_text(offers, now);
        let message = Message::builder()
            .from(parse_mailbox(&self.settings.from)?)
            .to(parse_mailbox(&self.settings.to)?)
            .subject(EMAIL_SUBJECT)
            .multipart(MultiPart::alternative_plain_html(text, html))?;
        Ok(message)
    }
}

#[async_trait::async_trait]
impl Dispatcher for EmailDispatcher {
    fn channel(&self) -> &'static str {
        "email"
    }

    async fn dispatch(&self, offers: &OfferSet) -> Result<(), DispatchError> {
        let message = self.build_message(offers, Utc::now())?;

        // One session per send: connect, STARTTLS, authenticate, send, quit.
        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&self.settings.host)?
            .port(self.settings.port)
            .credentials(Credentials::new(
                self.settings.username.clone(),
                self.settings.password.clone(),
            ))
            .timeout(Some(self.settings.timeout))
            .build();
        transport.send(message).await?;

        notifier_info!("Email sent to {}", self.settings.to);
        Ok(())
    }
}

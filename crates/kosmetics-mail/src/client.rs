//! # Mail Clients
//!
//! [`MailClient`] is the seam between "what to send" and "how it leaves the
//! building". Production uses [`RelayMailClient`]; tests plug in a recorder.
//!
//! ## Relay Request
//! ```text
//! POST {relay_url}
//! api-key: <MAIL_API_KEY>
//! {
//!   "sender":      { "name": "Kumar Kosmetics", "email": "orders@..." },
//!   "to":          [ { "email": "asha@example.com", "name": "Asha" } ],
//!   "replyTo":     { "email": "..." },            (optional)
//!   "subject":     "...",
//!   "htmlContent": "<!DOCTYPE html>...",
//!   "textContent": "..."
//! }
//! ```

use std::sync::Arc;
use std::time::Duration;

use kosmetics_core::clip_error_body;
use serde::Serialize;
use tracing::{debug, warn};

use crate::error::{MailError, MailResult};
use crate::message::EmailMessage;

/// Something that can deliver an [`EmailMessage`].
#[async_trait::async_trait]
pub trait MailClient: Send + Sync {
    async fn send(&self, message: EmailMessage) -> MailResult<()>;

    /// Address mails are sent from.
    fn from_email(&self) -> &str;
}

pub type DynMailClient = Arc<dyn MailClient>;

// =============================================================================
// Relay Client
// =============================================================================

/// Connection settings for the transactional relay.
#[derive(Debug, Clone)]
pub struct RelayConfig {
    pub url: String,
    pub api_key: String,
    pub from_email: String,
    pub from_name: String,
    pub timeout: Duration,
}

/// Sends mail through an HTTP transactional relay.
#[derive(Debug, Clone)]
pub struct RelayMailClient {
    http: reqwest::Client,
    config: RelayConfig,
}

#[derive(Debug, Serialize, PartialEq)]
struct Address<'a> {
    email: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<&'a str>,
}

#[derive(Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
struct RelayRequest<'a> {
    sender: Address<'a>,
    to: Vec<Address<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    reply_to: Option<Address<'a>>,
    subject: &'a str,
    html_content: &'a str,
    text_content: &'a str,
}

impl RelayMailClient {
    /// Creates a relay client.
    ///
    /// ## Errors
    /// `MailError::InvalidConfig` when the URL, key or sender is blank, or
    /// the HTTP client cannot be built.
    pub fn new(config: RelayConfig) -> MailResult<Self> {
        if config.url.trim().is_empty() {
            return Err(MailError::InvalidConfig("relay url is required".to_string()));
        }
        if config.api_key.trim().is_empty() {
            return Err(MailError::InvalidConfig("api key is required".to_string()));
        }
        if config.from_email.trim().is_empty() {
            return Err(MailError::InvalidConfig("sender address is required".to_string()));
        }

        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| MailError::InvalidConfig(format!("Failed to create HTTP client: {}", e)))?;

        Ok(RelayMailClient { http, config })
    }

    fn payload<'a>(&'a self, message: &'a EmailMessage) -> RelayRequest<'a> {
        RelayRequest {
            sender: Address {
                email: &self.config.from_email,
                name: Some(&self.config.from_name),
            },
            to: vec![Address {
                email: &message.to,
                name: message.to_name.as_deref(),
            }],
            reply_to: message.reply_to.as_deref().map(|email| Address { email, name: None }),
            subject: &message.subject,
            html_content: &message.html,
            text_content: &message.text,
        }
    }
}

#[async_trait::async_trait]
impl MailClient for RelayMailClient {
    async fn send(&self, message: EmailMessage) -> MailResult<()> {
        debug!(to = %message.to, subject = %message.subject, "Sending mail via relay");

        let response = self
            .http
            .post(&self.config.url)
            .header("api-key", &self.config.api_key)
            .json(&self.payload(&message))
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }

        let body = clip_error_body(response.text().await.unwrap_or_default());
        warn!(status = status.as_u16(), to = %message.to, "Mail relay rejected message");

        Err(MailError::Rejected {
            status: status.as_u16(),
            body,
        })
    }

    fn from_email(&self) -> &str {
        &self.config.from_email
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> RelayConfig {
        RelayConfig {
            url: "https://relay.example.com/v3/smtp/email".to_string(),
            api_key: "test-key".to_string(),
            from_email: "orders@kumarkosmetics.in".to_string(),
            from_name: "Kumar Kosmetics".to_string(),
            timeout: Duration::from_secs(5),
        }
    }

    #[test]
    fn test_new_requires_api_key() {
        let mut cfg = config();
        cfg.api_key = " ".to_string();
        assert!(matches!(RelayMailClient::new(cfg), Err(MailError::InvalidConfig(_))));
    }

    #[test]
    fn test_payload_shape() {
        let client = RelayMailClient::new(config()).unwrap();
        let message = EmailMessage {
            to: "asha@example.com".to_string(),
            to_name: Some("Asha".to_string()),
            reply_to: None,
            subject: "Hello".to_string(),
            html: "<p>Hi</p>".to_string(),
            text: "Hi".to_string(),
        };

        let json = serde_json::to_value(client.payload(&message)).unwrap();
        assert_eq!(json["sender"]["email"], "orders@kumarkosmetics.in");
        assert_eq!(json["to"][0]["email"], "asha@example.com");
        assert_eq!(json["to"][0]["name"], "Asha");
        assert_eq!(json["htmlContent"], "<p>Hi</p>");
        assert_eq!(json["textContent"], "Hi");
        assert!(json.get("replyTo").is_none());
    }

    #[test]
    fn test_payload_reply_to() {
        let client = RelayMailClient::new(config()).unwrap();
        let message = EmailMessage {
            to: "owner@kumarkosmetics.in".to_string(),
            to_name: None,
            reply_to: None,
            subject: "Contact".to_string(),
            html: String::new(),
            text: String::new(),
        }
        .with_reply_to("ravi@example.com");

        let json = serde_json::to_value(client.payload(&message)).unwrap();
        assert_eq!(json["replyTo"]["email"], "ravi@example.com");
        assert!(json["to"][0].get("name").is_none());
    }
}

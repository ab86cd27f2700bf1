//! # Mailer
//!
//! Renders a template, addresses it and hands it to the [`crate::MailClient`].
//! The mailer is also where the failure policy lives: an order confirmation
//! that fails to send is logged and reported as [`DeliveryOutcome::Failed`],
//! while OTP, password-reset and contact mails return the error.

use kosmetics_core::validation::validate_email;
use kosmetics_core::{ContactMessage, Order};
use tracing::{info, warn};

use crate::client::DynMailClient;
use crate::error::{MailError, MailResult};
use crate::templates;

/// Settings shared by every template.
#[derive(Debug, Clone)]
pub struct MailerConfig {
    /// Public storefront base URL, used for order links.
    pub storefront_url: String,
    /// Store inbox that receives contact-form messages.
    pub store_inbox: String,
    pub otp_ttl_minutes: u32,
    pub reset_ttl_minutes: u32,
}

impl Default for MailerConfig {
    fn default() -> Self {
        MailerConfig {
            storefront_url: "http://localhost:3000".to_string(),
            store_inbox: String::new(),
            otp_ttl_minutes: 10,
            reset_ttl_minutes: 30,
        }
    }
}

/// Result of a best-effort send.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeliveryOutcome {
    Sent,
    Failed,
}

/// Sends the storefront's transactional mails.
#[derive(Clone)]
pub struct Mailer {
    client: DynMailClient,
    config: MailerConfig,
}

fn checked_address(email: &str) -> MailResult<String> {
    let email = email.trim();
    validate_email(email).map_err(|e| MailError::InvalidAddress(format!("{}: {}", email, e)))?;
    Ok(email.to_string())
}

fn display_name(name: Option<&str>) -> Option<String> {
    name.map(str::trim)
        .filter(|n| !n.is_empty())
        .map(str::to_string)
}

impl Mailer {
    pub fn new(client: DynMailClient, config: MailerConfig) -> Self {
        Mailer { client, config }
    }

    pub fn config(&self) -> &MailerConfig {
        &self.config
    }

    /// Sends the order confirmation. Never fails: a delivery problem must
    /// not undo an order that is already stored.
    pub async fn send_order_confirmation(&self, order: &Order) -> DeliveryOutcome {
        let to = match checked_address(&order.customer.email) {
            Ok(to) => to,
            Err(e) => {
                warn!(order_id = %order.id, error = %e, "Skipping order confirmation");
                return DeliveryOutcome::Failed;
            }
        };

        let message = templates::order_confirmation(order, &self.config.storefront_url)
            .to(to, display_name(Some(&order.customer.name)));

        match self.client.send(message).await {
            Ok(()) => {
                info!(
                    order_id = %order.id,
                    reference = %order.reference(),
                    from = self.client.from_email(),
                    "Order confirmation sent"
                );
                DeliveryOutcome::Sent
            }
            Err(e) => {
                warn!(order_id = %order.id, error = %e, "Order confirmation failed");
                DeliveryOutcome::Failed
            }
        }
    }

    /// Sends a one-time password.
    pub async fn send_otp(&self, email: &str, name: Option<&str>, code: &str) -> MailResult<()> {
        let to = checked_address(email)?;
        let message = templates::otp(name, code, self.config.otp_ttl_minutes).to(to, display_name(name));
        self.client.send(message).await
    }

    /// Sends a password reset link.
    pub async fn send_password_reset(
        &self,
        email: &str,
        name: Option<&str>,
        reset_url: &str,
    ) -> MailResult<()> {
        let to = checked_address(email)?;
        let message = templates::password_reset(name, reset_url, self.config.reset_ttl_minutes)
            .to(to, display_name(name));
        self.client.send(message).await
    }

    /// Forwards a contact-page message to the store inbox, with reply-to
    /// set to the sender.
    pub async fn forward_contact_message(&self, contact: &ContactMessage) -> MailResult<()> {
        let inbox = checked_address(&self.config.store_inbox)?;
        let reply_to = checked_address(&contact.email)?;
        let message = templates::contact_forward(contact)
            .to(inbox, None)
            .with_reply_to(reply_to);
        self.client.send(message).await
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

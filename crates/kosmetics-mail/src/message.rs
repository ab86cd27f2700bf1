//! Email message types.

/// Subject and bodies produced by a template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedEmail {
    pub subject: String,
    pub html: String,
    /// Plain-text alternative for clients that refuse HTML.
    pub text: String,
}

impl RenderedEmail {
    /// Addresses the rendered mail to a recipient.
    pub fn to(self, email: impl Into<String>, name: Option<String>) -> EmailMessage {
        EmailMessage {
            to: email.into(),
            to_name: name,
            reply_to: None,
            subject: self.subject,
            html: self.html,
            text: self.text,
        }
    }
}

/// A mail ready to hand to a [`crate::MailClient`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailMessage {
    pub to: String,
    pub to_name: Option<String>,
    pub reply_to: Option<String>,
    pub subject: String,
    pub html: String,
    pub text: String,
}

impl EmailMessage {
    /// Sets the reply-to address (used when forwarding contact messages).
    pub fn with_reply_to(mut self, reply_to: impl Into<String>) -> Self {
        self.reply_to = Some(reply_to.into());
        self
    }
}

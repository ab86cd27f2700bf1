//! # Mail Error Types

use thiserror::Error;

/// Mail rendering and delivery errors.
#[derive(Debug, Error)]
pub enum MailError {
    /// The relay client was configured with missing or unusable values.
    #[error("Invalid mail configuration: {0}")]
    InvalidConfig(String),

    /// Recipient address failed validation before sending.
    #[error("Invalid recipient address: {0}")]
    InvalidAddress(String),

    /// The relay could not be reached (DNS, TLS, timeout, ...).
    #[error("Mail relay unreachable: {0}")]
    Transport(String),

    /// The relay answered with a non-success status.
    #[error("Mail relay rejected message ({status}): {body}")]
    Rejected { status: u16, body: String },
}

impl From<reqwest::Error> for MailError {
    fn from(err: reqwest::Error) -> Self {
        MailError::Transport(err.to_string())
    }
}

/// Result type for mail operations.
pub type MailResult<T> = Result<T, MailError>;

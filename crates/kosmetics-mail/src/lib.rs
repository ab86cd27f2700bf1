//! # kosmetics-mail: Transactional Email
//!
//! Order confirmations, one-time passwords and password-reset links.
//!
//! ## Delivery Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  storefront-api handler                                                 │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Mailer (mailer.rs)        decides which failures reach the caller      │
//! │       │                                                                 │
//! │       ├──► templates.rs    RenderedEmail { subject, html, text }        │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  MailClient (client.rs)    RelayMailClient ──HTTP──► mail relay         │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Failure Policy
//!
//! | Mail               | On failure                                   |
//! |--------------------|----------------------------------------------|
//! | Order confirmation | logged, never blocks order creation          |
//! | OTP                | returned to caller as `MailError`            |
//! | Password reset     | returned to caller as `MailError`            |
//! | Contact form       | returned to caller as `MailError`            |

pub mod client;
pub mod error;
pub mod mailer;
pub mod message;
pub mod templates;

pub use client::{DynMailClient, MailClient, RelayConfig, RelayMailClient};
pub use error::{MailError, MailResult};
pub use mailer::{DeliveryOutcome, Mailer, MailerConfig};
pub use message::{EmailMessage, RenderedEmail};

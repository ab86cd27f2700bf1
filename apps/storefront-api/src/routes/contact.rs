//! Contact page.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use kosmetics_core::validation::validate_contact_message;
use kosmetics_core::ContactMessage;
use tracing::info;

use crate::error::ApiResult;
use crate::SharedState;

/// `POST /api/contact`
///
/// Forwards the message to the store inbox with reply-to set to the sender.
pub async fn submit(
    State(state): State<SharedState>,
    Json(contact): Json<ContactMessage>,
) -> ApiResult<StatusCode> {
    validate_contact_message(&contact)?;

    state.mailer.forward_contact_message(&contact).await?;
    info!(from = %contact.email.trim(), "Contact message forwarded");
    Ok(StatusCode::ACCEPTED)
}

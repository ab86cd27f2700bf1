//! OTP and password-reset mails.
//!
//! Codes and reset tokens are minted by the auth service; these endpoints
//! only deliver them. A relay failure is returned so the caller can offer
//! a resend.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use kosmetics_core::validation::validate_otp;
use kosmetics_core::ValidationError;
use serde::Deserialize;
use tracing::info;
use url::Url;

use crate::error::ApiResult;
use crate::SharedState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OtpRequest {
    pub email: String,
    #[serde(default)]
    pub name: Option<String>,
    pub code: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PasswordResetRequest {
    pub email: String,
    #[serde(default)]
    pub name: Option<String>,
    pub reset_url: String,
}

/// `POST /api/notifications/otp`
pub async fn send_otp(
    State(state): State<SharedState>,
    Json(req): Json<OtpRequest>,
) -> ApiResult<StatusCode> {
    let code = req.code.trim();
    validate_otp(code)?;

    state.mailer.send_otp(&req.email, req.name.as_deref(), code).await?;
    info!("OTP mail sent");
    Ok(StatusCode::ACCEPTED)
}

/// `POST /api/notifications/password-reset`
pub async fn send_password_reset(
    State(state): State<SharedState>,
    Json(req): Json<PasswordResetRequest>,
) -> ApiResult<StatusCode> {
    let reset_url = parse_reset_url(&req.reset_url)?;

    state
        .mailer
        .send_password_reset(&req.email, req.name.as_deref(), reset_url.as_str())
        .await?;
    info!("Password reset mail sent");
    Ok(StatusCode::ACCEPTED)
}

fn parse_reset_url(raw: &str) -> Result<Url, ValidationError> {
    let invalid = |reason: &str| ValidationError::InvalidFormat {
        field: "resetUrl".to_string(),
        reason: reason.to_string(),
    };

    let url = Url::parse(raw.trim()).map_err(|_| invalid("is not a valid URL"))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        _ => Err(invalid("must be an http(s) link")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reset_url_must_be_http() {
        assert!(parse_reset_url("https://kumarkosmetics.in/reset?token=abc").is_ok());
        assert!(parse_reset_url("javascript:alert(1)").is_err());
        assert!(parse_reset_url("reset?token=abc").is_err());
    }
}

//! # API Error Type
//!
//! Unified error type for route handlers.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in the Storefront API                     │
//! │                                                                         │
//! │  Handler: Result<T, ApiError>                                           │
//! │         │                                                               │
//! │         ├── ValidationError / CoreError ───────┐                        │
//! │         ├── UpstreamError (coupons, orders) ───┤                        │
//! │         ├── MailError (otp, reset, contact) ───┼──► ApiError            │
//! │         │                                      │       │                │
//! │         │                                      │       ▼                │
//! │         │                               IntoResponse: status + JSON     │
//! │                                                                         │
//! │  SPA receives:  400 { "code": "VALIDATION_ERROR", "message": "..." }    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Upstream and mail failures are logged with their detail and returned
//! with a generic message; the buyer never sees relay or service bodies.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use kosmetics_core::{CoreError, ValidationError};
use kosmetics_mail::MailError;
use serde::Serialize;

use crate::upstream::UpstreamError;

/// API error returned from handlers.
///
/// ## Serialization
/// ```json
/// {
///   "code": "NOT_FOUND",
///   "message": "Order not found: 5f0c2a9e-..."
/// }
/// ```
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiError {
    /// Machine-readable error code for programmatic handling
    pub code: ErrorCode,

    /// Human-readable error message for display
    pub message: String,
}

/// Error codes for API responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Resource not found (404)
    NotFound,

    /// Input validation failed (400)
    ValidationError,

    /// Cart cannot be priced (422)
    CartError,

    /// Coupon service or order store failed (502)
    UpstreamError,

    /// Mail relay failed (502)
    MailError,

    /// Internal server error (500)
    Internal,
}

impl ErrorCode {
    pub fn status(&self) -> StatusCode {
        match self {
            ErrorCode::NotFound => StatusCode::NOT_FOUND,
            ErrorCode::ValidationError => StatusCode::BAD_REQUEST,
            ErrorCode::CartError => StatusCode::UNPROCESSABLE_ENTITY,
            ErrorCode::UpstreamError | ErrorCode::MailError => StatusCode::BAD_GATEWAY,
            ErrorCode::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        ApiError {
            code,
            message: message.into(),
        }
    }

    /// Creates a not found error.
    pub fn not_found(resource: &str, id: &str) -> Self {
        ApiError::new(ErrorCode::NotFound, format!("{} not found: {}", resource, id))
    }

    /// Creates a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::ValidationError, message)
    }

    /// Creates an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::Internal, message)
    }

    /// Creates a cart error.
    pub fn cart(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::CartError, message)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.code.status(), Json(self)).into_response()
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{:?}] {}", self.code, self.message)
    }
}

impl std::error::Error for ApiError {}

// =============================================================================
// Conversions
// =============================================================================

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError::validation(err.to_string())
    }
}

/// Converts core errors to API errors.
impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::OrderNotFound(id) => ApiError::not_found("Order", &id),
            CoreError::CartTooLarge { .. } | CoreError::EmptyCart => ApiError::cart(err.to_string()),
            CoreError::InvalidQuantity { .. }
            | CoreError::QuantityTooLarge { .. }
            | CoreError::NegativePrice { .. }
            | CoreError::PriceTooLarge { .. } => ApiError::validation(err.to_string()),
            CoreError::Validation(e) => ApiError::validation(e.to_string()),
        }
    }
}

/// Converts collaborator errors to API errors.
impl From<UpstreamError> for ApiError {
    fn from(err: UpstreamError) -> Self {
        match err {
            UpstreamError::NotFound { entity, id } => ApiError::not_found(entity, &id),
            UpstreamError::InvalidConfig(e) => {
                tracing::error!("Upstream misconfigured: {}", e);
                ApiError::internal("Service misconfigured")
            }
            other => {
                tracing::error!(error = %other, "Upstream call failed");
                ApiError::new(ErrorCode::UpstreamError, "Upstream service unavailable")
            }
        }
    }
}

/// Converts mail errors to API errors.
impl From<MailError> for ApiError {
    fn from(err: MailError) -> Self {
        match err {
            MailError::InvalidAddress(e) => ApiError::validation(format!("Invalid email address: {}", e)),
            MailError::InvalidConfig(e) => {
                tracing::error!("Mail misconfigured: {}", e);
                ApiError::internal("Mail is not configured")
            }
            other => {
                tracing::error!(error = %other, "Mail delivery failed");
                ApiError::new(ErrorCode::MailError, "Failed to send email")
            }
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serializes_code_and_message() {
        let err = ApiError::not_found("Order", "abc");
        let json = serde_json::to_value(&err).unwrap();
        assert_eq!(json["code"], "NOT_FOUND");
        assert_eq!(json["message"], "Order not found: abc");
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(ErrorCode::ValidationError.status(), StatusCode::BAD_REQUEST);
        assert_eq!(ErrorCode::CartError.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(ErrorCode::UpstreamError.status(), StatusCode::BAD_GATEWAY);
        assert_eq!(ErrorCode::MailError.status(), StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn test_core_error_mapping() {
        assert_eq!(ApiError::from(CoreError::EmptyCart).code, ErrorCode::CartError);
        assert_eq!(
            ApiError::from(CoreError::QuantityTooLarge { requested: 120, max: 99 }).code,
            ErrorCode::ValidationError
        );
        assert_eq!(
            ApiError::from(CoreError::PriceTooLarge {
                product_id: "kajal".to_string(),
                max: 10_000_000,
            })
            .code,
            ErrorCode::ValidationError
        );
    }

    #[test]
    fn test_upstream_detail_is_hidden() {
        let err = ApiError::from(UpstreamError::Status {
            service: "order store",
            status: 500,
            body: "stack trace".to_string(),
        });
        assert_eq!(err.code, ErrorCode::UpstreamError);
        assert!(!err.message.contains("stack trace"));

        let err = ApiError::from(UpstreamError::NotFound {
            entity: "Order",
            id: "abc".to_string(),
        });
        assert_eq!(err.code, ErrorCode::NotFound);
    }

    #[test]
    fn test_mail_error_mapping() {
        let err = ApiError::from(MailError::Rejected {
            status: 401,
            body: "bad key".to_string(),
        });
        assert_eq!(err.code, ErrorCode::MailError);
        assert!(!err.message.contains("bad key"));

        let err = ApiError::from(MailError::InvalidAddress("x".to_string()));
        assert_eq!(err.code, ErrorCode::ValidationError);
    }
}

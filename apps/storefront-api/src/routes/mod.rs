//! # HTTP Routes
//!
//! | Method | Path                                 | Handler                              |
//! |--------|--------------------------------------|--------------------------------------|
//! | GET    | `/health`                            | [`health`]                           |
//! | POST   | `/api/cart/quote`                    | [`cart::quote`]                      |
//! | POST   | `/api/cart/coupon`                   | [`cart::apply_coupon`]               |
//! | POST   | `/api/orders`                        | [`orders::create_order`]             |
//! | PUT    | `/api/admin/orders/{id}/status`      | [`admin::update_order_status`]       |
//! | POST   | `/api/notifications/otp`             | [`notifications::send_otp`]          |
//! | POST   | `/api/notifications/password-reset`  | [`notifications::send_password_reset`] |
//! | POST   | `/api/contact`                       | [`contact::submit`]                  |

pub mod admin;
pub mod cart;
pub mod contact;
pub mod notifications;
pub mod orders;

use axum::response::IntoResponse;
use axum::routing::{get, post, put};
use axum::Router;

use crate::SharedState;

/// Builds the application router.
pub fn router(state: SharedState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/cart/quote", post(cart::quote))
        .route("/api/cart/coupon", post(cart::apply_coupon))
        .route("/api/orders", post(orders::create_order))
        .route("/api/admin/orders/{id}/status", put(admin::update_order_status))
        .route("/api/notifications/otp", post(notifications::send_otp))
        .route(
            "/api/notifications/password-reset",
            post(notifications::send_password_reset),
        )
        .route("/api/contact", post(contact::submit))
        .with_state(state)
}

/// Health check endpoint.
pub async fn health() -> impl IntoResponse {
    "OK"
}

// =============================================================================
// Router Tests
// =============================================================================

//! Checkout.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use kosmetics_core::{CouponStatus, NewOrder, Order};
use tracing::{info, warn};

use super::cart::price_with_code;
use crate::error::ApiResult;
use crate::SharedState;

/// `POST /api/orders`
///
/// ## Flow
/// ```text
/// validate ──► re-price (coupon re-validated) ──► OrderStore::create
///                                                      │
///                                                      ▼
///                                  confirmation mail (failure only logged)
/// ```
///
/// Totals sent by the client are never trusted; a coupon that is no longer
/// valid is dropped and the order is priced without it.
pub async fn create_order(
    State(state): State<SharedState>,
    Json(new_order): Json<NewOrder>,
) -> ApiResult<(StatusCode, Json<Order>)> {
    new_order.validate()?;

    let coupon_code = new_order.coupon_code.as_deref();
    let priced = price_with_code(&state, &new_order.items, coupon_code).await?;

    if let CouponStatus::Rejected { code, message } = &priced.coupon {
        warn!(code = %code, reason = %message, "Coupon dropped at checkout");
    }

    let order = Order::place(new_order, &priced, Utc::now())?;
    let stored = state.orders.create(&order).await?;

    let delivery = state.mailer.send_order_confirmation(&stored).await;
    info!(
        order_id = %stored.id,
        reference = %stored.reference(),
        total = %stored.totals.total,
        items = stored.item_count(),
        confirmation = ?delivery,
        "Order placed"
    );

    Ok((StatusCode::CREATED, Json(stored)))
}

//! Cart quote and coupon application.
//!
//! Both endpoints are stateless: the SPA keeps the cart and sends it with
//! every request, and the server prices it from scratch.

use axum::extract::State;
use axum::Json;
use kosmetics_core::coupon::{apply_coupon_verdict, normalize_code};
use kosmetics_core::pricing::price_cart;
use kosmetics_core::{CartLineItem, CouponStatus, OrderTotals, PricedCart};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::ApiResult;
use crate::{AppState, SharedState};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteRequest {
    pub items: Vec<CartLineItem>,
    /// Code the buyer entered earlier; checked again on every quote.
    #[serde(default)]
    pub coupon_code: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplyCouponRequest {
    pub items: Vec<CartLineItem>,
    pub code: String,
}

/// Priced cart as the SPA renders it.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartQuote {
    pub totals: OrderTotals,
    pub coupon: CouponStatus,
    pub is_coupon_applied: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl From<PricedCart> for CartQuote {
    fn from(priced: PricedCart) -> Self {
        CartQuote {
            is_coupon_applied: priced.is_coupon_applied(),
            message: priced.coupon.message().map(str::to_string),
            totals: priced.totals,
            coupon: priced.coupon,
        }
    }
}

/// `POST /api/cart/quote`
pub async fn quote(
    State(state): State<SharedState>,
    Json(req): Json<QuoteRequest>,
) -> ApiResult<Json<CartQuote>> {
    let priced = price_with_code(&state, &req.items, req.coupon_code.as_deref()).await?;
    Ok(Json(priced.into()))
}

/// `POST /api/cart/coupon`
///
/// A code the coupon service refuses still answers 200: the totals are
/// priced without it and the service's message is passed through.
pub async fn apply_coupon(
    State(state): State<SharedState>,
    Json(req): Json<ApplyCouponRequest>,
) -> ApiResult<Json<CartQuote>> {
    let code = normalize_code(&req.code)?;
    let verdict = state.coupons.validate(&code).await?;
    let priced = apply_coupon_verdict(&req.items, &code, &verdict, &state.pricing)?;

    debug!(
        code = %code,
        applied = priced.is_coupon_applied(),
        discount = %priced.totals.discount,
        "Coupon evaluated"
    );
    Ok(Json(priced.into()))
}

/// Prices `items`, asking the coupon service about `code` first.
///
/// A blank code prices without a coupon. A refused code comes back as
/// [`CouponStatus::Rejected`] with zero discount.
pub(crate) async fn price_with_code(
    state: &AppState,
    items: &[CartLineItem],
    code: Option<&str>,
) -> ApiResult<PricedCart> {
    let code = code.map(str::trim).filter(|c| !c.is_empty());

    let priced = match code {
        Some(raw) => {
            let code = normalize_code(raw)?;
            let verdict = state.coupons.validate(&code).await?;
            apply_coupon_verdict(items, &code, &verdict, &state.pricing)?
        }
        None => price_cart(items, None, &state.pricing)?,
    };
    Ok(priced)
}

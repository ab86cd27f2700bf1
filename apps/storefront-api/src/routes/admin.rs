//! Admin dashboard endpoints.

use axum::extract::{Path, State};
use axum::Json;
use kosmetics_core::{Order, OrderStatusUpdate};
use tracing::info;
use uuid::Uuid;

use crate::error::{ApiError, ApiResult};
use crate::SharedState;

/// `PUT /api/admin/orders/{id}/status`
///
/// Any status may be set from any other; the dashboard decides.
pub async fn update_order_status(
    State(state): State<SharedState>,
    Path(id): Path<String>,
    Json(update): Json<OrderStatusUpdate>,
) -> ApiResult<Json<Order>> {
    let id = Uuid::parse_str(id.trim())
        .map_err(|_| ApiError::validation(format!("Invalid order id: {}", id)))?
        .to_string();
    let update = update.validate()?;

    let order = state.orders.update_status(&id, &update).await?;
    info!(
        order_id = %order.id,
        status = %order.status,
        tracking_id = order.tracking_id.as_deref().unwrap_or("-"),
        "Order status updated"
    );

    Ok(Json(order))
}

//! # Orders
//!
//! The order entity and its admin-managed status.
//!
//! ## Order Status
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          Order Status                                   │
//! │                                                                         │
//! │   Pending ──► Processing ──► Shipped ──► Delivered   (terminal)         │
//! │      │             │            │                                       │
//! │      └─────────────┴────────────┴──────► Cancelled   (terminal)         │
//! │                                                                         │
//! │  The arrows are the usual path, not a rule: the admin dashboard may    │
//! │  select any status from any other (e.g. re-open a cancelled order).    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Persistence belongs to the external order store; this module only
//! builds orders and applies updates to them in memory.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use ts_rs::TS;
use uuid::Uuid;

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::money::Money;
use crate::pricing::{OrderTotals, PricedCart};
use crate::types::{CartLineItem, Customer, ShippingAddress};
use crate::validation::{
    validate_address, validate_admin_notes, validate_customer, validate_tracking_id,
    ValidationResult,
};

// =============================================================================
// Order Status
// =============================================================================

/// Fulfilment status of an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export)]
pub enum OrderStatus {
    /// Placed, not yet picked up by the warehouse.
    #[default]
    Pending,
    /// Being packed.
    Processing,
    /// Handed to the courier.
    Shipped,
    /// Received by the buyer.
    Delivered,
    /// Will not be fulfilled.
    Cancelled,
}

impl OrderStatus {
    /// Status every new order starts in.
    pub const fn initial() -> Self {
        OrderStatus::Pending
    }

    /// Every status, in dashboard display order.
    pub const fn all() -> [OrderStatus; 5] {
        [
            OrderStatus::Pending,
            OrderStatus::Processing,
            OrderStatus::Shipped,
            OrderStatus::Delivered,
            OrderStatus::Cancelled,
        ]
    }

    /// Delivered and Cancelled end the normal lifecycle.
    pub const fn is_terminal(&self) -> bool {
        matches!(self, OrderStatus::Delivered | OrderStatus::Cancelled)
    }

    /// Whether the admin may move an order from `self` to `next`.
    ///
    /// Always true: status changes are at admin discretion.
    pub const fn can_transition_to(&self, _next: OrderStatus) -> bool {
        true
    }

    /// Human-readable label for the dashboard and emails.
    pub const fn label(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "Pending",
            OrderStatus::Processing => "Processing",
            OrderStatus::Shipped => "Shipped",
            OrderStatus::Delivered => "Delivered",
            OrderStatus::Cancelled => "Cancelled",
        }
    }

    const fn wire_name(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Processing => "processing",
            OrderStatus::Shipped => "shipped",
            OrderStatus::Delivered => "delivered",
            OrderStatus::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.wire_name())
    }
}

impl FromStr for OrderStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        OrderStatus::all()
            .into_iter()
            .find(|status| status.wire_name() == wanted)
            .ok_or_else(|| ValidationError::NotAllowed {
                field: "status".to_string(),
                allowed: OrderStatus::all()
                    .iter()
                    .map(|s| s.wire_name().to_string())
                    .collect(),
            })
    }
}

// =============================================================================
// Status Update
// =============================================================================

/// Admin request to change an order's status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct OrderStatusUpdate {
    pub status: OrderStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tracking_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub admin_notes: Option<String>,
}

impl OrderStatusUpdate {
    /// Validates the update and returns it with blank fields dropped and
    /// the rest trimmed.
    pub fn validate(self) -> ValidationResult<Self> {
        let tracking_id = non_blank(self.tracking_id);
        let admin_notes = non_blank(self.admin_notes);

        if let Some(id) = &tracking_id {
            validate_tracking_id(id)?;
        }
        if let Some(notes) = &admin_notes {
            validate_admin_notes(notes)?;
        }

        Ok(OrderStatusUpdate {
            status: self.status,
            tracking_id,
            admin_notes,
        })
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

// =============================================================================
// Order
// =============================================================================

/// Snapshot of a cart line at the time the order was placed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct OrderLine {
    pub product_id: String,
    pub name: String,
    pub unit_price: Money,
    pub quantity: i64,
    pub line_total: Money,
}

impl From<&CartLineItem> for OrderLine {
    fn from(item: &CartLineItem) -> Self {
        OrderLine {
            product_id: item.product_id.clone(),
            name: item.name.clone(),
            unit_price: item.unit_price,
            quantity: item.quantity,
            line_total: item.line_total(),
        }
    }
}

/// Checkout payload before pricing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct NewOrder {
    pub customer: Customer,
    pub shipping_address: ShippingAddress,
    pub items: Vec<CartLineItem>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coupon_code: Option<String>,
}

impl NewOrder {
    /// Validates buyer, address and that there is something to buy.
    pub fn validate(&self) -> CoreResult<()> {
        if self.items.is_empty() {
            return Err(CoreError::EmptyCart);
        }
        validate_customer(&self.customer)?;
        validate_address(&self.shipping_address)?;
        Ok(())
    }
}

/// A placed order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Order {
    pub id: String,
    pub customer: Customer,
    pub shipping_address: ShippingAddress,
    pub items: Vec<OrderLine>,
    pub totals: OrderTotals,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coupon_code: Option<String>,
    pub status: OrderStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tracking_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub admin_notes: Option<String>,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

impl Order {
    /// Builds a Pending order from a validated checkout and its pricing.
    ///
    /// Only a coupon that was actually applied is recorded on the order.
    pub fn place(new_order: NewOrder, priced: &PricedCart, now: DateTime<Utc>) -> CoreResult<Self> {
        new_order.validate()?;

        let coupon_code = if priced.is_coupon_applied() {
            priced.coupon.code().map(str::to_string)
        } else {
            None
        };

        Ok(Order {
            id: Uuid::new_v4().to_string(),
            items: new_order.items.iter().map(OrderLine::from).collect(),
            customer: new_order.customer,
            shipping_address: new_order.shipping_address,
            totals: priced.totals,
            coupon_code,
            status: OrderStatus::initial(),
            tracking_id: None,
            admin_notes: None,
            created_at: now,
            updated_at: now,
        })
    }

    /// Applies an admin status update and returns the previous status.
    ///
    /// Tracking id and notes are replaced only when the update carries
    /// them, so a bare status change keeps what was entered before.
    pub fn apply_status_update(&mut self, update: OrderStatusUpdate, now: DateTime<Utc>) -> OrderStatus {
        let previous = self.status;
        self.status = update.status;
        if update.tracking_id.is_some() {
            self.tracking_id = update.tracking_id;
        }
        if update.admin_notes.is_some() {
            self.admin_notes = update.admin_notes;
        }
        self.updated_at = now;
        previous
    }

    /// Total quantity of units ordered.
    pub fn item_count(&self) -> i64 {
        self.items.iter().map(|l| l.quantity).sum()
    }

    /// Short human reference used in mail subjects (`KK-1A2B3C4D`).
    pub fn reference(&self) -> String {
        let short: String = self
            .id
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .take(8)
            .collect();
        format!("KK-{}", short.to_uppercase())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coupon::AppliedCoupon;
    use crate::pricing::{price_cart, PricingConfig};
    use chrono::Duration;

    fn new_order() -> NewOrder {
        NewOrder {
            customer: Customer {
                name: "Asha Kumar".to_string(),
                email: "asha@example.com".to_string(),
                phone: Some("9876543210".to_string()),
            },
            shipping_address: ShippingAddress {
                line1: "12 MG Road".to_string(),
                line2: None,
                city: "Pune".to_string(),
                state: "Maharashtra".to_string(),
                pin_code: "411001".to_string(),
            },
            items: vec![CartLineItem::new("serum", "Vitamin C Serum", Money::from_rupees(200), 2)],
            coupon_code: None,
        }
    }

    fn placed() -> Order {
        let order = new_order();
        let priced = price_cart(&order.items, None, &PricingConfig::default()).unwrap();
        Order::place(order, &priced, Utc::now()).unwrap()
    }

    #[test]
    fn test_status_default_is_pending() {
        assert_eq!(OrderStatus::default(), OrderStatus::Pending);
        assert_eq!(OrderStatus::initial(), OrderStatus::Pending);
    }

    #[test]
    fn test_terminal_statuses() {
        let terminal: Vec<_> = OrderStatus::all()
            .into_iter()
            .filter(OrderStatus::is_terminal)
            .collect();
        assert_eq!(terminal, vec![OrderStatus::Delivered, OrderStatus::Cancelled]);
    }

    #[test]
    fn test_any_status_reachable_from_any_other() {
        for from in OrderStatus::all() {
            for to in OrderStatus::all() {
                assert!(from.can_transition_to(to));
            }
        }
    }

    #[test]
    fn test_status_parse_and_display() {
        assert_eq!("Shipped".parse::<OrderStatus>().unwrap(), OrderStatus::Shipped);
        assert_eq!(OrderStatus::Cancelled.to_string(), "cancelled");
        assert!("lost".parse::<OrderStatus>().is_err());

        let json = serde_json::to_string(&OrderStatus::Processing).unwrap();
        assert_eq!(json, "\"processing\"");
    }

    #[test]
    fn test_place_builds_pending_order() {
        let order = placed();

        assert_eq!(order.status, OrderStatus::Pending);
        assert_eq!(order.items.len(), 1);
        assert_eq!(order.items[0].line_total.rupees(), 400);
        assert_eq!(order.totals.total.rupees(), 500);
        assert_eq!(order.item_count(), 2);
        assert!(order.coupon_code.is_none());
        assert!(order.reference().starts_with("KK-"));
        assert_eq!(order.reference().len(), 11);
    }

    #[test]
    fn test_place_records_applied_coupon_only() {
        let order = new_order();
        let coupon = AppliedCoupon::free_delivery("FREESHIP");
        let priced = price_cart(&order.items, Some(&coupon), &PricingConfig::default()).unwrap();
        let placed = Order::place(order, &priced, Utc::now()).unwrap();
        assert_eq!(placed.coupon_code.as_deref(), Some("FREESHIP"));
    }

    #[test]
    fn test_place_rejects_empty_cart() {
        let mut order = new_order();
        order.items.clear();
        let priced = price_cart(&[], None, &PricingConfig::default()).unwrap();
        assert!(matches!(
            Order::place(order, &priced, Utc::now()),
            Err(CoreError::EmptyCart)
        ));
    }

    #[test]
    fn test_apply_status_update() {
        let mut order = placed();
        let later = order.created_at + Duration::minutes(5);

        let update = OrderStatusUpdate {
            status: OrderStatus::Shipped,
            tracking_id: Some("DTDC-123456".to_string()),
            admin_notes: None,
        };
        let previous = order.apply_status_update(update, later);

        assert_eq!(previous, OrderStatus::Pending);
        assert_eq!(order.status, OrderStatus::Shipped);
        assert_eq!(order.tracking_id.as_deref(), Some("DTDC-123456"));
        assert_eq!(order.updated_at, later);

        // A bare status change keeps the tracking id
        order.apply_status_update(
            OrderStatusUpdate {
                status: OrderStatus::Delivered,
                tracking_id: None,
                admin_notes: Some("Left with neighbour".to_string()),
            },
            later,
        );
        assert_eq!(order.tracking_id.as_deref(), Some("DTDC-123456"));
        assert_eq!(order.admin_notes.as_deref(), Some("Left with neighbour"));
    }

    #[test]
    fn test_cancelled_order_can_be_reopened() {
        let mut order = placed();
        order.apply_status_update(
            OrderStatusUpdate { status: OrderStatus::Cancelled, tracking_id: None, admin_notes: None },
            Utc::now(),
        );
        order.apply_status_update(
            OrderStatusUpdate { status: OrderStatus::Processing, tracking_id: None, admin_notes: None },
            Utc::now(),
        );
        assert_eq!(order.status, OrderStatus::Processing);
    }

    #[test]
    fn test_status_update_validation() {
        let update = OrderStatusUpdate {
            status: OrderStatus::Shipped,
            tracking_id: Some("   ".to_string()),
            admin_notes: Some("  fragile ".to_string()),
        }
        .validate()
        .unwrap();
        assert!(update.tracking_id.is_none());
        assert_eq!(update.admin_notes.as_deref(), Some("fragile"));

        let bad = OrderStatusUpdate {
            status: OrderStatus::Shipped,
            tracking_id: Some("not valid!".to_string()),
            admin_notes: None,
        };
        assert!(bad.validate().is_err());
    }

    #[test]
    fn test_status_update_wire_format() {
        let update: OrderStatusUpdate =
            serde_json::from_str(r#"{"status":"shipped","trackingId":"BD123"}"#).unwrap();
        assert_eq!(update.status, OrderStatus::Shipped);
        assert_eq!(update.tracking_id.as_deref(), Some("BD123"));
        assert!(update.admin_notes.is_none());
    }
}

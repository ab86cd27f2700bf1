//! # Domain Types
//!
//! Core domain types shared by the pricing engine, the order model and the
//! storefront API.
//!
//! ## Type Overview
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │  CartLineItem   │   │    Customer     │   │ ShippingAddress │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  product_id     │   │  name           │   │  line1, line2   │       │
//! │  │  name           │   │  email          │   │  city, state    │       │
//! │  │  unit_price     │   │  phone          │   │  pin_code       │       │
//! │  │  quantity       │   └─────────────────┘   └─────────────────┘       │
//! │  └─────────────────┘                                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐                              │
//! │  │    TaxRate      │   │ ContactMessage  │                              │
//! │  │  bps (u32)      │   │  name, email    │                              │
//! │  │  1800 = 18%     │   │  message        │                              │
//! │  └─────────────────┘   └─────────────────┘                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Order, OrderStatus and friends live in [`crate::order`]; coupon types in
//! [`crate::coupon`].

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;

// =============================================================================
// Tax Rate
// =============================================================================

/// Tax rate represented in basis points (bps).
///
/// 1 basis point = 0.01%, so GST on cosmetics (18%) is 1800 bps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct TaxRate(u32);

impl TaxRate {
    /// Creates a tax rate from basis points.
    #[inline]
    pub const fn from_bps(bps: u32) -> Self {
        TaxRate(bps)
    }

    /// Returns the rate in basis points.
    #[inline]
    pub const fn bps(&self) -> u32 {
        self.0
    }

    /// Returns the rate as a percentage (for display only).
    #[inline]
    pub fn percentage(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    /// Zero tax rate.
    #[inline]
    pub const fn zero() -> Self {
        TaxRate(0)
    }

    /// Checks if tax rate is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }
}

impl Default for TaxRate {
    fn default() -> Self {
        TaxRate::from_bps(crate::DEFAULT_TAX_RATE_BPS)
    }
}

// =============================================================================
// Cart Line Item
// =============================================================================

/// One product entry in the cart.
///
/// The unit price is tax-inclusive and frozen at the moment the product was
/// added; the cart lives in the buyer's session and is never persisted on
/// its own.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct CartLineItem {
    /// Catalog product identifier.
    pub product_id: String,

    /// Product name shown in the cart and on the confirmation mail.
    #[serde(default)]
    pub name: String,

    /// Tax-inclusive unit price in rupees.
    pub unit_price: Money,

    /// Quantity in cart (at least 1).
    pub quantity: i64,
}

impl CartLineItem {
    /// Creates a new line item.
    pub fn new(
        product_id: impl Into<String>,
        name: impl Into<String>,
        unit_price: Money,
        quantity: i64,
    ) -> Self {
        CartLineItem {
            product_id: product_id.into(),
            name: name.into(),
            unit_price,
            quantity,
        }
    }

    /// Unit price × quantity.
    #[inline]
    pub fn line_total(&self) -> Money {
        self.unit_price.multiply_quantity(self.quantity)
    }
}

// =============================================================================
// Customer & Address
// =============================================================================

/// The buyer placing an order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Customer {
    pub name: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

/// Delivery address for an order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct ShippingAddress {
    pub line1: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line2: Option<String>,
    pub city: String,
    pub state: String,
    /// Six-digit Indian postal code.
    pub pin_code: String,
}

// =============================================================================
// Contact Form
// =============================================================================

/// A message submitted through the storefront's contact page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct ContactMessage {
    pub name: String,
    pub email: String,
    pub message: String,
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tax_rate_from_bps() {
        let rate = TaxRate::from_bps(1800);
        assert_eq!(rate.bps(), 1800);
        assert!((rate.percentage() - 18.0).abs() < 0.001);
    }

    #[test]
    fn test_tax_rate_default_is_gst() {
        assert_eq!(TaxRate::default(), TaxRate::from_bps(1800));
    }

    #[test]
    fn test_line_total() {
        let item = CartLineItem::new("kajal-01", "Kohl Kajal", Money::from_rupees(2499), 2);
        assert_eq!(item.line_total().rupees(), 4998);
    }

    #[test]
    fn test_line_item_wire_format() {
        let json = r#"{"productId":"p1","unitPrice":1899,"quantity":1}"#;
        let item: CartLineItem = serde_json::from_str(json).unwrap();
        assert_eq!(item.product_id, "p1");
        assert_eq!(item.unit_price, Money::from_rupees(1899));
        assert!(item.name.is_empty());
    }
}

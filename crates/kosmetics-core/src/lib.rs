//! # kosmetics-core: Pure Business Logic for Kumar Kosmetics
//!
//! This crate holds the storefront's business rules as pure functions with
//! zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Kumar Kosmetics Architecture                        │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                   Storefront SPA + Admin                        │   │
//! │  │    Catalog ──► Cart ──► Checkout ──► Orders (admin dashboard)   │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ HTTP / JSON                            │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    storefront-api (axum)                        │   │
//! │  │    quote, apply coupon, place order, admin status, mail         │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │            ★ kosmetics-core (THIS CRATE) ★                      │   │
//! │  │                                                                 │   │
//! │  │   ┌─────────┐ ┌─────────┐ ┌─────────┐ ┌─────────┐ ┌──────────┐ │   │
//! │  │   │  money  │ │ pricing │ │ coupon  │ │  order  │ │validation│ │   │
//! │  │   │  Money  │ │ totals  │ │ resolve │ │ status  │ │  forms   │ │   │
//! │  │   │ TaxRate │ │ config  │ │ verdict │ │ updates │ │  fields  │ │   │
//! │  │   └─────────┘ └─────────┘ └─────────┘ └─────────┘ └──────────┘ │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (cart lines, customers, orders, tax rate)
//! - [`money`] - Money type with integer arithmetic (whole rupees)
//! - [`pricing`] - The pricing engine: subtotal, tax, shipping, discount, total
//! - [`coupon`] - Coupon codes and collaborator verdicts
//! - [`order`] - Order status model and admin updates
//! - [`error`] - Domain error types
//! - [`validation`] - Field and form validation
//!
//! ## Example Usage
//!
//! ```rust
//! use kosmetics_core::money::Money;
//! use kosmetics_core::pricing::{price_cart, PricingConfig};
//! use kosmetics_core::types::CartLineItem;
//!
//! let items = vec![CartLineItem::new("lipstick-01", "Velvet Matte Lipstick", Money::from_rupees(200), 1)];
//! let priced = price_cart(&items, None, &PricingConfig::default()).unwrap();
//!
//! assert_eq!(priced.totals.inclusive_subtotal.rupees(), 200);
//! assert_eq!(priced.totals.shipping.rupees(), 50);
//! assert_eq!(priced.totals.total.rupees(), 250);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod coupon;
pub mod error;
pub mod money;
pub mod order;
pub mod pricing;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use coupon::{AppliedCoupon, CouponKind, CouponRejection, CouponValidation};
pub use error::{clip_error_body, CoreError, CoreResult, ValidationError, MAX_ERROR_BODY_LEN};
pub use money::Money;
pub use order::{NewOrder, Order, OrderLine, OrderStatus, OrderStatusUpdate};
pub use pricing::{CouponStatus, OrderTotals, PricedCart, PricingConfig, ThresholdBasis};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum distinct lines allowed in a single cart.
pub const MAX_CART_ITEMS: usize = 50;

/// Maximum quantity of a single product in the cart.
///
/// Guards against typing 100 instead of 10 on the quantity stepper.
pub const MAX_ITEM_QUANTITY: i64 = 99;

/// Highest unit price accepted on a cart line, in rupees (₹1 crore).
///
/// Keeps Σ price × qty over a full cart well inside `i64`.
pub const MAX_UNIT_PRICE: i64 = 10_000_000;

/// GST rate applied to cosmetics, in basis points (18%).
pub const DEFAULT_TAX_RATE_BPS: u32 = 1800;

/// Inclusive subtotal above which shipping is waived, in rupees.
pub const DEFAULT_FREE_SHIPPING_THRESHOLD: i64 = 1500;

/// Shipping charged per unit of quantity below the threshold, in rupees.
pub const DEFAULT_PER_UNIT_SHIPPING: i64 = 50;

//! # Pricing Engine
//!
//! Computes the totals breakdown shown to the buyer on the cart page, on the
//! checkout review and sent to the payment step. One function serves every
//! call site so the two screens can never drift apart.
//!
//! ## Calculation
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  items ──► Σ unit_price × qty ───────────────► inclusive subtotal       │
//! │                                                    │                    │
//! │            tax = round(incl × bps / (10000+bps)) ◄─┤                    │
//! │            subtotal = incl − tax                   │                    │
//! │                                                    │                    │
//! │            shipping = 0                if basis > threshold             │
//! │                     = Σ qty × per_unit otherwise                        │
//! │                                                    │                    │
//! │  coupon ──► discount (free delivery: = shipping)   │                    │
//! │                                                    ▼                    │
//! │            total = max(0, incl + shipping − discount)                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every function here is pure: the same items, coupon and config always
//! produce the same [`PricedCart`].

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use ts_rs::TS;

use crate::coupon::{AppliedCoupon, CouponKind};
use crate::error::{CoreResult, ValidationError};
use crate::money::Money;
use crate::types::{CartLineItem, TaxRate};
use crate::validation::{validate_cart_size, validate_quantity, validate_unit_price};
use crate::{DEFAULT_FREE_SHIPPING_THRESHOLD, DEFAULT_PER_UNIT_SHIPPING};

/// Notice shown when a free delivery coupon meets an order that already
/// ships free.
pub const FREE_DELIVERY_ALREADY_APPLIES: &str = "Free delivery is already applied to this order";

// =============================================================================
// Configuration
// =============================================================================

/// Which subtotal is compared against the free-shipping threshold.
///
/// The storefront historically compared the tax-inclusive amount on the
/// cart page and a reconstructed amount on checkout; this makes the choice
/// explicit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum ThresholdBasis {
    /// Compare the tax-inclusive subtotal (what the buyer sees as "items").
    #[default]
    TaxInclusive,
    /// Compare the subtotal after backing out tax.
    TaxExclusive,
}

impl fmt::Display for ThresholdBasis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ThresholdBasis::TaxInclusive => write!(f, "inclusive"),
            ThresholdBasis::TaxExclusive => write!(f, "exclusive"),
        }
    }
}

impl FromStr for ThresholdBasis {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "inclusive" | "tax_inclusive" => Ok(ThresholdBasis::TaxInclusive),
            "exclusive" | "tax_exclusive" => Ok(ThresholdBasis::TaxExclusive),
            _ => Err(ValidationError::NotAllowed {
                field: "threshold_basis".to_string(),
                allowed: vec!["inclusive".to_string(), "exclusive".to_string()],
            }),
        }
    }
}

/// Knobs of the pricing engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct PricingConfig {
    /// Rate already contained in catalog prices.
    pub tax_rate: TaxRate,
    /// Shipping is waived when the basis amount is strictly above this.
    pub free_shipping_threshold: Money,
    /// Charged once per unit of quantity when shipping applies.
    pub per_unit_shipping: Money,
    pub threshold_basis: ThresholdBasis,
}

impl Default for PricingConfig {
    fn default() -> Self {
        PricingConfig {
            tax_rate: TaxRate::default(),
            free_shipping_threshold: Money::from_rupees(DEFAULT_FREE_SHIPPING_THRESHOLD),
            per_unit_shipping: Money::from_rupees(DEFAULT_PER_UNIT_SHIPPING),
            threshold_basis: ThresholdBasis::TaxInclusive,
        }
    }
}

// =============================================================================
// Results
// =============================================================================

/// Totals breakdown of a cart. Derived on every call, never stored alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct OrderTotals {
    /// Σ unit price × quantity, tax included.
    pub inclusive_subtotal: Money,
    /// Tax contained in the inclusive subtotal.
    pub tax: Money,
    /// Inclusive subtotal with tax backed out.
    pub subtotal: Money,
    pub shipping: Money,
    pub discount: Money,
    /// Amount charged at the payment step. Never negative.
    pub total: Money,
    pub total_quantity: i64,
}

/// What happened to the coupon the buyer offered.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[serde(tag = "status", rename_all = "snake_case")]
#[ts(export)]
pub enum CouponStatus {
    /// No coupon was offered.
    #[default]
    NotApplied,
    /// The coupon produced its discount.
    Applied { code: String },
    /// The coupon is valid but had nothing left to discount.
    AlreadySatisfied { code: String, message: String },
    /// The coupon was refused; totals are priced without it.
    Rejected { code: String, message: String },
}

impl CouponStatus {
    /// Message to surface to the buyer, if any.
    pub fn message(&self) -> Option<&str> {
        match self {
            CouponStatus::AlreadySatisfied { message, .. }
            | CouponStatus::Rejected { message, .. } => Some(message),
            CouponStatus::NotApplied | CouponStatus::Applied { .. } => None,
        }
    }

    /// The coupon code involved, if any.
    pub fn code(&self) -> Option<&str> {
        match self {
            CouponStatus::NotApplied => None,
            CouponStatus::Applied { code }
            | CouponStatus::AlreadySatisfied { code, .. }
            | CouponStatus::Rejected { code, .. } => Some(code),
        }
    }
}

/// Output of the pricing engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct PricedCart {
    pub totals: OrderTotals,
    pub coupon: CouponStatus,
}

impl PricedCart {
    /// True only when a coupon actually changed the totals' discount.
    pub fn is_coupon_applied(&self) -> bool {
        matches!(self.coupon, CouponStatus::Applied { .. })
    }
}

// =============================================================================
// Operations
// =============================================================================

/// Checks the cart lines the engine is about to price.
///
/// ## Rules
/// - at most [`MAX_CART_ITEMS`] lines
/// - every quantity in `1..=MAX_ITEM_QUANTITY`
/// - every unit price in `0..=MAX_UNIT_PRICE`
///
/// With these bounds no line total or cart subtotal can overflow.
///
/// [`MAX_CART_ITEMS`]: crate::MAX_CART_ITEMS
/// [`MAX_UNIT_PRICE`]: crate::MAX_UNIT_PRICE
pub fn validate_cart(items: &[CartLineItem]) -> CoreResult<()> {
    validate_cart_size(items.len())?;

    for item in items {
        validate_quantity(&item.product_id, item.quantity)?;
        validate_unit_price(&item.product_id, item.unit_price)?;
    }

    Ok(())
}

/// Prices a cart with an optional, already-accepted coupon.
///
/// ## Example
/// ```rust
/// use kosmetics_core::coupon::AppliedCoupon;
/// use kosmetics_core::money::Money;
/// use kosmetics_core::pricing::{price_cart, PricingConfig};
/// use kosmetics_core::types::CartLineItem;
///
/// let items = vec![
///     CartLineItem::new("foundation", "Matte Foundation", Money::from_rupees(2499), 2),
///     CartLineItem::new("serum", "Vitamin C Serum", Money::from_rupees(1899), 1),
/// ];
/// let priced = price_cart(&items, None, &PricingConfig::default()).unwrap();
///
/// assert_eq!(priced.totals.inclusive_subtotal.rupees(), 6897);
/// assert_eq!(priced.totals.shipping.rupees(), 0);
/// assert_eq!(priced.totals.total.rupees(), 6897);
/// ```
///
/// ## Errors
/// Any line that fails [`validate_cart`].
pub fn price_cart(
    items: &[CartLineItem],
    coupon: Option<&AppliedCoupon>,
    config: &PricingConfig,
) -> CoreResult<PricedCart> {
    validate_cart(items)?;

    let inclusive_subtotal: Money = items.iter().map(CartLineItem::line_total).sum();
    let total_quantity: i64 = items.iter().map(|i| i.quantity).sum();

    let tax = inclusive_subtotal.included_tax(config.tax_rate);
    let subtotal = inclusive_subtotal - tax;

    let basis = match config.threshold_basis {
        ThresholdBasis::TaxInclusive => inclusive_subtotal,
        ThresholdBasis::TaxExclusive => subtotal,
    };
    let shipping = if basis > config.free_shipping_threshold {
        Money::zero()
    } else {
        config.per_unit_shipping.multiply_quantity(total_quantity)
    };

    let (discount, coupon_status) = match coupon {
        None => (Money::zero(), CouponStatus::NotApplied),
        Some(coupon) => coupon_discount(coupon, inclusive_subtotal, shipping),
    };

    let total = (inclusive_subtotal + shipping - discount).non_negative();

    Ok(PricedCart {
        totals: OrderTotals {
            inclusive_subtotal,
            tax,
            subtotal,
            shipping,
            discount,
            total,
            total_quantity,
        },
        coupon: coupon_status,
    })
}

/// Discount produced by `coupon` against the computed amounts.
fn coupon_discount(
    coupon: &AppliedCoupon,
    inclusive_subtotal: Money,
    shipping: Money,
) -> (Money, CouponStatus) {
    let code = coupon.code.clone();

    match coupon.kind {
        CouponKind::FreeDelivery if shipping.is_positive() => {
            (shipping, CouponStatus::Applied { code })
        }
        CouponKind::FreeDelivery => (
            Money::zero(),
            CouponStatus::AlreadySatisfied {
                code,
                message: FREE_DELIVERY_ALREADY_APPLIES.to_string(),
            },
        ),
        CouponKind::FlatDiscount { amount } => {
            let discount = amount.non_negative().min(inclusive_subtotal + shipping);
            if discount.is_zero() {
                (
                    Money::zero(),
                    CouponStatus::AlreadySatisfied {
                        code,
                        message: "Nothing left to discount on this order".to_string(),
                    },
                )
            } else {
                (discount, CouponStatus::Applied { code })
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
    use crate::error::CoreError;
    use crate::{MAX_CART_ITEMS, MAX_ITEM_QUANTITY, MAX_UNIT_PRICE};

    fn item(id: &str, price: i64, qty: i64) -> CartLineItem {
        CartLineItem::new(id, format!("Product {}", id), Money::from_rupees(price), qty)
    }

    fn price(items: &[CartLineItem], coupon: Option<&AppliedCoupon>) -> PricedCart {
        price_cart(items, coupon, &PricingConfig::default()).unwrap()
    }

    #[test]
    fn test_large_cart_ships_free() {
        let priced = price(&[item("a", 2499, 2), item("b", 1899, 1)], None);
        let t = priced.totals;

        assert_eq!(t.inclusive_subtotal.rupees(), 6897);
        // 6897 × 18 / 118 = 1052.08
        assert_eq!(t.tax.rupees(), 1052);
        assert_eq!(t.subtotal.rupees(), 5845);
        assert_eq!(t.shipping.rupees(), 0);
        assert_eq!(t.discount.rupees(), 0);
        assert_eq!(t.total.rupees(), 6897);
        assert_eq!(t.total_quantity, 3);
        assert_eq!(priced.coupon, CouponStatus::NotApplied);
    }

    #[test]
    fn test_small_cart_pays_per_unit_shipping() {
        let t = price(&[item("a", 200, 1)], None).totals;

        assert_eq!(t.inclusive_subtotal.rupees(), 200);
        assert_eq!(t.shipping.rupees(), 50);
        assert_eq!(t.total.rupees(), 250);
    }

    #[test]
    fn test_shipping_scales_with_quantity() {
        let t = price(&[item("a", 100, 3), item("b", 150, 2)], None).totals;

        assert_eq!(t.inclusive_subtotal.rupees(), 600);
        assert_eq!(t.shipping.rupees(), 250);
        assert_eq!(t.total.rupees(), 850);
    }

    #[test]
    fn test_threshold_is_strictly_greater() {
        let at = price(&[item("a", 1500, 1)], None).totals;
        assert_eq!(at.shipping.rupees(), 50);

        let above = price(&[item("a", 1501, 1)], None).totals;
        assert_eq!(above.shipping.rupees(), 0);
    }

    #[test]
    fn test_subtotal_plus_tax_is_inclusive() {
        for (p, q) in [(1, 1), (99, 7), (349, 3), (2499, 2), (1234, 5), (17, 99)] {
            let t = price(&[item("a", p, q)], None).totals;
            assert_eq!(t.subtotal + t.tax, t.inclusive_subtotal, "price {} qty {}", p, q);
        }
    }

    #[test]
    fn test_free_delivery_cancels_shipping() {
        let coupon = AppliedCoupon::free_delivery("FREESHIP");
        let priced = price(&[item("a", 200, 2)], Some(&coupon));

        assert!(priced.is_coupon_applied());
        assert_eq!(priced.totals.shipping.rupees(), 100);
        assert_eq!(priced.totals.discount, priced.totals.shipping);
        assert_eq!(priced.totals.total, priced.totals.inclusive_subtotal);
    }

    #[test]
    fn test_free_delivery_when_already_free() {
        let coupon = AppliedCoupon::free_delivery("FREESHIP");
        let priced = price(&[item("a", 2000, 1)], Some(&coupon));

        assert!(!priced.is_coupon_applied());
        assert!(priced.totals.discount.is_zero());
        assert_eq!(priced.totals.total.rupees(), 2000);
        assert_eq!(priced.coupon.message(), Some(FREE_DELIVERY_ALREADY_APPLIES));
        assert_eq!(priced.coupon.code(), Some("FREESHIP"));
    }

    #[test]
    fn test_flat_discount_never_drives_total_negative() {
        let coupon = AppliedCoupon::flat_discount("BIG", Money::from_rupees(10_000));
        let priced = price(&[item("a", 200, 1)], Some(&coupon));

        assert_eq!(priced.totals.discount.rupees(), 250);
        assert!(priced.totals.total.is_zero());
        assert!(priced.is_coupon_applied());
    }

    #[test]
    fn test_flat_discount_partial() {
        let coupon = AppliedCoupon::flat_discount("FLAT100", Money::from_rupees(100));
        let t = price(&[item("a", 2000, 1)], Some(&coupon)).totals;

        assert_eq!(t.discount.rupees(), 100);
        assert_eq!(t.total.rupees(), 1900);
    }

    #[test]
    fn test_exclusive_threshold_basis() {
        let config = PricingConfig {
            threshold_basis: ThresholdBasis::TaxExclusive,
            ..PricingConfig::default()
        };
        // 1600 inclusive → 1356 exclusive, below the 1500 threshold
        let t = price_cart(&[item("a", 1600, 1)], None, &config).unwrap().totals;
        assert_eq!(t.subtotal.rupees(), 1356);
        assert_eq!(t.shipping.rupees(), 50);

        let inclusive = price(&[item("a", 1600, 1)], None).totals;
        assert_eq!(inclusive.shipping.rupees(), 0);
    }

    #[test]
    fn test_custom_rates() {
        let config = PricingConfig {
            tax_rate: TaxRate::from_bps(1200),
            free_shipping_threshold: Money::from_rupees(999),
            per_unit_shipping: Money::from_rupees(40),
            threshold_basis: ThresholdBasis::TaxInclusive,
        };
        // 560 × 12 / 112 = 60
        let t = price_cart(&[item("a", 280, 2)], None, &config).unwrap().totals;
        assert_eq!(t.tax.rupees(), 60);
        assert_eq!(t.shipping.rupees(), 80);
        assert_eq!(t.total.rupees(), 640);
    }

    #[test]
    fn test_empty_cart_prices_to_zero() {
        let t = price(&[], None).totals;
        assert_eq!(t, OrderTotals::default());
    }

    #[test]
    fn test_rejects_bad_lines() {
        let config = PricingConfig::default();

        let zero_qty = price_cart(&[item("a", 100, 0)], None, &config);
        assert!(matches!(zero_qty, Err(CoreError::InvalidQuantity { .. })));

        let huge_qty = price_cart(&[item("a", 100, 100)], None, &config);
        assert!(matches!(huge_qty, Err(CoreError::QuantityTooLarge { .. })));

        let negative = price_cart(&[item("a", -1, 1)], None, &config);
        assert!(matches!(negative, Err(CoreError::NegativePrice { .. })));

        let too_many: Vec<_> = (0..=MAX_CART_ITEMS).map(|i| item(&i.to_string(), 10, 1)).collect();
        assert!(matches!(
            price_cart(&too_many, None, &config),
            Err(CoreError::CartTooLarge { .. })
        ));
    }

    #[test]
    fn test_rejects_price_that_would_overflow() {
        let config = PricingConfig::default();

        let huge = CartLineItem::new("a", "A", Money::from_rupees(i64::MAX / 2 + 1), 2);
        assert!(matches!(
            price_cart(&[huge], None, &config),
            Err(CoreError::PriceTooLarge { .. })
        ));

        let over = item("a", MAX_UNIT_PRICE + 1, 1);
        assert!(matches!(
            price_cart(&[over], None, &config),
            Err(CoreError::PriceTooLarge { .. })
        ));
    }

    #[test]
    fn test_most_expensive_full_cart_prices() {
        let items: Vec<_> = (0..MAX_CART_ITEMS)
            .map(|i| item(&i.to_string(), MAX_UNIT_PRICE, MAX_ITEM_QUANTITY))
            .collect();
        let t = price(&items, None).totals;

        let expected = MAX_UNIT_PRICE * MAX_ITEM_QUANTITY * MAX_CART_ITEMS as i64;
        assert_eq!(t.inclusive_subtotal.rupees(), expected);
        assert_eq!(t.total.rupees(), expected);
        assert_eq!(t.subtotal + t.tax, t.inclusive_subtotal);
    }

    #[test]
    fn test_threshold_basis_from_str() {
        assert_eq!("inclusive".parse::<ThresholdBasis>().unwrap(), ThresholdBasis::TaxInclusive);
        assert_eq!("Exclusive".parse::<ThresholdBasis>().unwrap(), ThresholdBasis::TaxExclusive);
        assert!("gross".parse::<ThresholdBasis>().is_err());
    }

    #[test]
    fn test_priced_cart_wire_format() {
        let coupon = AppliedCoupon::free_delivery("FREESHIP");
        let json = serde_json::to_value(price(&[item("a", 200, 1)], Some(&coupon))).unwrap();

        assert_eq!(json["totals"]["inclusiveSubtotal"], 200);
        assert_eq!(json["totals"]["discount"], 50);
        assert_eq!(json["coupon"]["status"], "applied");
        assert_eq!(json["coupon"]["code"], "FREESHIP");
    }
}

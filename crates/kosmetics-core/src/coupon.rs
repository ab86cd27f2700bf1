//! # Coupons
//!
//! Coupon codes are validated by an external collaborator; this module turns
//! its verdict into something the pricing engine can consume.
//!
//! ## Coupon Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Buyer types "FREESHIP"                                                 │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  normalize_code()  ── malformed ──► ValidationError (inline message)   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  coupon service: { valid, type, message }   (storefront-api)           │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  CouponValidation::resolve()                                           │
//! │       ├── Ok(AppliedCoupon)      ──► price_cart(.., Some(coupon), ..)  │
//! │       └── Err(CouponRejection)   ──► price_cart(.., None, ..)          │
//! │                                      + CouponStatus::Rejected           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::CoreResult;
use crate::money::Money;
use crate::pricing::{price_cart, CouponStatus, PricedCart, PricingConfig};
use crate::types::CartLineItem;
use crate::validation::{validate_coupon_code, ValidationResult};

/// Wire tag of the free delivery coupon type.
pub const FREE_DELIVERY: &str = "free_delivery";

/// Wire tag of the flat discount coupon type.
pub const FLAT_DISCOUNT: &str = "flat_discount";

const DEFAULT_REJECTION_MESSAGE: &str = "Invalid coupon code";

// =============================================================================
// Coupon Kind
// =============================================================================

/// What a coupon does once applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(tag = "type", rename_all = "snake_case")]
#[ts(export)]
pub enum CouponKind {
    /// Cancels the shipping charge.
    FreeDelivery,
    /// Takes a fixed rupee amount off the order.
    FlatDiscount { amount: Money },
}

/// A coupon that the collaborator has accepted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct AppliedCoupon {
    /// The code as the buyer typed it (trimmed, case preserved).
    pub code: String,
    #[serde(flatten)]
    pub kind: CouponKind,
}

impl AppliedCoupon {
    pub fn free_delivery(code: impl Into<String>) -> Self {
        AppliedCoupon {
            code: code.into(),
            kind: CouponKind::FreeDelivery,
        }
    }

    pub fn flat_discount(code: impl Into<String>, amount: Money) -> Self {
        AppliedCoupon {
            code: code.into(),
            kind: CouponKind::FlatDiscount { amount },
        }
    }
}

// =============================================================================
// Collaborator Verdict
// =============================================================================

/// Response of the coupon validation service.
///
/// ```json
/// { "valid": true, "type": "free_delivery", "message": "Free delivery applied" }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CouponValidation {
    pub valid: bool,
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub message: String,
    /// Rupee amount, only meaningful for flat discounts.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<i64>,
}

/// Why a coupon was not applied. The message is shown to the buyer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CouponRejection {
    pub code: String,
    pub message: String,
}

impl CouponRejection {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        CouponRejection {
            code: code.into(),
            message: message.into(),
        }
    }
}

impl CouponValidation {
    /// Converts the verdict for `code` into an applicable coupon.
    ///
    /// ## Rules
    /// - `valid == false` → rejected with the service's message
    /// - unknown `type` → rejected, the engine cannot price it
    /// - `flat_discount` without a positive `amount` → rejected
    ///
    /// ## Example
    /// ```rust
    /// use kosmetics_core::coupon::{CouponKind, CouponValidation};
    ///
    /// let verdict = CouponValidation {
    ///     valid: true,
    ///     kind: "free_delivery".to_string(),
    ///     message: String::new(),
    ///     amount: None,
    /// };
    /// let coupon = verdict.resolve("FREESHIP").unwrap();
    /// assert_eq!(coupon.kind, CouponKind::FreeDelivery);
    /// ```
    pub fn resolve(&self, code: &str) -> Result<AppliedCoupon, CouponRejection> {
        if !self.valid {
            let message = if self.message.trim().is_empty() {
                DEFAULT_REJECTION_MESSAGE
            } else {
                self.message.trim()
            };
            return Err(CouponRejection::new(code, message));
        }

        match self.kind.as_str() {
            FREE_DELIVERY => Ok(AppliedCoupon::free_delivery(code)),
            FLAT_DISCOUNT => match self.amount {
                Some(amount) if amount > 0 => {
                    Ok(AppliedCoupon::flat_discount(code, Money::from_rupees(amount)))
                }
                _ => Err(CouponRejection::new(code, "Coupon has no discount amount")),
            },
            other => Err(CouponRejection::new(
                code,
                format!("Unsupported coupon type: {}", other),
            )),
        }
    }
}

// =============================================================================
// Operations
// =============================================================================

/// Trims and checks a coupon code before it is sent to the collaborator.
///
/// Codes are case-sensitive, so the casing is left untouched.
pub fn normalize_code(raw: &str) -> ValidationResult<String> {
    let code = raw.trim();
    validate_coupon_code(code)?;
    Ok(code.to_string())
}

/// Prices the cart according to the collaborator's verdict on `code`.
///
/// A rejected coupon leaves the totals exactly as they would be without
/// any coupon; the rejection message travels in [`CouponStatus::Rejected`].
pub fn apply_coupon_verdict(
    items: &[CartLineItem],
    code: &str,
    verdict: &CouponValidation,
    config: &PricingConfig,
) -> CoreResult<PricedCart> {
    match verdict.resolve(code) {
        Ok(coupon) => price_cart(items, Some(&coupon), config),
        Err(rejection) => {
            let mut priced = price_cart(items, None, config)?;
            priced.coupon = CouponStatus::Rejected {
                code: rejection.code,
                message: rejection.message,
            };
            Ok(priced)
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn verdict(valid: bool, kind: &str, message: &str) -> CouponValidation {
        CouponValidation {
            valid,
            kind: kind.to_string(),
            message: message.to_string(),
            amount: None,
        }
    }

    fn small_cart() -> Vec<CartLineItem> {
        vec![CartLineItem::new("toner", "Rose Toner", Money::from_rupees(200), 1)]
    }

    #[test]
    fn test_resolve_free_delivery() {
        let coupon = verdict(true, "free_delivery", "ok").resolve("FREESHIP").unwrap();
        assert_eq!(coupon, AppliedCoupon::free_delivery("FREESHIP"));
    }

    #[test]
    fn test_resolve_invalid_uses_service_message() {
        let err = verdict(false, "", "Coupon expired").resolve("OLD10").unwrap_err();
        assert_eq!(err.message, "Coupon expired");
        assert_eq!(err.code, "OLD10");
    }

    #[test]
    fn test_resolve_invalid_without_message() {
        let err = verdict(false, "", "  ").resolve("NOPE").unwrap_err();
        assert_eq!(err.message, "Invalid coupon code");
    }

    #[test]
    fn test_resolve_unknown_type() {
        let err = verdict(true, "bogo", "").resolve("BOGO").unwrap_err();
        assert_eq!(err.message, "Unsupported coupon type: bogo");
    }

    #[test]
    fn test_resolve_flat_discount_requires_amount() {
        let mut v = verdict(true, "flat_discount", "");
        assert!(v.resolve("FLAT").is_err());

        v.amount = Some(100);
        let coupon = v.resolve("FLAT").unwrap();
        assert_eq!(coupon, AppliedCoupon::flat_discount("FLAT", Money::from_rupees(100)));
    }

    #[test]
    fn test_normalize_code_trims_and_keeps_case() {
        assert_eq!(normalize_code("  FreeShip ").unwrap(), "FreeShip");
        assert!(normalize_code("   ").is_err());
        assert!(normalize_code("FREE SHIP").is_err());
    }

    #[test]
    fn test_apply_rejected_verdict_leaves_totals_unchanged() {
        let config = PricingConfig::default();
        let plain = price_cart(&small_cart(), None, &config).unwrap();
        let priced = apply_coupon_verdict(
            &small_cart(),
            "NOPE",
            &verdict(false, "", "Invalid coupon code"),
            &config,
        )
        .unwrap();

        assert_eq!(priced.totals, plain.totals);
        assert!(!priced.is_coupon_applied());
        assert_eq!(priced.coupon.message(), Some("Invalid coupon code"));
    }

    #[test]
    fn test_apply_accepted_verdict() {
        let priced = apply_coupon_verdict(
            &small_cart(),
            "FREESHIP",
            &verdict(true, "free_delivery", ""),
            &PricingConfig::default(),
        )
        .unwrap();

        assert!(priced.is_coupon_applied());
        assert_eq!(priced.totals.discount.rupees(), 50);
        assert_eq!(priced.totals.total.rupees(), 200);
    }

    #[test]
    fn test_applied_coupon_wire_format() {
        let json = serde_json::to_value(AppliedCoupon::free_delivery("FREESHIP")).unwrap();
        assert_eq!(json["code"], "FREESHIP");
        assert_eq!(json["type"], "free_delivery");

        let flat: AppliedCoupon =
            serde_json::from_str(r#"{"code":"FLAT100","type":"flat_discount","amount":100}"#)
                .unwrap();
        assert_eq!(flat.kind, CouponKind::FlatDiscount { amount: Money::from_rupees(100) });
    }
}

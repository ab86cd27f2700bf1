//! # Validation Module
//!
//! Field and form validation for the storefront.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: SPA forms (TypeScript)                                       │
//! │  └── Immediate inline feedback                                         │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: storefront-api (Rust)                                        │
//! │  ├── Type validation (deserialization)                                 │
//! │  └── THIS MODULE: field rules, re-checked server side                  │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: order store / coupon service (external)                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use kosmetics_core::validation::{validate_email, validate_otp};
//!
//! assert!(validate_email("asha@example.com").is_ok());
//! assert!(validate_otp("123456").is_ok());
//! assert!(validate_otp("12a456").is_err());
//! ```

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::money::Money;
use crate::types::{ContactMessage, Customer, ShippingAddress};
use crate::{MAX_CART_ITEMS, MAX_ITEM_QUANTITY, MAX_UNIT_PRICE};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

const MAX_EMAIL_LEN: usize = 254;
const MAX_NAME_LEN: usize = 100;
const MAX_COUPON_LEN: usize = 32;
const MAX_TRACKING_LEN: usize = 64;
const MAX_NOTES_LEN: usize = 1000;
const MIN_MESSAGE_LEN: usize = 10;
const MAX_MESSAGE_LEN: usize = 2000;

/// Length of the one-time passwords we email.
pub const OTP_LENGTH: usize = 6;

fn require<'a>(field: &str, value: &'a str) -> ValidationResult<&'a str> {
    let value = value.trim();
    if value.is_empty() {
        return Err(ValidationError::required(field));
    }
    Ok(value)
}

fn max_len(field: &str, value: &str, max: usize) -> ValidationResult<()> {
    if value.chars().count() > max {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max,
        });
    }
    Ok(())
}

fn exact_digits(value: &str, len: usize) -> bool {
    value.len() == len && value.chars().all(|c| c.is_ascii_digit())
}

// =============================================================================
// Contact Details
// =============================================================================

/// Validates an email address.
///
/// ## Rules
/// - required, at most 254 characters
/// - exactly one `@` with a non-empty local part
/// - domain contains a dot, does not start or end with one
/// - no whitespace
pub fn validate_email(email: &str) -> ValidationResult<()> {
    let email = require("email", email)?;
    max_len("email", email, MAX_EMAIL_LEN)?;

    if email.chars().any(char::is_whitespace) {
        return Err(ValidationError::invalid_format("email", "must not contain spaces"));
    }

    let mut parts = email.split('@');
    let (local, domain) = match (parts.next(), parts.next(), parts.next()) {
        (Some(local), Some(domain), None) => (local, domain),
        _ => return Err(ValidationError::invalid_format("email", "must contain a single @")),
    };

    if local.is_empty()
        || !domain.contains('.')
        || domain.starts_with('.')
        || domain.ends_with('.')
    {
        return Err(ValidationError::invalid_format("email", "is not a valid address"));
    }

    Ok(())
}

/// Validates a person's name (customer or contact form).
pub fn validate_name(name: &str) -> ValidationResult<()> {
    let name = require("name", name)?;
    if name.chars().count() < 2 {
        return Err(ValidationError::TooShort {
            field: "name".to_string(),
            min: 2,
        });
    }
    max_len("name", name, MAX_NAME_LEN)
}

/// Validates an Indian mobile number: ten digits, optionally prefixed by
/// `+91`. Spaces and hyphens are ignored.
pub fn validate_phone(phone: &str) -> ValidationResult<()> {
    let digits: String = require("phone", phone)?
        .chars()
        .filter(|c| *c != ' ' && *c != '-')
        .collect();
    let national = digits.strip_prefix("+91").unwrap_or(&digits);

    if !exact_digits(national, 10) {
        return Err(ValidationError::invalid_format("phone", "must be a 10 digit mobile number"));
    }
    Ok(())
}

/// Validates a six-digit PIN code.
pub fn validate_pin_code(pin: &str) -> ValidationResult<()> {
    let pin = require("pin_code", pin)?;
    if !exact_digits(pin, 6) || pin.starts_with('0') {
        return Err(ValidationError::invalid_format("pin_code", "must be 6 digits"));
    }
    Ok(())
}

/// Validates a one-time password.
pub fn validate_otp(code: &str) -> ValidationResult<()> {
    let code = require("otp", code)?;
    if !exact_digits(code, OTP_LENGTH) {
        return Err(ValidationError::invalid_format("otp", "must be 6 digits"));
    }
    Ok(())
}

/// Validates the buyer block of a checkout.
pub fn validate_customer(customer: &Customer) -> ValidationResult<()> {
    validate_name(&customer.name)?;
    validate_email(&customer.email)?;
    if let Some(phone) = &customer.phone {
        validate_phone(phone)?;
    }
    Ok(())
}

/// Validates a delivery address.
pub fn validate_address(address: &ShippingAddress) -> ValidationResult<()> {
    let line1 = require("line1", &address.line1)?;
    max_len("line1", line1, 200)?;
    if let Some(line2) = &address.line2 {
        max_len("line2", line2.trim(), 200)?;
    }
    max_len("city", require("city", &address.city)?, MAX_NAME_LEN)?;
    max_len("state", require("state", &address.state)?, MAX_NAME_LEN)?;
    validate_pin_code(&address.pin_code)
}

/// Validates a contact-page submission.
///
/// ## Rules
/// - name and email as elsewhere
/// - message between 10 and 2000 characters
pub fn validate_contact_message(contact: &ContactMessage) -> ValidationResult<()> {
    validate_name(&contact.name)?;
    validate_email(&contact.email)?;

    let message = require("message", &contact.message)?;
    if message.chars().count() < MIN_MESSAGE_LEN {
        return Err(ValidationError::TooShort {
            field: "message".to_string(),
            min: MIN_MESSAGE_LEN,
        });
    }
    max_len("message", message, MAX_MESSAGE_LEN)
}

// =============================================================================
// Coupons & Orders
// =============================================================================

/// Validates a coupon code as typed by the buyer (already trimmed).
///
/// ## Rules
/// - required, at most 32 characters
/// - letters, digits, hyphens and underscores only
pub fn validate_coupon_code(code: &str) -> ValidationResult<()> {
    let code = require("code", code)?;
    max_len("code", code, MAX_COUPON_LEN)?;

    if !code
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
        return Err(ValidationError::invalid_format(
            "code",
            "must contain only letters, numbers, hyphens, and underscores",
        ));
    }
    Ok(())
}

/// Validates a courier tracking id.
pub fn validate_tracking_id(tracking_id: &str) -> ValidationResult<()> {
    let tracking_id = require("tracking_id", tracking_id)?;
    max_len("tracking_id", tracking_id, MAX_TRACKING_LEN)?;

    if !tracking_id
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-')
    {
        return Err(ValidationError::invalid_format(
            "tracking_id",
            "must contain only letters, numbers, and hyphens",
        ));
    }
    Ok(())
}

/// Validates free-text admin notes.
pub fn validate_admin_notes(notes: &str) -> ValidationResult<()> {
    max_len("admin_notes", notes, MAX_NOTES_LEN)
}

// =============================================================================
// Cart Validators
// =============================================================================

/// Validates the number of distinct lines in a cart.
///
/// ## Rules
/// - Must not exceed [`MAX_CART_ITEMS`]
pub fn validate_cart_size(line_count: usize) -> CoreResult<()> {
    if line_count > MAX_CART_ITEMS {
        return Err(CoreError::CartTooLarge {
            max: MAX_CART_ITEMS,
        });
    }

    Ok(())
}

/// Validates the quantity on one cart line.
///
/// ## Rules
/// - At least 1
/// - At most [`MAX_ITEM_QUANTITY`]
pub fn validate_quantity(product_id: &str, quantity: i64) -> CoreResult<()> {
    if quantity < 1 {
        return Err(CoreError::InvalidQuantity {
            product_id: product_id.to_string(),
            quantity,
        });
    }
    if quantity > MAX_ITEM_QUANTITY {
        return Err(CoreError::QuantityTooLarge {
            requested: quantity,
            max: MAX_ITEM_QUANTITY,
        });
    }

    Ok(())
}

/// Validates the unit price on one cart line.
///
/// ## Rules
/// - Zero is allowed (free samples)
/// - Never negative
/// - At most [`MAX_UNIT_PRICE`] rupees
///
/// ## Example
/// ```rust
/// use kosmetics_core::money::Money;
/// use kosmetics_core::validation::validate_unit_price;
///
/// assert!(validate_unit_price("kajal", Money::from_rupees(200)).is_ok());
/// assert!(validate_unit_price("kajal", Money::from_rupees(-1)).is_err());
/// assert!(validate_unit_price("kajal", Money::from_rupees(i64::MAX)).is_err());
/// ```
pub fn validate_unit_price(product_id: &str, unit_price: Money) -> CoreResult<()> {
    if unit_price.is_negative() {
        return Err(CoreError::NegativePrice {
            product_id: product_id.to_string(),
        });
    }
    if unit_price.rupees() > MAX_UNIT_PRICE {
        return Err(CoreError::PriceTooLarge {
            product_id: product_id.to_string(),
            max: MAX_UNIT_PRICE,
        });
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

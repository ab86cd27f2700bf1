//! # Email Templates
//!
//! Every template returns a [`RenderedEmail`] with an HTML body and a
//! plain-text alternative. Values that came from a buyer (names, product
//! names, addresses, messages) go through [`escape_html`] before landing in
//! the HTML body.

use std::fmt::Write;

use kosmetics_core::{ContactMessage, Order};

use crate::message::RenderedEmail;

const BRAND: &str = "Kumar Kosmetics";
const ACCENT: &str = "#b0306a";

/// Escapes the five HTML-significant characters.
pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            other => out.push(other),
        }
    }
    out
}

fn greeting(name: Option<&str>) -> String {
    match name.map(str::trim).filter(|n| !n.is_empty()) {
        Some(name) => format!("Hi {},", name),
        None => "Hi there,".to_string(),
    }
}

/// Shared page chrome around a template body.
fn layout(title: &str, body: &str) -> String {
    format!(
        r##"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{title}</title>
</head>
<body style="margin: 0; padding: 0; font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, Arial, sans-serif; background-color: #fdf6f9; color: #2b2b2b;">
    <table role="presentation" style="width: 100%; border-collapse: collapse;">
        <tr>
            <td style="padding: 32px 16px;">
                <table role="presentation" style="max-width: 600px; margin: 0 auto; background: #ffffff; border-radius: 12px; border: 1px solid #f0dbe5;">
                    <tr>
                        <td style="padding: 28px 32px; text-align: center; border-bottom: 1px solid #f0dbe5;">
                            <span style="font-size: 22px; font-weight: 700; color: {accent};">{brand}</span>
                        </td>
                    </tr>
                    <tr>
                        <td style="padding: 32px;">
{body}
                        </td>
                    </tr>
                    <tr>
                        <td style="padding: 20px 32px; text-align: center; font-size: 12px; color: #8a8a8a; border-top: 1px solid #f0dbe5;">
                            &copy; {brand}. You received this email because of activity on your account.
                        </td>
                    </tr>
                </table>
            </td>
        </tr>
    </table>
</body>
</html>"##,
        title = escape_html(title),
        accent = ACCENT,
        brand = BRAND,
        body = body,
    )
}

fn button(href: &str, label: &str) -> String {
    format!(
        r#"<div style="text-align: center; margin: 28px 0;"><a href="{href}" style="display: inline-block; background: {accent}; color: #ffffff; text-decoration: none; font-weight: 600; padding: 14px 28px; border-radius: 8px;">{label}</a></div>"#,
        href = escape_html(href),
        accent = ACCENT,
        label = escape_html(label),
    )
}

// =============================================================================
// Order Confirmation
// =============================================================================

/// Confirmation mail sent right after an order is placed.
pub fn order_confirmation(order: &Order, storefront_url: &str) -> RenderedEmail {
    let reference = order.reference();
    let totals = &order.totals;
    let order_url = format!("{}/orders/{}", storefront_url.trim_end_matches('/'), order.id);

    let mut rows = String::new();
    let mut text_lines = String::new();
    for line in &order.items {
        let _ = write!(
            rows,
            r#"<tr><td style="padding: 8px 0;">{name}</td><td style="padding: 8px 0; text-align: center;">× {qty}</td><td style="padding: 8px 0; text-align: right;">{total}</td></tr>"#,
            name = escape_html(&line.name),
            qty = line.quantity,
            total = line.line_total,
        );
        let _ = writeln!(text_lines, "  {} x{}  {}", line.name, line.quantity, line.line_total);
    }

    let shipping = if totals.shipping.is_zero() {
        "Free".to_string()
    } else {
        totals.shipping.to_string()
    };

    let discount_row = if totals.discount.is_positive() {
        format!(
            r#"<tr><td colspan="2" style="padding: 4px 0;">Discount{code}</td><td style="padding: 4px 0; text-align: right;">-{amount}</td></tr>"#,
            code = order
                .coupon_code
                .as_deref()
                .map(|c| format!(" ({})", escape_html(c)))
                .unwrap_or_default(),
            amount = totals.discount,
        )
    } else {
        String::new()
    };

    let address = &order.shipping_address;
    let address_html = [
        Some(address.line1.as_str()),
        address.line2.as_deref(),
        Some(address.city.as_str()),
        Some(address.state.as_str()),
        Some(address.pin_code.as_str()),
    ]
    .into_iter()
    .flatten()
    .map(escape_html)
    .collect::<Vec<_>>()
    .join(", ");

    let body = format!(
        r#"                            <p style="margin: 0 0 16px; font-size: 16px;">{greeting}</p>
                            <p style="margin: 0 0 24px; font-size: 16px; line-height: 1.6;">Thank you for shopping with us! Your order <strong>{reference}</strong> has been placed and is now <strong>{status}</strong>.</p>
                            <table role="presentation" style="width: 100%; border-collapse: collapse; font-size: 14px;">
                                {rows}
                                <tr><td colspan="3" style="border-top: 1px solid #f0dbe5; padding-top: 8px;"></td></tr>
                                <tr><td colspan="2" style="padding: 4px 0;">Items (incl. GST {tax})</td><td style="padding: 4px 0; text-align: right;">{inclusive}</td></tr>
                                <tr><td colspan="2" style="padding: 4px 0;">Shipping</td><td style="padding: 4px 0; text-align: right;">{shipping}</td></tr>
                                {discount_row}
                                <tr><td colspan="2" style="padding: 8px 0; font-weight: 700;">Total</td><td style="padding: 8px 0; text-align: right; font-weight: 700;">{total}</td></tr>
                            </table>
                            <p style="margin: 24px 0 0; font-size: 14px; color: #5a5a5a;">Delivering to: {address}</p>
                            {button}"#,
        greeting = escape_html(&greeting(Some(&order.customer.name))),
        reference = reference,
        status = order.status.label(),
        rows = rows,
        tax = totals.tax,
        inclusive = totals.inclusive_subtotal,
        shipping = shipping,
        discount_row = discount_row,
        total = totals.total,
        address = address_html,
        button = button(&order_url, "View your order"),
    );

    let mut text = format!(
        "{}\n\nThank you for shopping with {}! Your order {} has been placed.\n\n{}\n",
        greeting(Some(&order.customer.name)),
        BRAND,
        reference,
        text_lines,
    );
    let _ = writeln!(text, "Items (incl. GST {}): {}", totals.tax, totals.inclusive_subtotal);
    let _ = writeln!(text, "Shipping: {}", shipping);
    if totals.discount.is_positive() {
        let _ = writeln!(text, "Discount: -{}", totals.discount);
    }
    let _ = writeln!(text, "Total: {}\n\nTrack your order: {}", totals.total, order_url);

    RenderedEmail {
        subject: format!("Your {} order {} is confirmed", BRAND, reference),
        html: layout("Order confirmed", &body),
        text,
    }
}

// =============================================================================
// OTP
// =============================================================================

/// One-time password for email verification or login.
pub fn otp(name: Option<&str>, code: &str, ttl_minutes: u32) -> RenderedEmail {
    let body = format!(
        r#"                            <p style="margin: 0 0 16px; font-size: 16px;">{greeting}</p>
                            <p style="margin: 0 0 24px; font-size: 16px; line-height: 1.6;">Use the code below to verify your email address. It expires in {ttl} minutes.</p>
                            <div style="text-align: center; margin: 28px 0;"><span style="display: inline-block; font-size: 32px; letter-spacing: 8px; font-weight: 700; color: {accent}; background: #fdf0f5; padding: 14px 24px; border-radius: 8px;">{code}</span></div>
                            <p style="margin: 0; font-size: 14px; color: #5a5a5a;">If you did not request this code, you can safely ignore this email.</p>"#,
        greeting = escape_html(&greeting(name)),
        ttl = ttl_minutes,
        accent = ACCENT,
        code = escape_html(code),
    );

    RenderedEmail {
        subject: format!("{} is your {} verification code", code, BRAND),
        html: layout("Your verification code", &body),
        text: format!(
            "{}\n\nYour {} verification code is {}. It expires in {} minutes.\n\nIf you did not request this code, ignore this email.\n",
            greeting(name),
            BRAND,
            code,
            ttl_minutes,
        ),
    }
}

// =============================================================================
// Password Reset
// =============================================================================

/// Password reset link.
pub fn password_reset(name: Option<&str>, reset_url: &str, ttl_minutes: u32) -> RenderedEmail {
    let body = format!(
        r#"                            <p style="margin: 0 0 16px; font-size: 16px;">{greeting}</p>
                            <p style="margin: 0 0 8px; font-size: 16px; line-height: 1.6;">We received a request to reset your password. The link below is valid for {ttl} minutes.</p>
                            {button}
                            <p style="margin: 0; font-size: 14px; color: #5a5a5a;">If you did not ask for a reset, your password stays unchanged and you can ignore this email.</p>"#,
        greeting = escape_html(&greeting(name)),
        ttl = ttl_minutes,
        button = button(reset_url, "Reset password"),
    );

    RenderedEmail {
        subject: format!("Reset your {} password", BRAND),
        html: layout("Reset your password", &body),
        text: format!(
            "{}\n\nReset your password within {} minutes using this link:\n{}\n\nIf you did not ask for a reset, ignore this email.\n",
            greeting(name),
            ttl_minutes,
            reset_url,
        ),
    }
}

// =============================================================================
// Contact Form
// =============================================================================

/// Contact-page submission forwarded to the store inbox.
pub fn contact_forward(contact: &ContactMessage) -> RenderedEmail {
    let message_html = escape_html(contact.message.trim()).replace('\n', "<br>");
    let body = format!(
        r#"                            <p style="margin: 0 0 16px; font-size: 16px;">New message from the contact page.</p>
                            <p style="margin: 0 0 8px; font-size: 14px;"><strong>From:</strong> {name} &lt;{email}&gt;</p>
                            <div style="margin-top: 16px; padding: 16px; background: #fdf0f5; border-radius: 8px; font-size: 14px; line-height: 1.6;">{message}</div>"#,
        name = escape_html(contact.name.trim()),
        email = escape_html(contact.email.trim()),
        message = message_html,
    );

    RenderedEmail {
        subject: format!("Contact form: {}", contact.name.trim()),
        html: layout("Contact form message", &body),
        text: format!(
            "From: {} <{}>\n\n{}\n",
            contact.name.trim(),
            contact.email.trim(),
            contact.message.trim()
        ),
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use kosmetics_core::pricing::{price_cart, PricingConfig};
    use kosmetics_core::{AppliedCoupon, CartLineItem, Customer, Money, NewOrder, ShippingAddress};

    fn order(coupon: Option<AppliedCoupon>) -> Order {
        let new_order = NewOrder {
            customer: Customer {
                name: "Asha <Kumar>".to_string(),
                email: "asha@example.com".to_string(),
                phone: None,
            },
            shipping_address: ShippingAddress {
                line1: "12 MG Road".to_string(),
                line2: None,
                city: "Pune".to_string(),
                state: "Maharashtra".to_string(),
                pin_code: "411001".to_string(),
            },
            items: vec![CartLineItem::new("kajal", "Kohl & Kajal", Money::from_rupees(200), 1)],
            coupon_code: None,
        };
        let priced = price_cart(&new_order.items, coupon.as_ref(), &PricingConfig::default()).unwrap();
        Order::place(new_order, &priced, Utc::now()).unwrap()
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(
            escape_html(r#"<a href="x">Tom & 'Jerry'</a>"#),
            "&lt;a href=&quot;x&quot;&gt;Tom &amp; &#39;Jerry&#39;&lt;/a&gt;"
        );
    }

    #[test]
    fn test_order_confirmation_contents() {
        let order = order(None);
        let mail = order_confirmation(&order, "https://kumarkosmetics.in/");

        assert!(mail.subject.contains(&order.reference()));
        assert!(mail.html.contains("Kohl &amp; Kajal"));
        assert!(mail.html.contains("Asha &lt;Kumar&gt;"));
        assert!(!mail.html.contains("Asha <Kumar>"));
        assert!(mail.html.contains("₹250"));
        assert!(mail.html.contains(&format!("https://kumarkosmetics.in/orders/{}", order.id)));
        assert!(mail.text.contains("Shipping: ₹50"));
        assert!(mail.text.contains("Total: ₹250"));
        assert!(!mail.text.contains("Discount"));
    }

    #[test]
    fn test_order_confirmation_with_coupon() {
        let order = order(Some(AppliedCoupon::free_delivery("FREESHIP")));
        let mail = order_confirmation(&order, "https://kumarkosmetics.in");

        assert!(mail.html.contains("Discount (FREESHIP)"));
        assert!(mail.text.contains("Discount: -₹50"));
        assert!(mail.text.contains("Total: ₹200"));
    }

    #[test]
    fn test_otp_template() {
        let mail = otp(Some("Asha"), "482913", 10);
        assert_eq!(mail.subject, "482913 is your Kumar Kosmetics verification code");
        assert!(mail.html.contains("482913"));
        assert!(mail.text.contains("expires in 10 minutes"));
        assert!(mail.text.starts_with("Hi Asha,"));
    }

    #[test]
    fn test_password_reset_template() {
        let mail = password_reset(None, "https://kumarkosmetics.in/reset?token=a&b", 30);
        assert!(mail.html.contains("token=a&amp;b"));
        assert!(mail.text.contains("token=a&b"));
        assert!(mail.text.starts_with("Hi there,"));
    }

    #[test]
    fn test_contact_forward_keeps_line_breaks() {
        let mail = contact_forward(&ContactMessage {
            name: "Ravi".to_string(),
            email: "ravi@example.com".to_string(),
            message: "Line one\n<b>Line two</b>".to_string(),
        });
        assert!(mail.html.contains("Line one<br>&lt;b&gt;Line two&lt;/b&gt;"));
        assert_eq!(mail.subject, "Contact form: Ravi");
    }
}

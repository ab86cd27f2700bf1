//! Storefront API configuration module.
//!
//! Configuration is loaded from environment variables with fallback to defaults.
//!
//! | Variable                  | Default                             |
//! |---------------------------|-------------------------------------|
//! | `HTTP_PORT`               | `8080`                              |
//! | `COUPON_SERVICE_URL`      | `http://localhost:4001/api/coupons` |
//! | `ORDER_SERVICE_URL`       | `http://localhost:4002/api/orders`  |
//! | `UPSTREAM_TIMEOUT_SECS`   | `10`                                |
//! | `MAIL_RELAY_URL`          | `https://api.brevo.com/v3/smtp/email` |
//! | `MAIL_API_KEY`            | required                            |
//! | `MAIL_FROM_EMAIL`         | `orders@kumarkosmetics.in`          |
//! | `MAIL_FROM_NAME`          | `Kumar Kosmetics`                   |
//! | `STORE_INBOX_EMAIL`       | `hello@kumarkosmetics.in`           |
//! | `STOREFRONT_URL`          | `http://localhost:3000`             |
//! | `TAX_RATE_BPS`            | `1800`                              |
//! | `FREE_SHIPPING_THRESHOLD` | `1500`                              |
//! | `PER_UNIT_SHIPPING`       | `50`                                |
//! | `FREE_SHIPPING_BASIS`     | `inclusive`                         |

use std::env;
use std::str::FromStr;
use std::time::Duration;

use kosmetics_core::{
    Money, PricingConfig, TaxRate, ThresholdBasis, DEFAULT_FREE_SHIPPING_THRESHOLD,
    DEFAULT_PER_UNIT_SHIPPING, DEFAULT_TAX_RATE_BPS, MAX_UNIT_PRICE,
};
use kosmetics_mail::{MailerConfig, RelayConfig};
use url::Url;

/// Storefront API configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// HTTP server port
    pub http_port: u16,

    /// Base URL of the coupon validation service
    pub coupon_service_url: Url,

    /// Base URL of the order store
    pub order_service_url: Url,

    /// Request timeout for collaborator calls
    pub upstream_timeout: Duration,

    /// Transactional mail relay endpoint
    pub mail_relay_url: Url,

    /// Relay API key
    pub mail_api_key: String,

    pub mail_from_email: String,
    pub mail_from_name: String,

    /// Inbox that receives contact-form messages
    pub store_inbox_email: String,

    /// Public storefront URL, used for links in emails
    pub storefront_url: Url,

    /// Tax, shipping and threshold settings for the pricing engine
    pub pricing: PricingConfig,
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Load configuration from any variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let vars = Vars(lookup);

        let timeout_secs: u64 = vars.parse("UPSTREAM_TIMEOUT_SECS", 10)?;
        if timeout_secs == 0 {
            return Err(ConfigError::InvalidValue("UPSTREAM_TIMEOUT_SECS".to_string()));
        }

        let config = StorefrontConfig {
            http_port: vars.parse("HTTP_PORT", 8080)?,
            coupon_service_url: vars.url("COUPON_SERVICE_URL", "http://localhost:4001/api/coupons")?,
            order_service_url: vars.url("ORDER_SERVICE_URL", "http://localhost:4002/api/orders")?,
            upstream_timeout: Duration::from_secs(timeout_secs),
            mail_relay_url: vars.url("MAIL_RELAY_URL", "https://api.brevo.com/v3/smtp/email")?,
            mail_api_key: vars
                .get("MAIL_API_KEY")
                .ok_or_else(|| ConfigError::MissingRequired("MAIL_API_KEY".to_string()))?,
            mail_from_email: vars.string("MAIL_FROM_EMAIL", "orders@kumarkosmetics.in"),
            mail_from_name: vars.string("MAIL_FROM_NAME", "Kumar Kosmetics"),
            store_inbox_email: vars.string("STORE_INBOX_EMAIL", "hello@kumarkosmetics.in"),
            storefront_url: vars.url("STOREFRONT_URL", "http://localhost:3000")?,
            pricing: PricingConfig {
                tax_rate: TaxRate::from_bps(vars.parse("TAX_RATE_BPS", DEFAULT_TAX_RATE_BPS)?),
                free_shipping_threshold: Money::from_rupees(
                    vars.parse("FREE_SHIPPING_THRESHOLD", DEFAULT_FREE_SHIPPING_THRESHOLD)?,
                ),
                per_unit_shipping: Money::from_rupees(
                    vars.parse("PER_UNIT_SHIPPING", DEFAULT_PER_UNIT_SHIPPING)?,
                ),
                threshold_basis: vars.parse("FREE_SHIPPING_BASIS", ThresholdBasis::default())?,
            },
        };

        // Money settings stay non-negative; per-unit shipping is capped like a unit price
        if config.pricing.free_shipping_threshold.is_negative() {
            return Err(ConfigError::InvalidValue("FREE_SHIPPING_THRESHOLD".to_string()));
        }
        let per_unit = config.pricing.per_unit_shipping;
        if per_unit.is_negative() || per_unit.rupees() > MAX_UNIT_PRICE {
            return Err(ConfigError::InvalidValue("PER_UNIT_SHIPPING".to_string()));
        }

        Ok(config)
    }

    /// Address the HTTP server binds to.
    pub fn bind_address(&self) -> String {
        format!("0.0.0.0:{}", self.http_port)
    }

    /// Settings for the mail relay client.
    pub fn relay_config(&self) -> RelayConfig {
        RelayConfig {
            url: self.mail_relay_url.to_string(),
            api_key: self.mail_api_key.clone(),
            from_email: self.mail_from_email.clone(),
            from_name: self.mail_from_name.clone(),
            timeout: self.upstream_timeout,
        }
    }

    /// Settings for the mailer.
    pub fn mailer_config(&self) -> MailerConfig {
        MailerConfig {
            storefront_url: self.storefront_url.as_str().trim_end_matches('/').to_string(),
            store_inbox: self.store_inbox_email.clone(),
            ..MailerConfig::default()
        }
    }
}

/// Reads variables through a lookup, treating blank values as unset.
struct Vars<F>(F);

impl<F: Fn(&str) -> Option<String>> Vars<F> {
    fn get(&self, name: &str) -> Option<String> {
        (self.0)(name)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }

    fn string(&self, name: &str, default: &str) -> String {
        self.get(name).unwrap_or_else(|| default.to_string())
    }

    fn parse<T: FromStr>(&self, name: &str, default: T) -> Result<T, ConfigError> {
        match self.get(name) {
            Some(raw) => raw
                .parse()
                .map_err(|_| ConfigError::InvalidValue(name.to_string())),
            None => Ok(default),
        }
    }

    fn url(&self, name: &str, default: &str) -> Result<Url, ConfigError> {
        let url = Url::parse(&self.string(name, default))
            .map_err(|_| ConfigError::InvalidValue(name.to_string()))?;
        match url.scheme() {
            "http" | "https" => Ok(url),
            _ => Err(ConfigError::InvalidValue(name.to_string())),
        }
    }
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}")]
    InvalidValue(String),

    #[error("Missing required configuration: {0}")]
    MissingRequired(String),
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(pairs: &[(&str, &str)]) -> Result<StorefrontConfig, ConfigError> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        StorefrontConfig::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = load(&[("MAIL_API_KEY", "key")]).unwrap();
        assert_eq!(config.http_port, 8080);
        assert_eq!(config.upstream_timeout, Duration::from_secs(10));
        assert_eq!(config.pricing, PricingConfig::default());
        assert_eq!(config.bind_address(), "0.0.0.0:8080");
    }

    #[test]
    fn test_api_key_required() {
        assert!(matches!(load(&[]), Err(ConfigError::MissingRequired(_))));
        assert!(matches!(
            load(&[("MAIL_API_KEY", "   ")]),
            Err(ConfigError::MissingRequired(_))
        ));
    }

    #[test]
    fn test_pricing_overrides() {
        let config = load(&[
            ("MAIL_API_KEY", "key"),
            ("TAX_RATE_BPS", "1200"),
            ("FREE_SHIPPING_THRESHOLD", "999"),
            ("PER_UNIT_SHIPPING", "40"),
            ("FREE_SHIPPING_BASIS", "exclusive"),
        ])
        .unwrap();

        assert_eq!(config.pricing.tax_rate.bps(), 1200);
        assert_eq!(config.pricing.free_shipping_threshold.rupees(), 999);
        assert_eq!(config.pricing.per_unit_shipping.rupees(), 40);
        assert_eq!(config.pricing.threshold_basis, ThresholdBasis::TaxExclusive);
    }

    #[test]
    fn test_invalid_values() {
        for (name, value) in [
            ("HTTP_PORT", "eighty"),
            ("UPSTREAM_TIMEOUT_SECS", "0"),
            ("COUPON_SERVICE_URL", "not a url"),
            ("ORDER_SERVICE_URL", "ftp://orders.internal"),
            ("FREE_SHIPPING_BASIS", "sometimes"),
            ("PER_UNIT_SHIPPING", "-5"),
            ("PER_UNIT_SHIPPING", "9223372036854775807"),
        ] {
            let result = load(&[("MAIL_API_KEY", "key"), (name, value)]);
            match result {
                Err(ConfigError::InvalidValue(var)) => assert_eq!(var, name),
                other => panic!("{} = {} should be invalid, got {:?}", name, value, other),
            }
        }
    }

    #[test]
    fn test_mailer_config_strips_trailing_slash() {
        let config = load(&[
            ("MAIL_API_KEY", "key"),
            ("STOREFRONT_URL", "https://kumarkosmetics.in/"),
        ])
        .unwrap();
        assert_eq!(config.mailer_config().storefront_url, "https://kumarkosmetics.in");
        assert_eq!(config.relay_config().api_key, "key");
    }
}

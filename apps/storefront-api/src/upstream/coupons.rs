//! Coupon validation collaborator.

use std::sync::Arc;
use std::time::Duration;

use kosmetics_core::CouponValidation;
use serde::Serialize;
use tracing::debug;
use url::Url;

use super::{endpoint, http_client, read_json, unreachable, UpstreamResult};

const SERVICE: &str = "coupon service";

/// Asks the coupon service whether a code may be used.
#[async_trait::async_trait]
pub trait CouponLookup: Send + Sync {
    async fn validate(&self, code: &str) -> UpstreamResult<CouponValidation>;
}

pub type DynCouponLookup = Arc<dyn CouponLookup>;

#[derive(Serialize)]
struct ValidateRequest<'a> {
    code: &'a str,
}

/// `POST {base}/validate` with `{ "code": "..." }`.
#[derive(Debug, Clone)]
pub struct HttpCouponLookup {
    http: reqwest::Client,
    validate_url: Url,
}

impl HttpCouponLookup {
    pub fn new(base: &Url, timeout: Duration) -> UpstreamResult<Self> {
        Ok(HttpCouponLookup {
            http: http_client(timeout)?,
            validate_url: endpoint(base, &["validate"])?,
        })
    }
}

#[async_trait::async_trait]
impl CouponLookup for HttpCouponLookup {
    async fn validate(&self, code: &str) -> UpstreamResult<CouponValidation> {
        debug!(code, "Validating coupon");

        let response = self
            .http
            .post(self.validate_url.clone())
            .json(&ValidateRequest { code })
            .send()
            .await
            .map_err(|e| unreachable(SERVICE, e))?;

        let verdict: CouponValidation = read_json(SERVICE, response).await?;
        debug!(code, valid = verdict.valid, kind = %verdict.kind, "Coupon verdict received");
        Ok(verdict)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_url() {
        let base = Url::parse("http://coupons.internal/api/coupons/").unwrap();
        let lookup = HttpCouponLookup::new(&base, Duration::from_secs(2)).unwrap();
        assert_eq!(lookup.validate_url.as_str(), "http://coupons.internal/api/coupons/validate");
    }

    #[test]
    fn test_request_body() {
        let json = serde_json::to_value(ValidateRequest { code: "FREESHIP" }).unwrap();
        assert_eq!(json, serde_json::json!({ "code": "FREESHIP" }));
    }
}

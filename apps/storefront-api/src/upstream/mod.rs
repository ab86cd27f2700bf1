//! # Upstream Collaborators
//!
//! The storefront API owns no data. Coupon rules and order persistence live
//! in two external services, reached through the traits in this module.
//!
//! ```text
//! handlers ──► CouponLookup ──► HttpCouponLookup ──► POST {coupons}/validate
//!         │
//!         └──► OrderStore ────► HttpOrderStore ────► POST {orders}
//!                                                └─► PUT  {orders}/{id}/status
//! ```
//!
//! Each HTTP implementation owns one pooled `reqwest::Client` with a request
//! timeout. Calls are not retried.

pub mod coupons;
pub mod orders;

use std::time::Duration;

use kosmetics_core::clip_error_body;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::warn;
use url::Url;

pub use coupons::{CouponLookup, DynCouponLookup, HttpCouponLookup};
pub use orders::{DynOrderStore, HttpOrderStore, OrderStore};

/// Errors from collaborator calls.
#[derive(Debug, Error)]
pub enum UpstreamError {
    /// The collaborator could not be reached (DNS, TLS, timeout, ...).
    #[error("{service} unreachable: {reason}")]
    Unreachable { service: &'static str, reason: String },

    /// The collaborator answered with an unexpected status.
    #[error("{service} returned {status}: {body}")]
    Status {
        service: &'static str,
        status: u16,
        body: String,
    },

    /// The requested record does not exist upstream.
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    /// The collaborator's response body did not match the expected shape.
    #[error("{service} sent an unreadable response: {reason}")]
    Decode { service: &'static str, reason: String },

    /// Client construction or URL building failed.
    #[error("Invalid upstream configuration: {0}")]
    InvalidConfig(String),
}

pub type UpstreamResult<T> = Result<T, UpstreamError>;

/// Builds the pooled HTTP client shared by one collaborator.
pub(crate) fn http_client(timeout: Duration) -> UpstreamResult<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| UpstreamError::InvalidConfig(format!("Failed to create HTTP client: {}", e)))
}

/// Appends path segments to a base URL, percent-encoding each one.
///
/// A trailing slash on the base is ignored, so `http://svc/orders/` and
/// `http://svc/orders` produce the same endpoints.
pub(crate) fn endpoint(base: &Url, segments: &[&str]) -> UpstreamResult<Url> {
    let mut url = base.clone();
    url.path_segments_mut()
        .map_err(|_| UpstreamError::InvalidConfig(format!("{} cannot be a base URL", base)))?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}

/// Maps a transport failure.
pub(crate) fn unreachable(service: &'static str, err: reqwest::Error) -> UpstreamError {
    warn!(service, error = %err, "Upstream call failed");
    UpstreamError::Unreachable {
        service,
        reason: err.to_string(),
    }
}

/// Reads a JSON body from a successful response, or turns a non-2xx
/// response into [`UpstreamError::Status`].
pub(crate) async fn read_json<T: DeserializeOwned>(
    service: &'static str,
    response: reqwest::Response,
) -> UpstreamResult<T> {
    let status = response.status();
    if !status.is_success() {
        let body = clip_error_body(response.text().await.unwrap_or_default());
        warn!(service, status = status.as_u16(), "Upstream returned an error status");
        return Err(UpstreamError::Status {
            service,
            status: status.as_u16(),
            body,
        });
    }

    response.json::<T>().await.map_err(|e| {
        warn!(service, error = %e, "Upstream response could not be decoded");
        UpstreamError::Decode {
            service,
            reason: e.to_string(),
        }
    })
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_ignores_trailing_slash() {
        let with_slash = Url::parse("http://orders.internal/api/orders/").unwrap();
        let without = Url::parse("http://orders.internal/api/orders").unwrap();

        let a = endpoint(&with_slash, &["abc", "status"]).unwrap();
        let b = endpoint(&without, &["abc", "status"]).unwrap();

        assert_eq!(a.as_str(), "http://orders.internal/api/orders/abc/status");
        assert_eq!(a, b);
    }

    #[test]
    fn test_endpoint_on_bare_host() {
        let base = Url::parse("http://coupons.internal").unwrap();
        let url = endpoint(&base, &["validate"]).unwrap();
        assert_eq!(url.as_str(), "http://coupons.internal/validate");
    }

    #[test]
    fn test_endpoint_encodes_segments() {
        let base = Url::parse("http://orders.internal/orders").unwrap();
        let url = endpoint(&base, &["a/b c", "status"]).unwrap();
        assert_eq!(url.as_str(), "http://orders.internal/orders/a%2Fb%20c/status");
    }

    #[test]
    fn test_endpoint_rejects_non_base_url() {
        let base = Url::parse("mailto:orders@kumarkosmetics.in").unwrap();
        assert!(matches!(endpoint(&base, &["x"]), Err(UpstreamError::InvalidConfig(_))));
    }
}

//! # Storefront API
//!
//! JSON API behind the Kumar Kosmetics storefront and admin dashboard.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Storefront API Server                            │
//! │                                                                         │
//! │  SPA ───► HTTP (8080) ───► routes/* ───► kosmetics-core (pricing)       │
//! │                               │                                         │
//! │                               ├────────► upstream::CouponLookup         │
//! │                               ├────────► upstream::OrderStore           │
//! │                               └────────► kosmetics-mail::Mailer         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Handlers share an immutable [`AppState`]; every collaborator sits behind
//! an `Arc<dyn Trait>` so tests can swap in in-memory fakes.

pub mod config;
pub mod error;
pub mod routes;
pub mod upstream;

use std::sync::Arc;

use kosmetics_core::PricingConfig;
use kosmetics_mail::{MailError, Mailer, RelayMailClient};

use crate::config::{ConfigError, StorefrontConfig};
use crate::upstream::{DynCouponLookup, DynOrderStore, HttpCouponLookup, HttpOrderStore, UpstreamError};

pub use routes::router;

/// Shared application state.
pub struct AppState {
    pub pricing: PricingConfig,
    pub coupons: DynCouponLookup,
    pub orders: DynOrderStore,
    pub mailer: Mailer,
}

pub type SharedState = Arc<AppState>;

impl AppState {
    /// Wires the HTTP collaborators and the mail relay from configuration.
    pub fn from_config(config: &StorefrontConfig) -> Result<Self, StartupError> {
        let coupons = HttpCouponLookup::new(&config.coupon_service_url, config.upstream_timeout)?;
        let orders = HttpOrderStore::new(config.order_service_url.clone(), config.upstream_timeout)?;
        let relay = RelayMailClient::new(config.relay_config())?;

        Ok(AppState {
            pricing: config.pricing,
            coupons: Arc::new(coupons),
            orders: Arc::new(orders),
            mailer: Mailer::new(Arc::new(relay), config.mailer_config()),
        })
    }
}

/// Errors that stop the server from starting.
#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Upstream(#[from] UpstreamError),

    #[error(transparent)]
    Mail(#[from] MailError),

    #[error("Server error: {0}")]
    Io(#[from] std::io::Error),
}

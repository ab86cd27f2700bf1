//! # Storefront API binary
//!
//! Loads configuration, wires the collaborators and serves the router until
//! Ctrl+C or SIGTERM.

use std::sync::Arc;

use storefront_api::config::StorefrontConfig;
use storefront_api::{router, AppState, StartupError};
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Filter used when `RUST_LOG` is unset.
const DEFAULT_LOG_FILTER: &str = "info,storefront_api=debug";

#[tokio::main]
async fn main() -> Result<(), StartupError> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)),
        )
        .with_target(true)
        .init();

    info!("Starting Kumar Kosmetics storefront API...");

    // Load configuration
    let config = StorefrontConfig::load()?;
    info!(
        port = config.http_port,
        coupons = %config.coupon_service_url,
        orders = %config.order_service_url,
        tax_bps = config.pricing.tax_rate.bps(),
        free_shipping_threshold = %config.pricing.free_shipping_threshold,
        basis = %config.pricing.threshold_basis,
        "Configuration loaded"
    );

    // Create shared state
    let state = Arc::new(AppState::from_config(&config)?);

    // Bind and serve
    let addr = config.bind_address();
    let listener = TcpListener::bind(&addr).await?;
    info!(%addr, "Starting HTTP server");

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutdown complete");
    Ok(())
}

/// Graceful shutdown signal handler.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received, starting graceful shutdown...");
}

//! Order store collaborator.
//!
//! | Call            | Request                              | Response |
//! |-----------------|--------------------------------------|----------|
//! | `create`        | `POST {base}` with the order         | `Order`  |
//! | `update_status` | `PUT {base}/{id}/status` with update | `Order`  |
//!
//! A 404 on `update_status` becomes [`UpstreamError::NotFound`].

use std::sync::Arc;
use std::time::Duration;

use kosmetics_core::{Order, OrderStatusUpdate};
use reqwest::StatusCode;
use tracing::debug;
use url::Url;

use super::{endpoint, http_client, read_json, unreachable, UpstreamError, UpstreamResult};

const SERVICE: &str = "order store";

/// Where placed orders are persisted.
#[async_trait::async_trait]
pub trait OrderStore: Send + Sync {
    /// Persists a freshly placed order and returns the stored copy.
    async fn create(&self, order: &Order) -> UpstreamResult<Order>;

    /// Applies an admin status update and returns the updated order.
    async fn update_status(&self, id: &str, update: &OrderStatusUpdate) -> UpstreamResult<Order>;
}

pub type DynOrderStore = Arc<dyn OrderStore>;

/// HTTP client for the order store.
#[derive(Debug, Clone)]
pub struct HttpOrderStore {
    http: reqwest::Client,
    base: Url,
}

impl HttpOrderStore {
    pub fn new(base: Url, timeout: Duration) -> UpstreamResult<Self> {
        Ok(HttpOrderStore {
            http: http_client(timeout)?,
            base,
        })
    }

    fn status_url(&self, id: &str) -> UpstreamResult<Url> {
        endpoint(&self.base, &[id, "status"])
    }
}

#[async_trait::async_trait]
impl OrderStore for HttpOrderStore {
    async fn create(&self, order: &Order) -> UpstreamResult<Order> {
        debug!(order_id = %order.id, "Persisting order");

        let response = self
            .http
            .post(self.base.clone())
            .json(order)
            .send()
            .await
            .map_err(|e| unreachable(SERVICE, e))?;

        read_json(SERVICE, response).await
    }

    async fn update_status(&self, id: &str, update: &OrderStatusUpdate) -> UpstreamResult<Order> {
        debug!(order_id = %id, status = %update.status, "Updating order status");

        let response = self
            .http
            .put(self.status_url(id)?)
            .json(update)
            .send()
            .await
            .map_err(|e| unreachable(SERVICE, e))?;

        if response.status() == StatusCode::NOT_FOUND {
            return Err(UpstreamError::NotFound {
                entity: "Order",
                id: id.to_string(),
            });
        }

        read_json(SERVICE, response).await
    }
}

//! Admin console: the only place order status changes.

use std::sync::Arc;

use tracing::{info, instrument};
use vastrakala_core::{Order, OrderId, OrderStatus, TrackingEvent};

use crate::api::{StatusUpdate, StoreApi};
use crate::error::{Result, add_breadcrumb};

pub struct AdminConsole {
    api: Arc<dyn StoreApi>,
}

impl AdminConsole {
    #[must_use]
    pub fn new(api: Arc<dyn StoreApi>) -> Self {
        Self { api }
    }

    /// Every order, newest first.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Network` if the fetch fails.
    #[instrument(skip(self))]
    pub async fn all_orders(&self) -> Result<Vec<Order>> {
        Ok(self.api.all_orders().await?)
    }

    /// Append a tracking event and move the order to `update.status`.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` for an unknown order id.
    #[instrument(skip(self, update), fields(status = %update.status))]
    pub async fn update_status(
        &self,
        order_id: &OrderId,
        update: StatusUpdate,
    ) -> Result<TrackingEvent> {
        let event = self.api.post_tracking(order_id, &update).await?;
        info!(order_id = %order_id, status = %event.status, "Order status updated");
        add_breadcrumb(
            "admin",
            "Order status updated",
            Some(&[("order_id", order_id.as_str()), ("status", event.status.as_str())]),
        );
        Ok(event)
    }

    /// Run the order through every fulfilment step up to delivery.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` for an unknown order id.
    #[instrument(skip(self))]
    pub async fn simulate_delivery(&self, order_id: &OrderId) -> Result<OrderStatus> {
        let status = self.api.simulate_delivery(order_id).await?;
        info!(order_id = %order_id, final_status = %status, "Delivery simulated");
        Ok(status)
    }
}

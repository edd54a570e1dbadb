//! Read-only order history and tracking timelines.
//!
//! Order status is driven externally (admin updates, payment verification);
//! the client only renders what the server reports. Unknown status strings
//! are shown verbatim and simply have no place on the milestone bar.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::instrument;
use vastrakala_core::{Milestone, Order, OrderId, OrderStatus, TrackingEvent};

use crate::api::StoreApi;
use crate::error::Result;
use crate::services::auth::IdentityScope;

/// One step of the progress bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MilestoneProgress {
    pub milestone: Milestone,
    pub reached: bool,
    /// When the first event for this step was recorded.
    pub at: Option<DateTime<Utc>>,
}

/// An order with its tracking events, oldest first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderTimeline {
    pub order: Order,
    events: Vec<TrackingEvent>,
}

impl OrderTimeline {
    /// Sorts events by timestamp; events with equal timestamps keep server order.
    #[must_use]
    pub fn new(order: Order, mut events: Vec<TrackingEvent>) -> Self {
        events.sort_by_key(|e| e.timestamp);
        Self { order, events }
    }

    #[must_use]
    pub fn events(&self) -> &[TrackingEvent] {
        &self.events
    }

    /// The event with the greatest timestamp; the last one among equals.
    #[must_use]
    pub fn current(&self) -> Option<&TrackingEvent> {
        self.events.last()
    }

    /// Status to display: the current event's, or the order's own field when
    /// no events exist.
    #[must_use]
    pub fn status(&self) -> &OrderStatus {
        self.current()
            .map_or(&self.order.order_status, |e| &e.status)
    }

    /// The five canonical steps, each flagged reached or not.
    #[must_use]
    pub fn milestones(&self) -> Vec<MilestoneProgress> {
        let furthest = self
            .events
            .iter()
            .filter_map(|e| e.status.milestone())
            .chain(self.order.order_status.milestone())
            .max();

        Milestone::ALL
            .into_iter()
            .map(|milestone| MilestoneProgress {
                milestone,
                reached: furthest.is_some_and(|f| milestone <= f),
                at: self
                    .events
                    .iter()
                    .find(|e| e.status.milestone() == Some(milestone))
                    .map(|e| e.timestamp),
            })
            .collect()
    }
}

pub struct OrderLifecycle {
    api: Arc<dyn StoreApi>,
}

impl OrderLifecycle {
    #[must_use]
    pub fn new(api: Arc<dyn StoreApi>) -> Self {
        Self { api }
    }

    /// Orders placed under the scope's owner key, newest first.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Network` if the fetch fails.
    #[instrument(skip(self, scope), fields(owner = %scope.owner_key()))]
    pub async fn orders(&self, scope: &IdentityScope) -> Result<Vec<Order>> {
        Ok(self.api.orders(scope.owner_key()).await?)
    }

    /// # Errors
    ///
    /// Returns `StoreError::NotFound` for an unknown order id.
    #[instrument(skip(self))]
    pub async fn order(&self, order_id: &OrderId) -> Result<Order> {
        Ok(self.api.order(order_id).await?)
    }

    /// Fetch an order and its tracking events.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` for an unknown order id and
    /// `StoreError::Network` if either fetch fails.
    #[instrument(skip(self))]
    pub async fn timeline(&self, order_id: &OrderId) -> Result<OrderTimeline> {
        let (order, events) =
            tokio::try_join!(self.api.order(order_id), self.api.tracking(order_id))?;
        Ok(OrderTimeline::new(order, events))
    }
}

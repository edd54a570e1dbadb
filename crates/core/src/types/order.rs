//! Orders, shipping addresses and tracking events.
//!
//! Orders are permanent backend records. The client creates one per checkout
//! attempt and afterwards only reads it; status fields change through admin
//! tracking updates and payment verification.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::cart::{CartLine, Quantity};
use super::id::{OrderId, ProductId};
use super::status::{OrderStatus, PaymentStatus};
use super::validation::ValidationError;

/// Where an order ships to.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShippingAddress {
    pub name: String,
    pub phone: String,
    pub street: String,
    pub city: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    pub pincode: String,
}

impl ShippingAddress {
    /// Check that every required field is filled in.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::MissingFields`] naming each blank field.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let missing: Vec<&'static str> = [
            ("name", &self.name),
            ("phone", &self.phone),
            ("street", &self.street),
            ("city", &self.city),
            ("pincode", &self.pincode),
        ]
        .into_iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(field, _)| field)
        .collect();

        if missing.is_empty() {
            Ok(())
        } else {
            Err(ValidationError::MissingFields(missing))
        }
    }
}

/// An item frozen into an order at creation time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderItem {
    pub product_id: ProductId,
    pub product_name: String,
    pub price: Decimal,
    pub size: String,
    pub color: String,
    #[serde(deserialize_with = "Quantity::deserialize_clamped")]
    pub quantity: Quantity,
}

impl From<&CartLine> for OrderItem {
    fn from(line: &CartLine) -> Self {
        Self {
            product_id: line.product_id.clone(),
            product_name: line.product_name.clone(),
            price: line.price,
            size: line.size.clone(),
            color: line.color.clone(),
            quantity: line.quantity,
        }
    }
}

/// An order record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    /// Owner key: a user id or the guest sentinel.
    pub user_id: String,
    pub items: Vec<OrderItem>,
    pub subtotal: Decimal,
    pub shipping: Decimal,
    pub total: Decimal,
    #[serde(default)]
    pub payment_id: Option<String>,
    #[serde(default)]
    pub payment_status: PaymentStatus,
    #[serde(default)]
    pub order_status: OrderStatus,
    #[serde(default)]
    pub shipping_address: Option<ShippingAddress>,
    #[serde(deserialize_with = "super::timestamp::deserialize")]
    pub created_at: DateTime<Utc>,
}

impl Order {
    #[must_use]
    pub fn item_count(&self) -> u64 {
        self.items.iter().map(|i| u64::from(i.quantity.get())).sum()
    }
}

/// One entry of an order's tracking timeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackingEvent {
    pub status: OrderStatus,
    pub message: String,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(deserialize_with = "super::timestamp::deserialize")]
    pub timestamp: DateTime<Utc>,
}

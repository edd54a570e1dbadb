//! Request and response bodies exchanged with the backend.
//!
//! Domain records (`CartLine`, `Order`, `TrackingEvent`, ...) live in
//! `vastrakala_core`; this module only holds shapes that exist purely on the
//! wire.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize, Serializer};
use vastrakala_core::{
    AuthenticatedUser, CartLineDraft, Email, OrderId, OrderItem, OrderStatus, OrderTotals,
    ProductId, Quantity, ShippingAddress, TrackingEvent, UserId, WishlistEntryId,
};

/// Body of `POST /cart`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewCartLine {
    pub user_id: String,
    pub product_id: ProductId,
    pub product_name: String,
    pub product_image: String,
    pub price: Decimal,
    pub size: String,
    pub color: String,
    pub quantity: Quantity,
}

impl NewCartLine {
    /// Attach an owner key to a draft line.
    #[must_use]
    pub fn new(owner: impl Into<String>, draft: CartLineDraft) -> Self {
        Self {
            user_id: owner.into(),
            product_id: draft.product_id,
            product_name: draft.product_name,
            product_image: draft.product_image,
            price: draft.price,
            size: draft.size,
            color: draft.color,
            quantity: draft.quantity,
        }
    }
}

/// Body of `PUT /cart/{id}`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct QuantityUpdate {
    pub quantity: Quantity,
}

/// Body of `POST /wishlist`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewWishlistEntry {
    pub user_id: UserId,
    pub product_id: ProductId,
}

/// The bare wishlist row returned by `POST /wishlist`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WishlistRecord {
    pub id: WishlistEntryId,
    pub user_id: UserId,
    pub product_id: ProductId,
    #[serde(default = "Utc::now")]
    pub added_at: DateTime<Utc>,
}

/// Response of `GET /wishlist/check/{product_id}`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct WishlistCheck {
    pub in_wishlist: bool,
}

/// Credentials presented to the identity provider exchange.
///
/// The provider subject id is kept secret in memory and only exposed when
/// the body is serialized onto the wire.
#[derive(Debug, Clone, Serialize)]
pub struct LoginCredentials {
    pub email: Email,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub picture: Option<String>,
    #[serde(serialize_with = "expose_secret")]
    pub google_id: SecretString,
}

impl LoginCredentials {
    #[must_use]
    pub fn new(email: Email, name: impl Into<String>, google_id: impl Into<String>) -> Self {
        Self {
            email,
            name: name.into(),
            picture: None,
            google_id: SecretString::from(google_id.into()),
        }
    }

    #[must_use]
    pub fn with_picture(mut self, picture: impl Into<String>) -> Self {
        self.picture = Some(picture.into());
        self
    }
}

fn expose_secret<S: Serializer>(secret: &SecretString, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(secret.expose_secret())
}

/// Response of `POST /auth/{provider}`.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthResponse {
    pub user: AuthenticatedUser,
    #[serde(default)]
    pub is_new: bool,
}

/// Body of `POST /orders`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CreateOrderRequest {
    pub user_id: String,
    pub items: Vec<OrderItem>,
    pub subtotal: Decimal,
    pub shipping: Decimal,
    pub total: Decimal,
    pub shipping_address: ShippingAddress,
}

impl CreateOrderRequest {
    #[must_use]
    pub fn new(
        owner: impl Into<String>,
        items: Vec<OrderItem>,
        totals: OrderTotals,
        shipping_address: ShippingAddress,
    ) -> Self {
        Self {
            user_id: owner.into(),
            items,
            subtotal: totals.subtotal,
            shipping: totals.shipping,
            total: totals.total,
            shipping_address,
        }
    }
}

/// Response of `POST /payment/create`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentHandle {
    pub razorpay_order_id: String,
    /// Amount in the smallest currency unit (paise).
    pub amount: i64,
    pub currency: String,
    pub key_id: String,
    pub order_id: OrderId,
    #[serde(default)]
    pub mock_mode: bool,
}

/// Body of `POST /payment/verify`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentConfirmation {
    pub order_id: OrderId,
    pub payment_id: String,
    pub signature: String,
}

/// Response of `POST /payment/verify`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationReceipt {
    pub success: bool,
    #[serde(default)]
    pub message: String,
    pub order_id: OrderId,
}

/// Response of `GET /orders/{id}/tracking`.
#[derive(Debug, Clone, Deserialize)]
pub struct TrackingHistory {
    pub order_id: OrderId,
    #[serde(default)]
    pub tracking: Vec<TrackingEvent>,
}

/// Body of `POST /orders/{id}/tracking`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusUpdate {
    pub status: OrderStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

impl StatusUpdate {
    #[must_use]
    pub const fn new(status: OrderStatus) -> Self {
        Self {
            status,
            message: None,
            location: None,
        }
    }
}

/// Response of `POST /orders/{id}/tracking`.
#[derive(Debug, Clone, Deserialize)]
pub struct StatusUpdateReceipt {
    #[serde(default)]
    pub success: bool,
    pub tracking: TrackingEvent,
}

/// Response of `POST /orders/{id}/simulate-delivery`.
#[derive(Debug, Clone, Deserialize)]
pub struct SimulationReceipt {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub message: String,
    pub final_status: OrderStatus,
}

/// `{"detail": "..."}` error body.
#[derive(Debug, Deserialize)]
pub(crate) struct ErrorDetail {
    pub detail: String,
}

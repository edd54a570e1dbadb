//! Remote storefront API.
//!
//! # Architecture
//!
//! - [`StoreApi`] is the port the synchronization core talks to; every
//!   method maps onto one REST endpoint of the backend
//! - [`HttpStoreApi`] is the `reqwest` adapter used in production
//! - The backend is the source of truth: cart, wishlist and order reads are
//!   never cached; only catalog product lookups go through a `moka` cache
//!
//! # Endpoints
//!
//! | method | path |
//! |--------|------|
//! | cart | `GET/POST /cart`, `PUT/DELETE /cart/{id}`, `DELETE /cart?user_id=` |
//! | wishlist | `GET/POST /wishlist`, `DELETE /wishlist/{product_id}`, `GET /wishlist/check/{product_id}` |
//! | auth | `POST /auth/{provider}` |
//! | orders | `POST/GET /orders`, `GET /orders/{id}`, `GET/POST /orders/{id}/tracking` |
//! | payment | `POST /payment/create`, `POST /payment/verify` |
//! | admin | `GET /admin/orders`, `POST /orders/{id}/simulate-delivery` |

mod cache;
mod http;
pub mod types;

pub use http::HttpStoreApi;
pub use types::*;

use async_trait::async_trait;
use rust_decimal::Decimal;
use thiserror::Error;
use vastrakala_core::{
    CartLine, CartLineId, FilterOptions, Order, OrderId, OrderStatus, Product, ProductId,
    ProductQuery, Quantity, TrackingEvent, UserId, WishlistEntry,
};

/// Errors that can occur when talking to the storefront backend.
#[derive(Debug, Error)]
pub enum ApiError {
    /// HTTP request failed (connect, timeout, body read).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// An endpoint URL could not be built.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// The backend answered 404.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Rate limited by the backend.
    #[error("Rate limited, retry after {0} seconds")]
    RateLimited(u64),

    /// Any other non-success status.
    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// The call succeeded at the transport level but the payload reports failure.
    #[error("Rejected: {0}")]
    Rejected(String),

    /// The backend could not be reached for a reason other than HTTP.
    #[error("Unavailable: {0}")]
    Unavailable(String),
}

impl ApiError {
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

/// The storefront backend as seen by the client.
#[async_trait]
pub trait StoreApi: Send + Sync {
    // Catalog (pass-through)
    async fn products(&self, query: &ProductQuery) -> Result<Vec<Product>, ApiError>;
    async fn filter_options(&self) -> Result<FilterOptions, ApiError>;
    async fn product(&self, id: &ProductId) -> Result<Product, ApiError>;

    // Cart, keyed by owner (user id or guest sentinel)
    async fn cart(&self, owner: &str) -> Result<Vec<CartLine>, ApiError>;
    /// Adds a line, merging with an existing line of the same product/size/colour.
    async fn add_cart_line(&self, line: &NewCartLine) -> Result<CartLine, ApiError>;
    async fn update_cart_line(
        &self,
        id: &CartLineId,
        quantity: Quantity,
    ) -> Result<CartLine, ApiError>;
    async fn remove_cart_line(&self, id: &CartLineId) -> Result<(), ApiError>;
    async fn clear_cart(&self, owner: &str) -> Result<(), ApiError>;

    // Wishlist
    async fn wishlist(&self, user: &UserId) -> Result<Vec<WishlistEntry>, ApiError>;
    async fn add_to_wishlist(
        &self,
        user: &UserId,
        product: &ProductId,
    ) -> Result<WishlistRecord, ApiError>;
    async fn remove_from_wishlist(&self, user: &UserId, product: &ProductId)
    -> Result<(), ApiError>;
    async fn wishlist_contains(&self, user: &UserId, product: &ProductId)
    -> Result<bool, ApiError>;

    // Auth
    async fn authenticate(
        &self,
        provider: &str,
        credentials: &LoginCredentials,
    ) -> Result<AuthResponse, ApiError>;

    // Orders
    async fn create_order(&self, request: &CreateOrderRequest) -> Result<Order, ApiError>;
    async fn orders(&self, owner: &str) -> Result<Vec<Order>, ApiError>;
    async fn order(&self, id: &OrderId) -> Result<Order, ApiError>;
    async fn tracking(&self, id: &OrderId) -> Result<Vec<TrackingEvent>, ApiError>;

    // Payment
    async fn create_payment(&self, order: &OrderId, amount: Decimal)
    -> Result<PaymentHandle, ApiError>;
    async fn verify_payment(
        &self,
        confirmation: &PaymentConfirmation,
    ) -> Result<VerificationReceipt, ApiError>;

    // Admin
    async fn all_orders(&self) -> Result<Vec<Order>, ApiError>;
    async fn post_tracking(
        &self,
        id: &OrderId,
        update: &StatusUpdate,
    ) -> Result<TrackingEvent, ApiError>;
    async fn simulate_delivery(&self, id: &OrderId) -> Result<OrderStatus, ApiError>;
}

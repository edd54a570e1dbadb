//! `reqwest` implementation of [`StoreApi`].

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use moka::future::Cache;
use reqwest::StatusCode;
use rust_decimal::Decimal;
use serde::de::{DeserializeOwned, IgnoredAny};
use tracing::{debug, instrument};
use url::Url;
use vastrakala_core::{
    CartLine, CartLineId, FilterOptions, Order, OrderId, OrderStatus, Product, ProductId,
    ProductQuery, Quantity, TrackingEvent, UserId, WishlistEntry,
};

use super::cache::{CacheKey, CacheValue};
use super::types::{
    AuthResponse, CreateOrderRequest, ErrorDetail, LoginCredentials, NewCartLine,
    NewWishlistEntry, PaymentConfirmation, PaymentHandle, QuantityUpdate, SimulationReceipt,
    StatusUpdate, StatusUpdateReceipt, TrackingHistory, VerificationReceipt, WishlistCheck,
    WishlistRecord,
};
use super::{ApiError, StoreApi};
use crate::config::ApiConfig;

/// Longest response excerpt written to logs.
const LOG_BODY_LIMIT: usize = 500;

/// HTTP client for the storefront backend.
///
/// Catalog product lookups and filter facets are cached for 5 minutes.
/// Cart, wishlist, order and payment calls always go to the server.
#[derive(Clone)]
pub struct HttpStoreApi {
    inner: Arc<HttpStoreApiInner>,
}

struct HttpStoreApiInner {
    client: reqwest::Client,
    api_root: String,
    cache: Cache<CacheKey, CacheValue>,
}

impl HttpStoreApi {
    /// Create a client rooted at `<base_url>/api`.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be built.
    pub fn new(config: &ApiConfig) -> Result<Self, ApiError> {
        let cache = Cache::builder()
            .max_capacity(1000)
            .time_to_live(Duration::from_secs(300)) // 5 minutes
            .build();

        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()?;

        let api_root = format!("{}/api", config.base_url.as_str().trim_end_matches('/'));

        Ok(Self {
            inner: Arc::new(HttpStoreApiInner {
                client,
                api_root,
                cache,
            }),
        })
    }

    /// Build an endpoint URL. `path` must already be escaped.
    fn url(&self, path: &str, query: &[(&str, &str)]) -> Result<Url, ApiError> {
        let mut url = Url::parse(&format!("{}{path}", self.inner.api_root))?;
        if !query.is_empty() {
            url.query_pairs_mut().extend_pairs(query);
        }
        Ok(url)
    }

    /// Send a request and decode the JSON response.
    async fn execute<T: DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<T, ApiError> {
        let response = request.send().await?;
        let status = response.status();

        if status == StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get("Retry-After")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse::<u64>().ok())
                .unwrap_or(1);
            return Err(ApiError::RateLimited(retry_after));
        }

        // Read the body as text first for better error diagnostics
        let response_text = response.text().await?;

        if status == StatusCode::NOT_FOUND {
            let detail = serde_json::from_str::<ErrorDetail>(&response_text)
                .map_or_else(|_| excerpt(&response_text, 200), |e| e.detail);
            debug!(detail = %detail, "Backend returned 404");
            return Err(ApiError::NotFound(detail));
        }

        if !status.is_success() {
            tracing::error!(
                status = %status,
                body = %excerpt(&response_text, LOG_BODY_LIMIT),
                "Storefront API returned non-success status"
            );
            return Err(ApiError::Status {
                status: status.as_u16(),
                body: excerpt(&response_text, 200),
            });
        }

        serde_json::from_str(&response_text).map_err(|e| {
            tracing::error!(
                error = %e,
                body = %excerpt(&response_text, LOG_BODY_LIMIT),
                "Failed to parse storefront API response"
            );
            ApiError::Parse(e)
        })
    }

    async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<T, ApiError> {
        let url = self.url(path, query)?;
        self.execute(self.inner.client.get(url)).await
    }

    async fn delete(&self, path: &str, query: &[(&str, &str)]) -> Result<(), ApiError> {
        let url = self.url(path, query)?;
        let _: IgnoredAny = self.execute(self.inner.client.delete(url)).await?;
        Ok(())
    }
}

fn excerpt(body: &str, limit: usize) -> String {
    body.chars().take(limit).collect()
}

fn segment(raw: &str) -> String {
    urlencoding::encode(raw).into_owned()
}

#[async_trait]
impl StoreApi for HttpStoreApi {
    #[instrument(skip(self))]
    async fn products(&self, query: &ProductQuery) -> Result<Vec<Product>, ApiError> {
        let pairs = query.to_pairs();
        let pairs: Vec<(&str, &str)> = pairs.iter().map(|(k, v)| (*k, v.as_str())).collect();
        self.get("/products", &pairs).await
    }

    #[instrument(skip(self))]
    async fn filter_options(&self) -> Result<FilterOptions, ApiError> {
        if let Some(CacheValue::Filters(filters)) = self.inner.cache.get(&CacheKey::Filters).await
        {
            debug!("Cache hit for catalog filters");
            return Ok(filters);
        }

        let filters: FilterOptions = self.get("/products/filters", &[]).await?;
        self.inner
            .cache
            .insert(CacheKey::Filters, CacheValue::Filters(filters.clone()))
            .await;
        Ok(filters)
    }

    #[instrument(skip(self), fields(product_id = %id))]
    async fn product(&self, id: &ProductId) -> Result<Product, ApiError> {
        let key = CacheKey::Product(id.clone());
        if let Some(CacheValue::Product(product)) = self.inner.cache.get(&key).await {
            debug!("Cache hit for product");
            return Ok(*product);
        }

        let product: Product = self
            .get(&format!("/products/{}", segment(id.as_str())), &[])
            .await?;
        self.inner
            .cache
            .insert(key, CacheValue::Product(Box::new(product.clone())))
            .await;
        Ok(product)
    }

    #[instrument(skip(self))]
    async fn cart(&self, owner: &str) -> Result<Vec<CartLine>, ApiError> {
        self.get("/cart", &[("user_id", owner)]).await
    }

    #[instrument(skip(self, line), fields(owner = %line.user_id, product_id = %line.product_id))]
    async fn add_cart_line(&self, line: &NewCartLine) -> Result<CartLine, ApiError> {
        let url = self.url("/cart", &[])?;
        self.execute(self.inner.client.post(url).json(line)).await
    }

    #[instrument(skip(self), fields(line_id = %id))]
    async fn update_cart_line(
        &self,
        id: &CartLineId,
        quantity: Quantity,
    ) -> Result<CartLine, ApiError> {
        let url = self.url(&format!("/cart/{}", segment(id.as_str())), &[])?;
        self.execute(
            self.inner
                .client
                .put(url)
                .json(&QuantityUpdate { quantity }),
        )
        .await
    }

    #[instrument(skip(self), fields(line_id = %id))]
    async fn remove_cart_line(&self, id: &CartLineId) -> Result<(), ApiError> {
        self.delete(&format!("/cart/{}", segment(id.as_str())), &[])
            .await
    }

    #[instrument(skip(self))]
    async fn clear_cart(&self, owner: &str) -> Result<(), ApiError> {
        self.delete("/cart", &[("user_id", owner)]).await
    }

    #[instrument(skip(self), fields(user_id = %user))]
    async fn wishlist(&self, user: &UserId) -> Result<Vec<WishlistEntry>, ApiError> {
        self.get("/wishlist", &[("user_id", user.as_str())]).await
    }

    #[instrument(skip(self), fields(user_id = %user, product_id = %product))]
    async fn add_to_wishlist(
        &self,
        user: &UserId,
        product: &ProductId,
    ) -> Result<WishlistRecord, ApiError> {
        let url = self.url("/wishlist", &[])?;
        let body = NewWishlistEntry {
            user_id: user.clone(),
            product_id: product.clone(),
        };
        self.execute(self.inner.client.post(url).json(&body)).await
    }

    #[instrument(skip(self), fields(user_id = %user, product_id = %product))]
    async fn remove_from_wishlist(
        &self,
        user: &UserId,
        product: &ProductId,
    ) -> Result<(), ApiError> {
        self.delete(
            &format!("/wishlist/{}", segment(product.as_str())),
            &[("user_id", user.as_str())],
        )
        .await
    }

    #[instrument(skip(self), fields(user_id = %user, product_id = %product))]
    async fn wishlist_contains(
        &self,
        user: &UserId,
        product: &ProductId,
    ) -> Result<bool, ApiError> {
        let check: WishlistCheck = self
            .get(
                &format!("/wishlist/check/{}", segment(product.as_str())),
                &[("user_id", user.as_str())],
            )
            .await?;
        Ok(check.in_wishlist)
    }

    #[instrument(skip(self, credentials), fields(email = %credentials.email))]
    async fn authenticate(
        &self,
        provider: &str,
        credentials: &LoginCredentials,
    ) -> Result<AuthResponse, ApiError> {
        let url = self.url(&format!("/auth/{}", segment(provider)), &[])?;
        self.execute(self.inner.client.post(url).json(credentials))
            .await
    }

    #[instrument(skip(self, request), fields(owner = %request.user_id, total = %request.total))]
    async fn create_order(&self, request: &CreateOrderRequest) -> Result<Order, ApiError> {
        let url = self.url("/orders", &[])?;
        self.execute(self.inner.client.post(url).json(request))
            .await
    }

    #[instrument(skip(self))]
    async fn orders(&self, owner: &str) -> Result<Vec<Order>, ApiError> {
        self.get("/orders", &[("user_id", owner)]).await
    }

    #[instrument(skip(self), fields(order_id = %id))]
    async fn order(&self, id: &OrderId) -> Result<Order, ApiError> {
        self.get(&format!("/orders/{}", segment(id.as_str())), &[])
            .await
    }

    #[instrument(skip(self), fields(order_id = %id))]
    async fn tracking(&self, id: &OrderId) -> Result<Vec<TrackingEvent>, ApiError> {
        let history: TrackingHistory = self
            .get(&format!("/orders/{}/tracking", segment(id.as_str())), &[])
            .await?;
        Ok(history.tracking)
    }

    #[instrument(skip(self), fields(order_id = %order, amount = %amount))]
    async fn create_payment(
        &self,
        order: &OrderId,
        amount: Decimal,
    ) -> Result<PaymentHandle, ApiError> {
        let amount = amount.to_string();
        let url = self.url(
            "/payment/create",
            &[("order_id", order.as_str()), ("amount", amount.as_str())],
        )?;
        self.execute(self.inner.client.post(url)).await
    }

    #[instrument(skip(self, confirmation), fields(order_id = %confirmation.order_id))]
    async fn verify_payment(
        &self,
        confirmation: &PaymentConfirmation,
    ) -> Result<VerificationReceipt, ApiError> {
        let url = self.url("/payment/verify", &[])?;
        self.execute(self.inner.client.post(url).json(confirmation))
            .await
    }

    #[instrument(skip(self))]
    async fn all_orders(&self) -> Result<Vec<Order>, ApiError> {
        self.get("/admin/orders", &[]).await
    }

    #[instrument(skip(self, update), fields(order_id = %id, status = %update.status))]
    async fn post_tracking(
        &self,
        id: &OrderId,
        update: &StatusUpdate,
    ) -> Result<TrackingEvent, ApiError> {
        let url = self.url(&format!("/orders/{}/tracking", segment(id.as_str())), &[])?;
        let receipt: StatusUpdateReceipt =
            self.execute(self.inner.client.post(url).json(update)).await?;
        Ok(receipt.tracking)
    }

    #[instrument(skip(self), fields(order_id = %id))]
    async fn simulate_delivery(&self, id: &OrderId) -> Result<OrderStatus, ApiError> {
        let url = self.url(
            &format!("/orders/{}/simulate-delivery", segment(id.as_str())),
            &[],
        )?;
        let receipt: SimulationReceipt = self.execute(self.inner.client.post(url)).await?;
        Ok(receipt.final_status)
    }
}

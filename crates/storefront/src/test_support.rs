//! In-memory [`StoreApi`] used by unit tests.

#![allow(clippy::unwrap_used)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{Duration, Utc};
use rust_decimal::Decimal;
use tokio::sync::Notify;
use vastrakala_core::{
    AuthenticatedUser, CartLine, CartLineId, FilterOptions, Order, OrderId, OrderStatus,
    PaymentStatus, PriceRange, Product, ProductId, ProductQuery, Quantity, TrackingEvent, UserId,
    WishlistEntry, WishlistEntryId,
};

use crate::api::{
    ApiError, AuthResponse, CreateOrderRequest, LoginCredentials, NewCartLine,
    PaymentConfirmation, PaymentHandle, StatusUpdate, StoreApi, VerificationReceipt,
    WishlistRecord,
};

#[derive(Default)]
struct Backend {
    products: Vec<Product>,
    cart: Vec<CartLine>,
    wishlist: Vec<WishlistRecord>,
    users: HashMap<String, AuthenticatedUser>,
    orders: Vec<Order>,
    tracking: HashMap<OrderId, Vec<TrackingEvent>>,
}

/// A cart read held open until released.
pub struct Gate {
    owner: String,
    pub entered: Notify,
    pub release: Notify,
}

#[derive(Default)]
pub struct InMemoryApi {
    backend: Mutex<Backend>,
    next_id: AtomicU64,
    offline: AtomicBool,
    fail_cart_reads: AtomicBool,
    fail_order_create: AtomicBool,
    fail_payment_create: AtomicBool,
    decline_verification: AtomicBool,
    fail_clear: AtomicBool,
    calls: Mutex<Vec<String>>,
    gate: Mutex<Option<Arc<Gate>>>,
}

pub fn product(id: &str, price: i64) -> Product {
    serde_json::from_value(serde_json::json!({
        "id": id,
        "name": format!("Product {id}"),
        "description": "Handwoven",
        "price": price,
        "category": "sarees",
        "sizes": ["Free Size"],
        "variants": [{"color": "Maroon", "color_code": "#800000", "images": ["m.jpg"]}],
        "created_at": "2024-05-01T10:00:00Z"
    }))
    .unwrap()
}

impl InMemoryApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_products(products: Vec<Product>) -> Self {
        let api = Self::default();
        api.backend.lock().unwrap().products = products;
        api
    }

    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    pub fn fail_cart_reads(&self, fail: bool) {
        self.fail_cart_reads.store(fail, Ordering::SeqCst);
    }

    pub fn fail_order_create(&self) {
        self.fail_order_create.store(true, Ordering::SeqCst);
    }

    pub fn fail_payment_create(&self) {
        self.fail_payment_create.store(true, Ordering::SeqCst);
    }

    pub fn decline_verification(&self) {
        self.decline_verification.store(true, Ordering::SeqCst);
    }

    pub fn fail_clear(&self) {
        self.fail_clear.store(true, Ordering::SeqCst);
    }

    /// Hold the next cart read for `owner` until `release` is notified.
    pub fn gate_cart_reads(&self, owner: &str) -> Arc<Gate> {
        let gate = Arc::new(Gate {
            owner: owner.to_string(),
            entered: Notify::new(),
            release: Notify::new(),
        });
        *self.gate.lock().unwrap() = Some(gate.clone());
        gate
    }

    /// Names of the calls made so far, e.g. `"clear_cart:guest"`.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn orders_snapshot(&self) -> Vec<Order> {
        self.backend.lock().unwrap().orders.clone()
    }

    pub fn cart_snapshot(&self, owner: &str) -> Vec<CartLine> {
        let backend = self.backend.lock().unwrap();
        backend
            .cart
            .iter()
            .filter(|l| l.user_id == owner)
            .cloned()
            .collect()
    }

    fn id(&self, prefix: &str) -> String {
        format!("{prefix}-{}", self.next_id.fetch_add(1, Ordering::SeqCst) + 1)
    }

    fn record(&self, call: impl Into<String>) -> Result<(), ApiError> {
        self.calls.lock().unwrap().push(call.into());
        if self.offline.load(Ordering::SeqCst) {
            return Err(ApiError::Unavailable("backend offline".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl StoreApi for InMemoryApi {
    async fn products(&self, _query: &ProductQuery) -> Result<Vec<Product>, ApiError> {
        self.record("products")?;
        Ok(self.backend.lock().unwrap().products.clone())
    }

    async fn filter_options(&self) -> Result<FilterOptions, ApiError> {
        self.record("filter_options")?;
        Ok(FilterOptions {
            fabrics: vec!["Silk".to_string()],
            occasions: vec!["Wedding".to_string()],
            price_range: PriceRange {
                min_price: Decimal::ZERO,
                max_price: Decimal::from(10_000),
            },
        })
    }

    async fn product(&self, id: &ProductId) -> Result<Product, ApiError> {
        self.record(format!("product:{id}"))?;
        self.backend
            .lock()
            .unwrap()
            .products
            .iter()
            .find(|p| &p.id == id)
            .cloned()
            .ok_or_else(|| ApiError::NotFound("Product not found".to_string()))
    }

    async fn cart(&self, owner: &str) -> Result<Vec<CartLine>, ApiError> {
        self.record(format!("cart:{owner}"))?;
        if self.fail_cart_reads.load(Ordering::SeqCst) {
            return Err(ApiError::Unavailable("cart service down".to_string()));
        }
        let lines = self.cart_snapshot(owner);

        let gate = self
            .gate
            .lock()
            .unwrap()
            .take_if(|g| g.owner == owner);
        if let Some(gate) = gate {
            gate.entered.notify_one();
            gate.release.notified().await;
        }
        Ok(lines)
    }

    async fn add_cart_line(&self, line: &NewCartLine) -> Result<CartLine, ApiError> {
        self.record(format!("add_cart_line:{}", line.user_id))?;
        let id = self.id("line");
        let mut backend = self.backend.lock().unwrap();
        if let Some(existing) = backend.cart.iter_mut().find(|l| {
            l.user_id == line.user_id
                && l.product_id == line.product_id
                && l.size == line.size
                && l.color == line.color
        }) {
            existing.quantity =
                Quantity::clamped(i64::from(existing.quantity.get() + line.quantity.get()));
            return Ok(existing.clone());
        }
        let created = CartLine {
            id: CartLineId::new(id),
            user_id: line.user_id.clone(),
            product_id: line.product_id.clone(),
            product_name: line.product_name.clone(),
            product_image: line.product_image.clone(),
            price: line.price,
            size: line.size.clone(),
            color: line.color.clone(),
            quantity: line.quantity,
            added_at: Utc::now(),
        };
        backend.cart.push(created.clone());
        Ok(created)
    }

    async fn update_cart_line(
        &self,
        id: &CartLineId,
        quantity: Quantity,
    ) -> Result<CartLine, ApiError> {
        self.record(format!("update_cart_line:{id}"))?;
        let mut backend = self.backend.lock().unwrap();
        let line = backend
            .cart
            .iter_mut()
            .find(|l| &l.id == id)
            .ok_or_else(|| ApiError::NotFound("Cart item not found".to_string()))?;
        line.quantity = quantity;
        Ok(line.clone())
    }

    async fn remove_cart_line(&self, id: &CartLineId) -> Result<(), ApiError> {
        self.record(format!("remove_cart_line:{id}"))?;
        let mut backend = self.backend.lock().unwrap();
        let before = backend.cart.len();
        backend.cart.retain(|l| &l.id != id);
        if backend.cart.len() == before {
            return Err(ApiError::NotFound("Cart item not found".to_string()));
        }
        Ok(())
    }

    async fn clear_cart(&self, owner: &str) -> Result<(), ApiError> {
        self.record(format!("clear_cart:{owner}"))?;
        if self.fail_clear.load(Ordering::SeqCst) {
            return Err(ApiError::Status {
                status: 503,
                body: "unavailable".to_string(),
            });
        }
        self.backend
            .lock()
            .unwrap()
            .cart
            .retain(|l| l.user_id != owner);
        Ok(())
    }

    async fn wishlist(&self, user: &UserId) -> Result<Vec<WishlistEntry>, ApiError> {
        self.record(format!("wishlist:{user}"))?;
        let backend = self.backend.lock().unwrap();
        Ok(backend
            .wishlist
            .iter()
            .filter(|r| &r.user_id == user)
            .filter_map(|r| {
                let product = backend.products.iter().find(|p| p.id == r.product_id)?;
                Some(WishlistEntry {
                    wishlist_id: r.id.clone(),
                    product: product.clone(),
                    added_at: r.added_at,
                })
            })
            .collect())
    }

    async fn add_to_wishlist(
        &self,
        user: &UserId,
        product: &ProductId,
    ) -> Result<WishlistRecord, ApiError> {
        self.record(format!("add_to_wishlist:{product}"))?;
        let id = self.id("wish");
        let mut backend = self.backend.lock().unwrap();
        if let Some(existing) = backend
            .wishlist
            .iter()
            .find(|r| &r.user_id == user && &r.product_id == product)
        {
            return Ok(existing.clone());
        }
        let record = WishlistRecord {
            id: WishlistEntryId::new(id),
            user_id: user.clone(),
            product_id: product.clone(),
            added_at: Utc::now(),
        };
        backend.wishlist.push(record.clone());
        Ok(record)
    }

    async fn remove_from_wishlist(
        &self,
        user: &UserId,
        product: &ProductId,
    ) -> Result<(), ApiError> {
        self.record(format!("remove_from_wishlist:{product}"))?;
        let mut backend = self.backend.lock().unwrap();
        let before = backend.wishlist.len();
        backend
            .wishlist
            .retain(|r| !(&r.user_id == user && &r.product_id == product));
        if backend.wishlist.len() == before {
            return Err(ApiError::NotFound("Wishlist item not found".to_string()));
        }
        Ok(())
    }

    async fn wishlist_contains(
        &self,
        user: &UserId,
        product: &ProductId,
    ) -> Result<bool, ApiError> {
        self.record(format!("wishlist_contains:{product}"))?;
        Ok(self
            .backend
            .lock()
            .unwrap()
            .wishlist
            .iter()
            .any(|r| &r.user_id == user && &r.product_id == product))
    }

    async fn authenticate(
        &self,
        provider: &str,
        credentials: &LoginCredentials,
    ) -> Result<AuthResponse, ApiError> {
        self.record(format!("authenticate:{provider}"))?;
        let id = self.id("user");
        let mut backend = self.backend.lock().unwrap();
        let key = credentials.email.as_str().to_string();
        if let Some(user) = backend.users.get(&key) {
            return Ok(AuthResponse {
                user: user.clone(),
                is_new: false,
            });
        }
        let user = AuthenticatedUser {
            id: UserId::new(id),
            name: credentials.name.clone(),
            email: credentials.email.clone(),
            picture: credentials.picture.clone(),
            auth_provider: provider.to_string(),
        };
        backend.users.insert(key, user.clone());
        Ok(AuthResponse { user, is_new: true })
    }

    async fn create_order(&self, request: &CreateOrderRequest) -> Result<Order, ApiError> {
        self.record(format!("create_order:{}", request.user_id))?;
        if self.fail_order_create.load(Ordering::SeqCst) {
            return Err(ApiError::Status {
                status: 500,
                body: "order store down".to_string(),
            });
        }
        let order = Order {
            id: OrderId::new(self.id("order")),
            user_id: request.user_id.clone(),
            items: request.items.clone(),
            subtotal: request.subtotal,
            shipping: request.shipping,
            total: request.total,
            payment_id: None,
            payment_status: PaymentStatus::Pending,
            order_status: OrderStatus::Pending,
            shipping_address: Some(request.shipping_address.clone()),
            created_at: Utc::now(),
        };
        let mut backend = self.backend.lock().unwrap();
        backend.tracking.insert(
            order.id.clone(),
            vec![TrackingEvent {
                status: OrderStatus::Pending,
                message: OrderStatus::Pending.default_message(),
                location: None,
                timestamp: order.created_at,
            }],
        );
        backend.orders.push(order.clone());
        Ok(order)
    }

    async fn orders(&self, owner: &str) -> Result<Vec<Order>, ApiError> {
        self.record(format!("orders:{owner}"))?;
        let mut orders: Vec<Order> = self
            .backend
            .lock()
            .unwrap()
            .orders
            .iter()
            .filter(|o| o.user_id == owner)
            .cloned()
            .collect();
        orders.reverse();
        Ok(orders)
    }

    async fn order(&self, id: &OrderId) -> Result<Order, ApiError> {
        self.record(format!("order:{id}"))?;
        self.backend
            .lock()
            .unwrap()
            .orders
            .iter()
            .find(|o| &o.id == id)
            .cloned()
            .ok_or_else(|| ApiError::NotFound("Order not found".to_string()))
    }

    async fn tracking(&self, id: &OrderId) -> Result<Vec<TrackingEvent>, ApiError> {
        self.record(format!("tracking:{id}"))?;
        Ok(self
            .backend
            .lock()
            .unwrap()
            .tracking
            .get(id)
            .cloned()
            .unwrap_or_default())
    }

    async fn create_payment(
        &self,
        order: &OrderId,
        amount: Decimal,
    ) -> Result<PaymentHandle, ApiError> {
        self.record(format!("create_payment:{order}"))?;
        if self.fail_payment_create.load(Ordering::SeqCst) {
            return Err(ApiError::Status {
                status: 502,
                body: "gateway down".to_string(),
            });
        }
        let paise = (amount * Decimal::ONE_HUNDRED).trunc().mantissa();
        Ok(PaymentHandle {
            razorpay_order_id: format!("order_{}", self.id("rzp")),
            amount: i64::try_from(paise).unwrap(),
            currency: "INR".to_string(),
            key_id: "rzp_test_mock_key".to_string(),
            order_id: order.clone(),
            mock_mode: true,
        })
    }

    async fn verify_payment(
        &self,
        confirmation: &PaymentConfirmation,
    ) -> Result<VerificationReceipt, ApiError> {
        self.record(format!("verify_payment:{}", confirmation.order_id))?;
        if self.decline_verification.load(Ordering::SeqCst) {
            return Ok(VerificationReceipt {
                success: false,
                message: "Signature mismatch".to_string(),
                order_id: confirmation.order_id.clone(),
            });
        }
        let mut backend = self.backend.lock().unwrap();
        if let Some(order) = backend
            .orders
            .iter_mut()
            .find(|o| o.id == confirmation.order_id)
        {
            order.payment_id = Some(confirmation.payment_id.clone());
            order.payment_status = PaymentStatus::Completed;
        }
        Ok(VerificationReceipt {
            success: true,
            message: "Payment verified".to_string(),
            order_id: confirmation.order_id.clone(),
        })
    }

    async fn all_orders(&self) -> Result<Vec<Order>, ApiError> {
        self.record("all_orders")?;
        let mut orders = self.backend.lock().unwrap().orders.clone();
        orders.reverse();
        Ok(orders)
    }

    async fn post_tracking(
        &self,
        id: &OrderId,
        update: &StatusUpdate,
    ) -> Result<TrackingEvent, ApiError> {
        self.record(format!("post_tracking:{id}"))?;
        let mut backend = self.backend.lock().unwrap();
        let order = backend
            .orders
            .iter_mut()
            .find(|o| &o.id == id)
            .ok_or_else(|| ApiError::NotFound("Order not found".to_string()))?;
        order.order_status = update.status.clone();
        let event = TrackingEvent {
            status: update.status.clone(),
            message: update
                .message
                .clone()
                .unwrap_or_else(|| update.status.default_message()),
            location: update.location.clone(),
            timestamp: Utc::now(),
        };
        backend
            .tracking
            .entry(id.clone())
            .or_default()
            .push(event.clone());
        Ok(event)
    }

    async fn simulate_delivery(&self, id: &OrderId) -> Result<OrderStatus, ApiError> {
        self.record(format!("simulate_delivery:{id}"))?;
        let mut backend = self.backend.lock().unwrap();
        let order = backend
            .orders
            .iter_mut()
            .find(|o| &o.id == id)
            .ok_or_else(|| ApiError::NotFound("Order not found".to_string()))?;
        order.order_status = OrderStatus::Delivered;
        let start = Utc::now();
        let events = [
            OrderStatus::Confirmed,
            OrderStatus::Packed,
            OrderStatus::Shipped,
            OrderStatus::InTransit,
            OrderStatus::OutForDelivery,
            OrderStatus::Delivered,
        ]
        .into_iter()
        .zip(0..)
        .map(|(status, i)| TrackingEvent {
            message: status.default_message(),
            status,
            location: None,
            timestamp: start + Duration::seconds(i),
        });
        backend.tracking.entry(id.clone()).or_default().extend(events);
        Ok(OrderStatus::Delivered)
    }
}

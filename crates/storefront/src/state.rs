//! Application state: the composition root.
//!
//! Owns the session identity and every store. The view layer reads
//! snapshots and calls the operations below; it never mutates store state
//! directly.

use std::sync::Arc;

use tracing::{instrument, warn};
use vastrakala_core::{
    AuthenticatedUser, CartLineDraft, CartLineId, FilterOptions, Identity, Order, OrderId,
    Product, ProductId, ProductQuery, Quantity, ShippingAddress,
};

use crate::api::{ApiError, HttpStoreApi, LoginCredentials, StoreApi};
use crate::config::StorefrontConfig;
use crate::error::Result;
use crate::services::admin::AdminConsole;
use crate::services::auth::{
    CredentialStore, FileCredentialStore, IdentityScope, SessionIdentity,
};
use crate::services::cart::{CartSnapshot, CartStore};
use crate::services::checkout::{
    CheckoutError, CheckoutPipeline, CheckoutReceipt, MockGateway, PaymentGateway,
};
use crate::services::orders::{OrderLifecycle, OrderTimeline};
use crate::services::wishlist::{WishlistSnapshot, WishlistStore};

/// Application state shared by every caller.
///
/// This struct is cheaply cloneable via `Arc`.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    api: Arc<dyn StoreApi>,
    session: SessionIdentity,
    cart: CartStore,
    wishlist: WishlistStore,
    checkout: CheckoutPipeline,
    orders: OrderLifecycle,
    admin: AdminConsole,
}

impl AppState {
    /// Create the state for a configured backend, persisting identity under
    /// the configured state directory and paying through the mock gateway.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: &StorefrontConfig) -> std::result::Result<Self, ApiError> {
        let api = Arc::new(HttpStoreApi::new(&config.api)?);
        let credentials = Arc::new(FileCredentialStore::new(&config.state_dir));
        Ok(Self::with_parts(api, credentials, Arc::new(MockGateway)))
    }

    /// Assemble the state from explicit collaborators.
    #[must_use]
    pub fn with_parts(
        api: Arc<dyn StoreApi>,
        credentials: Arc<dyn CredentialStore>,
        gateway: Arc<dyn PaymentGateway>,
    ) -> Self {
        let session = SessionIdentity::new(api.clone(), credentials);
        let epoch = session.epoch();
        Self {
            inner: Arc::new(AppStateInner {
                cart: CartStore::new(api.clone(), epoch.clone()),
                wishlist: WishlistStore::new(api.clone(), epoch),
                checkout: CheckoutPipeline::new(api.clone(), gateway),
                orders: OrderLifecycle::new(api.clone()),
                admin: AdminConsole::new(api.clone()),
                session,
                api,
            }),
        }
    }

    // =========================================================================
    // Identity
    // =========================================================================

    /// Restore the persisted identity and load its cart and wishlist.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Network` if the initial load fails; the
    /// identity is restored regardless.
    #[instrument(skip(self))]
    pub async fn bootstrap(&self) -> Result<Identity> {
        let scope = self.inner.session.restore().await;
        self.invalidate_stores();
        self.resync(&scope).await?;
        Ok(scope.identity().clone())
    }

    #[must_use]
    pub fn identity(&self) -> Identity {
        self.inner.session.current()
    }

    #[must_use]
    pub fn scope(&self) -> IdentityScope {
        self.inner.session.scope()
    }

    /// Sign in and re-derive both stores for the new identity.
    ///
    /// A failed re-fetch after a successful sign-in is logged; the stores
    /// stay empty until the next refresh.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Auth` if the exchange or persistence fails; the
    /// identity and stores are untouched in that case.
    #[instrument(skip(self, credentials))]
    pub async fn login(&self, credentials: &LoginCredentials) -> Result<AuthenticatedUser> {
        let (user, scope) = self.inner.session.login(credentials).await?;
        self.invalidate_stores();
        if let Err(e) = self.resync(&scope).await {
            warn!(error = %e, "Post-login refresh failed");
        }
        Ok(user)
    }

    /// Sign out. Always succeeds locally; the guest cart is re-fetched on a
    /// best-effort basis.
    #[instrument(skip(self))]
    pub async fn logout(&self) {
        let scope = self.inner.session.logout().await;
        self.invalidate_stores();
        if let Err(e) = self.resync(&scope).await {
            warn!(error = %e, "Post-logout refresh failed");
        }
    }

    fn invalidate_stores(&self) {
        self.inner.cart.invalidate();
        self.inner.wishlist.invalidate();
    }

    async fn resync(&self, scope: &IdentityScope) -> Result<()> {
        if scope.user_id().is_some() {
            tokio::try_join!(
                self.inner.cart.refresh(scope),
                self.inner.wishlist.refresh(scope)
            )?;
        } else {
            self.inner.cart.refresh(scope).await?;
        }
        Ok(())
    }

    // =========================================================================
    // Cart
    // =========================================================================

    #[must_use]
    pub fn cart(&self) -> CartSnapshot {
        self.inner.cart.snapshot()
    }

    /// # Errors
    ///
    /// Returns `StoreError::Network` if the fetch fails.
    pub async fn refresh_cart(&self) -> Result<CartSnapshot> {
        self.inner.cart.refresh(&self.scope()).await
    }

    /// Look the product up, check the size/colour choice, and add it.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Validation` for a missing or unknown variant,
    /// `StoreError::NotFound` for an unknown product.
    #[instrument(skip(self))]
    pub async fn add_to_cart(
        &self,
        product_id: &ProductId,
        size: Option<&str>,
        color: Option<&str>,
        quantity: Quantity,
    ) -> Result<CartSnapshot> {
        let product = self.inner.api.product(product_id).await?;
        let draft = CartLineDraft::for_product(&product, size, color, quantity)?;
        self.inner.cart.add(&self.scope(), draft).await
    }

    /// Add an already-validated line.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Network` if the add or refresh fails.
    pub async fn add_line(&self, draft: CartLineDraft) -> Result<CartSnapshot> {
        self.inner.cart.add(&self.scope(), draft).await
    }

    /// Set a line's quantity; anything below 1 is raised to 1.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` if the line no longer exists.
    pub async fn update_quantity(&self, line_id: &CartLineId, requested: i64) -> Result<CartSnapshot> {
        let quantity = Quantity::clamped(requested);
        self.inner
            .cart
            .update_quantity(&self.scope(), line_id, quantity)
            .await
    }

    /// # Errors
    ///
    /// Returns `StoreError::NotFound` if the line no longer exists.
    pub async fn remove_line(&self, line_id: &CartLineId) -> Result<CartSnapshot> {
        self.inner.cart.remove(&self.scope(), line_id).await
    }

    /// # Errors
    ///
    /// Returns `StoreError::Network` if the clear or refresh fails.
    pub async fn clear_cart(&self) -> Result<CartSnapshot> {
        self.inner.cart.clear(&self.scope()).await
    }

    // =========================================================================
    // Wishlist
    // =========================================================================

    #[must_use]
    pub fn wishlist(&self) -> WishlistSnapshot {
        self.inner.wishlist.snapshot()
    }

    /// # Errors
    ///
    /// Returns `StoreError::AuthRequired` for guests.
    pub async fn refresh_wishlist(&self) -> Result<WishlistSnapshot> {
        self.inner.wishlist.refresh(&self.scope()).await
    }

    /// Flip membership; returns whether the product is now favorited.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::AuthRequired` for guests.
    pub async fn toggle_wishlist(&self, product_id: &ProductId) -> Result<bool> {
        self.inner.wishlist.toggle(&self.scope(), product_id).await
    }

    /// Membership according to the local snapshot.
    #[must_use]
    pub fn is_favorited(&self, product_id: &ProductId) -> bool {
        self.inner.wishlist.contains(product_id)
    }

    /// Membership according to the server.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::AuthRequired` for guests.
    pub async fn check_wishlist(&self, product_id: &ProductId) -> Result<bool> {
        self.inner.wishlist.check(&self.scope(), product_id).await
    }

    // =========================================================================
    // Checkout & orders
    // =========================================================================

    /// Check out the cart as last shown, then re-read it.
    ///
    /// A rejected precondition sends no request at all.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Checkout` naming the failed stage.
    #[instrument(skip(self, address))]
    pub async fn checkout(&self, address: ShippingAddress) -> Result<CheckoutReceipt> {
        let scope = self.scope();
        let outcome = self.inner.checkout.run(&scope, &self.cart(), address).await;
        if matches!(outcome, Err(CheckoutError::Validation(_))) {
            return Ok(outcome?);
        }
        if let Err(e) = self.inner.cart.refresh(&scope).await {
            warn!(error = %e, "Cart refresh after checkout failed");
        }
        Ok(outcome?)
    }

    /// # Errors
    ///
    /// Returns `StoreError::Network` if the fetch fails.
    pub async fn orders(&self) -> Result<Vec<Order>> {
        self.inner.orders.orders(&self.scope()).await
    }

    /// # Errors
    ///
    /// Returns `StoreError::NotFound` for an unknown order id.
    pub async fn order(&self, order_id: &OrderId) -> Result<Order> {
        self.inner.orders.order(order_id).await
    }

    /// # Errors
    ///
    /// Returns `StoreError::NotFound` for an unknown order id.
    pub async fn timeline(&self, order_id: &OrderId) -> Result<OrderTimeline> {
        self.inner.orders.timeline(order_id).await
    }

    #[must_use]
    pub fn admin(&self) -> &AdminConsole {
        &self.inner.admin
    }

    // =========================================================================
    // Catalog (pass-through)
    // =========================================================================

    /// # Errors
    ///
    /// Returns `StoreError::Network` if the fetch fails.
    pub async fn products(&self, query: &ProductQuery) -> Result<Vec<Product>> {
        Ok(self.inner.api.products(query).await?)
    }

    /// # Errors
    ///
    /// Returns `StoreError::NotFound` for an unknown product.
    pub async fn product(&self, product_id: &ProductId) -> Result<Product> {
        Ok(self.inner.api.product(product_id).await?)
    }

    /// # Errors
    ///
    /// Returns `StoreError::Network` if the fetch fails.
    pub async fn filter_options(&self) -> Result<FilterOptions> {
        Ok(self.inner.api.filter_options().await?)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rust_decimal::Decimal;
    use vastrakala_core::{Email, GUEST_OWNER_KEY, OrderStatus, ValidationError};

    use super::*;
    use crate::error::StoreError;
    use crate::services::auth::MemoryCredentialStore;
    use crate::services::checkout::CheckoutStage;
    use crate::test_support::{InMemoryApi, product};

    fn state() -> (Arc<InMemoryApi>, AppState) {
        let api = Arc::new(InMemoryApi::with_products(vec![
            product("p-1", 1000),
            product("p-2", 500),
        ]));
        let state = AppState::with_parts(
            api.clone(),
            Arc::new(MemoryCredentialStore::new()),
            Arc::new(MockGateway),
        );
        (api, state)
    }

    fn credentials() -> LoginCredentials {
        LoginCredentials::new(Email::parse("divya@example.in").unwrap(), "Divya", "sub-3")
    }

    fn address() -> ShippingAddress {
        ShippingAddress {
            name: "Divya".to_string(),
            phone: "9822222222".to_string(),
            street: "7 Park Street".to_string(),
            city: "Kolkata".to_string(),
            state: None,
            pincode: "700016".to_string(),
        }
    }

    #[tokio::test]
    async fn test_stale_guest_refresh_is_discarded_after_login() {
        let (api, state) = state();
        state.bootstrap().await.unwrap();
        state
            .add_to_cart(&ProductId::new("p-1"), None, None, Quantity::ONE)
            .await
            .unwrap();

        let gate = api.gate_cart_reads(GUEST_OWNER_KEY);
        let slow = tokio::spawn({
            let state = state.clone();
            async move { state.refresh_cart().await }
        });
        gate.entered.notified().await;

        let user = state.login(&credentials()).await.unwrap();
        assert_eq!(state.cart().owner(), user.id.as_str());
        assert!(state.cart().is_empty());

        gate.release.notify_one();
        slow.await.unwrap().unwrap();

        let cart = state.cart();
        assert_eq!(cart.owner(), user.id.as_str());
        assert!(cart.is_empty());
        assert_eq!(cart.total(), Decimal::ZERO);
    }

    #[tokio::test]
    async fn test_logout_reverts_to_guest_cart_and_empties_wishlist() {
        let (_api, state) = state();
        state.bootstrap().await.unwrap();
        state
            .add_to_cart(&ProductId::new("p-2"), None, None, Quantity::ONE)
            .await
            .unwrap();

        state.login(&credentials()).await.unwrap();
        state.toggle_wishlist(&ProductId::new("p-1")).await.unwrap();
        state
            .add_to_cart(&ProductId::new("p-1"), None, None, Quantity::ONE)
            .await
            .unwrap();
        assert!(state.is_favorited(&ProductId::new("p-1")));
        assert_eq!(state.cart().total(), Decimal::from(1000));

        state.logout().await;
        assert!(state.identity().is_guest());
        assert!(state.wishlist().is_empty());
        let cart = state.cart();
        assert_eq!(cart.owner(), GUEST_OWNER_KEY);
        assert_eq!(cart.total(), Decimal::from(500));
    }

    #[tokio::test]
    async fn test_login_survives_failed_resync() {
        let (api, state) = state();
        state.bootstrap().await.unwrap();
        state
            .add_to_cart(&ProductId::new("p-1"), None, None, Quantity::ONE)
            .await
            .unwrap();

        // Authenticate succeeds, then the store re-fetch fails
        api.fail_cart_reads(true);
        let user = state.login(&credentials()).await.unwrap();
        assert_eq!(state.identity().user(), Some(&user));
        assert!(state.cart().is_empty());

        api.fail_cart_reads(false);
        let cart = state.refresh_cart().await.unwrap();
        assert_eq!(cart.owner(), user.id.as_str());
    }

    #[tokio::test]
    async fn test_wishlist_requires_login() {
        let (_api, state) = state();
        let err = state
            .toggle_wishlist(&ProductId::new("p-1"))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::AuthRequired));
    }

    #[tokio::test]
    async fn test_quantity_below_one_is_clamped() {
        let (_api, state) = state();
        let cart = state
            .add_to_cart(&ProductId::new("p-1"), None, None, Quantity::new(2).unwrap())
            .await
            .unwrap();
        let line = cart.lines()[0].id.clone();

        let cart = state.update_quantity(&line, 0).await.unwrap();
        assert_eq!(cart.count(), 1);
    }

    #[tokio::test]
    async fn test_add_requires_known_variant() {
        let (_api, state) = state();
        let err = state
            .add_to_cart(&ProductId::new("p-1"), Some("XXL"), None, Quantity::ONE)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            StoreError::Validation(ValidationError::VariantNotSelected("size"))
        ));
    }

    #[tokio::test]
    async fn test_checkout_then_order_history() {
        let (_api, state) = state();
        state
            .add_to_cart(&ProductId::new("p-1"), None, None, Quantity::ONE)
            .await
            .unwrap();

        let receipt = state.checkout(address()).await.unwrap();
        assert!(state.cart().is_empty());
        assert_eq!(receipt.order.total, Decimal::from(1000));

        let orders = state.orders().await.unwrap();
        assert_eq!(orders.len(), 1);
        let timeline = state.timeline(receipt.order_id()).await.unwrap();
        assert_eq!(timeline.status(), &OrderStatus::Pending);
    }

    #[tokio::test]
    async fn test_checkout_failure_keeps_cart_visible() {
        let (api, state) = state();
        state
            .add_to_cart(&ProductId::new("p-1"), None, None, Quantity::ONE)
            .await
            .unwrap();
        api.decline_verification();

        let err = state.checkout(address()).await.unwrap_err();
        let StoreError::Checkout(err) = err else {
            panic!("expected checkout error, got {err:?}");
        };
        assert_eq!(err.stage(), CheckoutStage::PaymentVerified);
        assert_eq!(state.cart().count(), 1);
    }

    #[tokio::test]
    async fn test_checkout_of_empty_cart_sends_nothing() {
        let (api, state) = state();
        state.bootstrap().await.unwrap();
        let calls_before = api.calls().len();

        let err = state.checkout(address()).await.unwrap_err();
        let StoreError::Checkout(err) = err else {
            panic!("expected checkout error, got {err:?}");
        };
        assert_eq!(err.stage(), CheckoutStage::AddressCollected);
        assert_eq!(api.calls().len(), calls_before);
        assert!(api.orders_snapshot().is_empty());
    }
}

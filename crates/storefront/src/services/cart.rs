//! Cart mirror.
//!
//! The server holds the authoritative cart. This store keeps the last line
//! set a refresh confirmed and re-fetches after every mutation; nothing is
//! applied optimistically.

use std::sync::{Arc, Mutex, PoisonError};

use rust_decimal::Decimal;
use tracing::{debug, instrument};
use vastrakala_core::{
    CartLine, CartLineDraft, CartLineId, OrderTotals, Quantity, cart_count, cart_total,
};

use crate::api::{NewCartLine, StoreApi};
use crate::error::Result;
use crate::services::auth::{IdentityEpoch, IdentityScope};

/// The cart as last confirmed by the server.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CartSnapshot {
    owner: String,
    epoch: u64,
    lines: Vec<CartLine>,
}

impl CartSnapshot {
    fn empty(epoch: u64) -> Self {
        Self {
            epoch,
            ..Self::default()
        }
    }

    /// Owner key the lines were fetched for; empty before the first refresh.
    #[must_use]
    pub fn owner(&self) -> &str {
        &self.owner
    }

    #[must_use]
    pub const fn epoch(&self) -> u64 {
        self.epoch
    }

    #[must_use]
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Σ price·quantity over the current lines.
    #[must_use]
    pub fn total(&self) -> Decimal {
        cart_total(&self.lines)
    }

    /// Σ quantity over the current lines.
    #[must_use]
    pub fn count(&self) -> u64 {
        cart_count(&self.lines)
    }

    /// Subtotal, shipping and total for the current lines.
    #[must_use]
    pub fn totals(&self) -> OrderTotals {
        OrderTotals::for_lines(&self.lines)
    }
}

pub struct CartStore {
    api: Arc<dyn StoreApi>,
    epoch: IdentityEpoch,
    snapshot: Mutex<CartSnapshot>,
}

impl CartStore {
    #[must_use]
    pub fn new(api: Arc<dyn StoreApi>, epoch: IdentityEpoch) -> Self {
        let snapshot = Mutex::new(CartSnapshot::empty(epoch.current()));
        Self {
            api,
            epoch,
            snapshot,
        }
    }

    /// The current snapshot. Lines loaded under a superseded identity are
    /// never returned.
    #[must_use]
    pub fn snapshot(&self) -> CartSnapshot {
        let snapshot = self.snapshot.lock().unwrap_or_else(PoisonError::into_inner);
        let current = self.epoch.current();
        if snapshot.epoch == current {
            snapshot.clone()
        } else {
            CartSnapshot::empty(current)
        }
    }

    /// Drop the local lines. Called on every identity switch before re-fetching.
    pub fn invalidate(&self) {
        *self.snapshot.lock().unwrap_or_else(PoisonError::into_inner) =
            CartSnapshot::empty(self.epoch.current());
    }

    /// Replace local state with the server's cart for the scope's owner.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Network` if the fetch fails; local state is kept.
    #[instrument(skip(self, scope), fields(owner = %scope.owner_key(), epoch = scope.epoch()))]
    pub async fn refresh(&self, scope: &IdentityScope) -> Result<CartSnapshot> {
        let lines = self.api.cart(scope.owner_key()).await?;
        Ok(self.replace(scope, lines))
    }

    /// Add a line (the server merges same product/size/colour), then refresh.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Network` if the add or the refresh fails.
    #[instrument(skip(self, scope, draft), fields(owner = %scope.owner_key(), product_id = %draft.product_id))]
    pub async fn add(&self, scope: &IdentityScope, draft: CartLineDraft) -> Result<CartSnapshot> {
        let line = NewCartLine::new(scope.owner_key(), draft);
        self.api.add_cart_line(&line).await?;
        self.refresh(scope).await
    }

    /// Set a line's quantity, then refresh.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` if the line no longer exists.
    #[instrument(skip(self, scope), fields(owner = %scope.owner_key(), line_id = %line_id))]
    pub async fn update_quantity(
        &self,
        scope: &IdentityScope,
        line_id: &CartLineId,
        quantity: Quantity,
    ) -> Result<CartSnapshot> {
        self.api.update_cart_line(line_id, quantity).await?;
        self.refresh(scope).await
    }

    /// Remove one line, then refresh.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` if the line no longer exists.
    #[instrument(skip(self, scope), fields(owner = %scope.owner_key(), line_id = %line_id))]
    pub async fn remove(&self, scope: &IdentityScope, line_id: &CartLineId) -> Result<CartSnapshot> {
        self.api.remove_cart_line(line_id).await?;
        self.refresh(scope).await
    }

    /// Remove every line for the scope's owner, then refresh.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Network` if the clear or the refresh fails.
    #[instrument(skip(self, scope), fields(owner = %scope.owner_key()))]
    pub async fn clear(&self, scope: &IdentityScope) -> Result<CartSnapshot> {
        self.api.clear_cart(scope.owner_key()).await?;
        self.refresh(scope).await
    }

    fn replace(&self, scope: &IdentityScope, lines: Vec<CartLine>) -> CartSnapshot {
        let mut snapshot = self.snapshot.lock().unwrap_or_else(PoisonError::into_inner);
        if !scope.is_current() || snapshot.epoch > scope.epoch() {
            debug!(
                fetched_epoch = scope.epoch(),
                current_epoch = self.epoch.current(),
                "Discarding cart fetched under a superseded identity"
            );
            return snapshot.clone();
        }
        *snapshot = CartSnapshot {
            owner: scope.owner_key().to_string(),
            epoch: scope.epoch(),
            lines,
        };
        debug!(lines = snapshot.lines.len(), "Cart refreshed");
        snapshot.clone()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use vastrakala_core::{CartLineDraft, GUEST_OWNER_KEY};

    use super::*;
    use crate::error::StoreError;
    use crate::services::auth::{MemoryCredentialStore, SessionIdentity};
    use crate::test_support::{InMemoryApi, product};

    struct Fixture {
        api: Arc<InMemoryApi>,
        session: SessionIdentity,
        cart: CartStore,
    }

    fn fixture() -> Fixture {
        let api = Arc::new(InMemoryApi::with_products(vec![
            product("p-1", 1000),
            product("p-2", 250),
        ]));
        let session = SessionIdentity::new(api.clone(), Arc::new(MemoryCredentialStore::new()));
        let cart = CartStore::new(api.clone(), session.epoch());
        Fixture { api, session, cart }
    }

    fn draft(id: &str, price: i64, qty: u32) -> CartLineDraft {
        CartLineDraft::for_product(
            &product(id, price),
            None,
            None,
            Quantity::new(qty).unwrap(),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_add_merges_and_totals_follow_lines() {
        let f = fixture();
        let scope = f.session.scope();

        f.cart.add(&scope, draft("p-1", 1000, 1)).await.unwrap();
        f.cart.add(&scope, draft("p-2", 250, 2)).await.unwrap();
        let snap = f.cart.add(&scope, draft("p-2", 250, 1)).await.unwrap();

        assert_eq!(snap.owner(), GUEST_OWNER_KEY);
        assert_eq!(snap.lines().len(), 2);
        assert_eq!(snap.count(), 4);
        assert_eq!(snap.total(), Decimal::from(1750));
        assert_eq!(snap.totals().shipping, Decimal::ZERO);
    }

    #[tokio::test]
    async fn test_update_and_remove() {
        let f = fixture();
        let scope = f.session.scope();
        let snap = f.cart.add(&scope, draft("p-2", 250, 1)).await.unwrap();
        let line_id = snap.lines()[0].id.clone();

        let snap = f
            .cart
            .update_quantity(&scope, &line_id, Quantity::new(3).unwrap())
            .await
            .unwrap();
        assert_eq!(snap.count(), 3);
        assert_eq!(snap.total(), Decimal::from(750));
        assert_eq!(snap.totals().shipping, Decimal::from(99));

        let snap = f.cart.remove(&scope, &line_id).await.unwrap();
        assert!(snap.is_empty());
        assert_eq!(snap.total(), Decimal::ZERO);
    }

    #[tokio::test]
    async fn test_missing_line_is_not_found() {
        let f = fixture();
        let scope = f.session.scope();
        let err = f
            .cart
            .update_quantity(&scope, &CartLineId::new("gone"), Quantity::ONE)
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::NotFound(_)));

        let err = f
            .cart
            .remove(&scope, &CartLineId::new("gone"))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_failed_mutation_keeps_confirmed_state() {
        let f = fixture();
        let scope = f.session.scope();
        f.cart.add(&scope, draft("p-1", 1000, 1)).await.unwrap();

        f.api.set_offline(true);
        let err = f.cart.add(&scope, draft("p-2", 250, 5)).await.unwrap_err();
        assert!(matches!(err, StoreError::Network(_)));

        let snap = f.cart.snapshot();
        assert_eq!(snap.lines().len(), 1);
        assert_eq!(snap.total(), Decimal::from(1000));
    }

    #[tokio::test]
    async fn test_clear_empties_only_owner_cart() {
        let f = fixture();
        let guest = f.session.scope();
        f.cart.add(&guest, draft("p-1", 1000, 1)).await.unwrap();
        f.api
            .add_cart_line(&NewCartLine::new("u-other", draft("p-2", 250, 3)))
            .await
            .unwrap();

        let snap = f.cart.clear(&guest).await.unwrap();
        assert!(snap.is_empty());
        assert!(f.api.calls().contains(&"clear_cart:guest".to_string()));
        assert!(f.api.cart_snapshot(GUEST_OWNER_KEY).is_empty());
        let other = f.api.cart_snapshot("u-other");
        assert_eq!(other.len(), 1);
        assert_eq!(other[0].quantity.get(), 3);
    }

    #[tokio::test]
    async fn test_invalidate_hides_lines_until_refresh() {
        let f = fixture();
        let scope = f.session.scope();
        f.cart.add(&scope, draft("p-1", 1000, 1)).await.unwrap();

        f.cart.invalidate();
        assert!(f.cart.snapshot().is_empty());

        let snap = f.cart.refresh(&scope).await.unwrap();
        assert_eq!(snap.count(), 1);
    }
}

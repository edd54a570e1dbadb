//! Wishlist mirror. Only available to signed-in users.

use std::sync::{Arc, Mutex, PoisonError};

use tracing::{debug, instrument};
use vastrakala_core::{ProductId, UserId, WishlistEntry};

use crate::api::{ApiError, StoreApi};
use crate::error::{Result, StoreError};
use crate::services::auth::{IdentityEpoch, IdentityScope};

/// The wishlist as last confirmed by the server.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WishlistSnapshot {
    user: Option<UserId>,
    epoch: u64,
    entries: Vec<WishlistEntry>,
}

impl WishlistSnapshot {
    fn empty(epoch: u64) -> Self {
        Self {
            epoch,
            ..Self::default()
        }
    }

    #[must_use]
    pub const fn user(&self) -> Option<&UserId> {
        self.user.as_ref()
    }

    #[must_use]
    pub fn entries(&self) -> &[WishlistEntry] {
        &self.entries
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn contains(&self, product_id: &ProductId) -> bool {
        self.entries.iter().any(|e| e.product_id() == product_id)
    }
}

pub struct WishlistStore {
    api: Arc<dyn StoreApi>,
    epoch: IdentityEpoch,
    snapshot: Mutex<WishlistSnapshot>,
}

impl WishlistStore {
    #[must_use]
    pub fn new(api: Arc<dyn StoreApi>, epoch: IdentityEpoch) -> Self {
        let snapshot = Mutex::new(WishlistSnapshot::empty(epoch.current()));
        Self {
            api,
            epoch,
            snapshot,
        }
    }

    #[must_use]
    pub fn snapshot(&self) -> WishlistSnapshot {
        let snapshot = self.snapshot.lock().unwrap_or_else(PoisonError::into_inner);
        let current = self.epoch.current();
        if snapshot.epoch == current {
            snapshot.clone()
        } else {
            WishlistSnapshot::empty(current)
        }
    }

    /// Membership according to the local snapshot.
    #[must_use]
    pub fn contains(&self, product_id: &ProductId) -> bool {
        self.snapshot().contains(product_id)
    }

    pub fn invalidate(&self) {
        *self.snapshot.lock().unwrap_or_else(PoisonError::into_inner) =
            WishlistSnapshot::empty(self.epoch.current());
    }

    /// Replace local state with the user's wishlist.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::AuthRequired` for guests and
    /// `StoreError::Network` if the fetch fails.
    #[instrument(skip(self, scope), fields(epoch = scope.epoch()))]
    pub async fn refresh(&self, scope: &IdentityScope) -> Result<WishlistSnapshot> {
        let user = require_user(scope)?;
        let entries = self.api.wishlist(user).await?;
        Ok(self.replace(scope, user, entries))
    }

    /// Flip membership of `product_id` based on the local snapshot, then
    /// refresh. Returns whether the product is now favorited.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::AuthRequired` for guests and
    /// `StoreError::Network` if a call fails.
    #[instrument(skip(self, scope), fields(product_id = %product_id, epoch = scope.epoch()))]
    pub async fn toggle(&self, scope: &IdentityScope, product_id: &ProductId) -> Result<bool> {
        let user = require_user(scope)?;
        let present = self.contains(product_id);

        if present {
            match self.api.remove_from_wishlist(user, product_id).await {
                Ok(()) => {}
                // Already gone server-side; the refresh below reconciles
                Err(ApiError::NotFound(detail)) => {
                    debug!(detail = %detail, "Wishlist entry already removed");
                }
                Err(e) => return Err(e.into()),
            }
        } else {
            self.api.add_to_wishlist(user, product_id).await?;
        }

        self.refresh(scope).await?;
        Ok(!present)
    }

    /// Ask the server whether `product_id` is favorited.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::AuthRequired` for guests and
    /// `StoreError::Network` if the call fails.
    #[instrument(skip(self, scope), fields(product_id = %product_id))]
    pub async fn check(&self, scope: &IdentityScope, product_id: &ProductId) -> Result<bool> {
        let user = require_user(scope)?;
        Ok(self.api.wishlist_contains(user, product_id).await?)
    }

    fn replace(
        &self,
        scope: &IdentityScope,
        user: &UserId,
        entries: Vec<WishlistEntry>,
    ) -> WishlistSnapshot {
        let mut snapshot = self.snapshot.lock().unwrap_or_else(PoisonError::into_inner);
        if !scope.is_current() || snapshot.epoch > scope.epoch() {
            debug!(
                fetched_epoch = scope.epoch(),
                current_epoch = self.epoch.current(),
                "Discarding wishlist fetched under a superseded identity"
            );
            return snapshot.clone();
        }
        *snapshot = WishlistSnapshot {
            user: Some(user.clone()),
            epoch: scope.epoch(),
            entries,
        };
        snapshot.clone()
    }
}

fn require_user(scope: &IdentityScope) -> Result<&UserId> {
    scope.user_id().ok_or(StoreError::AuthRequired)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use vastrakala_core::Email;

    use super::*;
    use crate::api::LoginCredentials;
    use crate::services::auth::{MemoryCredentialStore, SessionIdentity};
    use crate::test_support::{InMemoryApi, product};

    async fn signed_in() -> (Arc<InMemoryApi>, SessionIdentity, WishlistStore) {
        let api = Arc::new(InMemoryApi::with_products(vec![
            product("p-1", 1000),
            product("p-2", 4500),
        ]));
        let session = SessionIdentity::new(api.clone(), Arc::new(MemoryCredentialStore::new()));
        session
            .login(&LoginCredentials::new(
                Email::parse("ira@example.in").unwrap(),
                "Ira",
                "sub-9",
            ))
            .await
            .unwrap();
        let wishlist = WishlistStore::new(api.clone(), session.epoch());
        (api, session, wishlist)
    }

    #[tokio::test]
    async fn test_guest_is_rejected() {
        let api = Arc::new(InMemoryApi::new());
        let session = SessionIdentity::new(api.clone(), Arc::new(MemoryCredentialStore::new()));
        let wishlist = WishlistStore::new(api.clone(), session.epoch());
        let scope = session.scope();

        let err = wishlist
            .toggle(&scope, &ProductId::new("p-1"))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::AuthRequired));
        assert!(matches!(
            wishlist.refresh(&scope).await.unwrap_err(),
            StoreError::AuthRequired
        ));
        assert!(matches!(
            wishlist.check(&scope, &ProductId::new("p-1")).await.unwrap_err(),
            StoreError::AuthRequired
        ));
        // No request reached the backend
        assert!(api.calls().is_empty());
    }

    #[tokio::test]
    async fn test_toggle_twice_restores_membership() {
        let (_api, session, wishlist) = signed_in().await;
        let scope = session.scope();
        let id = ProductId::new("p-2");
        wishlist.refresh(&scope).await.unwrap();
        assert!(!wishlist.contains(&id));

        assert!(wishlist.toggle(&scope, &id).await.unwrap());
        assert!(wishlist.contains(&id));
        assert!(wishlist.check(&scope, &id).await.unwrap());

        assert!(!wishlist.toggle(&scope, &id).await.unwrap());
        assert!(!wishlist.contains(&id));
        assert!(wishlist.snapshot().is_empty());
    }

    #[tokio::test]
    async fn test_stale_local_snapshot_reconciles_on_refresh() {
        let (api, session, wishlist) = signed_in().await;
        let scope = session.scope();
        let id = ProductId::new("p-1");
        wishlist.toggle(&scope, &id).await.unwrap();

        // Removed elsewhere; local snapshot still says present
        api.remove_from_wishlist(scope.user_id().unwrap(), &id)
            .await
            .unwrap();
        assert!(wishlist.contains(&id));

        assert!(!wishlist.toggle(&scope, &id).await.unwrap());
        assert!(!wishlist.contains(&id));
    }

    #[tokio::test]
    async fn test_entries_carry_product_snapshot() {
        let (_api, session, wishlist) = signed_in().await;
        let scope = session.scope();
        wishlist.toggle(&scope, &ProductId::new("p-2")).await.unwrap();

        let snap = wishlist.snapshot();
        assert_eq!(snap.len(), 1);
        assert_eq!(snap.entries()[0].product.price, rust_decimal::Decimal::from(4500));
        assert_eq!(snap.user(), scope.user_id());
    }
}

//! Session identity.
//!
//! Exactly one identity is active at a time: the guest sentinel or an
//! authenticated user. Every switch advances an [`IdentityEpoch`]; work that
//! started under an earlier epoch can tell its result is stale through
//! [`IdentityScope::is_current`] and must discard it.

mod credentials;
mod error;

pub use credentials::{CredentialStore, FileCredentialStore, MemoryCredentialStore, STORAGE_KEY};
pub use error::{AuthError, CredentialStoreError};

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use tracing::{info, instrument, warn};
use vastrakala_core::{AuthenticatedUser, Identity, UserId};

use crate::api::{LoginCredentials, StoreApi};
use crate::error::{add_breadcrumb, clear_sentry_user, set_sentry_user};

/// Identity provider used for the login exchange.
pub const AUTH_PROVIDER: &str = "google";

/// Monotonic counter of identity switches, shared with the stores.
#[derive(Debug, Clone, Default)]
pub struct IdentityEpoch(Arc<AtomicU64>);

impl IdentityEpoch {
    #[must_use]
    pub fn current(&self) -> u64 {
        self.0.load(Ordering::SeqCst)
    }

    fn advance(&self) -> u64 {
        self.0.fetch_add(1, Ordering::SeqCst) + 1
    }
}

/// The identity an operation runs under, captured when it starts.
#[derive(Debug, Clone)]
pub struct IdentityScope {
    identity: Identity,
    epoch: u64,
    clock: IdentityEpoch,
}

impl IdentityScope {
    #[must_use]
    pub const fn identity(&self) -> &Identity {
        &self.identity
    }

    #[must_use]
    pub const fn epoch(&self) -> u64 {
        self.epoch
    }

    /// Key the backend files this identity's cart and orders under.
    #[must_use]
    pub fn owner_key(&self) -> &str {
        self.identity.owner_key()
    }

    /// The signed-in user id, if any.
    #[must_use]
    pub fn user_id(&self) -> Option<&UserId> {
        self.identity.user().map(|u| &u.id)
    }

    /// False once the session has switched identity since this scope was taken.
    #[must_use]
    pub fn is_current(&self) -> bool {
        self.clock.current() == self.epoch
    }
}

/// The session's acting identity and its persisted record.
pub struct SessionIdentity {
    api: Arc<dyn StoreApi>,
    credentials: Arc<dyn CredentialStore>,
    identity: Mutex<Identity>,
    epoch: IdentityEpoch,
}

impl SessionIdentity {
    /// Start as guest. Call [`restore`](Self::restore) to pick up a persisted identity.
    #[must_use]
    pub fn new(api: Arc<dyn StoreApi>, credentials: Arc<dyn CredentialStore>) -> Self {
        Self {
            api,
            credentials,
            identity: Mutex::new(Identity::Guest),
            epoch: IdentityEpoch::default(),
        }
    }

    /// Handle to the epoch counter, for stores that tag their snapshots.
    #[must_use]
    pub fn epoch(&self) -> IdentityEpoch {
        self.epoch.clone()
    }

    /// Capture the current identity and epoch.
    #[must_use]
    pub fn scope(&self) -> IdentityScope {
        let identity = self.identity.lock().unwrap_or_else(PoisonError::into_inner);
        IdentityScope {
            identity: identity.clone(),
            epoch: self.epoch.current(),
            clock: self.epoch.clone(),
        }
    }

    #[must_use]
    pub fn current(&self) -> Identity {
        self.identity
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Load the persisted identity. An unreadable record is logged and
    /// treated as absent.
    #[instrument(skip(self))]
    pub async fn restore(&self) -> IdentityScope {
        let identity = match self.credentials.load().await {
            Ok(Some(user)) => {
                set_sentry_user(&user.id, Some(user.email.as_str()));
                Identity::Authenticated(user)
            }
            Ok(None) => Identity::Guest,
            Err(e) => {
                warn!(error = %e, "Ignoring unreadable persisted identity");
                Identity::Guest
            }
        };
        info!(identity = %identity, "Session restored");
        self.switch(identity)
    }

    /// Exchange credentials with the identity provider and persist the result.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Exchange` if the provider call fails and
    /// `AuthError::Persist` if the identity cannot be saved. The session
    /// identity is unchanged on error.
    #[instrument(skip(self, credentials), fields(email = %credentials.email))]
    pub async fn login(
        &self,
        credentials: &LoginCredentials,
    ) -> Result<(AuthenticatedUser, IdentityScope), AuthError> {
        let response = self
            .api
            .authenticate(AUTH_PROVIDER, credentials)
            .await
            .map_err(AuthError::Exchange)?;
        let user = response.user;

        self.credentials.save(&user).await?;

        set_sentry_user(&user.id, Some(user.email.as_str()));
        add_breadcrumb("auth", "Signed in", Some(&[("user_id", user.id.as_str())]));
        info!(user_id = %user.id, is_new = response.is_new, "Signed in");

        let scope = self.switch(Identity::Authenticated(user.clone()));
        Ok((user, scope))
    }

    /// Drop back to guest. Always succeeds; a failure to remove the persisted
    /// record is logged.
    #[instrument(skip(self))]
    pub async fn logout(&self) -> IdentityScope {
        if let Err(e) = self.credentials.clear().await {
            warn!(error = %e, "Failed to remove persisted identity");
        }
        clear_sentry_user();
        add_breadcrumb("auth", "Signed out", None);
        info!("Signed out");
        self.switch(Identity::Guest)
    }

    fn switch(&self, identity: Identity) -> IdentityScope {
        let mut current = self.identity.lock().unwrap_or_else(PoisonError::into_inner);
        *current = identity.clone();
        let epoch = self.epoch.advance();
        IdentityScope {
            identity,
            epoch,
            clock: self.epoch.clone(),
        }
    }
}

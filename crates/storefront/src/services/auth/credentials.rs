//! Persisted identity record.
//!
//! One record lives under the fixed storage key [`STORAGE_KEY`]; it is
//! written on login and removed on logout.

use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;
use tracing::{debug, instrument};
use vastrakala_core::AuthenticatedUser;

use super::error::CredentialStoreError;

/// Storage key for the persisted identity.
pub const STORAGE_KEY: &str = "vastrakala_user";

/// Where the signed-in identity is kept between runs.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Read the stored identity, if any.
    async fn load(&self) -> Result<Option<AuthenticatedUser>, CredentialStoreError>;
    /// Replace the stored identity.
    async fn save(&self, user: &AuthenticatedUser) -> Result<(), CredentialStoreError>;
    /// Remove the stored identity. Removing an absent record succeeds.
    async fn clear(&self) -> Result<(), CredentialStoreError>;
}

/// JSON file `<state_dir>/vastrakala_user.json`.
#[derive(Debug, Clone)]
pub struct FileCredentialStore {
    path: PathBuf,
}

impl FileCredentialStore {
    #[must_use]
    pub fn new(state_dir: &Path) -> Self {
        Self {
            path: state_dir.join(format!("{STORAGE_KEY}.json")),
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl CredentialStore for FileCredentialStore {
    #[instrument(skip(self), fields(path = %self.path.display()))]
    async fn load(&self) -> Result<Option<AuthenticatedUser>, CredentialStoreError> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        Ok(Some(serde_json::from_slice(&bytes)?))
    }

    #[instrument(skip(self, user), fields(path = %self.path.display(), user_id = %user.id))]
    async fn save(&self, user: &AuthenticatedUser) -> Result<(), CredentialStoreError> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        let json = serde_json::to_vec_pretty(user)?;

        // Write then rename so a crash never leaves a half-written record
        let tmp = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp, json).await?;
        tokio::fs::rename(&tmp, &self.path).await?;
        debug!("Identity persisted");
        Ok(())
    }

    #[instrument(skip(self), fields(path = %self.path.display()))]
    async fn clear(&self) -> Result<(), CredentialStoreError> {
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// In-process store, for tests and ephemeral sessions.
#[derive(Debug, Default)]
pub struct MemoryCredentialStore {
    record: Mutex<Option<AuthenticatedUser>>,
}

impl MemoryCredentialStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_user(user: AuthenticatedUser) -> Self {
        Self {
            record: Mutex::new(Some(user)),
        }
    }
}

#[async_trait]
impl CredentialStore for MemoryCredentialStore {
    async fn load(&self) -> Result<Option<AuthenticatedUser>, CredentialStoreError> {
        Ok(self
            .record
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone())
    }

    async fn save(&self, user: &AuthenticatedUser) -> Result<(), CredentialStoreError> {
        *self.record.lock().unwrap_or_else(PoisonError::into_inner) = Some(user.clone());
        Ok(())
    }

    async fn clear(&self) -> Result<(), CredentialStoreError> {
        *self.record.lock().unwrap_or_else(PoisonError::into_inner) = None;
        Ok(())
    }
}

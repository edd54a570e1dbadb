//! Authentication error types.

use thiserror::Error;

use crate::api::ApiError;

/// Errors that can occur during login.
///
/// Any of these leaves the session identity unchanged.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Invalid email format.
    #[error("invalid email: {0}")]
    InvalidEmail(#[from] vastrakala_core::EmailError),

    /// The identity provider exchange failed.
    #[error("login exchange failed: {0}")]
    Exchange(#[source] ApiError),

    /// The signed-in identity could not be persisted.
    #[error("could not persist identity: {0}")]
    Persist(#[from] CredentialStoreError),
}

/// Errors reading or writing the persisted identity record.
#[derive(Debug, Error)]
pub enum CredentialStoreError {
    /// Filesystem operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The stored record is not a valid identity.
    #[error("corrupt identity record: {0}")]
    Corrupt(#[from] serde_json::Error),
}

//! Errors surfaced by the `vk` binary.

use vastrakala_core::EmailError;
use vastrakala_storefront::StoreError;
use vastrakala_storefront::api::ApiError;

#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("failed to build HTTP client: {0}")]
    Client(#[from] ApiError),

    #[error("invalid email: {0}")]
    Email(#[from] EmailError),

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("failed to write output: {0}")]
    Io(#[from] std::io::Error),
}

impl CliError {
    /// Log the failure; store failures go through Sentry capture first.
    pub fn report(&self) {
        match self {
            Self::Store(err) => {
                err.capture();
                tracing::error!("{}", err.user_message());
            }
            other => tracing::error!("{other}"),
        }
    }
}

//! Unified error handling with Sentry integration.
//!
//! Every store operation returns `Result<T, StoreError>`. The view layer
//! shows [`StoreError::user_message`] and calls [`StoreError::capture`] so
//! transport failures reach Sentry without leaking detail to the shopper.

use thiserror::Error;
use vastrakala_core::ValidationError;

use crate::api::ApiError;
use crate::services::auth::AuthError;
use crate::services::checkout::CheckoutError;

/// Store-level error type.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Client-side validation failed; no request was sent.
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Login exchange or identity persistence failed.
    #[error("Auth error: {0}")]
    Auth(#[from] AuthError),

    /// An authenticated-only operation was attempted as a guest.
    #[error("Sign-in required")]
    AuthRequired,

    /// The referenced record does not exist on the server.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Checkout halted at a stage.
    #[error(transparent)]
    Checkout(#[from] CheckoutError),

    /// Any other transport or server failure.
    #[error("Network error: {0}")]
    Network(ApiError),
}

impl From<ApiError> for StoreError {
    fn from(err: ApiError) -> Self {
        match err {
            ApiError::NotFound(what) => Self::NotFound(what),
            other => Self::Network(other),
        }
    }
}

impl StoreError {
    /// Text safe to show to the shopper.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Validation(err) => err.to_string(),
            Self::Auth(err) => match err {
                AuthError::InvalidEmail(_) => "Invalid email address".to_string(),
                AuthError::Exchange(_) => "Sign-in failed, please try again".to_string(),
                AuthError::Persist(_) => "Could not save your sign-in on this device".to_string(),
            },
            Self::AuthRequired => "Please sign in to continue".to_string(),
            Self::NotFound(what) => what.clone(),
            Self::Checkout(err) => err.user_message(),
            // Don't expose transport details
            Self::Network(ApiError::RateLimited(secs)) => {
                format!("Too many requests, please retry in {secs} seconds")
            }
            Self::Network(_) => "Could not reach the store, please try again".to_string(),
        }
    }

    /// Whether this error indicates a server or transport problem.
    #[must_use]
    pub const fn is_transport(&self) -> bool {
        match self {
            Self::Network(_) | Self::Auth(AuthError::Exchange(_) | AuthError::Persist(_)) => true,
            Self::Checkout(err) => err.is_transport(),
            _ => false,
        }
    }

    /// Report transport failures to Sentry and log them with the event id.
    pub fn capture(&self) {
        if self.is_transport() {
            let event_id = sentry::capture_error(self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Store operation failed"
            );
        } else {
            tracing::debug!(error = %self, "Store operation rejected");
        }
    }
}

/// Result type alias for `StoreError`.
pub type Result<T> = std::result::Result<T, StoreError>;

/// Set the Sentry user context from a user ID.
///
/// Call this after successful authentication to associate errors with users.
pub fn set_sentry_user(user_id: &impl ToString, email: Option<&str>) {
    sentry::configure_scope(|scope| {
        scope.set_user(Some(sentry::User {
            id: Some(user_id.to_string()),
            email: email.map(String::from),
            ..Default::default()
        }));
    });
}

/// Clear the Sentry user context.
///
/// Call this on logout to stop associating errors with the user.
pub fn clear_sentry_user() {
    sentry::configure_scope(|scope| {
        scope.set_user(None);
    });
}

/// Add a breadcrumb for user actions.
///
/// Breadcrumbs appear in Sentry error reports to show the trail of user actions
/// leading up to an error.
///
/// # Example
///
/// ```rust,ignore
/// add_breadcrumb("checkout", "Order created", Some(&[("order_id", "o-1")]));
/// ```
pub fn add_breadcrumb(category: &str, message: &str, data: Option<&[(&str, &str)]>) {
    let mut breadcrumb = sentry::Breadcrumb {
        category: Some(category.to_string()),
        message: Some(message.to_string()),
        level: sentry::Level::Info,
        ..Default::default()
    };

    if let Some(pairs) = data {
        for (key, value) in pairs {
            breadcrumb.data.insert(
                (*key).to_string(),
                serde_json::Value::String((*value).to_string()),
            );
        }
    }

    sentry::add_breadcrumb(breadcrumb);
}

//! Vastrakala storefront client.
//!
//! Keeps a shopper's cart, wishlist and orders consistent with the
//! storefront backend across guest and signed-in sessions, and drives
//! checkout from cart to paid order.
//!
//! [`state::AppState`] is the entry point; everything else is reachable
//! through it.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod api;
pub mod config;
pub mod error;
pub mod services;
pub mod state;

#[cfg(test)]
mod test_support;

pub use config::StorefrontConfig;
pub use error::StoreError;
pub use state::AppState;

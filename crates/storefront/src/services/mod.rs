//! Client-side services.
//!
//! # Services
//!
//! - `auth` - Session identity, persisted credentials, identity epochs
//! - `cart` - Cart mirror refreshed after every mutation
//! - `wishlist` - Wishlist mirror for signed-in users
//! - `checkout` - Order creation, payment and cart clearing
//! - `orders` - Order history and tracking timelines
//! - `admin` - Order status updates

pub mod admin;
pub mod auth;
pub mod cart;
pub mod checkout;
pub mod orders;
pub mod wishlist;

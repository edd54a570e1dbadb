//! Core types for Vastrakala.
//!
//! This module provides type-safe wrappers for the storefront domain.

pub mod cart;
pub mod id;
pub mod identity;
pub mod money;
pub mod order;
pub mod product;
pub mod status;
pub mod timestamp;
pub mod validation;
pub mod wishlist;

pub use cart::{CartLine, CartLineDraft, Quantity, QuantityError, cart_count, cart_total};
pub use id::*;
pub use identity::{AuthenticatedUser, Email, EmailError, GUEST_OWNER_KEY, Identity};
pub use money::{FLAT_SHIPPING, FREE_SHIPPING_THRESHOLD, OrderTotals, shipping_for};
pub use order::{Order, OrderItem, ShippingAddress, TrackingEvent};
pub use product::{FilterOptions, PriceRange, Product, ProductQuery, ProductVariant, SortOrder};
pub use status::{Milestone, OrderStatus, PaymentStatus};
pub use validation::ValidationError;
pub use wishlist::WishlistEntry;

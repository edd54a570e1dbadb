//! Vastrakala Core - Domain types for the storefront client.
//!
//! This crate provides the types shared by every Vastrakala component:
//! - `storefront` - Cart, wishlist, checkout and order-tracking synchronization
//! - `cli` - Command-line front end driving the storefront state
//! - `integration-tests` - Mock backend and end-to-end tests
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no HTTP
//! clients, no persistence. Cart totals, the shipping rule and address
//! validation live here so that every caller computes them identically.
//!
//! # Modules
//!
//! - [`types`] - Ids, money, identity, cart lines, products, orders and tracking

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;

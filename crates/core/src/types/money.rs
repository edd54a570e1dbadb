//! Money arithmetic and the shipping rule.
//!
//! All amounts are in rupees as [`Decimal`]; the backend sends them as JSON
//! numbers. The same shipping rule feeds the cart display and the order
//! submission, so it lives here rather than in either caller.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::cart::{CartLine, cart_total};

/// Subtotal at or above which shipping is free.
pub const FREE_SHIPPING_THRESHOLD: Decimal = Decimal::from_parts(999, 0, 0, false, 0);

/// Flat shipping charge below the free-shipping threshold.
pub const FLAT_SHIPPING: Decimal = Decimal::from_parts(99, 0, 0, false, 0);

/// Shipping charge for a given subtotal.
#[must_use]
pub fn shipping_for(subtotal: Decimal) -> Decimal {
    if subtotal >= FREE_SHIPPING_THRESHOLD {
        Decimal::ZERO
    } else {
        FLAT_SHIPPING
    }
}

/// Subtotal, shipping and grand total for a set of cart lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderTotals {
    pub subtotal: Decimal,
    pub shipping: Decimal,
    pub total: Decimal,
}

impl OrderTotals {
    /// Totals for an explicit subtotal.
    #[must_use]
    pub fn from_subtotal(subtotal: Decimal) -> Self {
        let shipping = shipping_for(subtotal);
        Self {
            subtotal,
            shipping,
            total: subtotal + shipping,
        }
    }

    /// Totals recomputed from the given line set.
    #[must_use]
    pub fn for_lines(lines: &[CartLine]) -> Self {
        Self::from_subtotal(cart_total(lines))
    }
}

//! Cart lines and the pure functions derived from them.

use core::fmt;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::id::{CartLineId, ProductId};
use super::product::Product;
use super::validation::ValidationError;

/// Errors constructing a [`Quantity`].
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuantityError {
    #[error("quantity must be at least 1")]
    Zero,
}

/// A line quantity; never zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct Quantity(u32);

impl Quantity {
    pub const ONE: Self = Self(1);

    /// # Errors
    ///
    /// Returns [`QuantityError::Zero`] for 0.
    pub const fn new(value: u32) -> Result<Self, QuantityError> {
        if value == 0 {
            Err(QuantityError::Zero)
        } else {
            Ok(Self(value))
        }
    }

    /// Clamp an arbitrary requested quantity into range; anything below 1
    /// becomes 1.
    #[must_use]
    pub fn clamped(requested: i64) -> Self {
        Self(u32::try_from(requested.max(1)).unwrap_or(u32::MAX))
    }

    #[must_use]
    pub const fn get(self) -> u32 {
        self.0
    }

    /// Serde adapter for quantities read from the backend, which stores
    /// whatever integer it was sent. Out-of-range values are clamped the
    /// same way [`Quantity::clamped`] does.
    ///
    /// # Errors
    ///
    /// Fails when the value is not an integer.
    pub fn deserialize_clamped<'de, D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        i64::deserialize(deserializer).map(Self::clamped)
    }
}

impl TryFrom<u32> for Quantity {
    type Error = QuantityError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Quantity> for u32 {
    fn from(q: Quantity) -> Self {
        q.0
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A cart line as the backend stores it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLine {
    pub id: CartLineId,
    /// Owner key: a user id or the guest sentinel.
    pub user_id: String,
    pub product_id: ProductId,
    pub product_name: String,
    pub product_image: String,
    pub price: Decimal,
    pub size: String,
    pub color: String,
    #[serde(deserialize_with = "Quantity::deserialize_clamped")]
    pub quantity: Quantity,
    #[serde(default = "Utc::now", deserialize_with = "super::timestamp::deserialize")]
    pub added_at: DateTime<Utc>,
}

impl CartLine {
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.price * Decimal::from(self.quantity.get())
    }
}

/// Sum of `price * quantity` over the lines.
#[must_use]
pub fn cart_total(lines: &[CartLine]) -> Decimal {
    lines.iter().map(CartLine::line_total).sum()
}

/// Sum of quantities over the lines.
#[must_use]
pub fn cart_count(lines: &[CartLine]) -> u64 {
    lines.iter().map(|l| u64::from(l.quantity.get())).sum()
}

/// A line about to be added to a cart. The owner is attached by the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartLineDraft {
    pub product_id: ProductId,
    pub product_name: String,
    pub product_image: String,
    pub price: Decimal,
    pub size: String,
    pub color: String,
    pub quantity: Quantity,
}

impl CartLineDraft {
    /// Build a draft for `product`, checking the size/colour selection.
    ///
    /// When the product offers exactly one option for a dimension and none
    /// was chosen, that option is used.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::VariantNotSelected`] when the product
    /// defines options for a dimension and no valid option was chosen.
    pub fn for_product(
        product: &Product,
        size: Option<&str>,
        color: Option<&str>,
        quantity: Quantity,
    ) -> Result<Self, ValidationError> {
        let size = pick_option(
            "size",
            size,
            product.sizes.iter().map(String::as_str).collect(),
        )?;
        let color = pick_option("color", color, product.colors().collect())?;

        Ok(Self {
            product_id: product.id.clone(),
            product_name: product.name.clone(),
            product_image: product.display_image().to_owned(),
            price: product.price,
            size,
            color,
            quantity,
        })
    }
}

fn pick_option(
    field: &'static str,
    chosen: Option<&str>,
    offered: Vec<&str>,
) -> Result<String, ValidationError> {
    let chosen = chosen.map(str::trim).filter(|c| !c.is_empty());
    match (chosen, offered.as_slice()) {
        (None, []) => Ok(String::new()),
        (None, [only]) => Ok((*only).to_owned()),
        (None, _) => Err(ValidationError::VariantNotSelected(field)),
        (Some(c), []) => Ok(c.to_owned()),
        (Some(c), options) if options.iter().any(|o| o.eq_ignore_ascii_case(c)) => {
            Ok(c.to_owned())
        }
        (Some(_), _) => Err(ValidationError::VariantNotSelected(field)),
    }
}

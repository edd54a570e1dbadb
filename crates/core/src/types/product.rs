//! Catalog shapes returned by the backend.
//!
//! The client does not search or rank products itself; these types exist so
//! that catalog responses and denormalized wishlist snapshots deserialize.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::id::ProductId;

/// A colour variant of a product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductVariant {
    pub color: String,
    pub color_code: String,
    #[serde(default)]
    pub images: Vec<String>,
}

/// A catalog product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub description: String,
    pub price: Decimal,
    #[serde(default)]
    pub original_price: Option<Decimal>,
    pub category: String,
    #[serde(default)]
    pub subcategory: Option<String>,
    #[serde(default)]
    pub sizes: Vec<String>,
    #[serde(default)]
    pub variants: Vec<ProductVariant>,
    #[serde(default)]
    pub main_image: String,
    #[serde(default)]
    pub fabric: Option<String>,
    #[serde(default)]
    pub occasion: Option<String>,
    #[serde(default)]
    pub is_featured: bool,
    #[serde(default)]
    pub is_new_arrival: bool,
    #[serde(deserialize_with = "super::timestamp::deserialize")]
    pub created_at: DateTime<Utc>,
}

impl Product {
    /// Image to show for the product, falling back to the first variant image.
    #[must_use]
    pub fn display_image(&self) -> &str {
        if !self.main_image.is_empty() {
            return &self.main_image;
        }
        self.variants
            .iter()
            .flat_map(|v| v.images.iter())
            .next()
            .map_or("", String::as_str)
    }

    /// Colour names offered for this product.
    pub fn colors(&self) -> impl Iterator<Item = &str> {
        self.variants.iter().map(|v| v.color.as_str())
    }

    /// Percentage off the original price, rounded down.
    #[must_use]
    pub fn discount_percent(&self) -> Option<u32> {
        let original = self.original_price.filter(|o| *o > self.price)?;
        let pct = (original - self.price) * Decimal::ONE_HUNDRED / original;
        u32::try_from(pct.trunc().mantissa()).ok()
    }
}

/// Sort order for catalog listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    PriceAsc,
    PriceDesc,
    #[default]
    Newest,
}

impl SortOrder {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::PriceAsc => "price_asc",
            Self::PriceDesc => "price_desc",
            Self::Newest => "newest",
        }
    }
}

/// Catalog filter parameters, passed through to `GET /products`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductQuery {
    pub category: Option<String>,
    pub featured: Option<bool>,
    pub new_arrival: Option<bool>,
    pub search: Option<String>,
    pub min_price: Option<Decimal>,
    pub max_price: Option<Decimal>,
    pub fabric: Option<String>,
    pub occasion: Option<String>,
    pub sort_by: Option<SortOrder>,
}

impl ProductQuery {
    /// Non-empty parameters as query-string pairs.
    #[must_use]
    pub fn to_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        let mut push = |key, value: Option<String>| {
            if let Some(v) = value.filter(|v| !v.is_empty()) {
                pairs.push((key, v));
            }
        };
        push("category", self.category.clone());
        push("featured", self.featured.map(|b| b.to_string()));
        push("new_arrival", self.new_arrival.map(|b| b.to_string()));
        push("search", self.search.clone());
        push("min_price", self.min_price.map(|p| p.to_string()));
        push("max_price", self.max_price.map(|p| p.to_string()));
        push("fabric", self.fabric.clone());
        push("occasion", self.occasion.clone());
        push("sort_by", self.sort_by.map(|s| s.as_str().to_owned()));
        pairs
    }
}

/// Price bounds across the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceRange {
    pub min_price: Decimal,
    pub max_price: Decimal,
}

/// Filter facets offered by `GET /products/filters`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterOptions {
    #[serde(default)]
    pub fabrics: Vec<String>,
    #[serde(default)]
    pub occasions: Vec<String>,
    pub price_range: PriceRange,
}

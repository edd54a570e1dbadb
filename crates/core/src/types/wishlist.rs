//! Wishlist entries.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::id::{ProductId, WishlistEntryId};
use super::product::Product;

/// A favourited product, with the product denormalized at read time.
///
/// Entries are unique per `(user, product)`; the backend drops entries whose
/// product no longer exists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WishlistEntry {
    pub wishlist_id: WishlistEntryId,
    pub product: Product,
    #[serde(deserialize_with = "super::timestamp::deserialize")]
    pub added_at: DateTime<Utc>,
}

impl WishlistEntry {
    #[must_use]
    pub const fn product_id(&self) -> &ProductId {
        &self.product.id
    }
}

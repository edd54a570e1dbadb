//! Status enums for orders and payments.
//!
//! Both travel as plain lowercase strings. Unknown strings are preserved in
//! an `Other` variant and displayed verbatim, so a status the backend adds
//! later never breaks deserialization.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Order fulfilment status, driven by admin tracking updates.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum OrderStatus {
    #[default]
    Pending,
    Confirmed,
    Packed,
    Shipped,
    InTransit,
    OutForDelivery,
    Delivered,
    /// A status string this client does not know.
    Other(String),
}

/// The five canonical steps an order moves through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Milestone {
    Pending,
    Confirmed,
    Packed,
    Shipped,
    Delivered,
}

impl Milestone {
    /// All milestones in progression order.
    pub const ALL: [Self; 5] = [
        Self::Pending,
        Self::Confirmed,
        Self::Packed,
        Self::Shipped,
        Self::Delivered,
    ];

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Pending => "Order placed",
            Self::Confirmed => "Confirmed",
            Self::Packed => "Packed",
            Self::Shipped => "Shipped",
            Self::Delivered => "Delivered",
        }
    }
}

impl OrderStatus {
    /// Wire representation.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Pending => "pending",
            Self::Confirmed => "confirmed",
            Self::Packed => "packed",
            Self::Shipped => "shipped",
            Self::InTransit => "in_transit",
            Self::OutForDelivery => "out_for_delivery",
            Self::Delivered => "delivered",
            Self::Other(s) => s,
        }
    }

    /// Milestone this status counts towards. Transit sub-states sit on the
    /// `Shipped` step; unknown statuses have no place on the progress bar.
    #[must_use]
    pub const fn milestone(&self) -> Option<Milestone> {
        match self {
            Self::Pending => Some(Milestone::Pending),
            Self::Confirmed => Some(Milestone::Confirmed),
            Self::Packed => Some(Milestone::Packed),
            Self::Shipped | Self::InTransit | Self::OutForDelivery => Some(Milestone::Shipped),
            Self::Delivered => Some(Milestone::Delivered),
            Self::Other(_) => None,
        }
    }

    /// Message the backend records when an update carries none.
    #[must_use]
    pub fn default_message(&self) -> String {
        match self {
            Self::Pending => "Order placed successfully".to_owned(),
            Self::Confirmed => "Order confirmed and being processed".to_owned(),
            Self::Packed => "Order has been packed and ready for dispatch".to_owned(),
            Self::Shipped => "Order has been shipped".to_owned(),
            Self::InTransit => "Order is in transit".to_owned(),
            Self::OutForDelivery => "Order is out for delivery".to_owned(),
            Self::Delivered => "Order has been delivered successfully".to_owned(),
            Self::Other(s) => format!("Status updated to {s}"),
        }
    }

    #[must_use]
    pub const fn is_delivered(&self) -> bool {
        matches!(self, Self::Delivered)
    }
}

impl From<String> for OrderStatus {
    fn from(s: String) -> Self {
        match s.as_str() {
            "pending" => Self::Pending,
            "confirmed" => Self::Confirmed,
            "packed" => Self::Packed,
            "shipped" => Self::Shipped,
            "in_transit" => Self::InTransit,
            "out_for_delivery" => Self::OutForDelivery,
            "delivered" => Self::Delivered,
            _ => Self::Other(s),
        }
    }
}

impl From<&str> for OrderStatus {
    fn from(s: &str) -> Self {
        Self::from(s.to_owned())
    }
}

impl From<OrderStatus> for String {
    fn from(status: OrderStatus) -> Self {
        match status {
            OrderStatus::Other(s) => s,
            known => known.as_str().to_owned(),
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// Payment status of an order.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum PaymentStatus {
    #[default]
    Pending,
    Completed,
    Failed,
    Other(String),
}

impl PaymentStatus {
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Pending => "pending",
            Self::Completed => "completed",
            Self::Failed => "failed",
            Self::Other(s) => s,
        }
    }

    #[must_use]
    pub const fn is_paid(&self) -> bool {
        matches!(self, Self::Completed)
    }
}

impl From<String> for PaymentStatus {
    fn from(s: String) -> Self {
        match s.as_str() {
            "pending" => Self::Pending,
            // Some gateways report "paid"; treat it the same as "completed".
            "completed" | "paid" => Self::Completed,
            "failed" => Self::Failed,
            _ => Self::Other(s),
        }
    }
}

impl From<PaymentStatus> for String {
    fn from(status: PaymentStatus) -> Self {
        match status {
            PaymentStatus::Other(s) => s,
            known => known.as_str().to_owned(),
        }
    }
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_known_statuses_parse() {
        let status: OrderStatus = serde_json::from_str("\"out_for_delivery\"").unwrap();
        assert_eq!(status, OrderStatus::OutForDelivery);
        assert_eq!(status.milestone(), Some(Milestone::Shipped));
    }

    #[test]
    fn test_unknown_status_passes_through() {
        let status: OrderStatus = serde_json::from_str("\"returned_to_sender\"").unwrap();
        assert_eq!(status, OrderStatus::Other("returned_to_sender".to_owned()));
        assert_eq!(status.to_string(), "returned_to_sender");
        assert_eq!(status.milestone(), None);
        assert_eq!(
            serde_json::to_string(&status).unwrap(),
            "\"returned_to_sender\""
        );
    }

    #[test]
    fn test_default_messages() {
        assert_eq!(
            OrderStatus::Packed.default_message(),
            "Order has been packed and ready for dispatch"
        );
        assert_eq!(
            OrderStatus::from("held").default_message(),
            "Status updated to held"
        );
    }

    #[test]
    fn test_milestones_are_ordered() {
        assert!(Milestone::Pending < Milestone::Delivered);
        assert_eq!(Milestone::ALL.len(), 5);
    }

    #[test]
    fn test_payment_status() {
        let paid: PaymentStatus = serde_json::from_str("\"completed\"").unwrap();
        assert!(paid.is_paid());
        assert!(!PaymentStatus::Pending.is_paid());
        assert_eq!(
            PaymentStatus::from("refunded".to_owned()).to_string(),
            "refunded"
        );
    }
}

//! Client-detectable input errors, raised before any network call.

use thiserror::Error;

/// Input rejected on the client side.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Checkout attempted with nothing in the cart.
    #[error("cart is empty")]
    EmptyCart,

    /// Required shipping address fields are blank.
    #[error("missing required fields: {}", .0.join(", "))]
    MissingFields(Vec<&'static str>),

    /// The product defines options for this dimension and none valid was chosen.
    #[error("please select a {0}")]
    VariantNotSelected(&'static str),

    #[error("invalid quantity: {0}")]
    Quantity(#[from] super::cart::QuantityError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_fields_message_lists_all() {
        let err = ValidationError::MissingFields(vec!["phone", "pincode"]);
        assert_eq!(err.to_string(), "missing required fields: phone, pincode");
    }
}

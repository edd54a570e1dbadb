//! Checkout: cart + address → paid order.
//!
//! The attempt walks a linear sequence of stages and halts at the first
//! failure:
//!
//! ```text
//! AddressCollected → OrderCreated → PaymentInitiated → PaymentVerified → CartCleared → Complete
//! ```
//!
//! Nothing is rolled back. An order created before a later failure stays on
//! the server unpaid, and the error carries it so the caller can show it.
//! The cart is cleared only after verification succeeds.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;
use tracing::{info, instrument, warn};
use uuid::Uuid;
use vastrakala_core::{Order, OrderItem, PaymentStatus, ShippingAddress, ValidationError};

use crate::api::{ApiError, CreateOrderRequest, PaymentConfirmation, PaymentHandle, StoreApi};
use crate::error::add_breadcrumb;
use crate::services::auth::IdentityScope;
use crate::services::cart::CartSnapshot;

/// Checkout progress, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum CheckoutStage {
    AddressCollected,
    OrderCreated,
    PaymentInitiated,
    PaymentVerified,
    CartCleared,
    Complete,
}

impl CheckoutStage {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::AddressCollected => "address_collected",
            Self::OrderCreated => "order_created",
            Self::PaymentInitiated => "payment_initiated",
            Self::PaymentVerified => "payment_verified",
            Self::CartCleared => "cart_cleared",
            Self::Complete => "complete",
        }
    }
}

impl fmt::Display for CheckoutStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why a checkout attempt stopped.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// Empty cart or incomplete address. No request was sent.
    #[error("checkout precondition failed: {0}")]
    Validation(#[from] ValidationError),

    /// The order was not created. The cart is untouched.
    #[error("order creation failed: {0}")]
    OrderCreationFailed(#[source] ApiError),

    /// The order exists but no payment could be started for it.
    #[error("payment initiation failed for order {}: {source}", order.id)]
    PaymentInitiationFailed {
        order: Box<Order>,
        #[source]
        source: ApiError,
    },

    /// Payment was not verified. The order stays unpaid and the cart is untouched.
    #[error("payment verification failed for order {}: {source}", order.id)]
    PaymentVerificationFailed {
        order: Box<Order>,
        #[source]
        source: ApiError,
    },

    /// Payment succeeded but the cart could not be cleared.
    #[error("order {} is paid but the cart could not be cleared: {source}", order.id)]
    CartClearFailed {
        order: Box<Order>,
        #[source]
        source: ApiError,
    },
}

impl CheckoutError {
    /// The stage the attempt failed to reach.
    #[must_use]
    pub const fn stage(&self) -> CheckoutStage {
        match self {
            Self::Validation(_) => CheckoutStage::AddressCollected,
            Self::OrderCreationFailed(_) => CheckoutStage::OrderCreated,
            Self::PaymentInitiationFailed { .. } => CheckoutStage::PaymentInitiated,
            Self::PaymentVerificationFailed { .. } => CheckoutStage::PaymentVerified,
            Self::CartClearFailed { .. } => CheckoutStage::CartCleared,
        }
    }

    /// The order created before the failure, if the attempt got that far.
    #[must_use]
    pub fn order(&self) -> Option<&Order> {
        match self {
            Self::PaymentInitiationFailed { order, .. }
            | Self::PaymentVerificationFailed { order, .. }
            | Self::CartClearFailed { order, .. } => Some(order),
            _ => None,
        }
    }

    #[must_use]
    pub const fn is_transport(&self) -> bool {
        !matches!(self, Self::Validation(_))
    }

    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Validation(err) => err.to_string(),
            Self::OrderCreationFailed(_) => {
                "Could not place your order, please try again".to_string()
            }
            Self::PaymentInitiationFailed { order, .. } => format!(
                "Order {} was created but payment could not be started",
                order.id
            ),
            Self::PaymentVerificationFailed { order, .. } => format!(
                "Payment for order {} could not be verified; your cart has been kept",
                order.id
            ),
            Self::CartClearFailed { order, .. } => {
                format!("Order {} is confirmed and paid", order.id)
            }
        }
    }
}

/// A gateway's answer to a payment handle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatewayPayment {
    pub payment_id: String,
    pub signature: String,
}

/// The shopper was unable to pay.
#[derive(Debug, Clone, Error)]
#[error("payment not completed: {0}")]
pub struct GatewayError(pub String);

/// Collects payment for a handle issued by the backend.
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    async fn collect(&self, handle: &PaymentHandle) -> Result<GatewayPayment, GatewayError>;
}

/// Gateway that approves every handle with random identifiers.
#[derive(Debug, Clone, Copy, Default)]
pub struct MockGateway;

#[async_trait]
impl PaymentGateway for MockGateway {
    async fn collect(&self, handle: &PaymentHandle) -> Result<GatewayPayment, GatewayError> {
        let payment = GatewayPayment {
            payment_id: format!("pay_{:016x}", rand::random::<u64>()),
            signature: format!("sig_{:032x}", rand::random::<u128>()),
        };
        tracing::debug!(
            handle_id = %handle.razorpay_order_id,
            payment_id = %payment.payment_id,
            "Mock gateway approved payment"
        );
        Ok(payment)
    }
}

/// Result of a completed checkout.
#[derive(Debug, Clone)]
pub struct CheckoutReceipt {
    /// Log correlation id for this attempt.
    pub attempt_id: Uuid,
    pub order: Order,
}

impl CheckoutReceipt {
    #[must_use]
    pub const fn order_id(&self) -> &vastrakala_core::OrderId {
        &self.order.id
    }
}

pub struct CheckoutPipeline {
    api: Arc<dyn StoreApi>,
    gateway: Arc<dyn PaymentGateway>,
}

impl CheckoutPipeline {
    #[must_use]
    pub fn new(api: Arc<dyn StoreApi>, gateway: Arc<dyn PaymentGateway>) -> Self {
        Self { api, gateway }
    }

    /// Run one checkout attempt for the scope's owner.
    ///
    /// The order is built from `cart`, the snapshot the shopper confirmed.
    /// A snapshot from another identity epoch counts as empty. Both
    /// preconditions are checked before any request is sent.
    ///
    /// # Errors
    ///
    /// Returns a [`CheckoutError`] naming the stage that failed. Steps after
    /// the failing one are never executed.
    #[instrument(skip_all, fields(owner = %scope.owner_key(), attempt_id = tracing::field::Empty))]
    pub async fn run(
        &self,
        scope: &IdentityScope,
        cart: &CartSnapshot,
        address: ShippingAddress,
    ) -> Result<CheckoutReceipt, CheckoutError> {
        let attempt_id = Uuid::new_v4();
        tracing::Span::current().record("attempt_id", tracing::field::display(attempt_id));
        let attempt = attempt_id.to_string();

        // AddressCollected
        if cart.is_empty() || cart.epoch() != scope.epoch() {
            return Err(ValidationError::EmptyCart.into());
        }
        address.validate()?;
        let totals = cart.totals();
        stage(CheckoutStage::AddressCollected, &attempt, None);

        // OrderCreated
        let request = CreateOrderRequest::new(
            scope.owner_key(),
            cart.lines().iter().map(OrderItem::from).collect(),
            totals,
            address,
        );
        let order = self
            .api
            .create_order(&request)
            .await
            .map_err(CheckoutError::OrderCreationFailed)?;
        stage(CheckoutStage::OrderCreated, &attempt, Some(&order));

        // PaymentInitiated
        let handle = match self.api.create_payment(&order.id, order.total).await {
            Ok(handle) => handle,
            Err(source) => {
                return Err(CheckoutError::PaymentInitiationFailed {
                    order: Box::new(order),
                    source,
                });
            }
        };
        stage(CheckoutStage::PaymentInitiated, &attempt, Some(&order));

        // PaymentVerified
        let order = match self.verify(&order, &handle).await {
            Ok(paid) => paid,
            Err(source) => {
                warn!(order_id = %order.id, error = %source, "Payment verification failed");
                return Err(CheckoutError::PaymentVerificationFailed {
                    order: Box::new(order),
                    source,
                });
            }
        };
        stage(CheckoutStage::PaymentVerified, &attempt, Some(&order));

        // CartCleared
        if let Err(source) = self.api.clear_cart(scope.owner_key()).await {
            return Err(CheckoutError::CartClearFailed {
                order: Box::new(order),
                source,
            });
        }
        stage(CheckoutStage::CartCleared, &attempt, Some(&order));

        stage(CheckoutStage::Complete, &attempt, Some(&order));
        Ok(CheckoutReceipt { attempt_id, order })
    }

    /// Collect payment and confirm it with the backend. Returns the order
    /// as the server now records it.
    async fn verify(&self, order: &Order, handle: &PaymentHandle) -> Result<Order, ApiError> {
        let payment = self
            .gateway
            .collect(handle)
            .await
            .map_err(|e| ApiError::Rejected(e.to_string()))?;

        let confirmation = PaymentConfirmation {
            order_id: order.id.clone(),
            payment_id: payment.payment_id.clone(),
            signature: payment.signature,
        };
        let receipt = self.api.verify_payment(&confirmation).await?;
        if !receipt.success {
            return Err(ApiError::Rejected(receipt.message));
        }

        match self.api.order(&order.id).await {
            Ok(updated) => Ok(updated),
            Err(e) => {
                warn!(order_id = %order.id, error = %e, "Could not re-read paid order");
                let mut paid = order.clone();
                paid.payment_id = Some(payment.payment_id);
                paid.payment_status = PaymentStatus::Completed;
                Ok(paid)
            }
        }
    }
}

fn stage(stage: CheckoutStage, attempt: &str, order: Option<&Order>) {
    let order_id = order.map_or("", |o| o.id.as_str());
    info!(stage = %stage, order_id = %order_id, "Checkout stage reached");
    let mut data = vec![("attempt_id", attempt)];
    if !order_id.is_empty() {
        data.push(("order_id", order_id));
    }
    add_breadcrumb("checkout", stage.as_str(), Some(data.as_slice()));
}

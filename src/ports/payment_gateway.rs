//! Payment gateway port - upstream order creation.
//!
//! Only order creation crosses this boundary. Callback verification is
//! pure domain logic (`GatewaySignatureVerifier`) and card/UPI clearing
//! happens entirely on the gateway's side.

use async_trait::async_trait;

use crate::domain::foundation::DomainError;
use crate::domain::payment::{GatewayOrder, Money};

/// Port for creating payment orders at the external gateway.
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Create an order for the given amount.
    ///
    /// `receipt` is the merchant-side idempotency handle: the gateway
    /// reuses the order for a repeated receipt, so client retries don't
    /// double-charge.
    ///
    /// # Errors
    ///
    /// - `InternalError` if the gateway is unreachable or rejects the
    ///   order
    async fn create_order(&self, amount: Money, receipt: &str)
        -> Result<GatewayOrder, DomainError>;
}

//! Payment value objects shared by both channels.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::foundation::{DomainError, Timestamp, UserId};

/// An amount in minor units (paise, cents) with its currency code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Money {
    /// Amount in the currency's minor unit.
    pub amount_minor: i64,

    /// ISO 4217 currency code (e.g. "INR", "USD").
    pub currency: String,
}

impl Money {
    /// Creates a positive amount.
    ///
    /// # Errors
    ///
    /// - `ValidationFailed` if the amount is zero or negative
    pub fn new(amount_minor: i64, currency: impl Into<String>) -> Result<Self, DomainError> {
        if amount_minor <= 0 {
            return Err(DomainError::validation(
                "amount_minor",
                "Amount must be positive",
            ));
        }
        Ok(Self {
            amount_minor,
            currency: currency.into(),
        })
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.amount_minor, self.currency)
    }
}

/// Which payment rail confirmed (or is expected to confirm) a booking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentChannel {
    /// Processor-verified payment with a signed callback.
    Gateway,
    /// Peer-to-peer transfer confirmed only by the payer's assertion.
    SelfAttested,
}

impl fmt::Display for PaymentChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            PaymentChannel::Gateway => "gateway",
            PaymentChannel::SelfAttested => "self_attested",
        };
        write!(f, "{}", s)
    }
}

/// Idempotency key for session materialization.
///
/// One session exists per `(channel, external_ref)`; materializing twice
/// with the same key must observe the first writer's session.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PaymentReference {
    /// Channel that confirmed the payment.
    pub channel: PaymentChannel,

    /// Gateway payment id or self-attested transaction id.
    pub external_ref: String,
}

impl PaymentReference {
    pub fn gateway(payment_id: impl Into<String>) -> Self {
        Self {
            channel: PaymentChannel::Gateway,
            external_ref: payment_id.into(),
        }
    }

    pub fn self_attested(transaction_id: impl Into<String>) -> Self {
        Self {
            channel: PaymentChannel::SelfAttested,
            external_ref: transaction_id.into(),
        }
    }
}

impl fmt::Display for PaymentReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.channel, self.external_ref)
    }
}

/// An order created upstream at the payment gateway.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GatewayOrder {
    /// Gateway's order id, echoed back in the callback.
    pub order_id: String,

    /// Amount the order was created for.
    pub amount: Money,

    /// Merchant receipt id, derived from mentee + timestamp so that
    /// client retries reuse the same order upstream.
    pub receipt: String,

    /// When the order was created locally.
    pub created_at: Timestamp,
}

impl GatewayOrder {
    /// Derives the merchant receipt id for a mentee at a point in time.
    pub fn receipt_for(mentee_id: &UserId, at: &Timestamp) -> String {
        format!("booking_{}_{}", mentee_id, at.as_unix_secs())
    }
}

/// Callback data the gateway posts after the client completes payment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentCallback {
    /// Order id the payment settles.
    pub order_id: String,

    /// Gateway's payment id (becomes the idempotency external ref).
    pub payment_id: String,

    /// Hex-encoded HMAC-SHA256 over `"{order_id}|{payment_id}"`.
    pub signature: String,
}

/// Payment request descriptor for the self-attested rail.
///
/// Rendered to the payer (e.g. as a deep link or QR); the rail itself
/// never calls back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentRequest {
    /// Payee address on the transfer rail (e.g. a VPA).
    pub payee_address: String,

    /// Amount to transfer.
    pub amount: Money,

    /// Human-readable note attached to the transfer.
    pub note: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn money_rejects_non_positive_amounts() {
        assert!(Money::new(0, "INR").is_err());
        assert!(Money::new(-500, "INR").is_err());
        assert!(Money::new(5000, "INR").is_ok());
    }

    #[test]
    fn payment_reference_equality_is_channel_scoped() {
        let gateway = PaymentReference::gateway("pay_123");
        let attested = PaymentReference::self_attested("pay_123");
        assert_ne!(gateway, attested);
        assert_eq!(gateway, PaymentReference::gateway("pay_123"));
    }

    #[test]
    fn receipt_is_stable_for_mentee_and_time() {
        let mentee = UserId::new("mentee-1").unwrap();
        let at = Timestamp::from_unix_secs(1705276800);
        assert_eq!(
            GatewayOrder::receipt_for(&mentee, &at),
            "booking_mentee-1_1705276800"
        );
    }

    #[test]
    fn channel_serializes_to_snake_case() {
        assert_eq!(
            serde_json::to_string(&PaymentChannel::SelfAttested).unwrap(),
            "\"self_attested\""
        );
    }
}

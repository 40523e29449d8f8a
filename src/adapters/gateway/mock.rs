//! Mock payment gateway for testing.
//!
//! Deterministic order ids, call tracking, and error injection.

use async_trait::async_trait;
use std::sync::Mutex;

use crate::domain::foundation::{DomainError, ErrorCode, Timestamp};
use crate::domain::payment::{GatewayOrder, Money};
use crate::ports::PaymentGateway;

#[derive(Default)]
struct MockState {
    /// Orders created so far, keyed by receipt.
    orders: Vec<GatewayOrder>,
    /// Sequence for deterministic order ids.
    next_seq: u64,
    /// When set, the next call fails with this message.
    fail_with: Option<String>,
}

/// Mock `PaymentGateway` with deterministic order ids (`order_1`,
/// `order_2`, ...). Repeated receipts return the original order, the
/// way the upstream gateway deduplicates.
#[derive(Default)]
pub struct MockPaymentGateway {
    state: Mutex<MockState>,
}

impl MockPaymentGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes the next `create_order` call fail.
    pub fn fail_next(&self, message: impl Into<String>) {
        self.state
            .lock()
            .expect("MockPaymentGateway: state lock poisoned")
            .fail_with = Some(message.into());
    }

    /// Orders created so far (test assertions).
    pub fn created_orders(&self) -> Vec<GatewayOrder> {
        self.state
            .lock()
            .expect("MockPaymentGateway: state lock poisoned")
            .orders
            .clone()
    }
}

#[async_trait]
impl PaymentGateway for MockPaymentGateway {
    async fn create_order(
        &self,
        amount: Money,
        receipt: &str,
    ) -> Result<GatewayOrder, DomainError> {
        let mut state = self
            .state
            .lock()
            .expect("MockPaymentGateway: state lock poisoned");

        if let Some(message) = state.fail_with.take() {
            return Err(DomainError::new(ErrorCode::InternalError, message));
        }

        if let Some(existing) = state.orders.iter().find(|o| o.receipt == receipt) {
            return Ok(existing.clone());
        }

        state.next_seq += 1;
        let order = GatewayOrder {
            order_id: format!("order_{}", state.next_seq),
            amount,
            receipt: receipt.to_string(),
            created_at: Timestamp::now(),
        };
        state.orders.push(order.clone());
        Ok(order)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn amount() -> Money {
        Money::new(5000, "INR").unwrap()
    }

    #[tokio::test]
    async fn order_ids_are_sequential() {
        let gateway = MockPaymentGateway::new();

        let first = gateway.create_order(amount(), "receipt-1").await.unwrap();
        let second = gateway.create_order(amount(), "receipt-2").await.unwrap();

        assert_eq!(first.order_id, "order_1");
        assert_eq!(second.order_id, "order_2");
    }

    #[tokio::test]
    async fn repeated_receipt_returns_same_order() {
        let gateway = MockPaymentGateway::new();

        let first = gateway.create_order(amount(), "receipt-1").await.unwrap();
        let retry = gateway.create_order(amount(), "receipt-1").await.unwrap();

        assert_eq!(first.order_id, retry.order_id);
        assert_eq!(gateway.created_orders().len(), 1);
    }

    #[tokio::test]
    async fn injected_error_fails_one_call() {
        let gateway = MockPaymentGateway::new();
        gateway.fail_next("gateway unreachable");

        assert!(gateway.create_order(amount(), "receipt-1").await.is_err());
        assert!(gateway.create_order(amount(), "receipt-1").await.is_ok());
    }
}

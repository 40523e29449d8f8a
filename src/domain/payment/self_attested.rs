//! Self-attested payment attempt state machine.
//!
//! Models the countdown window during which a payer may assert "I
//! completed the transfer". The attempt is first-writer-wins: whichever
//! of {confirm, timeout, cancel} lands first decides the outcome, and
//! every later write is rejected as stale. The coordinator serializes
//! writers behind a mutex; this type enforces the outcome rules given
//! already-serialized access.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{DomainError, ErrorCode, Timestamp};

use super::order::{PaymentRequest, PaymentReference};

/// Outcome state of a self-attested attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "state")]
pub enum AttemptState {
    /// Countdown running, no assertion yet.
    Pending,
    /// Payer asserted completion within the window.
    Confirmed {
        /// The asserted transaction id.
        transaction_id: String,
        /// When the assertion was recorded.
        confirmed_at: Timestamp,
    },
    /// Countdown lapsed or the payer cancelled.
    Failed {
        /// Why the attempt failed.
        reason: FailureReason,
    },
}

/// Why a self-attested attempt ended without payment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureReason {
    /// The countdown expired before any assertion.
    TimedOut,
    /// The payer abandoned the attempt explicitly.
    Cancelled,
}

/// A single self-attested payment attempt with a hard deadline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelfAttestedAttempt {
    /// The transfer descriptor shown to the payer.
    payment_request: PaymentRequest,

    /// When the attempt was opened.
    started_at: Timestamp,

    /// Hard deadline; assertions at or after this instant are stale.
    deadline: Timestamp,

    /// Current outcome state.
    state: AttemptState,
}

impl SelfAttestedAttempt {
    /// Opens an attempt with a deadline `timeout_secs` after `now`.
    pub fn open(payment_request: PaymentRequest, now: Timestamp, timeout_secs: u64) -> Self {
        Self {
            payment_request,
            started_at: now,
            deadline: now.plus_secs(timeout_secs),
            state: AttemptState::Pending,
        }
    }

    pub fn payment_request(&self) -> &PaymentRequest {
        &self.payment_request
    }

    pub fn started_at(&self) -> &Timestamp {
        &self.started_at
    }

    pub fn deadline(&self) -> &Timestamp {
        &self.deadline
    }

    pub fn state(&self) -> &AttemptState {
        &self.state
    }

    /// True while no outcome has been decided.
    pub fn is_pending(&self) -> bool {
        matches!(self.state, AttemptState::Pending)
    }

    /// Records the payer's completion assertion.
    ///
    /// # Errors
    ///
    /// - `PaymentTimeout` if the deadline has passed or the attempt
    ///   already failed (timeout-wins: a late but otherwise valid
    ///   assertion is rejected as stale)
    /// - `DuplicatePayment` if already confirmed (idempotent outcome;
    ///   the caller treats this as a no-op, not a hard failure)
    pub fn confirm(
        &mut self,
        transaction_id: impl Into<String>,
        now: Timestamp,
    ) -> Result<PaymentReference, DomainError> {
        match &self.state {
            AttemptState::Pending => {
                if now.is_after(&self.deadline) {
                    self.state = AttemptState::Failed {
                        reason: FailureReason::TimedOut,
                    };
                    return Err(DomainError::new(
                        ErrorCode::PaymentTimeout,
                        "Confirmation arrived after the countdown expired",
                    ));
                }
                let transaction_id = transaction_id.into();
                self.state = AttemptState::Confirmed {
                    transaction_id: transaction_id.clone(),
                    confirmed_at: now,
                };
                Ok(PaymentReference::self_attested(transaction_id))
            }
            AttemptState::Confirmed { transaction_id, .. } => Err(DomainError::new(
                ErrorCode::DuplicatePayment,
                "Attempt already confirmed",
            )
            .with_detail("transaction_id", transaction_id.clone())),
            AttemptState::Failed { .. } => Err(DomainError::new(
                ErrorCode::PaymentTimeout,
                "Attempt already failed; confirmation is stale",
            )),
        }
    }

    /// Marks the attempt as timed out if the deadline has passed.
    ///
    /// Returns true when this call decided the outcome. A confirmation
    /// that already won is untouched.
    pub fn expire(&mut self, now: Timestamp) -> bool {
        if self.is_pending() && !now.is_before(&self.deadline) {
            self.state = AttemptState::Failed {
                reason: FailureReason::TimedOut,
            };
            true
        } else {
            false
        }
    }

    /// Cancels a still-pending attempt on explicit user action.
    ///
    /// Returns true when this call decided the outcome.
    pub fn cancel(&mut self) -> bool {
        if self.is_pending() {
            self.state = AttemptState::Failed {
                reason: FailureReason::Cancelled,
            };
            true
        } else {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::payment::Money;

    const TIMEOUT_SECS: u64 = 300;

    fn attempt(now: Timestamp) -> SelfAttestedAttempt {
        SelfAttestedAttempt::open(
            PaymentRequest {
                payee_address: "mentor@upi".to_string(),
                amount: Money::new(5000, "INR").unwrap(),
                note: "Mentorship session".to_string(),
            },
            now,
            TIMEOUT_SECS,
        )
    }

    #[test]
    fn confirm_within_window_succeeds() {
        let now = Timestamp::from_unix_secs(1000);
        let mut attempt = attempt(now);

        let reference = attempt.confirm("txn_1", now.plus_secs(60)).unwrap();

        assert_eq!(reference, PaymentReference::self_attested("txn_1"));
        assert!(matches!(attempt.state(), AttemptState::Confirmed { .. }));
    }

    #[test]
    fn confirm_at_deadline_still_counts() {
        let now = Timestamp::from_unix_secs(1000);
        let mut attempt = attempt(now);

        let result = attempt.confirm("txn_1", now.plus_secs(TIMEOUT_SECS));
        assert!(result.is_ok());
    }

    #[test]
    fn late_confirmation_is_stale() {
        let now = Timestamp::from_unix_secs(1000);
        let mut attempt = attempt(now);

        let err = attempt
            .confirm("txn_1", now.plus_secs(TIMEOUT_SECS + 1))
            .unwrap_err();

        assert!(err.is(ErrorCode::PaymentTimeout));
        assert!(matches!(
            attempt.state(),
            AttemptState::Failed {
                reason: FailureReason::TimedOut
            }
        ));
    }

    #[test]
    fn confirmation_after_expiry_is_stale_even_if_in_window() {
        let now = Timestamp::from_unix_secs(1000);
        let mut attempt = attempt(now);

        // Sweeper fired at the deadline first.
        assert!(attempt.expire(now.plus_secs(TIMEOUT_SECS)));

        // A confirmation with an in-window timestamp loses: first writer wins.
        let err = attempt.confirm("txn_1", now.plus_secs(10)).unwrap_err();
        assert!(err.is(ErrorCode::PaymentTimeout));
    }

    #[test]
    fn expire_before_deadline_is_a_no_op() {
        let now = Timestamp::from_unix_secs(1000);
        let mut attempt = attempt(now);

        assert!(!attempt.expire(now.plus_secs(TIMEOUT_SECS - 1)));
        assert!(attempt.is_pending());
    }

    #[test]
    fn expire_after_confirmation_does_not_unwind_it() {
        let now = Timestamp::from_unix_secs(1000);
        let mut attempt = attempt(now);
        attempt.confirm("txn_1", now.plus_secs(5)).unwrap();

        assert!(!attempt.expire(now.plus_secs(TIMEOUT_SECS + 60)));
        assert!(matches!(attempt.state(), AttemptState::Confirmed { .. }));
    }

    #[test]
    fn double_confirm_reports_duplicate() {
        let now = Timestamp::from_unix_secs(1000);
        let mut attempt = attempt(now);
        attempt.confirm("txn_1", now.plus_secs(5)).unwrap();

        let err = attempt.confirm("txn_2", now.plus_secs(6)).unwrap_err();
        assert!(err.is(ErrorCode::DuplicatePayment));
    }

    #[test]
    fn cancel_is_first_writer_too() {
        let now = Timestamp::from_unix_secs(1000);
        let mut attempt = attempt(now);

        assert!(attempt.cancel());
        assert!(!attempt.cancel());

        let err = attempt.confirm("txn_1", now.plus_secs(5)).unwrap_err();
        assert!(err.is(ErrorCode::PaymentTimeout));
    }
}

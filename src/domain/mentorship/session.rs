//! MentorshipSession aggregate entity.
//!
//! # Materialization
//!
//! There is no durable "draft" session. The aggregate's only public
//! constructor besides `reconstitute` is `materialize`, which requires a
//! confirmed payment reference and produces a session already in
//! `confirmed`/`paid`. The invariant `status == Confirmed implies
//! payment_status == Paid` therefore holds by construction.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{
    DomainError, ErrorCode, SessionId, StateMachine, Timestamp, UserId,
};
use crate::domain::payment::PaymentReference;

use super::booking::{BookingQuote, ServiceDescriptor};
use super::status::{PaymentStatus, SessionStatus};

/// A paid, scheduled 1:1 booking between a mentor and a mentee.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MentorshipSession {
    /// Unique identifier for this session.
    id: SessionId,

    /// Mentor delivering the session.
    mentor_id: UserId,

    /// Mentee who booked and paid.
    mentee_id: UserId,

    /// Service that was booked.
    service: ServiceDescriptor,

    /// Agreed session time.
    scheduled_at: Timestamp,

    /// Lifecycle status.
    status: SessionStatus,

    /// Payment state.
    payment_status: PaymentStatus,

    /// Channel + external reference that confirmed payment
    /// (the materialization idempotency key).
    payment_ref: PaymentReference,

    /// Allocated meeting-room reference.
    meeting_ref: String,

    /// When the session was materialized.
    created_at: Timestamp,

    /// When the session was last updated.
    updated_at: Timestamp,
}

impl MentorshipSession {
    /// Creates a session from a confirmed payment - the only way a
    /// session comes into existence.
    pub fn materialize(
        id: SessionId,
        quote: BookingQuote,
        payment_ref: PaymentReference,
        meeting_ref: String,
    ) -> Self {
        let now = Timestamp::now();
        Self {
            id,
            mentor_id: quote.mentor_id,
            mentee_id: quote.mentee_id,
            service: quote.service,
            scheduled_at: quote.scheduled_at,
            status: SessionStatus::Confirmed,
            payment_status: PaymentStatus::Paid,
            payment_ref,
            meeting_ref,
            created_at: now,
            updated_at: now,
        }
    }

    /// Reconstitute a session from persistence (no validation, no events).
    #[allow(clippy::too_many_arguments)]
    pub fn reconstitute(
        id: SessionId,
        mentor_id: UserId,
        mentee_id: UserId,
        service: ServiceDescriptor,
        scheduled_at: Timestamp,
        status: SessionStatus,
        payment_status: PaymentStatus,
        payment_ref: PaymentReference,
        meeting_ref: String,
        created_at: Timestamp,
        updated_at: Timestamp,
    ) -> Self {
        Self {
            id,
            mentor_id,
            mentee_id,
            service,
            scheduled_at,
            status,
            payment_status,
            payment_ref,
            meeting_ref,
            created_at,
            updated_at,
        }
    }

    // ─────────────────────────────────────────────────────────────────────
    // Accessors
    // ─────────────────────────────────────────────────────────────────────

    pub fn id(&self) -> &SessionId {
        &self.id
    }

    pub fn mentor_id(&self) -> &UserId {
        &self.mentor_id
    }

    pub fn mentee_id(&self) -> &UserId {
        &self.mentee_id
    }

    pub fn service(&self) -> &ServiceDescriptor {
        &self.service
    }

    pub fn scheduled_at(&self) -> &Timestamp {
        &self.scheduled_at
    }

    pub fn status(&self) -> SessionStatus {
        self.status
    }

    pub fn payment_status(&self) -> PaymentStatus {
        self.payment_status
    }

    pub fn payment_ref(&self) -> &PaymentReference {
        &self.payment_ref
    }

    pub fn meeting_ref(&self) -> &str {
        &self.meeting_ref
    }

    pub fn created_at(&self) -> &Timestamp {
        &self.created_at
    }

    pub fn updated_at(&self) -> &Timestamp {
        &self.updated_at
    }

    // ─────────────────────────────────────────────────────────────────────
    // Lifecycle
    // ─────────────────────────────────────────────────────────────────────

    /// Marks the session as started.
    pub fn start(&mut self) -> Result<(), DomainError> {
        self.apply(SessionStatus::InProgress)
    }

    /// Marks the session as delivered.
    pub fn complete(&mut self) -> Result<(), DomainError> {
        self.apply(SessionStatus::Completed)
    }

    /// Cancels the session and flags the payment for refund.
    ///
    /// Cancellation is an explicit lifecycle transition, not an unwind
    /// of the payment flow: the refund itself is settled out of band.
    pub fn cancel(&mut self) -> Result<(), DomainError> {
        self.apply(SessionStatus::Cancelled)?;
        self.payment_status = PaymentStatus::Refunded;
        Ok(())
    }

    fn apply(&mut self, target: SessionStatus) -> Result<(), DomainError> {
        if !self.status.can_transition_to(&target) {
            return Err(DomainError::new(
                ErrorCode::InvalidTransition,
                format!("Cannot transition session from {} to {}", self.status, target),
            ));
        }
        self.status = target;
        self.updated_at = Timestamp::now();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::payment::Money;

    fn quote() -> BookingQuote {
        BookingQuote {
            mentor_id: UserId::new("mentor-1").unwrap(),
            mentee_id: UserId::new("mentee-1").unwrap(),
            service: ServiceDescriptor::new(
                "Career chat",
                60,
                Money::new(5000, "USD").unwrap(),
            )
            .unwrap(),
            scheduled_at: Timestamp::now().plus_secs(3600),
        }
    }

    fn session() -> MentorshipSession {
        MentorshipSession::materialize(
            SessionId::new(),
            quote(),
            PaymentReference::gateway("pay_1"),
            "meet-abc".to_string(),
        )
    }

    #[test]
    fn materialized_session_is_confirmed_and_paid() {
        let session = session();
        assert_eq!(session.status(), SessionStatus::Confirmed);
        assert_eq!(session.payment_status(), PaymentStatus::Paid);
        assert_eq!(session.meeting_ref(), "meet-abc");
    }

    #[test]
    fn session_runs_through_happy_path() {
        let mut session = session();
        session.start().unwrap();
        assert_eq!(session.status(), SessionStatus::InProgress);
        session.complete().unwrap();
        assert_eq!(session.status(), SessionStatus::Completed);
    }

    #[test]
    fn complete_without_start_fails() {
        let mut session = session();
        assert!(session.complete().is_err());
    }

    #[test]
    fn cancel_marks_refund() {
        let mut session = session();
        session.cancel().unwrap();
        assert_eq!(session.status(), SessionStatus::Cancelled);
        assert_eq!(session.payment_status(), PaymentStatus::Refunded);
    }

    #[test]
    fn cancel_after_completion_fails() {
        let mut session = session();
        session.start().unwrap();
        session.complete().unwrap();
        assert!(session.cancel().is_err());
        assert_eq!(session.payment_status(), PaymentStatus::Paid);
    }
}

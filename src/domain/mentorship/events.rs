//! Domain events emitted by the mentorship session lifecycle.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{domain_event, EventId, SessionId, Timestamp, UserId};
use crate::domain::payment::{PaymentChannel, PaymentReference};

/// Published when a confirmed payment is turned into a session.
///
/// Carries the payment channel so downstream consumers can distinguish
/// gateway-verified bookings from self-attested ones.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionMaterialized {
    /// Unique event identifier.
    pub event_id: EventId,
    /// The session that was created.
    pub session_id: SessionId,
    /// Mentor delivering the session.
    pub mentor_id: UserId,
    /// Mentee who paid.
    pub mentee_id: UserId,
    /// How the payment was confirmed.
    pub channel: PaymentChannel,
    /// The confirming payment reference.
    pub payment_ref: PaymentReference,
    /// Agreed session time.
    pub scheduled_at: Timestamp,
    /// When materialization happened.
    pub occurred_at: Timestamp,
}

domain_event!(
    SessionMaterialized,
    event_type = "mentorship.session_materialized.v1",
    aggregate_id = session_id,
    aggregate_type = "MentorshipSession",
    occurred_at = occurred_at,
    event_id = event_id
);

/// Published when a session is marked delivered.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionCompleted {
    /// Unique event identifier.
    pub event_id: EventId,
    /// The completed session.
    pub session_id: SessionId,
    /// Mentor who delivered it.
    pub mentor_id: UserId,
    /// Mentee who attended.
    pub mentee_id: UserId,
    /// When completion was recorded.
    pub occurred_at: Timestamp,
}

domain_event!(
    SessionCompleted,
    event_type = "mentorship.session_completed.v1",
    aggregate_id = session_id,
    aggregate_type = "MentorshipSession",
    occurred_at = occurred_at,
    event_id = event_id
);

/// Published when a session is cancelled and its payment flagged for refund.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionCancelled {
    /// Unique event identifier.
    pub event_id: EventId,
    /// The cancelled session.
    pub session_id: SessionId,
    /// Mentor the session was booked with.
    pub mentor_id: UserId,
    /// Mentee whose payment is refunded.
    pub mentee_id: UserId,
    /// When cancellation was recorded.
    pub occurred_at: Timestamp,
}

domain_event!(
    SessionCancelled,
    event_type = "mentorship.session_cancelled.v1",
    aggregate_id = session_id,
    aggregate_type = "MentorshipSession",
    occurred_at = occurred_at,
    event_id = event_id
);

//! Domain events emitted by the referral lifecycle.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{
    domain_event, EventId, JobPostingId, ReferralRequestId, Timestamp, UserId,
};

use super::status::ReferralStatus;

/// Published when a seeker submits a new referral request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReferralSubmitted {
    /// Unique event identifier.
    pub event_id: EventId,
    /// The request that was created.
    pub request_id: ReferralRequestId,
    /// Posting the request targets.
    pub job_posting_id: JobPostingId,
    /// The applying seeker.
    pub seeker_id: UserId,
    /// The referrer who must decide.
    pub referrer_id: UserId,
    /// When the request was created.
    pub occurred_at: Timestamp,
}

domain_event!(
    ReferralSubmitted,
    event_type = "referral.submitted.v1",
    aggregate_id = request_id,
    aggregate_type = "ReferralRequest",
    occurred_at = occurred_at,
    event_id = event_id
);

/// Published when a referral request changes status.
///
/// Consumed by the statistics aggregator (placement counting) and the
/// notification dispatcher (accept/reject notifications).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReferralTransitioned {
    /// Unique event identifier.
    pub event_id: EventId,
    /// The request that transitioned.
    pub request_id: ReferralRequestId,
    /// Referrer owning the request (stats are keyed on this).
    pub referrer_id: UserId,
    /// Seeker owning the request.
    pub seeker_id: UserId,
    /// Status before the transition.
    pub from_status: ReferralStatus,
    /// Status after the transition.
    pub to_status: ReferralStatus,
    /// When the transition was recorded.
    pub occurred_at: Timestamp,
}

domain_event!(
    ReferralTransitioned,
    event_type = "referral.transitioned.v1",
    aggregate_id = request_id,
    aggregate_type = "ReferralRequest",
    occurred_at = occurred_at,
    event_id = event_id
);

//! TransitionReferralHandler - drives the referral status graph.
//!
//! Reads the request, applies the transition on the aggregate, and
//! writes back with compare-and-set on the status read at load time.
//! Two racers on the same request therefore resolve to exactly one
//! winner; the loser gets `Conflict` and can re-read and retry.

use std::sync::Arc;

use crate::domain::foundation::{
    CommandMetadata, DomainError, ErrorCode, EventId, ReferralRequestId, SerializableDomainEvent,
    Timestamp,
};
use crate::domain::referral::{ReferralRequest, ReferralStatus, ReferralTransitioned};
use crate::ports::{
    EventPublisher, Notification, NotificationDispatcher, NotificationKind,
    ReferralRequestRepository,
};

/// Command to move a request along the status graph. The actor is the
/// acting user from the command metadata.
#[derive(Debug, Clone)]
pub struct TransitionReferralCommand {
    /// Request to transition.
    pub request_id: ReferralRequestId,
    /// Target status.
    pub target: ReferralStatus,
    /// Optional free-text audit note.
    pub note: Option<String>,
    /// Optional evidence reference for the audit trail.
    pub evidence_ref: Option<String>,
}

/// Result of a successful transition.
#[derive(Debug, Clone)]
pub struct TransitionReferralResult {
    /// The updated request.
    pub request: ReferralRequest,
    /// The emitted event.
    pub event: ReferralTransitioned,
}

/// Error type for referral transitions.
#[derive(Debug, Clone)]
pub enum TransitionReferralError {
    /// Request doesn't exist.
    RequestNotFound(ReferralRequestId),
    /// Authorization, graph, or concurrency error
    /// (`PermissionDenied`, `InvalidTransition`, `Conflict`).
    Domain(DomainError),
}

impl std::fmt::Display for TransitionReferralError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TransitionReferralError::RequestNotFound(id) => {
                write!(f, "Referral request not found: {}", id)
            }
            TransitionReferralError::Domain(err) => write!(f, "{}", err),
        }
    }
}

impl std::error::Error for TransitionReferralError {}

impl From<DomainError> for TransitionReferralError {
    fn from(err: DomainError) -> Self {
        TransitionReferralError::Domain(err)
    }
}

/// Handler for referral status transitions.
pub struct TransitionReferralHandler {
    referral_repository: Arc<dyn ReferralRequestRepository>,
    event_publisher: Arc<dyn EventPublisher>,
    notifier: Arc<dyn NotificationDispatcher>,
}

impl TransitionReferralHandler {
    pub fn new(
        referral_repository: Arc<dyn ReferralRequestRepository>,
        event_publisher: Arc<dyn EventPublisher>,
        notifier: Arc<dyn NotificationDispatcher>,
    ) -> Self {
        Self {
            referral_repository,
            event_publisher,
            notifier,
        }
    }

    pub async fn handle(
        &self,
        cmd: TransitionReferralCommand,
        metadata: CommandMetadata,
    ) -> Result<TransitionReferralResult, TransitionReferralError> {
        let mut request = self
            .referral_repository
            .find_by_id(&cmd.request_id)
            .await?
            .ok_or(TransitionReferralError::RequestNotFound(
                cmd.request_id.clone(),
            ))?;

        let expected = request.status();
        request.transition(&metadata.user_id, cmd.target, cmd.note, cmd.evidence_ref)?;

        // CAS against the status read above; a concurrent winner makes
        // this fail with Conflict and nothing is written.
        self.referral_repository
            .update_if_status(&request, expected)
            .await?;

        let event = ReferralTransitioned {
            event_id: EventId::new(),
            request_id: request.id().clone(),
            referrer_id: request.referrer_id().clone(),
            seeker_id: request.seeker_id().clone(),
            from_status: expected,
            to_status: cmd.target,
            occurred_at: Timestamp::now(),
        };

        let envelope = event
            .to_envelope()
            .with_correlation_id(metadata.correlation_id())
            .with_user_id(metadata.user_id.to_string());
        self.event_publisher.publish(envelope).await?;

        self.dispatch_decision_notification(&request, cmd.target);

        Ok(TransitionReferralResult { request, event })
    }

    /// Fire-and-forget seeker notification on the referrer's decision.
    /// Delivery failure is logged, never propagated.
    fn dispatch_decision_notification(&self, request: &ReferralRequest, target: ReferralStatus) {
        let kind = match target {
            ReferralStatus::Accepted => NotificationKind::ReferralAccepted,
            ReferralStatus::Rejected => NotificationKind::ReferralRejected,
            _ => return,
        };

        let notification = Notification::new(
            request.seeker_id().clone(),
            kind,
            format!("Your referral request is now {}", target),
        );
        let notifier = Arc::clone(&self.notifier);
        let request_id = request.id().clone();
        tokio::spawn(async move {
            if let Err(e) = notifier.notify(notification).await {
                tracing::warn!(
                    request_id = %request_id,
                    error = %e,
                    "referral decision notification failed"
                );
            }
        });
    }
}

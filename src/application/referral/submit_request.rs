//! SubmitReferralRequestHandler - a seeker applies against a posting.

use std::sync::Arc;

use crate::domain::foundation::{
    CommandMetadata, DomainError, EventId, JobPostingId, ReferralRequestId,
    SerializableDomainEvent, Timestamp,
};
use crate::domain::referral::{ApplicationPayload, ReferralRequest, ReferralSubmitted};
use crate::ports::{EventPublisher, JobPostingRepository, ReferralRequestRepository};

/// Command to submit a new referral request. The seeker is the acting
/// user from the command metadata.
#[derive(Debug, Clone)]
pub struct SubmitReferralRequestCommand {
    /// Posting the seeker applies against.
    pub job_posting_id: JobPostingId,
    /// Referrer being asked to refer.
    pub referrer_id: crate::domain::foundation::UserId,
    /// Application payload.
    pub application: ApplicationPayload,
}

/// Result of a successful submission.
#[derive(Debug, Clone)]
pub struct SubmitReferralRequestResult {
    /// The created request.
    pub request: ReferralRequest,
    /// The emitted event.
    pub event: ReferralSubmitted,
}

/// Error type for request submission.
#[derive(Debug, Clone)]
pub enum SubmitReferralRequestError {
    /// Posting doesn't exist.
    JobPostingNotFound(JobPostingId),
    /// Posting no longer accepts requests.
    JobPostingInactive(JobPostingId),
    /// Validation or storage error.
    Domain(DomainError),
}

impl std::fmt::Display for SubmitReferralRequestError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SubmitReferralRequestError::JobPostingNotFound(id) => {
                write!(f, "Job posting not found: {}", id)
            }
            SubmitReferralRequestError::JobPostingInactive(id) => {
                write!(f, "Job posting is inactive: {}", id)
            }
            SubmitReferralRequestError::Domain(err) => write!(f, "{}", err),
        }
    }
}

impl std::error::Error for SubmitReferralRequestError {}

impl From<DomainError> for SubmitReferralRequestError {
    fn from(err: DomainError) -> Self {
        SubmitReferralRequestError::Domain(err)
    }
}

/// Handler for submitting referral requests.
pub struct SubmitReferralRequestHandler {
    referral_repository: Arc<dyn ReferralRequestRepository>,
    job_posting_repository: Arc<dyn JobPostingRepository>,
    event_publisher: Arc<dyn EventPublisher>,
}

impl SubmitReferralRequestHandler {
    pub fn new(
        referral_repository: Arc<dyn ReferralRequestRepository>,
        job_posting_repository: Arc<dyn JobPostingRepository>,
        event_publisher: Arc<dyn EventPublisher>,
    ) -> Self {
        Self {
            referral_repository,
            job_posting_repository,
            event_publisher,
        }
    }

    pub async fn handle(
        &self,
        cmd: SubmitReferralRequestCommand,
        metadata: CommandMetadata,
    ) -> Result<SubmitReferralRequestResult, SubmitReferralRequestError> {
        // Only active postings accept requests
        let posting = self
            .job_posting_repository
            .find_by_id(&cmd.job_posting_id)
            .await?
            .ok_or(SubmitReferralRequestError::JobPostingNotFound(
                cmd.job_posting_id.clone(),
            ))?;

        if !posting.is_active() {
            return Err(SubmitReferralRequestError::JobPostingInactive(
                posting.id().clone(),
            ));
        }

        let request = ReferralRequest::submit(
            ReferralRequestId::new(),
            cmd.job_posting_id,
            metadata.user_id.clone(),
            cmd.referrer_id,
            cmd.application,
        )?;

        self.referral_repository.save(&request).await?;

        let event = ReferralSubmitted {
            event_id: EventId::new(),
            request_id: request.id().clone(),
            job_posting_id: request.job_posting_id().clone(),
            seeker_id: request.seeker_id().clone(),
            referrer_id: request.referrer_id().clone(),
            occurred_at: Timestamp::now(),
        };

        let envelope = event
            .to_envelope()
            .with_correlation_id(metadata.correlation_id())
            .with_user_id(metadata.user_id.to_string());
        self.event_publisher.publish(envelope).await?;

        Ok(SubmitReferralRequestResult { request, event })
    }
}

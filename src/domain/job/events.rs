//! Domain events emitted for job postings.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{domain_event, EventId, JobPostingId, Timestamp, UserId};

/// Published when a posting is created; consumed by the stats aggregator
/// to keep `jobs_posted` current.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobPostingCreated {
    /// Unique event identifier.
    pub event_id: EventId,
    /// The created posting.
    pub job_posting_id: JobPostingId,
    /// Owner of the posting.
    pub owner_id: UserId,
    /// When the posting was created.
    pub occurred_at: Timestamp,
}

domain_event!(
    JobPostingCreated,
    event_type = "job.posting_created.v1",
    aggregate_id = job_posting_id,
    aggregate_type = "JobPosting",
    occurred_at = occurred_at,
    event_id = event_id
);

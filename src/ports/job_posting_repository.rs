//! Job posting repository port.

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, JobPostingId, UserId};
use crate::domain::job::JobPosting;

/// Repository port for JobPosting persistence.
#[async_trait]
pub trait JobPostingRepository: Send + Sync {
    /// Save a new posting.
    async fn save(&self, posting: &JobPosting) -> Result<(), DomainError>;

    /// Find a posting by its ID. Returns `None` if not found.
    async fn find_by_id(&self, id: &JobPostingId) -> Result<Option<JobPosting>, DomainError>;

    /// Update an existing posting.
    ///
    /// # Errors
    ///
    /// - `JobPostingNotFound` if the posting doesn't exist
    async fn update(&self, posting: &JobPosting) -> Result<(), DomainError>;

    /// All postings owned by the given user.
    async fn list_by_owner(&self, owner_id: &UserId) -> Result<Vec<JobPosting>, DomainError>;
}

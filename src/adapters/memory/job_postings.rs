//! In-memory job posting repository.

use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

use crate::domain::foundation::{DomainError, ErrorCode, JobPostingId, UserId};
use crate::domain::job::JobPosting;
use crate::ports::JobPostingRepository;

/// In-memory JobPosting store.
pub struct InMemoryJobPostingRepository {
    postings: RwLock<HashMap<JobPostingId, JobPosting>>,
}

impl InMemoryJobPostingRepository {
    pub fn new() -> Self {
        Self {
            postings: RwLock::new(HashMap::new()),
        }
    }
}

impl Default for InMemoryJobPostingRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl JobPostingRepository for InMemoryJobPostingRepository {
    async fn save(&self, posting: &JobPosting) -> Result<(), DomainError> {
        self.postings
            .write()
            .await
            .insert(posting.id().clone(), posting.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: &JobPostingId) -> Result<Option<JobPosting>, DomainError> {
        Ok(self.postings.read().await.get(id).cloned())
    }

    async fn update(&self, posting: &JobPosting) -> Result<(), DomainError> {
        let mut postings = self.postings.write().await;
        if !postings.contains_key(posting.id()) {
            return Err(DomainError::new(
                ErrorCode::JobPostingNotFound,
                format!("Job posting {} not found", posting.id()),
            ));
        }
        postings.insert(posting.id().clone(), posting.clone());
        Ok(())
    }

    async fn list_by_owner(&self, owner_id: &UserId) -> Result<Vec<JobPosting>, DomainError> {
        Ok(self
            .postings
            .read()
            .await
            .values()
            .filter(|p| p.owner_id() == owner_id)
            .cloned()
            .collect())
    }
}

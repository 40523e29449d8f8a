//! JobPosting aggregate entity.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{DomainError, JobPostingId, Timestamp, UserId};

/// Maximum length for the posting title.
pub const MAX_TITLE_LENGTH: usize = 300;

/// A job opening a referrer is willing to refer candidates into.
///
/// # Invariants
///
/// - `title` is 1-300 characters, non-empty
/// - only active postings accept new referral requests
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobPosting {
    /// Unique identifier for this posting.
    id: JobPostingId,

    /// User who owns (posted) this opening.
    owner_id: UserId,

    /// Role title.
    title: String,

    /// Hiring company name.
    company: String,

    /// Whether the posting accepts new requests.
    active: bool,

    /// When the posting was created.
    created_at: Timestamp,
}

impl JobPosting {
    /// Creates a new active posting.
    ///
    /// # Errors
    ///
    /// - `ValidationFailed` if title is empty or too long
    pub fn new(
        id: JobPostingId,
        owner_id: UserId,
        title: String,
        company: String,
    ) -> Result<Self, DomainError> {
        let trimmed = title.trim();
        if trimmed.is_empty() {
            return Err(DomainError::validation("title", "Title cannot be empty"));
        }
        if trimmed.len() > MAX_TITLE_LENGTH {
            return Err(DomainError::validation(
                "title",
                format!("Title must be {} characters or less", MAX_TITLE_LENGTH),
            ));
        }

        Ok(Self {
            id,
            owner_id,
            title,
            company,
            active: true,
            created_at: Timestamp::now(),
        })
    }

    pub fn id(&self) -> &JobPostingId {
        &self.id
    }

    pub fn owner_id(&self) -> &UserId {
        &self.owner_id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn company(&self) -> &str {
        &self.company
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn created_at(&self) -> &Timestamp {
        &self.created_at
    }

    /// Closes the posting to new referral requests.
    pub fn deactivate(&mut self) {
        self.active = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn owner() -> UserId {
        UserId::new("owner-1").unwrap()
    }

    #[test]
    fn new_posting_is_active() {
        let posting = JobPosting::new(
            JobPostingId::new(),
            owner(),
            "Backend Engineer".to_string(),
            "Acme".to_string(),
        )
        .unwrap();
        assert!(posting.is_active());
    }

    #[test]
    fn empty_title_is_rejected() {
        let result = JobPosting::new(JobPostingId::new(), owner(), "  ".to_string(), "Acme".into());
        assert!(result.is_err());
    }

    #[test]
    fn deactivate_closes_posting() {
        let mut posting = JobPosting::new(
            JobPostingId::new(),
            owner(),
            "SRE".to_string(),
            "Acme".to_string(),
        )
        .unwrap();
        posting.deactivate();
        assert!(!posting.is_active());
    }
}

//! Mentorship session repository port.
//!
//! The write path is dominated by `insert_if_absent`: materialization is
//! keyed by the confirming payment reference, so a duplicate confirmation
//! observes the first writer's session instead of creating a second one.

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, SessionId, UserId};
use crate::domain::mentorship::MentorshipSession;
use crate::domain::payment::PaymentReference;

/// Outcome of an idempotent session insert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InsertOutcome {
    /// The session was inserted; this caller is the first writer.
    Inserted(MentorshipSession),
    /// A session already existed for the payment reference.
    Existing(MentorshipSession),
}

impl InsertOutcome {
    /// The stored session either way.
    pub fn session(&self) -> &MentorshipSession {
        match self {
            InsertOutcome::Inserted(session) | InsertOutcome::Existing(session) => session,
        }
    }

    pub fn is_inserted(&self) -> bool {
        matches!(self, InsertOutcome::Inserted(_))
    }
}

/// Repository port for MentorshipSession persistence.
#[async_trait]
pub trait SessionRepository: Send + Sync {
    /// Insert a session unless one already exists for its payment
    /// reference. Atomic: concurrent duplicates observe exactly one
    /// stored session.
    async fn insert_if_absent(
        &self,
        session: MentorshipSession,
    ) -> Result<InsertOutcome, DomainError>;

    /// Find a session by its ID. Returns `None` if not found.
    async fn find_by_id(&self, id: &SessionId) -> Result<Option<MentorshipSession>, DomainError>;

    /// Find the session materialized from a given payment reference.
    async fn find_by_payment_ref(
        &self,
        payment_ref: &PaymentReference,
    ) -> Result<Option<MentorshipSession>, DomainError>;

    /// Update an existing session.
    ///
    /// # Errors
    ///
    /// - `SessionNotFound` if the session doesn't exist
    async fn update(&self, session: &MentorshipSession) -> Result<(), DomainError>;

    /// All sessions booked with the given mentor (slot-conflict checks).
    async fn list_by_mentor(&self, mentor_id: &UserId)
        -> Result<Vec<MentorshipSession>, DomainError>;
}

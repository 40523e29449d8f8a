//! In-memory mentorship session repository.

use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

use crate::domain::foundation::{DomainError, ErrorCode, SessionId, UserId};
use crate::domain::mentorship::MentorshipSession;
use crate::domain::payment::PaymentReference;
use crate::ports::{InsertOutcome, SessionRepository};

#[derive(Default)]
struct SessionState {
    by_id: HashMap<SessionId, MentorshipSession>,
    by_payment_ref: HashMap<PaymentReference, SessionId>,
}

/// In-memory MentorshipSession store with an idempotent insert keyed by
/// payment reference.
pub struct InMemorySessionRepository {
    state: RwLock<SessionState>,
}

impl InMemorySessionRepository {
    pub fn new() -> Self {
        Self {
            state: RwLock::new(SessionState::default()),
        }
    }
}

impl Default for InMemorySessionRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SessionRepository for InMemorySessionRepository {
    async fn insert_if_absent(
        &self,
        session: MentorshipSession,
    ) -> Result<InsertOutcome, DomainError> {
        // Check and insert under one write lock: concurrent duplicates
        // serialize and exactly one becomes the stored session.
        let mut state = self.state.write().await;
        if let Some(existing_id) = state.by_payment_ref.get(session.payment_ref()) {
            let existing = state
                .by_id
                .get(existing_id)
                .cloned()
                .ok_or_else(|| {
                    DomainError::new(ErrorCode::StorageError, "Payment ref index out of sync")
                })?;
            return Ok(InsertOutcome::Existing(existing));
        }

        state
            .by_payment_ref
            .insert(session.payment_ref().clone(), session.id().clone());
        state.by_id.insert(session.id().clone(), session.clone());
        Ok(InsertOutcome::Inserted(session))
    }

    async fn find_by_id(&self, id: &SessionId) -> Result<Option<MentorshipSession>, DomainError> {
        Ok(self.state.read().await.by_id.get(id).cloned())
    }

    async fn find_by_payment_ref(
        &self,
        payment_ref: &PaymentReference,
    ) -> Result<Option<MentorshipSession>, DomainError> {
        let state = self.state.read().await;
        Ok(state
            .by_payment_ref
            .get(payment_ref)
            .and_then(|id| state.by_id.get(id))
            .cloned())
    }

    async fn update(&self, session: &MentorshipSession) -> Result<(), DomainError> {
        let mut state = self.state.write().await;
        if !state.by_id.contains_key(session.id()) {
            return Err(DomainError::new(
                ErrorCode::SessionNotFound,
                format!("Session {} not found", session.id()),
            ));
        }
        state.by_id.insert(session.id().clone(), session.clone());
        Ok(())
    }

    async fn list_by_mentor(
        &self,
        mentor_id: &UserId,
    ) -> Result<Vec<MentorshipSession>, DomainError> {
        Ok(self
            .state
            .read()
            .await
            .by_id
            .values()
            .filter(|s| s.mentor_id() == mentor_id)
            .cloned()
            .collect())
    }
}

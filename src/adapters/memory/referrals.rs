//! In-memory referral request repository.

use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

use crate::domain::foundation::{DomainError, ErrorCode, ReferralRequestId, UserId};
use crate::domain::referral::{ReferralRequest, ReferralStatus};
use crate::ports::ReferralRequestRepository;

/// In-memory ReferralRequest store with compare-and-set updates.
pub struct InMemoryReferralRequestRepository {
    requests: RwLock<HashMap<ReferralRequestId, ReferralRequest>>,
}

impl InMemoryReferralRequestRepository {
    pub fn new() -> Self {
        Self {
            requests: RwLock::new(HashMap::new()),
        }
    }
}

impl Default for InMemoryReferralRequestRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ReferralRequestRepository for InMemoryReferralRequestRepository {
    async fn save(&self, request: &ReferralRequest) -> Result<(), DomainError> {
        self.requests
            .write()
            .await
            .insert(request.id().clone(), request.clone());
        Ok(())
    }

    async fn find_by_id(
        &self,
        id: &ReferralRequestId,
    ) -> Result<Option<ReferralRequest>, DomainError> {
        Ok(self.requests.read().await.get(id).cloned())
    }

    async fn update_if_status(
        &self,
        request: &ReferralRequest,
        expected_status: ReferralStatus,
    ) -> Result<(), DomainError> {
        // One write lock covers check and swap, so concurrent writers
        // serialize and exactly one observes the expected status.
        let mut requests = self.requests.write().await;
        let stored = requests.get(request.id()).ok_or_else(|| {
            DomainError::new(
                ErrorCode::RequestNotFound,
                format!("Referral request {} not found", request.id()),
            )
        })?;

        if stored.status() != expected_status {
            return Err(DomainError::new(
                ErrorCode::Conflict,
                "Referral request was modified concurrently",
            )
            .with_detail("expected_status", expected_status.to_string())
            .with_detail("stored_status", stored.status().to_string()));
        }

        requests.insert(request.id().clone(), request.clone());
        Ok(())
    }

    async fn list_by_referrer(
        &self,
        referrer_id: &UserId,
    ) -> Result<Vec<ReferralRequest>, DomainError> {
        Ok(self
            .requests
            .read()
            .await
            .values()
            .filter(|r| r.referrer_id() == referrer_id)
            .cloned()
            .collect())
    }

    async fn list_by_seeker(
        &self,
        seeker_id: &UserId,
    ) -> Result<Vec<ReferralRequest>, DomainError> {
        Ok(self
            .requests
            .read()
            .await
            .values()
            .filter(|r| r.seeker_id() == seeker_id)
            .cloned()
            .collect())
    }
}

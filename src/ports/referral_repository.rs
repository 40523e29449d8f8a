//! Referral request repository port (write side).

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, ReferralRequestId, UserId};
use crate::domain::referral::{ReferralRequest, ReferralStatus};

/// Repository port for ReferralRequest aggregate persistence.
///
/// Requests are never hard-deleted; terminal statuses supersede them.
#[async_trait]
pub trait ReferralRequestRepository: Send + Sync {
    /// Save a new referral request.
    async fn save(&self, request: &ReferralRequest) -> Result<(), DomainError>;

    /// Find a request by its ID. Returns `None` if not found.
    async fn find_by_id(
        &self,
        id: &ReferralRequestId,
    ) -> Result<Option<ReferralRequest>, DomainError>;

    /// Persist an updated request only if the stored status still equals
    /// `expected_status` (compare-and-set).
    ///
    /// # Errors
    ///
    /// - `RequestNotFound` if the request doesn't exist
    /// - `Conflict` if the stored status no longer matches; nothing is
    ///   written in that case
    async fn update_if_status(
        &self,
        request: &ReferralRequest,
        expected_status: ReferralStatus,
    ) -> Result<(), DomainError>;

    /// All requests where the given user is the referrer.
    async fn list_by_referrer(&self, referrer_id: &UserId)
        -> Result<Vec<ReferralRequest>, DomainError>;

    /// All requests where the given user is the seeker.
    async fn list_by_seeker(&self, seeker_id: &UserId)
        -> Result<Vec<ReferralRequest>, DomainError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn referral_repository_is_object_safe() {
        fn _accepts_dyn(_repo: &dyn ReferralRequestRepository) {}
    }
}

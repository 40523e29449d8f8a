//! StatsAggregator - derived statistics and achievements.
//!
//! Stats are never written directly by commands. The aggregator folds a
//! user's stored postings and referral requests into a `UserStats`
//! snapshot, carrying the previously unlocked achievement set forward so
//! unlocks are monotonic. Snapshots are cached per user and refreshed
//! when a subscribed event names that user.
//!
//! A failed recompute affects only that user's snapshot; the next event
//! or read triggers a fresh fold over the stored aggregates.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::foundation::{DomainError, EventEnvelope, UserId};
use crate::domain::job::JobPostingCreated;
use crate::domain::mentorship::SessionMaterialized;
use crate::domain::referral::{ReferralStatus, ReferralSubmitted, ReferralTransitioned};
use crate::domain::stats::{ActivityCounters, StatsPolicy, UserStats};
use crate::ports::{EventHandler, JobPostingRepository, ReferralRequestRepository};

/// Event types the aggregator subscribes to.
pub const STATS_EVENT_TYPES: &[&str] = &[
    "referral.submitted.v1",
    "referral.transitioned.v1",
    "job.posting_created.v1",
    "mentorship.session_materialized.v1",
];

/// Maintains derived per-user statistics snapshots.
pub struct StatsAggregator {
    referrals: Arc<dyn ReferralRequestRepository>,
    postings: Arc<dyn JobPostingRepository>,
    policy: StatsPolicy,
    cache: RwLock<HashMap<UserId, UserStats>>,
}

impl StatsAggregator {
    pub fn new(
        referrals: Arc<dyn ReferralRequestRepository>,
        postings: Arc<dyn JobPostingRepository>,
        policy: StatsPolicy,
    ) -> Self {
        Self {
            referrals,
            postings,
            policy,
            cache: RwLock::new(HashMap::new()),
        }
    }

    /// The user's current snapshot, computing one if none is cached.
    pub async fn get_stats(&self, user_id: &UserId) -> Result<UserStats, DomainError> {
        if let Some(stats) = self.cache.read().await.get(user_id) {
            return Ok(stats.clone());
        }
        self.recompute(user_id).await
    }

    /// Folds the user's stored activity into a fresh snapshot.
    ///
    /// The previously cached achievement set is unioned in, so a
    /// recompute can add unlocks but never revoke one.
    pub async fn recompute(&self, user_id: &UserId) -> Result<UserStats, DomainError> {
        let counters = self.fold_counters(user_id).await?;

        let mut cache = self.cache.write().await;
        let prior = cache
            .get(user_id)
            .map(|stats| stats.achievements.clone())
            .unwrap_or_default();

        let stats = UserStats::compute(user_id.clone(), counters, &prior, &self.policy);
        cache.insert(user_id.clone(), stats.clone());

        tracing::debug!(
            user_id = %user_id,
            impact_score = stats.impact_score,
            total_points = stats.total_points,
            level = stats.level,
            "stats snapshot recomputed"
        );

        Ok(stats)
    }

    async fn fold_counters(&self, user_id: &UserId) -> Result<ActivityCounters, DomainError> {
        let postings = self.postings.list_by_owner(user_id).await?;
        let given = self.referrals.list_by_referrer(user_id).await?;

        // Every request naming the user as referrer counts as given,
        // whatever its status; a placement requires the terminal
        // milestone.
        let referrals_given = given.len() as u64;
        let successful_placements = given
            .iter()
            .filter(|r| r.status() == ReferralStatus::Completed)
            .count() as u64;

        Ok(ActivityCounters {
            jobs_posted: postings.len() as u64,
            referrals_given,
            successful_placements,
        })
    }

    /// The user a given event's stats are attributed to.
    fn affected_user(&self, event: &EventEnvelope) -> Result<Option<UserId>, DomainError> {
        let user = match event.event_type.as_str() {
            "referral.submitted.v1" => Some(
                event
                    .payload_as::<ReferralSubmitted>()
                    .map_err(|e| malformed_payload(event, e))?
                    .referrer_id,
            ),
            "referral.transitioned.v1" => Some(
                event
                    .payload_as::<ReferralTransitioned>()
                    .map_err(|e| malformed_payload(event, e))?
                    .referrer_id,
            ),
            "job.posting_created.v1" => Some(
                event
                    .payload_as::<JobPostingCreated>()
                    .map_err(|e| malformed_payload(event, e))?
                    .owner_id,
            ),
            // Sessions refresh the mentor's snapshot but never feed the
            // referral counters; the fold reads requests and postings only.
            "mentorship.session_materialized.v1" => Some(
                event
                    .payload_as::<SessionMaterialized>()
                    .map_err(|e| malformed_payload(event, e))?
                    .mentor_id,
            ),
            _ => None,
        };
        Ok(user)
    }
}

fn malformed_payload(event: &EventEnvelope, err: serde_json::Error) -> DomainError {
    DomainError::new(
        crate::domain::foundation::ErrorCode::InternalError,
        format!("Malformed {} payload: {}", event.event_type, err),
    )
    .with_detail("event_id", event.event_id.to_string())
}

#[async_trait]
impl EventHandler for StatsAggregator {
    async fn handle(&self, event: EventEnvelope) -> Result<(), DomainError> {
        match self.affected_user(&event)? {
            Some(user_id) => {
                self.recompute(&user_id).await?;
                Ok(())
            }
            None => {
                tracing::debug!(event_type = %event.event_type, "event not stats-relevant");
                Ok(())
            }
        }
    }

    fn name(&self) -> &'static str {
        "StatsAggregator"
    }
}

//! Derived per-user statistics.
//!
//! `UserStats` is never authored directly: it is a pure fold over the
//! user's job postings and referral requests, plus a monotonic unlocked-
//! achievement set carried forward from the previous snapshot.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::domain::foundation::UserId;

use super::achievements::unlocked_for;

/// Scoring weights for the derived metrics.
///
/// Tunable policy, not law - but the formula must stay monotonic in its
/// inputs, so weights are unsigned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatsPolicy {
    /// Points per referral given.
    pub referral_weight: u64,

    /// Points per successful placement.
    pub placement_weight: u64,

    /// Bonus points per unlocked achievement.
    pub achievement_bonus: u64,
}

impl Default for StatsPolicy {
    fn default() -> Self {
        Self {
            referral_weight: 10,
            placement_weight: 25,
            achievement_bonus: 50,
        }
    }
}

/// Raw per-user counters the fold produces.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ActivityCounters {
    pub jobs_posted: u64,
    pub referrals_given: u64,
    pub successful_placements: u64,
}

/// A derived statistics snapshot for one user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserStats {
    /// The user these stats describe.
    pub user_id: UserId,

    /// Postings owned by this user.
    pub jobs_posted: u64,

    /// Referral requests where this user is the referrer.
    pub referrals_given: u64,

    /// Referred requests that reached `completed`.
    pub successful_placements: u64,

    /// Weighted reputation score.
    pub impact_score: u64,

    /// Names of unlocked achievements. Monotonic: entries are never
    /// removed across recomputes.
    pub achievements: BTreeSet<String>,

    /// Impact plus per-achievement bonus.
    pub total_points: u64,

    /// `total_points / 100 + 1`.
    pub level: u64,
}

impl UserStats {
    /// An empty snapshot for a user with no recorded activity.
    pub fn empty(user_id: UserId) -> Self {
        Self::compute(user_id, ActivityCounters::default(), &BTreeSet::new(), &StatsPolicy::default())
    }

    /// Computes a snapshot from counters, unioning `prior_achievements`
    /// into the unlocked set so an achievement, once earned, survives
    /// every later recompute.
    pub fn compute(
        user_id: UserId,
        counters: ActivityCounters,
        prior_achievements: &BTreeSet<String>,
        policy: &StatsPolicy,
    ) -> Self {
        let impact_score = counters.referrals_given * policy.referral_weight
            + counters.successful_placements * policy.placement_weight;

        let mut achievements = unlocked_for(
            counters.jobs_posted,
            counters.referrals_given,
            counters.successful_placements,
        );
        achievements.extend(prior_achievements.iter().cloned());

        let total_points = impact_score + policy.achievement_bonus * achievements.len() as u64;
        let level = total_points / 100 + 1;

        Self {
            user_id,
            jobs_posted: counters.jobs_posted,
            referrals_given: counters.referrals_given,
            successful_placements: counters.successful_placements,
            impact_score,
            achievements,
            total_points,
            level,
        }
    }
}

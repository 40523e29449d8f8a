//! Threshold-based achievement catalog.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Which counter an achievement threshold applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    JobsPosted,
    ReferralsGiven,
    SuccessfulPlacements,
}

/// A single (metric, threshold) achievement definition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Achievement {
    pub name: &'static str,
    pub metric: Metric,
    pub threshold: u64,
}

/// The fixed achievement catalog.
///
/// Thresholds only ever unlock; nothing here supports revocation.
pub static ACHIEVEMENT_CATALOG: Lazy<Vec<Achievement>> = Lazy::new(|| {
    vec![
        Achievement {
            name: "First Referral",
            metric: Metric::ReferralsGiven,
            threshold: 1,
        },
        Achievement {
            name: "Referral Expert",
            metric: Metric::ReferralsGiven,
            threshold: 10,
        },
        Achievement {
            name: "Community Pillar",
            metric: Metric::ReferralsGiven,
            threshold: 25,
        },
        Achievement {
            name: "Placement Master",
            metric: Metric::SuccessfulPlacements,
            threshold: 5,
        },
        Achievement {
            name: "Job Creator",
            metric: Metric::JobsPosted,
            threshold: 5,
        },
    ]
});

/// Returns the names of every catalog entry whose threshold the given
/// counters meet. Pure; the caller unions this with previously cached
/// unlocks to keep the set monotonic.
pub fn unlocked_for(
    jobs_posted: u64,
    referrals_given: u64,
    successful_placements: u64,
) -> BTreeSet<String> {
    ACHIEVEMENT_CATALOG
        .iter()
        .filter(|achievement| {
            let counter = match achievement.metric {
                Metric::JobsPosted => jobs_posted,
                Metric::ReferralsGiven => referrals_given,
                Metric::SuccessfulPlacements => successful_placements,
            };
            counter >= achievement.threshold
        })
        .map(|achievement| achievement.name.to_string())
        .collect()
}

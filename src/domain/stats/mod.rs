//! Derived statistics and achievements.

mod achievements;
mod user_stats;

pub use achievements::{unlocked_for, Achievement, Metric, ACHIEVEMENT_CATALOG};
pub use user_stats::{ActivityCounters, StatsPolicy, UserStats};

//! Derived statistics aggregation.

mod aggregator;

pub use aggregator::{StatsAggregator, STATS_EVENT_TYPES};

//! In-memory repository adapters.
//!
//! Back the store ports with `tokio::sync::RwLock`-guarded maps. The
//! concurrency-sensitive operations (`update_if_status`,
//! `insert_if_absent`) hold one write lock across check and write, which
//! is what gives them their atomicity.

mod job_postings;
mod referrals;
mod sessions;

pub use job_postings::InMemoryJobPostingRepository;
pub use referrals::InMemoryReferralRequestRepository;
pub use sessions::InMemorySessionRepository;

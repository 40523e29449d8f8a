//! Job posting aggregate.
//!
//! Postings are mostly managed by the excluded CRUD surface; the engine
//! only needs them as referral targets (must be active at submission)
//! and as inputs to the statistics fold (jobs posted per owner).

mod events;
mod posting;

pub use events::JobPostingCreated;
pub use posting::JobPosting;

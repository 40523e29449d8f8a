//! Referral request lifecycle.
//!
//! A referral request is a seeker's application against a job posting,
//! owned by exactly one seeker and one referrer. Its status only ever
//! moves forward along the lifecycle graph; every accepted transition
//! appends an immutable audit note.

mod aggregate;
mod events;
mod status;

pub use aggregate::{ApplicationPayload, AuditNote, ReferralRequest};
pub use events::{ReferralSubmitted, ReferralTransitioned};
pub use status::{ActorRole, ReferralStatus};

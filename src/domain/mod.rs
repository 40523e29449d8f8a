//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (value objects, IDs, events, errors)
//! - `referral` - Referral request lifecycle and audit trail
//! - `job` - Job posting aggregate
//! - `mentorship` - Mentorship session aggregate and booking wizard
//! - `payment` - Payment orders, signature verification, self-attested attempts
//! - `stats` - Derived per-user statistics and achievement catalog

pub mod foundation;
pub mod job;
pub mod mentorship;
pub mod payment;
pub mod referral;
pub mod stats;

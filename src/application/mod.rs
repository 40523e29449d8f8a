//! Application layer - command handlers and coordinators.
//!
//! Orchestrates domain aggregates through the ports: referral commands,
//! booking/payment coordination, and event-driven stats aggregation.

pub mod booking;
pub mod referral;
pub mod stats;

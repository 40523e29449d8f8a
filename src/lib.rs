//! Talent Relay - Referral Marketplace Transaction Lifecycle Engine
//!
//! This crate implements the transaction core of a referral marketplace:
//! the referral-request status state machine, the dual-channel payment
//! confirmation flow for mentorship bookings, and the derived statistics
//! and achievement aggregation that consumes the same event stream.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;

//! Adapters - Implementations of the ports.
//!
//! Everything here is in-memory or mock: repositories, event bus,
//! outbox, notifiers, and the payment gateway double. Durable backends
//! slot in behind the same ports.

pub mod events;
pub mod gateway;
pub mod memory;
pub mod notifications;

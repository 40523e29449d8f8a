//! Booking and payment coordination.

mod coordinator;

pub use coordinator::{AttemptHandle, BookingCoordinator};

//! Mentorship session aggregate and booking wizard.
//!
//! A session only ever exists in the store after payment is confirmed
//! ("materialize"); the wizard steps before that are transient, caller-
//! held state with nothing durable to orphan.

mod booking;
mod events;
mod session;
mod status;

pub use booking::{BookingQuote, BookingWizard, ServiceDescriptor};
pub use events::{SessionCancelled, SessionCompleted, SessionMaterialized};
pub use session::MentorshipSession;
pub use status::{PaymentStatus, SessionStatus};

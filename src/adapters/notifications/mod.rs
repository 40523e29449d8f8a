//! Notification dispatch adapters.

mod outbox;
mod recording;
mod tracing_notifier;

pub use outbox::{InMemoryOutbox, OutboxNotifier, MAX_DELIVERY_ATTEMPTS, NOTIFICATION_EVENT_TYPE};
pub use recording::RecordingNotifier;
pub use tracing_notifier::TracingNotifier;

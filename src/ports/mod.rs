//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! ## Store Ports
//!
//! - `JobPostingRepository` / `ReferralRequestRepository` /
//!   `SessionRepository` - document collections; the referral repository
//!   exposes a compare-and-set update, the session repository an
//!   idempotent insert keyed by payment reference
//!
//! ## Event Ports
//!
//! - `EventPublisher` / `EventSubscriber` / `EventHandler` - the change
//!   stream downstream consumers subscribe to
//! - `ProcessedEventStore` - idempotency tracking for event handlers
//! - `OutboxWriter` - durable at-least-once delivery
//!
//! ## Collaborator Ports
//!
//! - `PaymentGateway` - upstream order creation
//! - `NotificationDispatcher` - best-effort user notifications

mod event_publisher;
mod event_subscriber;
mod job_posting_repository;
mod notification_dispatcher;
mod outbox_writer;
mod payment_gateway;
mod processed_event_store;
mod referral_repository;
mod session_repository;

pub use event_publisher::EventPublisher;
pub use event_subscriber::{EventBus, EventHandler, EventSubscriber};
pub use job_posting_repository::JobPostingRepository;
pub use notification_dispatcher::{Notification, NotificationDispatcher, NotificationKind};
pub use outbox_writer::{OutboxEntry, OutboxStatus, OutboxWriter};
pub use payment_gateway::PaymentGateway;
pub use processed_event_store::ProcessedEventStore;
pub use referral_repository::ReferralRequestRepository;
pub use session_repository::{InsertOutcome, SessionRepository};

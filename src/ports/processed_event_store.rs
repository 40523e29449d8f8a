//! ProcessedEventStore port - Interface for tracking processed events.
//!
//! Events may be delivered more than once (network retries, outbox
//! redelivery, consumer crashes before acknowledgment). Handlers are
//! wrapped in an idempotency decorator that consults this store, so a
//! redelivered event is skipped instead of double-processed.

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, EventId, Timestamp};

/// Port for tracking which events have been processed by which handlers.
///
/// Each handler has its own processing record, so different handlers
/// process the same event independently.
#[async_trait]
pub trait ProcessedEventStore: Send + Sync {
    /// Check if an event has been processed by a specific handler.
    async fn contains(&self, event_id: &EventId, handler_name: &str)
        -> Result<bool, DomainError>;

    /// Mark an event as processed by a specific handler.
    ///
    /// Called AFTER successful handling so the event is not reprocessed
    /// on redelivery.
    async fn mark_processed(
        &self,
        event_id: &EventId,
        handler_name: &str,
    ) -> Result<(), DomainError>;

    /// Delete entries older than the given timestamp (retention).
    ///
    /// Returns the number of entries deleted.
    async fn delete_before(&self, timestamp: Timestamp) -> Result<u64, DomainError>;
}

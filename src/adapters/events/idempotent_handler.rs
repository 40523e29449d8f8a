//! IdempotentHandler - at-most-once processing wrapper.
//!
//! Wraps any `EventHandler` with a `ProcessedEventStore` check so a
//! redelivered event is skipped instead of double-processed. If the
//! inner handler fails, the event is NOT marked processed, so the next
//! delivery retries it.

use async_trait::async_trait;
use std::sync::Arc;

use crate::domain::foundation::{DomainError, EventEnvelope};
use crate::ports::{EventHandler, ProcessedEventStore};

/// Idempotency decorator for event handlers.
///
/// Uses the inner handler's `name()` as the idempotency scope, so two
/// different handlers each process the same event once.
pub struct IdempotentHandler<H: EventHandler> {
    inner: H,
    processed_events: Arc<dyn ProcessedEventStore>,
}

impl<H: EventHandler> IdempotentHandler<H> {
    pub fn new(inner: H, processed_events: Arc<dyn ProcessedEventStore>) -> Self {
        Self {
            inner,
            processed_events,
        }
    }
}

#[async_trait]
impl<H: EventHandler + 'static> EventHandler for IdempotentHandler<H> {
    async fn handle(&self, envelope: EventEnvelope) -> Result<(), DomainError> {
        let handler_name = self.inner.name();

        if self
            .processed_events
            .contains(&envelope.event_id, handler_name)
            .await?
        {
            tracing::debug!(
                event_id = %envelope.event_id,
                handler = handler_name,
                "skipping duplicate event"
            );
            return Ok(());
        }

        self.inner.handle(envelope.clone()).await?;

        // Mark only after successful handling
        self.processed_events
            .mark_processed(&envelope.event_id, handler_name)
            .await?;

        Ok(())
    }

    fn name(&self) -> &'static str {
        self.inner.name()
    }
}

//! In-memory event bus.
//!
//! Synchronous, deterministic delivery; doubles as the change stream in
//! tests, where its capture buffer backs assertions on what was
//! published.
//!
//! Uses `.expect()` on lock operations: a poisoned lock here means a
//! panic already happened on another thread and the process is done for.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::domain::foundation::{DomainError, ErrorCode, EventEnvelope};
use crate::ports::{EventHandler, EventPublisher, EventSubscriber};

/// In-memory event bus with handler dispatch and event capture.
pub struct InMemoryEventBus {
    handlers: RwLock<HashMap<String, Vec<Arc<dyn EventHandler>>>>,
    published: RwLock<Vec<EventEnvelope>>,
}

impl InMemoryEventBus {
    /// Creates a new empty event bus.
    pub fn new() -> Self {
        Self {
            handlers: RwLock::new(HashMap::new()),
            published: RwLock::new(Vec::new()),
        }
    }

    // === Test helpers ===

    /// All published events, in publish order.
    pub fn published_events(&self) -> Vec<EventEnvelope> {
        self.published
            .read()
            .expect("InMemoryEventBus: published lock poisoned")
            .clone()
    }

    /// Published events of one type.
    pub fn events_of_type(&self, event_type: &str) -> Vec<EventEnvelope> {
        self.published_events()
            .into_iter()
            .filter(|e| e.event_type == event_type)
            .collect()
    }

    /// Published events for one aggregate.
    pub fn events_for_aggregate(&self, aggregate_id: &str) -> Vec<EventEnvelope> {
        self.published_events()
            .into_iter()
            .filter(|e| e.aggregate_id == aggregate_id)
            .collect()
    }

    /// Count of published events.
    pub fn event_count(&self) -> usize {
        self.published
            .read()
            .expect("InMemoryEventBus: published lock poisoned")
            .len()
    }

    /// Whether any event of the given type was published.
    pub fn has_event(&self, event_type: &str) -> bool {
        self.published
            .read()
            .expect("InMemoryEventBus: published lock poisoned")
            .iter()
            .any(|e| e.event_type == event_type)
    }

    /// Clears captured events (test isolation).
    pub fn clear(&self) {
        self.published
            .write()
            .expect("InMemoryEventBus: published write lock poisoned")
            .clear();
    }
}

impl Default for InMemoryEventBus {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl EventPublisher for InMemoryEventBus {
    async fn publish(&self, event: EventEnvelope) -> Result<(), DomainError> {
        self.published
            .write()
            .expect("InMemoryEventBus: published write lock poisoned")
            .push(event.clone());

        // Clone handlers out so the lock is released before await points
        let type_handlers: Vec<Arc<dyn EventHandler>> = {
            let handlers = self
                .handlers
                .read()
                .expect("InMemoryEventBus: handlers lock poisoned");
            handlers
                .get(&event.event_type)
                .cloned()
                .unwrap_or_default()
        };

        // Handlers are independent; one failure must not starve the rest
        let mut errors = Vec::new();
        for handler in type_handlers {
            if let Err(e) = handler.handle(event.clone()).await {
                errors.push(format!("{}: {}", handler.name(), e));
            }
        }

        if !errors.is_empty() {
            return Err(DomainError::new(
                ErrorCode::InternalError,
                format!("Handler errors: {}", errors.join(", ")),
            ));
        }

        Ok(())
    }

    async fn publish_all(&self, events: Vec<EventEnvelope>) -> Result<(), DomainError> {
        for event in events {
            self.publish(event).await?;
        }
        Ok(())
    }
}

impl EventSubscriber for InMemoryEventBus {
    fn subscribe(&self, event_type: &str, handler: Arc<dyn EventHandler>) {
        let mut handlers = self
            .handlers
            .write()
            .expect("InMemoryEventBus: handlers write lock poisoned");
        handlers
            .entry(event_type.to_string())
            .or_default()
            .push(handler);
    }

    fn subscribe_all(&self, event_types: &[&str], handler: Arc<dyn EventHandler>) {
        let mut handlers = self
            .handlers
            .write()
            .expect("InMemoryEventBus: handlers write lock poisoned");
        for event_type in event_types {
            handlers
                .entry(event_type.to_string())
                .or_default()
                .push(Arc::clone(&handler));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn envelope(event_type: &str, aggregate_id: &str) -> EventEnvelope {
        EventEnvelope::new(event_type, aggregate_id, "ReferralRequest", json!({}))
    }

    struct CountingHandler(Arc<AtomicUsize>);

    #[async_trait]
    impl EventHandler for CountingHandler {
        async fn handle(&self, _: EventEnvelope) -> Result<(), DomainError> {
            self.0.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
        fn name(&self) -> &'static str {
            "CountingHandler"
        }
    }

    #[tokio::test]
    async fn publish_captures_event() {
        let bus = InMemoryEventBus::new();
        bus.publish(envelope("referral.submitted.v1", "req-1"))
            .await
            .unwrap();

        assert_eq!(bus.event_count(), 1);
        assert!(bus.has_event("referral.submitted.v1"));
    }

    #[tokio::test]
    async fn events_of_type_filters() {
        let bus = InMemoryEventBus::new();
        bus.publish(envelope("referral.submitted.v1", "req-1"))
            .await
            .unwrap();
        bus.publish(envelope("referral.transitioned.v1", "req-1"))
            .await
            .unwrap();
        bus.publish(envelope("referral.submitted.v1", "req-2"))
            .await
            .unwrap();

        assert_eq!(bus.events_of_type("referral.submitted.v1").len(), 2);
        assert_eq!(bus.events_for_aggregate("req-1").len(), 2);
    }

    #[tokio::test]
    async fn handler_receives_subscribed_type_only() {
        let bus = Arc::new(InMemoryEventBus::new());
        let count = Arc::new(AtomicUsize::new(0));

        bus.subscribe(
            "referral.transitioned.v1",
            Arc::new(CountingHandler(count.clone())),
        );

        bus.publish(envelope("referral.transitioned.v1", "req-1"))
            .await
            .unwrap();
        bus.publish(envelope("referral.submitted.v1", "req-1"))
            .await
            .unwrap();

        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn subscribe_all_registers_for_multiple_types() {
        let bus = Arc::new(InMemoryEventBus::new());
        let count = Arc::new(AtomicUsize::new(0));

        bus.subscribe_all(
            &["referral.submitted.v1", "job.posting_created.v1"],
            Arc::new(CountingHandler(count.clone())),
        );

        bus.publish(envelope("referral.submitted.v1", "req-1"))
            .await
            .unwrap();
        bus.publish(envelope("job.posting_created.v1", "job-1"))
            .await
            .unwrap();
        bus.publish(envelope("mentorship.session_materialized.v1", "ses-1"))
            .await
            .unwrap();

        assert_eq!(count.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn handler_error_is_surfaced_but_others_still_run() {
        struct FailingHandler;

        #[async_trait]
        impl EventHandler for FailingHandler {
            async fn handle(&self, _: EventEnvelope) -> Result<(), DomainError> {
                Err(DomainError::new(ErrorCode::InternalError, "boom"))
            }
            fn name(&self) -> &'static str {
                "FailingHandler"
            }
        }

        let bus = Arc::new(InMemoryEventBus::new());
        let count = Arc::new(AtomicUsize::new(0));
        bus.subscribe("referral.submitted.v1", Arc::new(FailingHandler));
        bus.subscribe(
            "referral.submitted.v1",
            Arc::new(CountingHandler(count.clone())),
        );

        let result = bus.publish(envelope("referral.submitted.v1", "req-1")).await;

        assert!(result.is_err());
        assert!(result.unwrap_err().message.contains("FailingHandler"));
        // The second handler still ran.
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn clear_resets_capture() {
        let bus = InMemoryEventBus::new();
        bus.publish(envelope("referral.submitted.v1", "req-1"))
            .await
            .unwrap();
        bus.clear();
        assert_eq!(bus.event_count(), 0);
    }
}

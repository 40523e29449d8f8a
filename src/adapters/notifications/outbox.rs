//! Outbox-backed notification delivery.
//!
//! The plain fire-and-forget path drops a notification when the channel
//! errors. `OutboxNotifier` records every notification durably first and
//! delivers from the outbox, so a failed delivery stays visible and is
//! retried on the next pass (at-least-once, bounded attempts).

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::foundation::{DomainError, ErrorCode, EventEnvelope};
use crate::ports::{
    Notification, NotificationDispatcher, OutboxEntry, OutboxStatus, OutboxWriter,
};

/// Event type used for notification outbox entries.
pub const NOTIFICATION_EVENT_TYPE: &str = "notification.requested.v1";

/// Attempts after which a failed entry is no longer redelivered.
pub const MAX_DELIVERY_ATTEMPTS: u32 = 5;

/// In-memory outbox.
pub struct InMemoryOutbox {
    entries: RwLock<Vec<OutboxEntry>>,
}

impl InMemoryOutbox {
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(Vec::new()),
        }
    }

    /// All entries (test assertions).
    pub async fn entries(&self) -> Vec<OutboxEntry> {
        self.entries.read().await.clone()
    }
}

impl Default for InMemoryOutbox {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl OutboxWriter for InMemoryOutbox {
    async fn write(
        &self,
        event: &EventEnvelope,
        partition_key: &str,
    ) -> Result<OutboxEntry, DomainError> {
        let entry = OutboxEntry::new(event.clone(), partition_key);
        self.entries.write().await.push(entry.clone());
        Ok(entry)
    }

    async fn get_deliverable(&self, limit: u32) -> Result<Vec<OutboxEntry>, DomainError> {
        Ok(self
            .entries
            .read()
            .await
            .iter()
            .filter(|e| match e.status {
                OutboxStatus::Pending => true,
                OutboxStatus::Failed => e.attempts < MAX_DELIVERY_ATTEMPTS,
                OutboxStatus::Published => false,
            })
            .take(limit as usize)
            .cloned()
            .collect())
    }

    async fn mark_published(&self, id: Uuid) -> Result<(), DomainError> {
        let mut entries = self.entries.write().await;
        let entry = entries
            .iter_mut()
            .find(|e| e.id == id)
            .ok_or_else(|| DomainError::new(ErrorCode::StorageError, "Outbox entry not found"))?;
        entry.mark_published();
        Ok(())
    }

    async fn mark_failed(&self, id: Uuid, error: &str) -> Result<(), DomainError> {
        let mut entries = self.entries.write().await;
        let entry = entries
            .iter_mut()
            .find(|e| e.id == id)
            .ok_or_else(|| DomainError::new(ErrorCode::StorageError, "Outbox entry not found"))?;
        entry.mark_failed(error);
        Ok(())
    }
}

/// Notification dispatcher that routes through an outbox.
///
/// `notify` only records the notification; `deliver_pending` drains the
/// outbox through the wrapped dispatcher and records each outcome.
pub struct OutboxNotifier {
    outbox: Arc<dyn OutboxWriter>,
    inner: Arc<dyn NotificationDispatcher>,
}

impl OutboxNotifier {
    pub fn new(outbox: Arc<dyn OutboxWriter>, inner: Arc<dyn NotificationDispatcher>) -> Self {
        Self { outbox, inner }
    }

    /// One delivery pass: attempt every deliverable entry, mark
    /// published or failed. Returns how many were delivered.
    pub async fn deliver_pending(&self, limit: u32) -> Result<u32, DomainError> {
        let mut delivered = 0;
        for entry in self.outbox.get_deliverable(limit).await? {
            let notification: Notification = entry.event.payload_as().map_err(|e| {
                DomainError::new(
                    ErrorCode::InternalError,
                    format!("Malformed notification payload: {}", e),
                )
            })?;

            match self.inner.notify(notification).await {
                Ok(()) => {
                    self.outbox.mark_published(entry.id).await?;
                    delivered += 1;
                }
                Err(e) => {
                    tracing::warn!(entry_id = %entry.id, error = %e, "notification delivery failed");
                    self.outbox.mark_failed(entry.id, &e.message).await?;
                }
            }
        }
        Ok(delivered)
    }
}

#[async_trait]
impl NotificationDispatcher for OutboxNotifier {
    async fn notify(&self, notification: Notification) -> Result<(), DomainError> {
        let envelope = EventEnvelope::new(
            NOTIFICATION_EVENT_TYPE,
            notification.recipient.to_string(),
            "Notification",
            serde_json::to_value(&notification).map_err(|e| {
                DomainError::new(
                    ErrorCode::InternalError,
                    format!("Notification serialization failed: {}", e),
                )
            })?,
        );
        self.outbox
            .write(&envelope, notification.recipient.as_str())
            .await?;
        Ok(())
    }
}

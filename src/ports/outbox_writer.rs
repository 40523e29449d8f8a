//! OutboxWriter port - durable notification/event delivery.
//!
//! The fire-and-forget notification path drops messages on failure. For
//! consumers that need at-least-once delivery, entries are first written
//! to an outbox, then a relay publishes them and records the outcome;
//! failed entries stay visible for bounded redelivery.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::foundation::{DomainError, EventEnvelope, Timestamp};

/// Status of an outbox entry in the delivery pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutboxStatus {
    /// Written but not yet published.
    Pending,
    /// Successfully published.
    Published,
    /// Publish failed; eligible for retry.
    Failed,
}

/// An entry in the outbox.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutboxEntry {
    /// Unique identifier for this entry.
    pub id: Uuid,

    /// The event envelope to deliver.
    pub event: EventEnvelope,

    /// Current delivery status.
    pub status: OutboxStatus,

    /// When the entry was written.
    pub created_at: Timestamp,

    /// When the entry was last processed (published or failed).
    pub processed_at: Option<Timestamp>,

    /// Number of publish attempts.
    pub attempts: u32,

    /// Last error message if failed.
    pub last_error: Option<String>,

    /// Partition key (typically the recipient user id).
    pub partition_key: String,
}

impl OutboxEntry {
    /// Create a new pending entry for an event.
    pub fn new(event: EventEnvelope, partition_key: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            event,
            status: OutboxStatus::Pending,
            created_at: Timestamp::now(),
            processed_at: None,
            attempts: 0,
            last_error: None,
            partition_key: partition_key.into(),
        }
    }

    /// Mark the entry as successfully published.
    pub fn mark_published(&mut self) {
        self.status = OutboxStatus::Published;
        self.processed_at = Some(Timestamp::now());
        self.attempts += 1;
    }

    /// Mark the entry as failed with an error.
    pub fn mark_failed(&mut self, error: impl Into<String>) {
        self.status = OutboxStatus::Failed;
        self.processed_at = Some(Timestamp::now());
        self.attempts += 1;
        self.last_error = Some(error.into());
    }
}

/// Port for writing entries to the outbox and driving delivery.
#[async_trait]
pub trait OutboxWriter: Send + Sync {
    /// Write a single event to the outbox.
    async fn write(
        &self,
        event: &EventEnvelope,
        partition_key: &str,
    ) -> Result<OutboxEntry, DomainError>;

    /// Pending and retryable failed entries, oldest first, capped at
    /// `limit`. Failed entries past the adapter's attempt bound are
    /// excluded.
    async fn get_deliverable(&self, limit: u32) -> Result<Vec<OutboxEntry>, DomainError>;

    /// Mark an entry as successfully published.
    async fn mark_published(&self, id: Uuid) -> Result<(), DomainError>;

    /// Mark an entry as failed.
    async fn mark_failed(&self, id: Uuid, error: &str) -> Result<(), DomainError>;
}

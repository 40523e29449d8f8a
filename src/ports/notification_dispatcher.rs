//! Notification dispatcher port.
//!
//! Notifications are best-effort from the engine's perspective: callers
//! spawn the dispatch and log failures, they never block or fail a
//! command on delivery problems. Adapters that need stronger delivery
//! guarantees route through the outbox.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::foundation::{DomainError, Timestamp, UserId};

/// What a notification is about, used by adapters for templating.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    ReferralAccepted,
    ReferralRejected,
    SessionBooked,
}

/// A notification to one user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    /// Who should receive it.
    pub recipient: UserId,

    /// What happened.
    pub kind: NotificationKind,

    /// Short human-readable message.
    pub message: String,

    /// When the triggering change happened.
    pub occurred_at: Timestamp,
}

impl Notification {
    pub fn new(recipient: UserId, kind: NotificationKind, message: impl Into<String>) -> Self {
        Self {
            recipient,
            kind,
            message: message.into(),
            occurred_at: Timestamp::now(),
        }
    }
}

/// Port for dispatching user notifications.
#[async_trait]
pub trait NotificationDispatcher: Send + Sync {
    /// Deliver one notification.
    async fn notify(&self, notification: Notification) -> Result<(), DomainError>;
}

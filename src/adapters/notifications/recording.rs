//! Recording notification adapter for tests.

use async_trait::async_trait;
use std::sync::{Arc, Mutex};

use crate::domain::foundation::{DomainError, ErrorCode, UserId};
use crate::ports::{Notification, NotificationDispatcher};

/// Captures notifications for test assertions; can be told to fail.
pub struct RecordingNotifier {
    sent: Arc<Mutex<Vec<Notification>>>,
    fail: Mutex<bool>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self {
            sent: Arc::new(Mutex::new(Vec::new())),
            fail: Mutex::new(false),
        }
    }

    /// All delivered notifications, in dispatch order.
    pub fn sent(&self) -> Vec<Notification> {
        self.sent
            .lock()
            .expect("RecordingNotifier: sent lock poisoned")
            .clone()
    }

    /// Notifications addressed to one user.
    pub fn sent_to(&self, recipient: &UserId) -> Vec<Notification> {
        self.sent()
            .into_iter()
            .filter(|n| &n.recipient == recipient)
            .collect()
    }

    /// Makes every subsequent `notify` fail (for failure-path tests).
    pub fn fail_deliveries(&self) {
        *self
            .fail
            .lock()
            .expect("RecordingNotifier: fail lock poisoned") = true;
    }
}

impl Default for RecordingNotifier {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl NotificationDispatcher for RecordingNotifier {
    async fn notify(&self, notification: Notification) -> Result<(), DomainError> {
        if *self
            .fail
            .lock()
            .expect("RecordingNotifier: fail lock poisoned")
        {
            return Err(DomainError::new(
                ErrorCode::InternalError,
                "Notification channel down",
            ));
        }
        self.sent
            .lock()
            .expect("RecordingNotifier: sent lock poisoned")
            .push(notification);
        Ok(())
    }
}

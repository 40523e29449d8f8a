//! Notification adapter that writes to the tracing log.

use async_trait::async_trait;

use crate::domain::foundation::DomainError;
use crate::ports::{Notification, NotificationDispatcher};

/// Logs every notification at `info`. The default adapter when no real
/// delivery channel is wired up.
pub struct TracingNotifier;

#[async_trait]
impl NotificationDispatcher for TracingNotifier {
    async fn notify(&self, notification: Notification) -> Result<(), DomainError> {
        tracing::info!(
            recipient = %notification.recipient,
            kind = ?notification.kind,
            message = %notification.message,
            "notification dispatched"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::UserId;
    use crate::ports::NotificationKind;

    #[tokio::test]
    async fn logging_delivery_always_succeeds() {
        let notifier = TracingNotifier;
        let notification = Notification::new(
            UserId::new("user-1").unwrap(),
            NotificationKind::ReferralAccepted,
            "Your request was accepted",
        );
        assert!(notifier.notify(notification).await.is_ok());
    }
}

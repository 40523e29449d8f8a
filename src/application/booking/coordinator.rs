//! BookingCoordinator - turns confirmed payments into sessions.
//!
//! Both payment channels funnel into one `materialize` step:
//!
//! - **Gateway**: an order is created upstream, the client pays, and the
//!   gateway's signed callback is verified before materialization.
//! - **Self-attested**: a countdown attempt is opened, a background
//!   sweeper expires it at the deadline, and the payer's in-window
//!   assertion is taken at face value.
//!
//! Materialization is idempotent on the confirming payment reference:
//! a duplicate confirmation observes the first writer's session, emits
//! no second event, and sends no second notification.

use std::sync::Arc;

use tokio::sync::Mutex;
use uuid::Uuid;

use crate::config::BookingConfig;
use crate::domain::foundation::{
    CommandMetadata, DomainError, ErrorCode, EventId, SerializableDomainEvent, SessionId,
    Timestamp,
};
use crate::domain::mentorship::{
    BookingQuote, MentorshipSession, SessionCancelled, SessionCompleted, SessionMaterialized,
    SessionStatus,
};
use crate::domain::payment::{
    AttemptState, GatewayOrder, GatewaySignatureVerifier, PaymentCallback, PaymentReference,
    PaymentRequest, SelfAttestedAttempt,
};
use crate::ports::{
    EventPublisher, Notification, NotificationDispatcher, NotificationKind, PaymentGateway,
    SessionRepository,
};

/// Shared handle to an open self-attested attempt.
///
/// The mutex serializes the three racing writers (payer confirmation,
/// sweeper expiry, explicit cancel); the attempt itself enforces
/// first-writer-wins given that serialization.
pub type AttemptHandle = Arc<Mutex<SelfAttestedAttempt>>;

/// Coordinates payment confirmation and session materialization.
pub struct BookingCoordinator {
    sessions: Arc<dyn SessionRepository>,
    gateway: Arc<dyn PaymentGateway>,
    verifier: GatewaySignatureVerifier,
    event_publisher: Arc<dyn EventPublisher>,
    notifier: Arc<dyn NotificationDispatcher>,
    config: BookingConfig,
}

impl BookingCoordinator {
    pub fn new(
        sessions: Arc<dyn SessionRepository>,
        gateway: Arc<dyn PaymentGateway>,
        verifier: GatewaySignatureVerifier,
        event_publisher: Arc<dyn EventPublisher>,
        notifier: Arc<dyn NotificationDispatcher>,
        config: BookingConfig,
    ) -> Self {
        Self {
            sessions,
            gateway,
            verifier,
            event_publisher,
            notifier,
            config,
        }
    }

    // ─────────────────────────────────────────────────────────────────────
    // Gateway channel
    // ─────────────────────────────────────────────────────────────────────

    /// Creates a gateway order for a quoted booking.
    ///
    /// The receipt is derived from mentee + time so a client retry
    /// reuses the upstream order instead of creating a second charge.
    pub async fn create_gateway_order(
        &self,
        quote: &BookingQuote,
    ) -> Result<GatewayOrder, DomainError> {
        let receipt = GatewayOrder::receipt_for(&quote.mentee_id, &Timestamp::now());
        self.gateway
            .create_order(quote.service.price.clone(), &receipt)
            .await
    }

    /// Verifies a gateway callback and materializes the session.
    ///
    /// # Errors
    ///
    /// - `PaymentVerificationFailed` if the signature is forged or
    ///   malformed; nothing is persisted
    /// - `Conflict` if the mentor's slot was taken meanwhile
    pub async fn confirm_gateway_payment(
        &self,
        quote: BookingQuote,
        callback: PaymentCallback,
        metadata: CommandMetadata,
    ) -> Result<MentorshipSession, DomainError> {
        self.verifier.verify(&callback)?;

        tracing::info!(
            order_id = %callback.order_id,
            payment_id = %callback.payment_id,
            mentee_id = %quote.mentee_id,
            "gateway payment verified"
        );

        let payment_ref = PaymentReference::gateway(callback.payment_id);
        self.materialize(quote, payment_ref, metadata).await
    }

    // ─────────────────────────────────────────────────────────────────────
    // Self-attested channel
    // ─────────────────────────────────────────────────────────────────────

    /// Opens a self-attested attempt and arms its expiry sweeper.
    ///
    /// The sweeper fires once at the deadline; if no confirmation or
    /// cancel landed first, it decides the outcome as timed out.
    pub fn start_self_attested(
        &self,
        quote: &BookingQuote,
        payee_address: impl Into<String>,
    ) -> AttemptHandle {
        let payment_request = PaymentRequest {
            payee_address: payee_address.into(),
            amount: quote.service.price.clone(),
            note: format!("Mentorship: {}", quote.service.title),
        };
        let timeout_secs = self.config.self_attested_timeout_secs;
        let now = Timestamp::now();
        let attempt = Arc::new(Mutex::new(SelfAttestedAttempt::open(
            payment_request,
            now,
            timeout_secs,
        )));

        let deadline = now.plus_secs(timeout_secs);
        let sweeper_handle = Arc::clone(&attempt);
        tokio::spawn(async move {
            tokio::time::sleep(std::time::Duration::from_secs(timeout_secs)).await;
            let mut attempt = sweeper_handle.lock().await;
            if attempt.expire(deadline) {
                tracing::info!(
                    deadline = %deadline.as_unix_secs(),
                    "self-attested attempt expired without confirmation"
                );
            }
        });

        attempt
    }

    /// Records the payer's completion assertion and materializes the
    /// session.
    ///
    /// The assertion is unverifiable by construction, so it is taken at
    /// face value inside the window and audit-logged. A duplicate
    /// assertion returns the already-materialized session.
    ///
    /// # Errors
    ///
    /// - `PaymentTimeout` if the window closed first (timeout wins even
    ///   against an in-window assertion that arrived after the sweeper)
    pub async fn confirm_self_attested(
        &self,
        attempt: &AttemptHandle,
        quote: BookingQuote,
        transaction_id: impl Into<String>,
        metadata: CommandMetadata,
    ) -> Result<MentorshipSession, DomainError> {
        let transaction_id = transaction_id.into();
        let payment_ref = {
            let mut attempt = attempt.lock().await;
            match attempt.confirm(transaction_id.clone(), Timestamp::now()) {
                Ok(reference) => {
                    tracing::info!(
                        transaction_id = %transaction_id,
                        mentee_id = %quote.mentee_id,
                        mentor_id = %quote.mentor_id,
                        "self-attested payment asserted"
                    );
                    reference
                }
                Err(err) if err.is(ErrorCode::DuplicatePayment) => {
                    // Re-confirmation: converge on the first assertion's
                    // session rather than failing the caller.
                    match attempt.state() {
                        AttemptState::Confirmed { transaction_id, .. } => {
                            PaymentReference::self_attested(transaction_id.clone())
                        }
                        _ => return Err(err),
                    }
                }
                Err(err) => return Err(err),
            }
        };

        self.materialize(quote, payment_ref, metadata).await
    }

    /// Cancels a still-pending attempt on explicit payer action.
    ///
    /// Returns true when this call decided the outcome.
    pub async fn cancel_self_attested(&self, attempt: &AttemptHandle) -> bool {
        let mut attempt = attempt.lock().await;
        let cancelled = attempt.cancel();
        if cancelled {
            tracing::info!("self-attested attempt cancelled by payer");
        }
        cancelled
    }

    // ─────────────────────────────────────────────────────────────────────
    // Materialization
    // ─────────────────────────────────────────────────────────────────────

    /// Turns a confirmed payment into a stored session.
    ///
    /// Idempotent on the payment reference: the first writer inserts,
    /// publishes the event, and notifies both parties; every later
    /// caller observes that session with no side effects.
    async fn materialize(
        &self,
        quote: BookingQuote,
        payment_ref: PaymentReference,
        metadata: CommandMetadata,
    ) -> Result<MentorshipSession, DomainError> {
        self.ensure_slot_free(&quote, &payment_ref).await?;

        let session = MentorshipSession::materialize(
            SessionId::new(),
            quote,
            payment_ref,
            format!("meet-{}", Uuid::new_v4()),
        );

        let outcome = self.sessions.insert_if_absent(session).await?;
        let session = outcome.session().clone();

        if !outcome.is_inserted() {
            tracing::debug!(
                session_id = %session.id(),
                payment_ref = %session.payment_ref(),
                "duplicate confirmation observed existing session"
            );
            return Ok(session);
        }

        let event = SessionMaterialized {
            event_id: EventId::new(),
            session_id: session.id().clone(),
            mentor_id: session.mentor_id().clone(),
            mentee_id: session.mentee_id().clone(),
            channel: session.payment_ref().channel,
            payment_ref: session.payment_ref().clone(),
            scheduled_at: *session.scheduled_at(),
            occurred_at: Timestamp::now(),
        };
        let envelope = event
            .to_envelope()
            .with_correlation_id(metadata.correlation_id())
            .with_user_id(metadata.user_id.to_string());
        self.event_publisher.publish(envelope).await?;

        self.dispatch_booking_notifications(&session);

        Ok(session)
    }

    /// Rejects a materialization whose slot overlaps another active
    /// session with the same mentor.
    ///
    /// Check-then-insert is not atomic; two racing payments for the
    /// same slot can both pass and must be resolved operationally.
    async fn ensure_slot_free(
        &self,
        quote: &BookingQuote,
        payment_ref: &PaymentReference,
    ) -> Result<(), DomainError> {
        let start = quote.scheduled_at;
        let end = start.plus_minutes(quote.service.duration_minutes as i64);

        let existing = self.sessions.list_by_mentor(&quote.mentor_id).await?;
        for other in existing {
            if other.payment_ref() == payment_ref {
                // Same confirmation retried; insert_if_absent handles it.
                continue;
            }
            if matches!(
                other.status(),
                SessionStatus::Completed | SessionStatus::Cancelled
            ) {
                continue;
            }
            let other_start = *other.scheduled_at();
            let other_end = other_start.plus_minutes(other.service().duration_minutes as i64);
            if start.is_before(&other_end) && other_start.is_before(&end) {
                return Err(DomainError::new(
                    ErrorCode::Conflict,
                    "Mentor already has a session in this slot",
                )
                .with_detail("conflicting_session_id", other.id().to_string()));
            }
        }
        Ok(())
    }

    /// Fire-and-forget booking notifications to both parties. Delivery
    /// failure is logged, never propagated.
    fn dispatch_booking_notifications(&self, session: &MentorshipSession) {
        let recipients = [session.mentor_id().clone(), session.mentee_id().clone()];
        let message = format!("Session booked: {}", session.service().title);

        for recipient in recipients {
            let notification =
                Notification::new(recipient, NotificationKind::SessionBooked, message.clone());
            let notifier = Arc::clone(&self.notifier);
            let session_id = session.id().clone();
            tokio::spawn(async move {
                if let Err(e) = notifier.notify(notification).await {
                    tracing::warn!(
                        session_id = %session_id,
                        error = %e,
                        "booking notification failed"
                    );
                }
            });
        }
    }

    // ─────────────────────────────────────────────────────────────────────
    // Session lifecycle
    // ─────────────────────────────────────────────────────────────────────

    /// Marks a session as started.
    pub async fn start_session(
        &self,
        session_id: &SessionId,
    ) -> Result<MentorshipSession, DomainError> {
        let mut session = self.load(session_id).await?;
        session.start()?;
        self.sessions.update(&session).await?;
        Ok(session)
    }

    /// Marks a session as delivered and publishes the completion event.
    pub async fn complete_session(
        &self,
        session_id: &SessionId,
        metadata: CommandMetadata,
    ) -> Result<MentorshipSession, DomainError> {
        let mut session = self.load(session_id).await?;
        session.complete()?;
        self.sessions.update(&session).await?;

        let event = SessionCompleted {
            event_id: EventId::new(),
            session_id: session.id().clone(),
            mentor_id: session.mentor_id().clone(),
            mentee_id: session.mentee_id().clone(),
            occurred_at: Timestamp::now(),
        };
        let envelope = event
            .to_envelope()
            .with_correlation_id(metadata.correlation_id())
            .with_user_id(metadata.user_id.to_string());
        self.event_publisher.publish(envelope).await?;

        Ok(session)
    }

    /// Cancels a session, flags its payment for refund, and publishes
    /// the cancellation event.
    pub async fn cancel_session(
        &self,
        session_id: &SessionId,
        metadata: CommandMetadata,
    ) -> Result<MentorshipSession, DomainError> {
        let mut session = self.load(session_id).await?;
        session.cancel()?;
        self.sessions.update(&session).await?;

        let event = SessionCancelled {
            event_id: EventId::new(),
            session_id: session.id().clone(),
            mentor_id: session.mentor_id().clone(),
            mentee_id: session.mentee_id().clone(),
            occurred_at: Timestamp::now(),
        };
        let envelope = event
            .to_envelope()
            .with_correlation_id(metadata.correlation_id())
            .with_user_id(metadata.user_id.to_string());
        self.event_publisher.publish(envelope).await?;

        Ok(session)
    }

    async fn load(&self, session_id: &SessionId) -> Result<MentorshipSession, DomainError> {
        self.sessions.find_by_id(session_id).await?.ok_or_else(|| {
            DomainError::new(
                ErrorCode::SessionNotFound,
                format!("Session not found: {}", session_id),
            )
        })
    }
}

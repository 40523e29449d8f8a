//! End-to-end booking flows over both payment channels, and the
//! isolation between bookings and referral statistics.

mod common;

use common::{engine, engine_with_timeout, sign, user};

use talent_relay::domain::foundation::{CommandMetadata, ErrorCode, Timestamp};
use talent_relay::domain::mentorship::{
    BookingQuote, BookingWizard, PaymentStatus, ServiceDescriptor, SessionStatus,
};
use talent_relay::domain::payment::{Money, PaymentCallback, PaymentChannel, PaymentReference};
use talent_relay::ports::SessionRepository;

fn quote() -> BookingQuote {
    quote_at(Timestamp::now().plus_secs(86400))
}

fn quote_at(scheduled_at: Timestamp) -> BookingQuote {
    let mut wizard = BookingWizard::begin(user("mentor-1"), user("mentee-1")).unwrap();
    wizard
        .select_service(
            ServiceDescriptor::new("Mock interview", 60, Money::new(5000, "USD").unwrap())
                .unwrap(),
        )
        .unwrap();
    wizard.schedule(scheduled_at).unwrap();
    wizard.quote().unwrap()
}

fn metadata() -> CommandMetadata {
    CommandMetadata::for_user(user("mentee-1"))
}

#[tokio::test]
async fn gateway_booking_runs_order_to_session() {
    let fixture = engine();
    let quote = quote();

    let order = fixture.coordinator.create_gateway_order(&quote).await.unwrap();
    let callback = PaymentCallback {
        order_id: order.order_id.clone(),
        payment_id: "pay_1".to_string(),
        signature: sign(&order.order_id, "pay_1"),
    };
    let session = fixture
        .coordinator
        .confirm_gateway_payment(quote, callback, metadata())
        .await
        .unwrap();

    assert_eq!(session.status(), SessionStatus::Confirmed);
    assert_eq!(session.payment_status(), PaymentStatus::Paid);
    assert_eq!(session.payment_ref().channel, PaymentChannel::Gateway);
    assert_eq!(
        fixture
            .bus
            .events_of_type("mentorship.session_materialized.v1")
            .len(),
        1
    );
}

#[tokio::test]
async fn forged_gateway_callback_leaves_no_trace() {
    let fixture = engine();
    let quote = quote();
    let order = fixture.coordinator.create_gateway_order(&quote).await.unwrap();

    let forged = PaymentCallback {
        order_id: order.order_id,
        payment_id: "pay_1".to_string(),
        signature: "ab".repeat(32),
    };
    let err = fixture
        .coordinator
        .confirm_gateway_payment(quote, forged, metadata())
        .await
        .unwrap_err();

    assert!(err.is(ErrorCode::PaymentVerificationFailed));
    assert_eq!(fixture.bus.event_count(), 0);
    assert!(fixture
        .sessions
        .find_by_payment_ref(&PaymentReference::gateway("pay_1"))
        .await
        .unwrap()
        .is_none());
}

#[tokio::test]
async fn self_attested_booking_creates_exactly_one_session() {
    let fixture = engine();
    let quote = quote();

    let attempt = fixture.coordinator.start_self_attested(&quote, "mentor@upi");
    let first = fixture
        .coordinator
        .confirm_self_attested(&attempt, quote.clone(), "txn_50usd", metadata())
        .await
        .unwrap();
    // The payer retries the confirmation.
    let second = fixture
        .coordinator
        .confirm_self_attested(&attempt, quote, "txn_50usd", metadata())
        .await
        .unwrap();

    assert_eq!(first.id(), second.id());
    assert_eq!(first.status(), SessionStatus::Confirmed);
    assert_eq!(first.payment_status(), PaymentStatus::Paid);
    assert_eq!(first.payment_ref().channel, PaymentChannel::SelfAttested);
    assert_eq!(first.service().price, Money::new(5000, "USD").unwrap());
    assert_eq!(
        fixture
            .bus
            .events_of_type("mentorship.session_materialized.v1")
            .len(),
        1
    );

    // Mentorship bookings never feed the referral statistics.
    let stats = fixture.stats.get_stats(&user("mentor-1")).await.unwrap();
    assert_eq!(stats.referrals_given, 0);
    assert_eq!(stats.impact_score, 0);
    assert!(stats.achievements.is_empty());
}

#[tokio::test(start_paused = true)]
async fn countdown_expiry_beats_a_late_confirmation() {
    let fixture = engine_with_timeout(300);
    let quote = quote();
    let attempt = fixture.coordinator.start_self_attested(&quote, "mentor@upi");
    // Let the spawned sweeper arm its timer before advancing the clock.
    tokio::task::yield_now().await;

    tokio::time::advance(std::time::Duration::from_secs(301)).await;
    tokio::task::yield_now().await;

    let err = fixture
        .coordinator
        .confirm_self_attested(&attempt, quote, "txn_late", metadata())
        .await
        .unwrap_err();

    assert!(err.is(ErrorCode::PaymentTimeout));
    assert_eq!(fixture.bus.event_count(), 0);
    assert!(fixture
        .sessions
        .find_by_payment_ref(&PaymentReference::self_attested("txn_late"))
        .await
        .unwrap()
        .is_none());
}

#[tokio::test]
async fn cancelled_attempt_cannot_be_confirmed() {
    let fixture = engine();
    let quote = quote();
    let attempt = fixture.coordinator.start_self_attested(&quote, "mentor@upi");

    assert!(fixture.coordinator.cancel_self_attested(&attempt).await);

    let err = fixture
        .coordinator
        .confirm_self_attested(&attempt, quote, "txn_1", metadata())
        .await
        .unwrap_err();
    assert!(err.is(ErrorCode::PaymentTimeout));
}

#[tokio::test]
async fn channels_conflict_over_the_same_mentor_slot() {
    let fixture = engine();
    let start = Timestamp::now().plus_secs(86400);

    // Gateway booking takes the slot.
    let gateway_quote = quote_at(start);
    let order = fixture
        .coordinator
        .create_gateway_order(&gateway_quote)
        .await
        .unwrap();
    let callback = PaymentCallback {
        order_id: order.order_id.clone(),
        payment_id: "pay_1".to_string(),
        signature: sign(&order.order_id, "pay_1"),
    };
    fixture
        .coordinator
        .confirm_gateway_payment(gateway_quote, callback, metadata())
        .await
        .unwrap();

    // A self-attested booking for an overlapping window loses.
    let mut overlapping = quote_at(start.plus_minutes(30));
    overlapping.mentee_id = user("mentee-2");
    let attempt = fixture
        .coordinator
        .start_self_attested(&overlapping, "mentor@upi");
    let err = fixture
        .coordinator
        .confirm_self_attested(
            &attempt,
            overlapping,
            "txn_2",
            CommandMetadata::for_user(user("mentee-2")),
        )
        .await
        .unwrap_err();

    assert!(err.is(ErrorCode::Conflict));
}

#[tokio::test]
async fn booked_session_completes_and_notifies() {
    let fixture = engine();
    let quote = quote();
    let attempt = fixture.coordinator.start_self_attested(&quote, "mentor@upi");
    let session = fixture
        .coordinator
        .confirm_self_attested(&attempt, quote, "txn_1", metadata())
        .await
        .unwrap();

    tokio::task::yield_now().await;
    assert_eq!(fixture.notifier.sent_to(&user("mentor-1")).len(), 1);
    assert_eq!(fixture.notifier.sent_to(&user("mentee-1")).len(), 1);

    fixture.coordinator.start_session(session.id()).await.unwrap();
    let completed = fixture
        .coordinator
        .complete_session(session.id(), metadata())
        .await
        .unwrap();

    assert_eq!(completed.status(), SessionStatus::Completed);
    assert!(fixture.bus.has_event("mentorship.session_completed.v1"));
}

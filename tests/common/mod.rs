//! Shared wiring for integration tests: in-memory adapters behind every
//! port, handlers and coordinators on top, and the stats aggregator
//! subscribed to the event bus.

#![allow(dead_code)]

use std::sync::Arc;

use hmac::{Hmac, Mac};
use secrecy::SecretString;
use sha2::Sha256;

use talent_relay::adapters::events::{
    IdempotentHandler, InMemoryEventBus, InMemoryProcessedEventStore,
};
use talent_relay::adapters::gateway::MockPaymentGateway;
use talent_relay::adapters::memory::{
    InMemoryJobPostingRepository, InMemoryReferralRequestRepository, InMemorySessionRepository,
};
use talent_relay::adapters::notifications::RecordingNotifier;
use talent_relay::application::booking::BookingCoordinator;
use talent_relay::application::referral::{SubmitReferralRequestHandler, TransitionReferralHandler};
use talent_relay::application::stats::{StatsAggregator, STATS_EVENT_TYPES};
use talent_relay::config::BookingConfig;
use talent_relay::domain::foundation::UserId;
use talent_relay::domain::payment::GatewaySignatureVerifier;
use talent_relay::domain::stats::StatsPolicy;
use talent_relay::ports::EventSubscriber;

pub const GATEWAY_SECRET: &str = "integration_gw_secret";

/// A fully wired engine over in-memory adapters.
pub struct Engine {
    pub referrals: Arc<InMemoryReferralRequestRepository>,
    pub postings: Arc<InMemoryJobPostingRepository>,
    pub sessions: Arc<InMemorySessionRepository>,
    pub gateway: Arc<MockPaymentGateway>,
    pub bus: Arc<InMemoryEventBus>,
    pub notifier: Arc<RecordingNotifier>,
    pub submit: SubmitReferralRequestHandler,
    pub transition: Arc<TransitionReferralHandler>,
    pub coordinator: BookingCoordinator,
    pub stats: Arc<StatsAggregator>,
}

pub fn engine() -> Engine {
    engine_with_timeout(300)
}

pub fn engine_with_timeout(self_attested_timeout_secs: u64) -> Engine {
    let referrals = Arc::new(InMemoryReferralRequestRepository::new());
    let postings = Arc::new(InMemoryJobPostingRepository::new());
    let sessions = Arc::new(InMemorySessionRepository::new());
    let gateway = Arc::new(MockPaymentGateway::new());
    let bus = Arc::new(InMemoryEventBus::new());
    let notifier = Arc::new(RecordingNotifier::new());

    let stats = Arc::new(StatsAggregator::new(
        referrals.clone(),
        postings.clone(),
        StatsPolicy::default(),
    ));
    // Redelivered events are skipped, so the aggregator sees each one once.
    let processed = Arc::new(InMemoryProcessedEventStore::new());
    bus.subscribe_all(
        STATS_EVENT_TYPES,
        Arc::new(IdempotentHandler::new(stats.clone(), processed)),
    );

    let submit = SubmitReferralRequestHandler::new(referrals.clone(), postings.clone(), bus.clone());
    let transition = Arc::new(TransitionReferralHandler::new(
        referrals.clone(),
        bus.clone(),
        notifier.clone(),
    ));
    let coordinator = BookingCoordinator::new(
        sessions.clone(),
        gateway.clone(),
        GatewaySignatureVerifier::new(SecretString::new(GATEWAY_SECRET.to_string())),
        bus.clone(),
        notifier.clone(),
        BookingConfig {
            self_attested_timeout_secs,
        },
    );

    Engine {
        referrals,
        postings,
        sessions,
        gateway,
        bus,
        notifier,
        submit,
        transition,
        coordinator,
        stats,
    }
}

/// Signs an order/payment pair the way the gateway does.
pub fn sign(order_id: &str, payment_id: &str) -> String {
    let mut mac = Hmac::<Sha256>::new_from_slice(GATEWAY_SECRET.as_bytes())
        .expect("HMAC accepts any key");
    mac.update(format!("{}|{}", order_id, payment_id).as_bytes());
    hex::encode(mac.finalize().into_bytes())
}

pub fn user(tag: &str) -> UserId {
    UserId::new(tag).unwrap()
}

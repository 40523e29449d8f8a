//! Transient booking wizard.
//!
//! The multi-step booking flow (pick a service, pick a time, pay) is
//! modeled as an explicit workflow value the caller holds. Nothing here
//! touches the store: the first durable artifact of a booking is the
//! materialized session itself, so an abandoned wizard leaves no
//! orphaned records to clean up.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{DomainError, Timestamp, UserId};
use crate::domain::payment::Money;

/// Bounds on a bookable session length.
pub const MIN_DURATION_MINUTES: u32 = 15;
pub const MAX_DURATION_MINUTES: u32 = 180;

/// A mentor's offered service (title, duration, price).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceDescriptor {
    /// What the mentor offers (e.g. "Resume deep-dive").
    pub title: String,

    /// Session length in minutes.
    pub duration_minutes: u32,

    /// Price of one session.
    pub price: Money,
}

impl ServiceDescriptor {
    /// Creates a descriptor, validating title and duration bounds.
    pub fn new(
        title: impl Into<String>,
        duration_minutes: u32,
        price: Money,
    ) -> Result<Self, DomainError> {
        let title = title.into();
        if title.trim().is_empty() {
            return Err(DomainError::validation("title", "Title cannot be empty"));
        }
        if !(MIN_DURATION_MINUTES..=MAX_DURATION_MINUTES).contains(&duration_minutes) {
            return Err(DomainError::validation(
                "duration_minutes",
                format!(
                    "Duration must be between {} and {} minutes",
                    MIN_DURATION_MINUTES, MAX_DURATION_MINUTES
                ),
            ));
        }
        Ok(Self {
            title,
            duration_minutes,
            price,
        })
    }
}

/// Wizard steps, in order. Purely in-memory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum WizardStep {
    SelectingService,
    Scheduling,
    AwaitingPayment,
}

/// In-progress booking state, held by the caller until payment confirms.
///
/// Methods enforce step order; a finished wizard yields a `BookingQuote`
/// that the payment coordinator consumes.
#[derive(Debug, Clone)]
pub struct BookingWizard {
    mentor_id: UserId,
    mentee_id: UserId,
    step: WizardStep,
    service: Option<ServiceDescriptor>,
    scheduled_at: Option<Timestamp>,
}

impl BookingWizard {
    /// Starts a booking for a mentee against a mentor.
    ///
    /// # Errors
    ///
    /// - `ValidationFailed` if mentor and mentee are the same user
    pub fn begin(mentor_id: UserId, mentee_id: UserId) -> Result<Self, DomainError> {
        if mentor_id == mentee_id {
            return Err(DomainError::validation(
                "mentee_id",
                "Mentee cannot book themselves",
            ));
        }
        Ok(Self {
            mentor_id,
            mentee_id,
            step: WizardStep::SelectingService,
            service: None,
            scheduled_at: None,
        })
    }

    /// Step 1: choose the service.
    pub fn select_service(&mut self, service: ServiceDescriptor) -> Result<(), DomainError> {
        if self.step != WizardStep::SelectingService {
            return Err(DomainError::validation("step", "Service already selected"));
        }
        self.service = Some(service);
        self.step = WizardStep::Scheduling;
        Ok(())
    }

    /// Step 2: choose the time. Moves the wizard to awaiting-payment.
    ///
    /// # Errors
    ///
    /// - `ValidationFailed` if called out of order or the time is in
    ///   the past
    pub fn schedule(&mut self, scheduled_at: Timestamp) -> Result<(), DomainError> {
        if self.step != WizardStep::Scheduling {
            return Err(DomainError::validation("step", "Select a service first"));
        }
        if scheduled_at.is_before(&Timestamp::now()) {
            return Err(DomainError::validation(
                "scheduled_at",
                "Session time must be in the future",
            ));
        }
        self.scheduled_at = Some(scheduled_at);
        self.step = WizardStep::AwaitingPayment;
        Ok(())
    }

    /// Step 3: freeze the selections into a quote for payment.
    pub fn quote(&self) -> Result<BookingQuote, DomainError> {
        if self.step != WizardStep::AwaitingPayment {
            return Err(DomainError::validation(
                "step",
                "Booking is not ready for payment",
            ));
        }
        Ok(BookingQuote {
            mentor_id: self.mentor_id.clone(),
            mentee_id: self.mentee_id.clone(),
            service: self.service.clone().expect("service set before payment step"),
            scheduled_at: self.scheduled_at.expect("time set before payment step"),
        })
    }
}

/// A finalized set of booking selections awaiting payment.
///
/// Immutable once produced; the coordinator carries it through order
/// creation, confirmation, and materialization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingQuote {
    pub mentor_id: UserId,
    pub mentee_id: UserId,
    pub service: ServiceDescriptor,
    pub scheduled_at: Timestamp,
}

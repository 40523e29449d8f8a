//! ReferralRequest aggregate entity.
//!
//! # Ownership
//!
//! Exactly one seeker and one referrer own a request for its whole
//! lifetime. The referrer decides accept/reject; the seeker self-reports
//! every later milestone. Requests are never hard-deleted, only driven
//! into a terminal status.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{
    DomainError, ErrorCode, JobPostingId, ReferralRequestId, StateMachine, Timestamp, UserId,
};

use super::status::{ActorRole, ReferralStatus};

/// Maximum length for a free-text audit note.
pub const MAX_NOTE_LENGTH: usize = 2000;

/// Free-text application payload attached at submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicationPayload {
    /// Reference to an uploaded resume (storage key, not file content).
    pub resume_ref: String,

    /// Optional cover letter text.
    pub cover_letter: Option<String>,

    /// Self-described experience level (free text, e.g. "senior").
    pub experience_level: Option<String>,

    /// Optional automated-screening score, 0-100, produced upstream.
    pub screening_score: Option<u8>,
}

impl ApplicationPayload {
    /// Creates a payload with just a resume reference.
    pub fn new(resume_ref: impl Into<String>) -> Self {
        Self {
            resume_ref: resume_ref.into(),
            cover_letter: None,
            experience_level: None,
            screening_score: None,
        }
    }
}

/// Immutable audit record appended on every accepted transition.
///
/// Distinct from the status itself: the status is the current position on
/// the graph, the audit trail is the full history of who moved it where.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditNote {
    /// Status before the transition.
    pub from_status: ReferralStatus,

    /// Status after the transition.
    pub to_status: ReferralStatus,

    /// User who drove the transition.
    pub actor: UserId,

    /// Optional free-text note.
    pub note: Option<String>,

    /// Optional evidence reference (screenshot key, email id, ...).
    pub evidence_ref: Option<String>,

    /// When the transition was recorded.
    pub recorded_at: Timestamp,
}

/// ReferralRequest aggregate - a seeker's application against a job
/// posting, tracked through the approval/outcome lifecycle.
///
/// # Invariants
///
/// - `seeker_id != referrer_id`
/// - `status` only moves forward along the graph in `ReferralStatus`
/// - `audit_trail` grows by exactly one entry per accepted transition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferralRequest {
    /// Unique identifier for this request.
    id: ReferralRequestId,

    /// Job posting the seeker applied against.
    job_posting_id: JobPostingId,

    /// User asking for the referral.
    seeker_id: UserId,

    /// User who can refer and must accept/reject.
    referrer_id: UserId,

    /// Application payload supplied at submission.
    application: ApplicationPayload,

    /// Current lifecycle status.
    status: ReferralStatus,

    /// Append-only transition history.
    audit_trail: Vec<AuditNote>,

    /// When the request was created.
    created_at: Timestamp,

    /// When the request was last updated.
    updated_at: Timestamp,
}

impl ReferralRequest {
    /// Creates a new pending request.
    ///
    /// # Errors
    ///
    /// - `ValidationFailed` if seeker and referrer are the same user or
    ///   the resume reference is empty
    pub fn submit(
        id: ReferralRequestId,
        job_posting_id: JobPostingId,
        seeker_id: UserId,
        referrer_id: UserId,
        application: ApplicationPayload,
    ) -> Result<Self, DomainError> {
        if seeker_id == referrer_id {
            return Err(DomainError::validation(
                "referrer_id",
                "Seeker cannot request a referral from themselves",
            ));
        }
        if application.resume_ref.trim().is_empty() {
            return Err(DomainError::validation(
                "resume_ref",
                "Application must reference a resume",
            ));
        }

        let now = Timestamp::now();
        Ok(Self {
            id,
            job_posting_id,
            seeker_id,
            referrer_id,
            application,
            status: ReferralStatus::Pending,
            audit_trail: Vec::new(),
            created_at: now,
            updated_at: now,
        })
    }

    /// Reconstitute a request from persistence (no validation, no events).
    #[allow(clippy::too_many_arguments)]
    pub fn reconstitute(
        id: ReferralRequestId,
        job_posting_id: JobPostingId,
        seeker_id: UserId,
        referrer_id: UserId,
        application: ApplicationPayload,
        status: ReferralStatus,
        audit_trail: Vec<AuditNote>,
        created_at: Timestamp,
        updated_at: Timestamp,
    ) -> Self {
        Self {
            id,
            job_posting_id,
            seeker_id,
            referrer_id,
            application,
            status,
            audit_trail,
            created_at,
            updated_at,
        }
    }

    // ─────────────────────────────────────────────────────────────────────
    // Accessors
    // ─────────────────────────────────────────────────────────────────────

    pub fn id(&self) -> &ReferralRequestId {
        &self.id
    }

    pub fn job_posting_id(&self) -> &JobPostingId {
        &self.job_posting_id
    }

    pub fn seeker_id(&self) -> &UserId {
        &self.seeker_id
    }

    pub fn referrer_id(&self) -> &UserId {
        &self.referrer_id
    }

    pub fn application(&self) -> &ApplicationPayload {
        &self.application
    }

    pub fn status(&self) -> ReferralStatus {
        self.status
    }

    pub fn audit_trail(&self) -> &[AuditNote] {
        &self.audit_trail
    }

    pub fn created_at(&self) -> &Timestamp {
        &self.created_at
    }

    pub fn updated_at(&self) -> &Timestamp {
        &self.updated_at
    }

    // ─────────────────────────────────────────────────────────────────────
    // Transitions
    // ─────────────────────────────────────────────────────────────────────

    /// Applies a lifecycle transition on behalf of `actor`.
    ///
    /// Authorization is checked before the edge: a wrong actor never
    /// learns whether the edge itself would have been legal, and the
    /// aggregate is left untouched on any error.
    ///
    /// # Errors
    ///
    /// - `PermissionDenied` if `actor` is not the authorized party for
    ///   the target status
    /// - `InvalidTransition` if the edge is not on the forward graph
    pub fn transition(
        &mut self,
        actor: &UserId,
        target: ReferralStatus,
        note: Option<String>,
        evidence_ref: Option<String>,
    ) -> Result<(), DomainError> {
        self.authorize(actor, target)?;

        if let Some(ref text) = note {
            if text.len() > MAX_NOTE_LENGTH {
                return Err(DomainError::validation(
                    "note",
                    format!("Note must be {} characters or less", MAX_NOTE_LENGTH),
                ));
            }
        }

        if !self.status.can_transition_to(&target) {
            return Err(DomainError::new(
                ErrorCode::InvalidTransition,
                format!("Cannot transition from {} to {}", self.status, target),
            )
            .with_detail("from", self.status.to_string())
            .with_detail("to", target.to_string()));
        }

        let from = self.status;
        self.status = target;
        self.updated_at = Timestamp::now();
        self.audit_trail.push(AuditNote {
            from_status: from,
            to_status: target,
            actor: actor.clone(),
            note,
            evidence_ref,
            recorded_at: self.updated_at,
        });
        Ok(())
    }

    /// Verifies that `actor` is the party allowed to move into `target`.
    fn authorize(&self, actor: &UserId, target: ReferralStatus) -> Result<(), DomainError> {
        let authorized = match target.required_actor() {
            Some(ActorRole::Referrer) => actor == &self.referrer_id,
            Some(ActorRole::Seeker) => actor == &self.seeker_id,
            None => false,
        };
        if authorized {
            Ok(())
        } else {
            Err(DomainError::new(
                ErrorCode::PermissionDenied,
                format!("User {} may not move this request to {}", actor, target),
            )
            .with_detail("actor", actor.to_string())
            .with_detail("target", target.to_string()))
        }
    }
}

//! ReferralStatus enum and its transition graph.
//!
//! The graph is strictly forward-moving:
//!
//! ```text
//! pending --(referrer)--> accepted | rejected
//! accepted --(seeker)--> referral_confirmed --> sent_to_hr
//!          --> interview_scheduled --> completed
//! ```
//!
//! Seekers may jump directly from `accepted` (or any later milestone) to
//! any higher-ranked milestone; they are never forced through every
//! intermediate step. Backward moves are always invalid.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::foundation::StateMachine;

/// Lifecycle status of a referral request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ReferralStatus {
    /// Awaiting the referrer's accept/reject decision.
    #[default]
    Pending,
    /// Referrer agreed to refer the seeker.
    Accepted,
    /// Seeker self-reported that the referral was filed.
    ReferralConfirmed,
    /// Seeker self-reported that the application reached HR.
    SentToHr,
    /// Seeker self-reported a scheduled interview.
    InterviewScheduled,
    /// Terminal: placement succeeded.
    Completed,
    /// Terminal: referrer declined the request.
    Rejected,
}

/// Which party is allowed to drive a given transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActorRole {
    /// The referrer decides accept/reject from `pending`.
    Referrer,
    /// The seeker self-reports downstream milestones.
    Seeker,
}

impl ReferralStatus {
    /// Monotonic rank along the milestone path.
    ///
    /// `Rejected` has no rank; it is a terminal branch off `pending`.
    pub fn rank(&self) -> Option<u8> {
        match self {
            ReferralStatus::Pending => Some(0),
            ReferralStatus::Accepted => Some(1),
            ReferralStatus::ReferralConfirmed => Some(2),
            ReferralStatus::SentToHr => Some(3),
            ReferralStatus::InterviewScheduled => Some(4),
            ReferralStatus::Completed => Some(5),
            ReferralStatus::Rejected => None,
        }
    }

    /// True for statuses the seeker self-reports after acceptance.
    pub fn is_seeker_milestone(&self) -> bool {
        matches!(self.rank(), Some(r) if r >= 2)
    }

    /// The role authorized to move a request *into* this status.
    ///
    /// Returns `None` for statuses that are never transition targets
    /// (`Pending` is only ever an initial state).
    pub fn required_actor(&self) -> Option<ActorRole> {
        match self {
            ReferralStatus::Pending => None,
            ReferralStatus::Accepted | ReferralStatus::Rejected => Some(ActorRole::Referrer),
            _ => Some(ActorRole::Seeker),
        }
    }
}

impl StateMachine for ReferralStatus {
    fn can_transition_to(&self, target: &Self) -> bool {
        use ReferralStatus::*;
        match (self, target) {
            (Pending, Accepted) | (Pending, Rejected) => true,
            // Forward jumps between milestones; rejects backward and
            // same-rank moves by construction.
            (from, to) => match (from.rank(), to.rank()) {
                (Some(f), Some(t)) => f >= 1 && to.is_seeker_milestone() && t > f,
                _ => false,
            },
        }
    }

    fn valid_transitions(&self) -> Vec<Self> {
        use ReferralStatus::*;
        let all = [
            Pending,
            Accepted,
            ReferralConfirmed,
            SentToHr,
            InterviewScheduled,
            Completed,
            Rejected,
        ];
        all.into_iter()
            .filter(|t| self.can_transition_to(t))
            .collect()
    }
}

impl fmt::Display for ReferralStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ReferralStatus::Pending => "pending",
            ReferralStatus::Accepted => "accepted",
            ReferralStatus::ReferralConfirmed => "referral_confirmed",
            ReferralStatus::SentToHr => "sent_to_hr",
            ReferralStatus::InterviewScheduled => "interview_scheduled",
            ReferralStatus::Completed => "completed",
            ReferralStatus::Rejected => "rejected",
        };
        write!(f, "{}", s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ReferralStatus::*;

    #[test]
    fn pending_can_be_accepted_or_rejected() {
        assert!(Pending.can_transition_to(&Accepted));
        assert!(Pending.can_transition_to(&Rejected));
    }

    #[test]
    fn pending_cannot_skip_acceptance() {
        assert!(!Pending.can_transition_to(&ReferralConfirmed));
        assert!(!Pending.can_transition_to(&Completed));
    }

    #[test]
    fn accepted_allows_any_forward_jump() {
        assert!(Accepted.can_transition_to(&ReferralConfirmed));
        assert!(Accepted.can_transition_to(&SentToHr));
        assert!(Accepted.can_transition_to(&InterviewScheduled));
        assert!(Accepted.can_transition_to(&Completed));
    }

    #[test]
    fn backward_moves_are_invalid() {
        assert!(!SentToHr.can_transition_to(&ReferralConfirmed));
        assert!(!InterviewScheduled.can_transition_to(&Accepted));
        assert!(!Accepted.can_transition_to(&Pending));
    }

    #[test]
    fn same_status_is_not_a_transition() {
        assert!(!Accepted.can_transition_to(&Accepted));
        assert!(!Pending.can_transition_to(&Pending));
    }

    #[test]
    fn rejection_only_from_pending() {
        assert!(!Accepted.can_transition_to(&Rejected));
        assert!(!SentToHr.can_transition_to(&Rejected));
    }

    #[test]
    fn terminal_states_have_no_exits() {
        assert!(Completed.is_terminal());
        assert!(Rejected.is_terminal());
        assert!(!Accepted.is_terminal());
    }

    #[test]
    fn accept_and_reject_require_referrer() {
        assert_eq!(Accepted.required_actor(), Some(ActorRole::Referrer));
        assert_eq!(Rejected.required_actor(), Some(ActorRole::Referrer));
    }

    #[test]
    fn milestones_require_seeker() {
        assert_eq!(ReferralConfirmed.required_actor(), Some(ActorRole::Seeker));
        assert_eq!(SentToHr.required_actor(), Some(ActorRole::Seeker));
        assert_eq!(InterviewScheduled.required_actor(), Some(ActorRole::Seeker));
        assert_eq!(Completed.required_actor(), Some(ActorRole::Seeker));
    }

    #[test]
    fn rank_is_monotone_along_milestone_path() {
        let path = [Pending, Accepted, ReferralConfirmed, SentToHr, InterviewScheduled, Completed];
        for pair in path.windows(2) {
            assert!(pair[0].rank().unwrap() < pair[1].rank().unwrap());
        }
        assert_eq!(Rejected.rank(), None);
    }

    #[test]
    fn serializes_to_snake_case_json() {
        assert_eq!(serde_json::to_string(&SentToHr).unwrap(), "\"sent_to_hr\"");
        assert_eq!(
            serde_json::to_string(&InterviewScheduled).unwrap(),
            "\"interview_scheduled\""
        );
    }

    #[test]
    fn deserializes_from_snake_case_json() {
        let status: ReferralStatus = serde_json::from_str("\"referral_confirmed\"").unwrap();
        assert_eq!(status, ReferralConfirmed);
    }
}

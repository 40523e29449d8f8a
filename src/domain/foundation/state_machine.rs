//! State machine trait for status enums.
//!
//! Provides a consistent interface for validating and performing state
//! transitions across entity lifecycle statuses (referral requests,
//! mentorship sessions).

use super::ValidationError;

/// Trait for status enums that represent state machines.
///
/// Implementors define valid state transitions and get validated
/// transition methods for free. Transition tables are data, not string
/// comparisons: an illegal edge is unrepresentable once the enum and
/// `can_transition_to` agree.
pub trait StateMachine: Sized + Copy + PartialEq + std::fmt::Debug {
    /// Returns true if transition from self to target is valid.
    fn can_transition_to(&self, target: &Self) -> bool;

    /// Returns all valid target states from current state.
    fn valid_transitions(&self) -> Vec<Self>;

    /// Performs transition with validation, returning error if invalid.
    fn transition_to(&self, target: Self) -> Result<Self, ValidationError> {
        if self.can_transition_to(&target) {
            Ok(target)
        } else {
            Err(ValidationError::invalid_format(
                "state_transition",
                format!("Cannot transition from {:?} to {:?}", self, target),
            ))
        }
    }

    /// Checks if current state is terminal (no valid outgoing transitions).
    fn is_terminal(&self) -> bool {
        self.valid_transitions().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum PayoutStatus {
        Queued,
        Sent,
        Settled,
        Failed,
    }

    impl StateMachine for PayoutStatus {
        fn can_transition_to(&self, target: &Self) -> bool {
            use PayoutStatus::*;
            matches!(
                (self, target),
                (Queued, Sent) | (Sent, Settled) | (Queued, Failed) | (Sent, Failed)
            )
        }

        fn valid_transitions(&self) -> Vec<Self> {
            use PayoutStatus::*;
            match self {
                Queued => vec![Sent, Failed],
                Sent => vec![Settled, Failed],
                Settled => vec![],
                Failed => vec![],
            }
        }
    }

    #[test]
    fn transition_to_succeeds_for_valid_edge() {
        let result = PayoutStatus::Queued.transition_to(PayoutStatus::Sent);
        assert_eq!(result, Ok(PayoutStatus::Sent));
    }

    #[test]
    fn transition_to_fails_for_invalid_edge() {
        let result = PayoutStatus::Queued.transition_to(PayoutStatus::Settled);
        assert!(result.is_err());
    }

    #[test]
    fn terminal_states_have_no_outgoing_edges() {
        assert!(PayoutStatus::Settled.is_terminal());
        assert!(PayoutStatus::Failed.is_terminal());
        assert!(!PayoutStatus::Queued.is_terminal());
    }

    #[test]
    fn can_transition_to_is_consistent_with_valid_transitions() {
        for status in [
            PayoutStatus::Queued,
            PayoutStatus::Sent,
            PayoutStatus::Settled,
            PayoutStatus::Failed,
        ] {
            for valid_target in status.valid_transitions() {
                assert!(
                    status.can_transition_to(&valid_target),
                    "can_transition_to should return true for {:?} -> {:?}",
                    status,
                    valid_target
                );
            }
        }
    }
}

//! Command infrastructure for application handlers.
//!
//! Instead of each handler accepting `correlation_id: Option<String>,
//! user_id: UserId, ...` separately, they accept a single
//! `CommandMetadata` struct that flows into the emitted events.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::UserId;

/// Metadata context for command handlers.
///
/// Carries tracing, correlation, and actor context through the command
/// processing pipeline. Propagated to emitted event envelopes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandMetadata {
    /// The user executing this command (required for authorization).
    pub user_id: UserId,

    /// Links related operations across a single user request.
    /// Generated at the boundary if not provided.
    #[serde(skip_serializing_if = "Option::is_none")]
    correlation_id: Option<String>,
}

impl CommandMetadata {
    /// Creates metadata for the given acting user with a fresh correlation id.
    pub fn for_user(user_id: UserId) -> Self {
        Self {
            user_id,
            correlation_id: Some(Uuid::new_v4().to_string()),
        }
    }

    /// Creates metadata with an explicit correlation id.
    pub fn with_correlation(user_id: UserId, correlation_id: impl Into<String>) -> Self {
        Self {
            user_id,
            correlation_id: Some(correlation_id.into()),
        }
    }

    /// Returns the correlation id, generating one lazily for callers that
    /// constructed metadata without it (e.g. deserialized commands).
    pub fn correlation_id(&self) -> String {
        self.correlation_id
            .clone()
            .unwrap_or_else(|| Uuid::new_v4().to_string())
    }
}

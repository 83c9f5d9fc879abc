//! Command infrastructure for CQRS handlers.
//!
//! `CommandMetadata` carries the acting administrator and a correlation id
//! through every command handler and onto the events it emits.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::UserId;

/// Metadata context for command handlers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandMetadata {
    /// The administrator executing this command.
    pub user_id: UserId,

    /// Links related operations across a single request.
    #[serde(skip_serializing_if = "Option::is_none")]
    correlation_id: Option<String>,
}

impl CommandMetadata {
    /// Creates new command metadata with required user ID.
    pub fn new(user_id: UserId) -> Self {
        Self {
            user_id,
            correlation_id: None,
        }
    }

    /// Builder: Add correlation ID for request tracing.
    pub fn with_correlation_id(mut self, id: impl Into<String>) -> Self {
        self.correlation_id = Some(id.into());
        self
    }

    /// Returns the correlation ID, generating one if not set.
    pub fn correlation_id(&self) -> String {
        self.correlation_id
            .clone()
            .unwrap_or_else(|| Uuid::new_v4().to_string())
    }
}

#[cfg(test)]
impl CommandMetadata {
    /// Creates a test fixture with a test user ID.
    pub fn test_fixture() -> Self {
        Self::new(UserId::new("test-admin").unwrap())
            .with_correlation_id("test-correlation-id")
    }
}

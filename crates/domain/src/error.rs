//! Domain error types.

use event_store::EventStoreError;
use thiserror::Error;

use crate::user::UserError;

/// Errors that can occur during domain operations.
#[derive(Debug, Error)]
pub enum DomainError {
    /// An error occurred in the event store.
    #[error("Event store error: {0}")]
    EventStore(#[from] EventStoreError),

    /// An error occurred in the user aggregate.
    #[error("User error: {0}")]
    User(UserError),

    /// Input was rejected before any event was emitted.
    #[error("Validation failed: {0}")]
    Validation(String),
}

impl From<UserError> for DomainError {
    fn from(e: UserError) -> Self {
        match e {
            UserError::TextTooLong { .. } => DomainError::Validation(e.to_string()),
            other => DomainError::User(other),
        }
    }
}

impl DomainError {
    /// Returns true if this is a validation failure.
    pub fn is_validation(&self) -> bool {
        matches!(self, DomainError::Validation(_))
    }
}

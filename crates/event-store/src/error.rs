use common::AggregateId;
use thiserror::Error;

/// Errors that can occur when interacting with the event store.
#[derive(Debug, Error)]
pub enum EventStoreError {
    /// An append was requested with no events.
    #[error("Cannot append empty event list")]
    EmptyAppend,

    /// The aggregate's stream moved on since the caller last read it.
    #[error(
        "Concurrency conflict for aggregate {aggregate_id}: expected version {expected}, found {actual}"
    )]
    ConcurrencyConflict {
        aggregate_id: AggregateId,
        expected: u64,
        actual: u64,
    },

    /// An expected version was given for a batch spanning several aggregates.
    #[error("Versioned append spans several aggregates")]
    MixedAggregates,

    /// A thread panicked while holding the event log lock.
    #[error("Event log lock poisoned")]
    LockPoisoned,
}

impl EventStoreError {
    /// Returns true if this is an optimistic concurrency conflict.
    pub fn is_conflict(&self) -> bool {
        matches!(self, EventStoreError::ConcurrencyConflict { .. })
    }
}

/// Result type for event store operations.
pub type Result<T> = std::result::Result<T, EventStoreError>;

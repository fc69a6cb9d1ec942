use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::AggregateId;

/// A fact that can be recorded in the event log.
///
/// Events are immutable once created. The timestamp is informational only:
/// the authoritative order is the [`Sequence`] the log assigns on append.
pub trait Event: Clone + Send + Sync + 'static {
    /// Returns the aggregate this event belongs to.
    fn aggregate_id(&self) -> &AggregateId;

    /// Returns the event type name (e.g., "UserCreated").
    fn event_type(&self) -> &'static str;

    /// Returns when the event was created.
    fn timestamp(&self) -> DateTime<Utc>;
}

/// Unique identifier for a recorded event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventId(Uuid);

impl EventId {
    /// Creates a new random event ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Returns the underlying UUID.
    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for EventId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for EventId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Position of an event in the global log.
///
/// Sequences start at 1 for the first appended event and increment by 1
/// for each subsequent event, across all aggregates.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Sequence(u64);

impl Sequence {
    /// Creates a sequence from a raw value.
    pub fn new(value: u64) -> Self {
        Self(value)
    }

    /// Returns the position before any event (0).
    pub fn initial() -> Self {
        Self(0)
    }

    /// Returns the next position.
    pub fn next(&self) -> Self {
        Self(self.0 + 1)
    }

    /// Returns the raw value.
    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for Sequence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// An event as recorded in the log, with the position it was assigned.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventEnvelope<E> {
    /// Unique identifier for this record.
    pub event_id: EventId,

    /// Position in the global log.
    pub sequence: Sequence,

    /// When the event was appended.
    pub recorded_at: DateTime<Utc>,

    /// The recorded event.
    pub event: E,
}

impl<E: Event> EventEnvelope<E> {
    /// Wraps an event at the given log position.
    pub fn record(event: E, sequence: Sequence) -> Self {
        Self {
            event_id: EventId::new(),
            sequence,
            recorded_at: Utc::now(),
            event,
        }
    }

    /// Returns the aggregate the wrapped event belongs to.
    pub fn aggregate_id(&self) -> &AggregateId {
        self.event.aggregate_id()
    }

    /// Returns the wrapped event's type name.
    pub fn event_type(&self) -> &'static str {
        self.event.event_type()
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use chrono::{DateTime, Utc};
    use common::{PostId, UserId};

    use super::Event;
    use crate::AggregateId;

    /// Minimal event used by the store and bus tests.
    #[derive(Debug, Clone, PartialEq)]
    pub struct TestEvent {
        pub aggregate_id: AggregateId,
        pub kind: &'static str,
        pub timestamp: DateTime<Utc>,
    }

    impl TestEvent {
        pub fn user(name: &str, kind: &'static str) -> Self {
            Self {
                aggregate_id: AggregateId::user(&UserId::new(name)),
                kind,
                timestamp: Utc::now(),
            }
        }

        pub fn post(id: u64) -> Self {
            Self {
                aggregate_id: AggregateId::post(PostId::new(id)),
                kind: "PostCreated",
                timestamp: Utc::now(),
            }
        }
    }

    impl Event for TestEvent {
        fn aggregate_id(&self) -> &AggregateId {
            &self.aggregate_id
        }

        fn event_type(&self) -> &'static str {
            self.kind
        }

        fn timestamp(&self) -> DateTime<Utc> {
            self.timestamp
        }
    }
}

//! Core aggregate trait.

use common::AggregateId;
use event_store::Event;

/// Trait for aggregates in an event-sourced system.
///
/// In event sourcing, aggregates:
/// - Are rebuilt by replaying their full event stream (no snapshots)
/// - Generate events from commands
/// - Apply events to update state (pure, deterministic)
///
/// The folded state is a cache of `replay(events)`; it is never updated
/// any other way.
pub trait Aggregate: Default + Send + Sync + Sized {
    /// The type of events this aggregate produces and consumes.
    type Event: Event;

    /// The type of errors this aggregate's commands can produce.
    type Error: std::error::Error + Send + Sync;

    /// Returns the aggregate's identifier.
    ///
    /// Returns None for an aggregate that has not been created yet.
    fn id(&self) -> Option<AggregateId>;

    /// Returns how many events have been folded into this state.
    ///
    /// For a state replayed from the store this equals the stream length,
    /// and is the version new events are appended against.
    fn version(&self) -> u64;

    /// Applies an event to the aggregate, updating its state.
    ///
    /// This method must be pure and deterministic:
    /// - Given the same state and event, it must always produce the same new state
    /// - It must not have side effects
    /// - It must not fail (events represent facts that have happened)
    fn apply(&mut self, event: &Self::Event);

    /// Applies multiple events in sequence.
    fn apply_events<'a>(&mut self, events: impl IntoIterator<Item = &'a Self::Event>)
    where
        Self::Event: 'a,
    {
        for event in events {
            self.apply(event);
        }
    }

    /// Rebuilds state from scratch by folding the given events.
    fn replay<'a>(events: impl IntoIterator<Item = &'a Self::Event>) -> Self
    where
        Self::Event: 'a,
    {
        let mut aggregate = Self::default();
        aggregate.apply_events(events);
        aggregate
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Utc};
    use common::{PostId, UserId};

    #[derive(Debug, Clone)]
    enum TestEvent {
        Created { id: AggregateId },
        Updated { id: AggregateId, value: i32 },
    }

    impl Event for TestEvent {
        fn aggregate_id(&self) -> &AggregateId {
            match self {
                TestEvent::Created { id } | TestEvent::Updated { id, .. } => id,
            }
        }

        fn event_type(&self) -> &'static str {
            match self {
                TestEvent::Created { .. } => "TestCreated",
                TestEvent::Updated { .. } => "TestUpdated",
            }
        }

        fn timestamp(&self) -> DateTime<Utc> {
            Utc::now()
        }
    }

    #[derive(Debug, Default)]
    struct TestAggregate {
        id: Option<AggregateId>,
        value: i32,
        version: u64,
    }

    #[derive(Debug, thiserror::Error)]
    #[error("test error")]
    struct TestError;

    impl Aggregate for TestAggregate {
        type Event = TestEvent;
        type Error = TestError;

        fn id(&self) -> Option<AggregateId> {
            self.id.clone()
        }

        fn version(&self) -> u64 {
            self.version
        }

        fn apply(&mut self, event: &Self::Event) {
            match event {
                TestEvent::Created { id } => self.id = Some(id.clone()),
                TestEvent::Updated { value, .. } => self.value = *value,
            }
            self.version += 1;
        }
    }

    #[test]
    fn test_aggregate_apply_events() {
        let mut aggregate = TestAggregate::default();
        let id = AggregateId::post(PostId::new(1));
        let events = vec![
            TestEvent::Created { id: id.clone() },
            TestEvent::Updated { id, value: 42 },
        ];

        aggregate.apply_events(&events);

        assert!(aggregate.id().is_some());
        assert_eq!(aggregate.value, 42);
        assert_eq!(aggregate.version(), 2);
    }

    #[test]
    fn test_replay_matches_incremental_apply() {
        let id = AggregateId::user(&UserId::new("ala"));
        let events = vec![
            TestEvent::Created { id: id.clone() },
            TestEvent::Updated {
                id: id.clone(),
                value: 1,
            },
            TestEvent::Updated { id, value: 7 },
        ];

        let replayed = TestAggregate::replay(&events);

        let mut incremental = TestAggregate::default();
        for event in &events {
            incremental.apply(event);
        }

        assert_eq!(replayed.id(), incremental.id());
        assert_eq!(replayed.value, incremental.value);
        assert_eq!(replayed.version(), 3);
    }

    #[test]
    fn test_replay_of_nothing_is_default() {
        let aggregate = TestAggregate::replay(std::iter::empty());
        assert!(aggregate.id().is_none());
        assert_eq!(aggregate.version(), 0);
    }
}

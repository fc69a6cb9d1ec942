//! Command handling infrastructure.

use std::marker::PhantomData;
use std::sync::Arc;

use common::AggregateId;
use event_store::{AppendOptions, EventBus, EventStore};

use crate::aggregate::Aggregate;
use crate::error::DomainError;

/// Result of command execution.
#[derive(Debug)]
pub struct CommandResult<A: Aggregate> {
    /// The aggregate after applying the new events.
    pub aggregate: A,

    /// The events that were generated and published.
    pub events: Vec<A::Event>,
}

impl<A: Aggregate> CommandResult<A> {
    /// Returns true if the command's guard rejected it and nothing was emitted.
    pub fn is_noop(&self) -> bool {
        self.events.is_empty()
    }
}

/// Trait for commands that can be executed against an aggregate.
///
/// Commands represent an intention to perform an action. They may be rejected
/// if the aggregate's current state doesn't allow the action.
pub trait Command: Send + Sync {
    /// The type of aggregate this command targets.
    type Aggregate: Aggregate;

    /// Returns the ID of the aggregate this command targets.
    fn aggregate_id(&self) -> AggregateId;
}

/// How many times a command is retried after losing a race on its aggregate.
pub const MAX_CONFLICT_RETRIES: usize = 100;

/// Handler for executing commands against aggregates.
///
/// The handler is responsible for:
/// 1. Loading the aggregate by replaying its full event stream
/// 2. Executing the command to produce events
/// 3. Publishing the events against the version it loaded
/// 4. Folding the events into the loaded state
///
/// If another writer appended to the stream in between, the store rejects
/// the batch and [`execute`](Self::execute) reloads and runs the command
/// again, so guards always see the state their events are appended to.
pub struct CommandHandler<S, A>
where
    S: EventStore<Event = A::Event>,
    A: Aggregate,
{
    bus: Arc<EventBus<S>>,
    _phantom: PhantomData<A>,
}

impl<S, A> CommandHandler<S, A>
where
    S: EventStore<Event = A::Event>,
    A: Aggregate,
{
    /// Creates a new command handler publishing through the given bus.
    pub fn new(bus: Arc<EventBus<S>>) -> Self {
        Self {
            bus,
            _phantom: PhantomData,
        }
    }

    /// Returns a reference to the bus events are published on.
    pub fn bus(&self) -> &EventBus<S> {
        &self.bus
    }

    /// Loads an aggregate by replaying its stream.
    ///
    /// If the aggregate has no events, returns a default instance.
    pub fn load(&self, aggregate_id: &AggregateId) -> Result<A, DomainError> {
        let envelopes = self.bus.store().get_events_for_aggregate(aggregate_id)?;
        Ok(A::replay(envelopes.iter().map(|envelope| &envelope.event)))
    }

    /// Loads an aggregate, returning None if it doesn't exist.
    pub fn load_existing(&self, aggregate_id: &AggregateId) -> Result<Option<A>, DomainError> {
        let aggregate = self.load(aggregate_id)?;
        if aggregate.id().is_some() {
            Ok(Some(aggregate))
        } else {
            Ok(None)
        }
    }

    /// Runs `command_fn` against the aggregate the command targets.
    pub fn handle<C, F>(
        &self,
        command: &C,
        command_fn: F,
    ) -> Result<CommandResult<A>, DomainError>
    where
        C: Command<Aggregate = A>,
        F: Fn(&A) -> Result<Vec<A::Event>, A::Error>,
        DomainError: From<A::Error>,
    {
        self.execute(&command.aggregate_id(), command_fn)
    }

    /// Loads an aggregate, executes a command on it and publishes the
    /// resulting events.
    ///
    /// The command function receives the current aggregate state and returns
    /// either a list of events to apply, or an error. It runs again on fresh
    /// state each time the append loses a race.
    pub fn execute<F>(
        &self,
        aggregate_id: &AggregateId,
        command_fn: F,
    ) -> Result<CommandResult<A>, DomainError>
    where
        F: Fn(&A) -> Result<Vec<A::Event>, A::Error>,
        DomainError: From<A::Error>,
    {
        let mut retries = 0;
        loop {
            let aggregate = self.load(aggregate_id)?;
            match self.execute_on(aggregate, &command_fn) {
                Err(DomainError::EventStore(e))
                    if e.is_conflict() && retries < MAX_CONFLICT_RETRIES =>
                {
                    retries += 1;
                    tracing::debug!(%aggregate_id, retries, "retrying command after conflict");
                }
                result => return result,
            }
        }
    }

    /// Executes a command against state already loaded in this session.
    ///
    /// The events are appended only if the stream is still at the version
    /// `aggregate` was folded to; otherwise this returns a concurrency
    /// conflict and publishes nothing.
    pub fn execute_on<F>(
        &self,
        mut aggregate: A,
        command_fn: F,
    ) -> Result<CommandResult<A>, DomainError>
    where
        F: FnOnce(&A) -> Result<Vec<A::Event>, A::Error>,
        DomainError: From<A::Error>,
    {
        let events = command_fn(&aggregate)?;

        if events.is_empty() {
            return Ok(CommandResult {
                aggregate,
                events: vec![],
            });
        }

        self.bus.publish_all(
            events.clone(),
            AppendOptions::expect_version(aggregate.version()),
        )?;
        aggregate.apply_events(&events);

        Ok(CommandResult { aggregate, events })
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;
    use chrono::{DateTime, Utc};
    use common::UserId;
    use event_store::{Event, EventStoreExt, InMemoryEventStore};

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

    #[derive(Debug, Default, Clone)]
    struct TestAggregate {
        id: Option<AggregateId>,
        value: i32,
        version: u64,
    }

    #[derive(Debug, thiserror::Error)]
    enum TestError {
        #[error("invalid value: {0}")]
        InvalidValue(i32),
    }

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

    impl From<TestError> for DomainError {
        fn from(e: TestError) -> Self {
            DomainError::Validation(e.to_string())
        }
    }

    fn handler(
        store: &InMemoryEventStore<TestEvent>,
    ) -> CommandHandler<InMemoryEventStore<TestEvent>, TestAggregate> {
        CommandHandler::new(Arc::new(EventBus::new(store.clone())))
    }

    fn test_id() -> AggregateId {
        AggregateId::user(&UserId::new("ala"))
    }

    #[test]
    fn test_execute_creates_aggregate() {
        let store = InMemoryEventStore::new();
        let handler = handler(&store);
        let id = test_id();

        let result = handler
            .execute(&id, |_| Ok(vec![TestEvent::Created { id: id.clone() }]))
            .unwrap();

        assert_eq!(result.events.len(), 1);
        assert_eq!(result.aggregate.id(), Some(id));
        assert_eq!(result.aggregate.version(), 1);
        assert_eq!(store.event_count().unwrap(), 1);
    }

    #[test]
    fn test_execute_replays_previous_events() {
        let store = InMemoryEventStore::new();
        let handler = handler(&store);
        let id = test_id();

        handler
            .execute(&id, |_| Ok(vec![TestEvent::Created { id: id.clone() }]))
            .unwrap();

        let result = handler
            .execute(&id, |agg| {
                assert!(agg.id().is_some());
                Ok(vec![TestEvent::Updated {
                    id: id.clone(),
                    value: 42,
                }])
            })
            .unwrap();

        assert_eq!(result.aggregate.value, 42);
        assert_eq!(result.aggregate.version(), 2);
    }

    #[test]
    fn test_execute_returns_error_on_invalid_command() {
        let store = InMemoryEventStore::new();
        let handler = handler(&store);

        let result = handler.execute(&test_id(), |_| Err(TestError::InvalidValue(-1)));

        assert!(matches!(result, Err(DomainError::Validation(_))));
        assert_eq!(store.event_count().unwrap(), 0);
    }

    #[test]
    fn test_empty_events_returns_without_publishing() {
        let store = InMemoryEventStore::new();
        let handler = handler(&store);

        let result = handler.execute(&test_id(), |_| Ok(vec![])).unwrap();

        assert!(result.is_noop());
        assert_eq!(result.aggregate.version(), 0);
        assert_eq!(store.event_count().unwrap(), 0);
    }

    #[test]
    fn test_execute_on_sees_in_session_state() {
        let store = InMemoryEventStore::new();
        let handler = handler(&store);
        let id = test_id();

        let created = handler
            .execute(&id, |_| Ok(vec![TestEvent::Created { id: id.clone() }]))
            .unwrap();
        let updated = handler
            .execute_on(created.aggregate, |agg| {
                Ok(vec![TestEvent::Updated {
                    id: id.clone(),
                    value: agg.value + 5,
                }])
            })
            .unwrap();

        assert_eq!(updated.aggregate.value, 5);
        assert_eq!(updated.aggregate.version(), 2);
        assert_eq!(handler.load(&id).unwrap().value, 5);
    }

    #[test]
    fn test_execute_on_stale_state_conflicts() {
        let store = InMemoryEventStore::new();
        let handler = handler(&store);
        let id = test_id();

        handler
            .execute(&id, |_| Ok(vec![TestEvent::Created { id: id.clone() }]))
            .unwrap();

        let result = handler.execute_on(TestAggregate::default(), |_| {
            Ok(vec![TestEvent::Created { id: id.clone() }])
        });

        assert!(matches!(result, Err(DomainError::EventStore(ref e)) if e.is_conflict()));
        assert_eq!(store.event_count().unwrap(), 1);
    }

    #[test]
    fn test_execute_reruns_command_on_fresh_state_after_conflict() {
        let store = InMemoryEventStore::new();
        let handler = handler(&store);
        let id = test_id();
        handler
            .execute(&id, |_| Ok(vec![TestEvent::Created { id: id.clone() }]))
            .unwrap();

        let calls = Cell::new(0);
        let result = handler
            .execute(&id, |agg| {
                calls.set(calls.get() + 1);
                if calls.get() == 1 {
                    // Another writer gets in between load and append
                    store
                        .append_event(TestEvent::Updated {
                            id: id.clone(),
                            value: 7,
                        })
                        .unwrap();
                }
                Ok(vec![TestEvent::Updated {
                    id: id.clone(),
                    value: agg.value + 1,
                }])
            })
            .unwrap();

        assert_eq!(calls.get(), 2);
        assert_eq!(result.aggregate.value, 8);
        assert_eq!(result.aggregate.version(), 3);
        assert_eq!(store.event_count().unwrap(), 3);
    }

    #[test]
    fn test_handle_targets_the_command_aggregate() {
        struct SetValue {
            id: AggregateId,
            value: i32,
        }

        impl Command for SetValue {
            type Aggregate = TestAggregate;

            fn aggregate_id(&self) -> AggregateId {
                self.id.clone()
            }
        }

        let store = InMemoryEventStore::new();
        let handler = handler(&store);
        let command = SetValue {
            id: test_id(),
            value: 3,
        };

        let result = handler
            .handle(&command, |_| {
                Ok(vec![TestEvent::Updated {
                    id: command.id.clone(),
                    value: command.value,
                }])
            })
            .unwrap();

        assert_eq!(result.aggregate.value, 3);
        assert_eq!(store.aggregate_version(&test_id()).unwrap(), 1);
    }

    #[test]
    fn test_load_existing() {
        let store = InMemoryEventStore::new();
        let handler = handler(&store);
        let id = test_id();

        assert!(handler.load_existing(&id).unwrap().is_none());

        handler
            .execute(&id, |_| Ok(vec![TestEvent::Created { id: id.clone() }]))
            .unwrap();

        assert!(handler.load_existing(&id).unwrap().is_some());
    }
}

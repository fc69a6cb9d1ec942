use crate::{AggregateCategory, AggregateId, Event, EventEnvelope, EventQuery, Result, Sequence};

/// Options for appending events.
///
/// The version of an aggregate is the number of events its stream holds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AppendOptions {
    /// Version the aggregate of the batch must be at for the append to go
    /// through. If None, no version check is performed.
    pub expected_version: Option<u64>,
}

impl AppendOptions {
    /// Creates options with no version check.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates options expecting the aggregate to be at a specific version.
    pub fn expect_version(version: u64) -> Self {
        Self {
            expected_version: Some(version),
        }
    }

    /// Creates options expecting the aggregate to have no events yet.
    pub fn expect_new() -> Self {
        Self::expect_version(0)
    }
}

/// Core trait for event store implementations.
///
/// An event store is an append-only log. Every read returns a snapshot
/// taken at call time, in append order: an append that races with a read
/// is either entirely visible to it or not at all.
/// All implementations must be thread-safe (Send + Sync).
pub trait EventStore: Send + Sync {
    /// The type of events this store records.
    type Event: Event;

    /// Appends events to the log.
    ///
    /// Events are appended atomically and receive consecutive sequences.
    /// Returns the recorded envelopes in the order they were appended.
    ///
    /// When `options` carries an expected version, every event in the batch
    /// must belong to one aggregate, and the append fails with
    /// [`EventStoreError::ConcurrencyConflict`](crate::EventStoreError::ConcurrencyConflict)
    /// unless that aggregate's stream is still at the expected version.
    fn append(
        &self,
        events: Vec<Self::Event>,
        options: AppendOptions,
    ) -> Result<Vec<EventEnvelope<Self::Event>>>;

    /// Retrieves all events for a specific aggregate, oldest first.
    fn get_events_for_aggregate(
        &self,
        aggregate_id: &AggregateId,
    ) -> Result<Vec<EventEnvelope<Self::Event>>>;

    /// Retrieves all events of every aggregate in a category, oldest first.
    fn get_events_by_category(
        &self,
        category: AggregateCategory,
    ) -> Result<Vec<EventEnvelope<Self::Event>>>;

    /// Retrieves events matching a query.
    fn query_events(&self, query: &EventQuery) -> Result<Vec<EventEnvelope<Self::Event>>>;

    /// Returns the sequence of the most recently appended event.
    ///
    /// Returns [`Sequence::initial`] for an empty log.
    fn last_sequence(&self) -> Result<Sequence>;

    /// Returns the number of events recorded for an aggregate.
    fn aggregate_version(&self, aggregate_id: &AggregateId) -> Result<u64>;

    /// Returns the total number of events stored.
    fn event_count(&self) -> Result<usize>;

    /// Removes every event. Only meant for resetting between tests.
    fn clear(&self) -> Result<()>;
}

/// Extension trait providing convenience methods for event stores.
pub trait EventStoreExt: EventStore {
    /// Appends a single event to the log.
    fn append_event(&self, event: Self::Event) -> Result<EventEnvelope<Self::Event>> {
        let mut recorded = self.append(vec![event], AppendOptions::new())?;
        recorded.pop().ok_or(crate::EventStoreError::EmptyAppend)
    }

    /// Checks if an aggregate has any events.
    fn aggregate_exists(&self, aggregate_id: &AggregateId) -> Result<bool> {
        let query = EventQuery::for_aggregate(aggregate_id.clone()).limit(1);
        Ok(!self.query_events(&query)?.is_empty())
    }
}

// Blanket implementation for all EventStore implementations
impl<T: EventStore + ?Sized> EventStoreExt for T {}

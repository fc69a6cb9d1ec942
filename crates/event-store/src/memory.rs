use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::{
    AggregateCategory, AggregateId, Event, EventEnvelope, EventQuery, EventStoreError, Result,
    Sequence,
    store::{AppendOptions, EventStore},
};

/// In-memory event store.
///
/// Events live in a single vector guarded by a read/write lock: appends
/// take the write lock, reads clone the matching events under the read
/// lock, so every read works on a consistent prefix of the log.
/// Cloning the store shares the same log.
pub struct InMemoryEventStore<E> {
    events: Arc<RwLock<Vec<EventEnvelope<E>>>>,
}

impl<E> Clone for InMemoryEventStore<E> {
    fn clone(&self) -> Self {
        Self {
            events: Arc::clone(&self.events),
        }
    }
}

impl<E> Default for InMemoryEventStore<E> {
    fn default() -> Self {
        Self {
            events: Arc::new(RwLock::new(Vec::new())),
        }
    }
}

impl<E: Event> InMemoryEventStore<E> {
    /// Creates a new empty in-memory event store.
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Vec<EventEnvelope<E>>>> {
        self.events.read().map_err(|_| EventStoreError::LockPoisoned)
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Vec<EventEnvelope<E>>>> {
        self.events.write().map_err(|_| EventStoreError::LockPoisoned)
    }

    fn filtered(
        &self,
        predicate: impl Fn(&EventEnvelope<E>) -> bool,
    ) -> Result<Vec<EventEnvelope<E>>> {
        let store = self.read()?;
        Ok(store.iter().filter(|e| predicate(*e)).cloned().collect())
    }
}

impl<E: Event> EventStore for InMemoryEventStore<E> {
    type Event = E;

    fn append(&self, events: Vec<E>, options: AppendOptions) -> Result<Vec<EventEnvelope<E>>> {
        let Some(first) = events.first() else {
            return Err(EventStoreError::EmptyAppend);
        };

        let mut store = self.write()?;

        if let Some(expected) = options.expected_version {
            let aggregate_id = first.aggregate_id();
            if events.iter().any(|e| e.aggregate_id() != aggregate_id) {
                return Err(EventStoreError::MixedAggregates);
            }

            let actual = stream_version(&store, aggregate_id);
            if actual != expected {
                tracing::debug!(%aggregate_id, expected, actual, "append rejected");
                return Err(EventStoreError::ConcurrencyConflict {
                    aggregate_id: aggregate_id.clone(),
                    expected,
                    actual,
                });
            }
        }

        let mut sequence = store
            .last()
            .map(|e| e.sequence)
            .unwrap_or(Sequence::initial());

        let mut recorded = Vec::with_capacity(events.len());
        for event in events {
            sequence = sequence.next();
            tracing::trace!(
                %sequence,
                event_type = event.event_type(),
                aggregate_id = %event.aggregate_id(),
                "appending event"
            );
            recorded.push(EventEnvelope::record(event, sequence));
        }
        store.extend(recorded.iter().cloned());

        metrics::counter!("event_store_events_appended_total").increment(recorded.len() as u64);
        Ok(recorded)
    }

    fn get_events_for_aggregate(&self, aggregate_id: &AggregateId) -> Result<Vec<EventEnvelope<E>>> {
        self.filtered(|e| e.aggregate_id() == aggregate_id)
    }

    fn get_events_by_category(&self, category: AggregateCategory) -> Result<Vec<EventEnvelope<E>>> {
        self.filtered(|e| e.aggregate_id().category() == category)
    }

    fn query_events(&self, query: &EventQuery) -> Result<Vec<EventEnvelope<E>>> {
        let store = self.read()?;
        let matching = store.iter().filter(|e| query.matches(*e));

        let offset = query.offset.unwrap_or(0);
        let limit = query.limit.unwrap_or(usize::MAX);
        Ok(matching.skip(offset).take(limit).cloned().collect())
    }

    fn last_sequence(&self) -> Result<Sequence> {
        Ok(self
            .read()?
            .last()
            .map(|e| e.sequence)
            .unwrap_or(Sequence::initial()))
    }

    fn aggregate_version(&self, aggregate_id: &AggregateId) -> Result<u64> {
        Ok(stream_version(&self.read()?, aggregate_id))
    }

    fn event_count(&self) -> Result<usize> {
        Ok(self.read()?.len())
    }

    fn clear(&self) -> Result<()> {
        self.write()?.clear();
        tracing::debug!("event log cleared");
        Ok(())
    }
}

fn stream_version<E: Event>(log: &[EventEnvelope<E>], aggregate_id: &AggregateId) -> u64 {
    log.iter().filter(|e| e.aggregate_id() == aggregate_id).count() as u64
}

//! Synchronous in-process event distribution.

use crate::{AppendOptions, EventEnvelope, EventStore, Result, store::EventStoreExt};

/// Something that wants to learn about newly recorded events.
///
/// Subscribers are plain event consumers. A subscriber that has nothing
/// to do for a given event kind simply returns; this is not an error.
pub trait EventSubscriber<E>: Send + Sync {
    /// Returns the name of this subscriber.
    fn name(&self) -> &'static str;

    /// Handles a recorded event.
    fn on_event(&self, envelope: &EventEnvelope<E>);
}

/// Publishes events: records them in the store, then notifies subscribers.
///
/// Subscribers are invoked once per event, on the calling thread, in
/// registration order, and only after the event is visible in the store.
pub struct EventBus<S: EventStore> {
    store: S,
    subscribers: Vec<Box<dyn EventSubscriber<S::Event>>>,
}

impl<S: EventStore> EventBus<S> {
    /// Creates a bus that records into the given store.
    pub fn new(store: S) -> Self {
        Self {
            store,
            subscribers: Vec::new(),
        }
    }

    /// Registers a subscriber. It will be notified after those registered before it.
    pub fn subscribe(&mut self, subscriber: Box<dyn EventSubscriber<S::Event>>) {
        tracing::debug!(subscriber = subscriber.name(), "subscriber registered");
        self.subscribers.push(subscriber);
    }

    /// Adds a subscriber, builder style.
    pub fn with_subscriber(mut self, subscriber: Box<dyn EventSubscriber<S::Event>>) -> Self {
        self.subscribe(subscriber);
        self
    }

    /// Returns the number of registered subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }

    /// Returns a reference to the underlying event store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Records a single event and notifies every subscriber.
    pub fn publish(&self, event: S::Event) -> Result<EventEnvelope<S::Event>> {
        let envelope = self.store.append_event(event)?;
        self.notify(&envelope);
        Ok(envelope)
    }

    /// Records a batch of events atomically, then notifies subscribers of
    /// each in order.
    ///
    /// A batch rejected by the store's version check notifies nobody.
    pub fn publish_all(
        &self,
        events: Vec<S::Event>,
        options: AppendOptions,
    ) -> Result<Vec<EventEnvelope<S::Event>>> {
        if events.is_empty() {
            return Ok(Vec::new());
        }
        let recorded = self.store.append(events, options)?;
        for envelope in &recorded {
            self.notify(envelope);
        }
        Ok(recorded)
    }

    fn notify(&self, envelope: &EventEnvelope<S::Event>) {
        for subscriber in &self.subscribers {
            subscriber.on_event(envelope);
        }
    }
}

/// Logs every recorded event at debug level.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSubscriber;

impl<E: crate::Event> EventSubscriber<E> for TracingSubscriber {
    fn name(&self) -> &'static str {
        "TracingSubscriber"
    }

    fn on_event(&self, envelope: &EventEnvelope<E>) {
        tracing::debug!(
            sequence = %envelope.sequence,
            event_type = envelope.event_type(),
            aggregate_id = %envelope.aggregate_id(),
            "event published"
        );
    }
}

/// Counts published events per event type.
#[derive(Debug, Default, Clone, Copy)]
pub struct MetricsSubscriber;

impl<E: crate::Event> EventSubscriber<E> for MetricsSubscriber {
    fn name(&self) -> &'static str {
        "MetricsSubscriber"
    }

    fn on_event(&self, envelope: &EventEnvelope<E>) {
        metrics::counter!("events_published_total", "event_type" => envelope.event_type())
            .increment(1);
    }
}

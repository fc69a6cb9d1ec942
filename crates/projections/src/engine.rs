//! Projection engine running folds against the event store.

use event_store::{EventQuery, EventStore};

use crate::Result;
use crate::projection::{Projection, fold};

/// Runs projections over snapshots of an event store.
///
/// Each run reads a consistent prefix of the log and folds it from the
/// seed; nothing is cached between runs.
#[derive(Clone)]
pub struct ProjectionEngine<S: EventStore> {
    store: S,
}

impl<S: EventStore> ProjectionEngine<S> {
    /// Creates a new engine reading from the given event store.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Returns a reference to the underlying event store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Folds the projection over its own slice of the log.
    pub fn project<P>(&self, projection: &P) -> Result<P::Output>
    where
        P: Projection<Event = S::Event>,
    {
        self.run(projection, &projection.query())
    }

    /// Folds the projection over the events matching `query`.
    #[tracing::instrument(skip(self, projection, query), fields(name = projection.name()))]
    pub fn run<P>(&self, projection: &P, query: &EventQuery) -> Result<P::Output>
    where
        P: Projection<Event = S::Event>,
    {
        let envelopes = self.store.query_events(query)?;
        let output = fold(projection, &envelopes);

        metrics::counter!("projection_events_folded_total", "projection" => projection.name())
            .increment(envelopes.len() as u64);
        tracing::trace!(events = envelopes.len(), "projection folded");

        Ok(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::{AggregateId, UserId};
    use domain::{EventPayload, SocialEvent};
    use event_store::{AppendOptions, InMemoryEventStore};

    /// Collects the type names of everything it folds.
    struct Journal;

    impl Projection for Journal {
        type Event = SocialEvent;
        type Output = Vec<&'static str>;

        fn name(&self) -> &'static str {
            "Journal"
        }

        fn query(&self) -> EventQuery {
            EventQuery::new()
        }

        fn seed(&self) -> Vec<&'static str> {
            Vec::new()
        }

        fn handle(&self, mut acc: Vec<&'static str>, event: &SocialEvent) -> Vec<&'static str> {
            acc.push(event.payload.event_type());
            acc
        }
    }

    /// Counts only follower changes.
    struct FollowerDelta;

    impl Projection for FollowerDelta {
        type Event = SocialEvent;
        type Output = i32;

        fn name(&self) -> &'static str {
            "FollowerDelta"
        }

        fn query(&self) -> EventQuery {
            EventQuery::new()
        }

        fn seed(&self) -> i32 {
            0
        }

        fn handle(&self, acc: i32, event: &SocialEvent) -> i32 {
            match event.payload {
                EventPayload::FollowerAdded(_) => acc + 1,
                EventPayload::FollowerRemoved(_) => acc - 1,
                _ => acc,
            }
        }
    }

    fn seeded_store() -> InMemoryEventStore<SocialEvent> {
        let store = InMemoryEventStore::new();
        let ala = UserId::new("ala");
        let ola = UserId::new("ola");
        store
            .append(
                vec![
                    SocialEvent::user_created(&ala),
                    SocialEvent::user_created(&ola),
                    SocialEvent::follower_added(&ala, ola.clone()),
                    SocialEvent::post_sent(&ala, "hi"),
                ],
                AppendOptions::new(),
            )
            .unwrap();
        store
    }

    #[test]
    fn project_uses_the_projection_query() {
        let engine = ProjectionEngine::new(seeded_store());

        let journal = engine.project(&Journal).unwrap();

        assert_eq!(
            journal,
            vec!["UserCreated", "UserCreated", "FollowerAdded", "PostSent"]
        );
    }

    #[test]
    fn run_folds_only_the_queried_slice() {
        let engine = ProjectionEngine::new(seeded_store());
        let query = EventQuery::for_aggregate(AggregateId::user(&UserId::new("ala")));

        let journal = engine.run(&Journal, &query).unwrap();

        assert_eq!(journal, vec!["UserCreated", "FollowerAdded", "PostSent"]);
    }

    #[test]
    fn run_on_empty_store_returns_seed() {
        let engine = ProjectionEngine::new(InMemoryEventStore::new());
        assert_eq!(engine.project(&FollowerDelta).unwrap(), 0);
    }

    #[test]
    fn selective_projection_skips_other_kinds() {
        let engine = ProjectionEngine::new(seeded_store());
        assert_eq!(engine.project(&FollowerDelta).unwrap(), 1);
    }
}

use chrono::{DateTime, Utc};
use common::{AggregateCategory, AggregateId, PostId, UserId};
use criterion::{Criterion, criterion_group, criterion_main};
use event_store::{
    AppendOptions, Event, EventQuery, EventStore, EventStoreExt, InMemoryEventStore,
};

#[derive(Debug, Clone)]
struct BenchEvent {
    aggregate_id: AggregateId,
    timestamp: DateTime<Utc>,
}

impl Event for BenchEvent {
    fn aggregate_id(&self) -> &AggregateId {
        &self.aggregate_id
    }

    fn event_type(&self) -> &'static str {
        "BenchEvent"
    }

    fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }
}

fn user_event(name: &str) -> BenchEvent {
    BenchEvent {
        aggregate_id: AggregateId::user(&UserId::new(name)),
        timestamp: Utc::now(),
    }
}

fn post_event(id: u64) -> BenchEvent {
    BenchEvent {
        aggregate_id: AggregateId::post(PostId::new(id)),
        timestamp: Utc::now(),
    }
}

/// Builds a log of 1000 events spread over 10 users and 100 posts.
fn populated_store() -> InMemoryEventStore<BenchEvent> {
    let store = InMemoryEventStore::new();
    for i in 0..900 {
        store
            .append_event(user_event(&format!("user-{}", i % 10)))
            .unwrap();
    }
    for i in 0..100 {
        store.append_event(post_event(i)).unwrap();
    }
    store
}

fn bench_append_single_event(c: &mut Criterion) {
    c.bench_function("event_store/append_single_event", |b| {
        let store = InMemoryEventStore::new();
        b.iter(|| {
            store.append_event(user_event("ala")).unwrap();
        });
    });
}

fn bench_append_batch_10(c: &mut Criterion) {
    c.bench_function("event_store/append_batch_10", |b| {
        let store = InMemoryEventStore::new();
        b.iter(|| {
            let events: Vec<BenchEvent> = (0..10).map(|_| user_event("ala")).collect();
            store.append(events, AppendOptions::new()).unwrap();
        });
    });
}

fn bench_get_events_for_aggregate(c: &mut Criterion) {
    let store = populated_store();
    let id = AggregateId::user(&UserId::new("user-3"));

    c.bench_function("event_store/get_events_for_aggregate_1000", |b| {
        b.iter(|| {
            let events = store.get_events_for_aggregate(&id).unwrap();
            assert_eq!(events.len(), 90);
        });
    });
}

fn bench_get_events_by_category(c: &mut Criterion) {
    let store = populated_store();

    c.bench_function("event_store/get_events_by_category_1000", |b| {
        b.iter(|| {
            let events = store.get_events_by_category(AggregateCategory::Post).unwrap();
            assert_eq!(events.len(), 100);
        });
    });
}

fn bench_query_events_with_limit(c: &mut Criterion) {
    let store = populated_store();
    let query = EventQuery::for_category(AggregateCategory::User).limit(10);

    c.bench_function("event_store/query_events_limit_10", |b| {
        b.iter(|| {
            let events = store.query_events(&query).unwrap();
            assert_eq!(events.len(), 10);
        });
    });
}

criterion_group!(
    benches,
    bench_append_single_event,
    bench_append_batch_10,
    bench_get_events_for_aggregate,
    bench_get_events_by_category,
    bench_query_events_with_limit,
);
criterion_main!(benches);

use common::{PostId, UserId};
use criterion::{Criterion, criterion_group, criterion_main};
use domain::SocialEvent;
use event_store::{AppendOptions, EventStore, InMemoryEventStore};
use projections::{FeedQueries, PostFeedView, ProjectionEngine, UserDirectory};

/// Populate a store with `users` users, each having 3 posts.
fn populate_store(store: &InMemoryEventStore<SocialEvent>, users: usize) {
    let mut next_post = 1;
    for i in 0..users {
        let user = UserId::new(format!("user-{i:04}"));
        let mut events = vec![SocialEvent::user_created(&user)];
        for n in 0..3 {
            let text = format!("post {n} from {user}");
            events.push(SocialEvent::post_created(
                PostId::new(next_post),
                user.clone(),
                text.clone(),
            ));
            events.push(SocialEvent::post_sent(&user, text));
            next_post += 1;
        }
        store.append(events, AppendOptions::new()).unwrap();
    }
}

fn bench_user_directory_100_users(c: &mut Criterion) {
    let store = InMemoryEventStore::new();
    populate_store(&store, 100);
    let engine = ProjectionEngine::new(store);

    c.bench_function("projections/user_directory_700_events", |b| {
        b.iter(|| engine.project(&UserDirectory).unwrap());
    });
}

fn bench_post_feed_1000_users(c: &mut Criterion) {
    let store = InMemoryEventStore::new();
    populate_store(&store, 1000);
    let engine = ProjectionEngine::new(store);

    c.bench_function("projections/post_feed_7000_events", |b| {
        b.iter(|| engine.project(&PostFeedView).unwrap());
    });
}

fn bench_wall_query(c: &mut Criterion) {
    let store = InMemoryEventStore::new();
    populate_store(&store, 100);
    let queries = FeedQueries::new(store);
    let target = UserId::new("user-0042");

    c.bench_function("projections/wall_query", |b| {
        b.iter(|| queries.wall(&target).unwrap());
    });
}

criterion_group!(
    benches,
    bench_user_directory_100_users,
    bench_post_feed_1000_users,
    bench_wall_query,
);
criterion_main!(benches);

//! Shared application state.

use domain::{FeedService, SocialEvent};
use event_store::EventStore;
use projections::FeedQueries;

/// Shared application state accessible from all handlers.
///
/// The write side and the read side share one event store.
pub struct AppState<S: EventStore<Event = SocialEvent>> {
    pub feed: FeedService<S>,
    pub queries: FeedQueries<S>,
}

impl<S: EventStore<Event = SocialEvent> + Clone> AppState<S> {
    /// Creates the state over the given event store.
    pub fn new(event_store: S) -> Self {
        Self {
            feed: FeedService::new(event_store.clone()),
            queries: FeedQueries::new(event_store),
        }
    }
}

//! Query facade answering the feed's read-side questions.

use common::UserId;
use domain::{Post, SocialEvent};
use event_store::EventStore;

use crate::Result;
use crate::engine::ProjectionEngine;
use crate::views::{
    FeedPost, PostFeedView, TimelineView, UserDirectory, UserDirectoryEntryView, UserSummary,
    WallView,
};

/// Read-side entry points over the event log.
///
/// Every call folds a fresh snapshot of the log; there is no cached state
/// to keep in sync with writes.
#[derive(Clone)]
pub struct FeedQueries<S: EventStore<Event = SocialEvent>> {
    engine: ProjectionEngine<S>,
}

impl<S: EventStore<Event = SocialEvent>> FeedQueries<S> {
    /// Creates a query facade over the given event store.
    pub fn new(store: S) -> Self {
        Self {
            engine: ProjectionEngine::new(store),
        }
    }

    /// Returns the projection engine backing these queries.
    pub fn engine(&self) -> &ProjectionEngine<S> {
        &self.engine
    }

    /// Returns a user's summary, or None if the user was never created.
    pub fn get_user(&self, user_id: &UserId) -> Result<Option<UserSummary>> {
        self.engine
            .project(&UserDirectoryEntryView::new(user_id.clone()))
    }

    /// Returns every user's summary, ordered by name.
    pub fn list_users(&self) -> Result<Vec<UserSummary>> {
        let directory = self.engine.project(&UserDirectory)?;
        Ok(directory.into_values().collect())
    }

    /// Returns the posts a user sent, newest first.
    pub fn wall(&self, user_id: &UserId) -> Result<Vec<Post>> {
        Ok(self.engine.project(&WallView::new(user_id.clone()))?.into())
    }

    /// Returns the posts delivered to a user, newest first.
    pub fn timeline(&self, user_id: &UserId) -> Result<Vec<Post>> {
        Ok(self.engine.project(&TimelineView::new(user_id.clone()))?.into())
    }

    /// Returns every post ever created, in creation order.
    pub fn list_posts(&self) -> Result<Vec<FeedPost>> {
        Ok(self.engine.project(&PostFeedView)?.into_posts())
    }
}

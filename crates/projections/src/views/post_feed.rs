//! Global post feed: every post ever created, in creation order.

use std::collections::HashSet;

use common::{AggregateCategory, PostId};
use domain::{EventPayload, Post, SocialEvent};
use event_store::EventQuery;
use serde::Serialize;

use crate::projection::Projection;

/// A post in the global feed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FeedPost {
    pub post_id: PostId,
    #[serde(flatten)]
    pub post: Post,
}

/// Accumulator for the post feed.
#[derive(Debug, Clone, Default)]
pub struct PostFeed {
    posts: Vec<FeedPost>,
    seen: HashSet<PostId>,
}

impl PostFeed {
    /// Returns the posts in creation order.
    pub fn posts(&self) -> &[FeedPost] {
        &self.posts
    }

    /// Consumes the feed, returning its posts in creation order.
    pub fn into_posts(self) -> Vec<FeedPost> {
        self.posts
    }

    /// Returns the number of posts.
    pub fn len(&self) -> usize {
        self.posts.len()
    }

    /// Returns true if no post has been created.
    pub fn is_empty(&self) -> bool {
        self.posts.is_empty()
    }
}

/// Folds PostCreated events across all posts, keeping the first event of
/// each post in the category's append order.
#[derive(Debug, Clone, Copy, Default)]
pub struct PostFeedView;

impl Projection for PostFeedView {
    type Event = SocialEvent;
    type Output = PostFeed;

    fn name(&self) -> &'static str {
        "PostFeedView"
    }

    fn query(&self) -> EventQuery {
        EventQuery::for_category(AggregateCategory::Post)
    }

    fn seed(&self) -> PostFeed {
        PostFeed::default()
    }

    fn handle(&self, mut acc: PostFeed, event: &SocialEvent) -> PostFeed {
        match (&event.payload, event.post_id()) {
            (EventPayload::PostCreated(data), Some(post_id)) => {
                if acc.seen.insert(post_id) {
                    acc.posts.push(FeedPost {
                        post_id,
                        post: Post::new(data.author.clone(), data.text.clone(), event.timestamp),
                    });
                }
                acc
            }
            _ => acc,
        }
    }
}

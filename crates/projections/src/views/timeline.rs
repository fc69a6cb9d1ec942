//! Timeline read model: posts delivered to a user, newest first.

use std::collections::VecDeque;

use common::{AggregateId, UserId};
use domain::{EventPayload, Post, SocialEvent};
use event_store::EventQuery;

use crate::projection::Projection;

/// Folds a user's PostReceived events into their timeline.
#[derive(Debug, Clone)]
pub struct TimelineView {
    user_id: UserId,
}

impl TimelineView {
    /// Creates a timeline view for the given user.
    pub fn new(user_id: UserId) -> Self {
        Self { user_id }
    }
}

impl Projection for TimelineView {
    type Event = SocialEvent;
    type Output = VecDeque<Post>;

    fn name(&self) -> &'static str {
        "TimelineView"
    }

    fn query(&self) -> EventQuery {
        EventQuery::for_aggregate(AggregateId::user(&self.user_id))
    }

    fn seed(&self) -> VecDeque<Post> {
        VecDeque::new()
    }

    fn handle(&self, mut acc: VecDeque<Post>, event: &SocialEvent) -> VecDeque<Post> {
        match &event.payload {
            EventPayload::PostReceived(data) => {
                acc.push_front(Post::new(
                    data.author.clone(),
                    data.text.clone(),
                    event.timestamp,
                ));
                acc
            }
            _ => acc,
        }
    }
}

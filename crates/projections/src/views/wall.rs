//! Wall read model: the posts a user sent, newest first.

use std::collections::VecDeque;

use common::{AggregateId, UserId};
use domain::{EventPayload, Post, SocialEvent};
use event_store::EventQuery;

use crate::projection::Projection;

/// Folds a user's PostSent events into their wall.
#[derive(Debug, Clone)]
pub struct WallView {
    user_id: UserId,
}

impl WallView {
    /// Creates a wall view for the given user.
    pub fn new(user_id: UserId) -> Self {
        Self { user_id }
    }
}

impl Projection for WallView {
    type Event = SocialEvent;
    type Output = VecDeque<Post>;

    fn name(&self) -> &'static str {
        "WallView"
    }

    fn query(&self) -> EventQuery {
        EventQuery::for_aggregate(AggregateId::user(&self.user_id))
    }

    fn seed(&self) -> VecDeque<Post> {
        VecDeque::new()
    }

    fn handle(&self, mut acc: VecDeque<Post>, event: &SocialEvent) -> VecDeque<Post> {
        match &event.payload {
            EventPayload::PostSent(data) => {
                acc.push_front(Post::new(
                    self.user_id.clone(),
                    data.text.clone(),
                    event.timestamp,
                ));
                acc
            }
            _ => acc,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use event_store::{EventEnvelope, Sequence};

    use crate::projection::fold;

    #[test]
    fn wall_is_newest_first_and_skips_other_kinds() {
        let ala = UserId::new("ala");
        let events = [
            SocialEvent::user_created(&ala),
            SocialEvent::post_sent(&ala, "P1"),
            SocialEvent::post_received(&ala, UserId::new("ola"), "not mine"),
            SocialEvent::post_sent(&ala, "P2"),
            SocialEvent::follower_added(&ala, UserId::new("ola")),
            SocialEvent::post_sent(&ala, "P3"),
        ];
        let log: Vec<_> = events
            .into_iter()
            .enumerate()
            .map(|(i, e)| EventEnvelope::record(e, Sequence::new(i as u64 + 1)))
            .collect();

        let wall = fold(&WallView::new(ala.clone()), &log);

        let texts: Vec<_> = wall.iter().map(|p| p.text.as_str()).collect();
        assert_eq!(texts, ["P3", "P2", "P1"]);
        assert!(wall.iter().all(|p| p.author == ala));
    }

    #[test]
    fn long_wall_keeps_every_post_newest_first() {
        let ala = UserId::new("ala");
        let log: Vec<_> = (1..=5_000u64)
            .map(|i| {
                EventEnvelope::record(
                    SocialEvent::post_sent(&ala, format!("P{i}")),
                    Sequence::new(i),
                )
            })
            .collect();

        let wall = fold(&WallView::new(ala), &log);

        assert_eq!(wall.len(), 5_000);
        assert_eq!(wall.front().map(|p| p.text.as_str()), Some("P5000"));
        assert_eq!(wall.back().map(|p| p.text.as_str()), Some("P1"));
    }
}

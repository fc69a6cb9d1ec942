//! User directory read models: per-user summary and the full listing.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use common::{AggregateCategory, AggregateId, UserId};
use domain::{EventPayload, SocialEvent};
use event_store::EventQuery;
use serde::Serialize;

use crate::projection::Projection;

/// Public profile counters for a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserSummary {
    pub name: UserId,
    pub created_at: DateTime<Utc>,
    pub followed_count: u64,
    pub follower_count: u64,
    pub post_count: u64,
}

impl UserSummary {
    fn new(name: UserId, created_at: DateTime<Utc>) -> Self {
        Self {
            name,
            created_at,
            followed_count: 0,
            follower_count: 0,
            post_count: 0,
        }
    }
}

/// Folds one event of a user's stream into its summary.
///
/// Nothing exists until UserCreated is seen.
fn summarize(acc: Option<UserSummary>, event: &SocialEvent) -> Option<UserSummary> {
    match (&event.payload, acc) {
        (EventPayload::UserCreated, None) => event
            .user_id()
            .map(|name| UserSummary::new(name, event.timestamp)),
        (EventPayload::FollowingStarted(_), Some(mut s)) => {
            s.followed_count += 1;
            Some(s)
        }
        (EventPayload::FollowingEnded(_), Some(mut s)) => {
            s.followed_count = s.followed_count.saturating_sub(1);
            Some(s)
        }
        (EventPayload::FollowerAdded(_), Some(mut s)) => {
            s.follower_count += 1;
            Some(s)
        }
        (EventPayload::FollowerRemoved(_), Some(mut s)) => {
            s.follower_count = s.follower_count.saturating_sub(1);
            Some(s)
        }
        (EventPayload::PostSent(_), Some(mut s)) => {
            s.post_count += 1;
            Some(s)
        }
        (_, acc) => acc,
    }
}

/// Summary of a single user, folded from their stream.
#[derive(Debug, Clone)]
pub struct UserDirectoryEntryView {
    user_id: UserId,
}

impl UserDirectoryEntryView {
    /// Creates a directory entry view for the given user.
    pub fn new(user_id: UserId) -> Self {
        Self { user_id }
    }
}

impl Projection for UserDirectoryEntryView {
    type Event = SocialEvent;
    type Output = Option<UserSummary>;

    fn name(&self) -> &'static str {
        "UserDirectoryEntryView"
    }

    fn query(&self) -> EventQuery {
        EventQuery::for_aggregate(AggregateId::user(&self.user_id))
    }

    fn seed(&self) -> Option<UserSummary> {
        None
    }

    fn handle(&self, acc: Option<UserSummary>, event: &SocialEvent) -> Option<UserSummary> {
        summarize(acc, event)
    }
}

/// Summaries of every user, keyed and therefore ordered by name.
///
/// Folds the whole USER category in one pass, giving each user exactly
/// the summary its own entry view would.
#[derive(Debug, Clone, Copy, Default)]
pub struct UserDirectory;

impl Projection for UserDirectory {
    type Event = SocialEvent;
    type Output = BTreeMap<UserId, UserSummary>;

    fn name(&self) -> &'static str {
        "UserDirectory"
    }

    fn query(&self) -> EventQuery {
        EventQuery::for_category(AggregateCategory::User)
    }

    fn seed(&self) -> BTreeMap<UserId, UserSummary> {
        BTreeMap::new()
    }

    fn handle(
        &self,
        mut acc: BTreeMap<UserId, UserSummary>,
        event: &SocialEvent,
    ) -> BTreeMap<UserId, UserSummary> {
        let Some(user_id) = event.user_id() else {
            return acc;
        };
        let current = acc.remove(&user_id);
        if let Some(summary) = summarize(current, event) {
            acc.insert(user_id, summary);
        }
        acc
    }
}

//! Social feed domain events.

use chrono::{DateTime, Utc};
use common::{AggregateId, PostId, UserId};
use event_store::Event;
use serde::{Deserialize, Serialize};

/// A recorded fact about a user or a post.
///
/// Every event carries the aggregate it belongs to and the time it was
/// created; the payload says what happened.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SocialEvent {
    /// The aggregate this event belongs to.
    pub aggregate_id: AggregateId,

    /// When the event was created.
    pub timestamp: DateTime<Utc>,

    /// What happened.
    pub payload: EventPayload,
}

/// The closed catalog of event kinds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum EventPayload {
    /// A user came into existence.
    UserCreated,

    /// The user published a post on its wall.
    PostSent(PostSentData),

    /// A post by someone the user follows landed on its timeline.
    PostReceived(PostReceivedData),

    /// The user started following someone.
    FollowingStarted(FollowingData),

    /// The user stopped following someone.
    FollowingEnded(FollowingData),

    /// Someone started following the user.
    FollowerAdded(FollowerData),

    /// Someone stopped following the user.
    FollowerRemoved(FollowerData),

    /// A post was created in the global feed.
    PostCreated(PostCreatedData),
}

/// Data for PostSent event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostSentData {
    pub text: String,
}

/// Data for PostReceived event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostReceivedData {
    /// Who wrote the post.
    pub author: UserId,
    pub text: String,
}

/// Data for FollowingStarted and FollowingEnded events.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FollowingData {
    /// The user being followed.
    pub followed: UserId,
}

/// Data for FollowerAdded and FollowerRemoved events.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FollowerData {
    /// The user doing the following.
    pub follower: UserId,
}

/// Data for PostCreated event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostCreatedData {
    pub author: UserId,
    pub text: String,
}

impl EventPayload {
    /// Returns the event type name.
    pub fn event_type(&self) -> &'static str {
        match self {
            EventPayload::UserCreated => "UserCreated",
            EventPayload::PostSent(_) => "PostSent",
            EventPayload::PostReceived(_) => "PostReceived",
            EventPayload::FollowingStarted(_) => "FollowingStarted",
            EventPayload::FollowingEnded(_) => "FollowingEnded",
            EventPayload::FollowerAdded(_) => "FollowerAdded",
            EventPayload::FollowerRemoved(_) => "FollowerRemoved",
            EventPayload::PostCreated(_) => "PostCreated",
        }
    }
}

impl Event for SocialEvent {
    fn aggregate_id(&self) -> &AggregateId {
        &self.aggregate_id
    }

    fn event_type(&self) -> &'static str {
        self.payload.event_type()
    }

    fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }
}

// Convenience constructors for events
impl SocialEvent {
    fn for_user(user_id: &UserId, payload: EventPayload) -> Self {
        Self {
            aggregate_id: AggregateId::user(user_id),
            timestamp: Utc::now(),
            payload,
        }
    }

    /// Creates a UserCreated event.
    pub fn user_created(user_id: &UserId) -> Self {
        Self::for_user(user_id, EventPayload::UserCreated)
    }

    /// Creates a PostSent event on the author's stream.
    pub fn post_sent(user_id: &UserId, text: impl Into<String>) -> Self {
        Self::for_user(user_id, EventPayload::PostSent(PostSentData { text: text.into() }))
    }

    /// Creates a PostReceived event on the recipient's stream.
    pub fn post_received(user_id: &UserId, author: UserId, text: impl Into<String>) -> Self {
        Self::for_user(
            user_id,
            EventPayload::PostReceived(PostReceivedData {
                author,
                text: text.into(),
            }),
        )
    }

    /// Creates a FollowingStarted event on the follower's stream.
    pub fn following_started(user_id: &UserId, followed: UserId) -> Self {
        Self::for_user(user_id, EventPayload::FollowingStarted(FollowingData { followed }))
    }

    /// Creates a FollowingEnded event on the follower's stream.
    pub fn following_ended(user_id: &UserId, followed: UserId) -> Self {
        Self::for_user(user_id, EventPayload::FollowingEnded(FollowingData { followed }))
    }

    /// Creates a FollowerAdded event on the followed user's stream.
    pub fn follower_added(user_id: &UserId, follower: UserId) -> Self {
        Self::for_user(user_id, EventPayload::FollowerAdded(FollowerData { follower }))
    }

    /// Creates a FollowerRemoved event on the followed user's stream.
    pub fn follower_removed(user_id: &UserId, follower: UserId) -> Self {
        Self::for_user(user_id, EventPayload::FollowerRemoved(FollowerData { follower }))
    }

    /// Creates a PostCreated event on the post's own stream.
    pub fn post_created(post_id: PostId, author: UserId, text: impl Into<String>) -> Self {
        Self {
            aggregate_id: AggregateId::post(post_id),
            timestamp: Utc::now(),
            payload: EventPayload::PostCreated(PostCreatedData {
                author,
                text: text.into(),
            }),
        }
    }

    /// Returns the user this event belongs to, if it is a user event.
    pub fn user_id(&self) -> Option<UserId> {
        self.aggregate_id.as_user()
    }

    /// Returns the post this event belongs to, if it is a post event.
    pub fn post_id(&self) -> Option<PostId> {
        self.aggregate_id.as_post()
    }
}

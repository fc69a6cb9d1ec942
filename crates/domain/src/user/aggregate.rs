//! User aggregate implementation.

use chrono::{DateTime, Utc};
use common::{AggregateId, UserId};

use crate::aggregate::Aggregate;
use crate::events::{EventPayload, SocialEvent};

use super::{Post, PostText, UserError};

/// User aggregate root.
///
/// Folded from the user's own event stream. Follow relationships are kept
/// in the order they were established, which is also the order posts fan
/// out to followers.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct User {
    /// The user's identity, set by UserCreated.
    id: Option<UserId>,

    /// When the user was created.
    created_at: Option<DateTime<Utc>>,

    /// Users this user follows.
    followed: Vec<UserId>,

    /// Users following this user.
    followers: Vec<UserId>,

    /// Posts this user sent, oldest first.
    wall: Vec<Post>,

    /// Posts this user received, oldest first.
    timeline: Vec<Post>,

    /// Number of events folded so far.
    version: u64,
}

impl Aggregate for User {
    type Event = SocialEvent;
    type Error = UserError;

    fn id(&self) -> Option<AggregateId> {
        self.id.as_ref().map(AggregateId::user)
    }

    fn version(&self) -> u64 {
        self.version
    }

    fn apply(&mut self, event: &SocialEvent) {
        match &event.payload {
            EventPayload::UserCreated => {
                self.id = event.user_id();
                self.created_at = Some(event.timestamp);
            }
            EventPayload::PostSent(data) => {
                if let Some(author) = self.id.clone() {
                    self.wall
                        .push(Post::new(author, data.text.clone(), event.timestamp));
                }
            }
            EventPayload::PostReceived(data) => {
                self.timeline.push(Post::new(
                    data.author.clone(),
                    data.text.clone(),
                    event.timestamp,
                ));
            }
            EventPayload::FollowingStarted(data) => {
                if !self.followed.contains(&data.followed) {
                    self.followed.push(data.followed.clone());
                }
            }
            EventPayload::FollowingEnded(data) => {
                self.followed.retain(|id| id != &data.followed);
            }
            EventPayload::FollowerAdded(data) => {
                if !self.followers.contains(&data.follower) {
                    self.followers.push(data.follower.clone());
                }
            }
            EventPayload::FollowerRemoved(data) => {
                self.followers.retain(|id| id != &data.follower);
            }
            // Post-stream events never reach a user stream
            EventPayload::PostCreated(_) => {}
        }
        self.version += 1;
    }
}

// Query methods
impl User {
    /// Returns the user ID, if created.
    pub fn user_id(&self) -> Option<&UserId> {
        self.id.as_ref()
    }

    /// Returns when the user was created.
    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        self.created_at
    }

    /// Returns true if the user has been created.
    pub fn is_created(&self) -> bool {
        self.id.is_some()
    }

    /// Returns the users this user follows, in follow order.
    pub fn followed(&self) -> &[UserId] {
        &self.followed
    }

    /// Returns this user's followers, in follow order.
    pub fn followers(&self) -> &[UserId] {
        &self.followers
    }

    /// Returns true if this user follows `other`.
    pub fn follows(&self, other: &UserId) -> bool {
        self.followed.contains(other)
    }

    /// Returns true if `other` follows this user.
    pub fn is_followed_by(&self, other: &UserId) -> bool {
        self.followers.contains(other)
    }

    /// Returns the posts this user sent, oldest first.
    pub fn wall(&self) -> &[Post] {
        &self.wall
    }

    /// Returns the posts this user received, oldest first.
    pub fn timeline(&self) -> &[Post] {
        &self.timeline
    }
}

// Command methods (return events)
impl User {
    fn require_id(&self) -> Result<&UserId, UserError> {
        self.id.as_ref().ok_or(UserError::NotCreated)
    }

    /// Creates the user. A no-op if it already exists.
    pub fn create(&self, user_id: &UserId) -> Result<Vec<SocialEvent>, UserError> {
        if self.is_created() {
            return Ok(vec![]);
        }
        Ok(vec![SocialEvent::user_created(user_id)])
    }

    /// Sends a post to this user's wall.
    pub fn post(&self, text: &PostText) -> Result<Vec<SocialEvent>, UserError> {
        let id = self.require_id()?;
        Ok(vec![SocialEvent::post_sent(id, text.as_str())])
    }

    /// Delivers someone else's post to this user's timeline.
    pub fn receive(&self, post: &Post) -> Result<Vec<SocialEvent>, UserError> {
        let id = self.require_id()?;
        Ok(vec![SocialEvent::post_received(
            id,
            post.author.clone(),
            post.text.clone(),
        )])
    }

    /// Starts following `other`. A no-op if already following.
    pub fn follow(&self, other: &UserId) -> Result<Vec<SocialEvent>, UserError> {
        let id = self.require_id()?;
        if self.follows(other) {
            return Ok(vec![]);
        }
        Ok(vec![SocialEvent::following_started(id, other.clone())])
    }

    /// Stops following `other`. A no-op if not following.
    pub fn unfollow(&self, other: &UserId) -> Result<Vec<SocialEvent>, UserError> {
        let id = self.require_id()?;
        if !self.follows(other) {
            return Ok(vec![]);
        }
        Ok(vec![SocialEvent::following_ended(id, other.clone())])
    }

    /// Records `follower` as a follower. A no-op if already recorded.
    pub fn add_follower(&self, follower: &UserId) -> Result<Vec<SocialEvent>, UserError> {
        let id = self.require_id()?;
        if self.is_followed_by(follower) {
            return Ok(vec![]);
        }
        Ok(vec![SocialEvent::follower_added(id, follower.clone())])
    }

    /// Removes `follower` from the followers. A no-op if not a follower.
    pub fn remove_follower(&self, follower: &UserId) -> Result<Vec<SocialEvent>, UserError> {
        let id = self.require_id()?;
        if !self.is_followed_by(follower) {
            return Ok(vec![]);
        }
        Ok(vec![SocialEvent::follower_removed(id, follower.clone())])
    }
}

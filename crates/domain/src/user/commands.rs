//! User commands.

use common::{AggregateId, UserId};

use crate::command::Command;

use super::User;

/// Command to create a new user.
#[derive(Debug, Clone)]
pub struct CreateUser {
    /// The user to create.
    pub user_id: UserId,
}

impl CreateUser {
    /// Creates a new CreateUser command.
    pub fn new(user_id: impl Into<UserId>) -> Self {
        Self {
            user_id: user_id.into(),
        }
    }
}

impl Command for CreateUser {
    type Aggregate = User;

    fn aggregate_id(&self) -> AggregateId {
        AggregateId::user(&self.user_id)
    }
}

/// Command to publish a post on the author's wall.
#[derive(Debug, Clone)]
pub struct SendPost {
    /// Who is posting.
    pub author: UserId,

    /// The raw post text, validated when the command runs.
    pub text: String,
}

impl SendPost {
    /// Creates a new SendPost command.
    pub fn new(author: impl Into<UserId>, text: impl Into<String>) -> Self {
        Self {
            author: author.into(),
            text: text.into(),
        }
    }
}

impl Command for SendPost {
    type Aggregate = User;

    fn aggregate_id(&self) -> AggregateId {
        AggregateId::user(&self.author)
    }
}

/// Command to start following another user.
#[derive(Debug, Clone)]
pub struct Follow {
    /// The user who starts following.
    pub follower: UserId,

    /// The user being followed.
    pub followed: UserId,
}

impl Follow {
    /// Creates a new Follow command.
    pub fn new(follower: impl Into<UserId>, followed: impl Into<UserId>) -> Self {
        Self {
            follower: follower.into(),
            followed: followed.into(),
        }
    }
}

impl Command for Follow {
    type Aggregate = User;

    fn aggregate_id(&self) -> AggregateId {
        AggregateId::user(&self.follower)
    }
}

/// Command to stop following another user.
#[derive(Debug, Clone)]
pub struct Unfollow {
    /// The user who stops following.
    pub follower: UserId,

    /// The user no longer followed.
    pub followed: UserId,
}

impl Unfollow {
    /// Creates a new Unfollow command.
    pub fn new(follower: impl Into<UserId>, followed: impl Into<UserId>) -> Self {
        Self {
            follower: follower.into(),
            followed: followed.into(),
        }
    }
}

impl Command for Unfollow {
    type Aggregate = User;

    fn aggregate_id(&self) -> AggregateId {
        AggregateId::user(&self.follower)
    }
}

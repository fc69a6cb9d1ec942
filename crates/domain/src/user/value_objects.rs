//! Value objects for the user domain.

use chrono::{DateTime, Utc};
use common::UserId;
use serde::{Deserialize, Serialize};

use super::UserError;

/// Maximum number of characters in a post.
pub const MAX_POST_LENGTH: usize = 140;

/// A post as seen on a wall or a timeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    /// Who wrote the post.
    pub author: UserId,

    /// The post text.
    pub text: String,

    /// When the post was sent.
    pub timestamp: DateTime<Utc>,
}

impl Post {
    /// Creates a new post.
    pub fn new(author: UserId, text: impl Into<String>, timestamp: DateTime<Utc>) -> Self {
        Self {
            author,
            text: text.into(),
            timestamp,
        }
    }
}

/// Post text that has passed validation.
///
/// Length is measured in characters, not bytes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct PostText(String);

impl PostText {
    /// Validates and wraps a post text.
    pub fn parse(text: impl Into<String>) -> Result<Self, UserError> {
        let text = text.into();
        let length = text.chars().count();
        if length > MAX_POST_LENGTH {
            return Err(UserError::TextTooLong {
                length,
                max: MAX_POST_LENGTH,
            });
        }
        Ok(Self(text))
    }

    /// Returns the text as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the number of characters.
    pub fn len(&self) -> usize {
        self.0.chars().count()
    }

    /// Returns true if the text is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl std::fmt::Display for PostText {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for PostText {
    type Error = UserError;

    fn try_from(text: String) -> Result<Self, Self::Error> {
        Self::parse(text)
    }
}

impl TryFrom<&str> for PostText {
    type Error = UserError;

    fn try_from(text: &str) -> Result<Self, Self::Error> {
        Self::parse(text)
    }
}

impl From<PostText> for String {
    fn from(text: PostText) -> Self {
        text.0
    }
}

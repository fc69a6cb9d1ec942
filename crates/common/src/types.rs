use serde::{Deserialize, Serialize};

/// Natural identity of a user: its name.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    /// Creates a user ID from a name.
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Returns the user name.
    pub fn name(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for UserId {
    fn from(name: &str) -> Self {
        Self(name.to_string())
    }
}

impl From<String> for UserId {
    fn from(name: String) -> Self {
        Self(name)
    }
}

/// Identity of a post, handed out in increasing order.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct PostId(u64);

impl PostId {
    /// Creates a post ID from a raw value.
    pub fn new(value: u64) -> Self {
        Self(value)
    }

    /// Returns the raw value.
    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for PostId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for PostId {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

/// The kind of aggregate an event belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AggregateCategory {
    User,
    Post,
}

impl AggregateCategory {
    /// Returns the category name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            AggregateCategory::User => "USER",
            AggregateCategory::Post => "POST",
        }
    }
}

impl std::fmt::Display for AggregateCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Key of an aggregate within its category.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AggregateKey {
    /// A user name.
    Name(String),
    /// A post sequence number.
    Sequence(u64),
}

impl std::fmt::Display for AggregateKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AggregateKey::Name(name) => write!(f, "{name}"),
            AggregateKey::Sequence(seq) => write!(f, "{seq}"),
        }
    }
}

/// Unique identifier for an aggregate instance.
///
/// Two events belong to the same aggregate iff their IDs compare equal,
/// so a user called "7" and post 7 never collide.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AggregateId {
    category: AggregateCategory,
    key: AggregateKey,
}

impl AggregateId {
    /// Creates the aggregate ID of a user.
    pub fn user(id: &UserId) -> Self {
        Self {
            category: AggregateCategory::User,
            key: AggregateKey::Name(id.name().to_string()),
        }
    }

    /// Creates the aggregate ID of a post.
    pub fn post(id: PostId) -> Self {
        Self {
            category: AggregateCategory::Post,
            key: AggregateKey::Sequence(id.as_u64()),
        }
    }

    /// Returns the category.
    pub fn category(&self) -> AggregateCategory {
        self.category
    }

    /// Returns the key within the category.
    pub fn key(&self) -> &AggregateKey {
        &self.key
    }

    /// Returns the user ID if this identifies a user.
    pub fn as_user(&self) -> Option<UserId> {
        match (&self.category, &self.key) {
            (AggregateCategory::User, AggregateKey::Name(name)) => Some(UserId::new(name.clone())),
            _ => None,
        }
    }

    /// Returns the post ID if this identifies a post.
    pub fn as_post(&self) -> Option<PostId> {
        match (&self.category, &self.key) {
            (AggregateCategory::Post, AggregateKey::Sequence(seq)) => Some(PostId::new(*seq)),
            _ => None,
        }
    }
}

impl std::fmt::Display for AggregateId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.category, self.key)
    }
}

impl From<&UserId> for AggregateId {
    fn from(id: &UserId) -> Self {
        Self::user(id)
    }
}

impl From<PostId> for AggregateId {
    fn from(id: PostId) -> Self {
        Self::post(id)
    }
}

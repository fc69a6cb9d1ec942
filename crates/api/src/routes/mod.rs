//! HTTP route handlers.

pub mod health;
pub mod metrics;
pub mod posts;
pub mod users;

use chrono::{DateTime, Utc};
use domain::Post;
use serde::Serialize;

/// A post as rendered on walls, timelines and the global feed.
#[derive(Debug, Serialize)]
pub struct PostResponse {
    pub author: String,
    pub text: String,
    pub timestamp: DateTime<Utc>,
}

impl From<&Post> for PostResponse {
    fn from(post: &Post) -> Self {
        Self {
            author: post.author.name().to_string(),
            text: post.text.clone(),
            timestamp: post.timestamp,
        }
    }
}

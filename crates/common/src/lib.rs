//! Identity types shared by every crate of the social feed.

mod types;

pub use types::{AggregateCategory, AggregateId, AggregateKey, PostId, UserId};

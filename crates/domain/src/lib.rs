//! Domain layer for the social feed.
//!
//! This crate provides the core domain abstractions including:
//! - Aggregate trait for event-sourced entities
//! - The closed catalog of social events
//! - Command trait and CommandHandler for command processing
//! - User aggregate with its commands and value objects
//! - FeedService orchestrating post fan-out and follow relationships

pub mod aggregate;
pub mod command;
pub mod error;
pub mod events;
pub mod service;
pub mod user;

pub use aggregate::Aggregate;
pub use command::{Command, CommandHandler, CommandResult};
pub use error::DomainError;
pub use events::{
    EventPayload, FollowerData, FollowingData, PostCreatedData, PostReceivedData, PostSentData,
    SocialEvent,
};
pub use service::FeedService;
pub use user::{
    CreateUser, Follow, MAX_POST_LENGTH, Post, PostText, SendPost, Unfollow, User, UserError,
};

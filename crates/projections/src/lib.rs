//! Read models and projections for the social feed's query side.
//!
//! This crate provides the query side of the CQRS pattern:
//! - [`Projection`] trait and the [`fold`] primitive every read model uses
//! - [`ProjectionEngine`] for folding snapshots of the event store
//! - Four read model views: wall, timeline, user directory, post feed
//! - [`FeedQueries`] answering the feed's queries

pub mod engine;
pub mod error;
pub mod projection;
pub mod queries;
pub mod views;

pub use engine::ProjectionEngine;
pub use error::{ProjectionError, Result};
pub use projection::{Projection, fold};
pub use queries::FeedQueries;
pub use views::{
    FeedPost, PostFeed, PostFeedView, TimelineView, UserDirectory, UserDirectoryEntryView,
    UserSummary, WallView,
};

//! Read-model views for the query side.

pub mod post_feed;
pub mod timeline;
pub mod user_directory;
pub mod wall;

pub use post_feed::{FeedPost, PostFeed, PostFeedView};
pub use timeline::TimelineView;
pub use user_directory::{UserDirectory, UserDirectoryEntryView, UserSummary};
pub use wall::WallView;

//! User aggregate and related types.

mod aggregate;
mod commands;
mod value_objects;

pub use aggregate::User;
pub use commands::*;
pub use value_objects::{MAX_POST_LENGTH, Post, PostText};

use thiserror::Error;

/// Errors that can occur during user operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum UserError {
    /// The command needs a user that has not been created.
    #[error("User has not been created")]
    NotCreated,

    /// Post text exceeds the allowed length.
    #[error("Text too long: {length} characters (maximum is {max})")]
    TextTooLong { length: usize, max: usize },
}

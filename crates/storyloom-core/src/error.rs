//! Domain error types.

use std::time::Duration;

use thiserror::Error;

/// Top-level error type for every story session operation.
#[derive(Debug, Error)]
pub enum StoryError {
    /// A generation call did not return within its deadline.
    #[error("generation timed out after {}ms", deadline.as_millis())]
    Timeout {
        /// The deadline that was exceeded.
        deadline: Duration,
    },

    /// The generation backend failed internally.
    #[error("generation failed: {0}")]
    Generation(String),

    /// Revert or retry was requested with no turns in the history.
    #[error("no turns to undo")]
    EmptyHistory,

    /// An operation was attempted before any story was started.
    #[error("no story has been started")]
    UninitializedSession,

    /// The story data collaborator is missing or malformed.
    #[error("story data error: {0}")]
    StoryData(String),

    /// An infrastructure error (poisoned lock, failed task join).
    #[error("infrastructure error: {0}")]
    Infrastructure(String),
}

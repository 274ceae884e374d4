//! Error types for the story engine.

use thiserror::Error;

/// Result type for story operations.
pub type StoryResult<T> = Result<T, StoryError>;

/// Errors that can occur outside of regular gameplay.
///
/// Wrong choices and wrong answers are gameplay outcomes and never surface
/// here.
#[derive(Debug, Error)]
pub enum StoryError {
    /// A location id that names no known location.
    #[error("unknown location: {0}")]
    UnknownLocation(String),

    /// A puzzle kind that names no known puzzle.
    #[error("unknown puzzle: {0}")]
    UnknownPuzzle(String),

    /// Progress could not be encoded or decoded.
    #[error("progress snapshot error: {0}")]
    Snapshot(#[from] serde_json::Error),
}

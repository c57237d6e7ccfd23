//! Domain error types.

use thiserror::Error;

/// Top-level domain error type.
#[derive(Debug, Error)]
pub enum DomainError {
    /// The requested episode identifier is not in the known set.
    #[error("episode not found: {0}")]
    EpisodeNotFound(String),

    /// The requested stage identifier is not in the registry.
    #[error("stage not found: {0}")]
    StageNotFound(String),

    /// An authored episode contains a unit the engine cannot accept.
    #[error("malformed unit in episode {episode_id}: {reason}")]
    MalformedUnit {
        /// The episode whose document is defective.
        episode_id: String,
        /// What is wrong with it.
        reason: String,
    },

    /// A request referenced something that does not fit the current state.
    #[error("validation error: {0}")]
    Validation(String),

    /// A storage, I/O, or runtime failure.
    #[error("infrastructure error: {0}")]
    Infrastructure(String),
}

//! Error types for the Farol knowledge engine.

use thiserror::Error;

use crate::models::SuggestionStatus;

/// Result type alias using farol's Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for farol operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Article not found
    #[error("Article not found: {0}")]
    ArticleNotFound(uuid::Uuid),

    /// Suggestion not found
    #[error("Suggestion not found: {0}")]
    SuggestionNotFound(uuid::Uuid),

    /// Lifecycle operation attempted on a suggestion outside `pending`
    #[error("Invalid state transition: cannot {action} a {status} suggestion")]
    InvalidStateTransition {
        /// Status the suggestion was in when the operation was attempted.
        status: SuggestionStatus,
        /// The attempted operation ("approve", "reject", "merge").
        action: &'static str,
    },

    /// Multiple candidates tied at the top score when exactly one was required
    #[error("Ambiguous match for '{query}': {candidates} candidates tied")]
    AmbiguousMatch {
        /// The free-text mention being resolved.
        query: String,
        /// How many candidates tied at the top score.
        candidates: usize,
    },

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Store-level failure reported by a repository implementation
    #[error("Store error: {0}")]
    Store(String),
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Serialization(e.to_string())
    }
}

//! Error types for notecards-core.

use thiserror::Error;

/// Result type alias using the core Error.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced by the core subsystems.
///
/// Extraction never fails: empty or unstructured notes produce an empty
/// card list, not an error.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum Error {
    #[error("invalid difficulty: {0:?} (expected easy, medium or hard)")]
    InvalidDifficulty(String),

    #[error("malformed input: {0}")]
    MalformedInput(String),

    #[error("remote generation failed: {0}")]
    RemoteGenerationFailure(String),
}

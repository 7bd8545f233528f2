//! Error types for the experience store.
//!
//! None of these are fatal. Validation and parse errors are reported
//! before any state changes; persistence errors are reported after the
//! in-memory change has already taken effect; a corrupt persisted state is
//! downgraded to a [`CorruptStateWarning`] and the store starts empty.

use std::path::PathBuf;

/// An `append` was rejected before touching the store.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// The food field was empty or whitespace.
    #[error("food must not be empty")]
    EmptyFood,

    /// The rating was not one of `liked`, `neutral`, `disliked`.
    #[error("unrecognized rating {0:?}, expected liked, neutral or disliked")]
    UnknownRating(String),
}

/// Experience text could not be decoded. No store was produced.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("could not read experience data: {reason}")]
pub struct ParseError {
    /// Human-readable description of what was wrong.
    pub reason: String,
}

impl ParseError {
    /// Create a parse error with the given reason.
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

/// Experience data could not be serialized.
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    /// `serde_json` rejected the value.
    #[error("serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// The persistence sink could not be read or written.
#[derive(Debug, thiserror::Error)]
pub enum PersistenceError {
    /// A filesystem operation failed.
    #[error("I/O error on {path}: {source}")]
    Io {
        /// The file involved.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// The store could not be encoded for writing.
    #[error("encode error: {0}")]
    Encode(#[from] CodecError),

    /// The sink refused the operation (in-memory sink failure or poisoning).
    #[error("sink unavailable: {0}")]
    Unavailable(String),
}

/// Persisted state existed but could not be used; the store started empty.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("persisted experiences were unreadable and have been ignored: {reason}")]
pub struct CorruptStateWarning {
    /// Why the persisted state was rejected.
    pub reason: String,
}

// ── Yomikata Atoms: Error Types ────────────────────────────────────────────
// Single canonical error enum for the engine, built with `thiserror`.
//
// Design rules:
//   • Variants are coarse-grained by domain (I/O, DB, segmenter, analysis…).
//   • The `#[from]` attribute wires std/external error conversions automatically.
//   • Transactional store operations roll back before an error propagates;
//     the error itself is re-raised unchanged, never wrapped or swallowed.
//   • "Nothing to analyze" (`NoTokens`) is distinct from "system broken" so
//     callers can branch on it.

use thiserror::Error;

// ── Primary error enum ─────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum EngineError {
    /// Filesystem or OS-level I/O failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization / deserialization failure.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// SQLite / rusqlite database failure.
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Import payload failed validation before any transaction opened.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Morpheme segmenter build or run failure. Surfaced to every pending
    /// and future caller until a retry succeeds.
    #[error("Segmenter error: {0}")]
    Segmenter(String),

    /// Analysis produced no content tokens for the given input.
    #[error("No tokens found in input")]
    NoTokens,

    /// A referenced row (example, dictionary, …) does not exist.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Analysis was cancelled through an abort flag.
    #[error("Analysis aborted")]
    Aborted,
}

// ── Convenience constructors ───────────────────────────────────────────────

impl EngineError {
    /// Create a validation error from any displayable message.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Create a segmenter error from any displayable message.
    pub fn segmenter(message: impl Into<String>) -> Self {
        Self::Segmenter(message.into())
    }

    /// Create a not-found error naming the missing row.
    pub fn not_found(what: impl Into<String>) -> Self {
        Self::NotFound(what.into())
    }
}

// ── Convenience alias ──────────────────────────────────────────────────────

/// All engine operations should return this type.
pub type EngineResult<T> = Result<T, EngineError>;

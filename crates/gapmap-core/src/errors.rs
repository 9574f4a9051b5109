//! Error types for sequence loading, map building, and scoring.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for gapmap operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while loading primes, building maps, or scoring.
#[derive(Debug, Error)]
pub enum Error {
    /// Prime input file does not exist.
    #[error("prime input file not found: {path}")]
    MissingInput { path: PathBuf },

    /// The loaded sequence is too short for the requested scan window.
    /// Checked before any accumulation so a partial map is never produced.
    #[error("prime sequence too short: scan needs {required} primes, have {available}")]
    InsufficientData { required: usize, available: usize },

    /// A line in the input file is not a base-10 integer.
    #[error("invalid prime file line {line}: {content:?}")]
    ParseLine { line: usize, content: String },

    /// The input sequence is not strictly increasing.
    #[error("prime sequence not strictly increasing at line {line}: {value} follows {previous}")]
    NotIncreasing { line: usize, value: u64, previous: u64 },

    /// A persisted bucket key could not be parsed back into a typed key.
    #[error("invalid bucket key {key:?}: {reason}")]
    InvalidKey { key: String, reason: String },

    /// A persisted map artifact is structurally unusable.
    #[error("bad frequency map artifact: {reason}")]
    BadArtifact { reason: String },

    /// A score was requested before any backing map was loaded.
    #[error("score requested before any frequency map was loaded")]
    EngineNotLoaded,

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

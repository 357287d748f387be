use thiserror::Error;

/// Errors produced by the store layer.
///
/// Absence is never an error here: lookups return `Option` and deletes
/// return a `bool`. The variants below cover persistence failures and
/// invariants enforced at creation time.
#[derive(Error, Debug)]
pub enum StoreError {
    /// A table could not be serialized for writing.
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    /// Failed to determine a platform data directory.
    #[error("Could not determine application data directory")]
    NoDataDir,

    /// Generic I/O error (e.g. writing a table file).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Another account already uses this email (compared case-insensitively).
    #[error("An account already exists for {0}")]
    EmailTaken(String),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, StoreError>;

//! Error types for the favorites cache.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur during cache operations.
///
/// Every variant is fatal to a run; callers never retry them.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Failed to open or create the database file.
    #[error("Failed to open cache at {path}: {source}")]
    Open {
        path: PathBuf,
        source: rusqlite::Error,
    },

    /// Failed to create the directory holding the database file.
    #[error("Failed to create cache directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Failed to create or upgrade the schema.
    #[error("Cache migration failed: {0}")]
    Migration(#[from] rusqlite::Error),

    /// A query failed.
    #[error("Cache query failed: {0}")]
    Query(String),

    /// Failed to spawn a blocking task.
    #[error("Failed to spawn blocking task: {0}")]
    Spawn(#[from] tokio::task::JoinError),

    /// The schema version is newer than this build understands.
    #[error("Cache schema version {found} is newer than supported version {expected}")]
    UnsupportedSchemaVersion { found: i32, expected: i32 },
}

impl StoreError {
    /// Create a Query error from a rusqlite error.
    pub fn query(source: rusqlite::Error) -> Self {
        Self::Query(source.to_string())
    }
}

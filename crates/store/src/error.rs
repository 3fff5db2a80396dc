// crates/store/src/error.rs
//! Error types for the file-backed store

use std::path::PathBuf;
use thiserror::Error;

/// Result type for store file operations
pub type StoreFileResult<T> = Result<T, StoreFileError>;

/// Errors that can occur opening or persisting the task file
#[derive(Debug, Error)]
pub enum StoreFileError {
    /// Failed to read the task file
    #[error("Failed to read task store at {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse the task file
    #[error("Failed to parse task store at {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Failed to write the task file
    #[error("Failed to write task store at {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to serialize the task records
    #[error("Failed to serialize task store: {0}")]
    Serialize(#[from] serde_json::Error),

    /// A record carries a timestamp outside the representable range
    #[error("Record {app_id} has unrepresentable {field} timestamp {value}")]
    BadTimestamp {
        app_id: String,
        field: &'static str,
        value: i64,
    },
}

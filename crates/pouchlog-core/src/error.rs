//! Core error types for pouchlog-core.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for pouchlog-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Durable store read/write failure
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Settings load/save failure
    #[error("Settings error: {0}")]
    Settings(#[from] SettingsError),

    /// Shared-store (widget bridge) failure
    #[error("Bridge error: {0}")]
    Bridge(#[from] BridgeError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Event-store specific errors.
#[derive(Error, Debug)]
pub enum StorageError {
    /// Failed to open the database file
    #[error("Failed to open database at {path}: {source}")]
    OpenFailed {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    /// Query execution failed
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// Schema migration failed
    #[error("Database migration failed: {0}")]
    MigrationFailed(String),

    /// A stored row could not be decoded (bad uuid or timestamp)
    #[error("Corrupt row {id}: {message}")]
    CorruptRow { id: String, message: String },
}

/// Settings (TOML config) errors.
#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("Failed to load settings from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    #[error("Failed to save settings to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    #[error("Failed to parse settings: {0}")]
    ParseFailed(String),
}

/// Shared cross-process store errors.
#[derive(Error, Debug)]
pub enum BridgeError {
    #[error("Failed to read shared store at {path}: {message}")]
    ReadFailed { path: PathBuf, message: String },

    #[error("Failed to write shared store at {path}: {message}")]
    WriteFailed { path: PathBuf, message: String },
}

/// A pending-log queue entry missing or mis-typing a required field.
///
/// Recovered locally during the merge: the entry is skipped and processing
/// continues. This never propagates out of `Tracker::merge_pending`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Malformed pending log: field '{field}' {reason}")]
pub struct MalformedEntry {
    pub field: &'static str,
    pub reason: &'static str,
}

impl From<rusqlite::Error> for StorageError {
    fn from(err: rusqlite::Error) -> Self {
        StorageError::QueryFailed(err.to_string())
    }
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;

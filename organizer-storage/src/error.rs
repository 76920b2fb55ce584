//! Error types for the storage layer.

use thiserror::Error;

/// Errors that escape the storage layer.
///
/// Repositories swallow these (logging them) and report booleans; they only
/// reach callers from opening the database and from the settings store.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type StorageResult<T> = Result<T, StorageError>;

/// True when the error is SQLite reporting a table that does not exist yet,
/// i.e. the migration that creates it has not been applied.
pub(crate) fn is_missing_table(err: &rusqlite::Error) -> bool {
    match err {
        rusqlite::Error::SqliteFailure(_, Some(msg)) => msg.contains("no such table"),
        _ => false,
    }
}

//! Bootstrap error types.

use thiserror::Error;

pub type OrganizerResult<T> = Result<T, OrganizerError>;

#[derive(Debug, Error)]
pub enum OrganizerError {
    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("container directory unavailable: {0}")]
    Container(String),

    #[error("storage error: {0}")]
    Storage(#[from] organizer_storage::StorageError),
}

/// Storage-specific errors
use thiserror::Error;

/// Result type alias using `StorageError`
pub type Result<T> = std::result::Result<T, StorageError>;

/// Storage error types
#[derive(Error, Debug)]
pub enum StorageError {
    /// Database error from redb
    #[error(transparent)]
    Database(#[from] redb::Error),

    /// I/O error
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<StorageError> for cadence_core::CadenceError {
    fn from(err: StorageError) -> Self {
        cadence_core::CadenceError::storage(err.to_string())
    }
}

//! Storage error types

use thiserror::Error;

/// Errors reported by a storage backend.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The backend reported a transaction, table or integrity fault
    #[error("backend error: {0}")]
    Backend(String),

    /// File system error while preparing or accessing the database
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for storage operations.
pub type StorageResult<T> = std::result::Result<T, StorageError>;

impl From<StorageError> for recordstore_core::Error {
    fn from(e: StorageError) -> Self {
        match e {
            StorageError::Backend(msg) => recordstore_core::Error::Engine(msg),
            StorageError::Io(io) => recordstore_core::Error::Engine(io.to_string()),
        }
    }
}

macro_rules! backend_error {
    ($($source:ty),* $(,)?) => {
        $(
            impl From<$source> for StorageError {
                fn from(e: $source) -> Self {
                    StorageError::Backend(e.to_string())
                }
            }
        )*
    };
}

backend_error!(
    redb::Error,
    redb::DatabaseError,
    redb::TransactionError,
    redb::TableError,
    redb::StorageError,
    redb::CommitError,
);

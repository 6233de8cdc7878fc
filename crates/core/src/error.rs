//! Error types for record store operations
//!
//! Every public operation returns [`Result`]. Subsystem errors (storage
//! backend faults, codec failures) are converted into this enum at the crate
//! boundary that produces them, so callers only ever match on one type.
//!
//! ## Absence
//!
//! Table and key absence are reported as [`Error::TableNotFound`] and
//! [`Error::KeyNotFound`] only by the read, scan and update paths. Delete
//! treats the same conditions as success and never produces these variants.

use thiserror::Error;

/// All record store errors.
#[derive(Debug, Error)]
pub enum Error {
    /// A read, scan or update addressed a table that does not exist
    #[error("table not found: {table}")]
    TableNotFound {
        /// Name of the missing table
        table: String,
    },

    /// A read or update addressed a key absent from an existing table
    #[error("key not found: {table}.{key}")]
    KeyNotFound {
        /// Table that was searched
        table: String,
        /// Key that was not present
        key: String,
    },

    /// Row bytes could not be decoded, or a field map could not be encoded
    #[error("codec error: {0}")]
    Codec(String),

    /// The storage engine reported an I/O, transaction or integrity fault
    #[error("engine error: {0}")]
    Engine(String),

    /// The caller's context was cancelled before the operation completed
    #[error("operation cancelled")]
    Cancelled,

    /// The caller supplied arguments that cannot be applied
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// I/O error outside the engine (data directory preparation)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for record store operations.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Build a [`Error::TableNotFound`] for `table`.
    pub fn table_not_found(table: impl Into<String>) -> Self {
        Error::TableNotFound {
            table: table.into(),
        }
    }

    /// Build a [`Error::KeyNotFound`] for `table.key`.
    pub fn key_not_found(table: impl Into<String>, key: impl Into<String>) -> Self {
        Error::KeyNotFound {
            table: table.into(),
            key: key.into(),
        }
    }

    /// Check if this is a table- or key-not-found error.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::TableNotFound { .. } | Error::KeyNotFound { .. })
    }

    /// Check if this is a table-not-found error.
    pub fn is_table_not_found(&self) -> bool {
        matches!(self, Error::TableNotFound { .. })
    }

    /// Check if this is a key-not-found error.
    pub fn is_key_not_found(&self) -> bool {
        matches!(self, Error::KeyNotFound { .. })
    }

    /// Check if this is a codec error.
    pub fn is_codec(&self) -> bool {
        matches!(self, Error::Codec(_))
    }

    /// Check if the operation was cancelled.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Error::Cancelled)
    }
}

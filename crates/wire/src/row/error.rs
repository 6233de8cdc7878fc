//! Codec error types

use thiserror::Error;

/// Errors raised while encoding or decoding a row.
#[derive(Debug, Error)]
pub enum CodecError {
    /// Row ended before a complete structure could be read
    #[error("row truncated: {0}")]
    Truncated(&'static str),

    /// Row carries a format version this codec does not understand
    #[error("unsupported row format version {0}")]
    UnsupportedVersion(u8),

    /// Stored checksum does not match the row contents
    #[error("row checksum mismatch: stored {stored:#010x}, computed {computed:#010x}")]
    ChecksumMismatch {
        /// Checksum found in the row trailer
        stored: u32,
        /// Checksum computed over the row payload
        computed: u32,
    },

    /// Bytes remain after the last declared field
    #[error("{0} trailing bytes after last field")]
    TrailingBytes(usize),

    /// Field name is not valid UTF-8
    #[error("field name is not valid UTF-8")]
    InvalidFieldName,

    /// Field names are not strictly ascending (duplicate or reordered)
    #[error("field {0:?} out of order or duplicated")]
    FieldOrder(String),

    /// Field name does not fit the length prefix
    #[error("field name of {0} bytes exceeds limit")]
    FieldNameTooLong(usize),

    /// Field value does not fit the length prefix
    #[error("value of field {name:?} is {len} bytes, exceeds limit")]
    ValueTooLong {
        /// Field whose value is too long
        name: String,
        /// Length of the value
        len: usize,
    },

    /// More fields than the count prefix can express
    #[error("{0} fields exceeds limit")]
    TooManyFields(usize),

    /// Rejection raised by a caller-supplied codec
    #[error("{0}")]
    Rejected(String),

    /// Writer failure while appending to the output buffer
    #[error("write error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<CodecError> for recordstore_core::Error {
    fn from(e: CodecError) -> Self {
        recordstore_core::Error::Codec(e.to_string())
    }
}

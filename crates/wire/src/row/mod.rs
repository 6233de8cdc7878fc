//! Row codec contract and the default binary codec

mod binary;
mod error;

pub use binary::{BinaryRowCodec, ROW_FORMAT_VERSION};
pub use error::CodecError;

use recordstore_core::FieldMap;

/// Converts between field maps and serialized rows.
///
/// Implementations must be usable from many threads at once; the store
/// shares one codec across every call.
pub trait RowCodec: Send + Sync {
    /// Append the encoding of `fields` to `buf`.
    ///
    /// On error `buf` is left as it was before the call.
    fn encode(&self, buf: &mut Vec<u8>, fields: &FieldMap) -> Result<(), CodecError>;

    /// Decode `row`, keeping only the named fields when a non-empty filter
    /// is given. Named fields absent from the row are omitted.
    fn decode(&self, row: &[u8], fields: Option<&[&str]>) -> Result<FieldMap, CodecError>;
}

//! Row encoding for the record store
//!
//! This crate implements the row codec contract: a [`FieldMap`] is encoded
//! into a byte row that the storage engine treats as opaque, and decoded back
//! with optional field projection.
//!
//! ## Examples
//!
//! ```
//! use recordstore_core::FieldMap;
//! use recordstore_wire::{BinaryRowCodec, RowCodec};
//!
//! let codec = BinaryRowCodec::new();
//! let mut fields = FieldMap::new();
//! fields.insert("field0".into(), b"value".to_vec());
//!
//! let mut row = Vec::new();
//! codec.encode(&mut row, &fields).unwrap();
//!
//! let decoded = codec.decode(&row, None).unwrap();
//! assert_eq!(decoded, fields);
//! ```
//!
//! [`FieldMap`]: recordstore_core::FieldMap

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod row;

pub use row::{BinaryRowCodec, CodecError, RowCodec, ROW_FORMAT_VERSION};

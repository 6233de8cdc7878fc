//! Storage layer for the record store
//!
//! This crate defines the contract the record store consumes from an
//! embedded, ordered, transactional key-value engine, and the backends that
//! implement it:
//! - [`KvEngine`]: read-only and read-write transaction entry points
//! - [`ReadTransaction`] / [`WriteTransaction`]: bucket lookup and commit
//! - [`Bucket`] / [`BucketMut`]: point reads, writes and deletes
//! - [`BucketCursor`]: ordered seek and forward iteration
//!
//! Backends:
//! - [`RedbEngine`]: persistent single-file B-tree store
//! - [`MemoryEngine`]: copy-on-write snapshots held in memory
//!
//! Absence is always `None` at this layer. Deciding whether a missing bucket
//! or key is an error belongs to the caller.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod backends;
pub mod cursor;
pub mod engine;
pub mod error;

pub use backends::{MemoryEngine, RedbEngine};
pub use cursor::PositionCursor;
pub use engine::{
    Bucket, BucketCursor, BucketMut, Entry, KvEngine, ReadTransaction, WriteTransaction,
};
pub use error::{StorageError, StorageResult};

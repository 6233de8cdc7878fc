//! Engine contract
//!
//! The record store never touches pages, logs or locks. It drives the engine
//! through these traits only.
//!
//! ## Transactions
//!
//! ```text
//! KvEngine::begin_read()  -> ReadTransaction   (concurrent, consistent snapshot)
//! KvEngine::begin_write() -> WriteTransaction  (exclusive among writers)
//!                              |- commit(self)    publish all writes
//!                              '- rollback(self)  discard all writes
//! ```
//!
//! Dropping a write transaction without committing discards its writes.
//!
//! ## Buckets
//!
//! A bucket is a named, ordered map of byte keys to byte rows. Bucket
//! handles borrow the transaction that produced them, so they cannot outlive
//! its commit or rollback.

use crate::error::StorageResult;

/// A key/value pair returned by a cursor.
pub type Entry = (Vec<u8>, Vec<u8>);

/// An embedded, ordered, transactional key-value engine.
pub trait KvEngine: Send + Sync {
    /// Read-only transaction type
    type ReadTxn<'e>: ReadTransaction
    where
        Self: 'e;

    /// Read-write transaction type
    type WriteTxn<'e>: WriteTransaction
    where
        Self: 'e;

    /// Open a read-only transaction over a consistent snapshot.
    fn begin_read(&self) -> StorageResult<Self::ReadTxn<'_>>;

    /// Open a read-write transaction.
    ///
    /// Blocks while another write transaction is in flight.
    fn begin_write(&self) -> StorageResult<Self::WriteTxn<'_>>;
}

/// Bucket access inside a read-only transaction.
pub trait ReadTransaction {
    /// Bucket handle type
    type Bucket<'t>: Bucket
    where
        Self: 't;

    /// Look up a bucket by name. Never creates it.
    fn bucket(&self, name: &str) -> StorageResult<Option<Self::Bucket<'_>>>;
}

/// Bucket access and completion of a read-write transaction.
pub trait WriteTransaction {
    /// Mutable bucket handle type
    type BucketMut<'t>: BucketMut
    where
        Self: 't;

    /// Look up a bucket by name. Never creates it.
    fn bucket_mut(&self, name: &str) -> StorageResult<Option<Self::BucketMut<'_>>>;

    /// Look up a bucket by name, creating it empty if absent.
    fn create_bucket_if_not_exists(&self, name: &str) -> StorageResult<Self::BucketMut<'_>>;

    /// Publish every write made in this transaction.
    fn commit(self) -> StorageResult<()>;

    /// Discard every write made in this transaction.
    fn rollback(self) -> StorageResult<()>;
}

/// Point and cursor reads over one bucket.
pub trait Bucket {
    /// Cursor type
    type Cursor<'b>: BucketCursor
    where
        Self: 'b;

    /// Fetch the row stored under `key`.
    fn get(&self, key: &[u8]) -> StorageResult<Option<Vec<u8>>>;

    /// Open an unpositioned cursor over the bucket.
    fn cursor(&self) -> StorageResult<Self::Cursor<'_>>;
}

/// Writes over one bucket.
pub trait BucketMut: Bucket {
    /// Store `value` under `key`, replacing any previous row.
    fn put(&mut self, key: &[u8], value: &[u8]) -> StorageResult<()>;

    /// Remove `key`. Removing an absent key is not an error.
    fn delete(&mut self, key: &[u8]) -> StorageResult<()>;
}

/// Ordered iteration over a bucket in ascending byte order of keys.
pub trait BucketCursor {
    /// Position at the first key `>= key` and return that entry.
    fn seek(&mut self, key: &[u8]) -> StorageResult<Option<Entry>>;

    /// Advance to the next entry.
    ///
    /// On an unpositioned cursor this returns the first entry of the bucket.
    /// Once the bucket is exhausted every further call returns `None`.
    fn next(&mut self) -> StorageResult<Option<Entry>>;
}

//! redb engine backend
//!
//! Buckets map one-to-one onto redb tables keyed and valued by raw bytes.
//! redb provides the transaction contract directly: one writer at a time,
//! readers on MVCC snapshots, and copy-on-write pages so an aborted write
//! transaction leaves no trace.
//!
//! A read transaction cannot create tables, and `open_table` on a write
//! transaction always creates, so `bucket_mut` consults the table list first.

use crate::cursor::{PositionCursor, SeekSource};
use crate::engine::{Bucket, BucketMut, Entry, KvEngine, ReadTransaction, WriteTransaction};
use crate::error::StorageResult;
use redb::{Database, ReadableTable, TableDefinition, TableError, TableHandle};
use std::ops::Bound;
use std::path::{Path, PathBuf};
use tracing::{debug, trace};

type RowKey = &'static [u8];
type RowValue = &'static [u8];

fn definition(name: &str) -> TableDefinition<'_, RowKey, RowValue> {
    TableDefinition::new(name)
}

/// Engine persisting buckets in a single redb database file.
pub struct RedbEngine {
    db: Database,
    path: PathBuf,
}

impl RedbEngine {
    /// Open the database file at `path`, creating it if it does not exist.
    pub fn open(path: impl AsRef<Path>) -> StorageResult<Self> {
        let path = path.as_ref().to_path_buf();
        let db = Database::create(&path)?;
        debug!(path = %path.display(), "opened redb database");
        Ok(Self { db, path })
    }

    /// Path of the database file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl KvEngine for RedbEngine {
    type ReadTxn<'e> = RedbReadTxn;
    type WriteTxn<'e> = RedbWriteTxn;

    fn begin_read(&self) -> StorageResult<RedbReadTxn> {
        Ok(RedbReadTxn {
            txn: self.db.begin_read()?,
        })
    }

    fn begin_write(&self) -> StorageResult<RedbWriteTxn> {
        Ok(RedbWriteTxn {
            txn: self.db.begin_write()?,
        })
    }
}

/// Read-only redb transaction.
pub struct RedbReadTxn {
    txn: redb::ReadTransaction,
}

impl ReadTransaction for RedbReadTxn {
    type Bucket<'t> = RedbBucket<redb::ReadOnlyTable<RowKey, RowValue>>;

    fn bucket(&self, name: &str) -> StorageResult<Option<Self::Bucket<'_>>> {
        match self.txn.open_table(definition(name)) {
            Ok(table) => Ok(Some(RedbBucket { table })),
            Err(TableError::TableDoesNotExist(_)) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}

/// Read-write redb transaction.
pub struct RedbWriteTxn {
    txn: redb::WriteTransaction,
}

impl RedbWriteTxn {
    fn has_table(&self, name: &str) -> StorageResult<bool> {
        Ok(self.txn.list_tables()?.any(|handle| handle.name() == name))
    }
}

impl WriteTransaction for RedbWriteTxn {
    type BucketMut<'t> = RedbBucket<redb::Table<'t, RowKey, RowValue>>;

    fn bucket_mut(&self, name: &str) -> StorageResult<Option<Self::BucketMut<'_>>> {
        if !self.has_table(name)? {
            return Ok(None);
        }
        let table = self.txn.open_table(definition(name))?;
        Ok(Some(RedbBucket { table }))
    }

    fn create_bucket_if_not_exists(&self, name: &str) -> StorageResult<Self::BucketMut<'_>> {
        trace!(bucket = name, "opening bucket for write");
        let table = self.txn.open_table(definition(name))?;
        Ok(RedbBucket { table })
    }

    fn commit(self) -> StorageResult<()> {
        self.txn.commit()?;
        Ok(())
    }

    fn rollback(self) -> StorageResult<()> {
        self.txn.abort()?;
        Ok(())
    }
}

/// Bucket backed by a redb table, read-only or writable.
pub struct RedbBucket<T> {
    table: T,
}

/// Seek source over a redb table.
pub struct RedbSource<'b, T> {
    table: &'b T,
}

impl<T: ReadableTable<RowKey, RowValue>> SeekSource for RedbSource<'_, T> {
    fn first_from(&self, lower: Bound<&[u8]>) -> StorageResult<Option<Entry>> {
        let mut range = self.table.range::<&[u8]>((lower, Bound::Unbounded))?;
        match range.next() {
            Some(item) => {
                let (key, value) = item?;
                Ok(Some((key.value().to_vec(), value.value().to_vec())))
            }
            None => Ok(None),
        }
    }
}

impl<T: ReadableTable<RowKey, RowValue>> Bucket for RedbBucket<T> {
    type Cursor<'b> = PositionCursor<RedbSource<'b, T>> where Self: 'b;

    fn get(&self, key: &[u8]) -> StorageResult<Option<Vec<u8>>> {
        Ok(self.table.get(key)?.map(|guard| guard.value().to_vec()))
    }

    fn cursor(&self) -> StorageResult<Self::Cursor<'_>> {
        Ok(PositionCursor::new(RedbSource { table: &self.table }))
    }
}

impl<'t> BucketMut for RedbBucket<redb::Table<'t, RowKey, RowValue>> {
    fn put(&mut self, key: &[u8], value: &[u8]) -> StorageResult<()> {
        self.table.insert(key, value)?;
        Ok(())
    }

    fn delete(&mut self, key: &[u8]) -> StorageResult<()> {
        self.table.remove(key)?;
        Ok(())
    }
}

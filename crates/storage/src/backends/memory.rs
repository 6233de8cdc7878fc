//! In-memory engine backend
//!
//! Committed state is an immutable snapshot behind an `Arc`. Readers clone
//! the `Arc` and never block. A writer holds the writer mutex for its whole
//! lifetime and records its puts and deletes in a per-bucket write set that
//! reads merge over the snapshot it started from. Commit applies the write
//! sets to the committed tables in place; a table is copied only while an
//! older reader still shares it. Rollback drops the write sets.
//!
//! # Thread Safety
//!
//! - Readers: lock-free after taking the snapshot
//! - Writers: serialized by `writer`
//! - A reader opened before a commit keeps seeing the pre-commit snapshot

use crate::cursor::{PositionCursor, SeekSource};
use crate::engine::{Bucket, BucketMut, Entry, KvEngine, ReadTransaction, WriteTransaction};
use crate::error::StorageResult;
use parking_lot::{Mutex, MutexGuard, RwLock};
use std::cell::RefCell;
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::ops::Bound;
use std::sync::Arc;
use tracing::trace;

type Table = BTreeMap<Vec<u8>, Vec<u8>>;
type Tables = BTreeMap<String, Arc<Table>>;

/// Pending writes to one bucket. `None` marks a delete of a committed key.
type WriteSet = BTreeMap<Vec<u8>, Option<Vec<u8>>>;

fn first_in(table: &Table, lower: Bound<&[u8]>) -> Option<Entry> {
    table
        .range::<[u8], _>((lower, Bound::Unbounded))
        .next()
        .map(|(k, v)| (k.clone(), v.clone()))
}

/// First live entry at or after `lower` with `writes` laid over `base`.
fn first_merged(base: Option<&Table>, writes: &WriteSet, lower: Bound<&[u8]>) -> Option<Entry> {
    enum Step {
        Base,
        Write,
        Shadowed,
    }

    let mut base = base
        .map(|table| table.range::<[u8], _>((lower, Bound::Unbounded)))
        .into_iter()
        .flatten()
        .peekable();
    let mut writes = writes
        .range::<[u8], _>((lower, Bound::Unbounded))
        .peekable();

    loop {
        let step = match (base.peek(), writes.peek()) {
            (None, None) => return None,
            (Some(_), None) => Step::Base,
            (None, Some(_)) => Step::Write,
            (Some((base_key, _)), Some((write_key, _))) => match base_key.cmp(write_key) {
                Ordering::Less => Step::Base,
                Ordering::Equal => Step::Shadowed,
                Ordering::Greater => Step::Write,
            },
        };

        match step {
            Step::Base => return base.next().map(|(k, v)| (k.clone(), v.clone())),
            Step::Shadowed => {
                base.next();
            }
            Step::Write => {}
        }
        if let Some((key, Some(value))) = writes.next() {
            return Some((key.clone(), value.clone()));
        }
    }
}

/// Engine that keeps every bucket in memory.
///
/// Data is lost when the engine is dropped.
pub struct MemoryEngine {
    committed: RwLock<Arc<Tables>>,
    writer: Mutex<()>,
}

impl MemoryEngine {
    /// Create an empty engine.
    pub fn new() -> Self {
        Self {
            committed: RwLock::new(Arc::new(Tables::new())),
            writer: Mutex::new(()),
        }
    }

    /// Number of buckets in the committed snapshot.
    pub fn bucket_count(&self) -> usize {
        self.committed.read().len()
    }
}

impl Default for MemoryEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl KvEngine for MemoryEngine {
    type ReadTxn<'e> = MemoryReadTxn;
    type WriteTxn<'e> = MemoryWriteTxn<'e>;

    fn begin_read(&self) -> StorageResult<MemoryReadTxn> {
        let snapshot = Arc::clone(&self.committed.read());
        Ok(MemoryReadTxn { snapshot })
    }

    fn begin_write(&self) -> StorageResult<MemoryWriteTxn<'_>> {
        let guard = self.writer.lock();
        let base = Arc::clone(&self.committed.read());
        Ok(MemoryWriteTxn {
            engine: self,
            base,
            pending: RefCell::new(BTreeMap::new()),
            _writer: guard,
        })
    }
}

/// Read-only transaction over a committed snapshot.
pub struct MemoryReadTxn {
    snapshot: Arc<Tables>,
}

impl ReadTransaction for MemoryReadTxn {
    type Bucket<'t> = SnapshotBucket<'t>;

    fn bucket(&self, name: &str) -> StorageResult<Option<SnapshotBucket<'_>>> {
        Ok(self
            .snapshot
            .get(name)
            .map(|table| SnapshotBucket { table: table.as_ref() }))
    }
}

/// Bucket view inside a read-only transaction.
pub struct SnapshotBucket<'t> {
    table: &'t Table,
}

/// Seek source over a snapshot bucket.
pub struct SnapshotSource<'b> {
    table: &'b Table,
}

impl SeekSource for SnapshotSource<'_> {
    fn first_from(&self, lower: Bound<&[u8]>) -> StorageResult<Option<Entry>> {
        Ok(first_in(self.table, lower))
    }
}

impl<'t> Bucket for SnapshotBucket<'t> {
    type Cursor<'b> = PositionCursor<SnapshotSource<'b>> where Self: 'b;

    fn get(&self, key: &[u8]) -> StorageResult<Option<Vec<u8>>> {
        Ok(self.table.get(key).cloned())
    }

    fn cursor(&self) -> StorageResult<Self::Cursor<'_>> {
        Ok(PositionCursor::new(SnapshotSource { table: self.table }))
    }
}

/// Read-write transaction holding the writer lock.
pub struct MemoryWriteTxn<'e> {
    engine: &'e MemoryEngine,
    base: Arc<Tables>,
    pending: RefCell<BTreeMap<String, WriteSet>>,
    _writer: MutexGuard<'e, ()>,
}

impl<'e> MemoryWriteTxn<'e> {
    fn handle(&self, name: &str) -> WorkingBucket<'_> {
        WorkingBucket {
            base: self.base.get(name).map(|table| table.as_ref()),
            pending: &self.pending,
            name: name.to_owned(),
        }
    }
}

impl<'e> WriteTransaction for MemoryWriteTxn<'e> {
    type BucketMut<'t> = WorkingBucket<'t> where Self: 't;

    fn bucket_mut(&self, name: &str) -> StorageResult<Option<WorkingBucket<'_>>> {
        if self.base.contains_key(name) || self.pending.borrow().contains_key(name) {
            Ok(Some(self.handle(name)))
        } else {
            Ok(None)
        }
    }

    fn create_bucket_if_not_exists(&self, name: &str) -> StorageResult<WorkingBucket<'_>> {
        if !self.base.contains_key(name) {
            self.pending
                .borrow_mut()
                .entry(name.to_owned())
                .or_insert_with(|| {
                    trace!(bucket = name, "creating bucket");
                    WriteSet::new()
                });
        }
        Ok(self.handle(name))
    }

    fn commit(self) -> StorageResult<()> {
        let MemoryWriteTxn {
            engine,
            base,
            pending,
            _writer,
        } = self;
        // Release our hold on the snapshot so unshared tables update in place
        drop(base);

        let mut committed = engine.committed.write();
        let tables = Arc::make_mut(&mut committed);
        for (name, writes) in pending.into_inner() {
            let table = tables.entry(name).or_insert_with(|| Arc::new(Table::new()));
            if writes.is_empty() {
                continue;
            }
            let table = Arc::make_mut(table);
            for (key, value) in writes {
                match value {
                    Some(value) => table.insert(key, value),
                    None => table.remove(&key),
                };
            }
        }
        Ok(())
    }

    fn rollback(self) -> StorageResult<()> {
        Ok(())
    }
}

/// Bucket handle inside a read-write transaction.
///
/// Reads see the transaction's own writes laid over the starting snapshot.
pub struct WorkingBucket<'t> {
    base: Option<&'t Table>,
    pending: &'t RefCell<BTreeMap<String, WriteSet>>,
    name: String,
}

/// Seek source over a bucket inside a read-write transaction.
pub struct WorkingSource<'b> {
    base: Option<&'b Table>,
    pending: &'b RefCell<BTreeMap<String, WriteSet>>,
    name: &'b str,
}

impl SeekSource for WorkingSource<'_> {
    fn first_from(&self, lower: Bound<&[u8]>) -> StorageResult<Option<Entry>> {
        let pending = self.pending.borrow();
        Ok(match pending.get(self.name) {
            Some(writes) => first_merged(self.base, writes, lower),
            None => self.base.and_then(|table| first_in(table, lower)),
        })
    }
}

impl<'t> Bucket for WorkingBucket<'t> {
    type Cursor<'b> = PositionCursor<WorkingSource<'b>> where Self: 'b;

    fn get(&self, key: &[u8]) -> StorageResult<Option<Vec<u8>>> {
        let pending = self.pending.borrow();
        if let Some(write) = pending.get(&self.name).and_then(|writes| writes.get(key)) {
            return Ok(write.clone());
        }
        Ok(self.base.and_then(|table| table.get(key).cloned()))
    }

    fn cursor(&self) -> StorageResult<Self::Cursor<'_>> {
        Ok(PositionCursor::new(WorkingSource {
            base: self.base,
            pending: self.pending,
            name: &self.name,
        }))
    }
}

impl<'t> BucketMut for WorkingBucket<'t> {
    fn put(&mut self, key: &[u8], value: &[u8]) -> StorageResult<()> {
        self.pending
            .borrow_mut()
            .entry(self.name.clone())
            .or_default()
            .insert(key.to_vec(), Some(value.to_vec()));
        Ok(())
    }

    fn delete(&mut self, key: &[u8]) -> StorageResult<()> {
        let committed = self.base.is_some_and(|table| table.contains_key(key));
        let mut pending = self.pending.borrow_mut();
        if committed {
            pending
                .entry(self.name.clone())
                .or_default()
                .insert(key.to_vec(), None);
        } else if let Some(writes) = pending.get_mut(&self.name) {
            writes.remove(key);
        }
        Ok(())
    }
}

//! Single-record operations.
//!
//! Each call runs in exactly one engine transaction. Reads and scans use a
//! read-only transaction; everything else uses a read-write transaction that
//! commits only if the whole call succeeds.

use crate::database::RecordStore;
use recordstore_core::{Context, FieldMap, Result};
use recordstore_engine::resolver;
use recordstore_storage::{Bucket, BucketCursor, BucketMut, KvEngine};
use recordstore_wire::RowCodec;
use tracing::trace;

/// Upper bound on the result capacity reserved up front by `scan`.
const SCAN_PREALLOC_LIMIT: usize = 1024;

impl<E: KvEngine, C: RowCodec> RecordStore<E, C> {
    // =========================================================================
    // Reads
    // =========================================================================

    /// Read one record.
    ///
    /// With a non-empty `fields` filter only those fields are returned;
    /// requested fields the record does not have are omitted.
    ///
    /// # Errors
    ///
    /// - `TableNotFound` if the table does not exist
    /// - `KeyNotFound` if the key does not exist in the table
    /// - `Codec` if the stored row cannot be decoded
    ///
    /// # Example
    ///
    /// ```
    /// use recordstore::prelude::*;
    ///
    /// let store = RecordStore::ephemeral();
    /// let cx = Context::background();
    /// let mut fields = FieldMap::new();
    /// fields.insert("field1".into(), b"a".to_vec());
    /// fields.insert("field2".into(), b"b".to_vec());
    /// store.insert(&cx, "t", "k1", &fields)?;
    ///
    /// let projected = store.read(&cx, "t", "k1", Some(&["field1"][..]))?;
    /// assert_eq!(projected.len(), 1);
    /// # Ok::<(), recordstore::Error>(())
    /// ```
    pub fn read(
        &self,
        cx: &Context,
        table: &str,
        key: &str,
        fields: Option<&[&str]>,
    ) -> Result<FieldMap> {
        trace!(table, key, "read");
        self.runner.read_only(cx, |txn| {
            let bucket = resolver::resolve(txn, table)?;
            self.fetch(&bucket, table, key, fields)
        })
    }

    /// Read up to `count` records in ascending key order, starting at the
    /// first key `>= start_key`.
    ///
    /// The result is truncated, never padded: fewer than `count` records
    /// are returned when the table runs out. `count == 0` returns an empty
    /// result without touching the table's contents.
    ///
    /// # Errors
    ///
    /// - `TableNotFound` if the table does not exist
    /// - `Codec` if any visited row cannot be decoded; no partial result is
    ///   returned
    /// - `Cancelled` if `cx` is cancelled between steps
    pub fn scan(
        &self,
        cx: &Context,
        table: &str,
        start_key: &str,
        count: usize,
        fields: Option<&[&str]>,
    ) -> Result<Vec<FieldMap>> {
        trace!(table, start_key, count, "scan");
        self.runner.read_only(cx, |txn| {
            let bucket = resolver::resolve(txn, table)?;
            let mut records = Vec::with_capacity(count.min(SCAN_PREALLOC_LIMIT));
            if count == 0 {
                return Ok(records);
            }

            let mut cursor = bucket.cursor()?;
            let mut entry = cursor.seek(start_key.as_bytes())?;
            while let Some((_, row)) = entry {
                cx.check()?;
                records.push(self.codec.decode(&row, fields)?);
                if records.len() == count {
                    break;
                }
                entry = cursor.next()?;
            }
            Ok(records)
        })
    }

    // =========================================================================
    // Writes
    // =========================================================================

    /// Merge `changes` into an existing record.
    ///
    /// Fields in `changes` overwrite stored fields of the same name; new
    /// names are added; stored fields not mentioned are kept.
    ///
    /// # Errors
    ///
    /// - `TableNotFound` if the table does not exist
    /// - `KeyNotFound` if the key does not exist; nothing is written
    /// - `Codec` if the stored row cannot be decoded or the merged record
    ///   cannot be encoded
    pub fn update(&self, cx: &Context, table: &str, key: &str, changes: &FieldMap) -> Result<()> {
        trace!(table, key, fields = changes.len(), "update");
        self.runner.read_write(cx, |txn| {
            let mut bucket = resolver::resolve_mut(txn, table)?;
            self.merge(&mut bucket, table, key, changes)
        })
    }

    /// Store `values` under `key`, replacing any existing record entirely.
    ///
    /// The table is created if it does not exist. Fields of a replaced
    /// record that are absent from `values` are gone afterwards.
    pub fn insert(&self, cx: &Context, table: &str, key: &str, values: &FieldMap) -> Result<()> {
        trace!(table, key, fields = values.len(), "insert");
        self.runner.read_write(cx, |txn| {
            let mut bucket = resolver::resolve_or_create(txn, table)?;
            self.store(&mut bucket, key, values)
        })
    }

    /// Remove the record under `key`.
    ///
    /// Succeeds without effect when the table or the key does not exist.
    pub fn delete(&self, cx: &Context, table: &str, key: &str) -> Result<()> {
        trace!(table, key, "delete");
        self.runner.read_write(cx, |txn| {
            match resolver::resolve_for_delete(txn, table)? {
                Some(mut bucket) => Ok(bucket.delete(key.as_bytes())?),
                None => Ok(()),
            }
        })
    }
}

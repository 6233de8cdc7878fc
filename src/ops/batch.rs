//! Multi-key operations.
//!
//! A batch is all-or-nothing: every item runs inside one engine transaction,
//! and the first failing item rolls the whole batch back. Items are applied
//! in the order given, so a key repeated within a batch sees the effect of
//! its earlier occurrences.
//!
//! Key and value slices must have the same length; a mismatch is rejected
//! before any transaction is opened.

use crate::database::RecordStore;
use recordstore_core::{Context, Error, FieldMap, Result};
use recordstore_engine::resolver;
use recordstore_storage::{BucketMut, KvEngine};
use recordstore_wire::RowCodec;
use tracing::trace;

fn check_lengths(keys: &[&str], values: &[FieldMap]) -> Result<()> {
    if keys.len() != values.len() {
        return Err(Error::InvalidArgument(format!(
            "batch has {} keys but {} values",
            keys.len(),
            values.len()
        )));
    }
    Ok(())
}

impl<E: KvEngine, C: RowCodec> RecordStore<E, C> {
    /// Insert every `(keys[i], values[i])` pair in one transaction.
    ///
    /// Same per-item semantics as [`insert`](Self::insert): the table is
    /// created if absent and existing records are replaced.
    ///
    /// # Errors
    ///
    /// - `InvalidArgument` if `keys` and `values` differ in length
    /// - `Codec` if any record cannot be encoded; no pair is persisted
    ///
    /// # Example
    ///
    /// ```
    /// use recordstore::prelude::*;
    ///
    /// let store = RecordStore::ephemeral();
    /// let cx = Context::background();
    /// let mut v = FieldMap::new();
    /// v.insert("f".into(), b"v".to_vec());
    ///
    /// store.batch_insert(&cx, "t", &["a", "b"], &[v.clone(), v])?;
    /// assert_eq!(store.scan(&cx, "t", "", 10, None)?.len(), 2);
    /// # Ok::<(), recordstore::Error>(())
    /// ```
    pub fn batch_insert(
        &self,
        cx: &Context,
        table: &str,
        keys: &[&str],
        values: &[FieldMap],
    ) -> Result<()> {
        check_lengths(keys, values)?;
        trace!(table, items = keys.len(), "batch insert");
        self.runner.read_write(cx, |txn| {
            let mut bucket = resolver::resolve_or_create(txn, table)?;
            for (key, record) in keys.iter().zip(values) {
                cx.check()?;
                self.store(&mut bucket, key, record)?;
            }
            Ok(())
        })
    }

    /// Read every key in one read-only transaction.
    ///
    /// The result has one entry per key, in the same order.
    ///
    /// # Errors
    ///
    /// - `TableNotFound` if the table does not exist
    /// - `KeyNotFound` for the first key that does not exist; no partial
    ///   result is returned
    pub fn batch_read(
        &self,
        cx: &Context,
        table: &str,
        keys: &[&str],
        fields: Option<&[&str]>,
    ) -> Result<Vec<FieldMap>> {
        trace!(table, items = keys.len(), "batch read");
        self.runner.read_only(cx, |txn| {
            let bucket = resolver::resolve(txn, table)?;
            let mut records = Vec::with_capacity(keys.len());
            for key in keys {
                cx.check()?;
                records.push(self.fetch(&bucket, table, key, fields)?);
            }
            Ok(records)
        })
    }

    /// Merge `changes[i]` into the record under `keys[i]`, all in one
    /// transaction.
    ///
    /// # Errors
    ///
    /// - `InvalidArgument` if `keys` and `changes` differ in length
    /// - `TableNotFound` if the table does not exist
    /// - `KeyNotFound` if any key does not exist; no record is modified
    pub fn batch_update(
        &self,
        cx: &Context,
        table: &str,
        keys: &[&str],
        changes: &[FieldMap],
    ) -> Result<()> {
        check_lengths(keys, changes)?;
        trace!(table, items = keys.len(), "batch update");
        self.runner.read_write(cx, |txn| {
            let mut bucket = resolver::resolve_mut(txn, table)?;
            for (key, change) in keys.iter().zip(changes) {
                cx.check()?;
                self.merge(&mut bucket, table, key, change)?;
            }
            Ok(())
        })
    }

    /// Remove every key in one transaction.
    ///
    /// Keys that do not exist are skipped. A missing table makes the whole
    /// batch a successful no-op.
    pub fn batch_delete(&self, cx: &Context, table: &str, keys: &[&str]) -> Result<()> {
        trace!(table, items = keys.len(), "batch delete");
        self.runner.read_write(cx, |txn| {
            let Some(mut bucket) = resolver::resolve_for_delete(txn, table)? else {
                return Ok(());
            };
            for key in keys {
                cx.check()?;
                bucket.delete(key.as_bytes())?;
            }
            Ok(())
        })
    }
}

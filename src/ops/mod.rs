//! Record operations.
//!
//! Single-record operations live in `records`, multi-key operations in
//! `batch`. Both share the row helpers below, which work on a bucket that
//! has already been resolved inside an open transaction.

mod batch;
mod records;

use crate::database::RecordStore;
use recordstore_core::{overlay, Error, FieldMap, Result};
use recordstore_storage::{Bucket, BucketMut, KvEngine};
use recordstore_wire::RowCodec;

impl<E: KvEngine, C: RowCodec> RecordStore<E, C> {
    /// Decode the record under `key`, or fail with `KeyNotFound`.
    fn fetch<B: Bucket>(
        &self,
        bucket: &B,
        table: &str,
        key: &str,
        fields: Option<&[&str]>,
    ) -> Result<FieldMap> {
        let row = bucket
            .get(key.as_bytes())?
            .ok_or_else(|| Error::key_not_found(table, key))?;
        Ok(self.codec.decode(&row, fields)?)
    }

    /// Encode `fields` through a pooled buffer and store it under `key`.
    fn store<B: BucketMut>(&self, bucket: &mut B, key: &str, fields: &FieldMap) -> Result<()> {
        let mut buf = self.pool.acquire();
        self.codec.encode(&mut buf, fields)?;
        bucket.put(key.as_bytes(), &buf)?;
        Ok(())
    }

    /// Read-modify-write of one record. Fields absent from `changes` keep
    /// their stored values.
    fn merge<B: BucketMut>(
        &self,
        bucket: &mut B,
        table: &str,
        key: &str,
        changes: &FieldMap,
    ) -> Result<()> {
        let mut record = self.fetch(&*bucket, table, key, None)?;
        overlay(&mut record, changes);
        self.store(bucket, key, &record)
    }
}

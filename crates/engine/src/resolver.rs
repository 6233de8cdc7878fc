//! Table resolution
//!
//! Maps a table name to a bucket inside an active transaction. Each
//! operation family treats a missing table differently:
//!
//! | Operation | Missing table |
//! |-----------|---------------|
//! | Read, Scan | `TableNotFound` |
//! | Update | `TableNotFound` |
//! | Insert | created transparently |
//! | Delete | successful no-op |

use recordstore_core::{Error, Result};
use recordstore_storage::{ReadTransaction, WriteTransaction};

/// Resolve a table for reading. Fails with `TableNotFound` if absent.
pub fn resolve<'t, R: ReadTransaction>(txn: &'t R, table: &str) -> Result<R::Bucket<'t>> {
    txn.bucket(table)?
        .ok_or_else(|| Error::table_not_found(table))
}

/// Resolve a table for update. Fails with `TableNotFound` if absent.
pub fn resolve_mut<'t, W: WriteTransaction>(txn: &'t W, table: &str) -> Result<W::BucketMut<'t>> {
    txn.bucket_mut(table)?
        .ok_or_else(|| Error::table_not_found(table))
}

/// Resolve a table for insert, creating it if absent.
pub fn resolve_or_create<'t, W: WriteTransaction>(
    txn: &'t W,
    table: &str,
) -> Result<W::BucketMut<'t>> {
    Ok(txn.create_bucket_if_not_exists(table)?)
}

/// Resolve a table for delete. Absence is `None`, not an error.
pub fn resolve_for_delete<'t, W: WriteTransaction>(
    txn: &'t W,
    table: &str,
) -> Result<Option<W::BucketMut<'t>>> {
    Ok(txn.bucket_mut(table)?)
}

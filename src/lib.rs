//! # Recordstore
//!
//! Table-scoped record storage over an embedded, ordered, transactional
//! key-value engine.
//!
//! A record is a map from field names to byte values, addressed by a table
//! name and a string key. Tables map to engine buckets, records to encoded
//! rows inside them. Every call runs in exactly one engine transaction.
//!
//! ## Quick Start
//!
//! ```
//! use recordstore::prelude::*;
//!
//! let store = RecordStore::ephemeral();
//! let cx = Context::background();
//!
//! let mut fields = FieldMap::new();
//! fields.insert("field0".into(), b"hello".to_vec());
//! store.insert(&cx, "usertable", "user1", &fields)?;
//!
//! let mut change = FieldMap::new();
//! change.insert("field1".into(), b"world".to_vec());
//! store.update(&cx, "usertable", "user1", &change)?;
//!
//! let record = store.read(&cx, "usertable", "user1", None)?;
//! assert_eq!(record.len(), 2);
//!
//! store.delete(&cx, "usertable", "user1")?;
//! # Ok::<(), recordstore::Error>(())
//! ```
//!
//! ## Operations
//!
//! | Operation | Transaction | Missing table | Missing key |
//! |-----------|-------------|---------------|-------------|
//! | `read` / `batch_read` | read-only | `TableNotFound` | `KeyNotFound` |
//! | `scan` | read-only | `TableNotFound` | n/a |
//! | `update` / `batch_update` | read-write | `TableNotFound` | `KeyNotFound` |
//! | `insert` / `batch_insert` | read-write | created | created |
//! | `delete` / `batch_delete` | read-write | no-op | no-op |
//!
//! ## Crates
//!
//! - `recordstore-core`: errors, field maps, cancellation, configuration
//! - `recordstore-storage`: engine contract plus redb and in-memory backends
//! - `recordstore-wire`: row codec contract and the binary row format
//! - `recordstore-engine`: transaction runner, table resolver, buffer pool

#![warn(missing_docs)]

mod database;
mod ops;

pub mod prelude;

// Re-export main entry points
pub use database::{RecordStore, RecordStoreBuilder};

// Re-export shared vocabulary
pub use recordstore_core::{
    overlay, project, selects, BufferPoolConfig, Context, Error, FieldMap, Result, StoreConfig,
};
pub use recordstore_engine::TransactionMetrics;
pub use recordstore_storage::{KvEngine, MemoryEngine, RedbEngine};
pub use recordstore_wire::{BinaryRowCodec, CodecError, RowCodec};

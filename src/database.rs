//! Store entry point.
//!
//! This module provides [`RecordStore`], the handle every record operation
//! goes through, and [`RecordStoreBuilder`] for configuring one.

use recordstore_core::{BufferPoolConfig, Result, StoreConfig};
use recordstore_engine::{BufferPool, TransactionMetrics, TransactionRunner};
use recordstore_storage::{KvEngine, MemoryEngine, RedbEngine};
use recordstore_wire::{BinaryRowCodec, RowCodec};
use std::fs;
use std::io;
use std::path::Path;
use tempfile::TempDir;
use tracing::{debug, info};

/// File name used inside the directory created by `open_temp`.
const TEMP_FILE_NAME: &str = "records.redb";

/// A table-scoped record store.
///
/// Records are field maps addressed by `(table, key)`. Every operation runs
/// in its own engine transaction; batch operations run all their items in a
/// single one. The store is `Send + Sync` and is meant to be shared between
/// threads by reference or behind an `Arc`.
///
/// Create a store with [`RecordStore::open`], [`RecordStore::ephemeral`] or
/// [`RecordStore::builder`].
///
/// # Example
///
/// ```
/// use recordstore::prelude::*;
///
/// let store = RecordStore::ephemeral();
/// let cx = Context::background();
///
/// let mut fields = FieldMap::new();
/// fields.insert("name".into(), b"alice".to_vec());
/// store.insert(&cx, "users", "user1", &fields)?;
///
/// let record = store.read(&cx, "users", "user1", None)?;
/// assert_eq!(record["name"], b"alice");
/// # Ok::<(), recordstore::Error>(())
/// ```
pub struct RecordStore<E = RedbEngine, C = BinaryRowCodec> {
    pub(crate) runner: TransactionRunner<E>,
    pub(crate) codec: C,
    pub(crate) pool: BufferPool,
    config: StoreConfig,
    /// Keeps the directory behind `open_temp` alive until the store drops.
    _temp_dir: Option<TempDir>,
}

impl RecordStore<RedbEngine, BinaryRowCodec> {
    /// Open a persistent store at the given file path.
    ///
    /// Existing data is kept. Parent directories are created as needed.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use recordstore::RecordStore;
    ///
    /// let store = RecordStore::open("/var/lib/bench/records.redb")?;
    /// # Ok::<(), recordstore::Error>(())
    /// ```
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Self::builder().path(path).open()
    }

    /// Open a persistent store in a fresh temporary directory.
    ///
    /// The directory is removed when the store is dropped.
    pub fn open_temp() -> Result<Self> {
        Self::builder().open_temp()
    }

    /// Create a builder for store configuration.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use recordstore::RecordStore;
    ///
    /// let store = RecordStore::builder()
    ///     .path("/tmp/bench.redb")
    ///     .drop_data(true)
    ///     .open()?;
    /// # Ok::<(), recordstore::Error>(())
    /// ```
    pub fn builder() -> RecordStoreBuilder {
        RecordStoreBuilder::new()
    }
}

impl<C: RowCodec> RecordStore<RedbEngine, C> {
    /// Path of the backing database file.
    pub fn path(&self) -> &Path {
        self.runner.engine().path()
    }
}

impl RecordStore<MemoryEngine, BinaryRowCodec> {
    /// Create a store that performs no disk I/O.
    ///
    /// All data is lost when the store is dropped.
    ///
    /// | Method | Disk Files | Survives Drop |
    /// |--------|------------|---------------|
    /// | `RecordStore::ephemeral()` | None | No |
    /// | `RecordStore::open_temp()` | Temp dir | No |
    /// | `RecordStore::open(path)` | User path | Yes |
    pub fn ephemeral() -> Self {
        RecordStoreBuilder::new().ephemeral()
    }
}

impl<E: KvEngine, C: RowCodec> RecordStore<E, C> {
    /// Build a store over any engine and codec with default configuration.
    pub fn with_engine(engine: E, codec: C) -> Self {
        RecordStoreBuilder::new().build(engine, codec)
    }

    fn assemble(engine: E, codec: C, config: StoreConfig, temp_dir: Option<TempDir>) -> Self {
        Self {
            runner: TransactionRunner::new(engine),
            codec,
            pool: BufferPool::new(config.buffer_pool),
            config,
            _temp_dir: temp_dir,
        }
    }

    /// The underlying engine.
    pub fn engine(&self) -> &E {
        self.runner.engine()
    }

    /// The codec used for every row.
    pub fn codec(&self) -> &C {
        &self.codec
    }

    /// The configuration this store was built with.
    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Transaction counters since the store was opened.
    pub fn metrics(&self) -> TransactionMetrics {
        self.runner.metrics()
    }

    /// Idle encode buffers currently held by the pool.
    pub fn pooled_buffers(&self) -> usize {
        self.pool.available()
    }

    /// Release the store and its engine.
    ///
    /// Every transaction has completed by the time any operation returns,
    /// so there is nothing left to flush.
    pub fn close(self) -> Result<()> {
        let metrics = self.metrics();
        info!(
            committed = metrics.committed,
            rolled_back = metrics.rolled_back,
            read_only = metrics.read_only,
            "closing record store"
        );
        drop(self);
        Ok(())
    }
}

/// Builder for store configuration.
///
/// # Example
///
/// ```
/// use recordstore::{BufferPoolConfig, RecordStore};
///
/// // Disposable persistent store for a test run
/// let store = RecordStore::builder()
///     .buffer_pool(BufferPoolConfig { max_pooled: 8, ..Default::default() })
///     .open_temp()?;
///
/// // No disk at all
/// let scratch = RecordStore::builder().ephemeral();
/// # Ok::<(), recordstore::Error>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct RecordStoreBuilder {
    config: StoreConfig,
}

impl RecordStoreBuilder {
    /// Create a builder with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the whole configuration, e.g. one loaded from a file.
    pub fn config(mut self, config: StoreConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the database file path.
    pub fn path(mut self, path: impl AsRef<Path>) -> Self {
        self.config.path = path.as_ref().to_path_buf();
        self
    }

    /// Delete any existing data at the path before opening.
    pub fn drop_data(mut self, drop_data: bool) -> Self {
        self.config.drop_data = drop_data;
        self
    }

    /// Set the encode buffer pool limits.
    pub fn buffer_pool(mut self, buffer_pool: BufferPoolConfig) -> Self {
        self.config.buffer_pool = buffer_pool;
        self
    }

    /// Open a persistent store at the configured path.
    pub fn open(self) -> Result<RecordStore> {
        prepare_path(&self.config)?;
        let engine = RedbEngine::open(&self.config.path)?;
        info!(path = %self.config.path.display(), "opened record store");
        Ok(RecordStore::assemble(
            engine,
            BinaryRowCodec::new(),
            self.config,
            None,
        ))
    }

    /// Open a persistent store in a fresh temporary directory.
    ///
    /// The configured path and `drop_data` are ignored.
    pub fn open_temp(mut self) -> Result<RecordStore> {
        let dir = tempfile::tempdir()?;
        self.config.path = dir.path().join(TEMP_FILE_NAME);
        self.config.drop_data = false;
        let engine = RedbEngine::open(&self.config.path)?;
        debug!(path = %self.config.path.display(), "opened temporary record store");
        Ok(RecordStore::assemble(
            engine,
            BinaryRowCodec::new(),
            self.config,
            Some(dir),
        ))
    }

    /// Build an in-memory store. The configured path is ignored.
    pub fn ephemeral(self) -> RecordStore<MemoryEngine> {
        debug!("opened ephemeral record store");
        RecordStore::assemble(MemoryEngine::new(), BinaryRowCodec::new(), self.config, None)
    }

    /// Build a store over a caller-supplied engine and codec.
    pub fn build<E: KvEngine, C: RowCodec>(self, engine: E, codec: C) -> RecordStore<E, C> {
        RecordStore::assemble(engine, codec, self.config, None)
    }
}

/// Honor `drop_data` and make sure the parent directory exists.
fn prepare_path(config: &StoreConfig) -> Result<()> {
    let path = &config.path;

    if config.drop_data {
        match fs::symlink_metadata(path) {
            Ok(meta) if meta.is_dir() => fs::remove_dir_all(path)?,
            Ok(_) => fs::remove_file(path)?,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => return Err(e.into()),
        }
        info!(path = %path.display(), "dropped existing data");
    }

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}

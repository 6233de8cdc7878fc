//! Scoped transaction execution
//!
//! The engine exposes transactions as explicit objects; callers of this
//! module only ever see a closure scope. Every write scope ends in exactly
//! one commit or rollback, including `?` early returns and unwinding panics,
//! where dropping the engine transaction discards its writes.

use recordstore_core::{Context, Result};
use recordstore_storage::{KvEngine, WriteTransaction};
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::{debug, warn};

/// Transaction counters since the runner was created.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TransactionMetrics {
    /// Read-only scopes opened
    pub read_only: u64,
    /// Read-write scopes committed
    pub committed: u64,
    /// Read-write scopes rolled back, including failed commits
    pub rolled_back: u64,
}

#[derive(Default)]
struct Counters {
    read_only: AtomicU64,
    committed: AtomicU64,
    rolled_back: AtomicU64,
}

/// Tallies one write scope.
///
/// Counts as rolled back on drop unless [`WriteOutcome::committed`] ran.
struct WriteOutcome<'c> {
    counters: &'c Counters,
    committed: bool,
}

impl<'c> WriteOutcome<'c> {
    fn new(counters: &'c Counters) -> Self {
        Self {
            counters,
            committed: false,
        }
    }

    fn committed(mut self) {
        self.committed = true;
        self.counters.committed.fetch_add(1, Ordering::Relaxed);
    }
}

impl Drop for WriteOutcome<'_> {
    fn drop(&mut self) {
        if !self.committed {
            self.counters.rolled_back.fetch_add(1, Ordering::Relaxed);
        }
    }
}

/// Runs closures inside engine transactions.
///
/// # Example
///
/// ```
/// use recordstore_core::Context;
/// use recordstore_engine::TransactionRunner;
/// use recordstore_storage::{BucketMut, MemoryEngine, WriteTransaction};
///
/// let runner = TransactionRunner::new(MemoryEngine::new());
/// runner
///     .read_write(&Context::background(), |txn| {
///         txn.create_bucket_if_not_exists("t")?.put(b"k", b"v")?;
///         Ok(())
///     })
///     .unwrap();
/// assert_eq!(runner.metrics().committed, 1);
/// ```
pub struct TransactionRunner<E> {
    engine: E,
    counters: Counters,
}

impl<E: KvEngine> TransactionRunner<E> {
    /// Wrap an engine.
    pub fn new(engine: E) -> Self {
        Self {
            engine,
            counters: Counters::default(),
        }
    }

    /// The wrapped engine.
    pub fn engine(&self) -> &E {
        &self.engine
    }

    /// Consume the runner and return the engine.
    pub fn into_engine(self) -> E {
        self.engine
    }

    /// Run `f` inside a read-only transaction.
    ///
    /// The transaction is released when `f` returns; its result, value or
    /// error, is returned unchanged.
    pub fn read_only<'s, T, F>(&'s self, cx: &Context, f: F) -> Result<T>
    where
        F: FnOnce(&E::ReadTxn<'s>) -> Result<T>,
    {
        cx.check()?;
        let txn = self.engine.begin_read()?;
        self.counters.read_only.fetch_add(1, Ordering::Relaxed);
        f(&txn)
    }

    /// Run `f` inside a read-write transaction.
    ///
    /// Commits iff `f` returns `Ok` and `cx` has not been cancelled by then.
    /// Otherwise every write made by `f` is discarded and the error is
    /// returned unchanged.
    pub fn read_write<'s, T, F>(&'s self, cx: &Context, f: F) -> Result<T>
    where
        F: FnOnce(&E::WriteTxn<'s>) -> Result<T>,
    {
        cx.check()?;
        let txn = self.engine.begin_write()?;
        let outcome = WriteOutcome::new(&self.counters);

        let value = match f(&txn).and_then(|value| cx.check().map(|()| value)) {
            Ok(value) => value,
            Err(e) => {
                debug!(error = %e, "rolling back transaction");
                match txn.rollback() {
                    Ok(()) => debug!("transaction rolled back"),
                    Err(rb) => warn!(error = %rb, "rollback failed"),
                }
                return Err(e);
            }
        };

        if let Err(e) = txn.commit() {
            warn!(error = %e, "commit failed");
            return Err(e.into());
        }
        outcome.committed();
        debug!("transaction committed");
        Ok(value)
    }

    /// Snapshot of the transaction counters.
    pub fn metrics(&self) -> TransactionMetrics {
        TransactionMetrics {
            read_only: self.counters.read_only.load(Ordering::Relaxed),
            committed: self.counters.committed.load(Ordering::Relaxed),
            rolled_back: self.counters.rolled_back.load(Ordering::Relaxed),
        }
    }
}

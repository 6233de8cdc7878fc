//! Per-call cancellation context
//!
//! Every store operation receives a [`Context`]. The store checks it at
//! operation entry, before each scan step, before each batch item and right
//! before commit. A cancelled write rolls back; nothing it wrote is persisted.

use crate::error::{Error, Result};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Cancellation signal passed into store operations.
///
/// Clones share the same signal: cancelling any clone cancels all of them.
///
/// # Example
///
/// ```
/// use recordstore_core::Context;
///
/// let cx = Context::cancellable();
/// let worker_cx = cx.clone();
/// assert!(!worker_cx.is_cancelled());
///
/// cx.cancel();
/// assert!(worker_cx.is_cancelled());
/// ```
#[derive(Debug, Clone, Default)]
pub struct Context {
    cancelled: Option<Arc<AtomicBool>>,
}

impl Context {
    /// A context that is never cancelled.
    pub fn background() -> Self {
        Self { cancelled: None }
    }

    /// A context that can be cancelled with [`Context::cancel`].
    pub fn cancellable() -> Self {
        Self {
            cancelled: Some(Arc::new(AtomicBool::new(false))),
        }
    }

    /// Signal cancellation to this context and every clone of it.
    ///
    /// Has no effect on a background context.
    pub fn cancel(&self) {
        if let Some(flag) = &self.cancelled {
            flag.store(true, Ordering::Release);
        }
    }

    /// Check whether cancellation has been signalled.
    pub fn is_cancelled(&self) -> bool {
        self.cancelled
            .as_ref()
            .map_or(false, |flag| flag.load(Ordering::Acquire))
    }

    /// Return [`Error::Cancelled`] if cancellation has been signalled.
    #[inline]
    pub fn check(&self) -> Result<()> {
        if self.is_cancelled() {
            Err(Error::Cancelled)
        } else {
            Ok(())
        }
    }
}

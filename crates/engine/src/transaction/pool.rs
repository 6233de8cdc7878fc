//! Shared pool of encode buffers
//!
//! Writes encode a field map into a scratch buffer before handing the row to
//! the engine. Buffers are borrowed for one encode and returned when the
//! [`PooledBuffer`] guard drops, whatever the outcome of the operation.
//!
//! Returned buffers are cleared but keep their capacity, up to
//! `max_retained_capacity`. At most `max_pooled` idle buffers are kept.

use parking_lot::Mutex;
use recordstore_core::BufferPoolConfig;
use std::ops::{Deref, DerefMut};

/// Thread-safe free list of byte buffers.
pub struct BufferPool {
    free: Mutex<Vec<Vec<u8>>>,
    config: BufferPoolConfig,
}

impl BufferPool {
    /// Create an empty pool.
    pub fn new(config: BufferPoolConfig) -> Self {
        Self {
            free: Mutex::new(Vec::with_capacity(config.max_pooled)),
            config,
        }
    }

    /// Borrow an empty buffer.
    pub fn acquire(&self) -> PooledBuffer<'_> {
        let buf = self.free.lock().pop().unwrap_or_default();
        PooledBuffer { pool: self, buf }
    }

    /// Number of idle buffers currently pooled.
    pub fn available(&self) -> usize {
        self.free.lock().len()
    }

    fn release(&self, mut buf: Vec<u8>) {
        if buf.capacity() == 0 || buf.capacity() > self.config.max_retained_capacity {
            return;
        }
        buf.clear();
        let mut free = self.free.lock();
        if free.len() < self.config.max_pooled {
            free.push(buf);
        }
    }
}

impl Default for BufferPool {
    fn default() -> Self {
        Self::new(BufferPoolConfig::default())
    }
}

/// A buffer on loan from a [`BufferPool`].
///
/// Dereferences to `Vec<u8>`; goes back to the pool on drop.
pub struct PooledBuffer<'p> {
    pool: &'p BufferPool,
    buf: Vec<u8>,
}

impl Deref for PooledBuffer<'_> {
    type Target = Vec<u8>;

    fn deref(&self) -> &Vec<u8> {
        &self.buf
    }
}

impl DerefMut for PooledBuffer<'_> {
    fn deref_mut(&mut self) -> &mut Vec<u8> {
        &mut self.buf
    }
}

impl Drop for PooledBuffer<'_> {
    fn drop(&mut self) {
        self.pool.release(std::mem::take(&mut self.buf));
    }
}

//! Transaction execution and per-call scratch resources
//!
//! This module provides:
//! - Scoped transaction execution with exactly-once commit or rollback
//! - A shared pool of encode buffers (no allocation per write after warmup)
//!
//! # Architecture
//!
//! Every store call runs inside exactly one scope:
//!
//! ```text
//! read_only(cx, f)   begin_read  -> f(&txn) -> drop
//! read_write(cx, f)  begin_write -> f(&txn) -> cancelled? -> commit
//!                                      |            |
//!                                      '-- Err -----+--> rollback
//! ```
//!
//! Buffers are borrowed from the pool right before an encode and returned
//! when the guard drops, on success and error paths alike.

pub mod pool;
pub mod runner;

pub use pool::{BufferPool, PooledBuffer};
pub use runner::{TransactionMetrics, TransactionRunner};

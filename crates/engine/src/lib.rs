//! Transaction orchestration for the record store
//!
//! This crate sits between the store API and the storage engine:
//! - [`TransactionRunner`]: scoped read-only / read-write execution with
//!   commit-on-success and rollback-on-error
//! - [`resolver`]: table name to bucket, with the per-operation absence rules
//! - [`BufferPool`]: reusable encode buffers shared across threads

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod resolver;
pub mod transaction;

pub use transaction::{BufferPool, PooledBuffer, TransactionMetrics, TransactionRunner};

//! Store configuration
//!
//! The configuration surface consumed when a store is opened. Loading it from
//! a file or environment is left to the caller; every field has a default so
//! a partial document deserializes cleanly.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Default location of the on-disk database file.
pub const DEFAULT_PATH: &str = "/tmp/recordstore";

/// Configuration for opening a record store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Where the engine persists its state
    pub path: PathBuf,

    /// Discard any pre-existing state at `path` before opening
    pub drop_data: bool,

    /// Encode buffer pool sizing
    pub buffer_pool: BufferPoolConfig,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from(DEFAULT_PATH),
            drop_data: false,
            buffer_pool: BufferPoolConfig::default(),
        }
    }
}

/// Sizing for the pool of reusable encode buffers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BufferPoolConfig {
    /// Maximum number of idle buffers kept for reuse
    pub max_pooled: usize,

    /// Buffers that grew beyond this capacity are freed instead of pooled
    pub max_retained_capacity: usize,
}

impl Default for BufferPoolConfig {
    fn default() -> Self {
        Self {
            max_pooled: 64,
            max_retained_capacity: 1024 * 1024,
        }
    }
}

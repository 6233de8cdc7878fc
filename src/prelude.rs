//! Convenient imports for the record store.
//!
//! ```
//! use recordstore::prelude::*;
//!
//! let store = RecordStore::ephemeral();
//! let missing = store.read(&Context::background(), "t", "k", None);
//! assert!(missing.unwrap_err().is_table_not_found());
//! ```

// Main entry point
pub use crate::database::{RecordStore, RecordStoreBuilder};

// Error handling
pub use recordstore_core::{Error, Result};

// Call and record types
pub use recordstore_core::{Context, FieldMap};

// Configuration
pub use recordstore_core::{BufferPoolConfig, StoreConfig};

//! Core types for the record store
//!
//! This crate defines the vocabulary shared by every layer:
//! - [`Error`]: the store-level error taxonomy
//! - [`FieldMap`]: the value of one record, with field projection
//! - [`Context`]: per-call cancellation signal
//! - [`StoreConfig`]: construction-time configuration

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod context;
pub mod error;
pub mod types;

pub use config::{BufferPoolConfig, StoreConfig};
pub use context::Context;
pub use error::{Error, Result};
pub use types::{overlay, project, selects, FieldMap};

//! Position-tracking cursor shared by the backends
//!
//! The cursor remembers the last key it returned and re-seeks past it on
//! every step. Backends only provide "first entry at or after a bound", so
//! the cursor never holds a borrow into backend iterators between calls.

use crate::engine::{BucketCursor, Entry};
use crate::error::StorageResult;
use std::ops::Bound;

/// Lookup primitive a backend exposes for cursor iteration.
pub trait SeekSource {
    /// Return the first entry whose key satisfies `lower`.
    fn first_from(&self, lower: Bound<&[u8]>) -> StorageResult<Option<Entry>>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Position {
    Unpositioned,
    At(Vec<u8>),
    Exhausted,
}

/// A [`BucketCursor`] over any [`SeekSource`].
pub struct PositionCursor<S> {
    source: S,
    position: Position,
}

impl<S: SeekSource> PositionCursor<S> {
    /// Create an unpositioned cursor.
    pub fn new(source: S) -> Self {
        Self {
            source,
            position: Position::Unpositioned,
        }
    }

    fn land(&mut self, entry: Option<Entry>) -> Option<Entry> {
        self.position = match &entry {
            Some((key, _)) => Position::At(key.clone()),
            None => Position::Exhausted,
        };
        entry
    }
}

impl<S: SeekSource> BucketCursor for PositionCursor<S> {
    fn seek(&mut self, key: &[u8]) -> StorageResult<Option<Entry>> {
        let entry = self.source.first_from(Bound::Included(key))?;
        Ok(self.land(entry))
    }

    fn next(&mut self) -> StorageResult<Option<Entry>> {
        let entry = match &self.position {
            Position::Unpositioned => self.source.first_from(Bound::Unbounded)?,
            Position::At(last) => self.source.first_from(Bound::Excluded(last.as_slice()))?,
            Position::Exhausted => return Ok(None),
        };
        Ok(self.land(entry))
    }
}

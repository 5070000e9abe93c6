//! Directory-colocated record cache for quire.
//!
//! This crate provides the storage side of navigation caching: every content
//! directory owns at most one derived record, stored next to the files it
//! describes. The record is opaque bytes at this layer.
//!
//! - [`CacheStore`]: Per-directory record store
//! - [`CacheStoreExt`]: Typed JSON helpers on top of any store
//!
//! # Implementations
//!
//! - [`NullCache`]: No-op implementation (always misses)
//! - [`DirCache`]: File-based implementation with atomic replacement
//!
//! # Example
//!
//! ```
//! use std::path::Path;
//! use quire_cache::{CacheStore, NullCache};
//!
//! let cache = NullCache;
//! cache.set(Path::new("/site/blog"), b"{}").unwrap();
//! assert_eq!(cache.get(Path::new("/site/blog")), None); // NullCache always misses
//! ```

mod dir;
mod ext;

use std::io;
use std::path::Path;
use std::time::SystemTime;

pub use dir::{DirCache, write_atomic};
pub use ext::CacheStoreExt;

/// Error raised while persisting a record.
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    /// Filesystem failure while writing or replacing the record.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    /// The value could not be serialized.
    #[error("serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Store holding one derived record per content directory.
///
/// Records are disposable: a missing or unreadable record is always a cache
/// miss, never an error. Writes replace the whole record.
pub trait CacheStore: Send + Sync {
    /// Read the raw record for `dir`.
    ///
    /// Returns `None` when no record exists or it cannot be read.
    fn get(&self, dir: &Path) -> Option<Vec<u8>>;

    /// Replace the record for `dir` with `value`.
    ///
    /// Concurrent readers observe either the previous record or the new one,
    /// never a partial write.
    fn set(&self, dir: &Path, value: &[u8]) -> io::Result<()>;

    /// Remove the record for `dir`. Removing a missing record succeeds.
    fn invalidate(&self, dir: &Path) -> io::Result<()>;

    /// Last modification time of the record for `dir`, if it exists.
    fn modified(&self, dir: &Path) -> Option<SystemTime>;

    /// Whether `name` is the file this store uses inside a directory.
    ///
    /// Used by staleness checks to skip the record's own file.
    fn owns(&self, name: &str) -> bool;
}

/// No-op [`CacheStore`] that never stores or retrieves data.
///
/// Use when persistence is disabled. Every lookup misses, so every read
/// rebuilds from source.
pub struct NullCache;

impl CacheStore for NullCache {
    fn get(&self, _dir: &Path) -> Option<Vec<u8>> {
        None
    }

    fn set(&self, _dir: &Path, _value: &[u8]) -> io::Result<()> {
        Ok(())
    }

    fn invalidate(&self, _dir: &Path) -> io::Result<()> {
        Ok(())
    }

    fn modified(&self, _dir: &Path) -> Option<SystemTime> {
        None
    }

    fn owns(&self, _name: &str) -> bool {
        false
    }
}

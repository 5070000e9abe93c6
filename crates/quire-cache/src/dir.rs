//! File-based cache colocated with content.
//!
//! [`DirCache`] stores one record per directory as a plain file inside that
//! directory:
//!
//! ```text
//! {content}/
//! +-- index.md
//! +-- page1.md
//! +-- _nav_cache        # record for {content}
//! +-- blog/
//!     +-- index.md
//!     +-- _nav_cache    # record for {content}/blog
//! ```
//!
//! Writes go to a named temporary file in the same directory which is then
//! renamed over the record, so a reader sees either the old or the new record.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use crate::CacheStore;

/// File-based [`CacheStore`] writing records next to the content they describe.
pub struct DirCache {
    file_name: String,
}

impl DirCache {
    /// Create a store that keeps each directory's record in `file_name`.
    #[must_use]
    pub fn new(file_name: impl Into<String>) -> Self {
        Self {
            file_name: file_name.into(),
        }
    }

    /// Path of the record for `dir`.
    #[must_use]
    pub fn record_path(&self, dir: &Path) -> PathBuf {
        dir.join(&self.file_name)
    }
}

impl CacheStore for DirCache {
    fn get(&self, dir: &Path) -> Option<Vec<u8>> {
        fs::read(self.record_path(dir)).ok()
    }

    fn set(&self, dir: &Path, value: &[u8]) -> io::Result<()> {
        write_atomic(&self.record_path(dir), value)
    }

    fn invalidate(&self, dir: &Path) -> io::Result<()> {
        match fs::remove_file(self.record_path(dir)) {
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            other => other,
        }
    }

    fn modified(&self, dir: &Path) -> Option<SystemTime> {
        fs::metadata(self.record_path(dir))
            .and_then(|m| m.modified())
            .ok()
    }

    fn owns(&self, name: &str) -> bool {
        name == self.file_name
    }
}

/// Replace the file at `path` with `value` via a sibling temporary file.
///
/// The temporary file is named after the target with a random suffix and is
/// renamed over `path` once fully written and synced.
pub fn write_atomic(path: &Path, value: &[u8]) -> io::Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let name = path
        .file_name()
        .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "path has no file name"))?;

    let mut prefix = name.to_os_string();
    prefix.push(".");
    let mut tmp = tempfile::Builder::new().prefix(&prefix).tempfile_in(dir)?;
    tmp.write_all(value)?;
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

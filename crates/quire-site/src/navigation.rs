//! Per-directory navigation records.
//!
//! A [`Navigation`] lists the immediate children of one content directory:
//! subdirectories that have an index page (`folders`) and listed content
//! files (`files`). Both lists hold [`PageSummary`] entries sorted by
//! `(weight, title, path)`.
//!
//! [`NavigationCache`] builds these listings and persists them through a
//! [`CacheStore`], one record per directory. Records are derived data: a
//! missing or corrupt record is rebuilt from the page files, and building a
//! directory never touches its subdirectories' records.

use std::cmp::Ordering;
use std::fs;
use std::io;
use std::path::Path;
use std::sync::Arc;
use std::time::SystemTime;

use quire_cache::{CacheError, CacheStore, CacheStoreExt};
use serde::{Deserialize, Serialize};

use crate::page::PageSummary;
use crate::parser::PageParser;

/// Sorted listing of one directory's child pages.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Navigation {
    /// Index pages of immediate subdirectories.
    pub folders: Vec<PageSummary>,
    /// Listed content files directly in the directory.
    pub files: Vec<PageSummary>,
}

/// Builds, reads and persists [`Navigation`] records.
pub struct NavigationCache {
    parser: Arc<PageParser>,
    store: Arc<dyn CacheStore>,
    check_stale: bool,
}

impl NavigationCache {
    #[must_use]
    pub fn new(parser: Arc<PageParser>, store: Arc<dyn CacheStore>) -> Self {
        Self {
            parser,
            store,
            check_stale: false,
        }
    }

    /// Treat a record as absent when content in its directory is newer.
    ///
    /// Only additions and edits are detected; a deleted page leaves the
    /// record untouched until the next explicit rebuild.
    #[must_use]
    pub fn with_stale_check(mut self, enabled: bool) -> Self {
        self.check_stale = enabled;
        self
    }

    #[must_use]
    pub fn parser(&self) -> &PageParser {
        &self.parser
    }

    /// Listing for `dir`, building and persisting it when no usable record exists.
    ///
    /// A persistence failure is logged and the freshly built listing is
    /// still returned.
    pub fn get(&self, dir: &Path) -> Navigation {
        if let Some(nav) = self.persisted(dir) {
            if !(self.check_stale && self.is_stale(dir)) {
                tracing::debug!(dir = %dir.display(), "Navigation cache hit");
                return nav;
            }
            tracing::debug!(dir = %dir.display(), "Navigation cache stale");
        } else {
            tracing::debug!(dir = %dir.display(), "Navigation cache miss");
        }

        let nav = self.build(dir);
        if let Err(e) = self.store.set_json(dir, &nav) {
            tracing::warn!(dir = %dir.display(), error = %e, "Failed to persist navigation cache");
        }
        nav
    }

    /// Persisted listing for `dir`, without building anything.
    ///
    /// Returns `None` when the record is missing or cannot be deserialized.
    #[must_use]
    pub fn persisted(&self, dir: &Path) -> Option<Navigation> {
        self.store.get_json(dir)
    }

    /// Build the listing for `dir` and replace its record.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError`] if the record cannot be written.
    pub fn rebuild(&self, dir: &Path) -> Result<Navigation, CacheError> {
        let nav = self.build(dir);
        self.store.set_json(dir, &nav)?;
        tracing::info!(
            dir = %dir.display(),
            folders = nav.folders.len(),
            files = nav.files.len(),
            "Rebuilt navigation cache"
        );
        Ok(nav)
    }

    /// Delete the record for `dir`; the next [`get`](Self::get) rebuilds it.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if an existing record cannot be removed.
    pub fn invalidate(&self, dir: &Path) -> io::Result<()> {
        self.store.invalidate(dir)
    }

    /// Compute the listing for `dir` from the page files, without persisting.
    ///
    /// Entries that fail to parse are left out.
    #[must_use]
    pub fn build(&self, dir: &Path) -> Navigation {
        let entries = match fs::read_dir(dir) {
            Ok(entries) => entries,
            Err(e) => {
                tracing::debug!(dir = %dir.display(), error = %e, "Cannot list directory");
                return Navigation::default();
            }
        };

        let layout = self.parser.layout();
        let mut nav = Navigation::default();

        for entry in entries.filter_map(Result::ok) {
            let path = entry.path();
            if path.is_dir() {
                match self.parser.load(&path) {
                    Ok(page) => nav.folders.push(page.into_summary()),
                    Err(e) => tracing::debug!(dir = %path.display(), error = %e, "Skipping folder"),
                }
                continue;
            }

            let name = entry.file_name();
            let Some(name) = name.to_str() else {
                continue;
            };
            if !layout.is_listed_file(name) || !path.is_file() {
                continue;
            }
            match self.parser.load(&path) {
                Ok(page) => nav.files.push(page.into_summary()),
                Err(e) => tracing::debug!(file = %path.display(), error = %e, "Skipping file"),
            }
        }

        nav.folders.sort_by(navigation_order);
        nav.files.sort_by(navigation_order);
        nav
    }

    /// Whether any content entry of `dir` is newer than its record.
    fn is_stale(&self, dir: &Path) -> bool {
        let Some(recorded) = self.store.modified(dir) else {
            return true;
        };
        let Ok(entries) = fs::read_dir(dir) else {
            return false;
        };

        let layout = self.parser.layout();
        entries.filter_map(Result::ok).any(|entry| {
            let name = entry.file_name();
            let name = name.to_string_lossy();
            if self.store.owns(&name) {
                return false;
            }
            let path = entry.path();
            let source = if path.is_dir() {
                path.join(layout.index_file_name())
            } else if layout.is_listed_file(&name) {
                path
            } else {
                return false;
            };
            modified(&source).is_some_and(|mtime| mtime > recorded)
        })
    }
}

fn modified(path: &Path) -> Option<SystemTime> {
    fs::metadata(path).and_then(|m| m.modified()).ok()
}

/// Ordering of navigation entries: `(weight, title, path)` ascending.
pub(crate) fn navigation_order(a: &PageSummary, b: &PageSummary) -> Ordering {
    a.weight
        .cmp(&b.weight)
        .then_with(|| a.title.cmp(&b.title))
        .then_with(|| a.path.cmp(&b.path))
}

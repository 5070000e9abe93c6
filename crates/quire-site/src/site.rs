//! Content site facade.
//!
//! [`Site`] ties the page parser, the navigation cache and the feed
//! aggregator to one content root. It exposes the read side used by a
//! presentation layer (page lookup, page context, feed) and the maintenance
//! triggers used after content changes (directory rebuilds, feed output).
//!
//! # Thread Safety
//!
//! `Site` holds no mutable state of its own and is `Send + Sync`. Navigation
//! records are replaced atomically on disk, so concurrent readers see either
//! the previous record or the new one.
//!
//! # Example
//!
//! ```no_run
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use std::path::PathBuf;
//! use std::sync::Arc;
//! use quire_markup::MarkdownRenderer;
//! use quire_site::{Site, SiteConfig};
//!
//! let config = SiteConfig {
//!     root: PathBuf::from("markdown"),
//!     ..SiteConfig::default()
//! };
//! let site = Site::new(config, Arc::new(MarkdownRenderer::new()))?;
//!
//! let page = site.resolve_page("/blog/hello")?;
//! let context = site.context(page);
//! println!("{} siblings", context.files.len());
//! # Ok(())
//! # }
//! ```

use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use quire_cache::{CacheError, CacheStore, DirCache, NullCache, write_atomic};
use quire_markup::MarkupRenderer;
use serde::Serialize;

use crate::atom::render_atom;
use crate::feed::{self, Feed};
use crate::navigation::{Navigation, NavigationCache};
use crate::page::{Page, PageError, PageSummary};
use crate::pagination::{paginate, up_level};
use crate::parser::{PageParser, has_traversal};
use crate::schema::{ContentLayout, PageDefaults};
use crate::walk;

/// Error returned by site maintenance operations.
#[derive(Debug, thiserror::Error)]
pub enum SiteError {
    #[error(transparent)]
    Page(#[from] PageError),
    /// Directory is missing or lies outside the content root.
    #[error("Not a content directory: {}", .0.display())]
    NotADirectory(PathBuf),
    /// Navigation record name would overwrite or shadow content.
    #[error("Invalid navigation cache file name: {0:?}")]
    InvalidCacheFile(String),
    /// A navigation record could not be written.
    #[error("Failed to persist navigation cache for {}: {source}", dir.display())]
    Persist {
        dir: PathBuf,
        #[source]
        source: CacheError,
    },
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Site configuration.
#[derive(Clone, Debug)]
pub struct SiteConfig {
    /// Content root directory.
    pub root: PathBuf,
    pub layout: ContentLayout,
    pub defaults: PageDefaults,
    /// File name of the per-directory navigation record.
    ///
    /// If `None`, records are never persisted and every read rebuilds.
    pub cache_file: Option<String>,
    /// Rebuild records older than the content they list.
    pub check_stale: bool,
    /// Default number of feed entries.
    pub feed_limit: usize,
    /// Absolute URL of the site, used for feed links.
    pub base_url: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("markdown"),
            layout: ContentLayout::default(),
            defaults: PageDefaults::default(),
            cache_file: Some("_nav_cache".to_owned()),
            check_stale: false,
            feed_limit: 20,
            base_url: "http://www.example.com".to_owned(),
        }
    }
}

/// Everything a template needs to present one page.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct PageContext {
    pub page: Page,
    pub folders: Vec<PageSummary>,
    pub files: Vec<PageSummary>,
    pub previous_page: Option<PageSummary>,
    pub next_page: Option<PageSummary>,
    pub current_index: Option<usize>,
    pub up_level: Option<Page>,
}

/// Content site rooted at one directory.
pub struct Site {
    parser: Arc<PageParser>,
    nav: NavigationCache,
    feed_limit: usize,
    base_url: String,
}

impl Site {
    /// Open the site described by `config`.
    ///
    /// # Errors
    ///
    /// Returns [`SiteError::InvalidCacheFile`] if the record name is not a
    /// plain non-content file name, or [`SiteError::Page`] if the content
    /// root does not exist.
    pub fn new(config: SiteConfig, renderer: Arc<dyn MarkupRenderer>) -> Result<Self, SiteError> {
        if let Some(name) = &config.cache_file
            && !config.layout.is_record_name(name)
        {
            return Err(SiteError::InvalidCacheFile(name.clone()));
        }
        let parser = Arc::new(PageParser::new(
            &config.root,
            config.layout,
            config.defaults,
            renderer,
        )?);
        let store: Arc<dyn CacheStore> = match config.cache_file {
            Some(name) => Arc::new(DirCache::new(name)),
            None => Arc::new(NullCache),
        };
        let nav = NavigationCache::new(Arc::clone(&parser), store)
            .with_stale_check(config.check_stale);

        tracing::debug!(root = %parser.root().display(), "Opened site");
        Ok(Self {
            parser,
            nav,
            feed_limit: config.feed_limit,
            base_url: config.base_url,
        })
    }

    /// Canonical content root.
    #[must_use]
    pub fn root(&self) -> &Path {
        self.parser.root()
    }

    #[must_use]
    pub fn parser(&self) -> &PageParser {
        &self.parser
    }

    #[must_use]
    pub fn navigation(&self) -> &NavigationCache {
        &self.nav
    }

    /// Resolve a request URL path (e.g. `/blog/hello`) to a page.
    ///
    /// The leading `/` is optional; the empty path is the root index page.
    ///
    /// # Errors
    ///
    /// Returns [`PageError::NotFound`] if no page exists at `url_path`.
    pub fn resolve_page(&self, url_path: &str) -> Result<Page, PageError> {
        let relative = url_path.trim_start_matches('/');
        self.parser.load(Path::new(relative))
    }

    /// Build the presentation context for `page`.
    ///
    /// Reads (and on first use builds) the navigation record of the page's
    /// directory.
    #[must_use]
    pub fn context(&self, page: Page) -> PageContext {
        let listing = page
            .filename
            .parent()
            .map(|dir| self.nav.get(dir))
            .unwrap_or_default();
        let pagination = paginate(&page, &listing.files, self.parser.layout());
        let up_level = up_level(&self.parser, &page);

        PageContext {
            page,
            folders: listing.folders,
            files: listing.files,
            previous_page: pagination.previous,
            next_page: pagination.next,
            current_index: pagination.current_index,
            up_level,
        }
    }

    /// Feed of the `limit` most recent pages.
    ///
    /// # Errors
    ///
    /// Returns [`PageError::NotFound`] if the root index page is missing.
    pub fn feed(&self, limit: usize) -> Result<Feed, PageError> {
        feed::aggregate(&self.nav, limit)
    }

    /// Feed using the configured entry limit.
    ///
    /// # Errors
    ///
    /// Returns [`PageError::NotFound`] if the root index page is missing.
    pub fn feed_default(&self) -> Result<Feed, PageError> {
        self.feed(self.feed_limit)
    }

    /// Feed rendered as an Atom document.
    ///
    /// # Errors
    ///
    /// Returns [`PageError::NotFound`] if the root index page is missing.
    pub fn render_feed(&self, limit: usize) -> Result<String, PageError> {
        Ok(render_atom(&self.feed(limit)?, &self.base_url))
    }

    /// Rebuild the navigation record of one directory.
    ///
    /// `dir` is either relative to the content root or an absolute path inside it.
    ///
    /// # Errors
    ///
    /// Returns [`SiteError::NotADirectory`] if `dir` is not a directory under
    /// the content root, or [`SiteError::Persist`] if the record cannot be written.
    pub fn rebuild_directory(&self, dir: &Path) -> Result<Navigation, SiteError> {
        let dir = self.content_dir(dir)?;
        self.nav
            .rebuild(&dir)
            .map_err(|source| SiteError::Persist { dir, source })
    }

    /// Rebuild the navigation record of every directory that has an index page.
    ///
    /// Returns the number of directories rebuilt.
    ///
    /// # Errors
    ///
    /// Stops at the first record that cannot be written.
    pub fn rebuild_all(&self) -> Result<usize, SiteError> {
        let mut rebuilt = 0;
        for dir in walk::directories(self.root()) {
            if !self.parser.has_index(&dir) {
                continue;
            }
            self.nav
                .rebuild(&dir)
                .map_err(|source| SiteError::Persist {
                    dir: dir.clone(),
                    source,
                })?;
            rebuilt += 1;
        }
        tracing::info!(directories = rebuilt, "Rebuilt all navigation caches");
        Ok(rebuilt)
    }

    /// Render the feed and atomically replace the document at `output`.
    ///
    /// Returns the number of entries written.
    ///
    /// # Errors
    ///
    /// Returns [`SiteError::Page`] if the root index page is missing, or
    /// [`SiteError::Io`] if the document cannot be written.
    pub fn write_feed(&self, output: &Path, limit: usize) -> Result<usize, SiteError> {
        let feed = self.feed(limit)?;
        let xml = render_atom(&feed, &self.base_url);
        write_atomic(output, xml.as_bytes())?;
        tracing::info!(
            output = %output.display(),
            entries = feed.entries.len(),
            "Wrote feed"
        );
        Ok(feed.entries.len())
    }

    /// Canonical directory for a maintenance request, confined to the root.
    fn content_dir(&self, dir: &Path) -> Result<PathBuf, SiteError> {
        let not_a_dir = || SiteError::NotADirectory(dir.to_path_buf());

        let relative = dir.strip_prefix(self.root()).unwrap_or(dir);
        if has_traversal(relative) {
            return Err(not_a_dir());
        }
        let canonical = self
            .root()
            .join(relative)
            .canonicalize()
            .map_err(|_| not_a_dir())?;
        if !canonical.starts_with(self.root()) || !canonical.is_dir() {
            return Err(not_a_dir());
        }
        Ok(canonical)
    }
}

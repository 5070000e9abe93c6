//! Sibling pagination and up-level lookup.

use std::path::Path;

use serde::Serialize;

use crate::page::{Page, PageSummary};
use crate::parser::PageParser;
use crate::schema::ContentLayout;

/// Neighbours of a page within its directory's `files` listing.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Pagination {
    pub previous: Option<PageSummary>,
    pub next: Option<PageSummary>,
    /// Zero-based position of the page in the listing.
    pub current_index: Option<usize>,
}

/// Locate `page` in the sorted `files` listing of its directory.
///
/// Index pages and empty listings are never paginated. A page that is not
/// part of `files` (e.g. a stale record) is logged and left unpaginated.
#[must_use]
pub fn paginate(page: &Page, files: &[PageSummary], layout: &ContentLayout) -> Pagination {
    if files.is_empty() || layout.is_index(&page.filename) {
        return Pagination::default();
    }

    let Some(index) = files.iter().position(|f| f.filename == page.filename) else {
        tracing::warn!(
            file = %page.filename.display(),
            "Page missing from its navigation listing"
        );
        return Pagination::default();
    };

    Pagination {
        previous: index.checked_sub(1).and_then(|i| files.get(i)).cloned(),
        next: files.get(index + 1).cloned(),
        current_index: Some(index),
    }
}

/// Index page one level above `page`, loaded in full.
///
/// For an index page this is the parent directory's index page; for any
/// other page it is the index page of its own directory. Returns `None` when
/// that directory has no index page or lies outside the content root.
#[must_use]
pub fn up_level(parser: &PageParser, page: &Page) -> Option<Page> {
    let dir = page.filename.parent()?;
    let ancestor: &Path = if parser.layout().is_index(&page.filename) {
        dir.parent()?
    } else {
        dir
    };

    if !ancestor.starts_with(parser.root()) || !parser.has_index(ancestor) {
        return None;
    }
    parser.load(ancestor).ok()
}

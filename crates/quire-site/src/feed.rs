//! Site-wide feed aggregation.
//!
//! The feed is the union of every persisted navigation record's `files`,
//! newest first. Aggregation only reads existing records: directories that
//! have never been built are not part of the feed.

use std::cmp::Ordering;
use std::path::Path;

use serde::Serialize;

use crate::navigation::NavigationCache;
use crate::page::{Page, PageError, PageSummary};
use crate::walk;

/// Feed header and ranked entries.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Feed {
    /// Root index page, with `timestamp`/`date` taken from the newest entry.
    pub header: Page,
    pub entries: Vec<PageSummary>,
}

/// Collect the `limit` most recent entries across the content tree.
///
/// # Errors
///
/// Returns [`PageError::NotFound`] if the root index page is missing.
pub fn aggregate(nav: &NavigationCache, limit: usize) -> Result<Feed, PageError> {
    let parser = nav.parser();
    let mut header = parser.load(Path::new(""))?;

    let mut entries: Vec<PageSummary> = walk::directories(parser.root())
        .iter()
        .filter_map(|dir| nav.persisted(dir))
        .flat_map(|listing| listing.files)
        .collect();
    entries.sort_by(feed_order);
    entries.truncate(limit);

    if let Some(top) = entries.first()
        && let (Some(timestamp), Some(date)) = (&top.timestamp, &top.date)
    {
        header.timestamp = Some(timestamp.clone());
        header.date = Some(date.clone());
    }

    tracing::debug!(entries = entries.len(), limit, "Aggregated feed");
    Ok(Feed { header, entries })
}

/// Newest first; entries without a timestamp sort last. Ties break on `path`.
pub(crate) fn feed_order(a: &PageSummary, b: &PageSummary) -> Ordering {
    let by_time = match (&a.timestamp, &b.timestamp) {
        (Some(a), Some(b)) => b.cmp(a),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    };
    by_time.then_with(|| a.path.cmp(&b.path))
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::sync::Arc;

    use pretty_assertions::assert_eq;
    use quire_cache::DirCache;
    use quire_markup::MarkupRenderer;
    use tempfile::TempDir;

    use super::*;
    use crate::parser::PageParser;
    use crate::schema::{ContentLayout, PageDefaults};

    fn write(root: &Path, rel: &str, content: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    fn cache(root: &Path) -> NavigationCache {
        let renderer: Arc<dyn MarkupRenderer> = Arc::new(|source: &str| source.to_owned());
        let parser = PageParser::new(
            root,
            ContentLayout::default(),
            PageDefaults::default(),
            renderer,
        )
        .unwrap();
        NavigationCache::new(Arc::new(parser), Arc::new(DirCache::new("_nav_cache")))
    }

    fn entry(path: &str, timestamp: Option<&str>) -> PageSummary {
        PageSummary {
            filename: Path::new("/site").join(format!("{path}.md")),
            path: path.to_owned(),
            title: path.to_owned(),
            description: String::new(),
            keywords: String::new(),
            image: String::new(),
            thumbnail: String::new(),
            timestamp: timestamp.map(str::to_owned),
            date: None,
            weight: 0,
        }
    }

    fn paths(entries: &[PageSummary]) -> Vec<&str> {
        entries.iter().map(|e| e.path.as_str()).collect()
    }

    #[test]
    fn test_feed_order() {
        let mut entries = vec![
            entry("untimed-b", None),
            entry("old", Some("2023-01-01T00:00:00")),
            entry("untimed-a", None),
            entry("new", Some("2024-06-01T00:00:00")),
            entry("tie-b", Some("2024-01-01T00:00:00")),
            entry("tie-a", Some("2024-01-01T00:00:00")),
        ];
        entries.sort_by(feed_order);

        assert_eq!(
            paths(&entries),
            vec!["new", "tie-a", "tie-b", "old", "untimed-a", "untimed-b"]
        );
    }

    #[test]
    fn test_aggregate_reads_only_persisted_records() {
        let tmp = TempDir::new().unwrap();
        write(tmp.path(), "index.md", "Title: Home\n");
        write(tmp.path(), "a/index.md", "Title: A\n");
        write(tmp.path(), "a/post.md", "Timestamp: 2024-01-01T00:00:00\n");
        write(tmp.path(), "b/index.md", "Title: B\n");
        write(tmp.path(), "b/post.md", "Timestamp: 2024-02-01T00:00:00\n");
        let nav = cache(tmp.path());

        nav.rebuild(&tmp.path().join("a")).unwrap();
        let feed = aggregate(&nav, 20).unwrap();

        assert_eq!(paths(&feed.entries), vec!["a/post"]);
        assert!(!tmp.path().join("b/_nav_cache").exists());
        assert!(!tmp.path().join("_nav_cache").exists());
    }

    #[test]
    fn test_aggregate_excludes_folders() {
        let tmp = TempDir::new().unwrap();
        write(tmp.path(), "index.md", "Title: Home\n");
        write(tmp.path(), "sub/index.md", "Timestamp: 2024-01-01T00:00:00\n");
        let nav = cache(tmp.path());

        nav.rebuild(tmp.path()).unwrap();
        let feed = aggregate(&nav, 20).unwrap();

        assert!(feed.entries.is_empty());
    }

    #[test]
    fn test_aggregate_truncates_and_sorts() {
        let tmp = TempDir::new().unwrap();
        write(tmp.path(), "index.md", "Title: Home\n");
        for day in 1..=5 {
            write(
                tmp.path(),
                &format!("post{day}.md"),
                &format!("Timestamp: 2024-01-0{day}T00:00:00\n"),
            );
        }
        let nav = cache(tmp.path());

        nav.rebuild(tmp.path()).unwrap();
        let feed = aggregate(&nav, 3).unwrap();

        assert_eq!(paths(&feed.entries), vec!["post5", "post4", "post3"]);
    }

    #[test]
    fn test_header_borrows_newest_timestamp_and_date() {
        let tmp = TempDir::new().unwrap();
        write(
            tmp.path(),
            "index.md",
            "Title: Home\nTimestamp: 2000-01-01T00:00:00\nDate: Long ago\n",
        );
        write(
            tmp.path(),
            "post.md",
            "Timestamp: 2024-05-01T12:00:00\nDate: May 1, 2024\n",
        );
        let nav = cache(tmp.path());

        nav.rebuild(tmp.path()).unwrap();
        let feed = aggregate(&nav, 20).unwrap();

        assert_eq!(feed.header.timestamp.as_deref(), Some("2024-05-01T12:00:00"));
        assert_eq!(feed.header.date.as_deref(), Some("May 1, 2024"));
        // The file on disk is untouched
        let home = nav.parser().load(Path::new("")).unwrap();
        assert_eq!(home.date.as_deref(), Some("Long ago"));
    }

    #[test]
    fn test_header_kept_when_newest_lacks_date() {
        let tmp = TempDir::new().unwrap();
        write(
            tmp.path(),
            "index.md",
            "Timestamp: 2000-01-01T00:00:00\nDate: Long ago\n",
        );
        write(tmp.path(), "post.md", "Timestamp: 2024-05-01T12:00:00\n");
        let nav = cache(tmp.path());

        nav.rebuild(tmp.path()).unwrap();
        let feed = aggregate(&nav, 20).unwrap();

        assert_eq!(feed.header.date.as_deref(), Some("Long ago"));
    }

    #[test]
    fn test_aggregate_skips_corrupt_record() {
        let tmp = TempDir::new().unwrap();
        write(tmp.path(), "index.md", "Title: Home\n");
        write(tmp.path(), "post.md", "Title: Post\n");
        write(tmp.path(), "_nav_cache", "garbage");
        let nav = cache(tmp.path());

        let feed = aggregate(&nav, 20).unwrap();

        assert!(feed.entries.is_empty());
        assert_eq!(fs::read_to_string(tmp.path().join("_nav_cache")).unwrap(), "garbage");
    }

    #[test]
    fn test_aggregate_without_root_index() {
        let tmp = TempDir::new().unwrap();
        assert!(matches!(
            aggregate(&cache(tmp.path()), 20),
            Err(PageError::NotFound(_))
        ));
    }
}

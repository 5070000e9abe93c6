//! Atom 1.0 rendering of a [`Feed`].
//!
//! Links and ids are absolute URLs built from the site's base URL and each
//! page's URL path. Page images become `enclosure` links.
//!
//! Every `updated` element is always present. An untimed entry falls back to
//! the feed's own value, which is the root page's timestamp, else the newest
//! entry's, else the Unix epoch.

use std::fmt::Write;

use quick_xml::escape::escape;

use crate::feed::Feed;

const EPOCH: &str = "1970-01-01T00:00:00Z";

/// Render `feed` as an Atom document rooted at `base_url`.
#[must_use]
pub fn render_atom(feed: &Feed, base_url: &str) -> String {
    let base = base_url.trim_end_matches('/');
    let header = &feed.header;
    let mut out = String::with_capacity(512 + feed.entries.len() * 384);

    out.push_str("<?xml version=\"1.0\" encoding=\"utf-8\"?>\n");
    out.push_str("<feed xmlns=\"http://www.w3.org/2005/Atom\">\n");
    element(&mut out, 1, "title", &header.title);
    element(&mut out, 1, "subtitle", &header.description);
    link(&mut out, 1, None, &format!("{base}/"));
    element(&mut out, 1, "id", &format!("{base}/"));
    let feed_updated = header
        .timestamp
        .as_deref()
        .or_else(|| feed.entries.iter().find_map(|e| e.timestamp.as_deref()))
        .unwrap_or(EPOCH);
    element(&mut out, 1, "updated", feed_updated);
    out.push_str("  <author>\n");
    element(&mut out, 2, "name", &header.title);
    out.push_str("  </author>\n");

    for entry in &feed.entries {
        let url = page_url(base, &entry.path);
        out.push_str("  <entry>\n");
        element(&mut out, 2, "title", &entry.title);
        link(&mut out, 2, None, &url);
        element(&mut out, 2, "id", &url);
        let updated = entry.timestamp.as_deref().unwrap_or(feed_updated);
        element(&mut out, 2, "updated", updated);
        element(&mut out, 2, "summary", &entry.description);
        if !entry.image.is_empty() {
            link(&mut out, 2, Some("enclosure"), &absolute(base, &entry.image));
        }
        out.push_str("  </entry>\n");
    }

    out.push_str("</feed>\n");
    out
}

fn element(out: &mut String, depth: usize, name: &str, text: &str) {
    let _ = writeln!(
        out,
        "{:indent$}<{name}>{}</{name}>",
        "",
        escape(text),
        indent = depth * 2
    );
}

fn link(out: &mut String, depth: usize, rel: Option<&str>, href: &str) {
    let rel = rel.map(|r| format!(" rel=\"{r}\"")).unwrap_or_default();
    let _ = writeln!(
        out,
        "{:indent$}<link{rel} href=\"{}\"/>",
        "",
        escape(href),
        indent = depth * 2
    );
}

fn page_url(base: &str, path: &str) -> String {
    format!("{base}/{path}")
}

/// Make a site-relative URL absolute; full URLs pass through.
fn absolute(base: &str, url: &str) -> String {
    if url.starts_with("http://") || url.starts_with("https://") {
        url.to_owned()
    } else {
        format!("{base}/{}", url.trim_start_matches('/'))
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use pretty_assertions::assert_eq;

    use super::*;
    use crate::page::{Page, PageSummary};

    fn header() -> Page {
        Page {
            filename: PathBuf::from("/site/index.md"),
            path: String::new(),
            title: "My Site".to_owned(),
            description: "Notes & things".to_owned(),
            keywords: String::new(),
            template: String::new(),
            image: String::new(),
            thumbnail: String::new(),
            timestamp: Some("2024-05-01T12:00:00Z".to_owned()),
            date: Some("May 1, 2024".to_owned()),
            weight: 0,
            body: None,
        }
    }

    fn entry(path: &str, title: &str, image: &str) -> PageSummary {
        PageSummary {
            filename: PathBuf::from(format!("/site/{path}.md")),
            path: path.to_owned(),
            title: title.to_owned(),
            description: "About it".to_owned(),
            keywords: String::new(),
            image: image.to_owned(),
            thumbnail: String::new(),
            timestamp: Some("2024-05-01T12:00:00Z".to_owned()),
            date: None,
            weight: 0,
        }
    }

    #[test]
    fn test_render_atom() {
        let feed = Feed {
            header: header(),
            entries: vec![entry("blog/post", "A <b> post", "")],
        };

        let xml = render_atom(&feed, "https://example.com/");

        assert_eq!(
            xml,
            "<?xml version=\"1.0\" encoding=\"utf-8\"?>\n\
             <feed xmlns=\"http://www.w3.org/2005/Atom\">\n  \
             <title>My Site</title>\n  \
             <subtitle>Notes &amp; things</subtitle>\n  \
             <link href=\"https://example.com/\"/>\n  \
             <id>https://example.com/</id>\n  \
             <updated>2024-05-01T12:00:00Z</updated>\n  \
             <author>\n    \
             <name>My Site</name>\n  \
             </author>\n  \
             <entry>\n    \
             <title>A &lt;b&gt; post</title>\n    \
             <link href=\"https://example.com/blog/post\"/>\n    \
             <id>https://example.com/blog/post</id>\n    \
             <updated>2024-05-01T12:00:00Z</updated>\n    \
             <summary>About it</summary>\n  \
             </entry>\n\
             </feed>\n"
        );
    }

    #[test]
    fn test_image_enclosure_is_absolute() {
        let feed = Feed {
            header: header(),
            entries: vec![
                entry("one", "One", "/img/one.png"),
                entry("two", "Two", "https://cdn.example.org/two.png"),
            ],
        };

        let xml = render_atom(&feed, "https://example.com");

        assert!(xml.contains("<link rel=\"enclosure\" href=\"https://example.com/img/one.png\"/>"));
        assert!(xml.contains("<link rel=\"enclosure\" href=\"https://cdn.example.org/two.png\"/>"));
    }

    #[test]
    fn test_untimed_entry_takes_feed_updated() {
        let mut untimed = entry("draft", "Draft", "");
        untimed.timestamp = None;
        let feed = Feed {
            header: header(),
            entries: vec![untimed],
        };

        let xml = render_atom(&feed, "https://example.com");

        assert_eq!(xml.matches("<updated>2024-05-01T12:00:00Z</updated>").count(), 2);
    }

    #[test]
    fn test_untimed_header_falls_back_to_newest_entry() {
        let mut header = header();
        header.timestamp = None;
        let mut newest = entry("new", "New", "");
        newest.timestamp = Some("2024-06-01T00:00:00Z".to_owned());
        let mut untimed = entry("old", "Old", "");
        untimed.timestamp = None;
        let feed = Feed {
            header,
            entries: vec![newest, untimed],
        };

        let xml = render_atom(&feed, "https://example.com");

        assert_eq!(xml.matches("<updated>2024-06-01T00:00:00Z</updated>").count(), 3);
        assert!(!xml.contains(EPOCH));
    }

    #[test]
    fn test_nothing_timed_uses_epoch() {
        let mut header = header();
        header.timestamp = None;
        let feed = Feed {
            header,
            entries: Vec::new(),
        };

        let xml = render_atom(&feed, "http://www.example.com");

        assert!(xml.contains("<updated>1970-01-01T00:00:00Z</updated>"));
        assert!(xml.contains("<author>\n    <name>My Site</name>\n  </author>"));
        assert!(xml.ends_with("</author>\n</feed>\n"));
    }
}

//! Page records.
//!
//! A [`Page`] is one parsed content file. A [`PageSummary`] is the same record
//! without `template` and `body`; summaries are what navigation records and
//! feeds carry.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Error returned when a page cannot be resolved.
#[derive(Debug, thiserror::Error)]
pub enum PageError {
    /// The path does not resolve to a content file under the content root.
    #[error("Page not found: {}", .0.display())]
    NotFound(PathBuf),
}

/// One fully loaded content file.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Page {
    /// Canonical path of the source file.
    pub filename: PathBuf,
    /// URL path relative to the content root (`""` for the root index page).
    pub path: String,
    pub title: String,
    pub description: String,
    pub keywords: String,
    pub template: String,
    pub image: String,
    pub thumbnail: String,
    pub timestamp: Option<String>,
    pub date: Option<String>,
    pub weight: i64,
    /// Rendered HTML body, if the file has a `Body:` line.
    pub body: Option<String>,
}

impl Page {
    /// Summary of this page, without `template` and `body`.
    #[must_use]
    pub fn summary(&self) -> PageSummary {
        self.clone().into_summary()
    }

    /// Convert into a summary, dropping `template` and `body`.
    #[must_use]
    pub fn into_summary(self) -> PageSummary {
        PageSummary {
            filename: self.filename,
            path: self.path,
            title: self.title,
            description: self.description,
            keywords: self.keywords,
            image: self.image,
            thumbnail: self.thumbnail,
            timestamp: self.timestamp,
            date: self.date,
            weight: self.weight,
        }
    }
}

/// Page metadata as stored in navigation records and feeds.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageSummary {
    pub filename: PathBuf,
    pub path: String,
    pub title: String,
    pub description: String,
    pub keywords: String,
    pub image: String,
    pub thumbnail: String,
    pub timestamp: Option<String>,
    pub date: Option<String>,
    pub weight: i64,
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn sample() -> Page {
        Page {
            filename: PathBuf::from("/site/markdown/sub/page1.md"),
            path: "sub/page1".to_owned(),
            title: "First".to_owned(),
            description: "The first page".to_owned(),
            keywords: "one".to_owned(),
            template: "article".to_owned(),
            image: "/img/one.png".to_owned(),
            thumbnail: String::new(),
            timestamp: Some("2024-03-01T10:00:00".to_owned()),
            date: Some("March 1, 2024".to_owned()),
            weight: 1,
            body: Some("<p>Hello</p>\n".to_owned()),
        }
    }

    #[test]
    fn test_summary_drops_template_and_body() {
        let summary = sample().summary();

        assert_eq!(summary.path, "sub/page1");
        assert_eq!(summary.title, "First");
        assert_eq!(summary.weight, 1);

        let json = serde_json::to_value(&summary).unwrap();
        assert!(json.get("template").is_none());
        assert!(json.get("body").is_none());
    }

    #[test]
    fn test_summary_json_shape() {
        let json = serde_json::to_string(&sample().into_summary()).unwrap();
        let back: PageSummary = serde_json::from_str(&json).unwrap();
        assert_eq!(back, sample().summary());
    }

    #[test]
    fn test_not_found_message() {
        let err = PageError::NotFound(PathBuf::from("../secrets"));
        assert_eq!(err.to_string(), "Page not found: ../secrets");
    }
}

//! Page file parser.
//!
//! Resolves a request path to a content file under the content root and reads
//! it into a [`Page`]. A page file is a header of `Label: value` lines
//! followed by a `Body:` line; everything after the `Body:` line is raw body
//! text, even lines that look like labels.
//!
//! ```text
//! Title: Hello
//! Weight: 2
//! Body:
//! Free *markup* text.
//! ```
//!
//! Parsing happens in two phases: header lines are matched against the known
//! labels until the first `Body:` line, then the remaining tail is taken
//! verbatim and handed to the [`MarkupRenderer`].

use std::fs;
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

use quire_markup::MarkupRenderer;

use crate::page::{Page, PageError};
use crate::schema::{ContentLayout, Field, PageDefaults};

/// Reads content files under a single content root.
pub struct PageParser {
    root: PathBuf,
    layout: ContentLayout,
    defaults: PageDefaults,
    renderer: Arc<dyn MarkupRenderer>,
}

impl PageParser {
    /// Create a parser for the content tree at `root`.
    ///
    /// # Errors
    ///
    /// Returns [`PageError::NotFound`] if `root` is not an existing directory.
    pub fn new(
        root: &Path,
        layout: ContentLayout,
        defaults: PageDefaults,
        renderer: Arc<dyn MarkupRenderer>,
    ) -> Result<Self, PageError> {
        let canonical = root
            .canonicalize()
            .map_err(|_| PageError::NotFound(root.to_path_buf()))?;
        if !canonical.is_dir() {
            return Err(PageError::NotFound(root.to_path_buf()));
        }
        Ok(Self {
            root: canonical,
            layout,
            defaults,
            renderer,
        })
    }

    /// Canonical content root.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    #[must_use]
    pub fn layout(&self) -> &ContentLayout {
        &self.layout
    }

    /// Whether `dir` contains an index page.
    #[must_use]
    pub fn has_index(&self, dir: &Path) -> bool {
        dir.join(self.layout.index_file_name()).is_file()
    }

    /// Resolve `path` to the canonical content file it names.
    ///
    /// Relative paths are taken against the content root. A directory resolves
    /// to its index page, and the content extension is appended when missing.
    ///
    /// # Errors
    ///
    /// Returns [`PageError::NotFound`] if the path contains a traversal
    /// segment, names no regular file, or resolves outside the content root.
    pub fn resolve(&self, path: &Path) -> Result<PathBuf, PageError> {
        let not_found = || PageError::NotFound(path.to_path_buf());

        let relative = path.strip_prefix(&self.root).unwrap_or(path);
        if has_traversal(relative) {
            return Err(not_found());
        }

        let mut file = self.root.join(relative);
        if file.is_dir() {
            file.push(self.layout.index_file_name());
        }
        let needs_extension = file
            .file_name()
            .is_none_or(|name| !self.layout.has_extension(&name.to_string_lossy()));
        if needs_extension {
            let mut with_ext = file.into_os_string();
            with_ext.push(".");
            with_ext.push(&self.layout.extension);
            file = PathBuf::from(with_ext);
        }

        let canonical = file.canonicalize().map_err(|_| not_found())?;
        if !canonical.starts_with(&self.root) || !canonical.is_file() {
            return Err(not_found());
        }
        Ok(canonical)
    }

    /// Load the page at `path`, rendering its body.
    ///
    /// # Errors
    ///
    /// Returns [`PageError::NotFound`] if the path does not resolve (see
    /// [`resolve`](Self::resolve)) or the file cannot be read.
    pub fn load(&self, path: &Path) -> Result<Page, PageError> {
        let file = self.resolve(path).inspect_err(|_| {
            tracing::debug!(path = %path.display(), "Page not found");
        })?;
        let bytes = fs::read(&file).map_err(|e| {
            tracing::debug!(path = %file.display(), error = %e, "Failed to read page");
            PageError::NotFound(path.to_path_buf())
        })?;
        let text = String::from_utf8_lossy(&bytes);
        Ok(self.parse(file, &text))
    }

    /// Build a page from file text; `filename` must be a canonical path under the root.
    pub(crate) fn parse(&self, filename: PathBuf, text: &str) -> Page {
        let (header, tail) = split_body(text);

        let mut page = Page {
            path: self.url_path(&filename),
            filename,
            title: self.defaults.title.clone(),
            description: self.defaults.description.clone(),
            keywords: self.defaults.keywords.clone(),
            template: self.defaults.template.clone(),
            image: self.defaults.image.clone(),
            thumbnail: self.defaults.thumbnail.clone(),
            timestamp: None,
            date: None,
            weight: 0,
            body: None,
        };

        for (field, value) in header {
            match field {
                Field::Title => page.title = value.to_owned(),
                Field::Description => page.description = value.to_owned(),
                Field::Keywords => page.keywords = value.to_owned(),
                Field::Template => page.template = value.to_owned(),
                Field::Image => page.image = value.to_owned(),
                Field::Thumbnail => page.thumbnail = value.to_owned(),
                Field::Timestamp => page.timestamp = non_empty(value),
                Field::Date => page.date = non_empty(value),
                Field::Weight => page.weight = value.trim().parse().unwrap_or(0),
                Field::Body => {}
            }
        }

        page.body = tail.map(|source| self.renderer.render(&source));
        page
    }

    /// URL path of a canonical content file, relative to the root.
    fn url_path(&self, file: &Path) -> String {
        let relative = file.strip_prefix(&self.root).unwrap_or(file);
        let mut parts: Vec<String> = relative
            .components()
            .filter_map(|c| match c {
                Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
                _ => None,
            })
            .collect();

        if let Some(last) = parts.pop()
            && last != self.layout.index_file_name()
        {
            parts.push(self.layout.strip_extension(&last).to_owned());
        }
        parts.join("/")
    }
}

/// Whether a request path tries to step outside its directory.
///
/// Rejects any `..` component and any occurrence of `./`.
pub(crate) fn has_traversal(path: &Path) -> bool {
    path.components().any(|c| matches!(c, Component::ParentDir))
        || path.to_string_lossy().contains("./")
}

/// Split page text into labelled header values and the raw body tail.
///
/// The tail is `None` when the text has no `Body:` line. A non-empty remainder
/// on the `Body:` line itself becomes the first body line.
fn split_body(text: &str) -> (Vec<(Field, &str)>, Option<String>) {
    let mut lines = text.lines();
    let mut header = Vec::new();
    let mut tail = None;

    for line in lines.by_ref() {
        match Field::match_line(line) {
            Some((Field::Body, rest)) => {
                let mut body = String::new();
                if !rest.is_empty() {
                    body.push_str(rest);
                    body.push('\n');
                }
                tail = Some(body);
                break;
            }
            Some(entry) => header.push(entry),
            None => {}
        }
    }

    if let Some(body) = tail.as_mut() {
        for line in lines {
            body.push_str(line);
            body.push('\n');
        }
    }
    (header, tail)
}

fn non_empty(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_owned())
}

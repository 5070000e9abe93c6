//! Content layout and page field schema.
//!
//! [`ContentLayout`] names the files that carry meaning inside a content
//! directory (index page, content extension, private prefix). [`PageDefaults`]
//! holds the placeholder values for fields a page file does not set. Both are
//! plain values handed to the parser so tests can substitute their own.

use std::path::Path;

/// File naming conventions inside the content tree.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ContentLayout {
    /// Stem of the index page (`index` for `index.md`).
    pub index: String,
    /// Content file extension, without the dot.
    pub extension: String,
    /// Files whose name starts with this prefix never appear in listings.
    pub private_prefix: String,
}

impl Default for ContentLayout {
    fn default() -> Self {
        Self {
            index: "index".to_owned(),
            extension: "md".to_owned(),
            private_prefix: "_".to_owned(),
        }
    }
}

impl ContentLayout {
    /// File name of a directory's index page (e.g. `index.md`).
    #[must_use]
    pub fn index_file_name(&self) -> String {
        format!("{}.{}", self.index, self.extension)
    }

    /// Whether `file` is an index page.
    #[must_use]
    pub fn is_index(&self, file: &Path) -> bool {
        file.file_name()
            .is_some_and(|name| name.to_string_lossy() == self.index_file_name())
    }

    /// Whether a file name carries the content extension.
    #[must_use]
    pub fn has_extension(&self, name: &str) -> bool {
        name.strip_suffix(&self.extension)
            .and_then(|stem| stem.strip_suffix('.'))
            .is_some_and(|stem| !stem.is_empty())
    }

    /// Strip the content extension from a file name, if present.
    #[must_use]
    pub fn strip_extension<'a>(&self, name: &'a str) -> &'a str {
        if self.has_extension(name) {
            &name[..name.len() - self.extension.len() - 1]
        } else {
            name
        }
    }

    /// Whether `name` can hold a navigation record without clobbering or
    /// shadowing content: a single path component without the content
    /// extension.
    #[must_use]
    pub fn is_record_name(&self, name: &str) -> bool {
        !name.is_empty()
            && !matches!(name, "." | "..")
            && !name.contains(['/', '\\'])
            && !name.ends_with(&format!(".{}", self.extension))
    }

    /// Whether a directory entry named `name` belongs in a `files` listing.
    ///
    /// Listed files carry the content extension, are not the index page and
    /// do not start with the private prefix.
    #[must_use]
    pub fn is_listed_file(&self, name: &str) -> bool {
        let private = !self.private_prefix.is_empty() && name.starts_with(&self.private_prefix);
        !private && self.has_extension(name) && name != self.index_file_name()
    }
}

/// Placeholder values for fields missing from a page file.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PageDefaults {
    pub title: String,
    pub description: String,
    pub keywords: String,
    pub template: String,
    pub image: String,
    pub thumbnail: String,
}

impl Default for PageDefaults {
    fn default() -> Self {
        Self {
            title: "Generic, Untitled Page".to_owned(),
            description: "No description available.".to_owned(),
            keywords: "keywords, key phrases".to_owned(),
            template: String::new(),
            image: String::new(),
            thumbnail: String::new(),
        }
    }
}

/// Labelled fields of a page file, in their conventional order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Field {
    Title,
    Description,
    Keywords,
    Template,
    Image,
    Thumbnail,
    Timestamp,
    Date,
    Weight,
    Body,
}

impl Field {
    pub(crate) const ALL: [Self; 10] = [
        Self::Title,
        Self::Description,
        Self::Keywords,
        Self::Template,
        Self::Image,
        Self::Thumbnail,
        Self::Timestamp,
        Self::Date,
        Self::Weight,
        Self::Body,
    ];

    /// Line label introducing the field, e.g. `Title:`.
    pub(crate) fn label(self) -> &'static str {
        match self {
            Self::Title => "Title:",
            Self::Description => "Description:",
            Self::Keywords => "Keywords:",
            Self::Template => "Template:",
            Self::Image => "Image:",
            Self::Thumbnail => "Thumbnail:",
            Self::Timestamp => "Timestamp:",
            Self::Date => "Date:",
            Self::Weight => "Weight:",
            Self::Body => "Body:",
        }
    }

    /// Match `line` against every label; returns the field and its value.
    ///
    /// The value is the remainder after the label, minus one leading space or tab.
    pub(crate) fn match_line(line: &str) -> Option<(Self, &str)> {
        Self::ALL.into_iter().find_map(|field| {
            let rest = line.strip_prefix(field.label())?;
            let value = rest
                .strip_prefix(' ')
                .or_else(|| rest.strip_prefix('\t'))
                .unwrap_or(rest);
            Some((field, value))
        })
    }
}

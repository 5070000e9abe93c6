//! Markup-to-HTML rendering seam for quire.
//!
//! Page bodies are handed to a [`MarkupRenderer`] after parsing. The content
//! engine treats the renderer as opaque: it only ever sees the HTML string
//! that comes back.
//!
//! - [`MarkdownRenderer`]: `CommonMark` rendering via `pulldown-cmark`
//! - Any `Fn(&str) -> String` closure, for tests and custom pipelines
//!
//! # Example
//!
//! ```
//! use quire_markup::{MarkdownRenderer, MarkupRenderer};
//!
//! let renderer = MarkdownRenderer::new();
//! let html = renderer.render("**Bold** text");
//! assert_eq!(html, "<p><strong>Bold</strong> text</p>\n");
//! ```

mod markdown;

pub use markdown::MarkdownRenderer;

/// Converts a page body from its source markup to HTML.
pub trait MarkupRenderer: Send + Sync {
    /// Render `source` to an HTML fragment.
    fn render(&self, source: &str) -> String;
}

impl<F> MarkupRenderer for F
where
    F: Fn(&str) -> String + Send + Sync,
{
    fn render(&self, source: &str) -> String {
        self(source)
    }
}

//! Flat-file content engine for quire.
//!
//! A directory tree of page files is the whole data model. This crate
//! provides:
//! - [`PageParser`]: Reads one page file into a [`Page`]
//! - [`NavigationCache`]: Per-directory sorted listings, persisted next to the content
//! - [`paginate`] and [`up_level`]: Sibling and parent lookup for a page
//! - [`Feed`]: Site-wide, newest-first aggregation of persisted listings
//! - [`Site`]: Facade combining the above for one content root
//!
//! # Quick Start
//!
//! ```no_run
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use std::path::{Path, PathBuf};
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
//! // After editing files in markdown/blog
//! site.rebuild_directory(Path::new("blog"))?;
//! site.write_feed(Path::new("atom.xml"), 20)?;
//! # Ok(())
//! # }
//! ```

mod atom;
mod feed;
mod navigation;
mod page;
mod pagination;
mod parser;
mod schema;
mod site;
mod walk;

pub use atom::render_atom;
pub use feed::{Feed, aggregate};
pub use navigation::{Navigation, NavigationCache};
pub use page::{Page, PageError, PageSummary};
pub use pagination::{Pagination, paginate, up_level};
pub use parser::PageParser;
pub use schema::{ContentLayout, PageDefaults};
pub use site::{PageContext, Site, SiteConfig, SiteError};
pub use walk::directories;

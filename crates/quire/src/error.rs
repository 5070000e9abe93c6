//! CLI error types.

use quire_config::ConfigError;
use quire_site::{PageError, SiteError};

/// CLI error type.
#[derive(Debug, thiserror::Error)]
pub(crate) enum CliError {
    #[error("{0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Site(#[from] SiteError),

    #[error("{0}")]
    Page(#[from] PageError),

    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to encode page context: {0}")]
    Json(#[from] serde_json::Error),
}

//! `quire rebuild` and `quire rebuild-all` command implementations.

use std::path::PathBuf;

use clap::Args;
use quire_config::CliSettings;

use crate::GlobalArgs;
use crate::error::CliError;
use crate::output::Output;
use crate::site::open_site;

/// Arguments for the rebuild command.
#[derive(Args)]
pub(crate) struct RebuildArgs {
    /// Content directory to rebuild, relative to the content root.
    dir: PathBuf,
}

impl RebuildArgs {
    /// Execute the rebuild command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration fails, the directory is not inside
    /// the content root, or its navigation cache cannot be written.
    pub(crate) fn execute(self, global: &GlobalArgs) -> Result<(), CliError> {
        let output = Output::new();
        let (_, site) = open_site(global, CliSettings::default())?;

        let nav = site.rebuild_directory(&self.dir)?;

        output.success(&format!(
            "Rebuilt {}: {} folders, {} files",
            self.dir.display(),
            nav.folders.len(),
            nav.files.len()
        ));
        Ok(())
    }
}

/// Execute the rebuild-all command.
///
/// # Errors
///
/// Returns an error if configuration fails or any navigation cache cannot be written.
pub(crate) fn rebuild_all(global: &GlobalArgs) -> Result<(), CliError> {
    let output = Output::new();
    let (_, site) = open_site(global, CliSettings::default())?;

    output.info(&format!("Content root: {}", site.root().display()));
    let count = site.rebuild_all()?;
    output.success(&format!("Rebuilt {count} navigation caches"));
    Ok(())
}

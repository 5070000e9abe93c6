//! `quire feed` command implementation.

use std::path::PathBuf;

use clap::Args;
use quire_config::CliSettings;

use crate::GlobalArgs;
use crate::error::CliError;
use crate::output::Output;
use crate::site::open_site;

/// Arguments for the feed command.
#[derive(Args)]
pub(crate) struct FeedArgs {
    /// Maximum number of entries (overrides config).
    #[arg(short, long)]
    pub limit: Option<usize>,

    /// Output file (overrides config).
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

impl FeedArgs {
    /// Execute the feed command.
    ///
    /// Only directories whose navigation cache already exists contribute
    /// entries; run `rebuild-all` first for a complete feed.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration fails, the root index page is
    /// missing, or the feed cannot be written.
    pub(crate) fn execute(self, global: &GlobalArgs) -> Result<(), CliError> {
        let output = Output::new();
        let settings = CliSettings {
            feed_limit: self.limit,
            feed_output: self.output,
            ..CliSettings::default()
        };
        let (config, site) = open_site(global, settings)?;
        let feed = &config.feed_resolved;

        let entries = site.write_feed(&feed.output, feed.limit)?;

        output.success(&format!(
            "Wrote {entries} entries to {}",
            feed.output.display()
        ));
        Ok(())
    }
}

//! `quire show` command implementation.

use std::fs;
use std::path::PathBuf;

use clap::Args;
use quire_config::CliSettings;

use crate::GlobalArgs;
use crate::error::CliError;
use crate::output::Output;
use crate::site::open_site;

/// Arguments for the show command.
#[derive(Args)]
pub(crate) struct ShowArgs {
    /// URL path of the page (e.g. `/blog/hello`; empty for the home page).
    #[arg(default_value = "")]
    url_path: String,

    /// Write the JSON to this file instead of stderr.
    #[arg(short, long)]
    output: Option<PathBuf>,
}

impl ShowArgs {
    /// Execute the show command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration fails, the page does not exist, or
    /// the output file cannot be written.
    pub(crate) fn execute(self, global: &GlobalArgs) -> Result<(), CliError> {
        let output = Output::new();
        let (_, site) = open_site(global, CliSettings::default())?;

        let page = site.resolve_page(&self.url_path)?;
        output.highlight(&format!("{} ({})", page.title, page.filename.display()));

        let context = site.context(page);
        let json = serde_json::to_string_pretty(&context)?;

        match self.output {
            Some(path) => {
                fs::write(&path, json)?;
                output.success(&format!("Context written to {}", path.display()));
            }
            None => output.info(&json),
        }
        Ok(())
    }
}

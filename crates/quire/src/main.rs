//! quire CLI - Flat-file content engine.
//!
//! Provides commands for:
//! - `rebuild`: Rebuild one directory's navigation cache
//! - `rebuild-all`: Rebuild every navigation cache in the content tree
//! - `feed`: Write the Atom feed
//! - `show`: Print the presentation context of a page as JSON

mod commands;
mod error;
mod output;
mod site;

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::{FeedArgs, RebuildArgs, ShowArgs};
use output::Output;

/// quire - Flat-file content engine.
#[derive(Parser)]
#[command(name = "quire", version, about)]
struct Cli {
    #[command(flatten)]
    global: GlobalArgs,

    #[command(subcommand)]
    command: Commands,
}

/// Options shared by every command.
#[derive(Args)]
pub(crate) struct GlobalArgs {
    /// Path to configuration file (default: auto-discover quire.toml).
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Content root directory (overrides config).
    #[arg(short, long, global = true, env = "QUIRE_ROOT")]
    pub root: Option<PathBuf>,

    /// Rebuild navigation caches older than their content (overrides config).
    #[arg(long, global = true)]
    pub check_stale: bool,

    /// Enable verbose output.
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Rebuild the navigation cache of one content directory.
    Rebuild(RebuildArgs),
    /// Rebuild the navigation cache of every directory with an index page.
    RebuildAll,
    /// Write the Atom feed.
    Feed(FeedArgs),
    /// Print the presentation context of a page as JSON.
    Show(ShowArgs),
}

fn main() {
    let cli = Cli::parse();
    let output = Output::new();

    // --verbose enables INFO level, otherwise use RUST_LOG
    let filter = if cli.global.verbose {
        EnvFilter::new("info")
    } else {
        EnvFilter::from_default_env()
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Commands::Rebuild(args) => args.execute(&cli.global),
        Commands::RebuildAll => commands::rebuild_all(&cli.global),
        Commands::Feed(args) => args.execute(&cli.global),
        Commands::Show(args) => args.execute(&cli.global),
    };

    if let Err(err) = result {
        output.error(&format!("Error: {err}"));
        std::process::exit(1);
    }
}

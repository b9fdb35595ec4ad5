// src/cli.rs
//! CLI definitions for repodeps
//!
//! Command-line interface definitions using clap; the command
//! implementations live in the `commands` module. With no subcommand
//! the tool drops into the interactive menu unless `--no-interactive`.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "repodeps")]
#[command(version)]
#[command(
    about = "Repository metadata client: resolve package dependency closures and download artifacts",
    long_about = None
)]
pub struct Cli {
    /// TOML config file path
    #[arg(short, long, default_value = "repodeps.toml")]
    pub config: PathBuf,

    /// Never fall back to the interactive menu
    #[arg(long)]
    pub no_interactive: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List indexed packages matching wildcard patterns
    List {
        /// Wildcard patterns (e.g. "nginx*", "lib?z")
        patterns: Vec<String>,
    },

    /// Show the transitive dependency closure of matching packages
    Resolve {
        /// Wildcard patterns selecting the seed packages
        patterns: Vec<String>,
    },

    /// Print artifact URLs for matching packages
    Urls {
        /// Wildcard patterns
        patterns: Vec<String>,

        /// Include the transitive dependency closure
        #[arg(long)]
        with_deps: bool,
    },

    /// Download artifacts for matching packages
    Download {
        /// Wildcard patterns
        patterns: Vec<String>,

        /// Include the transitive dependency closure
        #[arg(long)]
        with_deps: bool,
    },

    /// Force re-ingestion of the repository metadata
    Refresh,

    /// Remove the local metadata files
    Clean,

    /// Inspect or edit the configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Print the effective configuration
    Show,

    /// Write a default config file
    Init,

    /// Set one config field and save
    Set {
        /// Field name (e.g. base_url, downloader, only_latest_version)
        key: String,
        /// New value
        value: String,
    },
}

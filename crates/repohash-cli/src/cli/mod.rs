//! CLI for the repohash fetch-and-digest tool.

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use repohash_core::config;
use std::path::Path;

use commands::{run_checksum, run_pipeline};

/// Top-level CLI for repohash.
#[derive(Debug, Parser)]
#[command(name = "repohash")]
#[command(about = "Fetch N copies of a remote archive and report their SHA-256 digests", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Download the configured archive N times into a temporary
    /// workspace and print one digest per copy, in index order.
    Run {
        /// Number of copies to fetch and digest (defaults to the config value).
        #[arg(long, value_name = "N")]
        count: Option<usize>,
        /// Archive URL to download (defaults to the config value).
        #[arg(long, value_name = "URL")]
        url: Option<String>,
    },

    /// Compute SHA-256 of a local file.
    Checksum {
        /// Path to the file.
        path: String,
    },
}

impl CliCommand {
    pub async fn run_from_args() -> Result<()> {
        let cli = Cli::parse();
        let cfg = config::load_or_init()?;
        tracing::debug!("loaded config: {:?}", cfg);

        match cli.command {
            CliCommand::Run { count, url } => {
                run_pipeline(&cfg, count, url.as_deref()).await?;
            }
            CliCommand::Checksum { path } => run_checksum(Path::new(&path))?,
        }

        Ok(())
    }
}

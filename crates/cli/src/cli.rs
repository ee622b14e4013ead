use clap::{Parser, Subcommand};
use color_eyre::eyre;
use matcha_core::config::Config;
use tokio_util::sync::CancellationToken;

use crate::{consolidate, lookup};

/// Consolidate Matcha token search results into a symbol → chain → address map
#[derive(Parser)]
#[command(name = "matcha", about, version)]
pub(crate) struct Cli {
    /// Defaults to `consolidate` with the configured paths
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the consolidated token file from the per-symbol data folders
    Consolidate(consolidate::Consolidate),

    /// Print the addresses recorded for a symbol in the consolidated file
    Lookup(lookup::Lookup),
}

impl Default for Commands {
    fn default() -> Self {
        Self::Consolidate(consolidate::Consolidate::default())
    }
}

impl Cli {
    pub(crate) async fn run(self, config: Config, shutdown_token: CancellationToken) -> eyre::Result<()> {
        match self.command.unwrap_or_default() {
            Commands::Consolidate(cmd) => cmd.run(config, shutdown_token).await,
            Commands::Lookup(cmd) => cmd.run(config).await,
        }
    }
}

use std::path::PathBuf;

use color_eyre::eyre;
use matcha_core::{
    config::Config,
    consolidator::{Consolidator, SymbolOutcome},
};
use tokio_util::sync::CancellationToken;
use tracing::info;

#[derive(clap::Args, Debug, Default)]
pub(crate) struct Consolidate {
    /// Folder with one `<SYMBOL>/<SYMBOL>_data.json` per token [default: from config]
    #[arg(long)]
    pub data_dir: Option<PathBuf>,

    /// Where to write the consolidated JSON [default: from config]
    #[arg(long)]
    pub output: Option<PathBuf>,
}

impl Consolidate {
    pub(crate) async fn run(self, config: Config, shutdown_token: CancellationToken) -> eyre::Result<()> {
        let data_dir = self.data_dir.unwrap_or(config.data_dir);
        let output = self.output.unwrap_or(config.output);

        info!(data_dir = %data_dir.display(), output = %output.display(), "consolidating token data");

        let report = Consolidator::new(data_dir, output, shutdown_token)
            .run(print_outcome)
            .await?;

        println!("\n=== Total: {} tokens ===", report.selected);
        Ok(())
    }
}

/// One progress line per written or failed symbol. Skipped folders stay quiet.
fn print_outcome(symbol: &str, outcome: &eyre::Result<SymbolOutcome>) {
    match outcome {
        Ok(SymbolOutcome::Selected(chains)) => println!("✓ {symbol}: {} chains", chains.len()),
        Ok(_) => {}
        Err(e) => println!("✗ {symbol}: {e:#}"),
    }
}

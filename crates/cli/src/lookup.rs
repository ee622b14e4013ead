use std::path::PathBuf;

use color_eyre::eyre::{self, OptionExt as _, eyre};
use matcha_core::{chain::chain_name, config::Config, lookup::TokenLookup};

#[derive(clap::Args, Debug)]
pub(crate) struct Lookup {
    /// Token symbol, matched case-insensitively
    #[arg(long)]
    pub symbol: String,

    /// Only print the address on this chain
    #[arg(long)]
    pub chain_id: Option<u64>,

    /// Consolidated file to read [default: configured output]
    #[arg(long)]
    pub input: Option<PathBuf>,
}

impl Lookup {
    pub(crate) async fn run(self, config: Config) -> eyre::Result<()> {
        let input = self.input.unwrap_or(config.output);
        let lookup = TokenLookup::load(&input).await?;
        if lookup.is_empty() {
            return Err(eyre!("`{}` holds no tokens", input.display()));
        }

        let chains = lookup.resolve(&self.symbol).ok_or_else(|| {
            eyre!("symbol `{}` not found in `{}`", self.symbol, input.display())
        })?;

        match self.chain_id {
            Some(chain_id) => {
                let address = chains.get(&chain_id).ok_or_eyre(format!(
                    "symbol `{}` has no address on chain {chain_id}",
                    self.symbol
                ))?;
                println!("{address}");
            }
            None => {
                if chains.is_empty() {
                    return Err(eyre!("symbol `{}` has no EVM chain addresses", self.symbol));
                }
                for (chain_id, address) in chains {
                    println!("{chain_id} ({}): {address}", chain_name(*chain_id));
                }
            }
        }

        Ok(())
    }
}

use std::{
    fmt,
    path::{Path, PathBuf},
};

use color_eyre::eyre::{self, Context as _, eyre};
use tokio::fs;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument, warn};

use crate::{
    consolidated::ConsolidatedTokens,
    selection::{self, ChainAddresses},
    token::TokenData,
};

/// What happened to a single symbol folder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SymbolOutcome {
    Selected(ChainAddresses),
    MissingDataFile,
    /// `success` was not true or the token list was empty.
    Unusable,
    NoCandidates,
}

/// Per-run tallies, one bucket per [`SymbolOutcome`] plus failures.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConsolidationReport {
    pub selected: usize,
    pub missing_data_file: usize,
    pub unusable: usize,
    pub no_candidates: usize,
    pub failed: usize,
}

impl ConsolidationReport {
    fn record(&mut self, outcome: &SymbolOutcome) {
        match outcome {
            SymbolOutcome::Selected(_) => self.selected += 1,
            SymbolOutcome::MissingDataFile => self.missing_data_file += 1,
            SymbolOutcome::Unusable => self.unusable += 1,
            SymbolOutcome::NoCandidates => self.no_candidates += 1,
        }
    }
}

impl fmt::Display for ConsolidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "selected={} missing={} unusable={} no_candidates={} failed={}",
            self.selected, self.missing_data_file, self.unusable, self.no_candidates, self.failed
        )
    }
}

/// Batch job turning `<data_dir>/<symbol>/<symbol>_data.json` files into one
/// symbol → chain → address file.
#[derive(Debug, Clone)]
pub struct Consolidator {
    data_dir: PathBuf,
    output: PathBuf,
    shutdown_token: CancellationToken,
}

impl Consolidator {
    pub fn new(
        data_dir: impl Into<PathBuf>,
        output: impl Into<PathBuf>,
        shutdown_token: CancellationToken,
    ) -> Self {
        Self {
            data_dir: data_dir.into(),
            output: output.into(),
            shutdown_token,
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn output(&self) -> &Path {
        &self.output
    }

    /// Consolidates every symbol folder and writes the output file once at the end.
    ///
    /// `on_symbol` sees every folder's outcome as soon as it is known.
    ///
    /// # Errors
    /// Returns an error if the data directory cannot be listed, the output cannot
    /// be written, or the run was cancelled. Nothing is written in the last case.
    #[instrument(skip_all, fields(data_dir = %self.data_dir.display(), output = %self.output.display()))]
    pub async fn run<F>(&self, on_symbol: F) -> eyre::Result<ConsolidationReport>
    where
        F: FnMut(&str, &eyre::Result<SymbolOutcome>),
    {
        let (tokens, report) = self.consolidate(on_symbol).await?;

        if self.shutdown_token.is_cancelled() {
            return Err(eyre!("consolidation cancelled, output not written"));
        }

        if tokens.is_empty() {
            warn!("no symbol yielded an address, writing an empty mapping");
        }
        tokens.write(&self.output).await?;

        info!(%report, "consolidated tokens written");

        Ok(report)
    }

    /// Walks the data directory and selects addresses for every symbol folder.
    ///
    /// A failing symbol is handed to `on_symbol` and skipped; it never aborts
    /// the walk.
    ///
    /// # Errors
    /// Returns an error if the data directory cannot be listed or the run was cancelled.
    pub async fn consolidate<F>(
        &self,
        mut on_symbol: F,
    ) -> eyre::Result<(ConsolidatedTokens, ConsolidationReport)>
    where
        F: FnMut(&str, &eyre::Result<SymbolOutcome>),
    {
        let mut entries = fs::read_dir(&self.data_dir).await.wrap_err_with(|| {
            format!("failed to list data directory `{}`", self.data_dir.display())
        })?;

        let mut tokens = ConsolidatedTokens::default();
        let mut report = ConsolidationReport::default();

        while let Some(entry) = entries
            .next_entry()
            .await
            .wrap_err("failed to read data directory entry")?
        {
            if self.shutdown_token.is_cancelled() {
                return Err(eyre!("consolidation cancelled, output not written"));
            }

            let path = entry.path();
            // follows symlinks, like a plain `is_dir` check
            if !fs::metadata(&path).await.is_ok_and(|meta| meta.is_dir()) {
                continue;
            }

            let Ok(symbol) = entry.file_name().into_string() else {
                warn!(path = %path.display(), "skipping folder with non UTF-8 name");
                continue;
            };

            let outcome = self.process_symbol(&path, &symbol).await;
            on_symbol(&symbol, &outcome);

            match outcome {
                Ok(SymbolOutcome::Selected(chains)) => {
                    report.selected += 1;
                    debug!(%symbol, chains = chains.len(), "selected token addresses");
                    tokens.insert(symbol, chains);
                }
                Ok(skipped) => report.record(&skipped),
                Err(e) => {
                    let error = format!("{e:#}");
                    warn!(%symbol, %error, "failed processing symbol");
                    report.failed += 1;
                }
            }
        }

        Ok((tokens, report))
    }

    /// Selects the addresses for the symbol stored in `folder`.
    ///
    /// # Errors
    /// Returns an error if the data file cannot be read or parsed, or a
    /// qualifying token is incomplete.
    pub async fn process_symbol(&self, folder: &Path, symbol: &str) -> eyre::Result<SymbolOutcome> {
        let data_file = folder.join(format!("{symbol}_data.json"));
        if !fs::try_exists(&data_file).await.unwrap_or(false) {
            debug!(%symbol, "no data file");
            return Ok(SymbolOutcome::MissingDataFile);
        }

        let bytes = fs::read(&data_file)
            .await
            .wrap_err_with(|| format!("failed to read `{}`", data_file.display()))?;
        let data = TokenData::from_slice(&bytes)?;

        if !data.is_usable() {
            debug!(%symbol, success = ?data.success, "unusable token data");
            return Ok(SymbolOutcome::Unusable);
        }

        let chains = selection::select(symbol, data.tokens())?;
        if chains.is_empty() {
            debug!(%symbol, tokens = data.tokens().len(), "no qualifying token");
            return Ok(SymbolOutcome::NoCandidates);
        }

        Ok(SymbolOutcome::Selected(chains))
    }
}

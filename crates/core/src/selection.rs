//! Picks the best contract address per chain out of a symbol's search results.
//!
//! A token is a candidate when its symbol matches the folder symbol
//! case-insensitively, it is listed on a DEX and it is not flagged as a
//! honeypot. Candidates are ranked by monthly USD volume and the first one seen
//! on each chain wins.

use std::{cmp::Ordering, collections::BTreeMap};

use color_eyre::eyre::{self, Context as _};

use crate::token::{ChainId, Token};

/// Chain id (stringified) to contract address.
pub type ChainAddresses = BTreeMap<String, String>;

#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    pub address: String,
    pub chain_id: ChainId,
    pub volume: f64,
}

/// Turns `token` into a candidate for the folder whose upper-cased symbol is `wanted`.
///
/// Tokens with another symbol are skipped without looking at their other
/// fields. Only a token that matches has its flags, volume, address and chain
/// id type-checked.
///
/// # Errors
/// Returns an error if a matching token has malformed flags or volume, or
/// qualifies without a usable address or chain id.
pub fn candidate(wanted: &str, token: &Token) -> eyre::Result<Option<Candidate>> {
    let Some(symbol) = token.symbol() else {
        return Ok(None);
    };
    if symbol.to_uppercase() != wanted {
        return Ok(None);
    }

    let context = || format!("token `{symbol}`");
    if !token.is_in_dex().wrap_err_with(context)? || token.is_honeypot().wrap_err_with(context)? {
        return Ok(None);
    }

    Ok(Some(Candidate {
        address: token.address().wrap_err_with(context)?.to_string(),
        chain_id: token.chain_id().wrap_err_with(context)?,
        volume: token.volume().wrap_err_with(context)?,
    }))
}

/// Collects the qualifying tokens of `folder_symbol` in their original order.
///
/// # Errors
/// Returns an error if a token matching the symbol is malformed.
pub fn candidates(folder_symbol: &str, tokens: &[Token]) -> eyre::Result<Vec<Candidate>> {
    let wanted = folder_symbol.to_uppercase();

    tokens
        .iter()
        .filter_map(|token| candidate(&wanted, token).transpose())
        .collect()
}

/// Sorts by volume, highest first. Equal volumes keep their relative order.
pub fn sort_by_volume(candidates: &mut [Candidate]) {
    candidates.sort_by(|a, b| b.volume.partial_cmp(&a.volume).unwrap_or(Ordering::Equal));
}

/// Keeps the first candidate seen for every chain.
pub fn best_per_chain(sorted: &[Candidate]) -> ChainAddresses {
    let mut chains = ChainAddresses::new();
    for candidate in sorted {
        chains
            .entry(candidate.chain_id.to_string())
            .or_insert_with(|| candidate.address.clone());
    }
    chains
}

/// Runs the full selection for one symbol folder.
///
/// # Errors
/// Returns an error if a token matching the symbol is malformed.
pub fn select(folder_symbol: &str, tokens: &[Token]) -> eyre::Result<ChainAddresses> {
    let mut candidates = candidates(folder_symbol, tokens)?;
    sort_by_volume(&mut candidates);
    Ok(best_per_chain(&candidates))
}

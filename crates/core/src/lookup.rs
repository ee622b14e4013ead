use std::{
    collections::{BTreeMap, HashMap},
    path::Path,
};

use color_eyre::eyre;
use tracing::debug;

use crate::consolidated::ConsolidatedTokens;

/// Numeric chain id to contract address.
pub type ChainTokens = BTreeMap<u64, String>;

/// Read side of the consolidated file: symbol → chain id → address.
///
/// Symbols are stored and queried upper-cased. Chain keys that are not
/// unsigned integers (non-EVM networks) are dropped.
#[derive(Debug, Clone, Default)]
pub struct TokenLookup {
    tokens: HashMap<String, ChainTokens>,
}

impl TokenLookup {
    /// Loads a consolidated file written by [`crate::consolidator::Consolidator`].
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or is not a consolidated mapping.
    pub async fn load(path: impl AsRef<Path>) -> eyre::Result<Self> {
        let consolidated = ConsolidatedTokens::read(path).await?;
        Ok(Self::from_consolidated(consolidated))
    }

    pub fn from_consolidated(consolidated: ConsolidatedTokens) -> Self {
        let mut tokens: HashMap<String, ChainTokens> = HashMap::new();

        for (symbol, chains) in consolidated {
            let converted: ChainTokens = chains
                .into_iter()
                .filter_map(|(chain, address)| match chain.parse::<u64>() {
                    Ok(id) => Some((id, address)),
                    Err(_) => {
                        debug!(%symbol, %chain, "dropping non-numeric chain id");
                        None
                    }
                })
                .collect();

            // sorted input, so an upper-case folder wins over its lower-case twin
            tokens.entry(symbol.to_uppercase()).or_insert(converted);
        }

        Self { tokens }
    }

    pub fn resolve(&self, symbol: &str) -> Option<&ChainTokens> {
        self.tokens.get(&symbol.to_uppercase())
    }

    pub fn address(&self, symbol: &str, chain_id: u64) -> Option<&str> {
        self.resolve(symbol)?.get(&chain_id).map(String::as_str)
    }

    pub fn symbols(&self) -> impl Iterator<Item = &str> {
        self.tokens.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::selection::ChainAddresses;

    fn lookup() -> TokenLookup {
        TokenLookup::from_consolidated(ConsolidatedTokens::from_iter([
            (
                "USDC".to_string(),
                ChainAddresses::from([
                    ("1".into(), "0xA0b86991c6218b36c1d19D4a2e9Eb0cE3606eB48".into()),
                    ("8453".into(), "0x833589fCD6eDb6E08f4c7C32D4f71b54bdA02913".into()),
                    ("solana".into(), "EPjFWdd5AufqSSqeM2qN1xzybapC8G4wEGGkZwyTDt1v".into()),
                ]),
            ),
            (
                "jup".to_string(),
                ChainAddresses::from([("solana".into(), "JUPyiw".into())]),
            ),
        ]))
    }

    #[test]
    fn resolve_is_case_insensitive() {
        let lookup = lookup();

        let chains = lookup.resolve("usdc").unwrap();

        assert_eq!(chains.keys().copied().collect::<Vec<_>>(), [1, 8453]);
        assert_eq!(
            lookup.address("Usdc", 8453),
            Some("0x833589fCD6eDb6E08f4c7C32D4f71b54bdA02913")
        );
    }

    #[test]
    fn unknown_symbol_or_chain_resolves_to_none() {
        let lookup = lookup();

        assert!(lookup.resolve("DOGE").is_none());
        assert!(lookup.address("USDC", 56).is_none());
    }

    #[test]
    fn symbols_with_only_non_numeric_chains_resolve_empty() {
        let lookup = lookup();

        assert_eq!(lookup.len(), 2);
        assert!(lookup.resolve("JUP").unwrap().is_empty());
    }

    #[test]
    fn empty_file_gives_empty_lookup() {
        let lookup = TokenLookup::from_consolidated(ConsolidatedTokens::default());

        assert!(lookup.is_empty());
        assert!(!self::lookup().is_empty());
    }

    #[tokio::test]
    async fn load_reads_consolidated_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("matcha_tokens_consolidated.json");
        std::fs::write(&path, r#"{"ETH": {"1": "0xB", "10": "0xC"}}"#).unwrap();

        let lookup = TokenLookup::load(&path).await.unwrap();

        assert_eq!(lookup.symbols().collect::<Vec<_>>(), ["ETH"]);
        assert_eq!(lookup.address("eth", 10), Some("0xC"));
    }

    #[tokio::test]
    async fn load_rejects_wrong_shape() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.json");
        std::fs::write(&path, r#"{"ETH": ["0xB"]}"#).unwrap();

        assert!(TokenLookup::load(&path).await.is_err());
    }
}

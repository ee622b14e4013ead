use std::{collections::BTreeMap, path::Path};

use color_eyre::eyre::{self, Context as _};
use serde::{Deserialize, Serialize};
use tokio::fs;

use crate::selection::ChainAddresses;

/// Symbol to per-chain contract address, as written to the consolidated file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConsolidatedTokens(BTreeMap<String, ChainAddresses>);

impl ConsolidatedTokens {
    pub fn insert(&mut self, symbol: String, chains: ChainAddresses) {
        self.0.insert(symbol, chains);
    }

    pub fn get(&self, symbol: &str) -> Option<&ChainAddresses> {
        self.0.get(symbol)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Two-space indented JSON.
    pub fn to_json_pretty(&self) -> eyre::Result<String> {
        serde_json::to_string_pretty(self).wrap_err("failed to serialize consolidated tokens")
    }

    pub fn from_slice(bytes: &[u8]) -> eyre::Result<Self> {
        serde_json::from_slice(bytes).wrap_err("failed to parse consolidated tokens")
    }

    pub async fn read(path: impl AsRef<Path>) -> eyre::Result<Self> {
        let path = path.as_ref();
        let bytes = fs::read(path)
            .await
            .wrap_err_with(|| format!("failed to read `{}`", path.display()))?;
        Self::from_slice(&bytes)
    }

    /// Writes the whole mapping in a single write.
    pub async fn write(&self, path: impl AsRef<Path>) -> eyre::Result<()> {
        let path = path.as_ref();
        let json = self.to_json_pretty()?;
        fs::write(path, json)
            .await
            .wrap_err_with(|| format!("failed to write `{}`", path.display()))
    }
}

impl IntoIterator for ConsolidatedTokens {
    type Item = (String, ChainAddresses);
    type IntoIter = std::collections::btree_map::IntoIter<String, ChainAddresses>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl FromIterator<(String, ChainAddresses)> for ConsolidatedTokens {
    fn from_iter<I: IntoIterator<Item = (String, ChainAddresses)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

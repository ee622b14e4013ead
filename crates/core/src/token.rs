use std::fmt::{self, Display};

use color_eyre::eyre::{self, Context as _, OptionExt as _, eyre};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Contents of a `<symbol>_data.json` file.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TokenData {
    #[serde(default)]
    pub success: Option<bool>,

    #[serde(default)]
    pub tokens: Option<Vec<Token>>,
}

impl TokenData {
    pub fn from_slice(bytes: &[u8]) -> eyre::Result<Self> {
        serde_json::from_slice(bytes).wrap_err("failed to parse token data")
    }

    /// Whether the search succeeded and returned at least one token.
    pub fn is_usable(&self) -> bool {
        self.success.unwrap_or(false) && !self.tokens().is_empty()
    }

    pub fn tokens(&self) -> &[Token] {
        self.tokens.as_deref().unwrap_or_default()
    }
}

/// A single token search result.
///
/// Fields are kept as raw JSON and only type-checked through the accessors,
/// so a malformed record that never matches the folder symbol cannot fail
/// the whole file. Everything not listed here (`decimals`, `name`, ...) is
/// ignored.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Token {
    #[serde(default)]
    pub symbol: Option<Value>,

    #[serde(default)]
    pub address: Option<Value>,

    #[serde(default)]
    pub chain_id: Option<Value>,

    #[serde(default)]
    pub is_in_dex: Option<Value>,

    #[serde(default)]
    pub is_honeypot: Option<Value>,

    #[serde(default)]
    pub volume_usd_monthly: Option<Value>,
}

impl Token {
    /// The ticker, if the record carries one as a string.
    pub fn symbol(&self) -> Option<&str> {
        self.symbol.as_ref().and_then(Value::as_str)
    }

    pub fn is_in_dex(&self) -> eyre::Result<bool> {
        flag(self.is_in_dex.as_ref(), "isInDex")
    }

    pub fn is_honeypot(&self) -> eyre::Result<bool> {
        flag(self.is_honeypot.as_ref(), "isHoneypot")
    }

    /// Monthly USD volume, with a missing or null value counted as zero.
    pub fn volume(&self) -> eyre::Result<f64> {
        match &self.volume_usd_monthly {
            None | Some(Value::Null) => Ok(0.0),
            Some(Value::Number(volume)) => volume
                .as_f64()
                .ok_or_eyre("`volumeUsdMonthly` does not fit a float"),
            Some(other) => Err(eyre!("`volumeUsdMonthly` is not a number: {other}")),
        }
    }

    pub fn address(&self) -> eyre::Result<&str> {
        match &self.address {
            None | Some(Value::Null) => Err(eyre!("qualifying token has no `address`")),
            Some(Value::String(address)) => Ok(address.as_str()),
            Some(other) => Err(eyre!("`address` is not a string: {other}")),
        }
    }

    pub fn chain_id(&self) -> eyre::Result<ChainId> {
        match &self.chain_id {
            None | Some(Value::Null) => Err(eyre!("qualifying token has no `chainId`")),
            Some(Value::Number(id)) => Ok(ChainId::Numeric(id.clone())),
            Some(Value::String(id)) => Ok(ChainId::Text(id.clone())),
            Some(other) => Err(eyre!("`chainId` is neither a number nor a string: {other}")),
        }
    }
}

/// Absent and null count as `false`.
fn flag(value: Option<&Value>, field: &str) -> eyre::Result<bool> {
    match value {
        None | Some(Value::Null) => Ok(false),
        Some(Value::Bool(flag)) => Ok(*flag),
        Some(other) => Err(eyre!("`{field}` is not a boolean: {other}")),
    }
}

/// Chain identifier as found in the data files, either numeric or textual.
///
/// The [`Display`] form is used as the chain key of the consolidated output.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ChainId {
    Numeric(serde_json::Number),
    Text(String),
}

impl From<u64> for ChainId {
    fn from(id: u64) -> Self {
        Self::Numeric(id.into())
    }
}

impl Display for ChainId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChainId::Numeric(id) => write!(f, "{id}"),
            ChainId::Text(id) => f.write_str(id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_full_token_record() {
        let data = TokenData::from_slice(
            br#"{
                "success": true,
                "tokens": [{
                    "symbol": "USDC",
                    "name": "USD Coin",
                    "address": "0xa0b86991c6218b36c1d19d4a2e9eb0ce3606eb48",
                    "chainId": 1,
                    "decimals": 6,
                    "isInDex": true,
                    "isHoneypot": false,
                    "volumeUsdMonthly": 1250000.5
                }]
            }"#,
        )
        .unwrap();

        assert!(data.is_usable());
        let token = &data.tokens()[0];
        assert_eq!(token.symbol(), Some("USDC"));
        assert_eq!(token.address().unwrap(), "0xa0b86991c6218b36c1d19d4a2e9eb0ce3606eb48");
        assert_eq!(token.chain_id().unwrap(), ChainId::from(1));
        assert!(token.is_in_dex().unwrap());
        assert!(!token.is_honeypot().unwrap());
        assert_eq!(token.volume().unwrap(), 1250000.5);
    }

    #[test]
    fn missing_fields_take_defaults() {
        let data = TokenData::from_slice(
            br#"{"success": true, "tokens": [{"volumeUsdMonthly": null}]}"#,
        )
        .unwrap();
        let token = &data.tokens()[0];

        assert_eq!(token.symbol(), None);
        assert!(!token.is_in_dex().unwrap());
        assert!(!token.is_honeypot().unwrap());
        assert_eq!(token.volume().unwrap(), 0.0);
        assert!(token.address().is_err());
        assert!(token.chain_id().is_err());
    }

    #[test]
    fn odd_field_types_do_not_fail_parsing() {
        let data = TokenData::from_slice(
            br#"{"success": true, "tokens": [
                {"symbol": "ETH", "decimals": 18.0, "address": "0xB", "chainId": 1},
                {"symbol": 42, "decimals": -1, "isInDex": "yes", "volumeUsdMonthly": "lots"}
            ]}"#,
        )
        .unwrap();

        assert_eq!(data.tokens().len(), 2);
        let odd = &data.tokens()[1];
        assert_eq!(odd.symbol(), None);
        assert!(odd.is_in_dex().is_err());
        assert!(odd.volume().is_err());
    }

    #[test]
    fn unsuccessful_or_empty_data_is_not_usable() {
        for raw in [
            r#"{"success": false, "tokens": [{"symbol": "ETH"}]}"#,
            r#"{"success": true, "tokens": []}"#,
            r#"{"success": true}"#,
            r#"{"success": null, "tokens": [{"symbol": "ETH"}]}"#,
            r#"{}"#,
        ] {
            let data = TokenData::from_slice(raw.as_bytes()).unwrap();
            assert!(!data.is_usable(), "{raw} should not be usable");
        }
    }

    #[test]
    fn chain_ids_render_like_their_json_source() {
        let ids: Vec<ChainId> = serde_json::from_str(r#"[1, "solana", 8453, 1.5]"#).unwrap();
        let rendered: Vec<String> = ids.iter().map(ToString::to_string).collect();

        assert_eq!(rendered, ["1", "solana", "8453", "1.5"]);
    }

    #[test]
    fn malformed_json_is_an_error() {
        let err = TokenData::from_slice(b"{\"success\": true, \"tokens\": [").unwrap_err();
        assert!(format!("{err:#}").starts_with("failed to parse token data"));
    }
}

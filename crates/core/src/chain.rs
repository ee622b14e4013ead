use alloy_chains::Chain;

/// Network name for an EVM chain id, e.g. `1` → `mainnet`, `8453` → `base`.
///
/// Unknown ids are rendered as the bare number.
pub fn chain_name(chain_id: u64) -> String {
    Chain::from_id(chain_id).to_string()
}

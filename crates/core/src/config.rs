use std::path::PathBuf;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Yaml},
};
use serde::{Deserialize, Serialize};

/// Folder holding one `<symbol>/<symbol>_data.json` per token.
pub const DEFAULT_DATA_DIR: &str = "upbit_matcha_tokens_2025-12-30T01-58-55";

pub const DEFAULT_OUTPUT: &str = "matcha_tokens_consolidated.json";

pub const CONFIG_FILE: &str = "matcha.yaml";

pub const ENV_PREFIX: &str = "MATCHA_";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Root of the per-symbol token data
    pub data_dir: PathBuf,

    /// Consolidated symbol → chain → address file
    pub output: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            output: PathBuf::from(DEFAULT_OUTPUT),
        }
    }
}

impl Config {
    /// Load configuration from defaults, an optional `matcha.yaml` and `MATCHA_*` env vars
    pub fn load() -> Result<Self, figment::Error> {
        let config: Config = Figment::from(Serialized::defaults(Config::default()))
            .merge(Yaml::file(CONFIG_FILE))
            .merge(Env::prefixed(ENV_PREFIX))
            .extract()?;

        Ok(config)
    }
}

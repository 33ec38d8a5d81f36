use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::layout::LayoutConfig;

pub const DEFAULT_STORAGE_PREFIX: &str = "skillorbit:graph:";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub layout: LayoutConfig,
    /// Key prefix for saved graph snapshots.
    pub storage_prefix: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            layout: LayoutConfig::default(),
            storage_prefix: DEFAULT_STORAGE_PREFIX.to_string(),
        }
    }
}

impl Config {
    /// Parse and validate. Blank input means all defaults.
    pub fn from_json(input: &str) -> Result<Config, ConfigError> {
        let cfg: Config = if input.trim().is_empty() {
            Config::default()
        } else {
            serde_json::from_str(input)?
        };
        cfg.layout.validate()?;
        Ok(cfg)
    }
}

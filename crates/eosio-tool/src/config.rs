use std::path::Path;

use anyhow::Result;
use eosio_core::LEGACY_PREFIX;
use serde::{Deserialize, Serialize};

/// Public key output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum KeyFormat {
    /// PUB_K1_...
    #[default]
    Modern,
    /// EOS...
    Legacy,
}

/// Tool configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolConfig {
    /// Log level (error, warn, info, debug, trace)
    pub log_level: String,

    /// Format used when printing public keys
    pub key_format: KeyFormat,

    /// Prefix for legacy key strings
    pub legacy_prefix: String,

    /// Curve tag used by `--check` when none is given
    pub checksum_tag: String,
}

impl Default for ToolConfig {
    fn default() -> Self {
        ToolConfig {
            log_level: "info".to_string(),
            key_format: KeyFormat::Modern,
            legacy_prefix: LEGACY_PREFIX.to_string(),
            checksum_tag: "K1".to_string(),
        }
    }
}

impl ToolConfig {
    /// Load config from file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: ToolConfig = serde_json::from_str(&content)?;
        Ok(config)
    }

    /// Save config to file
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

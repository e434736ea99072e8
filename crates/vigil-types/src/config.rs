use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Top-level configuration for a vigil deployment.
///
/// `min_pulse_amount` is a `u64` here because TOML integers cap at 64 bits;
/// the registry widens it to `Amount` at construction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VigilConfig {
    /// Seconds after the last pulse before an agent is considered dead.
    #[serde(default = "default_ttl_seconds")]
    pub ttl_seconds: u64,

    /// Minimum token amount a pulse must carry.
    #[serde(default = "default_min_pulse_amount")]
    pub min_pulse_amount: u64,

    /// Protocol-fee share of each pulse payment, in basis points.
    /// The remainder of the payment is burned.
    #[serde(default = "default_fee_bps")]
    pub fee_bps: u16,

    /// Tracing filter directive for the embedding process.
    #[serde(default = "default_log_filter")]
    pub log_filter: String,
}

fn default_ttl_seconds() -> u64 {
    259_200 // three days
}

fn default_min_pulse_amount() -> u64 {
    1
}

fn default_fee_bps() -> u16 {
    1_000
}

fn default_log_filter() -> String {
    "info".to_string()
}

impl Default for VigilConfig {
    fn default() -> Self {
        Self {
            ttl_seconds: default_ttl_seconds(),
            min_pulse_amount: default_min_pulse_amount(),
            fee_bps: default_fee_bps(),
            log_filter: default_log_filter(),
        }
    }
}

impl VigilConfig {
    /// Config file path within the state directory.
    pub fn config_path(state_dir: &Path) -> PathBuf {
        state_dir.join("vigil.toml")
    }

    /// Load config from disk. Returns default if not found.
    pub fn load(state_dir: &Path) -> Result<Self> {
        let path = Self::config_path(state_dir);
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(&path).context("Failed to read config file")?;
        let config: Self = toml::from_str(&content).context("Failed to parse config file")?;
        Ok(config)
    }

    /// Save config to disk.
    pub fn save(&self, state_dir: &Path) -> Result<()> {
        let path = Self::config_path(state_dir);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).context("Failed to create config directory")?;
        }
        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;
        std::fs::write(&path, content).context("Failed to write config file")?;
        Ok(())
    }
}

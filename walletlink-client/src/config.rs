//! Configuration management for walletlink clients
//!
//! This module handles loading and saving the bridge configuration file.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::{from_str, to_string_pretty};
use std::path::{Path, PathBuf};
use walletlink_ffi::EngineConfig;

pub const CONFIG_FILE: &str = "walletlink.json";

/// Bridge configuration stored in the config file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BridgeConfig {
    /// Keystore directory handed to the engine
    pub directory: PathBuf,

    /// Keystore encryption key
    pub encryption_key: String,

    /// Keystore encryption initialization vector
    pub encryption_iv: String,

    /// Engine binary for the process-boundary variant
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub engine_program: Option<PathBuf>,

    /// Extra arguments for the engine binary
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub engine_args: Vec<String>,
}

impl BridgeConfig {
    pub fn new(
        directory: impl Into<PathBuf>,
        encryption_key: impl Into<String>,
        encryption_iv: impl Into<String>,
    ) -> Self {
        Self {
            directory: directory.into(),
            encryption_key: encryption_key.into(),
            encryption_iv: encryption_iv.into(),
            engine_program: None,
            engine_args: Vec::new(),
        }
    }

    /// Load configuration from file
    pub fn load(config_dir: &Path) -> Result<Self> {
        let config_file = config_dir.join(CONFIG_FILE);

        if !config_file.exists() {
            return Err(anyhow::anyhow!(
                "Configuration file not found: {:?}",
                config_file
            ));
        }

        let config_content = std::fs::read_to_string(&config_file)
            .with_context(|| format!("Failed to read config file: {config_file:?}"))?;

        let config: BridgeConfig = from_str(&config_content)
            .with_context(|| format!("Failed to parse config file: {config_file:?}"))?;

        Ok(config)
    }

    /// Save configuration to file
    pub fn save(&self, config_dir: &Path) -> Result<()> {
        let config_file = config_dir.join(CONFIG_FILE);

        let config_content = to_string_pretty(self).context("Failed to serialize config")?;

        std::fs::write(&config_file, config_content)
            .with_context(|| format!("Failed to write config file: {config_file:?}"))?;

        Ok(())
    }

    /// Check if configuration exists
    pub fn exists(config_dir: &Path) -> bool {
        config_dir.join(CONFIG_FILE).exists()
    }

    pub fn engine_config(&self) -> EngineConfig {
        EngineConfig::new(&self.directory, &self.encryption_key, &self.encryption_iv)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn save_then_load() {
        let dir = tempfile::TempDir::new().unwrap();
        assert!(!BridgeConfig::exists(dir.path()));
        assert!(BridgeConfig::load(dir.path()).is_err());

        let mut config = BridgeConfig::new(dir.path().join("wallets"), "key", "iv");
        config.engine_program = Some(PathBuf::from("/usr/local/bin/tcx-tester"));
        config.save(dir.path()).unwrap();

        assert!(BridgeConfig::exists(dir.path()));
        let loaded = BridgeConfig::load(dir.path()).unwrap();
        assert_eq!(loaded, config);
        assert_eq!(loaded.engine_config().encryption_iv, "iv");
    }

    #[test]
    fn optional_engine_fields_default() {
        let config: BridgeConfig = serde_json::from_str(
            r#"{"directory":"/tmp/w","encryption_key":"k","encryption_iv":"v"}"#,
        )
        .unwrap();
        assert!(config.engine_program.is_none());
        assert!(config.engine_args.is_empty());
    }
}

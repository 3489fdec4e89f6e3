//! Init command for the walletlink CLI
//!
//! Writes the bridge configuration file used by the other commands.

use anyhow::{Context, Result};
use std::path::PathBuf;
use walletlink_client::BridgeConfig;
use walletlink_common::Logger;

pub struct InitCommand {
    config_dir: PathBuf,
    logger: Logger,
}

impl InitCommand {
    pub fn new(config_dir: PathBuf, logger: &Logger) -> Self {
        Self {
            config_dir,
            logger: logger.clone(),
        }
    }

    pub fn run(&self, config: &BridgeConfig, force: bool) -> Result<()> {
        if BridgeConfig::exists(&self.config_dir) && !force {
            anyhow::bail!(
                "Configuration already exists in {:?}; use --force to replace it",
                self.config_dir
            );
        }

        std::fs::create_dir_all(&self.config_dir)
            .with_context(|| format!("Failed to create config directory: {:?}", self.config_dir))?;
        std::fs::create_dir_all(&config.directory).with_context(|| {
            format!("Failed to create keystore directory: {:?}", config.directory)
        })?;
        config.save(&self.config_dir)?;

        self.logger.info_args(format_args!(
            "configuration written to {:?}",
            self.config_dir
        ));
        Ok(())
    }
}

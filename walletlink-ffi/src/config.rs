use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Bootstrap configuration handed to the engine's `init` entry point.
///
/// Field names on the wire are the engine's own.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    #[serde(rename = "fileDir")]
    pub directory: PathBuf,
    #[serde(rename = "xpubCommonKey128")]
    pub encryption_key: String,
    #[serde(rename = "xpubCommonIv")]
    pub encryption_iv: String,
}

impl EngineConfig {
    pub fn new(
        directory: impl Into<PathBuf>,
        encryption_key: impl Into<String>,
        encryption_iv: impl Into<String>,
    ) -> Self {
        Self {
            directory: directory.into(),
            encryption_key: encryption_key.into(),
            encryption_iv: encryption_iv.into(),
        }
    }

    pub fn scan_config(&self) -> ScanConfig {
        ScanConfig::new(&self.directory)
    }
}

/// Configuration for the keystore directory scan
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanConfig {
    #[serde(rename = "fileDir")]
    pub directory: PathBuf,
}

impl ScanConfig {
    pub fn new(directory: impl AsRef<Path>) -> Self {
        Self {
            directory: directory.as_ref().to_path_buf(),
        }
    }
}

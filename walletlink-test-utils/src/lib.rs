// Test utilities for walletlink crates
//
// This crate provides a stand-in wallet engine that speaks the envelope
// protocol, exported both as C entry points and as an in-process `Engine`,
// plus fixtures shared by the integration tests. Nothing here is for
// production builds.

pub mod c_api;
pub mod engine;
pub mod keystore;
pub mod secrets;

use std::path::Path;

use tempfile::TempDir;
use walletlink_common::{Component, Logger};
use walletlink_ffi::{BridgeError, Engine, EngineConfig, EngineError, ScanConfig};
use walletlink_proto::{ProtoError, TransportError};

pub use c_api::{double_releases, global_engine, live_buffers, mock_symbols, set_hex_errors};
pub use engine::MockEngine;

/// Mnemonic used across the end-to-end scenarios
pub const TEST_MNEMONIC: &str =
    "inject kidney empty canal shadow pact comfort wife crush horse wife sketch";
pub const TEST_PASSWORD: &str = "Insecure Pa55w0rd";
pub const TEST_ENCRYPTION_KEY: &str = "B888D25EC8C12BD5043777B1AC49F872";
pub const TEST_ENCRYPTION_IV: &str = "9C0C30889CBCC5E01AB5B2BB88715799";

/// An engine error message, exactly as the engine would report it
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{0}")]
pub struct MockError(String);

impl MockError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

impl From<ProtoError> for MockError {
    fn from(err: ProtoError) -> Self {
        MockError(err.to_string())
    }
}

impl From<TransportError> for MockError {
    fn from(err: TransportError) -> Self {
        MockError(err.to_string())
    }
}

impl From<MockError> for BridgeError {
    fn from(err: MockError) -> Self {
        BridgeError::Engine(EngineError::new(err.0))
    }
}

/// A private stand-in engine called directly, without the C boundary.
///
/// Each instance has its own registry, so tests using it can run in
/// parallel.
#[derive(Default)]
pub struct InProcessEngine {
    engine: MockEngine,
}

impl InProcessEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn inner(&self) -> &MockEngine {
        &self.engine
    }
}

impl Engine for InProcessEngine {
    fn init(&self, config: &EngineConfig) -> walletlink_ffi::Result<()> {
        Ok(self.engine.init(config)?)
    }

    fn scan_wallets(&self, config: &ScanConfig) -> walletlink_ffi::Result<()> {
        Ok(self.engine.scan(&config.directory)?)
    }

    fn call(&self, request_hex: &str) -> walletlink_ffi::Result<String> {
        Ok(self.engine.handle_hex(request_hex)?)
    }
}

/// A temporary keystore directory with an engine configuration pointing at it
pub struct TestWorkspace {
    dir: TempDir,
    config: EngineConfig,
}

impl TestWorkspace {
    pub fn new() -> anyhow::Result<Self> {
        let dir = TempDir::new()?;
        let config = engine_config(dir.path());
        Ok(Self { dir, config })
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Number of keystore files currently on disk
    pub fn keystore_files(&self) -> usize {
        std::fs::read_dir(self.dir.path())
            .map(|entries| {
                entries
                    .flatten()
                    .filter(|entry| entry.path().extension().is_some_and(|ext| ext == "json"))
                    .count()
            })
            .unwrap_or_default()
    }
}

pub fn engine_config(directory: &Path) -> EngineConfig {
    EngineConfig::new(directory, TEST_ENCRYPTION_KEY, TEST_ENCRYPTION_IV)
}

/// Root logger for tests
pub fn test_logger(test_name: &str) -> Logger {
    let _ = env_logger::builder().is_test(true).try_init();
    Logger::new_root(Component::Custom("test"), test_name)
}

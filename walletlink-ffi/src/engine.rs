use std::sync::Arc;

use crate::config::{EngineConfig, ScanConfig};
use crate::error::Result;

/// A wallet engine reachable through the envelope protocol.
///
/// `call` takes a hex-encoded request and yields the hex-encoded result.
/// Failures are returned with the call rather than left in a shared slot.
pub trait Engine: Send + Sync {
    fn init(&self, config: &EngineConfig) -> Result<()>;

    fn scan_wallets(&self, config: &ScanConfig) -> Result<()>;

    fn call(&self, request_hex: &str) -> Result<String>;
}

impl<E: Engine + ?Sized> Engine for Arc<E> {
    fn init(&self, config: &EngineConfig) -> Result<()> {
        (**self).init(config)
    }

    fn scan_wallets(&self, config: &ScanConfig) -> Result<()> {
        (**self).scan_wallets(config)
    }

    fn call(&self, request_hex: &str) -> Result<String> {
        (**self).call(request_hex)
    }
}

impl<E: Engine + ?Sized> Engine for Box<E> {
    fn init(&self, config: &EngineConfig) -> Result<()> {
        (**self).init(config)
    }

    fn scan_wallets(&self, config: &ScanConfig) -> Result<()> {
        (**self).scan_wallets(config)
    }

    fn call(&self, request_hex: &str) -> Result<String> {
        (**self).call(request_hex)
    }
}

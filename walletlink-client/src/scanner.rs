//! Session bootstrap: initialise the engine and load existing keystores.

use std::path::PathBuf;
use std::sync::{Mutex, MutexGuard, PoisonError};

use walletlink_common::{Component, Logger};
use walletlink_ffi::{Engine, EngineConfig};

use crate::error::Result;

#[derive(Default)]
struct ScanState {
    config: Option<EngineConfig>,
    scans: usize,
}

/// Runs `init` once per configuration and the directory scan on demand.
///
/// Scanning again is safe: the engine keys loaded wallets by id, so a
/// repeated scan of the same directory adds nothing.
pub struct KeystoreScanner {
    state: Mutex<ScanState>,
    logger: Logger,
}

impl KeystoreScanner {
    pub fn new(logger: &Logger) -> Self {
        Self {
            state: Mutex::new(ScanState::default()),
            logger: logger.with_component(Component::Scanner),
        }
    }

    fn state(&self) -> MutexGuard<'_, ScanState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Initialise the engine for `config` (first time only) and scan its
    /// keystore directory
    pub fn bootstrap<E: Engine + ?Sized>(&self, engine: &E, config: &EngineConfig) -> Result<()> {
        let mut state = self.state();
        if state.config.as_ref() != Some(config) {
            self.logger.info_args(format_args!(
                "initializing engine for {}",
                config.directory.display()
            ));
            engine.init(config)?;
            state.config = Some(config.clone());
            state.scans = 0;
        }
        engine.scan_wallets(&config.scan_config())?;
        state.scans += 1;
        self.logger.debug_args(format_args!(
            "scanned {} ({} scans this session)",
            config.directory.display(),
            state.scans
        ));
        Ok(())
    }

    /// Scan the bootstrapped directory again
    pub fn rescan<E: Engine + ?Sized>(&self, engine: &E) -> Result<bool> {
        let config = self.state().config.clone();
        match config {
            Some(config) => self.bootstrap(engine, &config).map(|_| true),
            None => Ok(false),
        }
    }

    pub fn is_bootstrapped(&self) -> bool {
        self.state().scans > 0
    }

    pub fn directory(&self) -> Option<PathBuf> {
        self.state().config.as_ref().map(|config| config.directory.clone())
    }
}

//! In-process engine reached through its C entry points.

use std::ffi::CString;
use std::sync::{Mutex, PoisonError};

use walletlink_common::{Component, Logger};

use crate::buffer::OwnedBuffer;
use crate::config::{EngineConfig, ScanConfig};
use crate::engine::Engine;
use crate::error::{BridgeError, EngineError, Result};
use crate::error_channel::ErrorChannel;
use crate::symbols::{EngineSymbols, InitFn};

// The engine's error slot is process-wide, so every clear/call/read
// sequence in the process goes through this one lock.
static CALL_LOCK: Mutex<()> = Mutex::new(());

/// What the engine left behind after one dispatch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawOutcome {
    pub result: Option<String>,
    pub error: String,
}

impl RawOutcome {
    /// Fold into a call-scoped result; a non-empty error always wins
    pub fn into_result(self) -> Result<String> {
        if !self.error.is_empty() {
            return Err(EngineError::new(self.error).into());
        }
        self.result.ok_or(BridgeError::NoResult)
    }
}

pub struct NativeEngine {
    symbols: EngineSymbols,
    logger: Logger,
}

impl NativeEngine {
    pub fn new(symbols: EngineSymbols, logger: &Logger) -> Self {
        Self {
            symbols,
            logger: logger.with_component(Component::Engine),
        }
    }

    #[cfg(feature = "linked")]
    pub fn linked(logger: &Logger) -> Self {
        Self::new(EngineSymbols::linked(), logger)
    }

    fn serialized<T>(&self, f: impl FnOnce(&ErrorChannel<'_>) -> T) -> T {
        let _guard = CALL_LOCK.lock().unwrap_or_else(PoisonError::into_inner);
        let channel = ErrorChannel::new(&self.symbols);
        f(&channel)
    }

    /// Run a side-effect-only entry point and collect the error it reports
    fn run_void(&self, entry: InitFn, json: &CString) -> Result<()> {
        let message = self.serialized(|channel| {
            channel.clear();
            unsafe { entry(json.as_ptr()) };
            channel.last_message()
        });
        if message.is_empty() {
            Ok(())
        } else {
            Err(EngineError::new(message).into())
        }
    }

    /// One dispatch as the engine sees it: clear, call, read.
    ///
    /// Both the result buffer and the error buffer are copied out and
    /// released before this returns.
    pub fn dispatch_raw(&self, request_hex: &str) -> Result<RawOutcome> {
        let request = CString::new(request_hex)?;
        let outcome = self.serialized(|channel| {
            channel.clear();
            let raw = unsafe { (self.symbols.dispatch)(request.as_ptr()) };
            let result = unsafe { OwnedBuffer::from_raw(raw, self.symbols.release) }
                .map(OwnedBuffer::into_string);
            let error = channel.last_message();
            RawOutcome { result, error }
        });
        Ok(outcome)
    }
}

impl Engine for NativeEngine {
    fn init(&self, config: &EngineConfig) -> Result<()> {
        self.logger.info_args(format_args!(
            "initializing engine with keystore directory {}",
            config.directory.display()
        ));
        let json = CString::new(serde_json::to_string(config)?)?;
        self.run_void(self.symbols.init, &json)
    }

    fn scan_wallets(&self, config: &ScanConfig) -> Result<()> {
        self.logger.debug_args(format_args!(
            "scanning keystores in {}",
            config.directory.display()
        ));
        let json = CString::new(serde_json::to_string(config)?)?;
        self.run_void(self.symbols.scan_wallets, &json)
    }

    fn call(&self, request_hex: &str) -> Result<String> {
        self.logger
            .debug_args(format_args!("dispatch request of {} hex chars", request_hex.len()));
        let outcome = self.dispatch_raw(request_hex)?.into_result();
        match &outcome {
            Ok(result) => self
                .logger
                .debug_args(format_args!("dispatch returned {} hex chars", result.len())),
            Err(err) => self.logger.warn_args(format_args!("dispatch failed: {err}")),
        }
        outcome
    }
}

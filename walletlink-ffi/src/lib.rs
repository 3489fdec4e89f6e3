//! Callers for the walletlink engine.
//!
//! [`NativeEngine`] drives the engine's C entry points in-process;
//! [`SubprocessEngine`] drives an engine binary over argv and stdout. Both
//! implement [`Engine`], which returns each call's result or error directly
//! instead of leaving it in the engine's shared error slot.

pub mod buffer;
pub mod config;
pub mod engine;
pub mod error;
pub mod error_channel;
pub mod native;
pub mod subprocess;
pub mod symbols;

pub use buffer::OwnedBuffer;
pub use config::{EngineConfig, ScanConfig};
pub use engine::Engine;
pub use error::{BridgeError, EngineError, ErrorCategory, ErrorKind, Result};
pub use error_channel::ErrorChannel;
pub use native::{NativeEngine, RawOutcome};
pub use subprocess::SubprocessEngine;
pub use symbols::EngineSymbols;

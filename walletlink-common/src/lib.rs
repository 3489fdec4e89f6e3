//! Walletlink Common
//!
//! Shared utilities for the walletlink crates.
//!
//! This crate provides:
//! - Component-based structured logging with a bridge session id

pub mod logging;

pub use logging::{Component, Logger};

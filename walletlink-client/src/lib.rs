//! Wallet lifecycle client for the walletlink engine.
//!
//! [`WalletApi`] sequences create, import, derive, sign, export and delete
//! calls over any [`walletlink_ffi::Engine`], tracking each wallet handle's
//! lifecycle so calls are issued in an order the engine accepts.

pub mod api;
pub mod async_api;
pub mod config;
pub mod error;
pub mod lifecycle;
pub mod params;
pub mod paths;
pub mod scanner;

pub use api::WalletApi;
pub use async_api::AsyncWalletApi;
pub use config::BridgeConfig;
pub use error::{ClientError, Result};
pub use lifecycle::{Account, Operation, Wallet, WalletSource, WalletState};
pub use params::{ChainSelection, ImportMnemonic, ImportPrivateKey};
pub use paths::{derivation_path, ChainType, Network, SegWit};
pub use scanner::KeystoreScanner;

use thiserror::Error;
use walletlink_ffi::{BridgeError, ErrorKind};
use walletlink_proto::ProtoError;

use crate::lifecycle::WalletState;

/// Error types for wallet operations
#[derive(Error, Debug)]
pub enum ClientError {
    #[error(transparent)]
    Bridge(#[from] BridgeError),

    /// Reported locally with the engine's own text
    #[error("unsupported_chain")]
    UnsupportedChain,

    /// The wallet was deleted; reported with the engine's own text
    #[error("wallet_not_found")]
    WalletDeleted,

    #[error("cannot {operation} a wallet in state {state:?}")]
    InvalidState {
        operation: &'static str,
        state: WalletState,
    },

    #[error("keystore directory has not been scanned")]
    NotBootstrapped,

    #[error("background task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

impl From<ProtoError> for ClientError {
    fn from(err: ProtoError) -> Self {
        ClientError::Bridge(err.into())
    }
}

impl ClientError {
    /// Classification of the failure, using the engine's taxonomy
    pub fn kind(&self) -> ErrorKind {
        match self {
            ClientError::Bridge(err) => err.kind(),
            ClientError::UnsupportedChain => ErrorKind::UnsupportedChain,
            ClientError::WalletDeleted => ErrorKind::WalletNotFound,
            _ => ErrorKind::Other,
        }
    }
}

/// Result type for wallet operations
pub type Result<T> = std::result::Result<T, ClientError>;

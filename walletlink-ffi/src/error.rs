use std::ffi::NulError;

use thiserror::Error;
use walletlink_proto::{ProtoError, TransportError};

/// Classification of an engine error message.
///
/// The engine reports failures as text; callers and tests match on the
/// classification while the message itself is kept byte-identical.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// `invalid number of words in phrase: N`
    InvalidWordCount(usize),
    InvalidChecksum,
    InvalidWord,
    OddLength,
    InvalidHexCharacter,
    UnsupportedChain,
    InvalidPrivateKey,
    Base58Checksum,
    PasswordIncorrect,
    WalletNotFound,
    AddressAlreadyExists,
    UnsupportedMethod,
    Other,
}

/// Coarse grouping of [`ErrorKind`]s
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    Encoding,
    DomainRule,
    Authorization,
    State,
    Protocol,
    Other,
}

const WORD_COUNT_PREFIX: &str = "invalid number of words in phrase: ";

impl ErrorKind {
    /// Classify an engine message by the literal substrings the engine emits
    pub fn classify(message: &str) -> Self {
        if let Some(pos) = message.find(WORD_COUNT_PREFIX) {
            let count = message[pos + WORD_COUNT_PREFIX.len()..]
                .chars()
                .take_while(char::is_ascii_digit)
                .collect::<String>();
            if let Ok(count) = count.parse() {
                return ErrorKind::InvalidWordCount(count);
            }
        }

        if message.contains("invalid checksum") {
            ErrorKind::InvalidChecksum
        } else if message.contains("invalid word in phrase") {
            ErrorKind::InvalidWord
        } else if message.contains("OddLength") {
            ErrorKind::OddLength
        } else if message.contains("InvalidHexCharacter") {
            ErrorKind::InvalidHexCharacter
        } else if message.contains("unsupported_chain") {
            ErrorKind::UnsupportedChain
        } else if message.contains("invalid_private_key") {
            ErrorKind::InvalidPrivateKey
        } else if message.contains("base58ck") {
            ErrorKind::Base58Checksum
        } else if message.contains("password_incorrect") {
            ErrorKind::PasswordIncorrect
        } else if message.contains("wallet_not_found") {
            ErrorKind::WalletNotFound
        } else if message.contains("address_already_exist") {
            ErrorKind::AddressAlreadyExists
        } else if message.contains("unsupported_method") {
            ErrorKind::UnsupportedMethod
        } else {
            ErrorKind::Other
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            ErrorKind::InvalidWordCount(_) | ErrorKind::InvalidChecksum | ErrorKind::InvalidWord => {
                ErrorCategory::Validation
            }
            ErrorKind::OddLength | ErrorKind::InvalidHexCharacter => ErrorCategory::Encoding,
            ErrorKind::UnsupportedChain | ErrorKind::InvalidPrivateKey | ErrorKind::Base58Checksum => {
                ErrorCategory::DomainRule
            }
            ErrorKind::PasswordIncorrect => ErrorCategory::Authorization,
            ErrorKind::WalletNotFound | ErrorKind::AddressAlreadyExists => ErrorCategory::State,
            ErrorKind::UnsupportedMethod => ErrorCategory::Protocol,
            ErrorKind::Other => ErrorCategory::Other,
        }
    }
}

/// A failure reported by the engine, carried per call
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct EngineError {
    message: String,
    kind: ErrorKind,
}

impl EngineError {
    pub fn new(message: impl Into<String>) -> Self {
        let message = message.into();
        let kind = ErrorKind::classify(&message);
        Self { message, kind }
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn category(&self) -> ErrorCategory {
        self.kind.category()
    }
}

impl From<TransportError> for EngineError {
    fn from(err: TransportError) -> Self {
        EngineError::new(err.to_string())
    }
}

/// Error types for calls across the engine boundary
#[derive(Error, Debug)]
pub enum BridgeError {
    #[error(transparent)]
    Engine(#[from] EngineError),

    #[error(transparent)]
    Proto(#[from] ProtoError),

    #[error("engine returned neither a result nor an error")]
    NoResult,

    #[error("string contains an interior NUL byte: {0}")]
    InteriorNul(#[from] NulError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("failed to run engine program {program}: {reason}")]
    Subprocess { program: String, reason: String },
}

impl BridgeError {
    /// The engine failure, if this error came from the engine
    pub fn engine(&self) -> Option<&EngineError> {
        match self {
            BridgeError::Engine(err) => Some(err),
            _ => None,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        self.engine().map(EngineError::kind).unwrap_or(ErrorKind::Other)
    }
}

/// Result type for bridge operations
pub type Result<T> = std::result::Result<T, BridgeError>;

use thiserror::Error;

/// Failure converting between the binary envelope and its text form
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TransportError {
    #[error("hex can't decode: {0:?}")]
    InvalidHex(hex::FromHexError),
}

impl TransportError {
    pub fn is_odd_length(&self) -> bool {
        matches!(self, TransportError::InvalidHex(hex::FromHexError::OddLength))
    }

    /// The offending character and its index, for invalid-character failures
    pub fn invalid_character(&self) -> Option<(char, usize)> {
        match self {
            TransportError::InvalidHex(hex::FromHexError::InvalidHexCharacter { c, index }) => {
                Some((*c, *index))
            }
            _ => None,
        }
    }
}

/// Error types for building and reading action envelopes
#[derive(Error, Debug)]
pub enum ProtoError {
    #[error("unsupported_method: {0}")]
    UnknownMethod(String),

    #[error("type mismatch: expected {expected}, found {found}")]
    TypeMismatch { expected: String, found: String },

    #[error("missing param for method {0}")]
    MissingParam(String),

    #[error("invalid param {type_id}: {reason}")]
    Validation { type_id: &'static str, reason: String },

    #[error("decode error: {0}")]
    Decode(#[from] prost::DecodeError),

    #[error("{0}")]
    Transport(#[from] TransportError),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ProtoError {
    pub(crate) fn invalid(type_id: &'static str, reason: impl Into<String>) -> Self {
        ProtoError::Validation {
            type_id,
            reason: reason.into(),
        }
    }
}

/// Result type for envelope operations
pub type Result<T> = std::result::Result<T, ProtoError>;

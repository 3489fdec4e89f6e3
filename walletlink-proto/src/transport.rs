//! Text-safe form of envelope bytes.
//!
//! Mobile bridges and process argv/stdout only carry strings, so every
//! request and result crosses the boundary as hexadecimal text.

use crate::error::TransportError;

/// Encode bytes as lowercase hex
pub fn to_text(bytes: &[u8]) -> String {
    hex::encode(bytes)
}

/// Decode hex text (either case) back into bytes
pub fn from_text(text: &str) -> Result<Vec<u8>, TransportError> {
    hex::decode(text).map_err(TransportError::InvalidHex)
}

//! The engine's process-wide last-error slot.

use prost::Message;
use walletlink_proto::messages::Response;

use crate::buffer::OwnedBuffer;
use crate::symbols::EngineSymbols;

/// View of the engine's single error slot.
///
/// The slot is shared by every caller in the process. Use it only while
/// holding the call lock in [`crate::native`], between one `clear` and the
/// read that follows the call.
pub struct ErrorChannel<'a> {
    symbols: &'a EngineSymbols,
}

impl<'a> ErrorChannel<'a> {
    pub fn new(symbols: &'a EngineSymbols) -> Self {
        Self { symbols }
    }

    pub fn clear(&self) {
        unsafe { (self.symbols.clear_error)() }
    }

    /// Copy out the current message, releasing the engine buffer.
    /// An empty string means no error.
    pub fn last_message(&self) -> String {
        let raw = unsafe { (self.symbols.last_error)() };
        match unsafe { OwnedBuffer::from_raw(raw, self.symbols.release) } {
            Some(buffer) => interpret_error_text(&buffer.into_string()),
            None => String::new(),
        }
    }
}

/// Engines may report errors either as plain text or as a hex-encoded
/// failed `Response`; both yield the plain message.
pub fn interpret_error_text(text: &str) -> String {
    if text.is_empty() {
        return String::new();
    }
    if let Ok(bytes) = walletlink_proto::from_text(text) {
        if let Ok(response) = Response::decode(bytes.as_slice()) {
            if !response.is_success && !response.error.is_empty() {
                return response.error;
            }
        }
    }
    text.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_text_passes_through() {
        assert_eq!(interpret_error_text("invalid checksum"), "invalid checksum");
        assert_eq!(interpret_error_text(""), "");
    }

    #[test]
    fn hex_response_yields_its_error() {
        let response = Response {
            is_success: false,
            error: "password_incorrect".into(),
        };
        let text = walletlink_proto::to_text(&response.encode_to_vec());
        assert_eq!(interpret_error_text(&text), "password_incorrect");
    }

    #[test]
    fn successful_response_text_is_not_unwrapped() {
        let response = Response {
            is_success: true,
            error: String::new(),
        };
        let text = walletlink_proto::to_text(&response.encode_to_vec());
        assert_eq!(interpret_error_text(&text), text);
    }
}

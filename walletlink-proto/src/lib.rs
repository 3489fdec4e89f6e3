//! Action envelope protocol for walletlink.
//!
//! Every wallet operation is one [`Action`]: a method name plus a parameter
//! packed as a [`TypedAny`]. Requests and results travel as hex text. The
//! [`registry`] binds each method to its parameter and result schemas.

pub mod action;
pub mod codec;
pub mod error;
pub mod json;
pub mod messages;
pub mod registry;
pub mod transport;

pub use action::{Action, TypedAny, TypedMessage};
pub use codec::{decode_action, decode_result, encode_dynamic, encode_request};
pub use error::{ProtoError, Result, TransportError};
pub use registry::{spec, Method, MethodSpec};
pub use transport::{from_text, to_text};

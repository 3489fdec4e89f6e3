//! Walletlink CLI Library
//!
//! Encoding, decoding and case-running commands behind the `walletlink`
//! binary. The case runner walks a directory of JSON envelope cases, calls
//! the engine with each, and writes every result beside the case name.

pub mod cases;
pub mod init;

pub use cases::{call_case, CaseOutcome, CaseRunner, CaseSummary};
pub use init::InitCommand;

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");

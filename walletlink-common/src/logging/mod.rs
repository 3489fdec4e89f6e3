// Logging utilities for the walletlink bridge
//
// This module provides component-tagged logging with:
// - A session id shared by every logger derived from the same root
// - Parent/child component prefixes
// - Optional method tagging for envelope calls

use log::{debug, error, info, warn};
use std::fmt::{self, Arguments, Display, Formatter};

/// Predefined components for logging categorization
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Component {
    Bridge,
    Codec,
    Engine,
    Scanner,
    Wallet,
    CLI,
    Custom(&'static str),
}

impl Component {
    /// Get the string representation of the component
    pub fn as_str(&self) -> &str {
        match self {
            Component::Bridge => "Bridge",
            Component::Codec => "Codec",
            Component::Engine => "Engine",
            Component::Scanner => "Scanner",
            Component::Wallet => "Wallet",
            Component::CLI => "CLI",
            Component::Custom(name) => name,
        }
    }
}

// Display helper so the `*_args` variants never build an intermediate String
struct PrefixDisplay<'a> {
    parent: Option<Component>,
    component: Component,
    method: Option<&'a str>,
}

impl Display for PrefixDisplay<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self.parent {
            Some(parent) if parent != Component::Bridge => {
                write!(f, "{}.{}", parent.as_str(), self.component.as_str())?
            }
            _ => write!(f, "{}", self.component.as_str())?,
        }
        if let Some(method) = self.method {
            write!(f, "|method={method}")?;
        }
        Ok(())
    }
}

/// A component logger that carries the bridge session id
#[derive(Clone, Debug)]
pub struct Logger {
    component: Component,
    session_id: String,
    parent_component: Option<Component>,
    method: Option<String>,
}

impl Logger {
    /// Create a new root logger for a component and session id
    pub fn new_root(component: Component, session_id: &str) -> Self {
        Self {
            component,
            session_id: session_id.to_string(),
            parent_component: None,
            method: None,
        }
    }

    /// Create a child logger with the same session id but a different component
    pub fn with_component(&self, component: Component) -> Self {
        Self {
            component,
            session_id: self.session_id.clone(),
            parent_component: Some(self.component),
            method: self.method.clone(),
        }
    }

    /// Create a logger tagged with the envelope method being invoked
    pub fn with_method(&self, method: impl Into<String>) -> Self {
        Self {
            component: self.component,
            session_id: self.session_id.clone(),
            parent_component: self.parent_component,
            method: Some(method.into()),
        }
    }

    pub fn component(&self) -> Component {
        self.component
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    pub fn method(&self) -> Option<&str> {
        self.method.as_deref()
    }

    fn prefix(&self) -> PrefixDisplay<'_> {
        PrefixDisplay {
            parent: self.parent_component,
            component: self.component,
            method: self.method(),
        }
    }

    fn is_root(&self) -> bool {
        self.component == Component::Bridge
            && self.parent_component.is_none()
            && self.method.is_none()
    }

    /// Log a debug message
    pub fn debug(&self, message: impl Into<String>) {
        if log::log_enabled!(log::Level::Debug) {
            self.debug_args(format_args!("{}", message.into()));
        }
    }

    /// Log a debug message using fmt::Arguments
    pub fn debug_args(&self, args: Arguments) {
        if log::log_enabled!(log::Level::Debug) {
            if self.is_root() {
                debug!("[{}] {}", self.session_id, args);
            } else {
                debug!("[{}][{}] {}", self.session_id, self.prefix(), args);
            }
        }
    }

    /// Log an info message
    pub fn info(&self, message: impl Into<String>) {
        if log::log_enabled!(log::Level::Info) {
            self.info_args(format_args!("{}", message.into()));
        }
    }

    /// Log an info message using fmt::Arguments
    pub fn info_args(&self, args: Arguments) {
        if log::log_enabled!(log::Level::Info) {
            if self.is_root() {
                info!("[{}] {}", self.session_id, args);
            } else {
                info!("[{}][{}] {}", self.session_id, self.prefix(), args);
            }
        }
    }

    /// Log a warning message
    pub fn warn(&self, message: impl Into<String>) {
        if log::log_enabled!(log::Level::Warn) {
            self.warn_args(format_args!("{}", message.into()));
        }
    }

    /// Log a warning using fmt::Arguments
    pub fn warn_args(&self, args: Arguments) {
        if log::log_enabled!(log::Level::Warn) {
            if self.is_root() {
                warn!("[{}] {}", self.session_id, args);
            } else {
                warn!("[{}][{}] {}", self.session_id, self.prefix(), args);
            }
        }
    }

    /// Log an error message
    pub fn error(&self, message: impl Into<String>) {
        if log::log_enabled!(log::Level::Error) {
            self.error_args(format_args!("{}", message.into()));
        }
    }

    /// Log an error using fmt::Arguments
    pub fn error_args(&self, args: Arguments) {
        if log::log_enabled!(log::Level::Error) {
            if self.is_root() {
                error!("[{}] {}", self.session_id, args);
            } else {
                error!("[{}][{}] {}", self.session_id, self.prefix(), args);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn child_logger_keeps_session_and_records_parent() {
        let root = Logger::new_root(Component::Bridge, "session-1");
        let child = root.with_component(Component::Engine).with_method("hd_store_import");

        assert_eq!(child.session_id(), "session-1");
        assert_eq!(child.component(), Component::Engine);
        assert_eq!(child.method(), Some("hd_store_import"));
        assert_eq!(child.prefix().to_string(), "Engine|method=hd_store_import");
    }

    #[test]
    fn nested_prefix_shows_non_root_parent() {
        let root = Logger::new_root(Component::Wallet, "s");
        let child = root.with_component(Component::Scanner);
        assert_eq!(child.prefix().to_string(), "Wallet.Scanner");
        assert_eq!(Component::Custom("harness").as_str(), "harness");
    }
}

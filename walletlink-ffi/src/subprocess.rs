//! Process-boundary engine: one engine process per call.
//!
//! The request hex is the only argument the bridge adds, after any fixed
//! prefix from [`SubprocessEngine::with_args`]; the result hex is read from
//! stdout. Anything on stderr, or a non-zero exit, is the error message.
//!
//! The engine process owns its storage, so `init` and `scan_wallets` do not
//! spawn anything. An engine that needs a keystore directory takes it from
//! the configured prefix arguments.

use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use walletlink_common::{Component, Logger};

use crate::config::{EngineConfig, ScanConfig};
use crate::engine::Engine;
use crate::error::{BridgeError, EngineError, Result};

pub struct SubprocessEngine {
    program: PathBuf,
    args: Vec<String>,
    logger: Logger,
}

impl SubprocessEngine {
    pub fn new(program: impl Into<PathBuf>, logger: &Logger) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            logger: logger.with_component(Component::Engine),
        }
    }

    /// Fixed arguments placed before the request hex on every spawn
    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args = args.into_iter().map(Into::into).collect();
        self
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    fn request_command(&self, request_hex: &str) -> Command {
        let mut command = Command::new(&self.program);
        command.args(&self.args).arg(request_hex);
        command
    }

    fn run(&self, mut command: Command) -> Result<String> {
        let output = command.output().map_err(|err| BridgeError::Subprocess {
            program: self.program.display().to_string(),
            reason: err.to_string(),
        })?;
        interpret_output(&output)
    }
}

/// Split a finished engine process into its result or error
pub fn interpret_output(output: &Output) -> Result<String> {
    let stderr = String::from_utf8_lossy(&output.stderr);
    let stderr = stderr.trim();
    if !stderr.is_empty() {
        return Err(EngineError::new(stderr).into());
    }
    if !output.status.success() {
        return Err(EngineError::new(format!("engine exited with {}", output.status)).into());
    }
    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
}

impl Engine for SubprocessEngine {
    fn init(&self, config: &EngineConfig) -> Result<()> {
        self.logger.debug_args(format_args!(
            "engine process {} manages its own storage; not passing {}",
            self.program.display(),
            config.directory.display()
        ));
        Ok(())
    }

    fn scan_wallets(&self, config: &ScanConfig) -> Result<()> {
        self.logger.debug_args(format_args!(
            "engine process {} scans its own storage; ignoring {}",
            self.program.display(),
            config.directory.display()
        ));
        Ok(())
    }

    fn call(&self, request_hex: &str) -> Result<String> {
        self.logger.debug_args(format_args!(
            "spawning {} with {} hex chars",
            self.program.display(),
            request_hex.len()
        ));
        let result = self.run(self.request_command(request_hex));
        if let Err(err) = &result {
            self.logger.warn_args(format_args!("engine process failed: {err}"));
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use std::ffi::OsStr;
    use std::path::Path;

    use walletlink_common::{Component, Logger};

    use super::*;

    fn engine() -> SubprocessEngine {
        SubprocessEngine::new("engine-bin", &Logger::new_root(Component::Engine, "subprocess-test"))
    }

    #[test]
    fn request_hex_is_the_only_added_argument() {
        let engine = engine();
        engine
            .init(&EngineConfig::new("/tmp/keystores", "key", "iv"))
            .unwrap();
        engine
            .scan_wallets(&ScanConfig::new("/tmp/keystores"))
            .unwrap();
        let command = engine.request_command("0a0b");
        assert_eq!(command.get_program(), OsStr::new("engine-bin"));
        assert_eq!(command.get_args().collect::<Vec<_>>(), vec![OsStr::new("0a0b")]);
    }

    #[test]
    fn prefix_arguments_come_before_the_request() {
        let engine = engine().with_args(["--dir", "/data/wallets"]);
        let command = engine.request_command("0a0b");
        let args: Vec<_> = command.get_args().collect();
        assert_eq!(
            args,
            vec![OsStr::new("--dir"), OsStr::new("/data/wallets"), OsStr::new("0a0b")]
        );
        assert_eq!(engine.program(), Path::new("engine-bin"));
    }
}

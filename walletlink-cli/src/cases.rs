//! JSON case runner
//!
//! A case file holds `{"method": ..., "param": {"type": ..., ...}}`. Each case
//! is encoded, sent to the engine, and its decoded result (or the engine's
//! error text) is written to the output directory under the case's file name.

use anyhow::{Context, Result};
use serde_json::Value;
use std::path::{Path, PathBuf};
use walletlink_common::{Component, Logger};
use walletlink_ffi::Engine;
use walletlink_proto::json::{decode_json_result, encode_json_case};
use walletlink_proto::{from_text, to_text, ProtoError};

/// Encode a case, call the engine and decode its result
pub fn call_case<E: Engine>(engine: &E, case: &Value) -> walletlink_ffi::Result<Value> {
    let request = encode_json_case(case)?;
    let result = engine.call(&to_text(&request.bytes))?;
    let bytes = from_text(&result).map_err(ProtoError::from)?;
    Ok(decode_json_result(&request, &bytes)?)
}

#[derive(Debug, Clone, PartialEq)]
pub enum CaseOutcome {
    Passed(Value),
    Failed(String),
}

impl CaseOutcome {
    /// Text written to the result file
    pub fn to_file_text(&self) -> Result<String> {
        match self {
            CaseOutcome::Passed(value) => {
                serde_json::to_string_pretty(value).context("Failed to serialize case result")
            }
            CaseOutcome::Failed(message) => Ok(message.clone()),
        }
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CaseSummary {
    pub passed: usize,
    pub failed: usize,
}

pub struct CaseRunner<'a, E> {
    engine: &'a E,
    logger: Logger,
}

impl<'a, E: Engine> CaseRunner<'a, E> {
    pub fn new(engine: &'a E, logger: &Logger) -> Self {
        Self {
            engine,
            logger: logger.with_component(Component::Custom("Cases")),
        }
    }

    /// Run one case file
    pub fn run_file(&self, path: &Path) -> Result<CaseOutcome> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read case file: {path:?}"))?;
        let case: Value = match serde_json::from_str(&content) {
            Ok(case) => case,
            Err(err) => return Ok(CaseOutcome::Failed(err.to_string())),
        };
        let method = case.get("method").and_then(Value::as_str).unwrap_or_default();
        self.logger
            .info_args(format_args!("case {:?}, method {method}", file_name(path)));

        Ok(match call_case(self.engine, &case) {
            Ok(value) => CaseOutcome::Passed(value),
            Err(err) => {
                self.logger
                    .warn_args(format_args!("case {:?} failed: {err}", file_name(path)));
                CaseOutcome::Failed(err.to_string())
            }
        })
    }

    /// Run every case under `cases_dir`, replacing the files in `out_dir`
    pub fn run_dir(&self, cases_dir: &Path, out_dir: &Path) -> Result<CaseSummary> {
        std::fs::create_dir_all(out_dir)
            .with_context(|| format!("Failed to create output directory: {out_dir:?}"))?;
        clear_files(out_dir)?;

        let mut cases = Vec::new();
        collect_files(cases_dir, &mut cases)?;
        cases.sort();

        let mut summary = CaseSummary::default();
        for path in cases {
            let outcome = self.run_file(&path)?;
            match outcome {
                CaseOutcome::Passed(_) => summary.passed += 1,
                CaseOutcome::Failed(_) => summary.failed += 1,
            }
            let out_file = out_dir.join(file_name(&path));
            std::fs::write(&out_file, outcome.to_file_text()?)
                .with_context(|| format!("Failed to write case result: {out_file:?}"))?;
        }

        self.logger.info_args(format_args!(
            "{} cases passed, {} failed",
            summary.passed, summary.failed
        ));
        Ok(summary)
    }
}

fn file_name(path: &Path) -> &std::ffi::OsStr {
    path.file_name().unwrap_or(path.as_os_str())
}

fn collect_files(dir: &Path, files: &mut Vec<PathBuf>) -> Result<()> {
    let entries =
        std::fs::read_dir(dir).with_context(|| format!("Failed to read case directory: {dir:?}"))?;
    for entry in entries {
        let path = entry?.path();
        if path.is_dir() {
            collect_files(&path, files)?;
        } else {
            files.push(path);
        }
    }
    Ok(())
}

fn clear_files(dir: &Path) -> Result<()> {
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_file() {
            std::fs::remove_file(&path)
                .with_context(|| format!("Failed to remove old result: {path:?}"))?;
        }
    }
    Ok(())
}

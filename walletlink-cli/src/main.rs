//! Walletlink CLI - envelope encoding and engine harness
//!
//! Encodes JSON envelope cases, decodes engine results, and drives a
//! process-boundary engine through single calls or whole case directories.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde_json::Value;
use std::path::{Path, PathBuf};
use walletlink_client::BridgeConfig;
use walletlink_common::{Component, Logger};
use walletlink_ffi::{Engine, SubprocessEngine};
use walletlink_proto::json::{decode_json_result, encode_json_case, JsonRequest};
use walletlink_proto::{from_text, to_text, Method};

use walletlink_cli::{call_case, CaseRunner, InitCommand};

#[derive(Parser)]
#[command(name = "walletlink")]
#[command(about = "Walletlink CLI - encode envelopes and exercise a wallet engine")]
#[command(version = env!("CARGO_PKG_VERSION"))]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Configuration directory
    #[arg(short, long, default_value = ".walletlink")]
    config_dir: PathBuf,
}

#[derive(Subcommand)]
enum Commands {
    /// Write the bridge configuration
    Init {
        /// Keystore directory handed to the engine
        #[arg(long)]
        dir: PathBuf,
        /// Keystore encryption key
        #[arg(long)]
        key: String,
        /// Keystore encryption initialization vector
        #[arg(long)]
        iv: String,
        /// Engine binary taking the request hex as its argument
        #[arg(long)]
        engine: Option<PathBuf>,
        /// Fixed argument placed before the request hex; repeatable
        #[arg(long = "engine-arg", allow_hyphen_values = true)]
        engine_args: Vec<String>,
        /// Replace an existing configuration
        #[arg(short, long)]
        force: bool,
    },
    /// Print the request hex for a JSON case file
    Encode { case: PathBuf },
    /// Decode result hex for a method as JSON
    Decode {
        #[arg(long)]
        method: Method,
        /// Sign input type, for sign methods
        #[arg(long)]
        input_type: Option<String>,
        hex: String,
    },
    /// Call the configured engine with one JSON case
    Call { case: PathBuf },
    /// Run every JSON case in a directory and write the results
    #[command(name = "run-cases")]
    RunCases { cases_dir: PathBuf, out_dir: PathBuf },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    let logger = Logger::new_root(Component::CLI, "main");

    match cli.command {
        Commands::Init {
            dir,
            key,
            iv,
            engine,
            engine_args,
            force,
        } => {
            let mut config = BridgeConfig::new(dir, key, iv);
            config.engine_program = engine;
            config.engine_args = engine_args;
            InitCommand::new(cli.config_dir, &logger).run(&config, force)?;
        }
        Commands::Encode { case } => {
            let request = encode_json_case(&read_case(&case)?)
                .with_context(|| format!("Failed to encode case: {case:?}"))?;
            println!("{}", to_text(&request.bytes));
        }
        Commands::Decode {
            method,
            input_type,
            hex,
        } => {
            let request = JsonRequest {
                method,
                bytes: Vec::new(),
                sign_input_type: input_type,
            };
            let bytes = from_text(hex.trim()).context("Result is not valid hex")?;
            let value = decode_json_result(&request, &bytes)?;
            println!("{}", serde_json::to_string_pretty(&value)?);
        }
        Commands::Call { case } => {
            let engine = open_engine(&cli.config_dir, &logger)?;
            let value = call_case(&engine, &read_case(&case)?)?;
            println!("{}", serde_json::to_string_pretty(&value)?);
        }
        Commands::RunCases { cases_dir, out_dir } => {
            let engine = open_engine(&cli.config_dir, &logger)?;
            let summary = CaseRunner::new(&engine, &logger).run_dir(&cases_dir, &out_dir)?;
            println!(
                "{} passed, {} failed; results in {}",
                summary.passed,
                summary.failed,
                out_dir.display()
            );
        }
    }

    Ok(())
}

fn read_case(path: &Path) -> Result<Value> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read case file: {path:?}"))?;
    serde_json::from_str(&content).with_context(|| format!("Failed to parse case file: {path:?}"))
}

/// Build the configured process-boundary engine and load its keystores
fn open_engine(config_dir: &Path, logger: &Logger) -> Result<SubprocessEngine> {
    let config = BridgeConfig::load(config_dir)?;
    let program = config
        .engine_program
        .clone()
        .context("No engine program configured; run `walletlink init --engine <path>`")?;
    let engine = SubprocessEngine::new(program, logger).with_args(config.engine_args.clone());

    let engine_config = config.engine_config();
    engine.init(&engine_config)?;
    engine.scan_wallets(&engine_config.scan_config())?;
    Ok(engine)
}

//! Process-boundary stand-in engine.
//!
//! `mock-engine-cli [--dir D --key K --iv V] <request-hex>` prints the
//! result hex on stdout; errors go to stderr with a non-zero exit.
//!
//! Every run initializes over its keystore directory and loads what is
//! there before answering, so the options are fixed per engine and are
//! passed as prefix arguments (`engine_args`), never per request.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use walletlink_ffi::EngineConfig;
use walletlink_test_utils::{MockEngine, TEST_ENCRYPTION_IV, TEST_ENCRYPTION_KEY};

#[derive(Parser)]
#[command(name = "mock-engine-cli")]
#[command(about = "Stand-in wallet engine speaking hex envelopes over argv/stdout")]
struct Cli {
    /// Keystore directory, defaults to `walletlink-mock` under the temp dir
    #[arg(long)]
    dir: Option<PathBuf>,

    /// Keystore encryption key
    #[arg(long, default_value = TEST_ENCRYPTION_KEY)]
    key: String,

    /// Keystore encryption iv
    #[arg(long, default_value = TEST_ENCRYPTION_IV)]
    iv: String,

    /// Hex-encoded action envelope
    request: String,
}

fn run(cli: Cli) -> Result<String, String> {
    let dir = cli
        .dir
        .unwrap_or_else(|| std::env::temp_dir().join("walletlink-mock"));
    let engine = MockEngine::new();
    let config = EngineConfig::new(&dir, &cli.key, &cli.iv);
    engine.init(&config).map_err(|err| err.to_string())?;
    engine.scan(&dir).map_err(|err| err.to_string())?;
    engine
        .handle_hex(cli.request.trim())
        .map_err(|err| err.to_string())
}

fn main() -> ExitCode {
    // stderr is the error channel, so logging stays off unless asked for
    env_logger::Builder::from_env(env_logger::Env::new().filter("MOCK_ENGINE_LOG")).init();
    match run(Cli::parse()) {
        Ok(result) => {
            println!("{result}");
            ExitCode::SUCCESS
        }
        Err(message) => {
            eprintln!("{message}");
            ExitCode::FAILURE
        }
    }
}

//! # vitrina-cli: Storefront Host
//!
//! Command-line host for the pricing engine. The core stays pure; this
//! crate does the I/O around it.
//!
//! ## Startup Sequence
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Invocation                                        │
//! │                                                                         │
//! │  1. Parse Arguments ──────────────────────────────────────────────────► │
//! │     • clap derive, global --config / --json                             │
//! │                                                                         │
//! │  2. Initialize Logging ───────────────────────────────────────────────► │
//! │     • tracing-subscriber with env filter, written to stderr             │
//! │     • Default: INFO, vitrina crates at DEBUG; override with RUST_LOG    │
//! │                                                                         │
//! │  3. Load Configuration ───────────────────────────────────────────────► │
//! │     • defaults → vitrina.toml → VITRINA_* env vars → validate           │
//! │                                                                         │
//! │  4. Run Command ──────────────────────────────────────────────────────► │
//! │     • price / offers / cart / checkout                                  │
//! │     • output on stdout, errors on stderr with a sysexits status         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod commands;
pub mod config;
pub mod error;
pub mod render;
pub mod storage;

use std::process::ExitCode;

use clap::Parser;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use commands::Cli;
use config::AppConfig;
use error::CliError;

/// Runs one CLI invocation and returns the process exit code.
pub async fn run() -> ExitCode {
    let cli = Cli::parse();
    init_tracing();

    let json = cli.json;
    match execute(cli).await {
        Ok(output) => {
            print!("{}", output);
            if json {
                println!();
            }
            ExitCode::SUCCESS
        }
        Err(err) => {
            report(&err, json);
            err.exit_code()
        }
    }
}

async fn execute(cli: Cli) -> Result<String, CliError> {
    let config = AppConfig::load(cli.config.clone())?;
    info!(tax_rate = %config.policy().tax_rate.percentage(), "Configuration loaded");
    debug!(?config, "Effective configuration");

    cli.run(&config).await
}

fn report(err: &CliError, json: bool) {
    if json {
        match serde_json::to_string(err) {
            Ok(body) => eprintln!("{}", body),
            Err(_) => eprintln!("{}", err),
        }
    } else {
        eprintln!("error{}", err);
    }
}

/// Initializes the tracing subscriber for structured logging.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=vitrina=trace` - Show trace for vitrina crates only
/// - Default: INFO level, DEBUG for vitrina crates
///
/// Logs go to stderr so `--json` output stays parseable.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,vitrina=debug"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

//! # Commands
//!
//! Command-line surface over the storefront.
//!
//! ## Command Tree
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  vitrina [--config FILE] [--json]                                       │
//! │     │                                                                   │
//! │     ├── price     --cart FILE [--offers-file|--offers-url] [--now TS]   │
//! │     ├── offers    [--offers-file|--offers-url]                          │
//! │     ├── cart                                                            │
//! │     │     ├── add     --product-id ID --price P [--quantity N] [--tag]  │
//! │     │     ├── update  --product-id ID --quantity N                      │
//! │     │     ├── remove  --product-id ID                                   │
//! │     │     └── clear                                                     │
//! │     └── checkout  --cart FILE [--offers-file|--offers-url] [--now TS]   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every command returns its output as a string so tests can call
//! `execute` directly; `run()` in the crate root does the printing.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use clap::{Args, Parser, Subcommand};
use vitrina_offers::OffersSettings;

use crate::config::AppConfig;
use crate::error::CliResult;

pub mod cart;
pub mod checkout;
pub mod offers;
pub mod price;

// =============================================================================
// Top-level Parser
// =============================================================================

#[derive(Debug, Parser)]
#[command(name = "vitrina", about = "Storefront cart pricing and promotions", version)]
pub struct Cli {
    /// Config file (defaults to the platform config directory)
    #[arg(long, env = "VITRINA_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Print JSON instead of tables
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Price the cart against the current promotions
    Price(price::PriceArgs),
    /// List the promotions feed after normalization
    Offers(offers::OffersCommandArgs),
    /// Edit the cart file
    Cart(cart::CartCommand),
    /// Validate, price, and clear the cart
    Checkout(checkout::CheckoutArgs),
}

impl Cli {
    /// Dispatches to the selected command.
    pub async fn run(self, config: &AppConfig) -> CliResult<String> {
        let output = Output::from_flag(self.json);
        match self.command {
            Commands::Price(args) => price::execute(args, config, output).await,
            Commands::Offers(args) => offers::execute(args, config, output).await,
            Commands::Cart(command) => cart::execute(command, config, output).await,
            Commands::Checkout(args) => checkout::execute(args, config, output).await,
        }
    }
}

// =============================================================================
// Shared Arguments
// =============================================================================

/// Output format for a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Output {
    Table,
    Json,
}

impl Output {
    pub fn from_flag(json: bool) -> Self {
        if json {
            Output::Json
        } else {
            Output::Table
        }
    }
}

/// Location of the cart file.
#[derive(Debug, Clone, Args)]
pub struct CartFileArgs {
    /// Cart file
    #[arg(long = "cart", env = "VITRINA_CART", default_value = "cart.json", global = true)]
    pub path: PathBuf,
}

/// Per-invocation override of the promotions source.
#[derive(Debug, Clone, Default, Args)]
pub struct OffersArgs {
    /// Read promotions from a JSON file instead of the service
    #[arg(long, conflicts_with = "offers_url")]
    pub offers_file: Option<PathBuf>,

    /// Promotions service base URL
    #[arg(long)]
    pub offers_url: Option<String>,
}

impl OffersArgs {
    /// Settings with the flags layered over the configured ones.
    pub fn apply(&self, configured: &OffersSettings) -> OffersSettings {
        let mut settings = configured.clone();
        if let Some(file) = &self.offers_file {
            settings.file = Some(file.clone());
            settings.base_url = None;
        }
        if let Some(url) = &self.offers_url {
            settings.base_url = Some(url.clone());
            settings.file = None;
        }
        settings
    }
}

/// Evaluation time for promotion windows.
#[derive(Debug, Clone, Default, Args)]
pub struct ClockArgs {
    /// Evaluate promotions at this RFC 3339 instant instead of now
    #[arg(long)]
    pub now: Option<DateTime<Utc>>,
}

impl ClockArgs {
    pub fn now(&self) -> DateTime<Utc> {
        self.now.unwrap_or_else(Utc::now)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_price_with_flags() {
        let cli = Cli::parse_from([
            "vitrina",
            "--json",
            "price",
            "--cart",
            "my-cart.json",
            "--offers-file",
            "offers.json",
            "--now",
            "2024-06-01T12:00:00Z",
        ]);

        assert!(cli.json);
        match cli.command {
            Commands::Price(args) => {
                assert_eq!(args.cart.path, PathBuf::from("my-cart.json"));
                assert_eq!(args.offers.offers_file, Some(PathBuf::from("offers.json")));
                assert!(args.clock.now.is_some());
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_cart_file_flag_after_subcommand() {
        let cli = Cli::parse_from([
            "vitrina", "cart", "add", "--product-id", "A", "--price", "12.50", "--cart", "c.json",
        ]);

        match cli.command {
            Commands::Cart(command) => {
                assert_eq!(command.cart.path, PathBuf::from("c.json"));
                match command.command {
                    cart::CartSubcommand::Add(args) => {
                        assert_eq!(args.quantity, 1);
                        assert_eq!(args.price, vitrina_core::Money::from_cents(1250));
                    }
                    other => panic!("unexpected subcommand: {:?}", other),
                }
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_offers_flags_override_config() {
        let configured = OffersSettings {
            base_url: Some("https://api.example.com/".into()),
            ..Default::default()
        };

        let args = OffersArgs {
            offers_file: Some(PathBuf::from("offers.json")),
            offers_url: None,
        };
        let settings = args.apply(&configured);
        assert_eq!(settings.file, Some(PathBuf::from("offers.json")));
        assert_eq!(settings.base_url, None);

        let untouched = OffersArgs::default().apply(&configured);
        assert_eq!(untouched.base_url, configured.base_url);
    }
}

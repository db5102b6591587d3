//! # Application Configuration
//!
//! Configuration management for the CLI.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Command-line flags (highest priority, applied by commands)          │
//! │     --offers-file, --offers-url                                         │
//! │                                                                         │
//! │  2. Environment Variables                                               │
//! │     VITRINA_TAX_RATE=19                                                 │
//! │     VITRINA_OFFERS_URL=https://api.example.com/                         │
//! │                                                                         │
//! │  3. TOML Config File                                                    │
//! │     ~/.config/vitrina/vitrina.toml (Linux)                              │
//! │     ~/Library/Application Support/com.vitrina.vitrina/vitrina.toml      │
//! │                                                                         │
//! │  4. Default Values (lowest priority)                                    │
//! │     19% tax, no offers source, "$" with 2 decimals                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! # vitrina.toml
//! [pricing]
//! tax_rate_bps = 1900
//! enforce_valid_from = false
//! floor_sub_total = true
//!
//! [offers]
//! base_url = "https://api.example.com/"
//! endpoint = "offer"
//! timeout_secs = 10
//!
//! [display]
//! currency_symbol = "$"
//! currency_decimals = 2
//! ```

use std::path::{Path, PathBuf};

use rust_decimal::RoundingStrategy;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use vitrina_core::validation::validate_tax_rate_bps;
use vitrina_core::{Money, PricingPolicy, TaxRate, DEFAULT_TAX_RATE_BPS};
use vitrina_offers::OffersSettings;

use crate::error::{CliError, CliResult};

// =============================================================================
// Pricing Settings
// =============================================================================

/// `[pricing]` section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PricingSettings {
    /// Tax rate in basis points (1900 = 19%).
    #[serde(default = "default_tax_rate_bps")]
    pub tax_rate_bps: u32,

    /// Reject promotions that have not started yet.
    #[serde(default)]
    pub enforce_valid_from: bool,

    /// Floor the discounted subtotal at zero.
    #[serde(default = "default_true")]
    pub floor_sub_total: bool,
}

fn default_tax_rate_bps() -> u32 {
    DEFAULT_TAX_RATE_BPS
}

fn default_true() -> bool {
    true
}

impl Default for PricingSettings {
    fn default() -> Self {
        PricingSettings {
            tax_rate_bps: default_tax_rate_bps(),
            enforce_valid_from: false,
            floor_sub_total: true,
        }
    }
}

// =============================================================================
// Display Settings
// =============================================================================

/// `[display]` section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplaySettings {
    /// Currency symbol (for display)
    #[serde(default = "default_currency_symbol")]
    pub currency_symbol: String,

    /// Number of decimal places for currency
    #[serde(default = "default_currency_decimals")]
    pub currency_decimals: u8,
}

fn default_currency_symbol() -> String {
    "$".to_string()
}

fn default_currency_decimals() -> u8 {
    2
}

impl Default for DisplaySettings {
    fn default() -> Self {
        DisplaySettings {
            currency_symbol: default_currency_symbol(),
            currency_decimals: default_currency_decimals(),
        }
    }
}

// =============================================================================
// App Config
// =============================================================================

/// Complete CLI configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub pricing: PricingSettings,

    #[serde(default)]
    pub offers: OffersSettings,

    #[serde(default)]
    pub display: DisplaySettings,
}

impl AppConfig {
    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (vitrina.toml)
    /// 3. Environment variables
    ///
    /// An explicitly given path must exist; the default path is optional.
    pub fn load(config_path: Option<PathBuf>) -> CliResult<Self> {
        let mut config = match config_path {
            Some(path) => Self::from_file(&path)?,
            None => match Self::default_config_path() {
                Some(path) if path.exists() => Self::from_file(&path)?,
                Some(path) => {
                    debug!(?path, "Config file not found, using defaults");
                    Self::default()
                }
                None => Self::default(),
            },
        };

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    /// Parses a TOML file.
    pub fn from_file(path: &Path) -> CliResult<Self> {
        info!(?path, "Loading config from file");
        let contents = std::fs::read_to_string(path).map_err(|e| {
            CliError::config(format!("Failed to read config {}: {}", path.display(), e))
        })?;
        Self::from_toml(&contents)
    }

    /// Parses TOML text.
    pub fn from_toml(contents: &str) -> CliResult<Self> {
        Ok(toml::from_str(contents)?)
    }

    /// Validates the configuration.
    pub fn validate(&self) -> CliResult<()> {
        validate_tax_rate_bps(self.pricing.tax_rate_bps)
            .map_err(|e| CliError::config(e.to_string()))?;

        if self.display.currency_decimals > 6 {
            return Err(CliError::config("currency_decimals must be at most 6"));
        }

        self.offers.validate()?;

        Ok(())
    }

    /// Applies `VITRINA_*` environment variable overrides.
    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Applies overrides from any key lookup.
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        // Tax rate as a percentage, e.g. "19" or "8.25"
        if let Some(rate) = lookup("VITRINA_TAX_RATE") {
            match rate.trim().parse::<f64>() {
                Ok(pct) => {
                    debug!(rate = pct, "Overriding tax rate from environment");
                    self.pricing.tax_rate_bps = TaxRate::from_percentage(pct).bps();
                }
                Err(_) => warn!(value = %rate, "Ignoring invalid VITRINA_TAX_RATE"),
            }
        }

        if let Some(flag) = lookup("VITRINA_ENFORCE_VALID_FROM") {
            match parse_flag(&flag) {
                Some(enforce) => self.pricing.enforce_valid_from = enforce,
                None => warn!(value = %flag, "Ignoring invalid VITRINA_ENFORCE_VALID_FROM"),
            }
        }

        if let Some(flag) = lookup("VITRINA_FLOOR_SUBTOTAL") {
            match parse_flag(&flag) {
                Some(floor) => self.pricing.floor_sub_total = floor,
                None => warn!(value = %flag, "Ignoring invalid VITRINA_FLOOR_SUBTOTAL"),
            }
        }

        if let Some(symbol) = lookup("VITRINA_CURRENCY_SYMBOL") {
            self.display.currency_symbol = symbol;
        }

        self.offers.apply_overrides(&lookup);
    }

    /// Returns the default config file path.
    fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "vitrina", "vitrina")
            .map(|dirs| dirs.config_dir().join("vitrina.toml"))
    }

    // =========================================================================
    // Convenience Methods
    // =========================================================================

    /// The pricing policy the storefront runs with.
    pub fn policy(&self) -> PricingPolicy {
        PricingPolicy::new(TaxRate::from_bps(self.pricing.tax_rate_bps))
            .enforce_valid_from(self.pricing.enforce_valid_from)
            .floor_sub_total(self.pricing.floor_sub_total)
    }

    /// Formats an amount with the configured symbol and decimals.
    ///
    /// ## Example
    /// ```rust
    /// use vitrina_cli::config::AppConfig;
    /// use vitrina_core::Money;
    ///
    /// let config = AppConfig::default();
    /// assert_eq!(config.format_currency(Money::from_cents(1234)), "$12.34");
    /// ```
    pub fn format_currency(&self, amount: Money) -> String {
        let decimals = u32::from(self.display.currency_decimals);
        let rounded = amount
            .amount()
            .round_dp_with_strategy(decimals, RoundingStrategy::MidpointAwayFromZero);
        let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
            "-"
        } else {
            ""
        };

        format!(
            "{}{}{:.*}",
            sign,
            self.display.currency_symbol,
            decimals as usize,
            rounded.abs()
        )
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.pricing.tax_rate_bps, 1900);
        assert!(config.pricing.floor_sub_total);
        assert!(!config.pricing.enforce_valid_from);
        assert!(config.offers.base_url.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_toml() {
        let config = AppConfig::from_toml(
            r#"
            [pricing]
            tax_rate_bps = 1500
            enforce_valid_from = true

            [offers]
            base_url = "http://localhost:3000"

            [display]
            currency_symbol = "COP "
            currency_decimals = 0
            "#,
        )
        .unwrap();

        assert_eq!(config.pricing.tax_rate_bps, 1500);
        assert!(config.pricing.floor_sub_total);
        assert_eq!(config.offers.endpoint, "offer");
        assert_eq!(config.format_currency(Money::from_major(27_000)), "COP 27000");

        let policy = config.policy();
        assert_eq!(policy.tax_rate.bps(), 1500);
        assert!(policy.enforce_valid_from);
    }

    #[test]
    fn test_invalid_toml_is_config_error() {
        let err = AppConfig::from_toml("[pricing]\ntax_rate_bps = \"high\"").unwrap_err();
        assert_eq!(err.code, crate::error::ErrorCode::ConfigError);
    }

    #[test]
    fn test_validation() {
        let mut config = AppConfig::default();
        config.pricing.tax_rate_bps = 10_001;
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.offers.base_url = Some("ftp://nope".into());
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_overrides() {
        let vars: HashMap<&str, &str> = [
            ("VITRINA_TAX_RATE", "15"),
            ("VITRINA_FLOOR_SUBTOTAL", "false"),
            ("VITRINA_ENFORCE_VALID_FROM", "maybe"),
            ("VITRINA_OFFERS_FILE", "offers.json"),
        ]
        .into_iter()
        .collect();

        let mut config = AppConfig::default();
        config.apply_overrides(|key| vars.get(key).map(|v| v.to_string()));

        assert_eq!(config.pricing.tax_rate_bps, 1500);
        assert!(!config.pricing.floor_sub_total);
        assert!(!config.pricing.enforce_valid_from);
        assert_eq!(config.offers.file, Some(PathBuf::from("offers.json")));
    }

    #[test]
    fn test_format_currency() {
        let config = AppConfig::default();
        assert_eq!(config.format_currency(Money::from_cents(1234)), "$12.34");
        assert_eq!(config.format_currency(Money::from_cents(-1234)), "-$12.34");
        assert_eq!(config.format_currency(Money::zero()), "$0.00");
        assert_eq!(config.format_currency(Money::from_cents(-1) * rust_decimal::Decimal::new(1, 1)), "$0.00");
        assert_eq!(config.format_currency("26999.999999".parse().unwrap()), "$27000.00");
    }

    #[test]
    fn test_toml_serialization() {
        let toml_str = toml::to_string_pretty(&AppConfig::default()).unwrap();
        assert!(toml_str.contains("[pricing]"));
        assert!(toml_str.contains("[display]"));
    }
}

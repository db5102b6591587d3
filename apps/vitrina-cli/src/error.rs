//! # CLI Error Type
//!
//! Unified error type for commands.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in vitrina-cli                            │
//! │                                                                         │
//! │  Command Function                                                       │
//! │  CliResult<T>                                                           │
//! │       │                                                                 │
//! │       ├── Config error?   ── toml / OffersSettings ──┐                  │
//! │       ├── Cart file?      ── io / serde_json ────────┤                  │
//! │       ├── Checkout?       ── CoreError ──────────────┼──► CliError      │
//! │       └── Offers feed?    ── OffersError ────────────┘        │         │
//! │                                                               ▼         │
//! │                                   stderr: "error[CartError] ..."        │
//! │                                   exit code from ErrorCode              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::process::ExitCode;

use serde::Serialize;
use vitrina_core::CoreError;
use vitrina_offers::OffersError;

/// Result type alias for commands.
pub type CliResult<T> = Result<T, CliError>;

/// Error reported by a command.
///
/// ## Serialization
/// With `--json` the error is printed as:
/// ```json
/// {
///   "code": "CART_ERROR",
///   "message": "Cart is empty"
/// }
/// ```
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CliError {
    /// Machine-readable error code
    pub code: ErrorCode,

    /// Human-readable error message
    pub message: String,
}

/// Error codes for command failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Configuration could not be loaded or is invalid
    ConfigError,

    /// Input validation failed
    ValidationError,

    /// Cart operation or checkout failed
    CartError,

    /// Promotions feed could not be read
    OffersError,

    /// File could not be read or written
    IoError,

    /// Anything else
    Internal,
}

impl ErrorCode {
    /// Process exit status for this code (sysexits-style).
    pub fn exit_status(self) -> u8 {
        match self {
            ErrorCode::ValidationError => 65,
            ErrorCode::CartError => 65,
            ErrorCode::OffersError => 69,
            ErrorCode::Internal => 70,
            ErrorCode::IoError => 74,
            ErrorCode::ConfigError => 78,
        }
    }
}

impl CliError {
    /// Creates a new CLI error.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        CliError {
            code,
            message: message.into(),
        }
    }

    /// Creates a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        CliError::new(ErrorCode::ConfigError, message)
    }

    /// Creates a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        CliError::new(ErrorCode::ValidationError, message)
    }

    /// Creates a cart error.
    pub fn cart(message: impl Into<String>) -> Self {
        CliError::new(ErrorCode::CartError, message)
    }

    /// Process exit code for this error.
    pub fn exit_code(&self) -> ExitCode {
        ExitCode::from(self.code.exit_status())
    }
}

/// Converts core errors to CLI errors.
impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::EmptyCart => CliError::cart("Cart is empty, nothing to check out"),
            CoreError::InvalidLine { .. } => CliError::cart(err.to_string()),
            CoreError::MalformedCart(e) => CliError::validation(format!("Cart file is not valid: {}", e)),
            CoreError::Validation(e) => CliError::validation(e.to_string()),
        }
    }
}

/// Converts offers errors to CLI errors.
impl From<OffersError> for CliError {
    fn from(err: OffersError) -> Self {
        if err.is_config_error() {
            CliError::config(err.to_string())
        } else {
            CliError::new(ErrorCode::OffersError, err.to_string())
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(err: std::io::Error) -> Self {
        CliError::new(ErrorCode::IoError, err.to_string())
    }
}

impl From<serde_json::Error> for CliError {
    fn from(err: serde_json::Error) -> Self {
        tracing::error!("JSON encoding failed: {}", err);
        CliError::new(ErrorCode::Internal, "Failed to encode output")
    }
}

impl From<toml::de::Error> for CliError {
    fn from(err: toml::de::Error) -> Self {
        CliError::config(format!("Invalid config file: {}", err))
    }
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{:?}] {}", self.code, self.message)
    }
}

impl std::error::Error for CliError {}

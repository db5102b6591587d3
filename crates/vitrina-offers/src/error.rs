//! # Offers Error Types
//!
//! Error types for loading and normalizing promotions.
//!
//! ## Error Categories
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Offers Error Categories                            │
//! │                                                                         │
//! │  ┌─────────────────┐  ┌─────────────────┐  ┌─────────────────────────┐ │
//! │  │  Configuration  │  │   Transport     │  │     Record              │ │
//! │  │                 │  │                 │  │                         │ │
//! │  │  InvalidConfig  │  │  RequestFailed  │  │  InvalidRecord          │ │
//! │  │  InvalidUrl     │  │  Timeout        │  │                         │ │
//! │  │                 │  │  HttpStatus     │  │  (one record rejected,  │ │
//! │  │                 │  │  ReadFailed     │  │   the rest still load)  │ │
//! │  │                 │  │  DecodeFailed   │  │                         │ │
//! │  └─────────────────┘  └─────────────────┘  └─────────────────────────┘ │
//! │                                                                         │
//! │  Transport errors never reach pricing: load_promotions() degrades to    │
//! │  an empty snapshot instead.                                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

/// Result type alias for offers operations.
pub type OffersResult<T> = Result<T, OffersError>;

/// Everything that can go wrong between the feed and a `Promotion`.
#[derive(Debug, Error)]
pub enum OffersError {
    // =========================================================================
    // Configuration Errors
    // =========================================================================
    /// Invalid offers configuration.
    #[error("Invalid offers configuration: {0}")]
    InvalidConfig(String),

    /// Invalid base URL or endpoint.
    #[error("Invalid offers URL: {0}")]
    InvalidUrl(String),

    // =========================================================================
    // Transport Errors
    // =========================================================================
    /// The HTTP request could not be completed.
    #[error("Request failed: {0}")]
    RequestFailed(String),

    /// The HTTP request timed out.
    #[error("Request timed out")]
    Timeout,

    /// The promotions service answered with a non-success status.
    #[error("Offers service returned HTTP {status}")]
    HttpStatus { status: u16 },

    /// A local snapshot file could not be read.
    #[error("Failed to read offers file: {0}")]
    ReadFailed(String),

    /// The body was not JSON or had an unexpected shape.
    #[error("Failed to decode offers: {0}")]
    DecodeFailed(String),

    // =========================================================================
    // Record Errors
    // =========================================================================
    /// A single feed record could not be normalized.
    #[error("Invalid offer record {}: {reason}", id.as_deref().unwrap_or("<no id>"))]
    InvalidRecord { id: Option<String>, reason: String },
}

// =============================================================================
// Error Conversions
// =============================================================================

impl From<reqwest::Error> for OffersError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            OffersError::Timeout
        } else if err.is_decode() {
            OffersError::DecodeFailed(err.to_string())
        } else if let Some(status) = err.status() {
            OffersError::HttpStatus {
                status: status.as_u16(),
            }
        } else {
            OffersError::RequestFailed(err.to_string())
        }
    }
}

impl From<serde_json::Error> for OffersError {
    fn from(err: serde_json::Error) -> Self {
        OffersError::DecodeFailed(err.to_string())
    }
}

impl From<url::ParseError> for OffersError {
    fn from(err: url::ParseError) -> Self {
        OffersError::InvalidUrl(err.to_string())
    }
}

impl From<std::io::Error> for OffersError {
    fn from(err: std::io::Error) -> Self {
        OffersError::ReadFailed(err.to_string())
    }
}

// =============================================================================
// Error Categorization
// =============================================================================

impl OffersError {
    /// Builds a record rejection.
    pub fn record(id: Option<&str>, reason: impl Into<String>) -> Self {
        OffersError::InvalidRecord {
            id: id.map(str::to_string),
            reason: reason.into(),
        }
    }

    /// Returns true if fetching the feed failed as a whole.
    pub fn is_transport_error(&self) -> bool {
        matches!(
            self,
            OffersError::RequestFailed(_)
                | OffersError::Timeout
                | OffersError::HttpStatus { .. }
                | OffersError::ReadFailed(_)
                | OffersError::DecodeFailed(_)
        )
    }

    /// Returns true if only one record was affected.
    pub fn is_record_error(&self) -> bool {
        matches!(self, OffersError::InvalidRecord { .. })
    }

    /// Returns true if this error indicates a configuration problem.
    pub fn is_config_error(&self) -> bool {
        matches!(self, OffersError::InvalidConfig(_) | OffersError::InvalidUrl(_))
    }
}

//! # Offer Sources
//!
//! Where raw offer records come from. Every source returns the raw JSON
//! records; normalization is the loader's job.
//!
//! ## Response Shapes
//! The promotions service has served its list in three shapes over time.
//! All of them are accepted:
//! ```text
//! [ {...}, {...} ]                 bare array
//! { "offers": [ {...} ] }          wrapped
//! { "data":   [ {...} ] }          wrapped
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use tracing::{debug, info};
use url::Url;

use crate::error::{OffersError, OffersResult};

/// Anything that can produce raw offer records.
#[async_trait]
pub trait OfferSource: Send + Sync {
    /// Short human-readable description (URL or path) for logs.
    fn describe(&self) -> String;

    /// Fetches the raw records.
    async fn fetch_records(&self) -> OffersResult<Vec<Value>>;
}

/// Pulls the record list out of any accepted response shape.
///
/// # Errors
/// `OffersError::DecodeFailed` when the body is neither an array nor an
/// object wrapping one under `offers` or `data`.
pub fn extract_records(body: Value) -> OffersResult<Vec<Value>> {
    match body {
        Value::Array(records) => Ok(records),
        Value::Object(mut map) => {
            for key in ["offers", "data"] {
                if let Some(Value::Array(records)) = map.remove(key) {
                    return Ok(records);
                }
            }
            Err(OffersError::DecodeFailed(
                "expected an array or an object with an 'offers' or 'data' array".to_string(),
            ))
        }
        other => Err(OffersError::DecodeFailed(format!(
            "expected an array of offers, got {}",
            json_kind(&other)
        ))),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

// =============================================================================
// HTTP Source
// =============================================================================

/// `GET {base_url}/{endpoint}` against the promotions service.
#[derive(Debug, Clone)]
pub struct HttpOfferSource {
    client: reqwest::Client,
    url: Url,
}

impl HttpOfferSource {
    /// Creates a source for the full endpoint URL.
    ///
    /// # Errors
    /// `OffersError::InvalidConfig` if the HTTP client cannot be built.
    pub fn new(url: Url, timeout: Duration) -> OffersResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| OffersError::InvalidConfig(format!("HTTP client: {}", e)))?;
        Ok(HttpOfferSource { client, url })
    }

    pub fn url(&self) -> &Url {
        &self.url
    }
}

#[async_trait]
impl OfferSource for HttpOfferSource {
    fn describe(&self) -> String {
        self.url.to_string()
    }

    async fn fetch_records(&self) -> OffersResult<Vec<Value>> {
        debug!(url = %self.url, "Fetching offers");
        let response = self.client.get(self.url.clone()).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(OffersError::HttpStatus {
                status: status.as_u16(),
            });
        }

        let body: Value = response.json().await?;
        let records = extract_records(body)?;
        info!(url = %self.url, count = records.len(), "Offers fetched");
        Ok(records)
    }
}

// =============================================================================
// File Source
// =============================================================================

/// A JSON snapshot of the feed on disk.
#[derive(Debug, Clone)]
pub struct FileOfferSource {
    path: PathBuf,
}

impl FileOfferSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        FileOfferSource { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl OfferSource for FileOfferSource {
    fn describe(&self) -> String {
        self.path.display().to_string()
    }

    async fn fetch_records(&self) -> OffersResult<Vec<Value>> {
        let contents = tokio::fs::read_to_string(&self.path).await?;
        let body: Value = serde_json::from_str(&contents)?;
        let records = extract_records(body)?;
        info!(path = %self.path.display(), count = records.len(), "Offers read from file");
        Ok(records)
    }
}

// =============================================================================
// Static Source
// =============================================================================

/// A fixed in-memory list. Used when no feed is configured.
#[derive(Debug, Clone, Default)]
pub struct StaticOfferSource {
    records: Vec<Value>,
}

impl StaticOfferSource {
    pub fn new(records: Vec<Value>) -> Self {
        StaticOfferSource { records }
    }

    /// A source that yields no offers.
    pub fn empty() -> Self {
        Self::default()
    }
}

#[async_trait]
impl OfferSource for StaticOfferSource {
    fn describe(&self) -> String {
        format!("static ({} records)", self.records.len())
    }

    async fn fetch_records(&self) -> OffersResult<Vec<Value>> {
        Ok(self.records.clone())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

//! # Offers Configuration
//!
//! Where to load promotions from. Lives in the `[offers]` section of
//! `vitrina.toml`.
//!
//! ## Source Selection
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  file set?      ──yes──► FileOfferSource(file)                          │
//! │     │ no                                                                │
//! │  base_url set?  ──yes──► HttpOfferSource(base_url + endpoint, timeout)  │
//! │     │ no                                                                │
//! │     └──────────────────► StaticOfferSource::empty()  (no promotions)    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! [offers]
//! base_url = "https://api.example.com/"
//! endpoint = "offer"
//! timeout_secs = 10
//! # file = "offers.json"   # takes precedence over base_url
//! ```

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use url::Url;

use crate::error::{OffersError, OffersResult};
use crate::source::{FileOfferSource, HttpOfferSource, OfferSource, StaticOfferSource};

/// Settings for the promotions feed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OffersSettings {
    /// Base URL of the promotions service.
    #[serde(default)]
    pub base_url: Option<String>,

    /// Path under `base_url` serving the offer list.
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Local JSON snapshot of the feed.
    #[serde(default)]
    pub file: Option<PathBuf>,

    /// HTTP request timeout (seconds).
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

fn default_endpoint() -> String {
    "offer".to_string()
}

fn default_timeout() -> u64 {
    10
}

impl Default for OffersSettings {
    fn default() -> Self {
        OffersSettings {
            base_url: None,
            endpoint: default_endpoint(),
            file: None,
            timeout_secs: default_timeout(),
        }
    }
}

impl OffersSettings {
    /// Validates the settings.
    pub fn validate(&self) -> OffersResult<()> {
        if self.base_url.is_some() {
            self.endpoint_url()?;
        }

        if self.timeout_secs == 0 {
            return Err(OffersError::InvalidConfig(
                "timeout_secs must be greater than 0".into(),
            ));
        }

        Ok(())
    }

    /// Full URL of the offer endpoint, if a base URL is configured.
    ///
    /// # Errors
    /// `OffersError::InvalidUrl` for unparseable URLs or schemes other
    /// than http/https.
    pub fn endpoint_url(&self) -> OffersResult<Url> {
        let base = self
            .base_url
            .as_deref()
            .ok_or_else(|| OffersError::InvalidConfig("base_url is not set".into()))?;

        // Url::join drops the last path segment unless it ends with '/'
        let mut base = Url::parse(base)?;
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }

        if base.scheme() != "http" && base.scheme() != "https" {
            return Err(OffersError::InvalidUrl(format!(
                "Offers URL must start with http:// or https://, got: {}",
                base
            )));
        }

        Ok(base.join(self.endpoint.trim_start_matches('/'))?)
    }

    /// Request timeout as a `Duration`.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Builds the configured source.
    pub fn build_source(&self) -> OffersResult<Box<dyn OfferSource>> {
        if let Some(path) = &self.file {
            debug!(path = %path.display(), "Using offers file");
            return Ok(Box::new(FileOfferSource::new(path.clone())));
        }

        if self.base_url.is_some() {
            let url = self.endpoint_url()?;
            debug!(url = %url, "Using offers service");
            return Ok(Box::new(HttpOfferSource::new(url, self.timeout())?));
        }

        info!("No offers source configured, pricing without promotions");
        Ok(Box::new(StaticOfferSource::empty()))
    }

    /// Applies `VITRINA_OFFERS_*` environment variable overrides.
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Applies overrides from any key lookup.
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(url) = lookup("VITRINA_OFFERS_URL") {
            debug!(url = %url, "Overriding offers URL from environment");
            self.base_url = Some(url);
        }

        if let Some(file) = lookup("VITRINA_OFFERS_FILE") {
            debug!(file = %file, "Overriding offers file from environment");
            self.file = Some(PathBuf::from(file));
        }

        if let Some(timeout) = lookup("VITRINA_OFFERS_TIMEOUT_SECS") {
            match timeout.parse::<u64>() {
                Ok(secs) => self.timeout_secs = secs,
                Err(_) => warn!(value = %timeout, "Ignoring invalid VITRINA_OFFERS_TIMEOUT_SECS"),
            }
        }
    }
}

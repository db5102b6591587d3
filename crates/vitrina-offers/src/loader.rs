//! # Promotions Loader
//!
//! Turns a source's raw records into a [`PromotionSnapshot`].
//!
//! ## Failure Handling
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  load_promotions(source, now)                                           │
//! │       │                                                                 │
//! │       ├── fetch fails (network, timeout, bad body)                      │
//! │       │        └──► warn!  → PromotionSnapshot::empty()  (discount = 0) │
//! │       │                                                                 │
//! │       └── fetch ok → normalize each record                              │
//! │                ├── ok       → kept, feed order preserved                │
//! │                └── rejected → warn!, skipped                            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use tracing::{info, warn};

use vitrina_core::{Promotion, PromotionSnapshot};

use crate::error::{OffersError, OffersResult};
use crate::record::OfferRecord;
use crate::source::OfferSource;

/// A record that could not be normalized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RejectedRecord {
    pub index: usize,
    pub id: Option<String>,
    pub reason: String,
}

/// Outcome of normalizing a feed.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedOffers {
    pub promotions: Vec<Promotion>,
    pub rejected: Vec<RejectedRecord>,
}

impl NormalizedOffers {
    /// Wraps the accepted promotions in a snapshot taken at `fetched_at`.
    pub fn into_snapshot(self, fetched_at: DateTime<Utc>) -> PromotionSnapshot {
        PromotionSnapshot::new(self.promotions, fetched_at)
    }
}

/// Normalizes every record, skipping the ones that fail.
pub fn normalize_records(records: Vec<Value>) -> NormalizedOffers {
    let mut normalized = NormalizedOffers::default();

    for (index, raw) in records.into_iter().enumerate() {
        match OfferRecord::from_value(raw).and_then(OfferRecord::into_promotion) {
            Ok(promotion) => normalized.promotions.push(promotion),
            Err(err) => {
                warn!(index, error = %err, "Skipping offer record");
                let (id, reason) = match err {
                    OffersError::InvalidRecord { id, reason } => (id, reason),
                    other => (None, other.to_string()),
                };
                normalized.rejected.push(RejectedRecord { index, id, reason });
            }
        }
    }

    normalized
}

/// Fetches and normalizes, surfacing transport errors.
///
/// # Errors
/// Whatever the source reports. Individual bad records are not errors.
pub async fn fetch_offers(source: &dyn OfferSource) -> OffersResult<NormalizedOffers> {
    let records = source.fetch_records().await?;
    let normalized = normalize_records(records);
    info!(
        source = %source.describe(),
        accepted = normalized.promotions.len(),
        rejected = normalized.rejected.len(),
        "Offers normalized"
    );
    Ok(normalized)
}

/// Loads the snapshot the store prices against. Never fails.
///
/// Any transport failure yields an empty snapshot, so the cart still
/// renders at its undiscounted total.
pub async fn load_promotions(source: &dyn OfferSource, now: DateTime<Utc>) -> PromotionSnapshot {
    match fetch_offers(source).await {
        Ok(normalized) => normalized.into_snapshot(now),
        Err(err) => {
            warn!(source = %source.describe(), error = %err, "Failed to load promotions, pricing without discounts");
            PromotionSnapshot::empty()
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

//! # vitrina-offers: Promotions Feed Boundary
//!
//! Loads promotions from the promotions service (or a file snapshot) and
//! normalizes the feed's loose records into [`vitrina_core::Promotion`].
//! Nothing reaches the pricing core without passing through here.
//!
//! ## Data Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │   OffersSettings ──build_source()──► Box<dyn OfferSource>               │
//! │                                            │                            │
//! │                                 fetch_records().await                   │
//! │                                            │ Vec<serde_json::Value>     │
//! │                                            ▼                            │
//! │                                   normalize_records()                   │
//! │                                            │                            │
//! │                    ┌───────────────────────┴──────────────┐             │
//! │                    ▼                                      ▼             │
//! │             Vec<Promotion>                      Vec<RejectedRecord>     │
//! │                    │                                                    │
//! │                    ▼                                                    │
//! │             PromotionSnapshot ──► Storefront::replace_promotions        │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//! - [`config`] - `[offers]` settings and source selection
//! - [`source`] - HTTP, file and static sources
//! - [`record`] - Raw feed record and its normalization
//! - [`loader`] - Snapshot loading with fail-safe degradation
//! - [`error`] - Offers error types
//!
//! ## Usage
//!
//! ```rust,no_run
//! use chrono::Utc;
//! use vitrina_offers::{load_promotions, OffersSettings};
//!
//! # async fn run() -> vitrina_offers::OffersResult<()> {
//! let settings = OffersSettings {
//!     base_url: Some("https://api.example.com/".into()),
//!     ..Default::default()
//! };
//! let source = settings.build_source()?;
//!
//! // Never fails: a dead service means an empty snapshot
//! let snapshot = load_promotions(source.as_ref(), Utc::now()).await;
//! println!("{} promotions", snapshot.len());
//! # Ok(())
//! # }
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod config;
pub mod error;
pub mod loader;
pub mod record;
pub mod source;

// =============================================================================
// Re-exports
// =============================================================================

pub use config::OffersSettings;
pub use error::{OffersError, OffersResult};
pub use loader::{fetch_offers, load_promotions, normalize_records, NormalizedOffers, RejectedRecord};
pub use record::OfferRecord;
pub use source::{extract_records, FileOfferSource, HttpOfferSource, OfferSource, StaticOfferSource};

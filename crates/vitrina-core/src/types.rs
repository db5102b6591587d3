//! # Domain Types
//!
//! Core value types used throughout Vitrina.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    TaxRate      │   │   Percentage    │   │    Product      │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  bps (u32)      │   │  0..=100        │   │  id             │       │
//! │  │  1900 = 19%     │   │  decimal        │   │  name           │       │
//! │  │  never < 0      │   │  10 = 10% off   │   │  price (w/ tax) │       │
//! │  └─────────────────┘   └─────────────────┘   │  packaging_tags │       │
//! │                                              └─────────────────┘       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;

// =============================================================================
// Tax Rate
// =============================================================================

/// Tax rate represented in basis points (bps).
///
/// ## Why Basis Points?
/// 1 basis point = 0.01% = 1/10000
/// 1900 bps = 19% (Colombian IVA), 1500 bps = 15%
///
/// ## Why Unsigned?
/// The tax-inclusive split divides by `1 + rate`. An unsigned rate keeps
/// that divisor at 1 or more, so the division can never blow up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct TaxRate(u32);

impl TaxRate {
    /// Creates a tax rate from basis points.
    #[inline]
    pub const fn from_bps(bps: u32) -> Self {
        TaxRate(bps)
    }

    /// Creates a tax rate from a percentage (for convenience).
    ///
    /// Negative or non-finite input yields a zero rate.
    pub fn from_percentage(pct: f64) -> Self {
        if !pct.is_finite() || pct <= 0.0 {
            return TaxRate::zero();
        }
        TaxRate((pct * 100.0).round() as u32)
    }

    /// Returns the rate in basis points.
    #[inline]
    pub const fn bps(&self) -> u32 {
        self.0
    }

    /// Returns the rate as an exact fraction (1900 bps → 0.19).
    #[inline]
    pub fn fraction(&self) -> Decimal {
        Decimal::new(i64::from(self.0), 4)
    }

    /// Returns the rate as a percentage (for display only).
    #[inline]
    pub fn percentage(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    /// Zero tax rate.
    #[inline]
    pub const fn zero() -> Self {
        TaxRate(0)
    }

    /// Checks if tax rate is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }
}

impl Default for TaxRate {
    fn default() -> Self {
        TaxRate::from_bps(crate::DEFAULT_TAX_RATE_BPS)
    }
}

// =============================================================================
// Percentage
// =============================================================================

/// A promotion discount rate between 0 and 100 percent.
///
/// The value is clamped into range on construction, so a `Percentage`
/// held anywhere in the core is always usable as-is.
///
/// Deserialization goes through [`Percentage::new`] as well.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(from = "Decimal")]
pub struct Percentage(#[ts(type = "string")] Decimal);

impl From<Decimal> for Percentage {
    fn from(value: Decimal) -> Self {
        Percentage::new(value)
    }
}

impl Percentage {
    /// Creates a percentage, clamping into `0..=100`.
    pub fn new(value: Decimal) -> Self {
        Percentage(value.clamp(Decimal::ZERO, Decimal::ONE_HUNDRED))
    }

    /// Creates a percentage from a whole number (10 → 10%).
    pub fn from_whole(value: u32) -> Self {
        Percentage::new(Decimal::from(value))
    }

    /// Returns the percentage value (10% → 10).
    #[inline]
    pub const fn value(&self) -> Decimal {
        self.0
    }

    /// Returns the rate as an exact fraction (10% → 0.1).
    #[inline]
    pub fn fraction(&self) -> Decimal {
        self.0 / Decimal::ONE_HUNDRED
    }

    /// Checks if the percentage is zero.
    #[inline]
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }
}

impl std::fmt::Display for Percentage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}%", self.0.normalize())
    }
}

// =============================================================================
// Product
// =============================================================================

/// A catalog product as handed to the cart by the catalog UI.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Catalog identifier (the storefront's `_id`).
    pub id: String,

    /// Display name shown in the cart.
    #[serde(default)]
    pub name: String,

    /// Shelf price, tax included.
    pub price: Money,

    /// Packaging markers (e.g. "master") carried onto the cart line.
    #[serde(default)]
    pub packaging_tags: Vec<String>,
}

impl Product {
    /// Creates a product without packaging tags.
    pub fn new(id: impl Into<String>, name: impl Into<String>, price: Money) -> Self {
        Product {
            id: id.into(),
            name: name.into(),
            price,
            packaging_tags: Vec::new(),
        }
    }

    /// Adds a packaging tag.
    pub fn with_packaging_tag(mut self, tag: impl Into<String>) -> Self {
        self.packaging_tags.push(tag.into());
        self
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

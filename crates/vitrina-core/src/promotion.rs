//! # Promotions
//!
//! Promotion rules as the pricing core sees them: already normalized,
//! read-only, and handed over as a [`PromotionSnapshot`].
//!
//! ## Rule Anatomy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Promotion                                                              │
//! │  ─────────                                                              │
//! │  percentage ──► discount applied to the PRE-TAX amount                  │
//! │                                                                         │
//! │  scope      ──► All            every line (cart-level, applied once)    │
//! │                 Products(ids)  only lines whose product_id is listed    │
//! │                                                                         │
//! │  tier       ──► Unit           line.quantity >= minimum_quantity        │
//! │                 Master         no quantity gate (bulk package price)    │
//! │                                                                         │
//! │  state      ──► Active / Inactive (admin switch)                        │
//! │  valid_to   ──► now > valid_to  → expired                               │
//! │  valid_from ──► only checked when the policy enforces it                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::types::Percentage;

// =============================================================================
// Promotion Enums
// =============================================================================

/// Administrative on/off switch, independent of the date window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum PromotionState {
    /// The promotion may apply.
    Active,
    /// The promotion never applies.
    #[default]
    Inactive,
}

/// How a promotion activates on a matching line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum PromotionTier {
    /// Per-unit pricing: the line needs `minimum_quantity` units.
    #[default]
    Unit,
    /// Master-package pricing: applies at any quantity.
    Master,
}

/// Which cart lines a promotion targets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum PromotionScope {
    /// Every line in the cart.
    All,
    /// Only lines whose product id is listed.
    Products(Vec<String>),
}

impl PromotionScope {
    /// Checks whether the scope covers the given product.
    ///
    /// An empty product list covers nothing.
    pub fn covers(&self, product_id: &str) -> bool {
        match self {
            PromotionScope::All => true,
            PromotionScope::Products(ids) => ids.iter().any(|id| id == product_id),
        }
    }

    /// Checks whether this is a whole-cart scope.
    #[inline]
    pub fn is_all(&self) -> bool {
        matches!(self, PromotionScope::All)
    }
}

// =============================================================================
// Promotion
// =============================================================================

/// A time-bounded percentage discount rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Promotion {
    /// Identifier from the promotions service.
    pub id: String,

    /// Discount rate applied to the pre-tax amount.
    pub percentage: Percentage,

    /// Targeted lines.
    pub scope: PromotionScope,

    /// Activation mode.
    pub tier: PromotionTier,

    /// Units a line needs for a `Unit` tier promotion (always >= 1).
    pub minimum_quantity: i64,

    /// Start of the window. Not enforced unless the policy says so.
    #[ts(as = "Option<String>")]
    pub valid_from: Option<DateTime<Utc>>,

    /// End of the window (inclusive).
    #[ts(as = "String")]
    pub valid_to: DateTime<Utc>,

    /// Administrative switch.
    pub state: PromotionState,
}

impl Promotion {
    /// An active, whole-cart promotion.
    pub fn all_products(
        id: impl Into<String>,
        percentage: Percentage,
        valid_to: DateTime<Utc>,
    ) -> Self {
        Promotion {
            id: id.into(),
            percentage,
            scope: PromotionScope::All,
            tier: PromotionTier::Unit,
            minimum_quantity: 1,
            valid_from: None,
            valid_to,
            state: PromotionState::Active,
        }
    }

    /// An active, unit-tier promotion on specific products.
    pub fn for_products<I, S>(
        id: impl Into<String>,
        percentage: Percentage,
        product_ids: I,
        minimum_quantity: i64,
        valid_to: DateTime<Utc>,
    ) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Promotion {
            id: id.into(),
            percentage,
            scope: PromotionScope::Products(product_ids.into_iter().map(Into::into).collect()),
            tier: PromotionTier::Unit,
            minimum_quantity: minimum_quantity.max(1),
            valid_from: None,
            valid_to,
            state: PromotionState::Active,
        }
    }

    /// Switches the promotion to the master-package tier.
    pub fn master(mut self) -> Self {
        self.tier = PromotionTier::Master;
        self
    }

    /// Sets the administrative state.
    pub fn with_state(mut self, state: PromotionState) -> Self {
        self.state = state;
        self
    }

    /// Sets the start of the validity window.
    pub fn starting(mut self, valid_from: DateTime<Utc>) -> Self {
        self.valid_from = Some(valid_from);
        self
    }

    /// Checks whether the promotion is in effect at `now`.
    ///
    /// ## Rule
    /// `state == Active && now <= valid_to`, plus `now >= valid_from` when
    /// `enforce_valid_from` is set and a start date exists.
    pub fn is_in_effect(&self, now: DateTime<Utc>, enforce_valid_from: bool) -> bool {
        if self.state != PromotionState::Active {
            return false;
        }

        if now > self.valid_to {
            return false;
        }

        if enforce_valid_from {
            if let Some(valid_from) = self.valid_from {
                return now >= valid_from;
            }
        }

        true
    }
}

// =============================================================================
// Promotion Snapshot
// =============================================================================

/// The immutable promotions list handed to the pricing engine.
///
/// Loaded once (e.g. when the cart page opens) and replaced wholesale;
/// never patched incrementally.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct PromotionSnapshot {
    /// Normalized promotions, in feed order.
    pub promotions: Vec<Promotion>,

    /// When the snapshot was taken, if known.
    #[ts(as = "Option<String>")]
    pub fetched_at: Option<DateTime<Utc>>,
}

impl PromotionSnapshot {
    /// A snapshot with no promotions (discount is always zero).
    pub fn empty() -> Self {
        Self::default()
    }

    /// Wraps a promotion list taken at `fetched_at`.
    pub fn new(promotions: Vec<Promotion>, fetched_at: DateTime<Utc>) -> Self {
        PromotionSnapshot {
            promotions,
            fetched_at: Some(fetched_at),
        }
    }

    /// Returns the promotions as a slice.
    pub fn as_slice(&self) -> &[Promotion] {
        &self.promotions
    }

    /// Promotions in effect at `now`.
    pub fn in_effect(
        &self,
        now: DateTime<Utc>,
        enforce_valid_from: bool,
    ) -> impl Iterator<Item = &Promotion> {
        self.promotions
            .iter()
            .filter(move |promotion| promotion.is_in_effect(now, enforce_valid_from))
    }

    /// Number of promotions in the snapshot.
    pub fn len(&self) -> usize {
        self.promotions.len()
    }

    /// Checks if the snapshot is empty.
    pub fn is_empty(&self) -> bool {
        self.promotions.is_empty()
    }
}

impl From<Vec<Promotion>> for PromotionSnapshot {
    fn from(promotions: Vec<Promotion>) -> Self {
        PromotionSnapshot {
            promotions,
            fetched_at: None,
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_scope_covers() {
        assert!(PromotionScope::All.covers("anything"));

        let scoped = PromotionScope::Products(vec!["A".to_string(), "B".to_string()]);
        assert!(scoped.covers("A"));
        assert!(!scoped.covers("C"));

        assert!(!PromotionScope::Products(Vec::new()).covers("A"));
    }

    #[test]
    fn test_in_effect_requires_active_state() {
        let now = Utc::now();
        let promo = Promotion::all_products("p", Percentage::from_whole(10), now + Duration::days(1));
        assert!(promo.is_in_effect(now, false));

        let inactive = promo.with_state(PromotionState::Inactive);
        assert!(!inactive.is_in_effect(now, false));
    }

    #[test]
    fn test_in_effect_end_is_inclusive() {
        let now = Utc::now();
        let promo = Promotion::all_products("p", Percentage::from_whole(10), now);
        assert!(promo.is_in_effect(now, false));
        assert!(!promo.is_in_effect(now + Duration::seconds(1), false));
    }

    #[test]
    fn test_valid_from_only_enforced_on_request() {
        let now = Utc::now();
        let promo = Promotion::all_products("p", Percentage::from_whole(10), now + Duration::days(10))
            .starting(now + Duration::days(2));

        assert!(promo.is_in_effect(now, false));
        assert!(!promo.is_in_effect(now, true));
        assert!(promo.is_in_effect(now + Duration::days(3), true));
    }

    #[test]
    fn test_minimum_quantity_is_at_least_one() {
        let promo = Promotion::for_products("p", Percentage::from_whole(5), ["A"], 0, Utc::now());
        assert_eq!(promo.minimum_quantity, 1);
    }

    #[test]
    fn test_snapshot_in_effect_filters() {
        let now = Utc::now();
        let live = Promotion::all_products("live", Percentage::from_whole(10), now + Duration::days(1));
        let expired = Promotion::all_products("expired", Percentage::from_whole(10), now - Duration::days(1));
        let snapshot = PromotionSnapshot::new(vec![live, expired], now);

        let ids: Vec<&str> = snapshot.in_effect(now, false).map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["live"]);
        assert_eq!(snapshot.len(), 2);
    }

    #[test]
    fn test_scope_serialization_shape() {
        let json = serde_json::to_value(PromotionScope::Products(vec!["A".to_string()])).unwrap();
        assert_eq!(json, serde_json::json!({ "products": ["A"] }));
        assert_eq!(serde_json::to_value(PromotionScope::All).unwrap(), serde_json::json!("all"));
    }

    #[test]
    fn test_deserialized_snapshot_clamps_percentage() {
        let now = Utc::now();
        let promo = Promotion::all_products("p", Percentage::from_whole(10), now + Duration::days(1));
        let mut json = serde_json::to_value(PromotionSnapshot::from(vec![promo])).unwrap();
        json["promotions"][0]["percentage"] = serde_json::json!("150");

        let snapshot: PromotionSnapshot = serde_json::from_value(json).unwrap();
        assert_eq!(snapshot.promotions[0].percentage, Percentage::from_whole(100));
    }
}

//! # Pricing Orchestrator
//!
//! Turns `(cart lines, promotions, now, policy)` into a [`PricingBreakdown`].
//! This is the only place that sums discounts; everything above it just
//! renders the breakdown.
//!
//! ## Pricing Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  1. aggregate(lines, r)        → sub_total S, tax, total (pre-discount) │
//! │                                                                         │
//! │  2. for each promotion in effect at `now`:                              │
//! │        scope All       → discount += S × pct           (once)           │
//! │        scope Products  → discount += Σ line_discount(promo, line)       │
//! │                                                                         │
//! │  3. discount == 0?     → keep the pre-discount tax and total            │
//! │                                                                         │
//! │  4. final_sub = S - discount     (floored at 0 when the policy says so) │
//! │     final_tax = final_sub × r    (recomputed, not prorated)             │
//! │     total     = final_sub + final_tax                                   │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Worked Example
//! ```text
//! Cart: A × 3 @ 10000 (tax incl.), r = 19%, one All promotion at 10%
//!
//!   S          = 30000 / 1.19        = 25210.08
//!   discount   = S × 0.10            =  2521.01
//!   final_sub  = S - discount        = 22689.08
//!   final_tax  = final_sub × 0.19    =  4310.92
//!   total      = final_sub + tax     = 27000.00
//! ```
//!
//! Intermediate values are exact; the figures above are shown rounded to
//! two places, half away from zero (`Money::rounded`). The exact final
//! subtotal is 22689.0756..., so truncating instead would print 22689.07.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;
use ts_rs::TS;

use crate::aggregate::aggregate;
use crate::cart::CartLine;
use crate::eligibility::line_discount;
use crate::money::Money;
use crate::promotion::Promotion;
use crate::tax::TaxSplit;
use crate::types::TaxRate;

// =============================================================================
// Pricing Policy
// =============================================================================

/// Knobs that change how a cart is priced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct PricingPolicy {
    /// Rate used for both the inclusive split and the recompute.
    pub tax_rate: TaxRate,

    /// Reject promotions whose `valid_from` lies in the future.
    pub enforce_valid_from: bool,

    /// Floor the discounted subtotal at zero.
    pub floor_sub_total: bool,
}

impl PricingPolicy {
    /// Policy with the given rate and default switches.
    pub fn new(tax_rate: TaxRate) -> Self {
        PricingPolicy {
            tax_rate,
            enforce_valid_from: false,
            floor_sub_total: true,
        }
    }

    /// Sets whether `valid_from` is enforced.
    pub fn enforce_valid_from(mut self, enforce: bool) -> Self {
        self.enforce_valid_from = enforce;
        self
    }

    /// Sets whether the discounted subtotal is floored at zero.
    pub fn floor_sub_total(mut self, floor: bool) -> Self {
        self.floor_sub_total = floor;
        self
    }
}

impl Default for PricingPolicy {
    fn default() -> Self {
        PricingPolicy::new(TaxRate::default())
    }
}

// =============================================================================
// Breakdown Types
// =============================================================================

/// Per-line figures shown next to each cart row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct LineBreakdown {
    pub product_id: String,
    pub pre_tax: Money,
    pub tax: Money,
    pub total: Money,
    /// Sum of what the in-effect promotions would take off this line.
    /// Display only; the cart discount is computed separately.
    pub discount: Money,
}

/// What one promotion took off the cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct AppliedPromotion {
    pub promotion_id: String,
    pub discount: Money,
}

/// Result of pricing a cart. Derived on demand, never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct PricingBreakdown {
    /// The priced lines, in cart order.
    pub lines: Vec<CartLine>,

    /// Per-line figures, parallel to `lines`.
    pub line_details: Vec<LineBreakdown>,

    /// Promotions that contributed a non-zero discount, in feed order.
    pub applied: Vec<AppliedPromotion>,

    /// Pre-tax subtotal after discount.
    pub sub_total: Money,

    /// Tax on the discounted subtotal.
    pub tax: Money,

    /// Amount to pay.
    pub total: Money,

    /// Total pre-tax discount.
    pub discount: Money,

    /// Sum of line quantities.
    pub items_in_cart: i64,

    /// Rate the cart was priced at.
    pub tax_rate: TaxRate,
}

impl PricingBreakdown {
    /// Checks whether any promotion reduced the price.
    pub fn is_discounted(&self) -> bool {
        !self.discount.is_zero()
    }
}

// =============================================================================
// Orchestrator
// =============================================================================

/// Prices a cart against a promotions list.
///
/// Total over its inputs: never fails, never panics. Given the same
/// `(lines, promotions, now, policy)` it returns the same breakdown.
pub fn price_cart(
    lines: &[CartLine],
    promotions: &[Promotion],
    now: DateTime<Utc>,
    policy: &PricingPolicy,
) -> PricingBreakdown {
    let rate = policy.tax_rate;
    let totals = aggregate(lines, rate);

    let mut line_discounts = vec![Money::zero(); lines.len()];
    let mut applied = Vec::new();
    let mut discount = Money::zero();

    for promotion in promotions
        .iter()
        .filter(|promotion| promotion.is_in_effect(now, policy.enforce_valid_from))
    {
        let mut contributed = Money::zero();
        for (slot, line) in line_discounts.iter_mut().zip(lines) {
            let share = line_discount(promotion, line, now, policy);
            *slot += share;
            contributed += share;
        }

        // A whole-cart promotion is taken once off the subtotal.
        if promotion.scope.is_all() {
            contributed = totals.sub_total.portion(promotion.percentage);
        }

        if contributed.is_zero() {
            continue;
        }

        debug!(promotion_id = %promotion.id, discount = %contributed.rounded(), "Promotion applied");
        discount += contributed;
        applied.push(AppliedPromotion {
            promotion_id: promotion.id.clone(),
            discount: contributed,
        });
    }

    let line_details = lines
        .iter()
        .zip(line_discounts)
        .map(|(line, annotated)| {
            let split = line.split(rate);
            LineBreakdown {
                product_id: line.product_id.clone(),
                pre_tax: split.pre_tax,
                tax: split.tax,
                total: split.total,
                discount: annotated,
            }
        })
        .collect();

    let (final_split, discount) = if discount.is_zero() {
        (
            TaxSplit {
                pre_tax: totals.sub_total,
                tax: totals.tax,
                total: totals.total,
            },
            discount,
        )
    } else {
        let mut final_sub_total = totals.sub_total - discount;
        let mut discount = discount;
        if policy.floor_sub_total && final_sub_total.is_negative() {
            debug!(
                sub_total = %totals.sub_total.rounded(),
                discount = %discount.rounded(),
                "Discount exceeds subtotal, flooring at zero"
            );
            final_sub_total = Money::zero();
            discount = totals.sub_total;
        }
        (TaxSplit::from_pre_tax(final_sub_total, rate), discount)
    };

    debug!(
        lines = lines.len(),
        items = totals.items_in_cart,
        applied = applied.len(),
        total = %final_split.total.rounded(),
        "Cart priced"
    );

    PricingBreakdown {
        lines: lines.to_vec(),
        line_details,
        applied,
        sub_total: final_split.pre_tax,
        tax: final_split.tax,
        total: final_split.total,
        discount,
        items_in_cart: totals.items_in_cart,
        tax_rate: rate,
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

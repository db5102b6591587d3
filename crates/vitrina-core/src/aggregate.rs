//! # Cart Aggregator
//!
//! One pass over the cart lines producing the pre-discount totals.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  for line in lines:                                                     │
//! │      gross      = unit_price × quantity        (tax included)           │
//! │      sub_total += gross / (1 + r)                                       │
//! │      tax       += gross - gross / (1 + r)                               │
//! │      total     += gross                                                 │
//! │      items     += quantity                                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::cart::CartLine;
use crate::money::Money;
use crate::types::TaxRate;

/// Pre-discount totals of a cart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CartTotals {
    /// Sum of line pre-tax amounts.
    pub sub_total: Money,
    /// Sum of line tax portions.
    pub tax: Money,
    /// Sum of tax-inclusive line values.
    pub total: Money,
    /// Sum of line quantities.
    pub items_in_cart: i64,
    /// Number of distinct lines.
    pub line_count: usize,
}

/// Aggregates the cart at `rate`. An empty cart yields all zeros.
pub fn aggregate(lines: &[CartLine], rate: TaxRate) -> CartTotals {
    lines.iter().fold(CartTotals::default(), |mut totals, line| {
        let split = line.split(rate);
        totals.sub_total += split.pre_tax;
        totals.tax += split.tax;
        totals.total += split.total;
        totals.items_in_cart = totals.items_in_cart.saturating_add(line.quantity);
        totals.line_count += 1;
        totals
    })
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_cart_is_all_zero() {
        let totals = aggregate(&[], TaxRate::from_bps(1900));
        assert_eq!(totals, CartTotals::default());
        assert!(totals.total.is_zero());
        assert_eq!(totals.items_in_cart, 0);
    }

    #[test]
    fn test_aggregate_sums_lines() {
        let lines = vec![
            CartLine::new("A", Money::from_major(119), 2),
            CartLine::new("B", Money::from_major(238), 1),
        ];
        let totals = aggregate(&lines, TaxRate::from_bps(1900));

        assert_eq!(totals.sub_total, Money::from_major(400));
        assert_eq!(totals.tax, Money::from_major(76));
        assert_eq!(totals.total, Money::from_major(476));
        assert_eq!(totals.items_in_cart, 3);
        assert_eq!(totals.line_count, 2);
    }

    #[test]
    fn test_items_in_cart_saturates() {
        let lines = vec![
            CartLine::new("A", Money::from_cents(1), i64::MAX),
            CartLine::new("B", Money::from_cents(1), i64::MAX),
        ];
        let totals = aggregate(&lines, TaxRate::from_bps(1900));

        assert_eq!(totals.items_in_cart, i64::MAX);
        assert_eq!(totals.line_count, 2);
    }

    #[test]
    fn test_aggregate_keeps_exact_total() {
        let lines = vec![CartLine::new("A", Money::from_major(10_000), 3)];
        let totals = aggregate(&lines, TaxRate::from_bps(1900));

        assert_eq!(totals.total, Money::from_major(30_000));
        assert_eq!(totals.sub_total + totals.tax, totals.total);
        assert_eq!(totals.sub_total.rounded(), Money::from_cents(2_521_008));
    }
}

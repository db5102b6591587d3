//! # Tax Module
//!
//! Converts between tax-inclusive shelf prices and their pre-tax/tax parts.
//!
//! ## The Two Directions
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  INCLUSIVE → SPLIT  (cart aggregation)                                  │
//! │                                                                         │
//! │    T = 30000 (tax included), r = 19%                                    │
//! │    pre_tax = T / (1 + r)        = 25210.0840...                         │
//! │    tax     = T - pre_tax        =  4789.9159...                         │
//! │                                                                         │
//! │  PRE-TAX → TOTAL  (after a discount)                                    │
//! │                                                                         │
//! │    P = 22689.07..., r = 19%                                             │
//! │    tax   = P × r                =  4310.92...                           │
//! │    total = P + tax              = 27000.00                              │
//! │                                                                         │
//! │  The tax after a discount is RECOMPUTED from P, never prorated.         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;
use crate::types::TaxRate;

/// An amount broken into its pre-tax and tax components.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct TaxSplit {
    /// Amount excluding tax.
    pub pre_tax: Money,
    /// Tax portion.
    pub tax: Money,
    /// `pre_tax + tax`.
    pub total: Money,
}

impl TaxSplit {
    /// Splits a tax-inclusive amount.
    ///
    /// ## Example
    /// ```rust
    /// use vitrina_core::{Money, TaxRate, TaxSplit};
    ///
    /// let split = TaxSplit::from_inclusive(Money::from_major(119), TaxRate::from_bps(1900));
    /// assert_eq!(split.pre_tax, Money::from_major(100));
    /// assert_eq!(split.tax, Money::from_major(19));
    /// ```
    pub fn from_inclusive(total: Money, rate: TaxRate) -> TaxSplit {
        let pre_tax = pre_tax(total, rate);
        TaxSplit {
            pre_tax,
            tax: total - pre_tax,
            total,
        }
    }

    /// Adds tax on top of a pre-tax amount.
    ///
    /// ## Example
    /// ```rust
    /// use vitrina_core::{Money, TaxRate, TaxSplit};
    ///
    /// let split = TaxSplit::from_pre_tax(Money::from_major(100), TaxRate::from_bps(1500));
    /// assert_eq!(split.tax, Money::from_major(15));
    /// assert_eq!(split.total, Money::from_major(115));
    /// ```
    pub fn from_pre_tax(pre_tax: Money, rate: TaxRate) -> TaxSplit {
        let tax = pre_tax * rate.fraction();
        TaxSplit {
            pre_tax,
            tax,
            total: pre_tax + tax,
        }
    }
}

/// Returns the pre-tax part of a tax-inclusive amount: `T / (1 + r)`.
pub fn pre_tax(total: Money, rate: TaxRate) -> Money {
    // 1 + r >= 1 because TaxRate is unsigned
    let divisor = Decimal::ONE + rate.fraction();
    Money::new(total.amount() / divisor)
}

/// Returns the tax part of a tax-inclusive amount: `T - T / (1 + r)`.
pub fn tax_portion(total: Money, rate: TaxRate) -> Money {
    total - pre_tax(total, rate)
}

// =============================================================================
// Unit Tests
// =============================================================================

//! # Promotion Eligibility
//!
//! Decides what one promotion contributes to one cart line.
//!
//! ## Decision Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  line_discount(promotion, line, now, policy)                            │
//! │       │                                                                 │
//! │       ├── state != Active?                  → 0                         │
//! │       ├── now > valid_to? (expired)         → 0                         │
//! │       ├── scope == All?                     → pre_tax × pct             │
//! │       ├── product not in scope?             → 0                         │
//! │       ├── tier == Unit && qty < minimum?    → 0                         │
//! │       └── otherwise                         → pre_tax × pct             │
//! │                                                                         │
//! │  Several promotions on one line are SUMMED by the caller.               │
//! │  There is no best-offer selection and no cap.                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! For a scope `All` promotion the value returned here is the line's share,
//! used for the per-line annotation. The cart-level total for such a
//! promotion is applied once against the cart subtotal in [`crate::pricing`].

use chrono::{DateTime, Utc};

use crate::cart::CartLine;
use crate::money::Money;
use crate::pricing::PricingPolicy;
use crate::promotion::{Promotion, PromotionTier};

/// Returns the pre-tax discount `promotion` contributes to `line`, or zero.
///
/// ## Example
/// ```rust
/// use chrono::{Duration, Utc};
/// use vitrina_core::{line_discount, CartLine, Money, Percentage, PricingPolicy, Promotion, TaxRate};
///
/// let now = Utc::now();
/// let line = CartLine::new("A", Money::from_major(119), 5);
/// let promo = Promotion::for_products("bulk", Percentage::from_whole(10), ["A"], 5, now + Duration::days(1));
/// let policy = PricingPolicy::new(TaxRate::from_bps(1900));
///
/// // 5 × 119 = 595 with tax → 500 pre-tax → 10% = 50
/// assert_eq!(line_discount(&promo, &line, now, &policy), Money::from_major(50));
/// ```
pub fn line_discount(
    promotion: &Promotion,
    line: &CartLine,
    now: DateTime<Utc>,
    policy: &PricingPolicy,
) -> Money {
    if !applies_to(promotion, line, now, policy) {
        return Money::zero();
    }

    line.split(policy.tax_rate).pre_tax.portion(promotion.percentage)
}

/// Checks every gate without computing an amount.
pub fn applies_to(
    promotion: &Promotion,
    line: &CartLine,
    now: DateTime<Utc>,
    policy: &PricingPolicy,
) -> bool {
    if !promotion.is_in_effect(now, policy.enforce_valid_from) {
        return false;
    }

    if promotion.scope.is_all() {
        return true;
    }

    if !promotion.scope.covers(&line.product_id) {
        return false;
    }

    match promotion.tier {
        PromotionTier::Unit => line.quantity >= promotion.minimum_quantity,
        PromotionTier::Master => true,
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::promotion::PromotionState;
    use crate::types::{Percentage, TaxRate};
    use chrono::Duration;

    fn policy() -> PricingPolicy {
        PricingPolicy::new(TaxRate::from_bps(1900))
    }

    fn line(product_id: &str, quantity: i64) -> CartLine {
        // 119 with tax → exactly 100 pre-tax per unit at 19%
        CartLine::new(product_id, Money::from_major(119), quantity)
    }

    #[test]
    fn test_unit_tier_boundary_is_inclusive() {
        let now = Utc::now();
        let promo = Promotion::for_products("p", Percentage::from_whole(10), ["A"], 5, now + Duration::days(1));

        assert!(line_discount(&promo, &line("A", 4), now, &policy()).is_zero());
        assert_eq!(line_discount(&promo, &line("A", 5), now, &policy()), Money::from_major(50));
        assert_eq!(line_discount(&promo, &line("A", 6), now, &policy()), Money::from_major(60));
    }

    #[test]
    fn test_master_tier_ignores_quantity() {
        let now = Utc::now();
        let promo = Promotion::for_products("p", Percentage::from_whole(20), ["A"], 12, now + Duration::days(1))
            .master();

        assert_eq!(line_discount(&promo, &line("A", 1), now, &policy()), Money::from_major(20));
    }

    #[test]
    fn test_out_of_scope_line_gets_nothing() {
        let now = Utc::now();
        let promo = Promotion::for_products("p", Percentage::from_whole(10), ["A"], 1, now + Duration::days(1));
        assert!(line_discount(&promo, &line("B", 10), now, &policy()).is_zero());
    }

    #[test]
    fn test_empty_product_list_matches_nothing() {
        let now = Utc::now();
        let promo = Promotion::for_products("p", Percentage::from_whole(10), Vec::<String>::new(), 1, now + Duration::days(1));
        assert!(line_discount(&promo, &line("A", 10), now, &policy()).is_zero());
    }

    #[test]
    fn test_all_scope_returns_line_share() {
        let now = Utc::now();
        let promo = Promotion::all_products("p", Percentage::from_whole(10), now + Duration::days(1));
        // Scope All skips the quantity gate entirely
        assert_eq!(line_discount(&promo, &line("Z", 1), now, &policy()), Money::from_major(10));
    }

    #[test]
    fn test_expired_active_promotion_contributes_nothing() {
        let now = Utc::now();
        let promo = Promotion::for_products("p", Percentage::from_whole(10), ["A"], 1, now - Duration::hours(1));
        assert_eq!(promo.state, PromotionState::Active);
        assert!(line_discount(&promo, &line("A", 3), now, &policy()).is_zero());
    }

    #[test]
    fn test_inactive_promotion_contributes_nothing() {
        let now = Utc::now();
        let promo = Promotion::all_products("p", Percentage::from_whole(10), now + Duration::days(1))
            .with_state(PromotionState::Inactive);
        assert!(line_discount(&promo, &line("A", 3), now, &policy()).is_zero());
    }

    #[test]
    fn test_future_start_respected_only_when_enforced() {
        let now = Utc::now();
        let promo = Promotion::all_products("p", Percentage::from_whole(10), now + Duration::days(5))
            .starting(now + Duration::days(1));

        assert!(!line_discount(&promo, &line("A", 1), now, &policy()).is_zero());

        let strict = policy().enforce_valid_from(true);
        assert!(line_discount(&promo, &line("A", 1), now, &strict).is_zero());
    }
}

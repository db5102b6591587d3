//! # Storefront State
//!
//! The explicit state a storefront session owns: the cart, the current
//! promotions snapshot, and the pricing policy. Hosts keep one of these
//! per session instead of a global store.
//!
//! ## Checkout Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  place_order(now)                                                       │
//! │       │                                                                 │
//! │       ├── cart.validate_for_checkout()  ── Err ──► CoreError            │
//! │       │                                                                 │
//! │       ├── breakdown(now)                (same pricing as the cart page) │
//! │       │                                                                 │
//! │       ├── cart.clear()                                                  │
//! │       │                                                                 │
//! │       └── OrderSummary { order_id (v4), placed_at, breakdown }          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;
use ts_rs::TS;
use uuid::Uuid;

use crate::cart::Cart;
use crate::error::CoreResult;
use crate::pricing::{price_cart, PricingBreakdown, PricingPolicy};
use crate::promotion::PromotionSnapshot;
use crate::types::Product;

/// Receipt for a placed order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct OrderSummary {
    #[ts(as = "String")]
    pub order_id: Uuid,

    #[ts(as = "String")]
    pub placed_at: DateTime<Utc>,

    pub breakdown: PricingBreakdown,
}

/// Cart, promotions, and policy for one storefront session.
#[derive(Debug, Clone, Default)]
pub struct Storefront {
    cart: Cart,
    promotions: PromotionSnapshot,
    policy: PricingPolicy,
}

impl Storefront {
    /// An empty storefront priced with `policy`.
    pub fn new(policy: PricingPolicy) -> Self {
        Storefront {
            cart: Cart::new(),
            promotions: PromotionSnapshot::empty(),
            policy,
        }
    }

    /// Starts from an existing cart (e.g. one restored from disk).
    pub fn with_cart(mut self, cart: Cart) -> Self {
        self.cart = cart;
        self
    }

    /// Starts from an already loaded promotions snapshot.
    pub fn with_promotions(mut self, promotions: PromotionSnapshot) -> Self {
        self.promotions = promotions;
        self
    }

    pub fn cart(&self) -> &Cart {
        &self.cart
    }

    pub fn promotions(&self) -> &PromotionSnapshot {
        &self.promotions
    }

    pub fn policy(&self) -> &PricingPolicy {
        &self.policy
    }

    pub fn add_line(&mut self, product: &Product, quantity: i64) {
        self.cart.add_line(product, quantity);
    }

    pub fn update_quantity(&mut self, product_id: &str, quantity: i64) {
        self.cart.update_quantity(product_id, quantity);
    }

    pub fn remove_line(&mut self, product_id: &str) {
        self.cart.remove_line(product_id);
    }

    pub fn clear_cart(&mut self) {
        self.cart.clear();
    }

    /// Swaps in a freshly loaded snapshot. Snapshots are never patched.
    pub fn replace_promotions(&mut self, promotions: PromotionSnapshot) {
        info!(count = promotions.len(), "Promotions snapshot replaced");
        self.promotions = promotions;
    }

    /// Prices the current cart at `now`.
    pub fn breakdown(&self, now: DateTime<Utc>) -> PricingBreakdown {
        price_cart(self.cart.lines(), self.promotions.as_slice(), now, &self.policy)
    }

    /// Validates, prices, and empties the cart.
    ///
    /// # Errors
    /// Whatever [`Cart::validate_for_checkout`] reports. The cart is left
    /// untouched on error.
    pub fn place_order(&mut self, now: DateTime<Utc>) -> CoreResult<OrderSummary> {
        self.cart.validate_for_checkout()?;

        let breakdown = self.breakdown(now);
        let summary = OrderSummary {
            order_id: Uuid::new_v4(),
            placed_at: now,
            breakdown,
        };
        self.cart.clear();

        info!(
            order_id = %summary.order_id,
            items = summary.breakdown.items_in_cart,
            total = %summary.breakdown.total.rounded(),
            "Order placed"
        );
        Ok(summary)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

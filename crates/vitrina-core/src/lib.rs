//! # vitrina-core: Pure Pricing Logic for Vitrina
//!
//! This crate is the **heart** of Vitrina. It prices a cart against a
//! snapshot of promotions as pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Vitrina Architecture                             │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                 Storefront UI / vitrina-cli                     │   │
//! │  │    Catalog ──► Cart ──► Checkout summary ──► Order placed       │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ Storefront (explicit state)           │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │              ★ vitrina-core (THIS CRATE) ★                      │   │
//! │  │                                                                 │   │
//! │  │   ┌─────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐     │   │
//! │  │   │  money  │  │ promotion │  │ aggregate │  │   cart    │     │   │
//! │  │   │   tax   │  │eligibility│  │  pricing  │  │   store   │     │   │
//! │  │   └─────────┘  └───────────┘  └───────────┘  └───────────┘     │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO NETWORK • PURE FUNCTIONS                          │   │
//! │  └─────────────────────────────▲───────────────────────────────────┘   │
//! │                                │ PromotionSnapshot                     │
//! │  ┌─────────────────────────────┴───────────────────────────────────┐   │
//! │  │              vitrina-offers (promotions feed boundary)          │   │
//! │  │         GET /offer → normalize → Vec<Promotion>                 │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`money`] - Decimal `Money` type
//! - [`types`] - `TaxRate`, `Percentage`, `Product`
//! - [`tax`] - Tax-inclusive split and tax-exclusive recompute
//! - [`promotion`] - Promotion rules and snapshots
//! - [`eligibility`] - Per (promotion, line) discount evaluation
//! - [`aggregate`] - Pre-discount cart totals
//! - [`pricing`] - The pricing orchestrator and its breakdown
//! - [`cart`] - Cart lines and the mutation API
//! - [`store`] - Explicit storefront state (cart + promotions + policy)
//! - [`validation`] - Input validation rules
//! - [`error`] - Domain error types
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: pricing is deterministic - same input = same output
//! 2. **No I/O**: fetching promotions and persisting carts happen elsewhere
//! 3. **Decimal Money**: no rounding mid-calculation, rounding is display only
//! 4. **Fail Safe**: malformed promotions degrade to "no discount", never panic
//!
//! ## Example Usage
//!
//! ```rust
//! use chrono::{Duration, Utc};
//! use vitrina_core::{
//!     price_cart, Cart, Money, Percentage, PricingPolicy, Product, Promotion, TaxRate,
//! };
//!
//! let now = Utc::now();
//! let mut cart = Cart::new();
//! cart.add_line(&Product::new("A", "Café 500g", Money::from_major(10_000)), 3);
//!
//! let promo = Promotion::all_products("spring", Percentage::from_whole(10), now + Duration::days(7));
//! let policy = PricingPolicy::new(TaxRate::from_bps(1900));
//!
//! let breakdown = price_cart(cart.lines(), &[promo], now, &policy);
//! assert_eq!(breakdown.items_in_cart, 3);
//! assert_eq!(breakdown.total.rounded().to_string(), "$27000.00");
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod aggregate;
pub mod cart;
pub mod eligibility;
pub mod error;
pub mod money;
pub mod pricing;
pub mod promotion;
pub mod store;
pub mod tax;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================
// These allow users to do `use vitrina_core::Money` instead of
// `use vitrina_core::money::Money`

pub use aggregate::{aggregate, CartTotals};
pub use cart::{Cart, CartLine};
pub use eligibility::line_discount;
pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use pricing::{price_cart, AppliedPromotion, LineBreakdown, PricingBreakdown, PricingPolicy};
pub use promotion::{Promotion, PromotionScope, PromotionSnapshot, PromotionState, PromotionTier};
pub use store::{OrderSummary, Storefront};
pub use tax::TaxSplit;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Default tax rate in basis points (19%).
///
/// ## Business Reason
/// The storefront showed 15% in the checkout summary label and used 19% in
/// the cart-with-offers math. The rate is injected everywhere; this is only
/// the value used when nothing is configured.
pub const DEFAULT_TAX_RATE_BPS: u32 = 1900;

/// Maximum quantity of a single line accepted at checkout.
///
/// ## Business Reason
/// Prevents accidental over-ordering (e.g., typing 1000 instead of 10).
/// Adding to the cart never fails; checkout is where this is enforced.
pub const MAX_ITEM_QUANTITY: i64 = 9_999;

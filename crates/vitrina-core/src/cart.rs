//! # Cart
//!
//! Cart lines and the cart mutation API.
//!
//! ## Cart Operations Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Cart Operations                                      │
//! │                                                                         │
//! │  Storefront Action         Cart Method             Cart Change          │
//! │  ─────────────────         ───────────             ───────────          │
//! │                                                                         │
//! │  Add to cart ────────────► add_line() ───────────► qty += n / push      │
//! │                                                                         │
//! │  Change quantity ────────► update_quantity() ────► qty = n              │
//! │                                 │ n <= 0                                │
//! │                                 └───────────────► remove_line()         │
//! │                                                                         │
//! │  Click remove ───────────► remove_line() ────────► lines.retain(..)     │
//! │                                                                         │
//! │  Order placed ───────────► clear() ──────────────► lines.clear()        │
//! │                                                                         │
//! │  NOTE: none of these fail. Bad quantities are coerced upstream, and     │
//! │        removing something that is not there is a no-op.                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use ts_rs::TS;

use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::tax::TaxSplit;
use crate::types::{Product, TaxRate};
use crate::validation::{validate_price, validate_product_id, validate_quantity};

// =============================================================================
// Cart Line
// =============================================================================

/// One product entry in the cart.
///
/// ## Design Notes
/// - `unit_price` is the shelf price frozen when the product was added.
///   It includes tax.
/// - `quantity` is always >= 1 while the line is in a [`Cart`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CartLine {
    /// Product identifier, unique within the cart.
    pub product_id: String,

    /// Product name at time of adding.
    #[serde(default)]
    pub name: String,

    /// Tax-inclusive unit price at time of adding.
    pub unit_price: Money,

    /// Units of the product.
    pub quantity: i64,

    /// Packaging markers (e.g. "master") from the catalog.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub packaging_tags: Vec<String>,
}

impl CartLine {
    /// Creates a line without a display name.
    pub fn new(product_id: impl Into<String>, unit_price: Money, quantity: i64) -> Self {
        CartLine {
            product_id: product_id.into(),
            name: String::new(),
            unit_price,
            quantity,
            packaging_tags: Vec::new(),
        }
    }

    /// Creates a line from a catalog product, freezing its price.
    pub fn from_product(product: &Product, quantity: i64) -> Self {
        CartLine {
            product_id: product.id.clone(),
            name: product.name.clone(),
            unit_price: product.price,
            quantity,
            packaging_tags: product.packaging_tags.clone(),
        }
    }

    /// Tax-inclusive line value (unit price × quantity).
    #[inline]
    pub fn gross(&self) -> Money {
        self.unit_price.multiply_quantity(self.quantity)
    }

    /// Splits the line value into pre-tax and tax parts.
    #[inline]
    pub fn split(&self, rate: TaxRate) -> TaxSplit {
        TaxSplit::from_inclusive(self.gross(), rate)
    }

    /// Checks whether the line carries a packaging tag (case-insensitive).
    pub fn has_packaging_tag(&self, tag: &str) -> bool {
        self.packaging_tags
            .iter()
            .any(|t| t.eq_ignore_ascii_case(tag))
    }
}

// =============================================================================
// Cart
// =============================================================================

/// The shopping cart.
///
/// ## Invariants
/// - Lines are unique by `product_id` (adding the same product increases quantity)
/// - Quantity is always >= 1 (setting it to 0 removes the line)
/// - Line order is insertion order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    /// Creates a new empty cart.
    pub fn new() -> Self {
        Cart { lines: Vec::new() }
    }

    /// Rebuilds a cart from stored lines, restoring the invariants.
    ///
    /// ## Behavior
    /// - Lines with quantity <= 0 are dropped
    /// - Duplicate product ids are merged into the first occurrence
    ///   (quantities add up, saturating; the first line's price is kept)
    /// - Lines whose value (price × quantity) cannot be represented are dropped
    pub fn from_lines(lines: impl IntoIterator<Item = CartLine>) -> Self {
        let mut cart = Cart::new();
        for line in lines {
            if line.quantity <= 0 {
                debug!(product_id = %line.product_id, quantity = line.quantity, "Dropping stored line with non-positive quantity");
                continue;
            }
            match cart.position(&line.product_id) {
                Some(index) => {
                    let merged = &mut cart.lines[index];
                    merged.quantity = merged.quantity.saturating_add(line.quantity);
                }
                None => cart.lines.push(line),
            }
        }

        cart.lines.retain(|line| {
            let representable = line.unit_price.checked_multiply_quantity(line.quantity).is_some();
            if !representable {
                warn!(
                    product_id = %line.product_id,
                    unit_price = %line.unit_price.amount(),
                    quantity = line.quantity,
                    "Dropping stored line whose value overflows"
                );
            }
            representable
        });
        cart
    }

    /// Parses a stored cart (either `{"lines": [...]}` or a bare array).
    ///
    /// # Errors
    /// Returns `CoreError::MalformedCart` when the JSON matches neither shape.
    pub fn from_json(json: &str) -> CoreResult<Self> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Stored {
            Wrapped { lines: Vec<CartLine> },
            Bare(Vec<CartLine>),
        }

        let stored: Stored = serde_json::from_str(json)?;
        let lines = match stored {
            Stored::Wrapped { lines } | Stored::Bare(lines) => lines,
        };
        Ok(Cart::from_lines(lines))
    }

    /// Adds a product to the cart or increases quantity if already present.
    ///
    /// ## Behavior
    /// - If product already in cart: quantity accumulates
    /// - If product not in cart: a new line is appended
    /// - If quantity <= 0: nothing happens
    pub fn add_line(&mut self, product: &Product, quantity: i64) {
        if quantity <= 0 {
            debug!(product_id = %product.id, quantity, "Ignoring add with non-positive quantity");
            return;
        }

        if let Some(line) = self.line_mut(&product.id) {
            line.quantity = line.quantity.saturating_add(quantity);
            debug!(product_id = %product.id, quantity = line.quantity, "Increased line quantity");
            return;
        }

        self.lines.push(CartLine::from_product(product, quantity));
        debug!(product_id = %product.id, quantity, "Added cart line");
    }

    /// Replaces the quantity of a line.
    ///
    /// ## Behavior
    /// - If quantity <= 0: same as [`Cart::remove_line`]
    /// - If product not found: nothing happens
    pub fn update_quantity(&mut self, product_id: &str, quantity: i64) {
        if quantity <= 0 {
            self.remove_line(product_id);
            return;
        }

        match self.line_mut(product_id) {
            Some(line) => {
                line.quantity = quantity;
                debug!(product_id, quantity, "Updated line quantity");
            }
            None => debug!(product_id, "Quantity update for product not in cart"),
        }
    }

    /// Removes a line by product ID. No-op if absent.
    pub fn remove_line(&mut self, product_id: &str) {
        let before = self.lines.len();
        self.lines.retain(|line| line.product_id != product_id);
        if self.lines.len() != before {
            debug!(product_id, "Removed cart line");
        }
    }

    /// Clears all lines from the cart.
    pub fn clear(&mut self) {
        self.lines.clear();
    }

    /// Returns the lines in insertion order.
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    /// Looks up a line by product id.
    pub fn line(&self, product_id: &str) -> Option<&CartLine> {
        self.lines.iter().find(|line| line.product_id == product_id)
    }

    /// Returns the number of distinct lines.
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Returns the total quantity of all lines.
    pub fn total_quantity(&self) -> i64 {
        self.lines
            .iter()
            .fold(0i64, |total, line| total.saturating_add(line.quantity))
    }

    /// Checks if the cart is empty.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Caller-facing validation before an order is placed.
    ///
    /// # Errors
    /// - `CoreError::EmptyCart` when there is nothing to order
    /// - `CoreError::InvalidLine` when a line breaks a validation rule
    pub fn validate_for_checkout(&self) -> CoreResult<()> {
        if self.is_empty() {
            return Err(CoreError::EmptyCart);
        }

        for line in &self.lines {
            validate_product_id(&line.product_id)
                .and_then(|()| validate_quantity(line.quantity))
                .and_then(|()| validate_price(line.unit_price))
                .map_err(|source| CoreError::InvalidLine {
                    product_id: line.product_id.clone(),
                    source,
                })?;
        }

        Ok(())
    }

    fn position(&self, product_id: &str) -> Option<usize> {
        self.lines.iter().position(|line| line.product_id == product_id)
    }

    fn line_mut(&mut self, product_id: &str) -> Option<&mut CartLine> {
        self.lines.iter_mut().find(|line| line.product_id == product_id)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn product(id: &str, price: i64) -> Product {
        Product::new(id, format!("Product {}", id), Money::from_major(price))
    }

    #[test]
    fn test_cart_add_line() {
        let mut cart = Cart::new();
        cart.add_line(&product("1", 999), 2);

        assert_eq!(cart.line_count(), 1);
        assert_eq!(cart.total_quantity(), 2);
        assert_eq!(cart.lines()[0].gross(), Money::from_major(1998));
    }

    #[test]
    fn test_cart_add_same_product_increases_quantity() {
        let mut cart = Cart::new();
        let product = product("1", 999);

        cart.add_line(&product, 2);
        cart.add_line(&product, 3);

        assert_eq!(cart.line_count(), 1);
        assert_eq!(cart.total_quantity(), 5);
    }

    #[test]
    fn test_add_ignores_non_positive_quantity() {
        let mut cart = Cart::new();
        cart.add_line(&product("1", 10), 0);
        cart.add_line(&product("1", 10), -3);
        assert!(cart.is_empty());
    }

    #[test]
    fn test_update_quantity_replaces() {
        let mut cart = Cart::new();
        cart.add_line(&product("1", 10), 2);
        cart.update_quantity("1", 7);
        assert_eq!(cart.line("1").map(|l| l.quantity), Some(7));
    }

    #[test]
    fn test_update_to_zero_removes() {
        let mut cart = Cart::new();
        cart.add_line(&product("p", 10), 2);
        cart.update_quantity("p", 0);

        assert!(cart.line("p").is_none());
        assert_eq!(cart, Cart::new());
    }

    #[test]
    fn test_update_negative_removes() {
        let mut cart = Cart::new();
        cart.add_line(&product("p", 10), 2);
        cart.update_quantity("p", -1);
        assert!(cart.is_empty());
    }

    #[test]
    fn test_update_missing_product_is_noop() {
        let mut cart = Cart::new();
        cart.add_line(&product("a", 10), 1);
        cart.update_quantity("zzz", 4);
        assert_eq!(cart.line_count(), 1);
        assert!(cart.line("zzz").is_none());
    }

    #[test]
    fn test_remove_line_and_missing() {
        let mut cart = Cart::new();
        cart.add_line(&product("a", 10), 1);
        cart.add_line(&product("b", 10), 1);

        cart.remove_line("a");
        cart.remove_line("does-not-exist");

        assert_eq!(cart.line_count(), 1);
        assert_eq!(cart.lines()[0].product_id, "b");
    }

    #[test]
    fn test_cart_clear() {
        let mut cart = Cart::new();
        cart.add_line(&product("1", 999), 2);
        assert!(!cart.is_empty());

        cart.clear();
        assert!(cart.is_empty());
    }

    #[test]
    fn test_from_lines_restores_invariants() {
        let cart = Cart::from_lines(vec![
            CartLine::new("a", Money::from_major(10), 1),
            CartLine::new("b", Money::from_major(5), 0),
            CartLine::new("a", Money::from_major(12), 2),
        ]);

        assert_eq!(cart.line_count(), 1);
        let line = cart.line("a").unwrap();
        assert_eq!(line.quantity, 3);
        assert_eq!(line.unit_price, Money::from_major(10));
    }

    #[test]
    fn test_merging_duplicates_saturates_quantity() {
        let cart = Cart::from_json(
            r#"[{"productId":"A","unitPrice":"1","quantity":9223372036854775807},
                {"productId":"A","unitPrice":"1","quantity":1}]"#,
        )
        .unwrap();

        assert_eq!(cart.line_count(), 1);
        assert_eq!(cart.line("A").unwrap().quantity, i64::MAX);
    }

    #[test]
    fn test_add_line_saturates_quantity() {
        let mut cart = Cart::new();
        cart.add_line(&product("a", 1), i64::MAX);
        cart.add_line(&product("a", 1), i64::MAX);
        cart.add_line(&product("b", 1), i64::MAX);

        assert_eq!(cart.line("a").unwrap().quantity, i64::MAX);
        assert_eq!(cart.total_quantity(), i64::MAX);
    }

    #[test]
    fn test_from_lines_drops_line_whose_value_overflows() {
        let cart = Cart::from_json(
            r#"[{"productId":"A","unitPrice":"79228162514264337593543950335","quantity":2},
                {"productId":"B","unitPrice":"10","quantity":1}]"#,
        )
        .unwrap();

        assert_eq!(cart.line_count(), 1);
        assert!(cart.line("A").is_none());
        assert!(cart.line("B").is_some());
    }

    #[test]
    fn test_from_json_accepts_both_shapes() {
        let bare = r#"[{"productId":"A","unitPrice":"10000","quantity":3}]"#;
        let wrapped = r#"{"lines":[{"productId":"A","unitPrice":10000,"quantity":3}]}"#;

        let a = Cart::from_json(bare).unwrap();
        let b = Cart::from_json(wrapped).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.lines()[0].gross(), Money::from_major(30_000));

        assert!(Cart::from_json(r#"{"nope":1}"#).is_err());
    }

    #[test]
    fn test_checkout_validation() {
        assert!(matches!(Cart::new().validate_for_checkout(), Err(CoreError::EmptyCart)));

        let mut cart = Cart::new();
        cart.add_line(&product("a", 10), 1);
        assert!(cart.validate_for_checkout().is_ok());

        let negative = Cart::from_lines(vec![CartLine::new("a", Money::from_major(-1), 1)]);
        assert!(matches!(
            negative.validate_for_checkout(),
            Err(CoreError::InvalidLine { .. })
        ));
    }

    #[test]
    fn test_packaging_tags_carried_from_product() {
        let mut cart = Cart::new();
        cart.add_line(&product("m", 50).with_packaging_tag("Master"), 1);
        assert!(cart.lines()[0].has_packaging_tag("master"));
    }
}

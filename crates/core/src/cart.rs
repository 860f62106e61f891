//! Cart state and pricing arithmetic.
//!
//! Cart lines are keyed by the composite `(product_id, size)`. A line's
//! quantity is always at least 1: any update that would take it below 1
//! removes the line instead. Pricing always uses the product's *current*
//! catalog price, so totals take a price lookup rather than freezing
//! prices at add time.

use std::collections::HashMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::ProductId;
use crate::{MAX_CART_LINES, MAX_ITEM_QUANTITY};

/// Flat tax rate applied to the cart subtotal (5%).
#[must_use]
pub fn tax_rate() -> Decimal {
    Decimal::new(5, 2)
}

/// Flat shipping fee in base currency units.
#[must_use]
pub fn shipping_fee() -> Decimal {
    Decimal::from(10)
}

/// Subtotal at or above which shipping is waived.
#[must_use]
pub fn free_shipping_threshold() -> Decimal {
    Decimal::from(100)
}

/// A line in the shopping cart.
///
/// `size` is `None` for one-size products. Two lines with the same
/// product but different sizes are distinct.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    pub product_id: ProductId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,
    pub quantity: u32,
}

impl CartItem {
    fn matches(&self, product_id: ProductId, size: Option<&str>) -> bool {
        self.product_id == product_id && self.size.as_deref() == size
    }
}

/// The shopping cart.
///
/// ## Invariants
///
/// - Lines are unique by `(product_id, size)`; adding an existing key
///   increases its quantity.
/// - Every line has `quantity >= 1`; a quantity update below 1 removes
///   the line.
/// - At most [`MAX_CART_LINES`] lines, each at most [`MAX_ITEM_QUANTITY`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cart {
    items: Vec<CartItem>,
}

impl Cart {
    /// Create an empty cart.
    #[must_use]
    pub const fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// The cart lines, newest last.
    #[must_use]
    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    /// Add `quantity` units of a product/size, merging into an existing
    /// line when present.
    ///
    /// A `quantity` of 0 is a no-op.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::QuantityTooLarge`] if the line would exceed
    /// the per-line cap, or [`CoreError::CartFull`] if a new line would
    /// exceed the line cap.
    pub fn add(
        &mut self,
        product_id: ProductId,
        size: Option<String>,
        quantity: u32,
    ) -> Result<(), CoreError> {
        if quantity == 0 {
            return Ok(());
        }

        if let Some(item) = self
            .items
            .iter_mut()
            .find(|i| i.matches(product_id, size.as_deref()))
        {
            let new_quantity = item.quantity.saturating_add(quantity);
            if new_quantity > MAX_ITEM_QUANTITY {
                return Err(CoreError::QuantityTooLarge {
                    max: MAX_ITEM_QUANTITY,
                });
            }
            item.quantity = new_quantity;
            return Ok(());
        }

        if quantity > MAX_ITEM_QUANTITY {
            return Err(CoreError::QuantityTooLarge {
                max: MAX_ITEM_QUANTITY,
            });
        }
        if self.items.len() >= MAX_CART_LINES {
            return Err(CoreError::CartFull {
                max: MAX_CART_LINES,
            });
        }

        self.items.push(CartItem {
            product_id,
            size,
            quantity,
        });
        Ok(())
    }

    /// Set the quantity of an existing line.
    ///
    /// A quantity below 1 removes the line (the store-level contract;
    /// confirmation dialogs are a UI concern).
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::ItemNotInCart`] if the line does not exist,
    /// or [`CoreError::QuantityTooLarge`] above the per-line cap.
    pub fn set_quantity(
        &mut self,
        product_id: ProductId,
        size: Option<&str>,
        quantity: u32,
    ) -> Result<(), CoreError> {
        if quantity < 1 {
            return self.remove(product_id, size);
        }
        if quantity > MAX_ITEM_QUANTITY {
            return Err(CoreError::QuantityTooLarge {
                max: MAX_ITEM_QUANTITY,
            });
        }

        let item = self
            .items
            .iter_mut()
            .find(|i| i.matches(product_id, size))
            .ok_or(CoreError::ItemNotInCart)?;
        item.quantity = quantity;
        Ok(())
    }

    /// Remove a line from the cart.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::ItemNotInCart`] if the line does not exist.
    pub fn remove(&mut self, product_id: ProductId, size: Option<&str>) -> Result<(), CoreError> {
        let before = self.items.len();
        self.items.retain(|i| !i.matches(product_id, size));
        if self.items.len() == before {
            return Err(CoreError::ItemNotInCart);
        }
        Ok(())
    }

    /// Remove all lines.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Number of distinct lines.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the cart has no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Total unit count across all lines (the cart badge number).
    #[must_use]
    pub fn total_quantity(&self) -> u32 {
        self.items.iter().map(|i| i.quantity).sum()
    }

    /// Subtotal using current catalog prices.
    ///
    /// Lines whose product is missing from the lookup (e.g., deleted from
    /// the catalog since being added) contribute nothing.
    #[must_use]
    pub fn subtotal(&self, prices: &HashMap<ProductId, Decimal>) -> Decimal {
        self.items
            .iter()
            .filter_map(|i| {
                prices
                    .get(&i.product_id)
                    .map(|price| *price * Decimal::from(i.quantity))
            })
            .sum()
    }

    /// Full cart totals using current catalog prices.
    #[must_use]
    pub fn totals(&self, prices: &HashMap<ProductId, Decimal>) -> CartTotals {
        CartTotals::from_subtotal(self.subtotal(prices))
    }
}

/// Computed cart totals in the base currency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartTotals {
    pub subtotal: Decimal,
    pub tax: Decimal,
    pub shipping: Decimal,
    pub total: Decimal,
}

impl CartTotals {
    /// Derive totals from a subtotal.
    ///
    /// Tax is a flat 5% of the subtotal. Shipping is a flat fee of 10,
    /// waived once the subtotal reaches 100; the fee applies to every
    /// cart below the threshold, the empty cart included. The grand
    /// total is the sum of all three.
    #[must_use]
    pub fn from_subtotal(subtotal: Decimal) -> Self {
        let tax = (subtotal * tax_rate()).round_dp(2);
        let shipping = if subtotal >= free_shipping_threshold() {
            Decimal::ZERO
        } else {
            shipping_fee()
        };
        Self {
            subtotal,
            tax,
            shipping,
            total: subtotal + tax + shipping,
        }
    }
}

/// Pricing breakdown submitted with (and recomputed for) an order.
///
/// Same arithmetic as [`CartTotals`], under the field names the order
/// documents use. Clients may send their own numbers; the server
/// recomputes from the item lines and its figures win.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderTotals {
    pub items_price: Decimal,
    pub tax_price: Decimal,
    pub shipping_price: Decimal,
    pub total_price: Decimal,
}

impl OrderTotals {
    /// Derive order pricing from the items subtotal.
    #[must_use]
    pub fn compute(items_price: Decimal) -> Self {
        let CartTotals {
            subtotal,
            tax,
            shipping,
            total,
        } = CartTotals::from_subtotal(items_price);
        Self {
            items_price: subtotal,
            tax_price: tax,
            shipping_price: shipping,
            total_price: total,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn prices(entries: &[(ProductId, i64)]) -> HashMap<ProductId, Decimal> {
        entries
            .iter()
            .map(|&(id, units)| (id, Decimal::from(units)))
            .collect()
    }

    #[test]
    fn test_add_merges_same_line() {
        let mut cart = Cart::new();
        let id = ProductId::new();

        cart.add(id, Some("M".into()), 1).unwrap();
        cart.add(id, Some("M".into()), 2).unwrap();

        assert_eq!(cart.len(), 1);
        assert_eq!(cart.total_quantity(), 3);
    }

    #[test]
    fn test_sizes_are_distinct_lines() {
        let mut cart = Cart::new();
        let id = ProductId::new();

        cart.add(id, Some("M".into()), 1).unwrap();
        cart.add(id, Some("L".into()), 1).unwrap();
        cart.add(id, None, 1).unwrap();

        assert_eq!(cart.len(), 3);
    }

    #[test]
    fn test_quantity_below_one_removes_line() {
        let mut cart = Cart::new();
        let id = ProductId::new();

        cart.add(id, None, 2).unwrap();
        cart.set_quantity(id, None, 0).unwrap();

        assert!(cart.is_empty());
    }

    #[test]
    fn test_set_quantity_missing_line() {
        let mut cart = Cart::new();
        let err = cart.set_quantity(ProductId::new(), None, 2).unwrap_err();
        assert_eq!(err, CoreError::ItemNotInCart);
    }

    #[test]
    fn test_quantity_cap() {
        let mut cart = Cart::new();
        let id = ProductId::new();
        let err = cart.add(id, None, MAX_ITEM_QUANTITY + 1).unwrap_err();
        assert_eq!(
            err,
            CoreError::QuantityTooLarge {
                max: MAX_ITEM_QUANTITY
            }
        );
    }

    #[test]
    fn test_missing_product_prices_contribute_nothing() {
        let mut cart = Cart::new();
        let known = ProductId::new();
        let deleted = ProductId::new();

        cart.add(known, None, 1).unwrap();
        cart.add(deleted, None, 5).unwrap();

        let subtotal = cart.subtotal(&prices(&[(known, 20)]));
        assert_eq!(subtotal, Decimal::from(20));
    }

    #[test]
    fn test_shipping_waived_at_threshold() {
        // Property: subtotal >= 100 => shipping = 0; < 100 => shipping = 10.
        // Holds for all subtotals, zero included.
        for (subtotal, expected) in [(99, 10), (100, 0), (101, 0), (1, 10), (0, 10)] {
            let totals = CartTotals::from_subtotal(Decimal::from(subtotal));
            assert_eq!(
                totals.shipping,
                Decimal::from(expected),
                "subtotal {subtotal}"
            );
        }
    }

    #[test]
    fn test_grand_total_identity() {
        // Property: total == subtotal + 0.05*subtotal + shipping.
        for subtotal in [1, 37, 99, 100, 250] {
            let s = Decimal::from(subtotal);
            let totals = CartTotals::from_subtotal(s);
            let expected = s + (s * Decimal::new(5, 2)).round_dp(2) + totals.shipping;
            assert_eq!(totals.total, expected, "subtotal {subtotal}");
        }
    }

    #[test]
    fn test_order_totals_match_cart_totals() {
        let totals = OrderTotals::compute(Decimal::from(40));
        assert_eq!(totals.items_price, Decimal::from(40));
        assert_eq!(totals.tax_price, Decimal::from(2));
        assert_eq!(totals.shipping_price, Decimal::from(10));
        assert_eq!(totals.total_price, Decimal::from(52));
    }

    #[test]
    fn test_totals_from_cart() {
        let mut cart = Cart::new();
        let shirt = ProductId::new();
        let shoes = ProductId::new();

        cart.add(shirt, Some("M".into()), 2).unwrap();
        cart.add(shoes, None, 1).unwrap();

        // 2 * 15 + 80 = 110 -> free shipping
        let totals = cart.totals(&prices(&[(shirt, 15), (shoes, 80)]));
        assert_eq!(totals.subtotal, Decimal::from(110));
        assert_eq!(totals.tax, Decimal::new(550, 2));
        assert_eq!(totals.shipping, Decimal::ZERO);
        assert_eq!(totals.total, Decimal::new(11550, 2));
    }
}

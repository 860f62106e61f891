//! Saved-products wishlist.
//!
//! Set semantics: a product appears at most once, independent of the cart.

use serde::{Deserialize, Serialize};

use crate::types::ProductId;

/// A user's wishlist.
///
/// Stored as a vector to preserve insertion order for display, with set
/// semantics enforced on insert.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Wishlist {
    product_ids: Vec<ProductId>,
}

impl Wishlist {
    /// Create an empty wishlist.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            product_ids: Vec::new(),
        }
    }

    /// Saved product IDs in insertion order.
    #[must_use]
    pub fn product_ids(&self) -> &[ProductId] {
        &self.product_ids
    }

    /// Add a product. Idempotent; returns whether the product was newly added.
    pub fn add(&mut self, product_id: ProductId) -> bool {
        if self.contains(product_id) {
            return false;
        }
        self.product_ids.push(product_id);
        true
    }

    /// Remove a product. Returns whether it was present.
    pub fn remove(&mut self, product_id: ProductId) -> bool {
        let before = self.product_ids.len();
        self.product_ids.retain(|&id| id != product_id);
        self.product_ids.len() != before
    }

    /// Toggle a product in or out of the wishlist.
    ///
    /// Returns `true` if the product is present after the call.
    pub fn toggle(&mut self, product_id: ProductId) -> bool {
        if self.remove(product_id) {
            false
        } else {
            self.product_ids.push(product_id);
            true
        }
    }

    /// Whether a product is saved.
    #[must_use]
    pub fn contains(&self, product_id: ProductId) -> bool {
        self.product_ids.contains(&product_id)
    }

    /// Number of saved products.
    #[must_use]
    pub fn len(&self) -> usize {
        self.product_ids.len()
    }

    /// Whether the wishlist is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.product_ids.is_empty()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_add_is_idempotent() {
        let mut wishlist = Wishlist::new();
        let id = ProductId::new();

        assert!(wishlist.add(id));
        assert!(!wishlist.add(id));
        assert_eq!(wishlist.len(), 1);
    }

    #[test]
    fn test_toggle() {
        let mut wishlist = Wishlist::new();
        let id = ProductId::new();

        assert!(wishlist.toggle(id));
        assert!(wishlist.contains(id));
        assert!(!wishlist.toggle(id));
        assert!(wishlist.is_empty());
    }

    #[test]
    fn test_preserves_insertion_order() {
        let mut wishlist = Wishlist::new();
        let first = ProductId::new();
        let second = ProductId::new();

        wishlist.add(first);
        wishlist.add(second);
        assert_eq!(wishlist.product_ids(), &[first, second]);
    }
}

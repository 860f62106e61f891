//! The combined shop state store.
//!
//! One typed store holding the in-memory catalog, cart, wishlist,
//! notification center, authenticated user, and currency preference,
//! with pure mutators and derived getters. Every operation is
//! deterministic and unit-testable without a UI or network.

use std::collections::HashMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::cart::{Cart, CartTotals, OrderTotals};
use crate::error::CoreError;
use crate::notification::NotificationCenter;
use crate::product::Product;
use crate::types::{Currency, Email, ExchangeRates, ProductId, UserId};
use crate::wishlist::Wishlist;

/// The authenticated shopper, as held by the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShopUser {
    pub id: UserId,
    pub name: String,
    pub email: Email,
}

/// Client-side application state for the storefront.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShopState {
    catalog: Vec<Product>,
    cart: Cart,
    wishlist: Wishlist,
    notifications: NotificationCenter,
    user: Option<ShopUser>,
    currency: Currency,
    #[serde(default)]
    rates: ExchangeRates,
}

impl ShopState {
    /// Create an empty store with an empty catalog.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // =========================================================================
    // Catalog
    // =========================================================================

    /// Replace the in-memory catalog (e.g., after a product fetch).
    pub fn set_catalog(&mut self, products: Vec<Product>) {
        self.catalog = products;
    }

    /// The loaded catalog.
    #[must_use]
    pub fn catalog(&self) -> &[Product] {
        &self.catalog
    }

    /// Look up a product by id.
    #[must_use]
    pub fn product(&self, id: ProductId) -> Option<&Product> {
        self.catalog.iter().find(|p| p.id == id)
    }

    /// Current catalog prices, for cart arithmetic.
    #[must_use]
    pub fn price_lookup(&self) -> HashMap<ProductId, Decimal> {
        self.catalog.iter().map(|p| (p.id, p.price)).collect()
    }

    // =========================================================================
    // Cart
    // =========================================================================

    /// Add a product/size to the cart.
    ///
    /// # Errors
    ///
    /// Propagates cart capacity errors from [`Cart::add`].
    pub fn add_to_cart(
        &mut self,
        product_id: ProductId,
        size: Option<String>,
        quantity: u32,
    ) -> Result<(), CoreError> {
        self.cart.add(product_id, size, quantity)
    }

    /// Set a cart line's quantity; below 1 removes the line.
    ///
    /// # Errors
    ///
    /// Propagates errors from [`Cart::set_quantity`].
    pub fn update_cart_quantity(
        &mut self,
        product_id: ProductId,
        size: Option<&str>,
        quantity: u32,
    ) -> Result<(), CoreError> {
        self.cart.set_quantity(product_id, size, quantity)
    }

    /// Remove a cart line.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::ItemNotInCart`] if the line does not exist.
    pub fn remove_from_cart(
        &mut self,
        product_id: ProductId,
        size: Option<&str>,
    ) -> Result<(), CoreError> {
        self.cart.remove(product_id, size)
    }

    /// The cart.
    #[must_use]
    pub const fn cart(&self) -> &Cart {
        &self.cart
    }

    /// Cart totals at current catalog prices.
    #[must_use]
    pub fn cart_totals(&self) -> CartTotals {
        self.cart.totals(&self.price_lookup())
    }

    /// Total unit count in the cart (badge number).
    #[must_use]
    pub fn cart_count(&self) -> u32 {
        self.cart.total_quantity()
    }

    /// Compute order totals for the current cart and clear it.
    ///
    /// The caller submits the returned pricing with the order; the server
    /// recomputes and is authoritative.
    pub fn create_order(&mut self) -> OrderTotals {
        let totals = OrderTotals::compute(self.cart.subtotal(&self.price_lookup()));
        self.cart.clear();
        totals
    }

    // =========================================================================
    // Wishlist
    // =========================================================================

    /// Toggle a product in the wishlist; returns whether it is now saved.
    pub fn add_to_wishlist(&mut self, product_id: ProductId) -> bool {
        self.wishlist.toggle(product_id)
    }

    /// The wishlist.
    #[must_use]
    pub const fn wishlist(&self) -> &Wishlist {
        &self.wishlist
    }

    /// Number of saved products.
    #[must_use]
    pub fn wishlist_count(&self) -> usize {
        self.wishlist.len()
    }

    // =========================================================================
    // Notifications
    // =========================================================================

    /// Mutable access to the notification center.
    pub const fn notifications_mut(&mut self) -> &mut NotificationCenter {
        &mut self.notifications
    }

    /// The notification center.
    #[must_use]
    pub const fn notifications(&self) -> &NotificationCenter {
        &self.notifications
    }

    // =========================================================================
    // Auth & currency
    // =========================================================================

    /// Record a successful login.
    pub fn login(&mut self, user: ShopUser) {
        self.user = Some(user);
    }

    /// Clear the authenticated user. Cart and wishlist survive logout.
    pub fn logout(&mut self) {
        self.user = None;
    }

    /// The authenticated user, if any.
    #[must_use]
    pub const fn user(&self) -> Option<&ShopUser> {
        self.user.as_ref()
    }

    /// Change the display currency.
    pub fn set_currency(&mut self, currency: Currency) {
        self.currency = currency;
    }

    /// The display currency.
    #[must_use]
    pub const fn currency(&self) -> Currency {
        self.currency
    }

    /// Install fresher exchange rates.
    pub fn set_rates(&mut self, rates: ExchangeRates) {
        self.rates = rates;
    }

    /// Convert a base-currency amount into the display currency.
    ///
    /// Display-only; nothing converted is ever stored back.
    #[must_use]
    pub fn convert_price(&self, amount: Decimal) -> Decimal {
        crate::types::convert_price(amount, self.rates.rate(self.currency))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn product(name: &str, price: i64) -> Product {
        Product {
            id: ProductId::new(),
            name: name.to_string(),
            description: String::new(),
            category: "tops".to_string(),
            price: Decimal::from(price),
            sizes: vec!["S".into(), "M".into()],
            images: vec![format!("{name}.jpg")],
            featured: false,
            rating: Decimal::ZERO,
            num_reviews: 0,
            in_stock: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn store_with(products: Vec<Product>) -> ShopState {
        let mut state = ShopState::new();
        state.set_catalog(products);
        state
    }

    #[test]
    fn test_cart_totals_use_current_catalog_price() {
        let mut shirt = product("shirt", 20);
        let id = shirt.id;
        let mut state = store_with(vec![shirt.clone()]);

        state.add_to_cart(id, Some("M".into()), 2).unwrap();
        assert_eq!(state.cart_totals().subtotal, Decimal::from(40));

        // Price change in the catalog is reflected immediately: no snapshot.
        shirt.price = Decimal::from(25);
        state.set_catalog(vec![shirt]);
        assert_eq!(state.cart_totals().subtotal, Decimal::from(50));
    }

    #[test]
    fn test_create_order_clears_cart() {
        let shirt = product("shirt", 60);
        let id = shirt.id;
        let mut state = store_with(vec![shirt]);

        state.add_to_cart(id, None, 2).unwrap();
        let totals = state.create_order();

        assert_eq!(totals.items_price, Decimal::from(120));
        assert_eq!(totals.shipping_price, Decimal::ZERO);
        assert!(state.cart().is_empty());
        assert_eq!(state.cart_count(), 0);
    }

    #[test]
    fn test_wishlist_toggle_and_count() {
        let shirt = product("shirt", 20);
        let id = shirt.id;
        let mut state = store_with(vec![shirt]);

        assert!(state.add_to_wishlist(id));
        assert_eq!(state.wishlist_count(), 1);
        assert!(!state.add_to_wishlist(id));
        assert_eq!(state.wishlist_count(), 0);
    }

    #[test]
    fn test_logout_keeps_cart() {
        let shirt = product("shirt", 20);
        let id = shirt.id;
        let mut state = store_with(vec![shirt]);

        state.login(ShopUser {
            id: UserId::new(),
            name: "Ada".to_string(),
            email: Email::parse("ada@example.com").unwrap(),
        });
        state.add_to_cart(id, None, 1).unwrap();
        state.logout();

        assert!(state.user().is_none());
        assert_eq!(state.cart_count(), 1);
    }

    #[test]
    fn test_convert_price_display_only() {
        let mut state = store_with(vec![]);
        state.set_currency(Currency::EUR);
        // 100 * 0.92 fallback rate
        assert_eq!(
            state.convert_price(Decimal::from(100)),
            Decimal::new(9200, 2)
        );
        // Catalog prices stay in the base currency.
        assert_eq!(state.currency(), Currency::EUR);
    }
}

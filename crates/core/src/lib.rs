//! Boutique Core - Shared domain types and the shop state store.
//!
//! This crate provides the types and pure business logic used across all
//! Boutique components:
//! - `storefront` - Public JSON API consumed by the single-page app
//! - `admin` - Internal administration API
//! - `cli` - Command-line tools for migrations and maintenance
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no
//! database access, no HTTP clients. Cart arithmetic, wishlist semantics,
//! and notification de-duplication are all deterministic and unit tested
//! here without any server running.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, prices, and emails
//! - [`product`] - Catalog product type and image normalization
//! - [`cart`] - Cart state and pricing arithmetic
//! - [`wishlist`] - Saved-products set
//! - [`notification`] - Bounded, de-duplicated notification center
//! - [`shop`] - The combined shop state store

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod error;
pub mod notification;
pub mod product;
pub mod shop;
pub mod types;
pub mod wishlist;

pub use cart::{Cart, CartItem, CartTotals, OrderTotals};
pub use error::CoreError;
pub use notification::{Notification, NotificationCenter, NotificationKind};
pub use product::{Product, normalize_images};
pub use shop::{ShopState, ShopUser};
pub use types::*;
pub use wishlist::Wishlist;

/// Maximum quantity of a single cart line.
///
/// Guards against accidental over-ordering (e.g., typing 1000 instead of 10).
pub const MAX_ITEM_QUANTITY: u32 = 99;

/// Maximum number of distinct lines in a cart.
pub const MAX_CART_LINES: usize = 100;

//! Domain models for the storefront.

pub mod order;
pub mod session;
pub mod user;

pub use order::{Order, OrderItem, ShippingInfo};
pub use user::{CurrentUser, User};

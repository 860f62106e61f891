//! Session-related types.
//!
//! The session is the server-side home for everything a browser keeps
//! between visits: the signed-in user, the cart, the wishlist, locally
//! raised notifications, and checkout scratch state.

/// Session keys for persisted client state.
pub mod keys {
    /// Key for storing the current logged-in user.
    pub const CURRENT_USER: &str = "current_user";

    /// Key for the shopping cart (`boutique_core::Cart`).
    pub const CART: &str = "cart";

    /// Key for the wishlist (`boutique_core::Wishlist`).
    pub const WISHLIST: &str = "wishlist";

    /// Key for locally raised notifications and server tombstones
    /// (`boutique_core::NotificationCenter`).
    pub const LOCAL_NOTIFICATIONS: &str = "local_notifications";

    /// Key for the checkout shipping address.
    pub const SHIPPING_INFO: &str = "shipping_info";

    /// Key for the order awaiting payment confirmation.
    pub const PENDING_ORDER_ID: &str = "pending_order_id";

    /// Key for the selected display currency.
    pub const CURRENCY: &str = "currency";

    /// Key for recent search terms (newest first, capped).
    pub const RECENT_SEARCHES: &str = "recent_searches";
}

/// Maximum recent search terms kept per session.
pub const MAX_RECENT_SEARCHES: usize = 10;

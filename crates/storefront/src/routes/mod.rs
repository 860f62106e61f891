//! HTTP route handlers for the storefront API.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                          - Health check
//!
//! # Users
//! POST /api/users                       - Register (signs in)
//! POST /api/users/login                 - Login
//! POST /api/users/logout                - Logout (cart survives)
//! GET  /api/users/profile               - Current user (auth)
//! PUT  /api/users/profile               - Update profile (auth)
//!
//! # Products
//! GET  /api/products                    - Listing (?category=&search=&sort=)
//! GET  /api/products/featured           - Featured products
//! GET  /api/products/categories         - Distinct categories
//! GET  /api/products/reviews/featured   - Featured reviews
//! GET  /api/products/{id}               - Product detail
//! GET  /api/products/{id}/reviews       - Reviews for a product
//! POST /api/products/{id}/reviews       - Add review (auth)
//!
//! # Cart (session)
//! GET    /api/cart                      - Priced cart with totals
//! POST   /api/cart/items                - Add line (merges)
//! PUT    /api/cart/items                - Set quantity (<1 removes)
//! DELETE /api/cart/items                - Remove line
//! DELETE /api/cart                      - Clear cart
//!
//! # Wishlist / checkout state (session)
//! GET  /api/wishlist                    - Saved product ids
//! POST /api/wishlist/toggle             - Toggle a product
//! GET  /api/checkout/shipping           - Saved shipping address
//! PUT  /api/checkout/shipping           - Save shipping address
//! GET  /api/config/currency             - Display currency + rate
//! PUT  /api/config/currency             - Switch display currency
//! GET  /api/search/recent               - Recent search terms
//! DELETE /api/search/recent             - Forget recent searches
//!
//! # Orders
//! POST /api/orders                      - Place order from cart (auth)
//! GET  /api/orders/myorders             - Order history (auth)
//! GET  /api/orders/{id}                 - Order detail (owner/admin)
//! PUT  /api/orders/{id}/pay             - Confirm payment
//!
//! # Notifications
//! GET    /api/notifications             - Merged feed
//! POST   /api/notifications             - Raise local notification
//! POST   /api/notifications/read-all    - Mark all read
//! PATCH  /api/notifications/{id}/read   - Mark one read
//! DELETE /api/notifications/{id}        - Remove (tombstones server ids)
//! DELETE /api/notifications             - Clear feed
//! ```

pub mod cart;
pub mod notifications;
pub mod orders;
pub mod products;
pub mod session_state;
pub mod users;

use axum::{
    Router,
    routing::{delete, get, patch, post, put},
};

use crate::state::AppState;

/// Create the user account routes router.
pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(users::register))
        .route("/login", post(users::login))
        .route("/logout", post(users::logout))
        .route(
            "/profile",
            get(users::profile).put(users::update_profile),
        )
}

/// Create the catalog routes router.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(products::list))
        .route("/featured", get(products::featured))
        .route("/categories", get(products::categories))
        .route("/reviews/featured", get(products::featured_reviews))
        .route("/{id}", get(products::show))
        .route(
            "/{id}/reviews",
            get(products::reviews).post(products::create_review),
        )
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show).delete(cart::clear))
        .route(
            "/items",
            post(cart::add_item)
                .put(cart::update_item)
                .delete(cart::remove_item),
        )
}

/// Create the order routes router.
pub fn order_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(orders::place))
        .route("/myorders", get(orders::mine))
        .route("/{id}", get(orders::show))
        .route("/{id}/pay", put(orders::pay))
}

/// Create the notification routes router.
pub fn notification_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(notifications::feed)
                .post(notifications::push)
                .delete(notifications::clear),
        )
        .route("/read-all", post(notifications::mark_all_read))
        .route("/{id}/read", patch(notifications::mark_read))
        .route("/{id}", delete(notifications::remove))
}

/// Create all routes for the storefront API.
pub fn routes() -> Router<AppState> {
    Router::new()
        .nest("/api/users", user_routes())
        .nest("/api/products", product_routes())
        .nest("/api/cart", cart_routes())
        .nest("/api/orders", order_routes())
        .nest("/api/notifications", notification_routes())
        .route(
            "/api/wishlist",
            get(session_state::wishlist),
        )
        .route("/api/wishlist/toggle", post(session_state::toggle_wishlist))
        .route(
            "/api/checkout/shipping",
            get(session_state::shipping).put(session_state::save_shipping),
        )
        .route(
            "/api/config/currency",
            get(session_state::currency).put(session_state::set_currency),
        )
        .route(
            "/api/search/recent",
            get(products::recent_searches).delete(products::clear_recent_searches),
        )
}

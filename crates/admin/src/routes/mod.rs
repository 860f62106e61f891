//! HTTP route handlers for the admin API.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                              - Health check
//!
//! POST /api/admin/login                     - Admin sign-in
//! POST /api/admin/logout                    - Sign out (drops session)
//! GET  /api/admin/me                        - Current admin
//!
//! GET    /api/admin/products                - Full catalog
//! POST   /api/admin/products                - Create product
//! PUT    /api/admin/products/{id}           - Replace product
//! DELETE /api/admin/products/{id}           - Delete product
//! POST   /api/admin/uploads                 - Upload product image
//!
//! GET    /api/admin/orders                  - All orders
//! GET    /api/admin/orders/{id}             - Order detail
//! PUT    /api/admin/orders/{id}/deliver     - Mark delivered
//! DELETE /api/admin/orders/{id}             - Delete order
//!
//! GET    /api/admin/users                   - All accounts
//! PUT    /api/admin/users/{id}/admin        - Grant/revoke admin flag
//! DELETE /api/admin/users/{id}              - Delete account
//!
//! GET  /api/admin/summary                   - Dashboard counts + revenue
//! ```

pub mod auth;
pub mod orders;
pub mod products;
pub mod summary;
pub mod users;

use axum::{
    Router,
    routing::{get, post, put},
};

use crate::state::AdminState;

/// Create all routes for the admin API.
pub fn routes() -> Router<AdminState> {
    Router::new()
        .route("/api/admin/login", post(auth::login))
        .route("/api/admin/logout", post(auth::logout))
        .route("/api/admin/me", get(auth::me))
        .route(
            "/api/admin/products",
            get(products::list).post(products::create),
        )
        .route(
            "/api/admin/products/{id}",
            put(products::update).delete(products::delete),
        )
        .route("/api/admin/uploads", post(products::upload))
        .route("/api/admin/orders", get(orders::list))
        .route(
            "/api/admin/orders/{id}",
            get(orders::show).delete(orders::delete),
        )
        .route("/api/admin/orders/{id}/deliver", put(orders::deliver))
        .route("/api/admin/users", get(users::list))
        .route("/api/admin/users/{id}/admin", put(users::set_admin))
        .route("/api/admin/users/{id}", axum::routing::delete(users::delete))
        .route("/api/admin/summary", get(summary::summary))
}

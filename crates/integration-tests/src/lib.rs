//! HTTP-level integration tests for the boutique servers.
//!
//! The tests in `tests/` drive the running storefront and admin servers
//! over HTTP; they are `#[ignore]`d by default and expect both servers
//! (plus a migrated database) to be up:
//!
//! ```bash
//! cargo run -p boutique-cli -- migrate
//! cargo run -p boutique-storefront &
//! cargo run -p boutique-admin &
//! cargo test -p boutique-integration-tests -- --ignored
//! ```
//!
//! Base URLs are configurable via `STOREFRONT_BASE_URL` and
//! `ADMIN_BASE_URL`. Admin tests additionally need `ADMIN_EMAIL` and
//! `ADMIN_PASSWORD` for an existing admin account (create one with
//! `boutique-cli admin create`).

use reqwest::Client;
use serde_json::{Value, json};
use uuid::Uuid;

/// Base URL for the storefront API.
#[must_use]
pub fn storefront_base_url() -> String {
    std::env::var("STOREFRONT_BASE_URL").unwrap_or_else(|_| "http://localhost:3000".to_owned())
}

/// Base URL for the admin API.
#[must_use]
pub fn admin_base_url() -> String {
    std::env::var("ADMIN_BASE_URL").unwrap_or_else(|_| "http://localhost:3001".to_owned())
}

/// A fresh client with its own cookie jar (and so its own session).
#[must_use]
pub fn client() -> Client {
    Client::builder()
        .cookie_store(true)
        .build()
        .expect("Failed to create HTTP client")
}

/// Register a throwaway user on the given client's session.
///
/// Each call uses a unique email so tests don't collide. Returns the
/// registration response body.
pub async fn register_user(client: &Client, password: &str) -> Value {
    let base_url = storefront_base_url();
    let email = format!("test-{}@example.com", Uuid::new_v4());

    let resp = client
        .post(format!("{base_url}/api/users"))
        .json(&json!({
            "name": "Test User",
            "email": email,
            "password": password,
        }))
        .send()
        .await
        .expect("Failed to register test user");

    assert_eq!(resp.status(), 201, "registration should succeed");

    let mut body: Value = resp.json().await.expect("Failed to read registration body");
    body["email"] = Value::String(email);
    body
}

/// Fetch one product from the catalog.
///
/// Panics with a pointer to `boutique-cli seed` on an empty catalog.
pub async fn any_product(client: &Client) -> Value {
    let base_url = storefront_base_url();

    let resp = client
        .get(format!("{base_url}/api/products"))
        .send()
        .await
        .expect("Failed to list products");
    assert_eq!(resp.status(), 200);

    let products: Vec<Value> = resp.json().await.expect("Failed to read product list");
    products
        .into_iter()
        .next()
        .expect("Catalog is empty; seed it with boutique-cli seed")
}

/// Log in as the configured admin and return the authenticated client.
///
/// Panics with a pointer to `boutique-cli admin create` when the env
/// vars are missing, so a skipped precondition reads as such.
pub async fn admin_client() -> Client {
    let email = std::env::var("ADMIN_EMAIL")
        .expect("ADMIN_EMAIL not set; create an admin with boutique-cli admin create");
    let password = std::env::var("ADMIN_PASSWORD").expect("ADMIN_PASSWORD not set");

    let client = client();
    let base_url = admin_base_url();

    let resp = client
        .post(format!("{base_url}/api/admin/login"))
        .json(&json!({"email": email, "password": password}))
        .send()
        .await
        .expect("Failed to reach admin login");

    assert_eq!(resp.status(), 200, "admin login should succeed");
    client
}

//! Integration tests for the admin panel API.
//!
//! These tests require:
//! - A migrated `PostgreSQL` database (boutique-cli migrate)
//! - The admin server running (cargo run -p boutique-admin)
//! - The storefront server running (for the non-admin login fixture)
//! - `ADMIN_EMAIL` / `ADMIN_PASSWORD` for an existing admin account
//!
//! Run with: cargo test -p boutique-integration-tests -- --ignored

use reqwest::StatusCode;
use serde_json::{Value, json};

use boutique_integration_tests::{admin_base_url, admin_client, client, register_user};

const PASSWORD: &str = "correct horse battery";

#[tokio::test]
#[ignore = "Requires running admin server and admin credentials"]
async fn non_admin_login_is_forbidden() {
    let regular = client();
    let user = register_user(&regular, PASSWORD).await;

    let resp = client()
        .post(format!("{}/api/admin/login", admin_base_url()))
        .json(&json!({"email": user["email"], "password": PASSWORD}))
        .send()
        .await
        .expect("Failed to login");

    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
#[ignore = "Requires running admin server and admin credentials"]
async fn unauthenticated_requests_are_rejected() {
    let resp = client()
        .get(format!("{}/api/admin/summary", admin_base_url()))
        .send()
        .await
        .expect("Failed to fetch summary");

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
#[ignore = "Requires running admin server and admin credentials"]
async fn summary_reports_counts_and_revenue() {
    let client = admin_client().await;

    let resp = client
        .get(format!("{}/api/admin/summary", admin_base_url()))
        .send()
        .await
        .expect("Failed to fetch summary");
    assert_eq!(resp.status(), StatusCode::OK);

    let summary: Value = resp.json().await.expect("Failed to read summary");
    assert!(summary["userCount"].is_i64());
    assert!(summary["productCount"].is_i64());
    assert!(summary["orderCount"].is_i64());
    assert!(summary["paidRevenue"].is_string());
}

#[tokio::test]
#[ignore = "Requires running admin server and admin credentials"]
async fn product_crud_roundtrip() {
    let client = admin_client().await;
    let base_url = admin_base_url();

    // Images arrive in the loosest historical shape and still normalize
    let resp = client
        .post(format!("{base_url}/api/admin/products"))
        .json(&json!({
            "name": "Integration Test Product",
            "description": "Created by an integration test.",
            "category": "test",
            "price": "42.00",
            "sizes": ["M"],
            "images": {"url": "/uploads/integration-test.jpg"},
        }))
        .send()
        .await
        .expect("Failed to create product");
    assert_eq!(resp.status(), StatusCode::CREATED);

    let product: Value = resp.json().await.expect("Failed to read product");
    let id = product["id"].as_str().expect("product id").to_owned();
    assert_eq!(product["images"], json!(["/uploads/integration-test.jpg"]));
    assert_eq!(product["inStock"], json!(true));

    let resp = client
        .put(format!("{base_url}/api/admin/products/{id}"))
        .json(&json!({
            "name": "Integration Test Product",
            "description": "Updated by an integration test.",
            "category": "test",
            "price": "45.00",
            "sizes": ["M", "L"],
            "images": ["/uploads/integration-test.jpg"],
            "inStock": false,
        }))
        .send()
        .await
        .expect("Failed to update product");
    assert_eq!(resp.status(), StatusCode::OK);

    let updated: Value = resp.json().await.expect("Failed to read product");
    assert_eq!(updated["price"], json!("45.00"));
    assert_eq!(updated["inStock"], json!(false));

    let resp = client
        .delete(format!("{base_url}/api/admin/products/{id}"))
        .send()
        .await
        .expect("Failed to delete product");
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    let resp = client
        .get(format!("{base_url}/api/admin/products"))
        .send()
        .await
        .expect("Failed to list products");
    let products: Vec<Value> = resp.json().await.expect("Failed to read products");
    assert!(products.iter().all(|p| p["id"] != json!(id.clone())));
}

#[tokio::test]
#[ignore = "Requires running admin server and admin credentials"]
async fn deleting_an_unknown_order_is_404() {
    let client = admin_client().await;

    // A 404 (not 405) shows the delete route is wired up
    let resp = client
        .delete(format!(
            "{}/api/admin/orders/{}",
            admin_base_url(),
            uuid::Uuid::new_v4()
        ))
        .send()
        .await
        .expect("Failed to call delete");

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
#[ignore = "Requires running admin server and admin credentials"]
async fn admins_cannot_delete_themselves() {
    let client = admin_client().await;
    let base_url = admin_base_url();

    let resp = client
        .get(format!("{base_url}/api/admin/me"))
        .send()
        .await
        .expect("Failed to fetch current admin");
    assert_eq!(resp.status(), StatusCode::OK);
    let me: Value = resp.json().await.expect("Failed to read admin");
    let id = me["id"].as_str().expect("admin id");

    let resp = client
        .delete(format!("{base_url}/api/admin/users/{id}"))
        .send()
        .await
        .expect("Failed to call delete");
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

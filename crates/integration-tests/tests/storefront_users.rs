//! Integration tests for storefront account endpoints.
//!
//! These tests require:
//! - A migrated `PostgreSQL` database (boutique-cli migrate)
//! - The storefront server running (cargo run -p boutique-storefront)
//!
//! Run with: cargo test -p boutique-integration-tests -- --ignored

use reqwest::StatusCode;
use serde_json::{Value, json};
use uuid::Uuid;

use boutique_integration_tests::{client, register_user, storefront_base_url};

const PASSWORD: &str = "correct horse battery";

#[tokio::test]
#[ignore = "Requires running storefront server"]
async fn register_signs_the_session_in() {
    let client = client();
    let user = register_user(&client, PASSWORD).await;

    let resp = client
        .get(format!("{}/api/users/profile", storefront_base_url()))
        .send()
        .await
        .expect("Failed to fetch profile");

    assert_eq!(resp.status(), StatusCode::OK);
    let profile: Value = resp.json().await.expect("Failed to read profile");
    assert_eq!(profile["email"], user["email"]);
    assert_eq!(profile["isAdmin"], json!(false));

    // A fresh account has no shopping history
    assert_eq!(profile["orderCount"], json!(0));
    assert_eq!(profile["totalSpent"], json!("0"));
    assert_eq!(profile["wishlistSize"], json!(0));
}

#[tokio::test]
#[ignore = "Requires running storefront server"]
async fn duplicate_registration_answers_400_user_exists() {
    let base_url = storefront_base_url();
    let email = format!("test-{}@example.com", Uuid::new_v4());
    let body = json!({"name": "Test User", "email": email, "password": PASSWORD});

    let first = client()
        .post(format!("{base_url}/api/users"))
        .json(&body)
        .send()
        .await
        .expect("Failed to register");
    assert_eq!(first.status(), StatusCode::CREATED);

    let second = client()
        .post(format!("{base_url}/api/users"))
        .json(&body)
        .send()
        .await
        .expect("Failed to re-register");
    assert_eq!(second.status(), StatusCode::BAD_REQUEST);

    let error: Value = second.json().await.expect("Failed to read error body");
    assert_eq!(error["message"], json!("user exists"));
}

#[tokio::test]
#[ignore = "Requires running storefront server"]
async fn wrong_password_answers_401() {
    let client = client();
    let user = register_user(&client, PASSWORD).await;

    let resp = client
        .post(format!("{}/api/users/login", storefront_base_url()))
        .json(&json!({"email": user["email"], "password": "not the password"}))
        .send()
        .await
        .expect("Failed to login");

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
#[ignore = "Requires running storefront server"]
async fn logout_ends_the_session() {
    let base_url = storefront_base_url();
    let client = client();
    register_user(&client, PASSWORD).await;

    let resp = client
        .post(format!("{base_url}/api/users/logout"))
        .send()
        .await
        .expect("Failed to logout");
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    let resp = client
        .get(format!("{base_url}/api/users/profile"))
        .send()
        .await
        .expect("Failed to fetch profile");
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
#[ignore = "Requires running storefront server"]
async fn profile_update_changes_name() {
    let base_url = storefront_base_url();
    let client = client();
    register_user(&client, PASSWORD).await;

    let resp = client
        .put(format!("{base_url}/api/users/profile"))
        .json(&json!({"name": "Renamed User"}))
        .send()
        .await
        .expect("Failed to update profile");

    assert_eq!(resp.status(), StatusCode::OK);
    let profile: Value = resp.json().await.expect("Failed to read profile");
    assert_eq!(profile["name"], json!("Renamed User"));
}

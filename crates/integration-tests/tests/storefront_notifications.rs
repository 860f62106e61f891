//! Integration tests for the notification feed.
//!
//! These tests require:
//! - A migrated `PostgreSQL` database (boutique-cli migrate)
//! - The storefront server running (cargo run -p boutique-storefront)
//!
//! Run with: cargo test -p boutique-integration-tests -- --ignored

use reqwest::{Client, StatusCode};
use serde_json::{Value, json};
use uuid::Uuid;

use boutique_integration_tests::{client, storefront_base_url};

async fn push(client: &Client, message: &str) -> (StatusCode, Value) {
    let resp = client
        .post(format!("{}/api/notifications", storefront_base_url()))
        .json(&json!({"message": message, "kind": "info"}))
        .send()
        .await
        .expect("Failed to push notification");

    let status = resp.status();
    let body: Value = resp.json().await.expect("Failed to read feed");
    (status, body)
}

#[tokio::test]
#[ignore = "Requires running storefront server"]
async fn duplicate_pushes_within_the_window_are_dropped() {
    let client = client();
    let message = format!("dedup test {}", Uuid::new_v4());

    let (first_status, first) = push(&client, &message).await;
    assert_eq!(first_status, StatusCode::CREATED);

    let (second_status, second) = push(&client, &message).await;
    assert_eq!(second_status, StatusCode::OK);

    // Both responses show exactly one copy of the message
    let count = |feed: &Value| {
        feed["notifications"]
            .as_array()
            .expect("notifications array")
            .iter()
            .filter(|n| n["message"] == json!(message.clone()))
            .count()
    };
    assert_eq!(count(&first), 1);
    assert_eq!(count(&second), 1);
}

#[tokio::test]
#[ignore = "Requires running storefront server"]
async fn feed_is_capped_at_fifty() {
    let client = client();

    for i in 0..60 {
        push(&client, &format!("notification {i}")).await;
    }

    let resp = client
        .get(format!("{}/api/notifications", storefront_base_url()))
        .send()
        .await
        .expect("Failed to fetch feed");
    assert_eq!(resp.status(), StatusCode::OK);

    let feed: Value = resp.json().await.expect("Failed to read feed");
    assert_eq!(
        feed["notifications"].as_array().expect("notifications array").len(),
        50
    );
}

#[tokio::test]
#[ignore = "Requires running storefront server"]
async fn marking_read_updates_the_unread_count() {
    let client = client();
    let (_, feed) = push(&client, &format!("read test {}", Uuid::new_v4())).await;

    let unread = feed["unreadCount"].as_u64().expect("unread count");
    assert!(unread >= 1);

    let id = feed["notifications"][0]["id"].as_str().expect("id").to_owned();
    let resp = client
        .patch(format!("{}/api/notifications/{id}/read", storefront_base_url()))
        .send()
        .await
        .expect("Failed to mark read");
    assert_eq!(resp.status(), StatusCode::OK);

    let feed: Value = resp.json().await.expect("Failed to read feed");
    assert_eq!(feed["unreadCount"].as_u64().expect("unread count"), unread - 1);
}

#[tokio::test]
#[ignore = "Requires running storefront server"]
async fn removed_notifications_stay_gone() {
    let client = client();
    let (_, feed) = push(&client, &format!("remove test {}", Uuid::new_v4())).await;
    let id = feed["notifications"][0]["id"].as_str().expect("id").to_owned();
    let base_url = storefront_base_url();

    let resp = client
        .delete(format!("{base_url}/api/notifications/{id}"))
        .send()
        .await
        .expect("Failed to remove notification");
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = client
        .get(format!("{base_url}/api/notifications"))
        .send()
        .await
        .expect("Failed to fetch feed");
    let feed: Value = resp.json().await.expect("Failed to read feed");
    assert!(
        feed["notifications"]
            .as_array()
            .expect("notifications array")
            .iter()
            .all(|n| n["id"] != json!(id.clone()))
    );
}

#[tokio::test]
#[ignore = "Requires running storefront server"]
async fn clearing_empties_the_feed() {
    let client = client();
    push(&client, "soon to be gone").await;
    let base_url = storefront_base_url();

    let resp = client
        .delete(format!("{base_url}/api/notifications"))
        .send()
        .await
        .expect("Failed to clear feed");
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    let resp = client
        .get(format!("{base_url}/api/notifications"))
        .send()
        .await
        .expect("Failed to fetch feed");
    let feed: Value = resp.json().await.expect("Failed to read feed");
    assert!(
        feed["notifications"]
            .as_array()
            .expect("notifications array")
            .is_empty()
    );
}

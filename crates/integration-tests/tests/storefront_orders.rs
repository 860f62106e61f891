//! Integration tests for checkout and order history.
//!
//! These tests require:
//! - A migrated, seeded `PostgreSQL` database (boutique-cli migrate && boutique-cli seed)
//! - The storefront server running (cargo run -p boutique-storefront)
//!
//! Run with: cargo test -p boutique-integration-tests -- --ignored

use std::str::FromStr;

use reqwest::{Client, StatusCode};
use rust_decimal::Decimal;
use serde_json::{Value, json};

use boutique_integration_tests::{any_product, client, register_user, storefront_base_url};

const PASSWORD: &str = "correct horse battery";

fn decimal(value: &Value) -> Decimal {
    Decimal::from_str(value.as_str().expect("expected a decimal string"))
        .expect("expected a parseable decimal")
}

/// Register, fill the cart, save a shipping address, and place an order.
async fn place_order(client: &Client) -> Value {
    let base_url = storefront_base_url();
    register_user(client, PASSWORD).await;

    let product = any_product(client).await;
    let size = product["sizes"]
        .as_array()
        .and_then(|sizes| sizes.first())
        .cloned()
        .unwrap_or(Value::Null);

    let resp = client
        .post(format!("{base_url}/api/cart/items"))
        .json(&json!({"productId": product["id"], "size": size, "quantity": 1}))
        .send()
        .await
        .expect("Failed to add to cart");
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = client
        .put(format!("{base_url}/api/checkout/shipping"))
        .json(&json!({
            "address": "1 Test Street",
            "city": "Testville",
            "postalCode": "12345",
            "country": "Testland",
        }))
        .send()
        .await
        .expect("Failed to save shipping");
    assert!(resp.status().is_success());

    let resp = client
        .post(format!("{base_url}/api/orders"))
        .json(&json!({"paymentMethod": "card"}))
        .send()
        .await
        .expect("Failed to place order");
    assert_eq!(resp.status(), StatusCode::CREATED);

    resp.json().await.expect("Failed to read order")
}

#[tokio::test]
#[ignore = "Requires running storefront server and seeded catalog"]
async fn placing_an_order_recomputes_totals_and_clears_the_cart() {
    let client = client();
    let order = place_order(&client).await;

    let items_price = decimal(&order["itemsPrice"]);
    let tax_price = decimal(&order["taxPrice"]);
    let shipping_price = decimal(&order["shippingPrice"]);
    let total_price = decimal(&order["totalPrice"]);

    assert_eq!(tax_price, (items_price * Decimal::new(5, 2)).round_dp(2));
    assert_eq!(total_price, items_price + tax_price + shipping_price);
    assert_eq!(order["isPaid"], json!(false));

    let resp = client
        .get(format!("{}/api/cart", storefront_base_url()))
        .send()
        .await
        .expect("Failed to fetch cart");
    let cart: Value = resp.json().await.expect("Failed to read cart");
    assert_eq!(cart["count"], json!(0));
}

#[tokio::test]
#[ignore = "Requires running storefront server and seeded catalog"]
async fn order_history_contains_the_placed_order() {
    let client = client();
    let order = place_order(&client).await;

    let resp = client
        .get(format!("{}/api/orders/myorders", storefront_base_url()))
        .send()
        .await
        .expect("Failed to fetch order history");
    assert_eq!(resp.status(), StatusCode::OK);

    let orders: Vec<Value> = resp.json().await.expect("Failed to read orders");
    assert!(orders.iter().any(|o| o["id"] == order["id"]));
}

#[tokio::test]
#[ignore = "Requires running storefront server and seeded catalog"]
async fn profile_stats_reflect_the_placed_order() {
    let client = client();
    let order = place_order(&client).await;

    let resp = client
        .get(format!("{}/api/users/profile", storefront_base_url()))
        .send()
        .await
        .expect("Failed to fetch profile");
    assert_eq!(resp.status(), StatusCode::OK);

    let profile: Value = resp.json().await.expect("Failed to read profile");
    assert_eq!(profile["orderCount"], json!(1));
    assert_eq!(decimal(&profile["totalSpent"]), decimal(&order["totalPrice"]));
}

#[tokio::test]
#[ignore = "Requires running storefront server and seeded catalog"]
async fn paying_marks_the_order_paid_idempotently() {
    let client = client();
    let order = place_order(&client).await;
    let order_id = order["id"].as_str().expect("order id").to_owned();
    let base_url = storefront_base_url();

    let resp = client
        .put(format!("{base_url}/api/orders/{order_id}/pay"))
        .send()
        .await
        .expect("Failed to pay order");
    assert_eq!(resp.status(), StatusCode::OK);
    let paid: Value = resp.json().await.expect("Failed to read order");
    assert_eq!(paid["isPaid"], json!(true));

    // Paying again is a no-op, not an error
    let resp = client
        .put(format!("{base_url}/api/orders/{order_id}/pay"))
        .send()
        .await
        .expect("Failed to re-pay order");
    assert_eq!(resp.status(), StatusCode::OK);
}

#[tokio::test]
#[ignore = "Requires running storefront server and seeded catalog"]
async fn other_users_cannot_see_the_order() {
    let owner = client();
    let order = place_order(&owner).await;
    let order_id = order["id"].as_str().expect("order id").to_owned();

    let stranger = client();
    register_user(&stranger, PASSWORD).await;

    let resp = stranger
        .get(format!("{}/api/orders/{order_id}", storefront_base_url()))
        .send()
        .await
        .expect("Failed to fetch order");

    // Existence is masked, not forbidden
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
#[ignore = "Requires running storefront server"]
async fn empty_cart_cannot_be_ordered() {
    let client = client();
    register_user(&client, PASSWORD).await;
    let base_url = storefront_base_url();

    let resp = client
        .put(format!("{base_url}/api/checkout/shipping"))
        .json(&json!({
            "address": "1 Test Street",
            "city": "Testville",
            "postalCode": "12345",
            "country": "Testland",
        }))
        .send()
        .await
        .expect("Failed to save shipping");
    assert!(resp.status().is_success());

    let resp = client
        .post(format!("{base_url}/api/orders"))
        .json(&json!({"paymentMethod": "card"}))
        .send()
        .await
        .expect("Failed to place order");

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

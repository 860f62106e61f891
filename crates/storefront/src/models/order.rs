//! Order domain models.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use boutique_core::{OrderId, ProductId, UserId};

/// Shipping destination for an order.
///
/// Held in the session until checkout completes, then copied onto the order
/// row.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShippingInfo {
    pub address: String,
    pub city: String,
    pub postal_code: String,
    pub country: String,
}

/// A line item on a placed order.
///
/// Name, price, and image are copied from the product at checkout time so
/// the order history survives catalog edits.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    pub product_id: ProductId,
    pub name: String,
    pub size: Option<String>,
    pub quantity: u32,
    #[serde(with = "rust_decimal::serde::str")]
    pub unit_price: Decimal,
    pub image: Option<String>,
}

/// A placed order with server-computed totals.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: OrderId,
    pub user_id: UserId,
    pub items: Vec<OrderItem>,
    pub shipping: ShippingInfo,
    pub payment_method: String,
    #[serde(with = "rust_decimal::serde::str")]
    pub items_price: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub tax_price: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub shipping_price: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub total_price: Decimal,
    pub is_paid: bool,
    pub paid_at: Option<DateTime<Utc>>,
    pub is_delivered: bool,
    pub delivered_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

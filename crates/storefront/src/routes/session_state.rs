//! Session-backed shopper state: wishlist, shipping info, display currency.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use serde::{Deserialize, Serialize};
use tower_sessions::Session;

use boutique_core::{Currency, ProductId, Wishlist};

use crate::error::AppError;
use crate::models::order::ShippingInfo;
use crate::models::session::keys;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToggleRequest {
    pub product_id: ProductId,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WishlistView {
    pub product_ids: Vec<ProductId>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToggleResponse {
    /// Whether the product is in the wishlist after the toggle.
    pub present: bool,
    pub product_ids: Vec<ProductId>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrencyRequest {
    pub currency: Currency,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrencyResponse {
    pub currency: Currency,
    pub symbol: &'static str,
    /// Base-currency units to one display unit.
    pub rate: rust_decimal::Decimal,
}

async fn load_wishlist(session: &Session) -> Result<Wishlist, AppError> {
    Ok(session.get(keys::WISHLIST).await?.unwrap_or_default())
}

/// `GET /api/wishlist` - Product ids in the wishlist, insertion order.
pub async fn wishlist(session: Session) -> Result<Json<WishlistView>, AppError> {
    let wishlist = load_wishlist(&session).await?;
    Ok(Json(WishlistView {
        product_ids: wishlist.product_ids().to_vec(),
    }))
}

/// `POST /api/wishlist/toggle` - Add or remove a product from the wishlist.
pub async fn toggle_wishlist(
    session: Session,
    Json(body): Json<ToggleRequest>,
) -> Result<Json<ToggleResponse>, AppError> {
    let mut wishlist = load_wishlist(&session).await?;
    let present = wishlist.toggle(body.product_id);
    session.insert(keys::WISHLIST, &wishlist).await?;

    Ok(Json(ToggleResponse {
        present,
        product_ids: wishlist.product_ids().to_vec(),
    }))
}

/// `GET /api/checkout/shipping` - The saved shipping address, if any.
pub async fn shipping(session: Session) -> Result<Json<Option<ShippingInfo>>, AppError> {
    let info: Option<ShippingInfo> = session.get(keys::SHIPPING_INFO).await?;
    Ok(Json(info))
}

/// `PUT /api/checkout/shipping` - Save the shipping address for checkout.
pub async fn save_shipping(
    session: Session,
    Json(info): Json<ShippingInfo>,
) -> Result<StatusCode, AppError> {
    for (field, value) in [
        ("address", &info.address),
        ("city", &info.city),
        ("postalCode", &info.postal_code),
        ("country", &info.country),
    ] {
        if value.trim().is_empty() {
            return Err(AppError::Validation(format!("{field} is required")));
        }
    }

    session.insert(keys::SHIPPING_INFO, &info).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// `GET /api/config/currency` - The session's display currency and rate.
pub async fn currency(
    State(state): State<AppState>,
    session: Session,
) -> Result<Json<CurrencyResponse>, AppError> {
    let currency: Currency = session.get(keys::CURRENCY).await?.unwrap_or_default();
    let rates = state.exchange().rates().await;

    Ok(Json(CurrencyResponse {
        currency,
        symbol: currency.symbol(),
        rate: rates.rate(currency),
    }))
}

/// `PUT /api/config/currency` - Switch the display currency.
///
/// Conversion is display-only; stored prices and order totals stay in
/// the base currency.
pub async fn set_currency(
    State(state): State<AppState>,
    session: Session,
    Json(body): Json<CurrencyRequest>,
) -> Result<Json<CurrencyResponse>, AppError> {
    session.insert(keys::CURRENCY, body.currency).await?;
    let rates = state.exchange().rates().await;

    Ok(Json(CurrencyResponse {
        currency: body.currency,
        symbol: body.currency.symbol(),
        rate: rates.rate(body.currency),
    }))
}

//! Cart routes.
//!
//! The cart lives in the session and is priced on every read from the
//! current catalog, so a price change between visits shows up immediately.

use std::collections::HashMap;

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tower_sessions::Session;

use boutique_core::{Cart, CartTotals, ProductId};

use crate::db::products::ProductRepository;
use crate::error::AppError;
use crate::models::session::keys;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItemRequest {
    pub product_id: ProductId,
    pub size: Option<String>,
    pub quantity: u32,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLineKey {
    pub product_id: ProductId,
    pub size: Option<String>,
}

/// A cart line joined with its current catalog data.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PricedCartLine {
    pub product_id: ProductId,
    pub size: Option<String>,
    pub quantity: u32,
    /// `None` when the product has been removed from the catalog; the
    /// line then contributes nothing to the totals.
    pub name: Option<String>,
    pub unit_price: Option<Decimal>,
    pub image: Option<String>,
    pub in_stock: Option<bool>,
}

/// Cart payload returned by every cart endpoint.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartView {
    pub items: Vec<PricedCartLine>,
    pub totals: CartTotals,
    /// Total unit count (the cart badge number).
    pub count: u32,
}

/// Read the cart from the session, defaulting to empty.
pub(crate) async fn load_cart(session: &Session) -> Result<Cart, AppError> {
    Ok(session.get(keys::CART).await?.unwrap_or_default())
}

pub(crate) async fn save_cart(session: &Session, cart: &Cart) -> Result<(), AppError> {
    session.insert(keys::CART, cart).await?;
    Ok(())
}

/// Join the cart against the catalog and compute totals.
pub(crate) async fn price_cart(state: &AppState, cart: &Cart) -> Result<CartView, AppError> {
    let repo = ProductRepository::new(state.pool());

    let mut products = HashMap::new();
    for item in cart.items() {
        if !products.contains_key(&item.product_id)
            && let Some(product) = repo.get(item.product_id).await?
        {
            products.insert(item.product_id, product);
        }
    }

    let prices: HashMap<ProductId, Decimal> =
        products.iter().map(|(&id, p)| (id, p.price)).collect();

    let items = cart
        .items()
        .iter()
        .map(|item| {
            let product = products.get(&item.product_id);
            PricedCartLine {
                product_id: item.product_id,
                size: item.size.clone(),
                quantity: item.quantity,
                name: product.map(|p| p.name.clone()),
                unit_price: product.map(|p| p.price),
                image: product.and_then(|p| p.images.first().cloned()),
                in_stock: product.map(|p| p.in_stock),
            }
        })
        .collect();

    Ok(CartView {
        items,
        totals: cart.totals(&prices),
        count: cart.total_quantity(),
    })
}

/// `GET /api/cart` - The session cart, priced against the catalog.
pub async fn show(
    State(state): State<AppState>,
    session: Session,
) -> Result<Json<CartView>, AppError> {
    let cart = load_cart(&session).await?;
    Ok(Json(price_cart(&state, &cart).await?))
}

/// `POST /api/cart/items` - Add units of a product/size to the cart.
///
/// Adding an existing `(product, size)` line merges quantities.
pub async fn add_item(
    State(state): State<AppState>,
    session: Session,
    Json(body): Json<CartItemRequest>,
) -> Result<Json<CartView>, AppError> {
    // The product must exist at add time; deletions after that are
    // handled by pricing, not rejection.
    let product = ProductRepository::new(state.pool())
        .get(body.product_id)
        .await?
        .ok_or(AppError::NotFound("product"))?;

    if let Some(size) = &body.size
        && !product.sizes.is_empty()
        && !product.sizes.contains(size)
    {
        return Err(AppError::Validation(format!(
            "size {size:?} not available for this product"
        )));
    }

    let mut cart = load_cart(&session).await?;
    cart.add(body.product_id, body.size, body.quantity)?;
    save_cart(&session, &cart).await?;

    Ok(Json(price_cart(&state, &cart).await?))
}

/// `PUT /api/cart/items` - Set a line's quantity.
///
/// A quantity below 1 removes the line.
pub async fn update_item(
    State(state): State<AppState>,
    session: Session,
    Json(body): Json<CartItemRequest>,
) -> Result<Json<CartView>, AppError> {
    let mut cart = load_cart(&session).await?;
    cart.set_quantity(body.product_id, body.size.as_deref(), body.quantity)?;
    save_cart(&session, &cart).await?;

    Ok(Json(price_cart(&state, &cart).await?))
}

/// `DELETE /api/cart/items` - Remove a line.
pub async fn remove_item(
    State(state): State<AppState>,
    session: Session,
    Json(body): Json<CartLineKey>,
) -> Result<Json<CartView>, AppError> {
    let mut cart = load_cart(&session).await?;
    cart.remove(body.product_id, body.size.as_deref())?;
    save_cart(&session, &cart).await?;

    Ok(Json(price_cart(&state, &cart).await?))
}

/// `DELETE /api/cart` - Empty the cart.
pub async fn clear(session: Session) -> Result<StatusCode, AppError> {
    session.remove::<Cart>(keys::CART).await?;
    Ok(StatusCode::NO_CONTENT)
}

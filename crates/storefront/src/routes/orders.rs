//! Order routes: checkout, history, payment confirmation.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use serde::Deserialize;
use tower_sessions::Session;

use boutique_core::{Cart, NotificationKind, OrderId, OrderTotals};

use crate::db::notifications::NotificationRepository;
use crate::db::orders::OrderRepository;
use crate::db::products::ProductRepository;
use crate::error::AppError;
use crate::middleware::auth::RequireAuth;
use crate::models::order::{Order, OrderItem, ShippingInfo};
use crate::models::session::keys;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaceOrderRequest {
    pub payment_method: String,
}

/// `POST /api/orders` - Place an order from the session cart.
///
/// Line prices and totals are recomputed server-side from the current
/// catalog; any totals the client computed are ignored. Cart lines whose
/// product has since been deleted are dropped. On success the cart is
/// cleared and the order id is parked in the session for the payment step.
pub async fn place(
    State(state): State<AppState>,
    session: Session,
    RequireAuth(user): RequireAuth,
    Json(body): Json<PlaceOrderRequest>,
) -> Result<(StatusCode, Json<Order>), AppError> {
    if body.payment_method.trim().is_empty() {
        return Err(AppError::Validation("paymentMethod is required".to_owned()));
    }

    let cart: Cart = session.get(keys::CART).await?.unwrap_or_default();
    if cart.is_empty() {
        return Err(AppError::Validation("cart is empty".to_owned()));
    }

    let shipping: ShippingInfo = session
        .get(keys::SHIPPING_INFO)
        .await?
        .ok_or_else(|| AppError::Validation("shipping info is required".to_owned()))?;

    // Snapshot line items from the current catalog
    let products = ProductRepository::new(state.pool());
    let mut items = Vec::with_capacity(cart.len());
    let mut items_price = rust_decimal::Decimal::ZERO;

    for line in cart.items() {
        let Some(product) = products.get(line.product_id).await? else {
            // Product vanished since it was added; skip the line
            continue;
        };

        items_price += product.price * rust_decimal::Decimal::from(line.quantity);
        items.push(OrderItem {
            product_id: line.product_id,
            name: product.name.clone(),
            size: line.size.clone(),
            quantity: line.quantity,
            unit_price: product.price,
            image: product.images.first().cloned(),
        });
    }

    if items.is_empty() {
        return Err(AppError::Validation(
            "no purchasable items in cart".to_owned(),
        ));
    }

    let totals = OrderTotals::compute(items_price);

    let order = OrderRepository::new(state.pool())
        .create(user.id, &items, &shipping, body.payment_method.trim(), &totals)
        .await?;

    // Checkout consumed the cart
    session.remove::<Cart>(keys::CART).await?;
    session.insert(keys::PENDING_ORDER_ID, order.id).await?;

    NotificationRepository::new(state.pool())
        .create(
            user.id,
            &format!("Order {} placed", short_id(order.id)),
            NotificationKind::Success,
        )
        .await?;

    tracing::info!(order_id = %order.id, user_id = %user.id, total = %order.total_price, "order placed");

    Ok((StatusCode::CREATED, Json(order)))
}

/// `GET /api/orders/myorders` - The signed-in user's order history.
pub async fn mine(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> Result<Json<Vec<Order>>, AppError> {
    let orders = OrderRepository::new(state.pool())
        .list_for_user(user.id)
        .await?;
    Ok(Json(orders))
}

/// `GET /api/orders/{id}` - Order detail; owner or admin only.
pub async fn show(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<OrderId>,
) -> Result<Json<Order>, AppError> {
    let order = OrderRepository::new(state.pool())
        .get(id)
        .await?
        .ok_or(AppError::NotFound("order"))?;

    if order.user_id != user.id && !user.is_admin {
        // Hide the order's existence from non-owners
        return Err(AppError::NotFound("order"));
    }

    Ok(Json(order))
}

/// `PUT /api/orders/{id}/pay` - Confirm payment for a pending order.
pub async fn pay(
    State(state): State<AppState>,
    session: Session,
    RequireAuth(user): RequireAuth,
    Path(id): Path<OrderId>,
) -> Result<Json<Order>, AppError> {
    let repo = OrderRepository::new(state.pool());

    let order = repo.get(id).await?.ok_or(AppError::NotFound("order"))?;
    if order.user_id != user.id && !user.is_admin {
        return Err(AppError::NotFound("order"));
    }

    if !order.is_paid {
        repo.mark_paid(id).await?;

        NotificationRepository::new(state.pool())
            .create(
                order.user_id,
                &format!("Payment received for order {}", short_id(id)),
                NotificationKind::Success,
            )
            .await?;
    }

    // Payment settles the pending order
    let pending: Option<OrderId> = session.get(keys::PENDING_ORDER_ID).await?;
    if pending == Some(id) {
        session.remove::<OrderId>(keys::PENDING_ORDER_ID).await?;
    }

    let order = repo.get(id).await?.ok_or(AppError::NotFound("order"))?;
    Ok(Json(order))
}

/// First UUID segment, enough for a human-readable order reference.
fn short_id(id: OrderId) -> String {
    let full = id.to_string();
    full.split('-').next().unwrap_or(&full).to_uppercase()
}

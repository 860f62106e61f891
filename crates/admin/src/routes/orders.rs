//! Admin order routes.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;

use boutique_core::{NotificationKind, OrderId};
use boutique_storefront::db::RepositoryError;
use boutique_storefront::db::notifications::NotificationRepository;
use boutique_storefront::db::orders::OrderRepository;
use boutique_storefront::models::order::Order;

use crate::error::AdminError;
use crate::middleware::RequireAdmin;
use crate::state::AdminState;

/// `GET /api/admin/orders` - Every order, newest first.
pub async fn list(
    State(state): State<AdminState>,
    RequireAdmin(_user): RequireAdmin,
) -> Result<Json<Vec<Order>>, AdminError> {
    let orders = OrderRepository::new(state.pool()).list_all().await?;
    Ok(Json(orders))
}

/// `GET /api/admin/orders/{id}` - Order detail.
pub async fn show(
    State(state): State<AdminState>,
    RequireAdmin(_user): RequireAdmin,
    Path(id): Path<OrderId>,
) -> Result<Json<Order>, AdminError> {
    let order = OrderRepository::new(state.pool())
        .get(id)
        .await?
        .ok_or(AdminError::NotFound("order"))?;
    Ok(Json(order))
}

/// `PUT /api/admin/orders/{id}/deliver` - Mark an order delivered.
///
/// The customer gets a server notification about it.
pub async fn deliver(
    State(state): State<AdminState>,
    RequireAdmin(user): RequireAdmin,
    Path(id): Path<OrderId>,
) -> Result<Json<Order>, AdminError> {
    let repo = OrderRepository::new(state.pool());

    let order = repo.get(id).await?.ok_or(AdminError::NotFound("order"))?;

    if !order.is_delivered {
        repo.mark_delivered(id).await.map_err(|e| match e {
            RepositoryError::NotFound => AdminError::NotFound("order"),
            other => AdminError::Repository(other),
        })?;

        NotificationRepository::new(state.pool())
            .create(
                order.user_id,
                "Your order has been delivered",
                NotificationKind::Success,
            )
            .await?;

        tracing::info!(order_id = %id, admin = %user.id, "order marked delivered");
    }

    let order = repo.get(id).await?.ok_or(AdminError::NotFound("order"))?;
    Ok(Json(order))
}

/// `DELETE /api/admin/orders/{id}` - Remove an order and its line items.
pub async fn delete(
    State(state): State<AdminState>,
    RequireAdmin(user): RequireAdmin,
    Path(id): Path<OrderId>,
) -> Result<StatusCode, AdminError> {
    let deleted = OrderRepository::new(state.pool()).delete(id).await?;
    if !deleted {
        return Err(AdminError::NotFound("order"));
    }

    tracing::info!(order_id = %id, admin = %user.id, "order deleted");
    Ok(StatusCode::NO_CONTENT)
}

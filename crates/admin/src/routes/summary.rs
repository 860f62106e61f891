//! Admin dashboard summary route.

use axum::Json;
use axum::extract::State;
use rust_decimal::Decimal;
use serde::Serialize;

use boutique_storefront::db::orders::OrderRepository;
use boutique_storefront::db::products::ProductRepository;
use boutique_storefront::db::users::UserRepository;

use crate::error::AdminError;
use crate::middleware::RequireAdmin;
use crate::state::AdminState;

/// The numbers on the dashboard's top row.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    pub user_count: i64,
    pub product_count: i64,
    pub order_count: i64,
    /// Sum of total prices across paid orders, in base currency.
    pub paid_revenue: Decimal,
}

/// `GET /api/admin/summary` - Store-wide counts and revenue.
pub async fn summary(
    State(state): State<AdminState>,
    RequireAdmin(_user): RequireAdmin,
) -> Result<Json<Summary>, AdminError> {
    let pool = state.pool();

    let user_count = UserRepository::new(pool).count().await?;
    let product_count = ProductRepository::new(pool).count().await?;
    let orders = OrderRepository::new(pool);
    let order_count = orders.count().await?;
    let paid_revenue = orders.paid_revenue().await?;

    Ok(Json(Summary {
        user_count,
        product_count,
        order_count,
        paid_revenue,
    }))
}

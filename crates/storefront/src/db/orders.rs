//! Order repository for database operations.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use boutique_core::{OrderId, OrderTotals, ProductId, UserId};

use super::RepositoryError;
use crate::models::order::{Order, OrderItem, ShippingInfo};

#[derive(sqlx::FromRow)]
struct OrderRow {
    id: Uuid,
    user_id: Uuid,
    payment_method: String,
    ship_address: String,
    ship_city: String,
    ship_postal_code: String,
    ship_country: String,
    items_price: Decimal,
    tax_price: Decimal,
    shipping_price: Decimal,
    total_price: Decimal,
    is_paid: bool,
    paid_at: Option<DateTime<Utc>>,
    is_delivered: bool,
    delivered_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
}

#[derive(sqlx::FromRow)]
struct OrderItemRow {
    order_id: Uuid,
    product_id: Uuid,
    name: String,
    size: Option<String>,
    quantity: i32,
    unit_price: Decimal,
    image: Option<String>,
}

impl OrderItemRow {
    fn into_item(self) -> Result<OrderItem, RepositoryError> {
        let quantity = u32::try_from(self.quantity).map_err(|_| {
            RepositoryError::DataCorruption(format!(
                "negative quantity {} on order item",
                self.quantity
            ))
        })?;

        Ok(OrderItem {
            product_id: ProductId::from_uuid(self.product_id),
            name: self.name,
            size: self.size,
            quantity,
            unit_price: self.unit_price,
            image: self.image,
        })
    }
}

impl OrderRow {
    fn into_order(self, items: Vec<OrderItem>) -> Order {
        Order {
            id: OrderId::from_uuid(self.id),
            user_id: UserId::from_uuid(self.user_id),
            items,
            shipping: ShippingInfo {
                address: self.ship_address,
                city: self.ship_city,
                postal_code: self.ship_postal_code,
                country: self.ship_country,
            },
            payment_method: self.payment_method,
            items_price: self.items_price,
            tax_price: self.tax_price,
            shipping_price: self.shipping_price,
            total_price: self.total_price,
            is_paid: self.is_paid,
            paid_at: self.paid_at,
            is_delivered: self.is_delivered,
            delivered_at: self.delivered_at,
            created_at: self.created_at,
        }
    }
}

const ORDER_COLUMNS: &str = "id, user_id, payment_method, ship_address, ship_city, \
     ship_postal_code, ship_country, items_price, tax_price, shipping_price, \
     total_price, is_paid, paid_at, is_delivered, delivered_at, created_at";

/// Repository for order database operations.
pub struct OrderRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> OrderRepository<'a> {
    /// Create a new order repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Persist a new order with its line items.
    ///
    /// Totals are computed by the caller from current catalog prices; the
    /// order row and its items are written in one transaction.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if any query fails.
    pub async fn create(
        &self,
        user_id: UserId,
        items: &[OrderItem],
        shipping: &ShippingInfo,
        payment_method: &str,
        totals: &OrderTotals,
    ) -> Result<Order, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let row: OrderRow = sqlx::query_as(&format!(
            r"
            INSERT INTO orders (id, user_id, payment_method, ship_address, ship_city,
                                ship_postal_code, ship_country, items_price, tax_price,
                                shipping_price, total_price)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            RETURNING {ORDER_COLUMNS}
            "
        ))
        .bind(OrderId::new().as_uuid())
        .bind(user_id.as_uuid())
        .bind(payment_method)
        .bind(&shipping.address)
        .bind(&shipping.city)
        .bind(&shipping.postal_code)
        .bind(&shipping.country)
        .bind(totals.items_price)
        .bind(totals.tax_price)
        .bind(totals.shipping_price)
        .bind(totals.total_price)
        .fetch_one(&mut *tx)
        .await?;

        for item in items {
            let quantity = i32::try_from(item.quantity).map_err(|_| {
                RepositoryError::DataCorruption(format!(
                    "order item quantity {} out of range",
                    item.quantity
                ))
            })?;

            sqlx::query(
                r"
                INSERT INTO order_items (id, order_id, product_id, name, size, quantity, unit_price, image)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
                ",
            )
            .bind(Uuid::new_v4())
            .bind(row.id)
            .bind(item.product_id.as_uuid())
            .bind(&item.name)
            .bind(&item.size)
            .bind(quantity)
            .bind(item.unit_price)
            .bind(&item.image)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        Ok(row.into_order(items.to_vec()))
    }

    /// Get an order by ID, including its line items.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(&self, id: OrderId) -> Result<Option<Order>, RepositoryError> {
        let row: Option<OrderRow> =
            sqlx::query_as(&format!("SELECT {ORDER_COLUMNS} FROM orders WHERE id = $1"))
                .bind(id.as_uuid())
                .fetch_optional(self.pool)
                .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        let items = self.items_for(id).await?;
        Ok(Some(row.into_order(items)))
    }

    async fn items_for(&self, id: OrderId) -> Result<Vec<OrderItem>, RepositoryError> {
        let rows: Vec<OrderItemRow> = sqlx::query_as(
            r"
            SELECT order_id, product_id, name, size, quantity, unit_price, image
            FROM order_items
            WHERE order_id = $1
            ORDER BY name, size
            ",
        )
        .bind(id.as_uuid())
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(OrderItemRow::into_item).collect()
    }

    /// List a user's orders, newest first, including line items.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_for_user(&self, user_id: UserId) -> Result<Vec<Order>, RepositoryError> {
        let rows: Vec<OrderRow> = sqlx::query_as(&format!(
            "SELECT {ORDER_COLUMNS} FROM orders WHERE user_id = $1 ORDER BY created_at DESC"
        ))
        .bind(user_id.as_uuid())
        .fetch_all(self.pool)
        .await?;

        self.attach_items(rows).await
    }

    /// List all orders, newest first, including line items.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_all(&self) -> Result<Vec<Order>, RepositoryError> {
        let rows: Vec<OrderRow> = sqlx::query_as(&format!(
            "SELECT {ORDER_COLUMNS} FROM orders ORDER BY created_at DESC"
        ))
        .fetch_all(self.pool)
        .await?;

        self.attach_items(rows).await
    }

    async fn attach_items(&self, rows: Vec<OrderRow>) -> Result<Vec<Order>, RepositoryError> {
        let mut orders = Vec::with_capacity(rows.len());
        for row in rows {
            let items = self.items_for(OrderId::from_uuid(row.id)).await?;
            orders.push(row.into_order(items));
        }
        Ok(orders)
    }

    /// Mark an order as paid.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the order doesn't exist.
    pub async fn mark_paid(&self, id: OrderId) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            "UPDATE orders SET is_paid = TRUE, paid_at = NOW() WHERE id = $1",
        )
        .bind(id.as_uuid())
        .execute(self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }

    /// Mark an order as delivered.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the order doesn't exist.
    pub async fn mark_delivered(&self, id: OrderId) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            "UPDATE orders SET is_delivered = TRUE, delivered_at = NOW() WHERE id = $1",
        )
        .bind(id.as_uuid())
        .execute(self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }

    /// Count all orders.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn count(&self) -> Result<i64, RepositoryError> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM orders")
            .fetch_one(self.pool)
            .await?;

        Ok(count)
    }

    /// Sum of total prices across paid orders.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn paid_revenue(&self) -> Result<Decimal, RepositoryError> {
        let (revenue,): (Option<Decimal>,) =
            sqlx::query_as("SELECT SUM(total_price) FROM orders WHERE is_paid = TRUE")
                .fetch_one(self.pool)
                .await?;

        Ok(revenue.unwrap_or_default())
    }

    /// Delete an order; line items cascade.
    ///
    /// Returns whether a row was deleted.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn delete(&self, id: OrderId) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM orders WHERE id = $1")
            .bind(id.as_uuid())
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Order count and total spent for one user, across all their orders.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn stats_for_user(&self, user_id: UserId) -> Result<(i64, Decimal), RepositoryError> {
        let (count, spent): (i64, Option<Decimal>) = sqlx::query_as(
            "SELECT COUNT(*), SUM(total_price) FROM orders WHERE user_id = $1",
        )
        .bind(user_id.as_uuid())
        .fetch_one(self.pool)
        .await?;

        Ok((count, spent.unwrap_or_default()))
    }
}

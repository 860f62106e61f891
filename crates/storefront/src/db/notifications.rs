//! Notification repository for database operations.
//!
//! Server-side notifications live in the `notifications` table. Deletions
//! of server-origin notifications are recorded in `notification_tombstones`
//! so a later fetch never resurrects them.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use boutique_core::{Notification, NotificationId, NotificationKind, UserId};

use super::RepositoryError;

#[derive(sqlx::FromRow)]
struct NotificationRow {
    id: Uuid,
    message: String,
    kind: String,
    is_read: bool,
    created_at: DateTime<Utc>,
}

impl From<NotificationRow> for Notification {
    fn from(row: NotificationRow) -> Self {
        Self {
            id: NotificationId::from_uuid(row.id),
            message: row.message,
            kind: NotificationKind::from_str_lossy(&row.kind),
            timestamp: row.created_at,
            read: row.is_read,
            server_origin: true,
        }
    }
}

/// Repository for notification database operations.
pub struct NotificationRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> NotificationRepository<'a> {
    /// Create a new notification repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List a user's notifications, newest first, excluding tombstoned ids.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_for_user(
        &self,
        user_id: UserId,
    ) -> Result<Vec<Notification>, RepositoryError> {
        let rows: Vec<NotificationRow> = sqlx::query_as(
            r"
            SELECT n.id, n.message, n.kind, n.is_read, n.created_at
            FROM notifications n
            WHERE n.user_id = $1
              AND NOT EXISTS (
                  SELECT 1 FROM notification_tombstones t
                  WHERE t.user_id = n.user_id AND t.notification_id = n.id
              )
            ORDER BY n.created_at DESC
            ",
        )
        .bind(user_id.as_uuid())
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Notification::from).collect())
    }

    /// Create a notification for a user.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn create(
        &self,
        user_id: UserId,
        message: &str,
        kind: NotificationKind,
    ) -> Result<Notification, RepositoryError> {
        let row: NotificationRow = sqlx::query_as(
            r"
            INSERT INTO notifications (id, user_id, message, kind)
            VALUES ($1, $2, $3, $4)
            RETURNING id, message, kind, is_read, created_at
            ",
        )
        .bind(NotificationId::new().as_uuid())
        .bind(user_id.as_uuid())
        .bind(message)
        .bind(kind.as_str())
        .fetch_one(self.pool)
        .await?;

        Ok(row.into())
    }

    /// Mark one of the user's notifications as read.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the notification doesn't
    /// exist or belongs to another user.
    pub async fn mark_read(
        &self,
        user_id: UserId,
        id: NotificationId,
    ) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            "UPDATE notifications SET is_read = TRUE WHERE id = $1 AND user_id = $2",
        )
        .bind(id.as_uuid())
        .bind(user_id.as_uuid())
        .execute(self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }

    /// Mark all of the user's notifications as read.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn mark_all_read(&self, user_id: UserId) -> Result<(), RepositoryError> {
        sqlx::query("UPDATE notifications SET is_read = TRUE WHERE user_id = $1")
            .bind(user_id.as_uuid())
            .execute(self.pool)
            .await?;

        Ok(())
    }

    /// Delete a notification and tombstone its id.
    ///
    /// The tombstone is written even if the row is already gone, so a
    /// delete that races a re-fetch still sticks.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if any query fails.
    pub async fn delete(&self, user_id: UserId, id: NotificationId) -> Result<(), RepositoryError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r"
            INSERT INTO notification_tombstones (user_id, notification_id)
            VALUES ($1, $2)
            ON CONFLICT DO NOTHING
            ",
        )
        .bind(user_id.as_uuid())
        .bind(id.as_uuid())
        .execute(&mut *tx)
        .await?;

        sqlx::query("DELETE FROM notifications WHERE id = $1 AND user_id = $2")
            .bind(id.as_uuid())
            .bind(user_id.as_uuid())
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(())
    }

    /// Delete all of the user's notifications and tombstone their ids.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if any query fails.
    pub async fn delete_all(&self, user_id: UserId) -> Result<(), RepositoryError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r"
            INSERT INTO notification_tombstones (user_id, notification_id)
            SELECT user_id, id FROM notifications WHERE user_id = $1
            ON CONFLICT DO NOTHING
            ",
        )
        .bind(user_id.as_uuid())
        .execute(&mut *tx)
        .await?;

        sqlx::query("DELETE FROM notifications WHERE user_id = $1")
            .bind(user_id.as_uuid())
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(())
    }
}

//! Admin user management routes.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use serde::{Deserialize, Serialize};

use boutique_core::UserId;
use boutique_storefront::db::RepositoryError;
use boutique_storefront::db::users::UserRepository;

use crate::error::AdminError;
use crate::middleware::RequireAdmin;
use crate::state::AdminState;

/// User row as shown in the admin panel.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminUserView {
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub is_admin: bool,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetAdminRequest {
    pub is_admin: bool,
}

/// `GET /api/admin/users` - Every account, newest first.
pub async fn list(
    State(state): State<AdminState>,
    RequireAdmin(_user): RequireAdmin,
) -> Result<Json<Vec<AdminUserView>>, AdminError> {
    let users = UserRepository::new(state.pool()).list().await?;

    let views = users
        .into_iter()
        .map(|u| AdminUserView {
            id: u.id,
            name: u.name,
            email: u.email.into_string(),
            is_admin: u.is_admin,
            created_at: u.created_at,
        })
        .collect();

    Ok(Json(views))
}

/// `PUT /api/admin/users/{id}/admin` - Grant or revoke the admin flag.
///
/// Admins cannot revoke their own flag, so the panel always has at
/// least one way back in.
pub async fn set_admin(
    State(state): State<AdminState>,
    RequireAdmin(user): RequireAdmin,
    Path(id): Path<UserId>,
    Json(body): Json<SetAdminRequest>,
) -> Result<StatusCode, AdminError> {
    if id == user.id && !body.is_admin {
        return Err(AdminError::Validation(
            "cannot revoke your own admin access".to_owned(),
        ));
    }

    UserRepository::new(state.pool())
        .set_admin(id, body.is_admin)
        .await
        .map_err(|e| match e {
            RepositoryError::NotFound => AdminError::NotFound("user"),
            other => AdminError::Repository(other),
        })?;

    tracing::info!(user_id = %id, is_admin = body.is_admin, admin = %user.id, "admin flag changed");

    Ok(StatusCode::NO_CONTENT)
}

/// `DELETE /api/admin/users/{id}` - Delete an account.
pub async fn delete(
    State(state): State<AdminState>,
    RequireAdmin(user): RequireAdmin,
    Path(id): Path<UserId>,
) -> Result<StatusCode, AdminError> {
    if id == user.id {
        return Err(AdminError::Validation(
            "cannot delete your own account".to_owned(),
        ));
    }

    let deleted = UserRepository::new(state.pool()).delete(id).await?;
    if !deleted {
        return Err(AdminError::NotFound("user"));
    }

    tracing::info!(user_id = %id, admin = %user.id, "user deleted");

    Ok(StatusCode::NO_CONTENT)
}

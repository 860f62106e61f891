//! Admin session routes.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use serde::Deserialize;
use tower_sessions::Session;

use boutique_storefront::models::session::keys;
use boutique_storefront::models::user::CurrentUser;
use boutique_storefront::services::auth::{AuthError, AuthService};

use crate::error::AdminError;
use crate::middleware::RequireAdmin;
use crate::state::AdminState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// `POST /api/admin/login` - Sign in; the account must carry the admin flag.
pub async fn login(
    State(state): State<AdminState>,
    session: Session,
    Json(body): Json<LoginRequest>,
) -> Result<Json<CurrentUser>, AdminError> {
    let auth = AuthService::new(state.pool());
    let user = auth.login(&body.email, &body.password).await.map_err(|e| {
        match e {
            AuthError::InvalidCredentials | AuthError::InvalidEmail(_) => {
                AdminError::InvalidCredentials
            }
            other => AdminError::Auth(other),
        }
    })?;

    if !user.is_admin {
        return Err(AdminError::Forbidden);
    }

    session.cycle_id().await?;

    let current: CurrentUser = user.into();
    session.insert(keys::CURRENT_USER, &current).await?;

    tracing::info!(user_id = %current.id, "admin logged in");

    Ok(Json(current))
}

/// `POST /api/admin/logout` - Sign out and drop the session.
pub async fn logout(session: Session) -> Result<StatusCode, AdminError> {
    session.flush().await?;
    Ok(StatusCode::NO_CONTENT)
}

/// `GET /api/admin/me` - The signed-in admin.
pub async fn me(RequireAdmin(user): RequireAdmin) -> Json<CurrentUser> {
    Json(user)
}

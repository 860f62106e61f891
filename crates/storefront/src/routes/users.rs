//! User account routes: registration, login, logout, profile.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tower_sessions::Session;

use boutique_core::Wishlist;

use crate::db::OrderRepository;
use crate::error::AppError;
use crate::middleware::auth::{RequireAuth, clear_current_user, set_current_user};
use crate::models::session::keys;
use crate::models::user::CurrentUser;
use crate::services::auth::{AuthError, AuthService};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

/// Profile payload: the account plus its shopping stats.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileView {
    #[serde(flatten)]
    pub user: CurrentUser,
    pub order_count: i64,
    #[serde(with = "rust_decimal::serde::str")]
    pub total_spent: Decimal,
    pub wishlist_size: usize,
}

/// `POST /api/users` - Register a new account and sign it in.
///
/// A duplicate email answers `400 {"message": "user exists"}` so the
/// client can surface it as a form error rather than a server fault.
pub async fn register(
    State(state): State<AppState>,
    session: Session,
    Json(body): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<CurrentUser>), AppError> {
    if body.name.trim().is_empty() {
        return Err(AppError::Validation("name is required".to_owned()));
    }

    let auth = AuthService::new(state.pool());
    let user = auth
        .register(body.name.trim(), &body.email, &body.password)
        .await
        .map_err(|e| match e {
            AuthError::UserAlreadyExists => AppError::UserAlreadyExists,
            AuthError::InvalidEmail(e) => AppError::Validation(format!("invalid email: {e}")),
            AuthError::WeakPassword(msg) => AppError::Validation(msg),
            other => AppError::Auth(other),
        })?;

    let current: CurrentUser = user.into();
    set_current_user(&session, &current).await?;

    tracing::info!(user_id = %current.id, "user registered");

    Ok((StatusCode::CREATED, Json(current)))
}

/// `POST /api/users/login` - Sign in with email and password.
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Json(body): Json<LoginRequest>,
) -> Result<Json<CurrentUser>, AppError> {
    let auth = AuthService::new(state.pool());
    let user = auth.login(&body.email, &body.password).await.map_err(|e| {
        match e {
            // Email parse failures read the same as a wrong password so
            // the endpoint doesn't leak which accounts exist.
            AuthError::InvalidCredentials | AuthError::InvalidEmail(_) => {
                AppError::InvalidCredentials
            }
            other => AppError::Auth(other),
        }
    })?;

    // Fresh session id on login; the anonymous cart carries over
    session.cycle_id().await?;

    let current: CurrentUser = user.into();
    set_current_user(&session, &current).await?;

    tracing::info!(user_id = %current.id, "user logged in");

    Ok(Json(current))
}

/// `POST /api/users/logout` - Sign out.
///
/// Drops the identity but keeps the session (and with it the cart).
pub async fn logout(session: Session) -> Result<StatusCode, AppError> {
    clear_current_user(&session).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// `GET /api/users/profile` - The signed-in user with their shopping stats.
pub async fn profile(
    State(state): State<AppState>,
    session: Session,
    RequireAuth(current): RequireAuth,
) -> Result<Json<ProfileView>, AppError> {
    // Re-read from the database so a stale session reflects admin-side edits
    let auth = AuthService::new(state.pool());
    let user = auth.get_user(current.id).await.map_err(|e| match e {
        AuthError::UserNotFound => AppError::AuthRequired,
        other => AppError::Auth(other),
    })?;

    let (order_count, total_spent) = OrderRepository::new(state.pool())
        .stats_for_user(user.id)
        .await?;
    let wishlist: Wishlist = session.get(keys::WISHLIST).await?.unwrap_or_default();

    Ok(Json(ProfileView {
        user: user.into(),
        order_count,
        total_spent,
        wishlist_size: wishlist.len(),
    }))
}

/// `PUT /api/users/profile` - Update name, email, or password.
pub async fn update_profile(
    State(state): State<AppState>,
    session: Session,
    RequireAuth(current): RequireAuth,
    Json(body): Json<UpdateProfileRequest>,
) -> Result<Json<CurrentUser>, AppError> {
    let auth = AuthService::new(state.pool());
    let user = auth
        .update_profile(
            current.id,
            body.name.as_deref().map(str::trim),
            body.email.as_deref(),
            body.password.as_deref(),
        )
        .await
        .map_err(|e| match e {
            AuthError::UserAlreadyExists => AppError::UserAlreadyExists,
            AuthError::InvalidEmail(e) => AppError::Validation(format!("invalid email: {e}")),
            AuthError::WeakPassword(msg) => AppError::Validation(msg),
            AuthError::UserNotFound => AppError::AuthRequired,
            other => AppError::Auth(other),
        })?;

    let updated: CurrentUser = user.into();
    set_current_user(&session, &updated).await?;

    Ok(Json(updated))
}

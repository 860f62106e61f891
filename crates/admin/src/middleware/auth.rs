//! Admin authentication extractor.

use axum::{
    Json,
    extract::FromRequestParts,
    http::{StatusCode, request::Parts},
    response::{IntoResponse, Response},
};
use serde_json::json;
use tower_sessions::Session;

use boutique_storefront::models::session::keys;
use boutique_storefront::models::user::CurrentUser;

/// Extractor that requires a logged-in user with the admin flag.
///
/// Rejects with 401 when nobody is signed in and 403 when the user is
/// not an admin.
pub struct RequireAdmin(pub CurrentUser);

/// Rejection for missing or insufficient authentication.
pub enum AdminRejection {
    Unauthenticated,
    NotAdmin,
}

impl IntoResponse for AdminRejection {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            Self::Unauthenticated => (StatusCode::UNAUTHORIZED, "authentication required"),
            Self::NotAdmin => (StatusCode::FORBIDDEN, "admin access required"),
        };
        (status, Json(json!({ "message": message }))).into_response()
    }
}

impl<S> FromRequestParts<S> for RequireAdmin
where
    S: Send + Sync,
{
    type Rejection = AdminRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let session = parts
            .extensions
            .get::<Session>()
            .ok_or(AdminRejection::Unauthenticated)?;

        let user: CurrentUser = session
            .get(keys::CURRENT_USER)
            .await
            .ok()
            .flatten()
            .ok_or(AdminRejection::Unauthenticated)?;

        if !user.is_admin {
            return Err(AdminRejection::NotAdmin);
        }

        Ok(Self(user))
    }
}

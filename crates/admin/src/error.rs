//! Application error types for the admin API.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;

use boutique_storefront::db::RepositoryError;
use boutique_storefront::services::auth::AuthError;

/// Top-level admin error, mapped to a status code and a
/// `{ "message": ... }` JSON body.
#[derive(Debug, Error)]
pub enum AdminError {
    #[error("invalid email or password")]
    InvalidCredentials,

    #[error("authentication required")]
    AuthRequired,

    #[error("admin access required")]
    Forbidden,

    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("{0}")]
    Validation(String),

    #[error(transparent)]
    Repository(#[from] RepositoryError),

    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error("session error: {0}")]
    Session(#[from] tower_sessions::session::Error),

    #[error("upload failed: {0}")]
    Upload(String),
}

impl AdminError {
    /// Status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::InvalidCredentials | Self::AuthRequired => StatusCode::UNAUTHORIZED,
            Self::Forbidden => StatusCode::FORBIDDEN,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Repository(_) | Self::Auth(_) | Self::Session(_) | Self::Upload(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn is_server_error(&self) -> bool {
        self.status_code().is_server_error()
    }
}

impl IntoResponse for AdminError {
    fn into_response(self) -> Response {
        if self.is_server_error() {
            tracing::error!(error = %self, "admin request failed");
            sentry::capture_error(&self);
        } else {
            tracing::debug!(error = %self, "client error");
        }

        let status = self.status_code();
        let message = if self.is_server_error() {
            "internal server error".to_string()
        } else {
            self.to_string()
        };

        (status, Json(json!({ "message": message }))).into_response()
    }
}

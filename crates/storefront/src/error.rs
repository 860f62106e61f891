//! Application error types for the storefront API.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;

use crate::db::RepositoryError;
use crate::services::auth::AuthError;

/// Top-level application error.
///
/// Every handler returns `Result<_, AppError>`; the `IntoResponse` impl maps
/// each variant to a status code and a `{ "message": ... }` JSON body.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("user exists")]
    UserAlreadyExists,

    #[error("invalid email or password")]
    InvalidCredentials,

    #[error("authentication required")]
    AuthRequired,

    #[error("forbidden")]
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

    #[error("exchange rate fetch failed: {0}")]
    ExchangeRate(String),

    #[error(transparent)]
    Core(#[from] boutique_core::CoreError),
}

impl AppError {
    /// Status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::UserAlreadyExists | Self::Validation(_) | Self::Core(_) => {
                StatusCode::BAD_REQUEST
            }
            Self::InvalidCredentials | Self::AuthRequired => StatusCode::UNAUTHORIZED,
            Self::Forbidden => StatusCode::FORBIDDEN,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Repository(_) | Self::Auth(_) | Self::Session(_) | Self::ExchangeRate(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Whether this error should be reported to Sentry.
    ///
    /// Client errors (4xx) are expected traffic; only server-side failures
    /// get captured.
    fn is_server_error(&self) -> bool {
        self.status_code().is_server_error()
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if self.is_server_error() {
            tracing::error!(error = %self, "request failed");
            sentry::capture_error(&self);
        } else {
            tracing::debug!(error = %self, "client error");
        }

        let status = self.status_code();
        // Internal details stay out of the response body.
        let message = if self.is_server_error() {
            "internal server error".to_string()
        } else {
            self.to_string()
        };

        (status, Json(json!({ "message": message }))).into_response()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_user_exists_is_bad_request() {
        assert_eq!(
            AppError::UserAlreadyExists.status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(AppError::UserAlreadyExists.to_string(), "user exists");
    }

    #[test]
    fn test_invalid_credentials_is_unauthorized() {
        assert_eq!(
            AppError::InvalidCredentials.status_code(),
            StatusCode::UNAUTHORIZED
        );
    }

    #[test]
    fn test_not_found_message() {
        let err = AppError::NotFound("product");
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(err.to_string(), "product not found");
    }

    #[test]
    fn test_server_errors_hide_details() {
        let err = AppError::ExchangeRate("upstream timed out".to_string());
        assert!(err.is_server_error());
    }
}

//! Admin user management.
//!
//! # Usage
//!
//! ```bash
//! boutique-cli admin create -e admin@example.com -n "Admin Name" -p "a strong password"
//! ```
//!
//! Creates the user if the email is unknown, then grants the admin flag.
//! If the user already exists they are promoted in place and the given
//! password is ignored.

use thiserror::Error;

use boutique_core::Email;
use boutique_storefront::db::users::UserRepository;
use boutique_storefront::services::auth::{AuthError, AuthService};

use super::CommandError;

/// Errors that can occur during admin operations.
#[derive(Debug, Error)]
pub enum AdminCreateError {
    #[error(transparent)]
    Command(#[from] CommandError),

    /// Invalid email address.
    #[error("invalid email: {0}")]
    InvalidEmail(String),

    /// Registration or lookup failed.
    #[error("auth error: {0}")]
    Auth(#[from] AuthError),

    /// Database error.
    #[error("database error: {0}")]
    Database(#[from] boutique_storefront::db::RepositoryError),
}

/// Create a new admin user, or promote an existing user to admin.
///
/// # Errors
///
/// Returns an error if the email is malformed, the password is rejected,
/// or the database is unreachable.
pub async fn create(email: &str, name: &str, password: &str) -> Result<(), AdminCreateError> {
    let parsed =
        Email::parse(email).map_err(|_| AdminCreateError::InvalidEmail(email.to_owned()))?;

    let pool = super::connect().await?;
    let users = UserRepository::new(&pool);

    let user = match users.get_by_email(&parsed).await? {
        Some(existing) => {
            if existing.is_admin {
                tracing::info!("User {email} is already an admin, nothing to do");
                return Ok(());
            }
            tracing::info!("User {email} exists, promoting to admin");
            existing
        }
        None => {
            tracing::info!("Creating admin user: {email}");
            AuthService::new(&pool).register(name, email, password).await?
        }
    };

    users.set_admin(user.id, true).await?;

    tracing::info!("Admin user ready: {} <{}>", user.name, email);
    Ok(())
}

//! User domain models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use boutique_core::{Email, UserId};

/// A registered user account.
#[derive(Debug, Clone)]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub email: Email,
    pub is_admin: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// The authenticated user stored in the session and returned by auth
/// endpoints.
///
/// Password hashes never leave the database layer, so this is the shape
/// handlers work with.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrentUser {
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub is_admin: bool,
}

impl From<User> for CurrentUser {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email.into_string(),
            is_admin: user.is_admin,
        }
    }
}

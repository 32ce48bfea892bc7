//! User entity representing a registered account.

use chrono::{DateTime, Utc};

/// A registered account as stored in the database.
///
/// Token fields hold HMAC digests of the issued JWTs, never the tokens themselves.
#[derive(Debug, Clone)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub avatar: Option<String>,
    pub is_verified: bool,
    pub verification_token_hash: Option<String>,
    pub password_reset_token_hash: Option<String>,
    pub refresh_token_hash: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Returns true if `digest` matches the stored refresh token digest.
    pub fn has_refresh_token(&self, digest: &str) -> bool {
        self.refresh_token_hash.as_deref() == Some(digest)
    }

    /// Returns true if `digest` matches the stored password reset token digest.
    pub fn has_password_reset_token(&self, digest: &str) -> bool {
        self.password_reset_token_hash.as_deref() == Some(digest)
    }
}

/// Input data for creating a new user.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub avatar: Option<String>,
    pub verification_token_hash: Option<String>,
}

/// Partial profile update. `None` fields are left unchanged.
#[derive(Debug, Clone, Default)]
pub struct UserPatch {
    pub name: Option<String>,
    pub email: Option<String>,
}

impl UserPatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.email.is_none()
    }
}

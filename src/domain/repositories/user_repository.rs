//! Repository trait for user account data access.

use crate::domain::entities::{NewUser, User, UserPatch};
use crate::error::AppError;
use async_trait::async_trait;

/// Repository interface for managing user accounts.
///
/// Token arguments are digests produced by
/// [`crate::application::services::TokenService::digest`], never raw tokens.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgUserRepository`] - PostgreSQL implementation
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Creates a new user.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Conflict`] if the email is already registered.
    /// Returns [`AppError::Internal`] on database errors.
    async fn create(&self, new_user: NewUser) -> Result<User, AppError>;

    /// Finds a user by ID.
    async fn find_by_id(&self, id: i64) -> Result<Option<User>, AppError>;

    /// Finds a user by (lower-cased) email.
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError>;

    /// Finds a user whose email or name matches.
    ///
    /// Used at registration to reject duplicate identities.
    async fn find_by_email_or_name(&self, email: &str, name: &str)
    -> Result<Option<User>, AppError>;

    /// Finds a user by the digest of their pending verification token.
    async fn find_by_verification_token(&self, token_hash: &str)
    -> Result<Option<User>, AppError>;

    /// Marks the user verified and clears the verification token, but only
    /// while `token_hash` is still the stored verification digest.
    ///
    /// Returns `Ok(false)` if the user is gone or the token was already
    /// consumed.
    async fn mark_verified(&self, id: i64, token_hash: &str) -> Result<bool, AppError>;

    /// Stores (`Some`) or clears (`None`) the refresh token digest.
    async fn set_refresh_token(&self, id: i64, token_hash: Option<String>)
    -> Result<(), AppError>;

    /// Stores (`Some`) or clears (`None`) the password reset token digest.
    async fn set_password_reset_token(
        &self,
        id: i64,
        token_hash: Option<String>,
    ) -> Result<(), AppError>;

    /// Replaces the password hash. Stored tokens are left alone.
    async fn update_password(&self, id: i64, password_hash: &str) -> Result<(), AppError>;

    /// Replaces the password hash and clears the reset and refresh digests,
    /// provided `reset_token_hash` is still the stored reset digest.
    ///
    /// Returns `Ok(false)` if the reset token was already consumed or
    /// superseded.
    async fn reset_password(
        &self,
        id: i64,
        password_hash: &str,
        reset_token_hash: &str,
    ) -> Result<bool, AppError>;

    /// Applies a partial profile update and returns the updated user.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the user does not exist.
    /// Returns [`AppError::Conflict`] if the new email is taken.
    async fn update_profile(&self, id: i64, patch: UserPatch) -> Result<User, AppError>;

    /// Deletes a user and, by cascade, their URLs.
    ///
    /// Returns `Ok(false)` if no row was deleted.
    async fn delete(&self, id: i64) -> Result<bool, AppError>;

    /// Lists users, newest first.
    async fn list(&self, offset: i64, limit: i64) -> Result<Vec<User>, AppError>;

    /// Counts all users.
    async fn count(&self) -> Result<i64, AppError>;
}

//! Profile management for authenticated users.

use serde_json::json;
use std::sync::Arc;

use crate::application::services::auth_service::{
    ensure_password_strength, ensure_valid_email, normalize_email,
};
use crate::application::services::notifier::{Notification, Notifier};
use crate::domain::entities::{User, UserPatch};
use crate::domain::repositories::UserRepository;
use crate::error::AppError;
use crate::utils::password::PasswordHasher;

/// Identity of a deleted account, echoed back to the client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeletedAccount {
    pub email: String,
    pub name: String,
}

pub struct UserService<U: UserRepository + ?Sized> {
    users: Arc<U>,
    hasher: PasswordHasher,
    notifier: Arc<Notifier>,
}

impl<U: UserRepository + ?Sized> UserService<U> {
    pub fn new(users: Arc<U>, hasher: PasswordHasher, notifier: Arc<Notifier>) -> Self {
        Self {
            users,
            hasher,
            notifier,
        }
    }

    /// Updates name and/or email. Absent or blank fields keep their value.
    ///
    /// Email uniqueness is left to the database constraint.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] for a malformed email.
    /// Returns [`AppError::Conflict`] if the new email belongs to another account.
    pub async fn update_profile(
        &self,
        user_id: i64,
        name: Option<String>,
        email: Option<String>,
    ) -> Result<User, AppError> {
        let patch = UserPatch {
            name: name
                .map(|n| n.trim().to_string())
                .filter(|n| !n.is_empty()),
            email: email.map(|e| normalize_email(&e)).filter(|e| !e.is_empty()),
        };

        if let Some(email) = &patch.email {
            ensure_valid_email(email)?;
        }

        let user = if patch.is_empty() {
            self.users
                .find_by_id(user_id)
                .await?
                .ok_or_else(|| AppError::not_found("User not found", json!({})))?
        } else {
            self.users.update_profile(user_id, patch).await?
        };

        tracing::info!(user_id, "Profile updated");

        self.notifier
            .notify(
                &user.email,
                Notification::ProfileUpdated {
                    name: user.name.clone(),
                },
            )
            .await;

        Ok(user)
    }

    /// Replaces the password after checking the current one.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] if `old_password` is wrong or
    /// `new_password` is too short.
    pub async fn change_password(
        &self,
        user_id: i64,
        old_password: &str,
        new_password: &str,
    ) -> Result<(), AppError> {
        ensure_password_strength(new_password)?;

        let user = self
            .users
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| AppError::not_found("User not found", json!({})))?;

        if !self.hasher.verify(old_password, &user.password_hash).await? {
            return Err(AppError::bad_request("Incorrect old password", json!({})));
        }

        let password_hash = self.hasher.hash(new_password).await?;
        self.users.update_password(user.id, &password_hash).await?;

        tracing::info!(user_id, "Password changed");

        self.notifier
            .notify(&user.email, Notification::PasswordChanged { name: user.name })
            .await;

        Ok(())
    }

    /// Deletes the account and, by cascade, its short URLs.
    ///
    /// The identity is captured before deletion, so the call still reports it
    /// if the row disappeared concurrently.
    pub async fn delete_account(&self, user_id: i64) -> Result<DeletedAccount, AppError> {
        let user = self
            .users
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| AppError::not_found("User not found", json!({})))?;

        if !self.users.delete(user.id).await? {
            tracing::warn!(user_id, "Account was already deleted");
        } else {
            tracing::info!(user_id, "Account deleted");
        }

        self.notifier
            .notify(
                &user.email,
                Notification::AccountDeleted {
                    name: user.name.clone(),
                },
            )
            .await;

        Ok(DeletedAccount {
            email: user.email,
            name: user.name,
        })
    }

    pub async fn total_users(&self) -> Result<i64, AppError> {
        self.users.count().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::repositories::MockUserRepository;
    use crate::infrastructure::mail::MockMailer;
    use chrono::Utc;

    fn user(id: i64, password_hash: &str) -> User {
        User {
            id,
            name: "alice".to_string(),
            email: "alice@example.com".to_string(),
            password_hash: password_hash.to_string(),
            avatar: None,
            is_verified: true,
            verification_token_hash: None,
            password_reset_token_hash: None,
            refresh_token_hash: None,
            created_at: Utc::now(),
        }
    }

    fn service(repo: MockUserRepository, sends: usize) -> UserService<MockUserRepository> {
        let mut mailer = MockMailer::new();
        mailer.expect_send().times(sends).returning(|_| Ok(()));

        UserService::new(
            Arc::new(repo),
            PasswordHasher::new(4),
            Arc::new(Notifier::new(Arc::new(mailer), "http://localhost:5173")),
        )
    }

    #[tokio::test]
    async fn test_update_profile_drops_blank_fields() {
        let mut repo = MockUserRepository::new();
        repo.expect_update_profile()
            .withf(|id, patch| {
                *id == 1 && patch.name.is_none() && patch.email.as_deref() == Some("new@example.com")
            })
            .times(1)
            .returning(|id, patch| {
                Ok(User {
                    email: patch.email.unwrap_or_default(),
                    ..user(id, "x")
                })
            });

        let updated = service(repo, 1)
            .update_profile(1, Some("   ".to_string()), Some("New@Example.com".to_string()))
            .await
            .unwrap();

        assert_eq!(updated.email, "new@example.com");
        assert_eq!(updated.name, "alice");
    }

    #[tokio::test]
    async fn test_update_profile_with_nothing_returns_current_user() {
        let mut repo = MockUserRepository::new();
        repo.expect_update_profile().never();
        repo.expect_find_by_id()
            .times(1)
            .returning(|id| Ok(Some(user(id, "x"))));

        let result = service(repo, 1).update_profile(1, None, None).await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_update_profile_rejects_malformed_email() {
        let mut repo = MockUserRepository::new();
        repo.expect_update_profile().never();

        let result = service(repo, 0)
            .update_profile(1, None, Some("nope".to_string()))
            .await;

        assert!(matches!(result, Err(AppError::Validation { .. })));
    }

    #[tokio::test]
    async fn test_change_password_wrong_old_password() {
        let hash = PasswordHasher::new(4).hash("old-password").await.unwrap();

        let mut repo = MockUserRepository::new();
        repo.expect_find_by_id()
            .returning(move |id| Ok(Some(user(id, &hash))));
        repo.expect_update_password().never();

        let err = service(repo, 0)
            .change_password(1, "wrong-password", "new-password")
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Validation { .. }));
        assert_eq!(err.to_string(), "Incorrect old password");
    }

    #[tokio::test]
    async fn test_change_password_success_keeps_tokens() {
        let hash = PasswordHasher::new(4).hash("old-password").await.unwrap();

        let mut repo = MockUserRepository::new();
        repo.expect_find_by_id()
            .returning(move |id| Ok(Some(user(id, &hash))));
        repo.expect_update_password()
            .withf(|id, hash| *id == 1 && hash.starts_with("$2"))
            .times(1)
            .returning(|_, _| Ok(()));
        repo.expect_reset_password().never();

        let result = service(repo, 1)
            .change_password(1, "old-password", "new-password")
            .await;

        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_delete_account_reports_identity_even_if_already_gone() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_id()
            .returning(|id| Ok(Some(user(id, "x"))));
        repo.expect_delete().times(1).returning(|_| Ok(false));

        let deleted = service(repo, 1).delete_account(1).await.unwrap();

        assert_eq!(
            deleted,
            DeletedAccount {
                email: "alice@example.com".to_string(),
                name: "alice".to_string(),
            }
        );
    }

    #[tokio::test]
    async fn test_delete_account_unknown_user() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_id().returning(|_| Ok(None));
        repo.expect_delete().never();

        let result = service(repo, 0).delete_account(1).await;
        assert!(matches!(result, Err(AppError::NotFound { .. })));
    }
}

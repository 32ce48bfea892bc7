//! Account authentication: registration, verification, sessions and password reset.

use serde_json::json;
use std::sync::Arc;
use validator::ValidateEmail;

use crate::application::services::notifier::{Notification, Notifier};
use crate::application::services::token_service::{TokenKind, TokenService};
use crate::domain::entities::{NewUser, User};
use crate::domain::repositories::UserRepository;
use crate::error::AppError;
use crate::utils::password::PasswordHasher;

/// Minimum accepted password length in characters.
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// bcrypt ignores everything past this many bytes, so longer passwords are
/// refused rather than silently truncated.
pub const MAX_PASSWORD_BYTES: usize = 72;

/// Access and refresh tokens returned by a successful login.
#[derive(Debug, Clone)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

/// Input for [`AuthService::register`].
#[derive(Debug, Clone)]
pub struct Registration {
    pub name: String,
    pub email: String,
    pub password: String,
    pub avatar: Option<String>,
}

/// Service for account registration and token-based authentication.
///
/// Raw tokens are only ever handed to the client or put in emails. The user
/// row stores [`TokenService::digest`] values, so a database leak does not
/// expose usable refresh, verification or reset tokens.
pub struct AuthService<U: UserRepository + ?Sized> {
    users: Arc<U>,
    tokens: Arc<TokenService>,
    hasher: PasswordHasher,
    notifier: Arc<Notifier>,
}

impl<U: UserRepository + ?Sized> AuthService<U> {
    pub fn new(
        users: Arc<U>,
        tokens: Arc<TokenService>,
        hasher: PasswordHasher,
        notifier: Arc<Notifier>,
    ) -> Self {
        Self {
            users,
            tokens,
            hasher,
            notifier,
        }
    }

    /// Registers a new, unverified account and emails a verification link.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] if a field is blank, the email is
    /// malformed or the password is shorter than [`MIN_PASSWORD_LENGTH`].
    /// Returns [`AppError::Conflict`] if the email or name is already taken.
    pub async fn register(&self, registration: Registration) -> Result<User, AppError> {
        let name = registration.name.trim().to_string();
        let email = normalize_email(&registration.email);

        if name.is_empty() || email.is_empty() || registration.password.trim().is_empty() {
            return Err(AppError::bad_request("All fields are required", json!({})));
        }
        ensure_valid_email(&email)?;
        ensure_password_strength(&registration.password)?;

        if self
            .users
            .find_by_email_or_name(&email, &name)
            .await?
            .is_some()
        {
            return Err(AppError::conflict("User already exists", json!({})));
        }

        let password_hash = self.hasher.hash(&registration.password).await?;
        let verification_token = self.tokens.issue_verification(&email)?;

        let user = self
            .users
            .create(NewUser {
                name,
                email,
                password_hash,
                avatar: registration.avatar.filter(|a| !a.trim().is_empty()),
                verification_token_hash: Some(
                    self.tokens
                        .digest(TokenKind::Verification, &verification_token),
                ),
            })
            .await?;

        tracing::info!(user_id = user.id, "User registered");

        self.notifier
            .notify(
                &user.email,
                Notification::Welcome {
                    name: user.name.clone(),
                },
            )
            .await;
        self.notifier
            .notify(
                &user.email,
                Notification::VerifyEmail {
                    name: user.name.clone(),
                    token: verification_token,
                },
            )
            .await;

        Ok(user)
    }

    /// Consumes a verification token and marks its user verified.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] if the token is malformed, expired,
    /// already used or unknown.
    pub async fn verify_email(&self, token: &str) -> Result<(), AppError> {
        self.tokens.verify_verification(token)?;

        let digest = self.tokens.digest(TokenKind::Verification, token);
        let user = self
            .users
            .find_by_verification_token(&digest)
            .await?
            .ok_or_else(|| AppError::bad_request("Invalid verification token", json!({})))?;

        if !self.users.mark_verified(user.id, &digest).await? {
            return Err(AppError::bad_request(
                "Invalid verification token",
                json!({}),
            ));
        }

        tracing::info!(user_id = user.id, "Email verified");

        self.notifier
            .notify(&user.email, Notification::EmailVerified { name: user.name })
            .await;

        Ok(())
    }

    /// Checks credentials and opens a session.
    ///
    /// Unknown emails and wrong passwords produce the same error.
    pub async fn login(&self, email: &str, password: &str) -> Result<TokenPair, AppError> {
        let email = normalize_email(email);

        let Some(user) = self.users.find_by_email(&email).await? else {
            return Err(invalid_credentials());
        };

        if !self.hasher.verify(password, &user.password_hash).await? {
            tracing::debug!(user_id = user.id, "Login rejected: wrong password");
            return Err(invalid_credentials());
        }

        let access_token = self.tokens.issue_access(user.id, &user.email)?;
        let refresh_token = self.tokens.issue_refresh(user.id, &user.email)?;

        self.users
            .set_refresh_token(
                user.id,
                Some(self.tokens.digest(TokenKind::Refresh, &refresh_token)),
            )
            .await?;

        tracing::info!(user_id = user.id, "User logged in");

        Ok(TokenPair {
            access_token,
            refresh_token,
        })
    }

    /// Ends the session by forgetting the stored refresh token.
    pub async fn logout(&self, user_id: i64) -> Result<(), AppError> {
        self.users.set_refresh_token(user_id, None).await?;
        tracing::info!(user_id, "User logged out");
        Ok(())
    }

    /// Exchanges the current refresh token for a new access token.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] if the token is invalid, expired, or
    /// is not the one stored for its user.
    pub async fn refresh(&self, refresh_token: &str) -> Result<String, AppError> {
        let claims = self.tokens.verify_refresh(refresh_token)?;

        let digest = self.tokens.digest(TokenKind::Refresh, refresh_token);
        let user = self
            .users
            .find_by_id(claims.sub)
            .await?
            .filter(|user| user.has_refresh_token(&digest))
            .ok_or_else(|| AppError::bad_request("Invalid refresh token", json!({})))?;

        self.tokens.issue_access(user.id, &user.email)
    }

    /// Issues a password reset token and emails it.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no account uses `email`.
    /// Returns [`AppError::Internal`] if the email cannot be delivered.
    pub async fn request_password_reset(&self, email: &str) -> Result<(), AppError> {
        let email = normalize_email(email);
        if email.is_empty() {
            return Err(AppError::bad_request("Email is required", json!({})));
        }

        let user = self.users.find_by_email(&email).await?.ok_or_else(|| {
            AppError::not_found("No account found with that email", json!({}))
        })?;

        let reset_token = self.tokens.issue_password_reset(&user.email)?;
        self.users
            .set_password_reset_token(
                user.id,
                Some(self.tokens.digest(TokenKind::PasswordReset, &reset_token)),
            )
            .await?;

        self.notifier
            .deliver(
                &user.email,
                Notification::PasswordReset {
                    name: user.name,
                    token: reset_token,
                },
            )
            .await
            .map_err(|e| {
                tracing::error!(user_id = user.id, "Failed to send password reset email: {}", e);
                AppError::internal(
                    "Error sending password reset email. Please try again.",
                    json!({}),
                )
            })?;

        tracing::info!(user_id = user.id, "Password reset requested");
        Ok(())
    }

    /// Sets a new password using a reset token.
    ///
    /// Consuming the token also revokes the stored refresh token, ending any
    /// open session.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] if the token is invalid, expired or
    /// superseded, or the new password is too short.
    pub async fn reset_password(&self, token: &str, new_password: &str) -> Result<(), AppError> {
        if new_password.trim().is_empty() {
            return Err(AppError::bad_request(
                "Reset token and new password are required",
                json!({}),
            ));
        }
        ensure_password_strength(new_password)?;

        let claims = self.tokens.verify_password_reset(token)?;

        let user = self
            .users
            .find_by_email(&claims.email)
            .await?
            .ok_or_else(|| AppError::bad_request("No account found with that email", json!({})))?;

        let digest = self.tokens.digest(TokenKind::PasswordReset, token);
        if !user.has_password_reset_token(&digest) {
            return Err(AppError::bad_request(
                "Invalid password reset token",
                json!({}),
            ));
        }

        let password_hash = self.hasher.hash(new_password).await?;
        // A concurrent reset may have consumed the token while we were hashing.
        if !self
            .users
            .reset_password(user.id, &password_hash, &digest)
            .await?
        {
            return Err(AppError::bad_request(
                "Invalid password reset token",
                json!({}),
            ));
        }

        tracing::info!(user_id = user.id, "Password reset completed");

        if let Err(e) = self
            .notifier
            .deliver(
                &user.email,
                Notification::PasswordResetSucceeded {
                    name: user.name.clone(),
                },
            )
            .await
        {
            tracing::warn!(user_id = user.id, "Failed to send reset confirmation: {}", e);
            self.notifier
                .notify(&user.email, Notification::PasswordResetFailed { name: user.name })
                .await;
        }

        Ok(())
    }

    /// Resolves an access token to its (still existing) user.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Unauthorized`] if the token is invalid or the
    /// account no longer exists.
    pub async fn authenticate(&self, access_token: &str) -> Result<User, AppError> {
        let claims = self.tokens.verify_access(access_token)?;

        self.users.find_by_id(claims.sub).await?.ok_or_else(|| {
            AppError::unauthorized("Unauthorized", json!({ "reason": "Account not found" }))
        })
    }
}

fn invalid_credentials() -> AppError {
    AppError::unauthorized("Invalid credentials", json!({}))
}

/// Trims and lower-cases an email address.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

pub(crate) fn ensure_valid_email(email: &str) -> Result<(), AppError> {
    if email.validate_email() {
        Ok(())
    } else {
        Err(AppError::bad_request(
            "Invalid email address",
            json!({ "field": "email" }),
        ))
    }
}

pub(crate) fn ensure_password_strength(password: &str) -> Result<(), AppError> {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(AppError::bad_request(
            format!("Password must be at least {MIN_PASSWORD_LENGTH} characters"),
            json!({ "field": "password" }),
        ));
    }
    if password.len() > MAX_PASSWORD_BYTES {
        return Err(AppError::bad_request(
            format!("Password must be at most {MAX_PASSWORD_BYTES} bytes"),
            json!({ "field": "password", "bytes": password.len() }),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TokenSecrets;
    use crate::domain::repositories::MockUserRepository;
    use crate::infrastructure::mail::{MailError, MockMailer};
    use chrono::Utc;

    fn token_service() -> Arc<TokenService> {
        Arc::new(TokenService::new(
            TokenSecrets {
                access: "access".to_string(),
                refresh: "refresh".to_string(),
                verification: "verification".to_string(),
                password_reset: "reset".to_string(),
            },
            900,
            3600,
        ))
    }

    fn quiet_mailer() -> MockMailer {
        let mut mailer = MockMailer::new();
        mailer.expect_send().returning(|_| Ok(()));
        mailer
    }

    fn service(repo: MockUserRepository, mailer: MockMailer) -> AuthService<MockUserRepository> {
        AuthService::new(
            Arc::new(repo),
            token_service(),
            PasswordHasher::new(4),
            Arc::new(Notifier::new(Arc::new(mailer), "http://localhost:5173")),
        )
    }

    fn user(id: i64, email: &str, password_hash: &str) -> User {
        User {
            id,
            name: "alice".to_string(),
            email: email.to_string(),
            password_hash: password_hash.to_string(),
            avatar: None,
            is_verified: false,
            verification_token_hash: None,
            password_reset_token_hash: None,
            refresh_token_hash: None,
            created_at: Utc::now(),
        }
    }

    fn registration(email: &str, password: &str) -> Registration {
        Registration {
            name: "alice".to_string(),
            email: email.to_string(),
            password: password.to_string(),
            avatar: None,
        }
    }

    #[tokio::test]
    async fn test_register_success_lowercases_and_sends_two_emails() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_email_or_name()
            .withf(|email, name| email == "alice@example.com" && name == "alice")
            .times(1)
            .returning(|_, _| Ok(None));
        repo.expect_create()
            .withf(|new_user| {
                new_user.email == "alice@example.com"
                    && new_user.password_hash.starts_with("$2")
                    && new_user.verification_token_hash.as_ref().map(String::len) == Some(64)
            })
            .times(1)
            .returning(|new_user| {
                Ok(User {
                    verification_token_hash: new_user.verification_token_hash,
                    ..user(1, &new_user.email, &new_user.password_hash)
                })
            });

        let mut mailer = MockMailer::new();
        mailer.expect_send().times(2).returning(|_| Ok(()));

        let created = service(repo, mailer)
            .register(registration("  Alice@Example.COM ", "password123"))
            .await
            .unwrap();

        assert_eq!(created.email, "alice@example.com");
    }

    #[tokio::test]
    async fn test_register_duplicate_is_conflict() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_email_or_name()
            .times(1)
            .returning(|email, _| Ok(Some(user(1, email, "x"))));
        repo.expect_create().never();

        let result = service(repo, MockMailer::new())
            .register(registration("alice@example.com", "password123"))
            .await;

        assert!(matches!(result, Err(AppError::Conflict { .. })));
    }

    #[tokio::test]
    async fn test_register_rejects_short_password_and_bad_email() {
        let svc = service(MockUserRepository::new(), MockMailer::new());

        let short = svc
            .register(registration("alice@example.com", "short"))
            .await;
        assert!(matches!(short, Err(AppError::Validation { .. })));

        let bad_email = svc.register(registration("not-an-email", "password123")).await;
        assert!(matches!(bad_email, Err(AppError::Validation { .. })));

        let blank = svc.register(registration("   ", "password123")).await;
        assert!(matches!(blank, Err(AppError::Validation { .. })));
    }

    #[test]
    fn test_password_bounds_use_bytes_for_the_maximum() {
        assert!(ensure_password_strength(&"a".repeat(MAX_PASSWORD_BYTES)).is_ok());
        assert!(ensure_password_strength(&"a".repeat(MAX_PASSWORD_BYTES + 1)).is_err());

        // 36 two-byte characters sit exactly on the limit, one more ASCII
        // character pushes past it while staying under 72 characters.
        let multibyte = "é".repeat(36);
        assert!(ensure_password_strength(&multibyte).is_ok());
        assert!(ensure_password_strength(&format!("{multibyte}A")).is_err());

        // The minimum stays a character count.
        assert!(ensure_password_strength("ééééééé").is_err());
        assert!(ensure_password_strength("éééééééé").is_ok());
    }

    #[tokio::test]
    async fn test_reset_password_lost_race_is_rejected() {
        let tokens = token_service();
        let token = tokens.issue_password_reset("alice@example.com").unwrap();
        let digest = tokens.digest(TokenKind::PasswordReset, &token);

        let mut repo = MockUserRepository::new();
        repo.expect_find_by_email().returning(move |email| {
            Ok(Some(User {
                password_reset_token_hash: Some(digest.clone()),
                ..user(1, email, "x")
            }))
        });
        // Another request consumed the token between the check and the write.
        repo.expect_reset_password()
            .times(1)
            .returning(|_, _, _| Ok(false));

        let mut mailer = MockMailer::new();
        mailer.expect_send().never();

        let err = service(repo, mailer)
            .reset_password(&token, "new-password")
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Validation { .. }));
        assert_eq!(err.to_string(), "Invalid password reset token");
    }

    #[tokio::test]
    async fn test_verify_email_unknown_token_is_rejected() {
        let tokens = token_service();
        let token = tokens.issue_verification("alice@example.com").unwrap();

        let mut repo = MockUserRepository::new();
        repo.expect_find_by_verification_token()
            .times(1)
            .returning(|_| Ok(None));
        repo.expect_mark_verified().never();

        let result = service(repo, MockMailer::new()).verify_email(&token).await;
        assert!(matches!(result, Err(AppError::Validation { .. })));
    }

    #[tokio::test]
    async fn test_verify_email_malformed_token_skips_lookup() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_verification_token().never();

        let result = service(repo, MockMailer::new())
            .verify_email("garbage")
            .await;
        assert!(matches!(result, Err(AppError::Validation { .. })));
    }

    #[tokio::test]
    async fn test_verify_email_success() {
        let tokens = token_service();
        let token = tokens.issue_verification("alice@example.com").unwrap();
        let digest = tokens.digest(TokenKind::Verification, &token);

        let mut repo = MockUserRepository::new();
        repo.expect_find_by_verification_token()
            .withf(move |hash| hash == digest)
            .times(1)
            .returning(|_| Ok(Some(user(5, "alice@example.com", "x"))));
        let expected = tokens.digest(TokenKind::Verification, &token);
        repo.expect_mark_verified()
            .withf(move |id, hash| *id == 5 && hash == expected)
            .times(1)
            .returning(|_, _| Ok(true));

        let result = service(repo, quiet_mailer()).verify_email(&token).await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_login_wrong_password_and_unknown_email_look_the_same() {
        let hash = PasswordHasher::new(4).hash("password123").await.unwrap();

        let mut repo = MockUserRepository::new();
        repo.expect_find_by_email().returning(move |email| {
            if email == "alice@example.com" {
                Ok(Some(user(1, email, &hash)))
            } else {
                Ok(None)
            }
        });
        repo.expect_set_refresh_token().never();

        let svc = service(repo, MockMailer::new());

        let wrong_password = svc
            .login("alice@example.com", "not-the-password")
            .await
            .unwrap_err();
        let unknown = svc
            .login("bob@example.com", "password123")
            .await
            .unwrap_err();

        assert!(matches!(wrong_password, AppError::Unauthorized { .. }));
        assert_eq!(wrong_password.to_string(), unknown.to_string());
    }

    #[tokio::test]
    async fn test_login_stores_refresh_digest() {
        let hash = PasswordHasher::new(4).hash("password123").await.unwrap();

        let mut repo = MockUserRepository::new();
        repo.expect_find_by_email()
            .returning(move |email| Ok(Some(user(1, email, &hash))));
        repo.expect_set_refresh_token()
            .withf(|id, digest| *id == 1 && digest.as_ref().map(String::len) == Some(64))
            .times(1)
            .returning(|_, _| Ok(()));

        let pair = service(repo, MockMailer::new())
            .login("ALICE@example.com", "password123")
            .await
            .unwrap();

        assert_ne!(pair.access_token, pair.refresh_token);
    }

    #[tokio::test]
    async fn test_refresh_requires_stored_token() {
        let tokens = token_service();
        let stale = tokens.issue_refresh(1, "alice@example.com").unwrap();
        let current = tokens.issue_refresh(1, "alice@example.com").unwrap();
        let current_digest = tokens.digest(TokenKind::Refresh, &current);

        let mut repo = MockUserRepository::new();
        repo.expect_find_by_id().returning(move |id| {
            Ok(Some(User {
                refresh_token_hash: Some(current_digest.clone()),
                ..user(id, "alice@example.com", "x")
            }))
        });

        let svc = service(repo, MockMailer::new());

        assert!(matches!(
            svc.refresh(&stale).await,
            Err(AppError::Validation { .. })
        ));

        let access = svc.refresh(&current).await.unwrap();
        assert_eq!(tokens.verify_access(&access).unwrap().sub, 1);
    }

    #[tokio::test]
    async fn test_request_password_reset_unknown_email() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_email().times(1).returning(|_| Ok(None));

        let result = service(repo, MockMailer::new())
            .request_password_reset("nobody@example.com")
            .await;

        assert!(matches!(result, Err(AppError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_request_password_reset_delivery_failure_is_internal() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_email()
            .returning(|email| Ok(Some(user(1, email, "x"))));
        repo.expect_set_password_reset_token()
            .times(1)
            .returning(|_, _| Ok(()));

        let mut mailer = MockMailer::new();
        mailer
            .expect_send()
            .times(1)
            .returning(|_| Err(MailError::Transport("down".to_string())));

        let result = service(repo, mailer)
            .request_password_reset("alice@example.com")
            .await;

        assert!(matches!(result, Err(AppError::Internal { .. })));
    }

    #[tokio::test]
    async fn test_reset_password_rejects_superseded_token() {
        let tokens = token_service();
        let old = tokens.issue_password_reset("alice@example.com").unwrap();
        let newer = tokens.issue_password_reset("alice@example.com").unwrap();
        let newer_digest = tokens.digest(TokenKind::PasswordReset, &newer);

        let mut repo = MockUserRepository::new();
        repo.expect_find_by_email().returning(move |email| {
            Ok(Some(User {
                password_reset_token_hash: Some(newer_digest.clone()),
                ..user(1, email, "x")
            }))
        });
        repo.expect_reset_password().never();

        let result = service(repo, MockMailer::new())
            .reset_password(&old, "new-password")
            .await;

        assert!(matches!(result, Err(AppError::Validation { .. })));
    }

    #[tokio::test]
    async fn test_reset_password_succeeds_when_confirmation_fails() {
        let tokens = token_service();
        let token = tokens.issue_password_reset("alice@example.com").unwrap();
        let digest = tokens.digest(TokenKind::PasswordReset, &token);

        let mut repo = MockUserRepository::new();
        repo.expect_find_by_email().returning(move |email| {
            Ok(Some(User {
                password_reset_token_hash: Some(digest.clone()),
                ..user(1, email, "x")
            }))
        });
        let expected = tokens.digest(TokenKind::PasswordReset, &token);
        repo.expect_reset_password()
            .withf(move |id, hash, token_hash| {
                *id == 1 && hash.starts_with("$2") && token_hash == expected
            })
            .times(1)
            .returning(|_, _, _| Ok(true));

        let mut mailer = MockMailer::new();
        let mut seq = mockall::Sequence::new();
        mailer
            .expect_send()
            .withf(|mail| mail.subject == "Your password has been reset")
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Err(MailError::Transport("down".to_string())));
        mailer
            .expect_send()
            .withf(|mail| mail.subject == "There was a problem resetting your password")
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(()));

        let result = service(repo, mailer)
            .reset_password(&token, "new-password")
            .await;

        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_authenticate_deleted_account() {
        let tokens = token_service();
        let access = tokens.issue_access(9, "gone@example.com").unwrap();

        let mut repo = MockUserRepository::new();
        repo.expect_find_by_id().times(1).returning(|_| Ok(None));

        let result = service(repo, MockMailer::new())
            .authenticate(&access)
            .await;

        assert!(matches!(result, Err(AppError::Unauthorized { .. })));
    }
}

//! Templated account notifications.
//!
//! Every email the application sends is a [`Notification`] variant rendered
//! by an askama template under `templates/email/` and handed to a [`Mailer`].

use askama::Template;
use std::sync::Arc;

use crate::infrastructure::mail::{MailError, MailResult, Mailer, OutgoingMail};

/// The kinds of email sent to users.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notification {
    Welcome { name: String },
    VerifyEmail { name: String, token: String },
    EmailVerified { name: String },
    PasswordReset { name: String, token: String },
    PasswordResetSucceeded { name: String },
    PasswordResetFailed { name: String },
    ProfileUpdated { name: String },
    PasswordChanged { name: String },
    AccountDeleted { name: String },
}

impl Notification {
    /// Short label used in logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Welcome { .. } => "welcome",
            Self::VerifyEmail { .. } => "verify_email",
            Self::EmailVerified { .. } => "email_verified",
            Self::PasswordReset { .. } => "password_reset",
            Self::PasswordResetSucceeded { .. } => "password_reset_succeeded",
            Self::PasswordResetFailed { .. } => "password_reset_failed",
            Self::ProfileUpdated { .. } => "profile_updated",
            Self::PasswordChanged { .. } => "password_changed",
            Self::AccountDeleted { .. } => "account_deleted",
        }
    }
}

#[derive(Template)]
#[template(path = "email/welcome.html")]
struct WelcomeEmail<'a> {
    name: &'a str,
}

#[derive(Template)]
#[template(path = "email/verify_email.html")]
struct VerifyEmailEmail<'a> {
    name: &'a str,
    link: &'a str,
}

#[derive(Template)]
#[template(path = "email/email_verified.html")]
struct EmailVerifiedEmail<'a> {
    name: &'a str,
}

#[derive(Template)]
#[template(path = "email/password_reset.html")]
struct PasswordResetEmail<'a> {
    name: &'a str,
    link: &'a str,
}

#[derive(Template)]
#[template(path = "email/password_reset_succeeded.html")]
struct PasswordResetSucceededEmail<'a> {
    name: &'a str,
}

#[derive(Template)]
#[template(path = "email/password_reset_failed.html")]
struct PasswordResetFailedEmail<'a> {
    name: &'a str,
}

#[derive(Template)]
#[template(path = "email/profile_updated.html")]
struct ProfileUpdatedEmail<'a> {
    name: &'a str,
}

#[derive(Template)]
#[template(path = "email/password_changed.html")]
struct PasswordChangedEmail<'a> {
    name: &'a str,
}

#[derive(Template)]
#[template(path = "email/account_deleted.html")]
struct AccountDeletedEmail<'a> {
    name: &'a str,
}

/// Renders notifications and dispatches them through a [`Mailer`].
pub struct Notifier {
    mailer: Arc<dyn Mailer>,
    frontend_url: String,
}

impl Notifier {
    /// Creates a notifier.
    ///
    /// `frontend_url` is the base for links in verification and reset emails.
    pub fn new(mailer: Arc<dyn Mailer>, frontend_url: impl Into<String>) -> Self {
        Self {
            mailer,
            frontend_url: frontend_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Renders a notification addressed to `to`.
    ///
    /// # Errors
    ///
    /// Returns [`MailError::Template`] if rendering fails.
    pub fn render(&self, to: &str, notification: &Notification) -> MailResult<OutgoingMail> {
        let (subject, html) = match notification {
            Notification::Welcome { name } => ("Welcome to Snaplink", WelcomeEmail { name }.render()),
            Notification::VerifyEmail { name, token } => {
                let link = format!("{}/verify-email?token={}", self.frontend_url, token);
                (
                    "Verify your email address",
                    VerifyEmailEmail { name, link: &link }.render(),
                )
            }
            Notification::EmailVerified { name } => {
                ("Your email is verified", EmailVerifiedEmail { name }.render())
            }
            Notification::PasswordReset { name, token } => {
                let link = format!("{}/reset-password?token={}", self.frontend_url, token);
                (
                    "Reset your password",
                    PasswordResetEmail { name, link: &link }.render(),
                )
            }
            Notification::PasswordResetSucceeded { name } => (
                "Your password has been reset",
                PasswordResetSucceededEmail { name }.render(),
            ),
            Notification::PasswordResetFailed { name } => (
                "There was a problem resetting your password",
                PasswordResetFailedEmail { name }.render(),
            ),
            Notification::ProfileUpdated { name } => {
                ("Your profile was updated", ProfileUpdatedEmail { name }.render())
            }
            Notification::PasswordChanged { name } => {
                ("Your password was changed", PasswordChangedEmail { name }.render())
            }
            Notification::AccountDeleted { name } => {
                ("Your account has been deleted", AccountDeletedEmail { name }.render())
            }
        };

        let html = html.map_err(|e| MailError::Template(e.to_string()))?;

        Ok(OutgoingMail {
            to: to.to_string(),
            subject: subject.to_string(),
            html,
        })
    }

    /// Renders and sends a notification, returning any failure to the caller.
    pub async fn deliver(&self, to: &str, notification: Notification) -> MailResult<()> {
        let mail = self.render(to, &notification)?;
        self.mailer.send(mail).await
    }

    /// Renders and sends a notification, logging failures instead of returning them.
    pub async fn notify(&self, to: &str, notification: Notification) {
        let kind = notification.kind();

        match self.deliver(to, notification).await {
            Ok(()) => tracing::debug!(kind, "Notification sent"),
            Err(e) => tracing::warn!(kind, error = %e, "Failed to send notification"),
        }
    }

    pub async fn health_check(&self) -> bool {
        self.mailer.health_check().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::mail::MockMailer;

    fn notifier(mailer: MockMailer) -> Notifier {
        Notifier::new(Arc::new(mailer), "https://app.example.com/")
    }

    #[test]
    fn test_render_verify_email_contains_link() {
        let notifier = notifier(MockMailer::new());
        let mail = notifier
            .render(
                "alice@example.com",
                &Notification::VerifyEmail {
                    name: "Alice".to_string(),
                    token: "abc.def.ghi".to_string(),
                },
            )
            .unwrap();

        assert_eq!(mail.to, "alice@example.com");
        assert_eq!(mail.subject, "Verify your email address");
        assert!(
            mail.html
                .contains("https://app.example.com/verify-email?token=abc.def.ghi")
        );
        assert!(mail.html.contains("Alice"));
    }

    #[test]
    fn test_render_escapes_name() {
        let notifier = notifier(MockMailer::new());
        let mail = notifier
            .render(
                "x@example.com",
                &Notification::Welcome {
                    name: "<script>".to_string(),
                },
            )
            .unwrap();

        assert!(!mail.html.contains("<script>"));
    }

    #[tokio::test]
    async fn test_deliver_propagates_transport_error() {
        let mut mailer = MockMailer::new();
        mailer
            .expect_send()
            .times(1)
            .returning(|_| Err(MailError::Transport("connection refused".to_string())));

        let result = notifier(mailer)
            .deliver(
                "a@example.com",
                Notification::AccountDeleted {
                    name: "A".to_string(),
                },
            )
            .await;

        assert!(matches!(result, Err(MailError::Transport(_))));
    }

    #[tokio::test]
    async fn test_notify_swallows_errors() {
        let mut mailer = MockMailer::new();
        mailer
            .expect_send()
            .times(1)
            .returning(|_| Err(MailError::Transport("down".to_string())));

        notifier(mailer)
            .notify(
                "a@example.com",
                Notification::PasswordChanged {
                    name: "A".to_string(),
                },
            )
            .await;
    }
}

//! Mailer trait and error types.

use async_trait::async_trait;

/// Errors that can occur while delivering an email.
#[derive(Debug, thiserror::Error)]
pub enum MailError {
    #[error("Invalid address: {0}")]
    Address(String),

    #[error("Failed to build message: {0}")]
    Build(String),

    #[error("Failed to render template: {0}")]
    Template(String),

    #[error("Mail transport error: {0}")]
    Transport(String),
}

/// Result type for mail operations.
pub type MailResult<T> = Result<T, MailError>;

/// A rendered email ready for delivery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingMail {
    pub to: String,
    pub subject: String,
    pub html: String,
}

/// Trait for email delivery backends.
///
/// # Implementations
///
/// - [`crate::infrastructure::mail::SmtpMailer`] - SMTP submission via `lettre`
/// - [`crate::infrastructure::mail::LogMailer`] - Logs messages instead of sending them
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Mailer: Send + Sync {
    /// Delivers a single message.
    ///
    /// # Errors
    ///
    /// Returns [`MailError`] if the address is invalid or the transport fails.
    async fn send(&self, mail: OutgoingMail) -> MailResult<()>;

    /// Checks if the mail backend is reachable.
    ///
    /// Used by the health check endpoint.
    async fn health_check(&self) -> bool;
}
